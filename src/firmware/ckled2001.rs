//! CKLED2001 RGB matrix driver and the lighting frame task.
//!
//! The controller exposes paged registers behind a page-select command
//! register. PWM duty for every channel lives in one page; each RGB cell
//! maps to three channel addresses given by [`LED_MAP`].

use core::cell::RefCell;

use defmt::{info, warn};
use embassy_time::{Duration, Instant, Ticker};
use embedded_hal_async::i2c::I2c;
use m1_firmware::config::{CKLED2001_I2C_ADDR, FRAME_INTERVAL_MS, LED_COUNT};
use m1_firmware::keyboard::KeyboardHooks;
use m1_firmware::lighting::{Frame, OFF};
use m1_firmware::Error;

use super::SharedDevice;

const CONFIGURE_CMD_PAGE: u8 = 0xFD;
const LED_CONTROL_PAGE: u8 = 0x00;
const LED_PWM_PAGE: u8 = 0x01;
const FUNCTION_PAGE: u8 = 0x03;
const CURRENT_TUNE_PAGE: u8 = 0x04;

// Function page registers
const CONFIGURATION_REG: u8 = 0x00;
const MSKSW_SHUT_DOWN_MODE: u8 = 0x00;
const MSKSW_NORMAL_MODE: u8 = 0x01;
const PDU_REG: u8 = 0x13;
const MSKSET_CA_CB_CHANNEL: u8 = 0xAA;
const SCAN_PHASE_REG: u8 = 0x14;
const MSKPHASE_12CHANNEL: u8 = 0x00;
const SLEW_RATE_CONTROL_MODE1_REG: u8 = 0x15;
const MSKPWM_DELAY_PHASE_ENABLE: u8 = 0x04;
const SLEW_RATE_CONTROL_MODE2_REG: u8 = 0x16;
const MSKDRIVING_SINKING_SLEWRATE_ENABLE: u8 = 0xC0;
const SOFTWARE_SLEEP_REG: u8 = 0x1A;
const MSKSLEEP_DISABLE: u8 = 0x00;

const LED_CONTROL_LENGTH: usize = 0x18;
const LED_CURRENT_TUNE_LENGTH: usize = 0x0C;
/// 12 current sinks × 16 sources.
const PWM_LENGTH: usize = 0xC0;

/// PWM address of sink row `row` (A = 0 … L = 11), source `col` (1-based).
const fn ch(row: u8, col: u8) -> u8 {
    row * 0x10 + (col - 1)
}

const A: u8 = 0;
const B: u8 = 1;
const C: u8 = 2;
const D: u8 = 3;
const E: u8 = 4;
const F: u8 = 5;

/// `(red, green, blue)` PWM addresses per cell.
const LED_MAP: [(u8, u8, u8); LED_COUNT] = [
    (ch(C, 1), ch(B, 1), ch(A, 1)),
    (ch(C, 2), ch(B, 2), ch(A, 2)),
    (ch(C, 3), ch(B, 3), ch(A, 3)),
    (ch(C, 4), ch(B, 4), ch(A, 4)),
    (ch(C, 5), ch(B, 5), ch(A, 5)),
    (ch(C, 6), ch(B, 6), ch(A, 6)),
    (ch(F, 1), ch(D, 1), ch(E, 1)),
    (ch(F, 2), ch(D, 2), ch(E, 2)),
    (ch(F, 3), ch(D, 3), ch(E, 3)),
    (ch(F, 4), ch(D, 4), ch(E, 4)),
    (ch(F, 5), ch(D, 5), ch(E, 5)),
    (ch(F, 6), ch(D, 6), ch(E, 6)),
    // Wheel
    (ch(C, 7), ch(A, 7), ch(B, 7)),
    // Mode indicator
    (ch(F, 7), ch(D, 7), ch(E, 7)),
];

pub struct Ckled2001<I> {
    i2c: I,
    /// Register address byte followed by the full PWM page.
    pwm: [u8; PWM_LENGTH + 1],
}

impl<I: I2c> Ckled2001<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            pwm: [0; PWM_LENGTH + 1],
        }
    }

    async fn select_page(&mut self, page: u8) -> Result<(), Error> {
        self.write_reg(CONFIGURE_CMD_PAGE, page).await
    }

    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error> {
        self.i2c
            .write(CKLED2001_I2C_ADDR, &[reg, value])
            .await
            .map_err(|_| Error::LedDriver)
    }

    async fn fill_page(&mut self, page: u8, len: usize, value: u8) -> Result<(), Error> {
        self.select_page(page).await?;
        let mut buf = [value; LED_CONTROL_LENGTH + 1];
        // Pages longer than the buffer go out in chunks.
        let mut start = 0;
        while start < len {
            let n = (len - start).min(LED_CONTROL_LENGTH);
            buf[0] = start as u8;
            self.i2c
                .write(CKLED2001_I2C_ADDR, &buf[..n + 1])
                .await
                .map_err(|_| Error::LedDriver)?;
            start += n;
        }
        Ok(())
    }

    /// Bring the controller out of shutdown with every channel enabled and dark.
    pub async fn init(&mut self) -> Result<(), Error> {
        self.select_page(FUNCTION_PAGE).await?;
        self.write_reg(CONFIGURATION_REG, MSKSW_SHUT_DOWN_MODE).await?;
        self.write_reg(PDU_REG, MSKSET_CA_CB_CHANNEL).await?;
        self.write_reg(SCAN_PHASE_REG, MSKPHASE_12CHANNEL).await?;
        self.write_reg(SLEW_RATE_CONTROL_MODE1_REG, MSKPWM_DELAY_PHASE_ENABLE)
            .await?;
        self.write_reg(SLEW_RATE_CONTROL_MODE2_REG, MSKDRIVING_SINKING_SLEWRATE_ENABLE)
            .await?;
        self.write_reg(SOFTWARE_SLEEP_REG, MSKSLEEP_DISABLE).await?;

        self.fill_page(LED_PWM_PAGE, PWM_LENGTH, 0x00).await?;
        self.fill_page(CURRENT_TUNE_PAGE, LED_CURRENT_TUNE_LENGTH, 0xFF)
            .await?;
        self.fill_page(LED_CONTROL_PAGE, LED_CONTROL_LENGTH, 0xFF)
            .await?;

        self.select_page(FUNCTION_PAGE).await?;
        self.write_reg(CONFIGURATION_REG, MSKSW_NORMAL_MODE).await?;
        info!("CKLED2001 initialised");
        Ok(())
    }

    /// Latch a frame into the PWM page.
    pub async fn write_frame(&mut self, frame: &Frame) -> Result<(), Error> {
        for (cell, (r, g, b)) in frame.iter().zip(LED_MAP.iter()) {
            self.pwm[1 + *r as usize] = cell.r;
            self.pwm[1 + *g as usize] = cell.g;
            self.pwm[1 + *b as usize] = cell.b;
        }
        self.pwm[0] = 0x00;

        self.select_page(LED_PWM_PAGE).await?;
        self.i2c
            .write(CKLED2001_I2C_ADDR, &self.pwm)
            .await
            .map_err(|_| Error::LedDriver)
    }
}

/// Render, overlay and push one frame every [`FRAME_INTERVAL_MS`].
pub async fn lighting_task<I: I2c>(mut driver: Ckled2001<I>, device: &'static SharedDevice) -> ! {
    if let Err(e) = driver.init().await {
        warn!("LED driver init failed: {:?}", e);
    }

    let mut ticker = Ticker::every(Duration::from_millis(FRAME_INTERVAL_MS));
    let mut frame: Frame = [OFF; LED_COUNT];
    loop {
        let now = Instant::now().as_millis() as u32;
        device.lock(|cell: &RefCell<_>| {
            let device = cell.borrow();
            device.lighting().render(now, &mut frame);
            device.on_indicators(&mut frame);
        });

        if let Err(e) = driver.write_frame(&frame).await {
            warn!("LED frame write failed: {:?}", e);
        }
        ticker.next().await;
    }
}
