//! Motion sensor register access.
//!
//! Only the resolution registers are driven: CPI is written to both axes in
//! 50-CPI steps, then latched with the set-resolution command.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiBus;

use crate::error::Error;

const SPI_WRITE: u8 = 0x80;

const REG_SET_RESOLUTION: u8 = 0x47;
const REG_RESOLUTION_X_LOW: u8 = 0x48;
const REG_RESOLUTION_X_HIGH: u8 = 0x49;
const REG_RESOLUTION_Y_LOW: u8 = 0x4A;
const REG_RESOLUTION_Y_HIGH: u8 = 0x4B;
const SET_RESOLUTION_APPLY: u8 = 0x01;

/// CPI per resolution register step.
const RES_STEP: u16 = 50;

// SPI timing (µs)
const T_NCS_SCLK_US: u32 = 1;
const T_SCLK_NCS_WR_US: u32 = 35 - T_NCS_SCLK_US;
const T_SWX_US: u32 = 180 - T_SCLK_NCS_WR_US;

pub struct Sensor<SPI, CS, D> {
    spi: SPI,
    cs: CS,
    delay: D,
}

impl<SPI: SpiBus, CS: OutputPin, D: DelayNs> Sensor<SPI, CS, D> {
    /// Take the bus and park chip-select high.
    pub fn new(spi: SPI, mut cs: CS, delay: D) -> Self {
        let _ = cs.set_high();
        Self { spi, cs, delay }
    }

    /// One register write. Chip-select is released whatever the bus returns.
    pub async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error> {
        let _ = self.cs.set_low();
        self.delay.delay_us(T_NCS_SCLK_US).await;

        let result = self
            .spi
            .write(&[reg | SPI_WRITE, value])
            .await
            .map_err(|_| Error::Sensor);

        self.delay.delay_us(T_SCLK_NCS_WR_US).await;
        let _ = self.cs.set_high();
        self.delay.delay_us(T_SWX_US).await;
        result
    }

    pub async fn set_cpi(&mut self, cpi: u16) -> Result<(), Error> {
        let steps = (cpi / RES_STEP).max(1);
        let [low, high] = steps.to_le_bytes();
        self.write_reg(REG_RESOLUTION_X_LOW, low).await?;
        self.write_reg(REG_RESOLUTION_X_HIGH, high).await?;
        self.write_reg(REG_RESOLUTION_Y_LOW, low).await?;
        self.write_reg(REG_RESOLUTION_Y_HIGH, high).await?;
        self.write_reg(REG_SET_RESOLUTION, SET_RESOLUTION_APPLY).await
    }
}
