//! M1 mouse firmware for the STM32L432KC.
//!
//! Boots the clocks, loads the persisted config byte, builds the device
//! object and spawns the Embassy tasks described in [`firmware`].

#![no_std]
#![no_main]

mod firmware;

use core::cell::RefCell;

use defmt::{info, warn};
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::Spawner;
use embassy_stm32::flash::{Blocking, Flash};
use embassy_stm32::gpio::{Level, Output, Pin, Speed};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::mode::Async;
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::Hertz;
use embassy_stm32::{bind_interrupts, peripherals, Config};
use embassy_sync::blocking_mutex::Mutex;
use embassy_usb::class::hid::HidWriter;
use embassy_usb::UsbDevice;
use m1_firmware::dpi::KeyboardConfig;
use m1_firmware::indicator::StatusPins;
use m1_firmware::keyboard::{KeyboardHooks, M1};
use m1_firmware::lighting::RgbMatrix;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use firmware::ckled2001::{self, Ckled2001};
use firmware::pins::{EncoderPins, KeyPins};
use firmware::sensor::{self, SensorCpi};
use firmware::storage::{self, FlashConfig};
use firmware::usb::{self as usb_hid, UsbDriver};
use firmware::{scan, SharedDevice};

bind_interrupts!(struct Irqs {
    I2C1_EV => i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => i2c::ErrorInterruptHandler<peripherals::I2C1>;
});

type ConfigFlash = BlockingAsync<Flash<'static, Blocking>>;

static DEVICE: StaticCell<SharedDevice> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("M1 firmware start");

    // RCC: 80 MHz from HSI16 through the PLL, HSI48 for USB.
    let mut config = Config::default();
    {
        use embassy_stm32::rcc::*;
        config.rcc.hsi = true;
        config.rcc.hsi48 = Some(Hsi48Config {
            sync_from_usb: true,
        });
        config.rcc.pll = Some(Pll {
            source: PllSource::HSI,
            prediv: PllPreDiv::DIV1,
            mul: PllMul::MUL10,
            divp: None,
            divq: None,
            divr: Some(PllRDiv::DIV2),
        });
        config.rcc.sys = Sysclk::PLL1_R;
        config.rcc.mux.clk48sel = mux::Clk48sel::HSI48;
    }
    let p = embassy_stm32::init(config);

    // Persisted config
    let mut flash: ConfigFlash = BlockingAsync::new(Flash::new_blocking(p.FLASH));
    let (raw, fresh) = match storage::load(&mut flash).await {
        Ok(Some(raw)) => (raw, false),
        Ok(None) => (KeyboardConfig::DEFAULT.raw(), true),
        Err(e) => {
            warn!("Config load failed ({:?}), using defaults", e);
            (KeyboardConfig::DEFAULT.raw(), false)
        }
    };

    // Device object
    let status = StatusPins::new(
        Output::new(p.PA10, Level::High, Speed::Low),
        Output::new(p.PA8, Level::High, Speed::Low),
        Output::new(p.PA9, Level::High, Speed::Low),
    );
    let mut m1 = M1::new(RgbMatrix::new(), SensorCpi::new(), FlashConfig::new(raw), status);
    if fresh {
        m1.on_eeconfig_init();
    }
    m1.on_matrix_init();
    m1.on_pointing_init();
    let device: &'static SharedDevice = DEVICE.init(Mutex::new(RefCell::new(m1)));

    // Inputs
    let keys = KeyPins::new([
        p.PB0.degrade(),
        p.PB1.degrade(),
        p.PB3.degrade(),
        p.PB4.degrade(),
        p.PB5.degrade(),
        p.PA2.degrade(),
        p.PA3.degrade(),
    ]);
    let wheel = EncoderPins::new(p.PA0.degrade(), p.PA1.degrade());

    // RGB matrix controller
    let i2c = I2c::new(
        p.I2C1,
        p.PB6,
        p.PB7,
        Irqs,
        p.DMA1_CH6,
        p.DMA1_CH7,
        Hertz(400_000),
        Default::default(),
    );

    // Motion sensor
    let mut spi_config = spi::Config::default();
    spi_config.frequency = Hertz(2_000_000);
    spi_config.mode = spi::MODE_3;
    let spi = Spi::new(p.SPI1, p.PA5, p.PA7, p.PA6, p.DMA1_CH3, p.DMA1_CH2, spi_config);
    let ncs = Output::new(p.PA4, Level::High, Speed::VeryHigh);

    let usb = usb_hid::init(p.USB, p.PA12, p.PA11);

    spawner.must_spawn(usb_task(usb.device));
    spawner.must_spawn(hid_writer(usb.writer));
    spawner.must_spawn(config_flush(flash));
    spawner.must_spawn(sensor_cpi(spi, ncs));
    spawner.must_spawn(lighting(Ckled2001::new(i2c), device));
    spawner.must_spawn(scan_keys(keys, wheel, device));

    info!("All tasks spawned");
}

#[embassy_executor::task]
async fn usb_task(device: UsbDevice<'static, UsbDriver>) {
    usb_hid::run_usb_device(device).await
}

#[embassy_executor::task]
async fn hid_writer(writer: HidWriter<'static, UsbDriver, 8>) {
    usb_hid::hid_writer_task(writer).await
}

#[embassy_executor::task]
async fn config_flush(flash: ConfigFlash) {
    storage::config_flush_task(flash).await
}

#[embassy_executor::task]
async fn sensor_cpi(spi: Spi<'static, Async>, ncs: Output<'static>) {
    sensor::sensor_task(spi, ncs).await
}

#[embassy_executor::task]
async fn lighting(driver: Ckled2001<I2c<'static, Async>>, device: &'static SharedDevice) {
    ckled2001::lighting_task(driver, device).await
}

#[embassy_executor::task]
async fn scan_keys(keys: KeyPins, wheel: EncoderPins, device: &'static SharedDevice) {
    scan::scan_task(keys, wheel, device).await
}
