//! Embassy glue between the STM32L432 peripherals and the mode core.
//!
//! Task layout (single thread-mode executor):
//!
//! 1. **scan** - 1 ms tick: keys, wheel, mode timers, mouse-button reports.
//! 2. **lighting** - renders the RGB matrix, overlays mode indicators,
//!    pushes the frame to the CKLED2001.
//! 3. **config flush** - persists the config byte when the core changes it.
//! 4. **sensor** - applies CPI changes to the motion sensor.
//! 5. **usb** / **hid writer** - USB stack and the mouse endpoint.
//!
//! The device object is shared between scan and lighting behind a
//! critical-section mutex; both run on the same executor so the lock is
//! never contended, it only satisfies `Sync`.

pub mod ckled2001;
pub mod pins;
pub mod scan;
pub mod sensor;
pub mod storage;
pub mod usb;

use core::cell::RefCell;

use embassy_stm32::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use m1_firmware::hid::MouseReport;
use m1_firmware::indicator::StatusPins;
use m1_firmware::keyboard::M1;
use m1_firmware::lighting::RgbMatrix;

use sensor::SensorCpi;
use storage::FlashConfig;

/// Concrete device object for this board.
pub type Device = M1<
    RgbMatrix,
    SensorCpi,
    FlashConfig,
    StatusPins<Output<'static>, Output<'static>, Output<'static>>,
>;

/// Device object shared by the scan and lighting tasks.
pub type SharedDevice = Mutex<CriticalSectionRawMutex, RefCell<Device>>;

/// Mouse reports from the scan task to the USB writer.
pub static MOUSE_REPORTS: Channel<CriticalSectionRawMutex, MouseReport, 16> = Channel::new();
