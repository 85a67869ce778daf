//! USB HID mouse device.
//!
//! Initialises the Embassy USB stack on the STM32L4 full-speed device
//! peripheral and exposes a single boot-compatible mouse endpoint.

use defmt::{info, warn};
use embassy_stm32::usb::Driver;
use embassy_stm32::{bind_interrupts, peripherals, usb};
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config, UsbDevice};
use m1_firmware::config;
use m1_firmware::hid::mouse::MOUSE_REPORT_SIZE;
use m1_firmware::hid::MOUSE_REPORT_DESCRIPTOR;
use m1_firmware::Error;
use static_cell::StaticCell;

use super::MOUSE_REPORTS;

bind_interrupts!(pub struct Irqs {
    USB_FS => usb::InterruptHandler<peripherals::USB>;
});

pub type UsbDriver = Driver<'static, peripherals::USB>;

static MOUSE_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

pub struct UsbMouse {
    pub device: UsbDevice<'static, UsbDriver>,
    pub writer: HidWriter<'static, UsbDriver, 8>,
}

/// Initialise the USB stack and create the HID mouse.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usb: peripherals::USB, dp: peripherals::PA12, dm: peripherals::PA11) -> UsbMouse {
    let driver = Driver::new(usb, Irqs, dp, dm);

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        usb_config,
        USB_CONFIG_DESC.init([0u8; 256]),
        USB_BOS_DESC.init([0u8; 256]),
        USB_MSOS_DESC.init([0u8; 256]),
        USB_CTRL_BUF.init([0u8; 64]),
    );

    let mouse_config = HidConfig {
        report_descriptor: MOUSE_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let writer = HidWriter::new(&mut builder, MOUSE_STATE.init(State::new()), mouse_config);

    let device = builder.build();
    info!("USB HID mouse initialised");

    UsbMouse { device, writer }
}

/// Run the USB device stack (enumeration, suspend, endpoint servicing).
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// Forward queued mouse reports to the HID endpoint.
pub async fn hid_writer_task(mut writer: HidWriter<'static, UsbDriver, 8>) -> ! {
    info!("HID writer task started - waiting for reports");
    let mut buf = [0u8; MOUSE_REPORT_SIZE];

    loop {
        let report = MOUSE_REPORTS.receive().await;
        let n = report.serialize(&mut buf);
        if let Err(e) = writer.write(&buf[..n]).await.map_err(|_| Error::Usb) {
            warn!("USB mouse write failed: {:?}", e);
        }
    }
}
