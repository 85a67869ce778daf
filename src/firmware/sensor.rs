//! Motion sensor CPI control.
//!
//! The mode core sets CPI synchronously through [`SensorCpi`]; the value is
//! handed to [`sensor_task`] through a signal and written over SPI there.
//! Only the latest value matters, so a signal (not a queue) is enough.

use defmt::{info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Delay;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;
use m1_firmware::host::PointingDevice;
use m1_firmware::sensor::Sensor;

static CPI_SIGNAL: Signal<CriticalSectionRawMutex, u16> = Signal::new();

/// Sensor handle owned by the device object.
#[derive(Default)]
pub struct SensorCpi {
    cpi: u16,
}

impl SensorCpi {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PointingDevice for SensorCpi {
    fn set_cpi(&mut self, cpi: u16) {
        self.cpi = cpi;
        CPI_SIGNAL.signal(cpi);
    }

    fn cpi(&self) -> u16 {
        self.cpi
    }
}

/// Apply every CPI change the core makes. Runs forever.
pub async fn sensor_task(spi: impl SpiBus, ncs: impl OutputPin) -> ! {
    let mut sensor = Sensor::new(spi, ncs, Delay);
    info!("Sensor task started");
    loop {
        let cpi = CPI_SIGNAL.wait().await;
        match sensor.set_cpi(cpi).await {
            Ok(()) => info!("Sensor CPI {=u16}", cpi),
            Err(e) => warn!("Sensor CPI write failed: {:?}", e),
        }
    }
}
