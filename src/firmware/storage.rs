//! Persistent storage for the keyboard config byte.
//!
//! Uses the STM32L4 internal flash via the `sequential-storage` crate. The
//! mode core writes synchronously into an in-RAM copy ([`FlashConfig`]);
//! the flush task picks the change up from a channel and performs the
//! slow flash operation on its own.
//!
//! Storage layout:
//!   - A single key-value map item, key [`KEY_KEYBOARD_CONFIG`], value the
//!     raw config byte.
//!   - Pages are managed by `sequential-storage` which handles wear
//!     levelling and GC.

use core::ops::Range;

use defmt::{debug, error, info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embedded_storage_async::nor_flash::NorFlash;
use m1_firmware::config::{STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START};
use m1_firmware::dpi::KeyboardConfig;
use m1_firmware::host::ConfigStore;
use m1_firmware::Error;
use sequential_storage::cache::NoCache;

/// Flash page size for STM32L4 (2 KB).
const FLASH_PAGE_SIZE: u32 = 2048;

/// Start offset of our storage region.
const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;

/// End offset (exclusive) of our storage region.
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Key for the config byte in the map storage.
const KEY_KEYBOARD_CONFIG: u8 = 0x01;

/// Scratch buffer for map operations (item header + key + value, padded).
const SCRATCH_SIZE: usize = 32;

/// Pending flash operation handed from the core to the flush task.
#[derive(Clone, Copy, defmt::Format)]
enum FlashOp {
    Store(u8),
    /// Erase the region, then store this byte.
    Wipe(u8),
}

static FLASH_OPS: Channel<CriticalSectionRawMutex, FlashOp, 4> = Channel::new();

fn submit(op: FlashOp) {
    if FLASH_OPS.try_send(op).is_err() {
        warn!("Flash queue full - dropping {:?}", op);
    }
}

/// RAM copy of the config byte backed by flash.
pub struct FlashConfig {
    raw: u8,
}

impl FlashConfig {
    pub fn new(raw: u8) -> Self {
        Self { raw }
    }
}

impl ConfigStore for FlashConfig {
    fn read(&self) -> u8 {
        self.raw
    }

    fn write(&mut self, raw: u8) {
        self.raw = raw;
        submit(FlashOp::Store(raw));
    }

    fn reset(&mut self) {
        self.raw = KeyboardConfig::DEFAULT.raw();
        submit(FlashOp::Wipe(self.raw));
    }
}

fn flash_range() -> Range<u32> {
    STORAGE_START..STORAGE_END
}

/// Read the stored config byte. `Ok(None)` means flash holds no config yet.
pub async fn load(flash: &mut impl NorFlash) -> Result<Option<u8>, Error> {
    let mut buf = [0u8; SCRATCH_SIZE];
    match sequential_storage::map::fetch_item::<u8, u8, _>(
        flash,
        flash_range(),
        &mut NoCache::new(),
        &mut buf,
        &KEY_KEYBOARD_CONFIG,
    )
    .await
    {
        Ok(Some(raw)) => {
            info!("Loaded config byte {=u8:#x} from flash", raw);
            Ok(Some(raw))
        }
        Ok(None) => {
            info!("No config in flash");
            Ok(None)
        }
        Err(e) => {
            error!("Flash read error: {:?}", defmt::Debug2Format(&e));
            Err(Error::Storage)
        }
    }
}

async fn store(flash: &mut impl NorFlash, raw: u8) -> Result<(), Error> {
    let mut buf = [0u8; SCRATCH_SIZE];
    sequential_storage::map::store_item::<u8, u8, _>(
        flash,
        flash_range(),
        &mut NoCache::new(),
        &mut buf,
        &KEY_KEYBOARD_CONFIG,
        &raw,
    )
    .await
    .map_err(|e| {
        error!("Flash write error: {:?}", defmt::Debug2Format(&e));
        Error::Storage
    })
}

async fn wipe(flash: &mut impl NorFlash) -> Result<(), Error> {
    sequential_storage::erase_all(flash, flash_range())
        .await
        .map_err(|e| {
            error!("Flash erase error: {:?}", defmt::Debug2Format(&e));
            Error::Storage
        })
}

/// Persist config changes in the order the core makes them. Runs forever.
pub async fn config_flush_task(mut flash: impl NorFlash) -> ! {
    info!("Config flush task started");
    loop {
        let op = FLASH_OPS.receive().await;
        debug!("Flash op {:?}", op);
        let result = match op {
            FlashOp::Store(raw) => store(&mut flash, raw).await,
            FlashOp::Wipe(raw) => match wipe(&mut flash).await {
                Ok(()) => store(&mut flash, raw).await,
                Err(e) => Err(e),
            },
        };
        if let Err(e) = result {
            error!("Config not persisted: {:?}", e);
        }
    }
}
