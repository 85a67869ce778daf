//! DPI table and the persisted DPI selection.
//!
//! The selected index is the only value this firmware persists. It is read
//! once at startup and written back on every change.

use crate::config::{DPI_DEFAULT_INDEX, DPI_OPTIONS};
use crate::error::Error;
use crate::host::ConfigStore;

/// Decoded form of the persisted configuration byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardConfig {
    pub dpi_index: u8,
}

impl KeyboardConfig {
    pub const DEFAULT: Self = Self {
        dpi_index: DPI_DEFAULT_INDEX,
    };

    pub fn raw(self) -> u8 {
        self.dpi_index
    }
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for KeyboardConfig {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        if (raw as usize) < DPI_OPTIONS.len() {
            Ok(Self { dpi_index: raw })
        } else {
            Err(Error::InvalidDpiIndex(raw))
        }
    }
}

/// Currently selected entry of [`DPI_OPTIONS`].
///
/// The index is always in range: it is validated on load and only ever
/// moved by wrapping arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DpiSelector {
    index: usize,
}

impl DpiSelector {
    /// Read the selection from the store. A corrupt or erased byte falls back
    /// to the default slot; the store itself is left untouched until the next
    /// change.
    pub fn load(store: &impl ConfigStore) -> Self {
        let config = match KeyboardConfig::try_from(store.read()) {
            Ok(config) => config,
            Err(e) => {
                warn!("DPI config rejected ({:?}) - using default", e);
                KeyboardConfig::DEFAULT
            }
        };
        Self {
            index: config.dpi_index as usize,
        }
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_dpi(&self) -> u16 {
        DPI_OPTIONS[self.index]
    }

    /// Cycle to the next slot (wrapping) and persist it.
    pub fn advance(&mut self, store: &mut impl ConfigStore) -> usize {
        self.index = (self.index + 1) % DPI_OPTIONS.len();
        self.persist(store);
        self.index
    }

    /// Return to the default slot and persist it.
    pub fn reset(&mut self, store: &mut impl ConfigStore) -> usize {
        self.index = DPI_DEFAULT_INDEX as usize;
        self.persist(store);
        self.index
    }

    fn persist(&self, store: &mut impl ConfigStore) {
        let config = KeyboardConfig {
            dpi_index: self.index as u8,
        };
        store.write(config.raw());
        debug!("DPI index {} persisted", self.index);
    }
}
