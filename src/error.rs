//! Unified error type for m1-firmware.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the firmware.
///
/// The mode state machine itself never produces one of these; they come from
/// decoding persisted data and from the embedded drivers around the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Config
    /// The persisted configuration byte names a DPI slot that does not exist.
    InvalidDpiIndex(u8),

    // Storage
    /// Flash read/write/erase failed.
    Storage,

    // Peripherals
    /// I²C transaction to the CKLED2001 failed.
    LedDriver,

    /// SPI transaction to the motion sensor failed.
    Sensor,

    /// USB stack returned an error.
    Usb,
}
