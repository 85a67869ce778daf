//! Host-testable core of the M1 firmware.
//!
//! Everything that decides *what* the mouse does lives here: the shared
//! RGB/DPI button state machine, DPI selection and persistence, the status
//! LED, the lighting engine and its mode overlay, key debouncing, wheel
//! decoding and the USB mouse report. None of it touches a peripheral
//! directly, so it builds and tests on the host.
//!
//! Usage: `cargo test --lib` or `cargo test`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and links against this library; the Embassy glue lives in
//! `src/firmware/` and is only compiled with the `embedded` feature.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

// ═══════════════════════════════════════════════════════════════════════════
// Configuration & shared types
// ═══════════════════════════════════════════════════════════════════════════

pub mod config;
pub mod error;
pub mod host;
pub mod timer;

pub use error::Error;

// ═══════════════════════════════════════════════════════════════════════════
// Mode core
// ═══════════════════════════════════════════════════════════════════════════

pub mod dpi;
pub mod indicator;
pub mod keyboard;
pub mod mode;
pub mod overlay;

// ═══════════════════════════════════════════════════════════════════════════
// Lighting, input and HID
// ═══════════════════════════════════════════════════════════════════════════

pub mod debounce;
pub mod encoder;
pub mod hid;
pub mod lighting;
pub mod sensor;
