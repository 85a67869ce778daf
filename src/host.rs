//! Primitives the surrounding firmware provides to the mode core.
//!
//! The core never reaches into hardware directly; it only calls through
//! these traits. The embedded binary implements them over real peripherals,
//! host tests implement them with recorders.

use crate::indicator::StatusColor;

/// RGB lighting engine controls.
pub trait LightingEngine {
    /// Advance to the next effect (wraps).
    fn step(&mut self);
    fn increase_hue(&mut self);
    fn decrease_hue(&mut self);
    fn is_enabled(&self) -> bool;
    fn enable(&mut self);
    /// Reinitialise the engine to its power-on defaults.
    fn init(&mut self);
}

/// Pointing sensor sensitivity.
pub trait PointingDevice {
    fn set_cpi(&mut self, cpi: u16);
    fn cpi(&self) -> u16;
}

/// Single-byte keyboard configuration in the framework's key-value store.
///
/// Writes are synchronous from the caller's point of view and cannot fail;
/// an implementation that needs slow I/O must defer it internally.
pub trait ConfigStore {
    fn read(&self) -> u8;
    fn write(&mut self, raw: u8);
    /// Wipe all persisted configuration back to the framework defaults.
    fn reset(&mut self);
}

/// Tri-color status LED.
pub trait StatusLed {
    /// Immediately command `color`. Repeating the same color is a no-op.
    fn set_color(&mut self, color: StatusColor);
}
