//! Application-wide constants and compile-time configuration.
//!
//! All timing thresholds, DPI options, LED layout, and hardware constants
//! live here so they can be tuned in one place.

// Mode arbitration

/// Hold time on a trigger button before its long-press mode latches (ms).
pub const HOLD_THRESHOLD_MS: u32 = 3000;

/// Period of one factory-reset countdown pulse (ms). The counter advances
/// once per tick where strictly more than this has elapsed.
pub const RESET_PULSE_MS: u32 = 300;

/// Countdown pulses allowed before the factory reset fires on the next one.
pub const RESET_PULSE_LIMIT: u8 = 7;

// DPI

/// Selectable sensor resolutions, in ascending order.
pub const DPI_OPTIONS: [u16; 4] = [1200, 2400, 3600, 5000];

/// Index into [`DPI_OPTIONS`] used on first boot and after a factory reset.
pub const DPI_DEFAULT_INDEX: u8 = 0;

/// Lowest DPI value the status LED still reports (as white).
pub const DPI_INDICATOR_MIN: u16 = 50;

// RGB matrix

/// Total number of RGB cells driven by the LED controller.
pub const LED_COUNT: usize = 14;

/// Cell lit white while hue-adjust mode is active.
pub const MODE_INDICATOR_LED: usize = 13;

/// Cell under the scroll wheel.
pub const WHEEL_LED: usize = 12;

/// Hue change per wheel detent in hue-adjust mode.
pub const HUE_STEP: u8 = 8;

/// Render period of the lighting task (ms).
pub const FRAME_INTERVAL_MS: u64 = 16;

/// 7-bit I²C address of the CKLED2001 LED controller (ADDR pin to GND).
pub const CKLED2001_I2C_ADDR: u8 = 0x74;

// Input scanning

/// Scan (tick) period of the input task (ms).
pub const SCAN_INTERVAL_MS: u64 = 1;

/// Key debounce time (ms).
pub const DEBOUNCE_MS: u16 = 5;

/// Encoder transitions per mechanical detent.
pub const ENCODER_RESOLUTION: i8 = 4;

// GPIO pin assignments (STM32L432KC)
//
// These are logical names; the actual `embassy_stm32::peripherals::*` are
// selected in `firmware/pins.rs`.  Adjust for a revised PCB.
//
//   Status LED red   → PA10 (active low)
//   Status LED green → PA8  (active low)
//   Status LED blue  → PA9  (active low)
//   Button left      → PB0
//   Button right     → PB1
//   Button middle    → PB3
//   Button back      → PB4
//   Button forward   → PB5
//   RGB button       → PA2
//   DPI button       → PA3
//   Encoder A / B    → PA0 / PA1
//   I²C1 SCL / SDA   → PB6 / PB7 (CKLED2001)
//   SPI1             → PA5 SCK, PA6 MISO, PA7 MOSI, PA4 NCS (sensor)
//   USB DM / DP      → PA11 / PA12

/// Number of debounced key inputs (five mouse buttons + two triggers).
pub const KEY_COUNT: usize = 7;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "m1-firmware";
pub const USB_PRODUCT: &str = "M1 Mouse";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms). 1 ms = 1000 Hz.
pub const USB_HID_POLL_MS: u8 = 1;

// Persisted configuration

/// Flash page index where config storage starts (2 KB per page on STM32L4).
pub const STORAGE_FLASH_PAGE_START: u32 = 124;

/// Number of flash pages reserved for config storage.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 4;
