//! HID report types for the USB mouse interface.

pub mod mouse;

pub use mouse::{update_buttons, MouseButton, MouseReport, MOUSE_REPORT_DESCRIPTOR};
