//! Tri-color DPI status LED.
//!
//! The LED is wired common-anode: a channel lights when its pin is driven
//! low. The commanded color is a pure function of the active DPI value.

use embedded_hal::digital::OutputPin;

use crate::config::DPI_INDICATOR_MIN;
use crate::host::StatusLed;

/// Colors the status LED can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusColor {
    Off,
    Red,
    Green,
    Blue,
    White,
}

impl StatusColor {
    /// Map a DPI value onto the status color for its band in `table`.
    ///
    /// ```text
    /// [50, d0] → White   (d0, d1] → Blue   (d1, d2] → Green   (d2, d3] → Red
    /// ```
    ///
    /// Values outside every band return `None` and the LED should be left as
    /// it is.
    pub fn for_dpi(dpi: u16, table: &[u16; 4]) -> Option<Self> {
        let [d0, d1, d2, d3] = *table;
        if (DPI_INDICATOR_MIN..=d0).contains(&dpi) {
            Some(Self::White)
        } else if dpi > d0 && dpi <= d1 {
            Some(Self::Blue)
        } else if dpi > d1 && dpi <= d2 {
            Some(Self::Green)
        } else if dpi > d2 && dpi <= d3 {
            Some(Self::Red)
        } else {
            None
        }
    }

    /// Channel states as `(red, green, blue)`, `true` meaning lit.
    pub const fn channels(self) -> (bool, bool, bool) {
        match self {
            Self::Off => (false, false, false),
            Self::Red => (true, false, false),
            Self::Green => (false, true, false),
            Self::Blue => (false, false, true),
            Self::White => (true, true, true),
        }
    }
}

/// Status LED driven by three active-low GPIOs.
pub struct StatusPins<R, G, B> {
    red: R,
    green: G,
    blue: B,
    color: StatusColor,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> StatusPins<R, G, B> {
    /// Take the pins and switch every channel off.
    pub fn new(red: R, green: G, blue: B) -> Self {
        let mut pins = Self {
            red,
            green,
            blue,
            color: StatusColor::Off,
        };
        pins.drive(StatusColor::Off);
        pins
    }

    /// Last commanded color.
    pub fn color(&self) -> StatusColor {
        self.color
    }

    fn drive(&mut self, color: StatusColor) {
        let (r, g, b) = color.channels();
        // The status LED has no error path; a failed pin write is dropped.
        let _ = drive_low_active(&mut self.red, r);
        let _ = drive_low_active(&mut self.green, g);
        let _ = drive_low_active(&mut self.blue, b);
        self.color = color;
    }
}

fn drive_low_active<P: OutputPin>(pin: &mut P, lit: bool) -> Result<(), P::Error> {
    if lit {
        pin.set_low()
    } else {
        pin.set_high()
    }
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> StatusLed for StatusPins<R, G, B> {
    fn set_color(&mut self, color: StatusColor) {
        trace!("Status LED -> {:?}", color);
        self.drive(color);
    }
}
