//! Board pin bundles.
//!
//! Keys and encoder are read by polling from the scan task, so plain
//! inputs with pull-ups are enough (all switches are active-low).

use embassy_stm32::gpio::{AnyPin, Input, Pull};
use m1_firmware::config::KEY_COUNT;

/// Inputs in the order of `m1_firmware::keyboard::KEYMAP`.
pub struct KeyPins {
    keys: [Input<'static>; KEY_COUNT],
}

impl KeyPins {
    pub fn new(pins: [AnyPin; KEY_COUNT]) -> Self {
        Self {
            keys: pins.map(|pin| Input::new(pin, Pull::Up)),
        }
    }

    /// Raw pressed state of every key.
    pub fn read(&self) -> [bool; KEY_COUNT] {
        let mut raw = [false; KEY_COUNT];
        for (state, pin) in raw.iter_mut().zip(self.keys.iter()) {
            *state = pin.is_low();
        }
        raw
    }
}

pub struct EncoderPins {
    a: Input<'static>,
    b: Input<'static>,
}

impl EncoderPins {
    pub fn new(a: AnyPin, b: AnyPin) -> Self {
        Self {
            a: Input::new(a, Pull::Up),
            b: Input::new(b, Pull::Up),
        }
    }

    /// `(a, b)` levels, `true` when the contact is closed.
    pub fn read(&self) -> (bool, bool) {
        (self.a.is_low(), self.b.is_low())
    }
}
