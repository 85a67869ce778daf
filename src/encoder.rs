//! Quadrature decoder for the scroll wheel.

use crate::config::ENCODER_RESOLUTION;

/// Direction of each A/B transition, indexed by `(prev << 2) | next`.
/// Invalid (double-step) transitions are 0.
const TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

pub struct QuadratureDecoder {
    state: u8,
    pulses: i8,
    resolution: i8,
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new(ENCODER_RESOLUTION)
    }
}

impl QuadratureDecoder {
    pub const fn new(resolution: i8) -> Self {
        Self {
            state: 0,
            pulses: 0,
            resolution,
        }
    }

    /// Seed the decoder with the pin levels read at startup.
    pub fn with_initial(mut self, a: bool, b: bool) -> Self {
        self.state = pack(a, b);
        self
    }

    /// Sample the pins. Returns `Some(true)` for a clockwise detent,
    /// `Some(false)` for counter-clockwise.
    pub fn update(&mut self, a: bool, b: bool) -> Option<bool> {
        let next = pack(a, b);
        if next == self.state {
            return None;
        }

        self.pulses += TRANSITIONS[((self.state << 2) | next) as usize];
        self.state = next;

        if self.pulses >= self.resolution {
            self.pulses = 0;
            Some(true)
        } else if self.pulses <= -self.resolution {
            self.pulses = 0;
            Some(false)
        } else {
            None
        }
    }
}

fn pack(a: bool, b: bool) -> u8 {
    ((a as u8) << 1) | b as u8
}
