//! Mode indicators painted over the lighting engine's frame.

use crate::config::MODE_INDICATOR_LED;
use crate::lighting::{Frame, OFF, RED, WHITE};

/// Overlay the mode indicators onto an already rendered `frame`.
///
/// - The mode cell is white while hue-adjust is active, off otherwise.
/// - While the factory-reset countdown is running (`reset_count > 0`) every
///   other cell flashes: off on odd counts, red on even counts.
pub fn apply(frame: &mut Frame, hue_indicator: bool, reset_count: u8) {
    frame[MODE_INDICATOR_LED] = if hue_indicator { WHITE } else { OFF };

    if reset_count > 0 {
        let flash = if reset_count % 2 == 1 { OFF } else { RED };
        for cell in frame[..MODE_INDICATOR_LED].iter_mut() {
            *cell = flash;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LED_COUNT;
    use smart_leds::RGB8;

    const BLUE: RGB8 = RGB8 {
        r: 0,
        g: 0,
        b: 0xFF,
    };

    #[test]
    fn idle_only_touches_mode_cell() {
        let mut frame = [BLUE; LED_COUNT];
        apply(&mut frame, false, 0);
        assert_eq!(frame[MODE_INDICATOR_LED], OFF);
        assert!(frame[..MODE_INDICATOR_LED].iter().all(|c| *c == BLUE));
    }

    #[test]
    fn hue_indicator_lights_mode_cell_white() {
        let mut frame = [BLUE; LED_COUNT];
        apply(&mut frame, true, 0);
        assert_eq!(frame[MODE_INDICATOR_LED], WHITE);
    }

    #[test]
    fn reset_countdown_alternates_by_parity() {
        let mut frame = [BLUE; LED_COUNT];
        apply(&mut frame, false, 1);
        assert!(frame[..MODE_INDICATOR_LED].iter().all(|c| *c == OFF));

        let mut frame = [BLUE; LED_COUNT];
        apply(&mut frame, false, 2);
        assert!(frame[..MODE_INDICATOR_LED].iter().all(|c| *c == RED));
        assert_eq!(frame[MODE_INDICATOR_LED], OFF);
    }

    #[test]
    fn same_inputs_same_frame() {
        let mut a = [BLUE; LED_COUNT];
        let mut b = [BLUE; LED_COUNT];
        apply(&mut a, true, 5);
        apply(&mut b, true, 5);
        apply(&mut b, true, 5);
        assert_eq!(a, b);
    }
}
