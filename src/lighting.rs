//! RGB matrix lighting engine.
//!
//! Renders one of a handful of animated effects into a [`Frame`] of
//! [`LED_COUNT`] cells. The mode core drives it through [`LightingEngine`];
//! the lighting task calls [`RgbMatrix::render`] once per frame and then
//! lays the mode overlay on top.

use smart_leds::hsv::{hsv2rgb, Hsv};
use smart_leds::{brightness, RGB8};

use crate::config::{HUE_STEP, LED_COUNT};
use crate::host::LightingEngine;
use crate::timer::Millis;

pub const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };
pub const WHITE: RGB8 = RGB8 {
    r: 0xFF,
    g: 0xFF,
    b: 0xFF,
};
pub const RED: RGB8 = RGB8 {
    r: 0xFF,
    g: 0,
    b: 0,
};

/// One rendered frame, indexed by LED cell.
pub type Frame = [RGB8; LED_COUNT];

/// Animated effects, in `step()` order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    SolidColor,
    Breathing,
    CycleAll,
    CycleLeftRight,
    RainbowWheel,
}

impl Effect {
    const ALL: [Effect; 5] = [
        Effect::SolidColor,
        Effect::Breathing,
        Effect::CycleAll,
        Effect::CycleLeftRight,
        Effect::RainbowWheel,
    ];

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|e| *e == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

/// Lighting engine state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbMatrix {
    enabled: bool,
    effect: Effect,
    hue: u8,
    sat: u8,
    val: u8,
    /// Animation speed divider: higher is slower.
    speed_shift: u8,
}

impl Default for RgbMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl RgbMatrix {
    pub const fn new() -> Self {
        Self {
            enabled: true,
            effect: Effect::SolidColor,
            hue: 0,
            sat: 0xFF,
            val: 0xFF,
            speed_shift: 4,
        }
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn hue(&self) -> u8 {
        self.hue
    }

    fn color(&self, hue: u8) -> RGB8 {
        hsv2rgb(Hsv {
            hue,
            sat: self.sat,
            val: self.val,
        })
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Paint every cell for the animation time `now`.
    pub fn render(&self, now: Millis, frame: &mut Frame) {
        if !self.enabled {
            frame.fill(OFF);
            return;
        }

        let time = (now >> self.speed_shift) as u8;
        match self.effect {
            Effect::SolidColor => frame.fill(self.color(self.hue)),
            Effect::Breathing => {
                let cells = core::iter::repeat(self.color(self.hue));
                for (cell, c) in frame.iter_mut().zip(brightness(cells, triangle8(time))) {
                    *cell = c;
                }
            }
            Effect::CycleAll => frame.fill(self.color(self.hue.wrapping_add(time))),
            Effect::CycleLeftRight => {
                for (i, cell) in frame.iter_mut().enumerate() {
                    let offset = (i * 256 / LED_COUNT) as u8;
                    *cell = self.color(self.hue.wrapping_add(offset).wrapping_sub(time));
                }
            }
            Effect::RainbowWheel => {
                for (i, cell) in frame.iter_mut().enumerate() {
                    let offset = (i * 256 / LED_COUNT) as u8;
                    *cell = self.color(offset.wrapping_add(time));
                }
            }
        }
    }
}

impl LightingEngine for RgbMatrix {
    fn step(&mut self) {
        self.effect = self.effect.next();
        info!("RGB effect -> {:?}", self.effect);
    }

    fn increase_hue(&mut self) {
        self.hue = self.hue.wrapping_add(HUE_STEP);
    }

    fn decrease_hue(&mut self) {
        self.hue = self.hue.wrapping_sub(HUE_STEP);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn init(&mut self) {
        *self = Self::new();
        info!("RGB matrix reinitialised");
    }
}

/// 0 → 255 → 0 over one `u8` period.
fn triangle8(x: u8) -> u8 {
    if x < 128 {
        x << 1
    } else {
        (255 - x) << 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breathing_starts_dark_and_peaks_mid_period() {
        let mut rgb = RgbMatrix::new();
        rgb.step();
        assert_eq!(rgb.effect(), Effect::Breathing);

        let mut frame = [WHITE; LED_COUNT];
        rgb.render(0, &mut frame);
        assert!(frame.iter().all(|c| *c == OFF));

        // time = now >> 4 = 127, the top of the triangle
        rgb.render(127 << 4, &mut frame);
        assert!(frame.iter().all(|c| c.r > 0xF0 && c.g == 0 && c.b == 0));
    }

    #[test]
    fn rainbow_wheel_spreads_hue_across_cells() {
        let mut rgb = RgbMatrix::new();
        while rgb.effect() != Effect::RainbowWheel {
            rgb.step();
        }
        let mut frame = [OFF; LED_COUNT];
        rgb.render(0, &mut frame);
        assert_eq!(frame[0], RED);
        assert_ne!(frame[0], frame[LED_COUNT / 2]);
    }

    #[test]
    fn step_cycles_through_all_effects() {
        let mut rgb = RgbMatrix::new();
        let start = rgb.effect();
        for _ in 0..Effect::ALL.len() {
            rgb.step();
        }
        assert_eq!(rgb.effect(), start);
        rgb.step();
        assert_eq!(rgb.effect(), Effect::Breathing);
    }

    #[test]
    fn hue_steps_wrap() {
        let mut rgb = RgbMatrix::new();
        rgb.decrease_hue();
        assert_eq!(rgb.hue(), 0u8.wrapping_sub(HUE_STEP));
        rgb.increase_hue();
        rgb.increase_hue();
        assert_eq!(rgb.hue(), HUE_STEP);
    }

    #[test]
    fn disabled_engine_renders_black() {
        let mut rgb = RgbMatrix::new();
        rgb.disable();
        let mut frame = [WHITE; LED_COUNT];
        rgb.render(1234, &mut frame);
        assert!(frame.iter().all(|c| *c == OFF));
    }

    #[test]
    fn init_restores_defaults() {
        let mut rgb = RgbMatrix::new();
        rgb.step();
        rgb.increase_hue();
        rgb.disable();
        rgb.init();
        assert_eq!(rgb, RgbMatrix::new());
        assert!(rgb.is_enabled());
    }

    #[test]
    fn solid_color_fills_every_cell() {
        let rgb = RgbMatrix::new();
        let mut frame = [OFF; LED_COUNT];
        rgb.render(0, &mut frame);
        assert!(frame.iter().all(|c| *c == RED));
    }

    #[test]
    fn triangle_peaks_mid_period() {
        assert_eq!(triangle8(0), 0);
        assert_eq!(triangle8(127), 254);
        assert_eq!(triangle8(255), 0);
    }
}
