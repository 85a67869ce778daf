//! Mode arbitration for the two shared trigger buttons.
//!
//! The RGB button and the DPI button each have a short-tap action and a
//! 3-second long-press mode:
//!
//! | Button | Tap                 | Hold ≥ 3 s                                  |
//! |--------|---------------------|---------------------------------------------|
//! | RGB    | next lighting effect| latch hue-adjust (wheel changes hue)        |
//! | DPI    | next DPI step       | arm factory reset, fires after 8 × 300 ms   |
//!
//! All timing is evaluated by [`ModeMachine::tick`] against timestamps stored
//! in the mode itself. Nothing here sleeps or touches hardware: each input
//! returns at most one [`ModeEvent`] for the caller to carry out.
//!
//! Only one mode exists at a time. A trigger press while another mode is
//! active is ignored together with its release, so pressing both buttons at
//! once means the first one wins.

#[cfg(test)]
mod tests;

use crate::config::{HOLD_THRESHOLD_MS, RESET_PULSE_LIMIT, RESET_PULSE_MS};
use crate::timer::{elapsed, Millis};

/// The single active operating mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    #[default]
    Idle,
    /// RGB button held; latches into hue-adjust once the hold threshold passes.
    RgbHoldPending { since: Millis },
    /// Hue-adjust latched. `exit_on_release` is set by the press that will
    /// end the mode; the release that finished the latching hold keeps it.
    RgbHueAdjust { exit_on_release: bool },
    /// DPI button held; arms the factory reset once the hold threshold passes.
    ResetHoldPending { since: Millis },
    /// Factory-reset countdown. `count` pulses so far, last one at `since`.
    ResetConfirm { since: Millis, count: u8 },
}

/// Side effect requested by a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeEvent {
    /// RGB tap: advance the lighting effect once.
    AdvanceEffect,
    HueAdjustEntered,
    HueAdjustExited,
    /// DPI tap: cycle to the next DPI step.
    CycleDpi,
    /// Reset countdown started.
    ResetArmed,
    /// Countdown pulse `n` (1..=7).
    ResetCountdown(u8),
    /// Countdown completed: restore factory defaults.
    FactoryReset,
}

/// What a wheel detent should do in the current mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WheelAction {
    /// Adjust the lighting hue: `true` for up.
    Hue(bool),
    /// Scroll by one notch: `1` up, `-1` down.
    Scroll(i8),
}

/// Mode state machine. One instance per device, driven from the scan loop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModeMachine {
    mode: OperatingMode,
}

impl ModeMachine {
    pub const fn new() -> Self {
        Self {
            mode: OperatingMode::Idle,
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// True while the mode cell should show hue-adjust.
    pub fn hue_indicator(&self) -> bool {
        matches!(self.mode, OperatingMode::RgbHueAdjust { .. })
    }

    /// Factory-reset countdown pulses so far, zero outside the countdown.
    pub fn reset_count(&self) -> u8 {
        match self.mode {
            OperatingMode::ResetConfirm { count, .. } => count,
            _ => 0,
        }
    }

    /// RGB button edge.
    pub fn rgb_button(&mut self, pressed: bool, now: Millis) -> Option<ModeEvent> {
        match (self.mode, pressed) {
            (OperatingMode::Idle, true) => {
                self.enter(OperatingMode::RgbHoldPending { since: now });
                None
            }
            (OperatingMode::RgbHueAdjust { .. }, true) => {
                self.mode = OperatingMode::RgbHueAdjust {
                    exit_on_release: true,
                };
                None
            }
            (OperatingMode::RgbHoldPending { .. }, false) => {
                self.enter(OperatingMode::Idle);
                Some(ModeEvent::AdvanceEffect)
            }
            (
                OperatingMode::RgbHueAdjust {
                    exit_on_release: true,
                },
                false,
            ) => {
                self.enter(OperatingMode::Idle);
                Some(ModeEvent::HueAdjustExited)
            }
            (
                OperatingMode::RgbHueAdjust {
                    exit_on_release: false,
                },
                false,
            ) => None,
            (mode, _) => {
                debug!("RGB button ignored in {:?}", mode);
                None
            }
        }
    }

    /// DPI button edge.
    pub fn dpi_button(&mut self, pressed: bool, now: Millis) -> Option<ModeEvent> {
        match (self.mode, pressed) {
            (OperatingMode::Idle, true) => {
                self.enter(OperatingMode::ResetHoldPending { since: now });
                None
            }
            (OperatingMode::ResetHoldPending { .. }, false) => {
                self.enter(OperatingMode::Idle);
                Some(ModeEvent::CycleDpi)
            }
            // The countdown keeps running after the button comes up.
            (OperatingMode::ResetConfirm { .. }, false) => None,
            (mode, _) => {
                debug!("DPI button ignored in {:?}", mode);
                None
            }
        }
    }

    /// Periodic scan tick.
    pub fn tick(&mut self, now: Millis) -> Option<ModeEvent> {
        match self.mode {
            OperatingMode::RgbHoldPending { since } if hold_elapsed(now, since) => {
                self.enter(OperatingMode::RgbHueAdjust {
                    exit_on_release: false,
                });
                Some(ModeEvent::HueAdjustEntered)
            }
            OperatingMode::ResetHoldPending { since } if hold_elapsed(now, since) => {
                self.enter(OperatingMode::ResetConfirm {
                    since: now,
                    count: 0,
                });
                Some(ModeEvent::ResetArmed)
            }
            OperatingMode::ResetConfirm { since, count } if pulse_due(now, since) => {
                let count = count + 1;
                if count > RESET_PULSE_LIMIT {
                    self.enter(OperatingMode::Idle);
                    Some(ModeEvent::FactoryReset)
                } else {
                    self.mode = OperatingMode::ResetConfirm { since: now, count };
                    trace!("Reset countdown {}", count);
                    Some(ModeEvent::ResetCountdown(count))
                }
            }
            _ => None,
        }
    }

    /// Route one wheel detent.
    pub fn wheel(&self, clockwise: bool) -> WheelAction {
        if self.hue_indicator() {
            WheelAction::Hue(clockwise)
        } else if clockwise {
            WheelAction::Scroll(1)
        } else {
            WheelAction::Scroll(-1)
        }
    }

    fn enter(&mut self, mode: OperatingMode) {
        debug!("Mode: {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }
}

/// A trigger held since `since` has reached the long-press threshold.
fn hold_elapsed(now: Millis, since: Millis) -> bool {
    elapsed(now, since) >= HOLD_THRESHOLD_MS
}

/// The countdown window since the last pulse has strictly passed.
fn pulse_due(now: Millis, since: Millis) -> bool {
    elapsed(now, since) > RESET_PULSE_MS
}
