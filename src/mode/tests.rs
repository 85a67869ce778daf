//! Unit tests for the mode state machine.
//!
//! Timestamps are plain milliseconds; every test drives the machine the way
//! the scan loop does: button edges interleaved with ticks.

use super::*;

/// Tick every `step` ms from `from` up to and including `to`, collecting events.
fn tick_through(
    m: &mut ModeMachine,
    from: Millis,
    to: Millis,
    step: Millis,
) -> heapless::Vec<(Millis, ModeEvent), 32> {
    let mut events = heapless::Vec::new();
    let mut now = from;
    while now <= to {
        if let Some(e) = m.tick(now) {
            let _ = events.push((now, e));
        }
        now += step;
    }
    events
}

// ═══════════════════════════════════════════════════════════════════════════
// RGB button
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn starts_idle() {
    let m = ModeMachine::new();
    assert_eq!(m.mode(), OperatingMode::Idle);
    assert!(!m.hue_indicator());
    assert_eq!(m.reset_count(), 0);
}

#[test]
fn rgb_press_arms_hold_timer() {
    let mut m = ModeMachine::new();
    assert_eq!(m.rgb_button(true, 100), None);
    assert_eq!(m.mode(), OperatingMode::RgbHoldPending { since: 100 });
}

#[test]
fn rgb_short_tap_advances_effect_once() {
    let mut m = ModeMachine::new();
    m.rgb_button(true, 0);
    assert!(tick_through(&mut m, 1, 2999, 1).is_empty());
    assert_eq!(m.rgb_button(false, 2999), Some(ModeEvent::AdvanceEffect));
    assert_eq!(m.mode(), OperatingMode::Idle);
    // Nothing left armed
    assert!(tick_through(&mut m, 3000, 8000, 10).is_empty());
}

#[test]
fn rgb_hold_latches_exactly_at_threshold() {
    let mut m = ModeMachine::new();
    m.rgb_button(true, 1000);
    assert_eq!(m.tick(3999), None);
    assert_eq!(m.tick(4000), Some(ModeEvent::HueAdjustEntered));
    assert!(m.hue_indicator());
    // Fires once only
    assert_eq!(m.tick(9000), None);
}

#[test]
fn rgb_latch_detected_on_first_tick_past_threshold() {
    let mut m = ModeMachine::new();
    m.rgb_button(true, 0);
    assert_eq!(m.tick(2000), None);
    // Coarse tick jumps well past 3000
    assert_eq!(m.tick(3700), Some(ModeEvent::HueAdjustEntered));
}

#[test]
fn release_after_latch_keeps_hue_adjust() {
    let mut m = ModeMachine::new();
    m.rgb_button(true, 0);
    m.tick(3000);
    assert_eq!(m.rgb_button(false, 3100), None);
    assert_eq!(
        m.mode(),
        OperatingMode::RgbHueAdjust {
            exit_on_release: false
        }
    );
    assert!(m.hue_indicator());
}

#[test]
fn next_rgb_tap_exits_hue_adjust_without_stepping() {
    let mut m = ModeMachine::new();
    m.rgb_button(true, 0);
    m.tick(3000);
    m.rgb_button(false, 3100);

    assert_eq!(m.rgb_button(true, 5000), None);
    assert!(m.hue_indicator());
    assert_eq!(m.rgb_button(false, 5050), Some(ModeEvent::HueAdjustExited));
    assert_eq!(m.mode(), OperatingMode::Idle);
    assert!(!m.hue_indicator());
}

#[test]
fn hue_adjust_survives_long_holds_of_the_exit_press() {
    let mut m = ModeMachine::new();
    m.rgb_button(true, 0);
    m.tick(3000);
    m.rgb_button(false, 3100);
    m.rgb_button(true, 4000);
    // No new hold timer while latched
    assert!(tick_through(&mut m, 4000, 12000, 50).is_empty());
    assert_eq!(m.rgb_button(false, 12000), Some(ModeEvent::HueAdjustExited));
}

#[test]
fn hue_latch_then_tap_scenario() {
    // press A, +3000, release A, press A, release A -> Idle with one hue exit
    // and no effect steps.
    let mut m = ModeMachine::new();
    let mut events: heapless::Vec<ModeEvent, 8> = heapless::Vec::new();
    let mut record = |e: Option<ModeEvent>| {
        if let Some(e) = e {
            let _ = events.push(e);
        }
    };

    record(m.rgb_button(true, 0));
    record(m.tick(3000));
    record(m.rgb_button(false, 3001));
    record(m.rgb_button(true, 3002));
    record(m.rgb_button(false, 3003));

    assert_eq!(m.mode(), OperatingMode::Idle);
    assert_eq!(
        events.as_slice(),
        &[ModeEvent::HueAdjustEntered, ModeEvent::HueAdjustExited]
    );
    assert!(!events.contains(&ModeEvent::AdvanceEffect));
}

#[test]
fn tap_after_hue_exit_is_a_plain_tap_again() {
    let mut m = ModeMachine::new();
    m.rgb_button(true, 0);
    m.tick(3000);
    m.rgb_button(false, 3001);
    m.rgb_button(true, 3002);
    m.rgb_button(false, 3003);

    m.rgb_button(true, 4000);
    assert_eq!(m.rgb_button(false, 4100), Some(ModeEvent::AdvanceEffect));
}

// ═══════════════════════════════════════════════════════════════════════════
// DPI button
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn dpi_short_tap_cycles_dpi() {
    let mut m = ModeMachine::new();
    assert_eq!(m.dpi_button(true, 10), None);
    assert_eq!(m.mode(), OperatingMode::ResetHoldPending { since: 10 });
    assert_eq!(m.tick(3009), None);
    assert_eq!(m.dpi_button(false, 3009), Some(ModeEvent::CycleDpi));
    assert_eq!(m.mode(), OperatingMode::Idle);
}

#[test]
fn dpi_hold_arms_reset_countdown() {
    let mut m = ModeMachine::new();
    m.dpi_button(true, 0);
    assert_eq!(m.tick(3000), Some(ModeEvent::ResetArmed));
    assert_eq!(m.mode(), OperatingMode::ResetConfirm { since: 3000, count: 0 });
    assert_eq!(m.reset_count(), 0);
}

#[test]
fn release_does_not_leave_reset_confirm() {
    let mut m = ModeMachine::new();
    m.dpi_button(true, 0);
    m.tick(3000);
    assert_eq!(m.dpi_button(false, 3050), None);
    assert!(matches!(m.mode(), OperatingMode::ResetConfirm { .. }));
}

#[test]
fn countdown_pulse_needs_strictly_more_than_window() {
    let mut m = ModeMachine::new();
    m.dpi_button(true, 0);
    m.tick(3000);
    assert_eq!(m.tick(3300), None);
    assert_eq!(m.tick(3301), Some(ModeEvent::ResetCountdown(1)));
    assert_eq!(m.reset_count(), 1);
}

#[test]
fn factory_reset_fires_once_on_eighth_pulse() {
    let mut m = ModeMachine::new();
    m.dpi_button(true, 0);
    m.tick(3000);
    m.dpi_button(false, 3010);

    let events = tick_through(&mut m, 3001, 12000, 1);
    let resets: heapless::Vec<_, 32> = events
        .iter()
        .filter(|(_, e)| *e == ModeEvent::FactoryReset)
        .collect();
    assert_eq!(resets.len(), 1);

    let countdown: heapless::Vec<u8, 32> = events
        .iter()
        .filter_map(|(_, e)| match e {
            ModeEvent::ResetCountdown(n) => Some(*n),
            _ => None,
        })
        .collect();
    assert_eq!(countdown.as_slice(), &[1, 2, 3, 4, 5, 6, 7]);

    // Eighth pulse, each pulse 301 ms after the previous one
    assert_eq!(resets[0].0, 3000 + 8 * 301);
    assert_eq!(m.mode(), OperatingMode::Idle);
    assert_eq!(m.reset_count(), 0);
}

#[test]
fn reset_count_tracks_pulses() {
    let mut m = ModeMachine::new();
    m.dpi_button(true, 0);
    m.tick(3000);
    m.tick(3400);
    m.tick(3800);
    assert_eq!(m.reset_count(), 2);
}

#[test]
fn dpi_presses_during_countdown_are_ignored() {
    let mut m = ModeMachine::new();
    m.dpi_button(true, 0);
    m.tick(3000);
    m.dpi_button(false, 3010);
    assert_eq!(m.dpi_button(true, 3100), None);
    assert_eq!(m.dpi_button(false, 3150), None);
    assert!(matches!(m.mode(), OperatingMode::ResetConfirm { .. }));
}

// ═══════════════════════════════════════════════════════════════════════════
// Arbitration
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn second_trigger_is_ignored_while_first_is_held() {
    let mut m = ModeMachine::new();
    m.rgb_button(true, 0);
    assert_eq!(m.dpi_button(true, 10), None);
    assert_eq!(m.dpi_button(false, 20), None);
    assert_eq!(m.mode(), OperatingMode::RgbHoldPending { since: 0 });
    assert_eq!(m.rgb_button(false, 30), Some(ModeEvent::AdvanceEffect));
}

#[test]
fn rgb_ignored_during_reset_hold() {
    let mut m = ModeMachine::new();
    m.dpi_button(true, 0);
    assert_eq!(m.rgb_button(true, 5), None);
    assert_eq!(m.rgb_button(false, 6), None);
    assert_eq!(m.mode(), OperatingMode::ResetHoldPending { since: 0 });
}

#[test]
fn rgb_ignored_during_countdown() {
    let mut m = ModeMachine::new();
    m.dpi_button(true, 0);
    m.tick(3000);
    assert_eq!(m.rgb_button(true, 3100), None);
    assert_eq!(m.rgb_button(false, 3200), None);
    assert!(matches!(m.mode(), OperatingMode::ResetConfirm { .. }));
}

#[test]
fn stray_releases_in_idle_do_nothing() {
    let mut m = ModeMachine::new();
    assert_eq!(m.rgb_button(false, 0), None);
    assert_eq!(m.dpi_button(false, 0), None);
    assert_eq!(m.mode(), OperatingMode::Idle);
}

#[test]
fn hold_timer_survives_counter_wrap() {
    let mut m = ModeMachine::new();
    let start = u32::MAX - 1000;
    m.rgb_button(true, start);
    assert_eq!(m.tick(start.wrapping_add(2999)), None);
    assert_eq!(m.tick(start.wrapping_add(3000)), Some(ModeEvent::HueAdjustEntered));
}

// ═══════════════════════════════════════════════════════════════════════════
// Wheel routing
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn wheel_scrolls_outside_hue_adjust() {
    let mut m = ModeMachine::new();
    assert_eq!(m.wheel(true), WheelAction::Scroll(1));
    assert_eq!(m.wheel(false), WheelAction::Scroll(-1));
    m.rgb_button(true, 0);
    assert_eq!(m.wheel(true), WheelAction::Scroll(1));
}

#[test]
fn wheel_adjusts_hue_while_latched() {
    let mut m = ModeMachine::new();
    m.rgb_button(true, 0);
    m.tick(3000);
    assert_eq!(m.wheel(true), WheelAction::Hue(true));
    m.rgb_button(false, 3100);
    assert_eq!(m.wheel(false), WheelAction::Hue(false));
}
