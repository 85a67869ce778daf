//! Per-key defer debouncer.
//!
//! A key's registered state only flips after the raw input has disagreed
//! with it continuously for [`DEBOUNCE_MS`]. Any bounce back to the
//! registered state restarts the wait.

use heapless::Vec;

use crate::config::DEBOUNCE_MS;
use crate::timer::Millis;

/// A debounced press or release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyChange {
    pub key: usize,
    pub pressed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DebounceCounter {
    Idle,
    /// Raw state differs from the registered one since this timestamp.
    Debouncing(u16),
}

pub struct Debouncer<const N: usize> {
    pressed: [bool; N],
    counters: [DebounceCounter; N],
}

impl<const N: usize> Default for Debouncer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Debouncer<N> {
    pub const fn new() -> Self {
        Self {
            pressed: [false; N],
            counters: [DebounceCounter::Idle; N],
        }
    }

    /// Registered (debounced) state of `key`.
    pub fn is_pressed(&self, key: usize) -> bool {
        self.pressed.get(key).copied().unwrap_or(false)
    }

    /// Feed one scan of raw key states and collect the changes it commits.
    pub fn update(&mut self, raw: &[bool; N], now: Millis) -> Vec<KeyChange, N> {
        let now = now as u16;
        let mut changes = Vec::new();

        for key in 0..N {
            if raw[key] == self.pressed[key] {
                self.counters[key] = DebounceCounter::Idle;
                continue;
            }

            match self.counters[key] {
                DebounceCounter::Idle => {
                    self.counters[key] = DebounceCounter::Debouncing(now);
                }
                DebounceCounter::Debouncing(start) => {
                    if now.wrapping_sub(start) >= DEBOUNCE_MS {
                        self.counters[key] = DebounceCounter::Idle;
                        self.pressed[key] = raw[key];
                        // Capacity is N and each key pushes at most once.
                        let _ = changes.push(KeyChange {
                            key,
                            pressed: raw[key],
                        });
                    }
                }
            }
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_press_commits_after_threshold() {
        let mut d = Debouncer::<2>::new();
        assert!(d.update(&[true, false], 0).is_empty());
        assert!(d.update(&[true, false], 4).is_empty());
        let changes = d.update(&[true, false], 5);
        assert_eq!(changes.as_slice(), &[KeyChange { key: 0, pressed: true }]);
        assert!(d.is_pressed(0));
        assert!(!d.is_pressed(1));
    }

    #[test]
    fn chatter_restarts_the_wait() {
        let mut d = Debouncer::<1>::new();
        d.update(&[true], 0);
        d.update(&[false], 3);
        d.update(&[true], 4);
        assert!(d.update(&[true], 8).is_empty());
        assert_eq!(d.update(&[true], 9).len(), 1);
    }

    #[test]
    fn release_is_debounced_too() {
        let mut d = Debouncer::<1>::new();
        d.update(&[true], 0);
        d.update(&[true], 5);
        assert!(d.update(&[false], 10).is_empty());
        let changes = d.update(&[false], 15);
        assert_eq!(changes.as_slice(), &[KeyChange { key: 0, pressed: false }]);
    }

    #[test]
    fn out_of_range_key_reads_released() {
        let d = Debouncer::<1>::new();
        assert!(!d.is_pressed(7));
    }
}
