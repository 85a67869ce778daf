/// Millisecond timestamp sampled from the scan tick. Wraps after ~49 days.
pub type Millis = u32;

/// Milliseconds from `since` to `now`, correct across one wrap of the counter.
pub fn elapsed(now: Millis, since: Millis) -> u32 {
    now.wrapping_sub(since)
}
