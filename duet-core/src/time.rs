//! Millisecond timestamps
//!
//! All timers in this crate take a monotonic `u32` millisecond clock that
//! wraps after ~49 days. Differences use wrapping arithmetic so a wrap in
//! the middle of a demo does not stall any timer.

/// Milliseconds since an arbitrary boot instant
pub type Millis = u32;

/// Time elapsed from `since` to `now`, tolerant of clock wrap
#[inline]
pub fn elapsed(now: Millis, since: Millis) -> u32 {
    now.wrapping_sub(since)
}
