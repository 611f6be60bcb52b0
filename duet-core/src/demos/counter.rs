//! Shared counter
//!
//! Sides take turns incrementing a counter. Values older than the local
//! one are stale (duplicated or reordered) and are dropped.

use crate::config::{Role, Timing};
use crate::time::{elapsed, Millis};

/// Counter values per progress-bar cycle
pub const COUNTER_BAR_CYCLE: i32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterDemo {
    value: i32,
    my_turn: bool,
    timer: Millis,
}

/// What the renderer draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CounterView {
    pub value: i32,
    pub my_turn: bool,
    /// Position in the progress bar, `0..COUNTER_BAR_CYCLE`
    pub progress: u8,
}

impl CounterDemo {
    /// Counter restarts at zero; master counts first
    pub fn activate(role: Role, now: Millis) -> Self {
        Self {
            value: 0,
            my_turn: role.is_master(),
            timer: now,
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn my_turn(&self) -> bool {
        self.my_turn
    }

    /// Increment and send when the turn is up
    pub fn tick(&mut self, now: Millis, timing: &Timing) -> Option<i32> {
        if !self.my_turn || elapsed(now, self.timer) <= timing.counter_interval_ms {
            return None;
        }
        self.value = self.value.saturating_add(1);
        self.my_turn = false;
        self.timer = now;
        Some(self.value)
    }

    /// Adopt the peer's value and take the turn
    ///
    /// Returns false and changes nothing if `value` is below the local one.
    pub fn on_count(&mut self, value: i32, now: Millis) -> bool {
        if value < self.value {
            return false;
        }
        self.value = value;
        self.my_turn = true;
        self.timer = now;
        true
    }

    pub fn view(&self) -> CounterView {
        CounterView {
            value: self.value,
            my_turn: self.my_turn,
            progress: self.value.rem_euclid(COUNTER_BAR_CYCLE) as u8,
        }
    }
}
