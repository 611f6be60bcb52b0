//! Rotation timer
//!
//! The rotation is anchored to the pairing epoch: `started_at` only ever
//! advances by whole demo durations on the master, so the active demo is
//! always `floor((now - epoch) / duration) mod 7` no matter how irregular
//! the polling is.

use duet_protocol::{DemoId, DEMO_COUNT};

use crate::time::{elapsed, Millis};

/// Active demo and when it started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DemoSession {
    /// Demo currently running
    pub current: DemoId,
    /// When the current demo started
    pub started_at: Millis,
}

/// Demo rotation scheduler
#[derive(Debug, Clone)]
pub struct DemoScheduler {
    session: DemoSession,
    duration_ms: u32,
}

impl DemoScheduler {
    /// Create a scheduler; nothing rotates until [`start`](Self::start)
    pub fn new(duration_ms: u32) -> Self {
        Self {
            session: DemoSession::default(),
            duration_ms: duration_ms.max(1),
        }
    }

    /// Begin the rotation at the first demo
    pub fn start(&mut self, now: Millis) {
        self.session = DemoSession {
            current: DemoId::Eyes,
            started_at: now,
        };
    }

    /// Current session
    pub fn session(&self) -> DemoSession {
        self.session
    }

    /// Demo currently running
    pub fn current(&self) -> DemoId {
        self.session.current
    }

    /// Configured demo length
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Time spent in the current demo
    pub fn elapsed_ms(&self, now: Millis) -> u32 {
        elapsed(now, self.session.started_at)
    }

    /// Time left before the master rotates
    pub fn remaining_ms(&self, now: Millis) -> u32 {
        self.duration_ms.saturating_sub(self.elapsed_ms(now))
    }

    /// Advance the rotation if the current demo has expired (master side)
    ///
    /// Returns the new demo when at least one period elapsed. Several
    /// missed periods collapse into one switch to the right demo.
    pub fn poll(&mut self, now: Millis) -> Option<DemoId> {
        let periods = self.elapsed_ms(now) / self.duration_ms;
        if periods == 0 {
            return None;
        }

        let steps = (periods % DEMO_COUNT as u32) as u8;
        let next = DemoId::from_index(self.session.current.index() + steps);
        self.session = DemoSession {
            current: next,
            started_at: self
                .session
                .started_at
                .wrapping_add(periods.wrapping_mul(self.duration_ms)),
        };
        Some(next)
    }

    /// Apply a received `DemoSync` value (slave side)
    pub fn apply_sync(&mut self, value: i32, now: Millis) -> DemoId {
        let demo = DemoId::from_sync_value(value);
        self.switch_to(demo, now);
        demo
    }

    /// Jump straight to `demo`, restarting its timer
    pub fn switch_to(&mut self, demo: DemoId, now: Millis) {
        self.session = DemoSession {
            current: demo,
            started_at: now,
        };
    }
}
