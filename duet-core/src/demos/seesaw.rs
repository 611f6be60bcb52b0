//! Seesaw
//!
//! Both sides derive the plank tilt from the same clock function, so they
//! agree without any handshake. Offsets are still exchanged so each side
//! can show what the peer believes.

use crate::config::{Role, Timing};
use crate::time::{elapsed, Millis};

/// Peak plank tilt in pixels
const AMPLITUDE: f32 = 12.0;
/// Tilt beyond which one side counts as heavy
const BALANCE_THRESHOLD: i8 = 4;

/// Which end is down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Balance {
    MasterHeavy,
    SlaveHeavy,
    Balanced,
}

impl Balance {
    /// Classify a plank offset
    pub fn from_offset(offset: i8) -> Self {
        if offset > BALANCE_THRESHOLD {
            Balance::MasterHeavy
        } else if offset < -BALANCE_THRESHOLD {
            Balance::SlaveHeavy
        } else {
            Balance::Balanced
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeesawDemo {
    started: Millis,
    last_send: Millis,
    peer_offset: Option<i8>,
}

/// What the renderer draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SeesawView {
    /// Local tilt; positive lowers the master's end
    pub offset: i8,
    /// Last tilt reported by the peer
    pub peer_offset: Option<i8>,
    pub balance: Balance,
}

impl SeesawDemo {
    pub fn activate(_role: Role, now: Millis) -> Self {
        Self {
            started: now,
            last_send: now,
            peer_offset: None,
        }
    }

    /// Plank tilt at `now`
    pub fn offset(&self, now: Millis, timing: &Timing) -> i8 {
        let t = elapsed(now, self.started) as f32 / timing.seesaw_period_ms.max(1) as f32;
        (libm::sinf(t) * AMPLITUDE) as i8
    }

    pub fn peer_offset(&self) -> Option<i8> {
        self.peer_offset
    }

    /// Broadcast the local tilt at the send interval
    pub fn tick(&mut self, now: Millis, timing: &Timing) -> Option<i8> {
        if elapsed(now, self.last_send) <= timing.seesaw_send_ms {
            return None;
        }
        self.last_send = now;
        Some(self.offset(now, timing))
    }

    /// Record the peer's tilt; display only
    pub fn on_offset(&mut self, offset: i8) {
        self.peer_offset = Some(offset);
    }

    pub fn view(&self, now: Millis, timing: &Timing) -> SeesawView {
        let offset = self.offset(now, timing);
        SeesawView {
            offset,
            peer_offset: self.peer_offset,
            balance: Balance::from_offset(offset),
        }
    }
}
