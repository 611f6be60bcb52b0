//! Mirrored eyes
//!
//! The master animates gaze, blink and layout and streams every frame. The
//! slave is receive-only and shows whatever frame arrived last.

use duet_protocol::{EyeFrame, EyePhase};

use crate::config::{Role, Timing};
use crate::time::{elapsed, Millis};

/// Horizontal gaze amplitude
const GAZE_X: f32 = 8.0;
/// Vertical gaze amplitude
const GAZE_Y: f32 = 4.0;
/// Vertical gaze frequency relative to horizontal
const GAZE_Y_RATE: f32 = 1.3;

#[derive(Debug, Clone, PartialEq)]
pub struct EyesDemo {
    role: Role,
    started: Millis,
    blinking: bool,
    blink_timer: Millis,
    last_send: Millis,
    received: EyeFrame,
}

impl EyesDemo {
    pub fn activate(role: Role, now: Millis) -> Self {
        Self {
            role,
            started: now,
            blinking: false,
            blink_timer: now,
            last_send: now,
            received: EyeFrame::default(),
        }
    }

    /// Frame the master would send at `now`
    fn animate(&self, now: Millis, timing: &Timing) -> EyeFrame {
        let since = elapsed(now, self.started);
        let t = since as f32 / timing.eye_period_ms.max(1) as f32;
        let ox = (libm::sinf(t) * GAZE_X) as i8;
        let oy = (libm::cosf(t * GAZE_Y_RATE) * GAZE_Y) as i8;
        let phase = if since < timing.eye_phase_ms {
            EyePhase::Pair
        } else {
            EyePhase::Single
        };
        EyeFrame::new(phase, ox, oy, self.blinking)
    }

    /// Run the blink timer and stream frames (master only)
    pub fn tick(&mut self, now: Millis, timing: &Timing) -> Option<EyeFrame> {
        if !self.role.is_master() {
            return None;
        }

        let since_blink = elapsed(now, self.blink_timer);
        if !self.blinking && since_blink > timing.eye_blink_interval_ms {
            self.blinking = true;
            self.blink_timer = now;
        } else if self.blinking && since_blink > timing.eye_blink_ms {
            self.blinking = false;
            self.blink_timer = now;
        }

        if elapsed(now, self.last_send) <= timing.eye_send_ms {
            return None;
        }
        self.last_send = now;
        Some(self.animate(now, timing))
    }

    /// Store a frame from the master
    ///
    /// The master drives its own eyes, so it declines frames.
    pub fn on_frame(&mut self, frame: EyeFrame) -> bool {
        if self.role.is_master() {
            return false;
        }
        self.received = frame;
        true
    }

    pub fn view(&self, now: Millis, timing: &Timing) -> EyeFrame {
        if self.role.is_master() {
            self.animate(now, timing)
        } else {
            self.received
        }
    }
}
