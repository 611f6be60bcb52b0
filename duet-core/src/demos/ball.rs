//! Ping-pong ball
//!
//! Exactly one side simulates the ball. When it leaves past the right edge
//! the owner sends its height and vertical speed and stops simulating; the
//! receiver re-enters it from the left.

use duet_protocol::BallHandoff;

use super::SCREEN_WIDTH;
use crate::config::{Role, Timing};
use crate::time::{elapsed, Millis};

/// Horizontal speed, always positive after a handoff
pub const BALL_SPEED_X: f32 = 2.5;

const START_X: f32 = 20.0;
const START_Y: f32 = 32.0;
const START_VY: f32 = 1.5;
const TOP: f32 = 16.0;
const BOTTOM: f32 = 58.0;
const LEFT_WALL: f32 = 4.0;
const EXIT_X: f32 = SCREEN_WIDTH as f32 + 3.0;
const ENTRY_X: f32 = -5.0;

/// Transfer banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Banner {
    Sent,
    Received,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BallDemo {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    owned: bool,
    exchanges: u32,
    banner: Option<(Banner, Millis)>,
    last_step: Millis,
}

/// What the renderer draws
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BallView {
    /// Ball centre, when it is on this screen
    pub position: Option<(i16, i16)>,
    /// Handoffs seen since activation, in either direction
    pub exchanges: u32,
    /// Banner still within its display time
    pub banner: Option<Banner>,
}

impl BallDemo {
    /// Master serves from the left; slave waits for the first handoff
    pub fn activate(role: Role, now: Millis) -> Self {
        Self {
            x: if role.is_master() { START_X } else { ENTRY_X },
            y: START_Y,
            vx: BALL_SPEED_X,
            vy: START_VY,
            owned: role.is_master(),
            exchanges: 0,
            banner: None,
            last_step: now,
        }
    }

    /// Check if this side is simulating the ball
    pub fn owns_ball(&self) -> bool {
        self.owned
    }

    /// Handoffs so far
    pub fn exchanges(&self) -> u32 {
        self.exchanges
    }

    /// Step physics; returns the handoff when the ball leaves the screen
    pub fn tick(&mut self, now: Millis, timing: &Timing) -> Option<BallHandoff> {
        if !self.owned || elapsed(now, self.last_step) < timing.ball_step_ms {
            return None;
        }
        self.last_step = now;

        self.x += self.vx;
        self.y += self.vy;

        if self.y < TOP {
            self.y = TOP;
            self.vy = libm::fabsf(self.vy);
        }
        if self.y > BOTTOM {
            self.y = BOTTOM;
            self.vy = -libm::fabsf(self.vy);
        }
        if self.x < LEFT_WALL {
            self.x = LEFT_WALL;
            self.vx = libm::fabsf(self.vx);
        }

        if self.x > EXIT_X {
            self.owned = false;
            self.exchanges += 1;
            self.banner = Some((Banner::Sent, now));
            return Some(BallHandoff::new(self.y, self.vy));
        }
        None
    }

    /// Take possession of a ball arriving from the peer
    pub fn on_handoff(&mut self, handoff: BallHandoff, now: Millis) {
        self.x = ENTRY_X;
        self.y = handoff.y;
        self.vx = BALL_SPEED_X;
        self.vy = handoff.vy;
        self.owned = true;
        self.exchanges += 1;
        self.banner = Some((Banner::Received, now));
        self.last_step = now;
    }

    pub fn view(&self, now: Millis, timing: &Timing) -> BallView {
        BallView {
            position: self.owned.then(|| (self.x as i16, self.y as i16)),
            exchanges: self.exchanges,
            banner: self
                .banner
                .filter(|(_, since)| elapsed(now, *since) < timing.banner_ms)
                .map(|(banner, _)| banner),
        }
    }
}
