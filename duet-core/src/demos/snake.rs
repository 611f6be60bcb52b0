//! Snake handed across the screen edge
//!
//! Same possession rule as the ball, with an integer trail. The receiver
//! rebuilds the trail collapsed behind the head, just off the left edge.

use duet_protocol::SnakeHandoff;

use super::SCREEN_WIDTH;
use crate::config::{Role, Timing};
use crate::time::{elapsed, Millis};

/// Segments in the trail, head first
pub const SNAKE_LEN: usize = 7;

const START_X: i16 = 10;
const START_Y: i16 = 37;
const STEP_X: i16 = 3;
const SEGMENT_SPACING: i16 = 6;
const TOP: i16 = 15;
const BOTTOM: i16 = 60;
const EXIT_X: i16 = SCREEN_WIDTH + 8;
const ENTRY_X: i16 = -4;
const WAIT_DOT_MS: u32 = 300;
const WAIT_DOT_COUNT: u32 = 5;

/// One trail segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segment {
    pub x: i16,
    pub y: i16,
}

impl Segment {
    /// Check if the segment is inside the visible columns
    pub fn is_visible(&self) -> bool {
        (0..=SCREEN_WIDTH).contains(&self.x)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnakeDemo {
    segments: [Segment; SNAKE_LEN],
    vy: i8,
    owned: bool,
    last_move: Millis,
}

/// What the renderer draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SnakeView {
    /// This side holds the snake
    pub owned: bool,
    /// Trail, head first
    pub segments: [Segment; SNAKE_LEN],
    /// Waiting animation, 0-4 dots
    pub waiting_dots: u8,
}

fn collapsed_trail(x: i16, y: i16) -> [Segment; SNAKE_LEN] {
    let mut trail = [Segment::default(); SNAKE_LEN];
    for (i, segment) in trail.iter_mut().enumerate() {
        *segment = Segment {
            x: x - SEGMENT_SPACING * i as i16,
            y,
        };
    }
    trail
}

impl SnakeDemo {
    /// Master holds the snake at the start
    pub fn activate(role: Role, now: Millis) -> Self {
        Self {
            segments: collapsed_trail(START_X, START_Y),
            vy: 1,
            owned: role.is_master(),
            last_move: now,
        }
    }

    pub fn owns_snake(&self) -> bool {
        self.owned
    }

    pub fn head(&self) -> Segment {
        self.segments[0]
    }

    /// Move the trail; returns the handoff when the head leaves the screen
    pub fn tick(&mut self, now: Millis, timing: &Timing) -> Option<SnakeHandoff> {
        if !self.owned {
            return None;
        }

        if elapsed(now, self.last_move) > timing.snake_step_ms {
            let mut head = self.segments[0];
            self.segments.copy_within(0..SNAKE_LEN - 1, 1);

            head.x += STEP_X;
            head.y += self.vy as i16;
            if head.y < TOP {
                head.y = TOP;
                self.vy = 1;
            }
            if head.y > BOTTOM {
                head.y = BOTTOM;
                self.vy = -1;
            }
            self.segments[0] = head;
            self.last_move = now;
        }

        let head = self.segments[0];
        if head.x > EXIT_X {
            self.owned = false;
            return Some(SnakeHandoff::new(head.y, self.vy));
        }
        None
    }

    /// Take the snake from the peer
    pub fn on_handoff(&mut self, handoff: SnakeHandoff, now: Millis) {
        self.segments = collapsed_trail(ENTRY_X, handoff.y);
        self.vy = handoff.vy;
        self.owned = true;
        self.last_move = now;
    }

    pub fn view(&self, now: Millis) -> SnakeView {
        SnakeView {
            owned: self.owned,
            segments: self.segments,
            waiting_dots: ((now / WAIT_DOT_MS) % WAIT_DOT_COUNT) as u8,
        }
    }
}
