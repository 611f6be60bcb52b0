//! Per-demo protocols
//!
//! Each demo is a small state machine with the same surface:
//!
//! - `activate(role, now, ..)` builds the canonical starting state
//! - `tick(now, timing)` advances local timers and may emit one payload
//! - `on_*` applies a payload received from the peer
//! - `view(now, timing)` exposes what the renderer needs
//!
//! [`DemoState`] holds exactly one active demo and dispatches by variant.
//! Rotation replaces it wholesale, so no demo state leaks into the next.

pub mod ball;
pub mod counter;
pub mod eyes;
pub mod icon;
pub mod morse;
pub mod seesaw;
pub mod snake;

use duet_protocol::{DemoId, EyeFrame, Payload};

use crate::config::{Role, Timing};
use crate::time::Millis;

pub use ball::{BallDemo, BallView, Banner};
pub use counter::{CounterDemo, CounterView, COUNTER_BAR_CYCLE};
pub use eyes::EyesDemo;
pub use icon::{IconActivity, IconDemo, IconView};
pub use morse::{MorseDemo, MorseView, MORSE_BUFFER_LEN};
pub use seesaw::{Balance, SeesawDemo, SeesawView};
pub use snake::{Segment, SnakeDemo, SnakeView, SNAKE_LEN};

/// Visible screen width in pixels
pub const SCREEN_WIDTH: i16 = 128;

/// Visible screen height in pixels
pub const SCREEN_HEIGHT: i16 = 64;

/// The active demo and its sub-state
#[derive(Debug, Clone, PartialEq)]
pub enum DemoState {
    Eyes(EyesDemo),
    Ball(BallDemo),
    Icon(IconDemo),
    Counter(CounterDemo),
    Seesaw(SeesawDemo),
    Morse(MorseDemo),
    Snake(SnakeDemo),
}

/// Render-ready view of the active demo
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DemoView {
    Eyes(EyeFrame),
    Ball(BallView),
    Icon(IconView),
    Counter(CounterView),
    Seesaw(SeesawView),
    Morse(MorseView),
    Snake(SnakeView),
}

impl DemoState {
    /// Build the canonical starting state of `demo` for this role
    pub fn activate(demo: DemoId, role: Role, now: Millis) -> Self {
        match demo {
            DemoId::Eyes => DemoState::Eyes(EyesDemo::activate(role, now)),
            DemoId::Ball => DemoState::Ball(BallDemo::activate(role, now)),
            DemoId::Icon => DemoState::Icon(IconDemo::activate(role, now)),
            DemoId::Counter => DemoState::Counter(CounterDemo::activate(role, now)),
            DemoId::Seesaw => DemoState::Seesaw(SeesawDemo::activate(role, now)),
            DemoId::Morse => DemoState::Morse(MorseDemo::activate(role, now)),
            DemoId::Snake => DemoState::Snake(SnakeDemo::activate(role, now)),
        }
    }

    /// Which demo this is
    pub fn id(&self) -> DemoId {
        match self {
            DemoState::Eyes(_) => DemoId::Eyes,
            DemoState::Ball(_) => DemoId::Ball,
            DemoState::Icon(_) => DemoId::Icon,
            DemoState::Counter(_) => DemoId::Counter,
            DemoState::Seesaw(_) => DemoId::Seesaw,
            DemoState::Morse(_) => DemoId::Morse,
            DemoState::Snake(_) => DemoId::Snake,
        }
    }

    /// Advance timers; returns a payload for the peer when one is due
    pub fn tick(&mut self, now: Millis, timing: &Timing) -> Option<Payload> {
        match self {
            DemoState::Eyes(demo) => demo.tick(now, timing).map(Payload::Eye),
            DemoState::Ball(demo) => demo.tick(now, timing).map(Payload::Ball),
            DemoState::Icon(demo) => demo.tick(now, timing).map(Payload::Icon),
            DemoState::Counter(demo) => demo.tick(now, timing).map(Payload::Counter),
            DemoState::Seesaw(demo) => demo.tick(now, timing).map(Payload::Seesaw),
            DemoState::Morse(demo) => demo.tick(now, timing).map(Payload::Morse),
            DemoState::Snake(demo) => demo.tick(now, timing).map(Payload::Snake),
        }
    }

    /// Apply a payload from the peer
    ///
    /// Returns false when the payload belongs to another demo or the demo
    /// declines it (stale counter value, eye frame sent to the master).
    pub fn on_message(&mut self, payload: &Payload, now: Millis) -> bool {
        match (self, payload) {
            (DemoState::Eyes(demo), Payload::Eye(frame)) => demo.on_frame(*frame),
            (DemoState::Ball(demo), Payload::Ball(handoff)) => {
                demo.on_handoff(*handoff, now);
                true
            }
            (DemoState::Icon(demo), Payload::Icon(icon)) => {
                demo.on_icon(*icon, now);
                true
            }
            (DemoState::Counter(demo), Payload::Counter(value)) => demo.on_count(*value, now),
            (DemoState::Seesaw(demo), Payload::Seesaw(offset)) => {
                demo.on_offset(*offset);
                true
            }
            (DemoState::Morse(demo), Payload::Morse(signal)) => demo.on_signal(*signal, now),
            (DemoState::Snake(demo), Payload::Snake(handoff)) => {
                demo.on_handoff(*handoff, now);
                true
            }
            _ => false,
        }
    }

    /// Snapshot for the renderer
    pub fn view(&self, now: Millis, timing: &Timing) -> DemoView {
        match self {
            DemoState::Eyes(demo) => DemoView::Eyes(demo.view(now, timing)),
            DemoState::Ball(demo) => DemoView::Ball(demo.view(now, timing)),
            DemoState::Icon(demo) => DemoView::Icon(demo.view(now, timing)),
            DemoState::Counter(demo) => DemoView::Counter(demo.view()),
            DemoState::Seesaw(demo) => DemoView::Seesaw(demo.view(now, timing)),
            DemoState::Morse(demo) => DemoView::Morse(demo.view(now)),
            DemoState::Snake(demo) => DemoView::Snake(demo.view(now)),
        }
    }
}
