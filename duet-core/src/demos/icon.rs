//! Icon turn-taking
//!
//! The side holding the turn waits one interval, advances to the next icon,
//! sends it and gives up the turn. Receiving an icon grants the turn back.

use duet_protocol::Icon;

use crate::config::{Role, Timing};
use crate::time::{elapsed, Millis};

/// Scale at which a received icon's ring starts growing
const RECEIVE_SCALE_START: f32 = 0.3;
/// Ring radius at full scale
const RING_RADIUS: f32 = 20.0;
/// Full size of the outgoing icon
const ICON_SIZE: f32 = 16.0;

/// Animation currently playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IconActivity {
    Idle,
    /// Outgoing icon shrinking away
    Sending { since: Millis },
    /// Incoming icon with a growing ring
    Receiving { since: Millis },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconDemo {
    icon: Icon,
    my_turn: bool,
    turn_timer: Millis,
    activity: IconActivity,
}

/// What the renderer draws
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IconView {
    /// Last icon sent or received
    pub icon: Icon,
    /// This side sends next
    pub my_turn: bool,
    /// Size of the shrinking outgoing icon, while sending
    pub sending_size: Option<u8>,
    /// Ring radius around a freshly received icon, while it grows
    pub receive_ring: Option<u8>,
    /// The "Received!" caption is showing
    pub received: bool,
}

impl IconDemo {
    /// Master starts with the turn; the icon restarts at heart on both sides
    pub fn activate(role: Role, now: Millis) -> Self {
        Self {
            icon: Icon::Heart,
            my_turn: role.is_master(),
            turn_timer: now,
            activity: IconActivity::Idle,
        }
    }

    pub fn icon(&self) -> Icon {
        self.icon
    }

    pub fn my_turn(&self) -> bool {
        self.my_turn
    }

    pub fn activity(&self) -> IconActivity {
        self.activity
    }

    /// Expire animations and send the next icon when the turn is up
    pub fn tick(&mut self, now: Millis, timing: &Timing) -> Option<Icon> {
        self.activity = match self.activity {
            IconActivity::Sending { since } if elapsed(now, since) > timing.icon_send_anim_ms => {
                IconActivity::Idle
            }
            IconActivity::Receiving { since } if elapsed(now, since) > timing.icon_recv_anim_ms => {
                IconActivity::Idle
            }
            other => other,
        };

        let sending = matches!(self.activity, IconActivity::Sending { .. });
        if !self.my_turn || sending || elapsed(now, self.turn_timer) <= timing.icon_interval_ms {
            return None;
        }

        self.icon = self.icon.next();
        self.my_turn = false;
        self.turn_timer = now;
        self.activity = IconActivity::Sending { since: now };
        Some(self.icon)
    }

    /// Show the peer's icon and take the turn
    pub fn on_icon(&mut self, icon: Icon, now: Millis) {
        self.icon = icon;
        self.my_turn = true;
        self.turn_timer = now;
        self.activity = IconActivity::Receiving { since: now };
    }

    pub fn view(&self, now: Millis, timing: &Timing) -> IconView {
        let mut view = IconView {
            icon: self.icon,
            my_turn: self.my_turn,
            sending_size: None,
            receive_ring: None,
            received: false,
        };

        match self.activity {
            IconActivity::Idle => {}
            IconActivity::Sending { since } => {
                let t = elapsed(now, since) as f32 / timing.icon_send_anim_ms.max(1) as f32;
                if t <= 1.0 {
                    view.sending_size = Some((ICON_SIZE * (1.0 - t)) as u8);
                }
            }
            IconActivity::Receiving { since } => {
                let ms = elapsed(now, since);
                if ms <= timing.icon_recv_anim_ms {
                    view.received = true;
                    // Ring grows over the first third of the animation
                    let grow_ms = (timing.icon_recv_anim_ms / 3).max(1);
                    let scale = if ms < grow_ms {
                        (ms as f32 / grow_ms as f32).max(RECEIVE_SCALE_START)
                    } else {
                        1.0
                    };
                    if scale < 1.0 {
                        view.receive_ring = Some((RING_RADIUS * scale) as u8);
                    }
                }
            }
        }
        view
    }
}
