//! Protocol intervals
//!
//! Every timer the node runs, in milliseconds. Both peers should use the
//! same values.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timer configuration shared by pairing, rotation and the demos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Timing {
    /// Discovery broadcast interval while searching
    pub pair_interval_ms: u32,
    /// How long each demo runs before the master rotates
    pub demo_duration_ms: u32,
    /// Ball physics step
    pub ball_step_ms: u32,
    /// SEND/RECV banner lifetime
    pub banner_ms: u32,
    /// Icon turn length
    pub icon_interval_ms: u32,
    /// Outgoing icon animation
    pub icon_send_anim_ms: u32,
    /// Incoming icon animation
    pub icon_recv_anim_ms: u32,
    /// Counter turn length
    pub counter_interval_ms: u32,
    /// Seesaw offset broadcast interval
    pub seesaw_send_ms: u32,
    /// Divisor turning elapsed ms into the seesaw sine argument
    pub seesaw_period_ms: u32,
    /// Delay between morse symbols
    pub morse_symbol_ms: u32,
    /// Snake step
    pub snake_step_ms: u32,
    /// Eye frame broadcast interval
    pub eye_send_ms: u32,
    /// Time between blinks
    pub eye_blink_interval_ms: u32,
    /// Length of one blink
    pub eye_blink_ms: u32,
    /// Time spent in the two-eye phase before switching to one large eye
    pub eye_phase_ms: u32,
    /// Divisor turning elapsed ms into the eye sine argument
    pub eye_period_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            pair_interval_ms: 500,
            demo_duration_ms: 10_000,
            ball_step_ms: 20,
            banner_ms: 2_000,
            icon_interval_ms: 2_000,
            icon_send_anim_ms: 500,
            icon_recv_anim_ms: 1_500,
            counter_interval_ms: 800,
            seesaw_send_ms: 50,
            seesaw_period_ms: 1_400,
            morse_symbol_ms: 300,
            snake_step_ms: 60,
            eye_send_ms: 50,
            eye_blink_interval_ms: 2_500,
            eye_blink_ms: 180,
            eye_phase_ms: 3_000,
            eye_period_ms: 1_500,
        }
    }
}
