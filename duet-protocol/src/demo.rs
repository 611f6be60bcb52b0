//! Demo identifiers carried in the DEMO byte

/// Number of demos in the rotation
pub const DEMO_COUNT: u8 = 7;

/// The seven demos, in rotation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DemoId {
    /// Mirrored eyes (master drives, slave mirrors)
    #[default]
    Eyes,
    /// Ping-pong ball handed across the screen edge
    Ball,
    /// Icon turn-taking
    Icon,
    /// Counter turn-taking
    Counter,
    /// Seesaw oscillation mirror
    Seesaw,
    /// Morse code exchange
    Morse,
    /// Snake handed across the screen edge
    Snake,
}

impl DemoId {
    /// All demos in rotation order
    pub const ALL: [DemoId; DEMO_COUNT as usize] = [
        DemoId::Eyes,
        DemoId::Ball,
        DemoId::Icon,
        DemoId::Counter,
        DemoId::Seesaw,
        DemoId::Morse,
        DemoId::Snake,
    ];

    /// Map any index onto the rotation (`index mod 7`)
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index % DEMO_COUNT) as usize]
    }

    /// Map a sync value onto the rotation
    ///
    /// Negative values wrap the same way as positive ones.
    pub fn from_sync_value(value: i32) -> Self {
        Self::ALL[value.rem_euclid(DEMO_COUNT as i32) as usize]
    }

    /// Rotation index of this demo (0-6)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Next demo in the rotation
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Header name shown while the demo runs
    pub fn name(self) -> &'static str {
        match self {
            DemoId::Eyes => "EYES",
            DemoId::Ball => "PING-PONG",
            DemoId::Icon => "EMOJI",
            DemoId::Counter => "COUNTER",
            DemoId::Seesaw => "SEESAW",
            DemoId::Morse => "MORSE",
            DemoId::Snake => "SNAKE",
        }
    }
}
