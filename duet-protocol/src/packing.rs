//! Fixed-radix packing of multi-field payloads
//!
//! Several message kinds carry more than one number in the single `i32`
//! VALUE field. Each field is scaled and offset into its own disjoint decimal
//! range, so packing is lossless as long as fields are clamped to their
//! domain first:
//!
//! | Kind  | Layout                                              |
//! |-------|-----------------------------------------------------|
//! | Ball  | `floor(y*100) * 100 + (round(vy*10) + 50)`          |
//! | Snake | `y * 10 + (vy + 5)`                                 |
//! | Eye   | `phase*100000 + (ox+20)*1000 + (oy+20)*10 + blink`  |

use crate::frame::CodecError;

/// Largest packable ball height, in hundredths
const BALL_Y_CENTI_MAX: i32 = 19_999;
/// Ball vertical velocity range, in tenths
const BALL_VY_TENTHS_MIN: i32 = -50;
const BALL_VY_TENTHS_MAX: i32 = 49;
const BALL_VY_BIAS: i32 = 50;

/// Largest packable snake row
const SNAKE_Y_MAX: i16 = 9_999;
const SNAKE_VY_MIN: i8 = -5;
const SNAKE_VY_MAX: i8 = 4;
const SNAKE_VY_BIAS: i32 = 5;

/// Gaze offset range on either axis
pub const EYE_OFFSET_MIN: i8 = -20;
pub const EYE_OFFSET_MAX: i8 = 19;
const EYE_OFFSET_BIAS: i32 = 20;

/// Morse end-of-message marker value
pub const MORSE_END_VALUE: i32 = 99;

/// Ball state handed to the peer when it leaves the visible region
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BallHandoff {
    /// Vertical position in pixels
    pub y: f32,
    /// Vertical velocity in pixels per step
    pub vy: f32,
}

impl BallHandoff {
    /// Create a handoff, clamping both fields to the packable domain
    pub fn new(y: f32, vy: f32) -> Self {
        Self {
            y: y.clamp(0.0, BALL_Y_CENTI_MAX as f32 / 100.0),
            vy: vy.clamp(
                BALL_VY_TENTHS_MIN as f32 / 10.0,
                BALL_VY_TENTHS_MAX as f32 / 10.0,
            ),
        }
    }

    /// Pack into a VALUE field
    pub fn pack(&self) -> i32 {
        let y_centi = (libm::floorf(self.y * 100.0) as i32).clamp(0, BALL_Y_CENTI_MAX);
        let vy_tenths = (libm::roundf(self.vy * 10.0) as i32)
            .clamp(BALL_VY_TENTHS_MIN, BALL_VY_TENTHS_MAX);
        y_centi * 100 + vy_tenths + BALL_VY_BIAS
    }

    /// Unpack from a VALUE field
    pub fn unpack(value: i32) -> Result<Self, CodecError> {
        if !(0..=BALL_Y_CENTI_MAX * 100 + 99).contains(&value) {
            return Err(CodecError::InvalidValue);
        }
        Ok(Self {
            y: (value / 100) as f32 / 100.0,
            vy: ((value % 100) - BALL_VY_BIAS) as f32 / 10.0,
        })
    }
}

/// Snake head state handed to the peer when it leaves the visible region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SnakeHandoff {
    /// Head row in pixels
    pub y: i16,
    /// Vertical step per move
    pub vy: i8,
}

impl SnakeHandoff {
    /// Create a handoff, clamping both fields to the packable domain
    pub fn new(y: i16, vy: i8) -> Self {
        Self {
            y: y.clamp(0, SNAKE_Y_MAX),
            vy: vy.clamp(SNAKE_VY_MIN, SNAKE_VY_MAX),
        }
    }

    /// Pack into a VALUE field
    pub fn pack(&self) -> i32 {
        let y = self.y.clamp(0, SNAKE_Y_MAX) as i32;
        let vy = self.vy.clamp(SNAKE_VY_MIN, SNAKE_VY_MAX) as i32;
        y * 10 + vy + SNAKE_VY_BIAS
    }

    /// Unpack from a VALUE field
    pub fn unpack(value: i32) -> Result<Self, CodecError> {
        if !(0..=SNAKE_Y_MAX as i32 * 10 + 9).contains(&value) {
            return Err(CodecError::InvalidValue);
        }
        Ok(Self {
            y: (value / 10) as i16,
            vy: (value % 10 - SNAKE_VY_BIAS) as i8,
        })
    }
}

/// Eye layout phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EyePhase {
    /// Two small eyes side by side
    #[default]
    Pair,
    /// One large centred eye
    Single,
}

/// One frame of master-driven eye state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EyeFrame {
    /// Layout phase
    pub phase: EyePhase,
    /// Horizontal pupil offset
    pub ox: i8,
    /// Vertical pupil offset
    pub oy: i8,
    /// Eyelids closed
    pub blink: bool,
}

impl EyeFrame {
    /// Create a frame, clamping offsets to [`EYE_OFFSET_MIN`]..=[`EYE_OFFSET_MAX`]
    pub fn new(phase: EyePhase, ox: i8, oy: i8, blink: bool) -> Self {
        Self {
            phase,
            ox: ox.clamp(EYE_OFFSET_MIN, EYE_OFFSET_MAX),
            oy: oy.clamp(EYE_OFFSET_MIN, EYE_OFFSET_MAX),
            blink,
        }
    }

    /// Pack into a VALUE field
    pub fn pack(&self) -> i32 {
        let phase = match self.phase {
            EyePhase::Pair => 0,
            EyePhase::Single => 1,
        };
        let ox = self.ox.clamp(EYE_OFFSET_MIN, EYE_OFFSET_MAX) as i32 + EYE_OFFSET_BIAS;
        let oy = self.oy.clamp(EYE_OFFSET_MIN, EYE_OFFSET_MAX) as i32 + EYE_OFFSET_BIAS;
        phase * 100_000 + ox * 1_000 + oy * 10 + self.blink as i32
    }

    /// Unpack from a VALUE field
    pub fn unpack(value: i32) -> Result<Self, CodecError> {
        if value < 0 {
            return Err(CodecError::InvalidValue);
        }

        let phase = match value / 100_000 {
            0 => EyePhase::Pair,
            1 => EyePhase::Single,
            _ => return Err(CodecError::InvalidValue),
        };
        let ox = (value / 1_000) % 100 - EYE_OFFSET_BIAS;
        let oy = (value / 10) % 100 - EYE_OFFSET_BIAS;
        let blink = match value % 10 {
            0 => false,
            1 => true,
            _ => return Err(CodecError::InvalidValue),
        };

        let range = EYE_OFFSET_MIN as i32..=EYE_OFFSET_MAX as i32;
        if !range.contains(&ox) || !range.contains(&oy) {
            return Err(CodecError::InvalidValue);
        }

        Ok(Self {
            phase,
            ox: ox as i8,
            oy: oy as i8,
            blink,
        })
    }
}

/// A single Morse symbol or the end-of-message marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MorseSignal {
    /// Short mark
    Dot,
    /// Long mark
    Dash,
    /// Sequence complete, receiver takes over sending
    End,
}

impl MorseSignal {
    /// Wire value
    pub fn to_value(self) -> i32 {
        match self {
            MorseSignal::Dot => 0,
            MorseSignal::Dash => 1,
            MorseSignal::End => MORSE_END_VALUE,
        }
    }

    /// Parse a wire value; anything that is neither a dot nor the end
    /// marker reads as a dash
    pub fn from_value(value: i32) -> Self {
        match value {
            0 => MorseSignal::Dot,
            MORSE_END_VALUE => MorseSignal::End,
            _ => MorseSignal::Dash,
        }
    }

    /// Parse a `.`/`-` character
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(MorseSignal::Dot),
            '-' => Some(MorseSignal::Dash),
            _ => None,
        }
    }

    /// Display character (`.`, `-`, or `|` for the end marker)
    pub fn as_char(self) -> char {
        match self {
            MorseSignal::Dot => '.',
            MorseSignal::Dash => '-',
            MorseSignal::End => '|',
        }
    }
}

/// Icons exchanged in the emoji demo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Icon {
    #[default]
    Heart,
    Star,
    Smile,
}

impl Icon {
    /// Wire value
    pub fn to_value(self) -> i32 {
        self as i32
    }

    /// Parse a wire value
    pub fn from_value(value: i32) -> Result<Self, CodecError> {
        match value {
            0 => Ok(Icon::Heart),
            1 => Ok(Icon::Star),
            2 => Ok(Icon::Smile),
            _ => Err(CodecError::InvalidValue),
        }
    }

    /// The icon sent after this one
    pub fn next(self) -> Self {
        match self {
            Icon::Heart => Icon::Star,
            Icon::Star => Icon::Smile,
            Icon::Smile => Icon::Heart,
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Icon::Heart => "Heart",
            Icon::Star => "Star",
            Icon::Smile => "Smile",
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ball_example_values() {
        let packed = BallHandoff::new(32.5, 1.2).pack();
        assert_eq!(packed, 3250 * 100 + 62);

        let ball = BallHandoff::unpack(packed).unwrap();
        assert!((ball.y - 32.5).abs() <= 0.01);
        assert!((ball.vy - 1.2).abs() <= 0.1);
    }

    #[test]
    fn test_ball_negative_velocity() {
        let ball = BallHandoff::unpack(BallHandoff::new(58.0, -1.5).pack()).unwrap();
        assert!((ball.y - 58.0).abs() <= 0.01);
        assert!((ball.vy + 1.5).abs() <= 0.1);
    }

    #[test]
    fn test_ball_velocity_clamped() {
        let ball = BallHandoff::new(20.0, 12.0);
        assert_eq!(ball.vy, 4.9);
        let decoded = BallHandoff::unpack(ball.pack()).unwrap();
        assert!((decoded.vy - 4.9).abs() <= 0.1);
    }

    #[test]
    fn test_ball_rejects_negative() {
        assert_eq!(BallHandoff::unpack(-1), Err(CodecError::InvalidValue));
    }

    #[test]
    fn test_snake_layout() {
        assert_eq!(SnakeHandoff::new(37, 1).pack(), 376);
        assert_eq!(SnakeHandoff::new(60, -1).pack(), 604);
        assert_eq!(
            SnakeHandoff::unpack(604).unwrap(),
            SnakeHandoff { y: 60, vy: -1 }
        );
    }

    #[test]
    fn test_snake_rejects_out_of_range() {
        assert_eq!(SnakeHandoff::unpack(379).unwrap().vy, 4);
        assert_eq!(SnakeHandoff::unpack(-5), Err(CodecError::InvalidValue));
        assert_eq!(SnakeHandoff::unpack(100_000), Err(CodecError::InvalidValue));
    }

    #[test]
    fn test_eye_layout() {
        let frame = EyeFrame::new(EyePhase::Single, -3, 2, true);
        assert_eq!(frame.pack(), 100_000 + 17_000 + 220 + 1);
    }

    #[test]
    fn test_eye_offsets_clamped() {
        let frame = EyeFrame::new(EyePhase::Pair, 40, -40, false);
        assert_eq!(frame.ox, EYE_OFFSET_MAX);
        assert_eq!(frame.oy, EYE_OFFSET_MIN);
    }

    #[test]
    fn test_eye_rejects_bad_fields() {
        assert_eq!(EyeFrame::unpack(200_000), Err(CodecError::InvalidValue));
        assert_eq!(EyeFrame::unpack(20_202), Err(CodecError::InvalidValue));
        assert_eq!(EyeFrame::unpack(-1), Err(CodecError::InvalidValue));
    }

    #[test]
    fn test_morse_values() {
        assert_eq!(MorseSignal::from_value(0), MorseSignal::Dot);
        assert_eq!(MorseSignal::from_value(1), MorseSignal::Dash);
        assert_eq!(MorseSignal::from_value(7), MorseSignal::Dash);
        assert_eq!(MorseSignal::from_value(99), MorseSignal::End);
        assert_eq!(MorseSignal::End.to_value(), 99);
    }

    #[test]
    fn test_icon_cycle() {
        assert_eq!(Icon::Heart.next(), Icon::Star);
        assert_eq!(Icon::Smile.next(), Icon::Heart);
        assert_eq!(Icon::from_value(3), Err(CodecError::InvalidValue));
    }

    proptest! {
        #[test]
        fn prop_ball_roundtrip(y_centi in 1600i32..5800, vy_tenths in -50i32..50) {
            let y = y_centi as f32 / 100.0;
            let vy = vy_tenths as f32 / 10.0;
            let decoded = BallHandoff::unpack(BallHandoff::new(y, vy).pack()).unwrap();
            prop_assert!((decoded.y - y).abs() <= 0.011);
            prop_assert!((decoded.vy - vy).abs() <= 0.1);
        }

        #[test]
        fn prop_snake_roundtrip(y in 0i16..200, vy in -5i8..=4) {
            let handoff = SnakeHandoff::new(y, vy);
            prop_assert_eq!(SnakeHandoff::unpack(handoff.pack()).unwrap(), handoff);
        }

        #[test]
        fn prop_eye_roundtrip(
            single in any::<bool>(),
            ox in EYE_OFFSET_MIN..=EYE_OFFSET_MAX,
            oy in EYE_OFFSET_MIN..=EYE_OFFSET_MAX,
            blink in any::<bool>(),
        ) {
            let phase = if single { EyePhase::Single } else { EyePhase::Pair };
            let frame = EyeFrame::new(phase, ox, oy, blink);
            prop_assert_eq!(EyeFrame::unpack(frame.pack()).unwrap(), frame);
        }
    }
}
