//! Message kinds and typed payloads
//!
//! The wire carries a kind byte plus an overloaded `i32`. This module turns
//! that pair into [`Payload`], one variant per kind with strongly-typed
//! fields, and back.

use crate::demo::DemoId;
use crate::frame::{CodecError, Datagram, DATAGRAM_SIZE};
use crate::packing::{BallHandoff, EyeFrame, Icon, MorseSignal, SnakeHandoff};

// Message type IDs
pub const MSG_PAIR_REQ: u8 = 0;
pub const MSG_PAIR_ACK: u8 = 1;
pub const MSG_BALL: u8 = 2;
pub const MSG_ICON: u8 = 3;
pub const MSG_COUNTER: u8 = 4;
pub const MSG_DEMO_SYNC: u8 = 5;
pub const MSG_SEESAW: u8 = 6;
pub const MSG_MORSE: u8 = 7;
pub const MSG_SNAKE: u8 = 8;
pub const MSG_EYE: u8 = 9;

/// Message kinds known to this protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MsgType {
    PairRequest,
    PairAck,
    Ball,
    Icon,
    Counter,
    DemoSync,
    Seesaw,
    Morse,
    Snake,
    Eye,
}

impl MsgType {
    /// Parse a kind from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            MSG_PAIR_REQ => Some(MsgType::PairRequest),
            MSG_PAIR_ACK => Some(MsgType::PairAck),
            MSG_BALL => Some(MsgType::Ball),
            MSG_ICON => Some(MsgType::Icon),
            MSG_COUNTER => Some(MsgType::Counter),
            MSG_DEMO_SYNC => Some(MsgType::DemoSync),
            MSG_SEESAW => Some(MsgType::Seesaw),
            MSG_MORSE => Some(MsgType::Morse),
            MSG_SNAKE => Some(MsgType::Snake),
            MSG_EYE => Some(MsgType::Eye),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            MsgType::PairRequest => MSG_PAIR_REQ,
            MsgType::PairAck => MSG_PAIR_ACK,
            MsgType::Ball => MSG_BALL,
            MsgType::Icon => MSG_ICON,
            MsgType::Counter => MSG_COUNTER,
            MsgType::DemoSync => MSG_DEMO_SYNC,
            MsgType::Seesaw => MSG_SEESAW,
            MsgType::Morse => MSG_MORSE,
            MsgType::Snake => MSG_SNAKE,
            MsgType::Eye => MSG_EYE,
        }
    }
}

/// Decoded message payload
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Payload {
    /// Discovery broadcast
    PairRequest,
    /// Reply to a discovery broadcast
    PairAck,
    /// Ball crossed into the receiver's screen
    Ball(BallHandoff),
    /// Icon sent; receiver gets the turn
    Icon(Icon),
    /// Counter value sent; receiver gets the turn
    Counter(i32),
    /// Master switched demos; value is the raw demo index
    DemoSync(i32),
    /// Sender's current seesaw offset
    Seesaw(i8),
    /// Morse symbol or end-of-message marker
    Morse(MorseSignal),
    /// Snake crossed into the receiver's screen
    Snake(SnakeHandoff),
    /// Master eye state
    Eye(EyeFrame),
    /// Structurally valid but unknown kind; never dispatched
    Unrecognized { msg_type: u8, value: i32 },
}

impl Payload {
    /// The demo an in-demo payload belongs to
    ///
    /// Pairing, sync and unrecognized payloads are not tied to a demo.
    pub fn demo(&self) -> Option<DemoId> {
        match self {
            Payload::Eye(_) => Some(DemoId::Eyes),
            Payload::Ball(_) => Some(DemoId::Ball),
            Payload::Icon(_) => Some(DemoId::Icon),
            Payload::Counter(_) => Some(DemoId::Counter),
            Payload::Seesaw(_) => Some(DemoId::Seesaw),
            Payload::Morse(_) => Some(DemoId::Morse),
            Payload::Snake(_) => Some(DemoId::Snake),
            Payload::PairRequest
            | Payload::PairAck
            | Payload::DemoSync(_)
            | Payload::Unrecognized { .. } => None,
        }
    }

    /// Split into wire kind byte and VALUE
    pub fn to_wire(&self) -> (u8, i32) {
        match self {
            Payload::PairRequest => (MSG_PAIR_REQ, 0),
            Payload::PairAck => (MSG_PAIR_ACK, 0),
            Payload::Ball(ball) => (MSG_BALL, ball.pack()),
            Payload::Icon(icon) => (MSG_ICON, icon.to_value()),
            Payload::Counter(count) => (MSG_COUNTER, *count),
            Payload::DemoSync(index) => (MSG_DEMO_SYNC, *index),
            Payload::Seesaw(offset) => (MSG_SEESAW, *offset as i32),
            Payload::Morse(signal) => (MSG_MORSE, signal.to_value()),
            Payload::Snake(snake) => (MSG_SNAKE, snake.pack()),
            Payload::Eye(frame) => (MSG_EYE, frame.pack()),
            Payload::Unrecognized { msg_type, value } => (*msg_type, *value),
        }
    }

    /// Build a payload from a wire kind byte and VALUE
    pub fn from_wire(msg_type: u8, value: i32) -> Result<Self, CodecError> {
        let Some(kind) = MsgType::from_byte(msg_type) else {
            return Ok(Payload::Unrecognized { msg_type, value });
        };

        Ok(match kind {
            MsgType::PairRequest => Payload::PairRequest,
            MsgType::PairAck => Payload::PairAck,
            MsgType::Ball => Payload::Ball(BallHandoff::unpack(value)?),
            MsgType::Icon => Payload::Icon(Icon::from_value(value)?),
            MsgType::Counter => Payload::Counter(value),
            MsgType::DemoSync => Payload::DemoSync(value),
            MsgType::Seesaw => {
                let offset = i8::try_from(value).map_err(|_| CodecError::InvalidValue)?;
                Payload::Seesaw(offset)
            }
            MsgType::Morse => Payload::Morse(MorseSignal::from_value(value)),
            MsgType::Snake => Payload::Snake(SnakeHandoff::unpack(value)?),
            MsgType::Eye => Payload::Eye(EyeFrame::unpack(value)?),
        })
    }
}

/// A complete message: demo tag plus typed payload
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message {
    /// Demo index the sender believed active
    pub demo_mode: u8,
    /// Decoded payload
    pub payload: Payload,
}

impl Message {
    /// Create a new message
    pub fn new(demo_mode: u8, payload: Payload) -> Self {
        Self { demo_mode, payload }
    }

    /// Convert to a raw datagram
    pub fn to_datagram(&self) -> Datagram {
        let (msg_type, value) = self.payload.to_wire();
        Datagram::new(self.demo_mode, msg_type, value)
    }

    /// Parse from a raw datagram
    pub fn from_datagram(datagram: &Datagram) -> Result<Self, CodecError> {
        Ok(Self {
            demo_mode: datagram.demo_mode,
            payload: Payload::from_wire(datagram.msg_type, datagram.value)?,
        })
    }

    /// Encode to wire bytes
    pub fn to_bytes(&self) -> [u8; DATAGRAM_SIZE] {
        self.to_datagram().encode()
    }

    /// Decode from received bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::from_datagram(&Datagram::decode(bytes)?)
    }
}
