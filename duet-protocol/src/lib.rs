//! Duet Peer Datagram Protocol
//!
//! This crate defines the radio protocol spoken between the two Duet devices.
//! Every message is a single fixed-size datagram; there is no framing,
//! checksum, sequence number or version field.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌──────┬──────┬─────────────────────┐
//! │ DEMO │ TYPE │ VALUE (i32, LE)     │
//! │ 1B   │ 1B   │ 4B                  │
//! └──────┴──────┴─────────────────────┘
//! ```
//!
//! `VALUE` is an overloaded channel whose meaning depends on `TYPE`. Several
//! message kinds pack more than one field into it with fixed-radix encodings
//! (see [`packing`]). Receivers decode into the typed [`Payload`] sum type
//! immediately so no magic-number unpacking leaks into demo logic.

#![no_std]
#![deny(unsafe_code)]

pub mod demo;
pub mod frame;
pub mod messages;
pub mod packing;

pub use demo::{DemoId, DEMO_COUNT};
pub use frame::{CodecError, Datagram, DATAGRAM_SIZE};
pub use messages::{Message, MsgType, Payload};
pub use packing::{BallHandoff, EyeFrame, EyePhase, Icon, MorseSignal, SnakeHandoff};
