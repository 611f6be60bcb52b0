//! Transport-agnostic logic for a duet node
//!
//! This crate contains everything a node does that does not depend on a
//! particular radio, socket or screen:
//!
//! - Link abstraction trait (broadcast, unicast, peer registration)
//! - Pairing handshake
//! - Master-driven demo rotation
//! - The seven per-demo protocols
//! - The [`Node`] container tying them together
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod demos;
pub mod node;
pub mod pairing;
pub mod scheduler;
pub mod time;
pub mod traits;

pub use node::{DropReason, Node, NodeEvent, NodeStats, NodeView, Outbox, Outgoing};
