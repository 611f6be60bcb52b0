//! Peer discovery
//!
//! A node starts `Searching`, broadcasting `PairRequest` at a fixed
//! interval. The first `PairRequest` or `PairAck` it hears fixes the peer
//! for the rest of the session.

pub mod machine;

pub use machine::{PairingAction, PairingEvent, PairingManager, PairingState};
