//! Transport abstraction traits
//!
//! These traits define the interface between the node logic and the
//! concrete link (radio, UDP socket, test harness).

pub mod link;

pub use link::{Destination, Link, LinkError, PeerAddress};
