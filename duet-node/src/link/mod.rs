//! Link implementations

pub mod udp;

pub use udp::{UdpLink, UdpReceiver};
