//! Inter-task communication channels
//!
//! The receive thread hands datagrams to the node loop through a static
//! embassy-sync channel. It only ever calls `try_send`, so a stalled loop
//! drops datagrams instead of blocking the socket.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;

use duet_core::traits::PeerAddress;

/// Channel capacity for received datagrams
const RX_CHANNEL_SIZE: usize = 16;

/// Longest datagram kept; anything past this is ignored by the codec anyway
pub const MAX_DATAGRAM_LEN: usize = 32;

/// One datagram from the link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub bytes: Vec<u8, MAX_DATAGRAM_LEN>,
    pub from: PeerAddress,
}

/// Datagrams waiting for the node loop
pub static RX_CHANNEL: Channel<CriticalSectionRawMutex, Received, RX_CHANNEL_SIZE> =
    Channel::new();
