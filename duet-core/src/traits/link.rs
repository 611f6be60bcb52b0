//! Datagram link trait

use core::fmt;

use duet_protocol::DATAGRAM_SIZE;

/// Errors reported by a link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Unicast to a peer that was never registered
    UnknownPeer,
    /// Peer table cannot take another entry
    PeerTableFull,
    /// Transmission failed
    SendFailed,
}

/// Opaque 6-byte link address of a peer
///
/// On a radio this is the MAC address. Host links pack their own
/// addressing into the same six bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeerAddress(pub [u8; 6]);

impl PeerAddress {
    /// Create an address from raw bytes
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// Where an outgoing datagram goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Destination {
    /// Discovery address, reaches every listener
    Broadcast,
    /// A registered peer
    Peer(PeerAddress),
}

/// Unreliable, unordered datagram transport
///
/// Delivery is best effort: a successful `send` only means the datagram
/// left this node. Received datagrams are not part of this trait; the
/// implementation hands them to the node loop together with the sender's
/// address.
pub trait Link {
    /// Transmit one datagram
    fn send(&mut self, dest: Destination, datagram: &[u8; DATAGRAM_SIZE]) -> Result<(), LinkError>;

    /// Allow unicast to `peer`
    ///
    /// Registering the same peer twice must succeed.
    fn register_peer(&mut self, peer: PeerAddress) -> Result<(), LinkError>;
}
