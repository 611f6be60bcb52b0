//! UDP datagram link
//!
//! A `PeerAddress` carries an IPv4 address in its first four bytes and the
//! UDP port, big-endian, in the last two. Broadcast goes to the configured
//! discovery address. The peer table holds a single entry.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::time::Duration;

use log::trace;

use duet_core::traits::{Destination, Link, LinkError, PeerAddress};
use duet_protocol::DATAGRAM_SIZE;

use crate::config::LinkConfig;

/// Pack a socket address into a peer address
pub fn peer_address(addr: SocketAddrV4) -> PeerAddress {
    let ip = addr.ip().octets();
    let port = addr.port().to_be_bytes();
    PeerAddress::new([ip[0], ip[1], ip[2], ip[3], port[0], port[1]])
}

/// Unpack a peer address into a socket address
pub fn socket_address(peer: PeerAddress) -> SocketAddrV4 {
    let b = peer.as_bytes();
    SocketAddrV4::new(
        Ipv4Addr::new(b[0], b[1], b[2], b[3]),
        u16::from_be_bytes([b[4], b[5]]),
    )
}

/// Recognises datagrams this node sent to itself
///
/// Broadcasts loop back to the sender. They arrive from our own port via
/// loopback, the bound address, or the interface that routes towards the
/// discovery address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnAddress {
    port: u16,
    bind_ip: Ipv4Addr,
    route_ip: Option<Ipv4Addr>,
}

impl OwnAddress {
    pub fn new(local: SocketAddrV4, route_ip: Option<Ipv4Addr>) -> Self {
        Self {
            port: local.port(),
            bind_ip: *local.ip(),
            route_ip,
        }
    }

    pub fn matches(&self, src: SocketAddrV4) -> bool {
        if src.port() != self.port {
            return false;
        }
        let ip = *src.ip();
        ip.is_loopback() || ip == self.bind_ip || Some(ip) == self.route_ip
    }
}

/// Local interface address used to reach `target`
fn route_ip(target: SocketAddrV4) -> Option<Ipv4Addr> {
    let probe = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    probe.set_broadcast(true).ok()?;
    probe.connect(target).ok()?;
    match probe.local_addr().ok()? {
        SocketAddr::V4(addr) if !addr.ip().is_unspecified() => Some(*addr.ip()),
        _ => None,
    }
}

/// Sending half of the UDP link
pub struct UdpLink {
    socket: UdpSocket,
    local: SocketAddrV4,
    discovery: SocketAddrV4,
    peer: Option<PeerAddress>,
    own: OwnAddress,
}

impl UdpLink {
    /// Bind the local socket and enable broadcast
    pub fn bind(config: &LinkConfig) -> io::Result<Self> {
        let socket = UdpSocket::bind(config.bind)?;
        socket.set_broadcast(true)?;
        let local = match socket.local_addr()? {
            SocketAddr::V4(addr) => addr,
            SocketAddr::V6(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "link requires an IPv4 socket",
                ))
            }
        };

        Ok(Self {
            socket,
            local,
            discovery: config.discovery,
            peer: None,
            own: OwnAddress::new(local, route_ip(config.discovery)),
        })
    }

    /// Bound socket address
    pub fn local_addr(&self) -> SocketAddrV4 {
        self.local
    }

    /// Registered peer, if any
    #[cfg(test)]
    fn peer(&self) -> Option<PeerAddress> {
        self.peer
    }

    /// Receiving half sharing this socket
    ///
    /// `timeout` bounds each blocking read so the receive thread can poll.
    pub fn receiver(&self, timeout: Duration) -> io::Result<UdpReceiver> {
        let socket = self.socket.try_clone()?;
        socket.set_read_timeout(Some(timeout))?;
        Ok(UdpReceiver {
            socket,
            own: self.own,
        })
    }
}

impl Link for UdpLink {
    fn send(&mut self, dest: Destination, datagram: &[u8; DATAGRAM_SIZE]) -> Result<(), LinkError> {
        let target = match dest {
            Destination::Broadcast => self.discovery,
            Destination::Peer(peer) if self.peer == Some(peer) => socket_address(peer),
            Destination::Peer(_) => return Err(LinkError::UnknownPeer),
        };

        match self.socket.send_to(datagram, target) {
            Ok(_) => Ok(()),
            Err(e) => {
                trace!("send to {} failed: {}", target, e);
                Err(LinkError::SendFailed)
            }
        }
    }

    fn register_peer(&mut self, peer: PeerAddress) -> Result<(), LinkError> {
        match self.peer {
            None => {
                self.peer = Some(peer);
                Ok(())
            }
            Some(existing) if existing == peer => Ok(()),
            Some(_) => Err(LinkError::PeerTableFull),
        }
    }
}

/// Receiving half of the UDP link
pub struct UdpReceiver {
    socket: UdpSocket,
    own: OwnAddress,
}

impl UdpReceiver {
    /// Wait for one datagram
    ///
    /// Returns `Ok(None)` when the read timed out or the datagram was our
    /// own broadcast. Datagrams longer than `buf` are truncated.
    pub fn recv(&self, buf: &mut [u8]) -> io::Result<Option<(usize, PeerAddress)>> {
        match self.socket.recv_from(buf) {
            Ok((len, SocketAddr::V4(src))) if !self.own.matches(src) => {
                Ok(Some((len, peer_address(src))))
            }
            Ok(_) => Ok(None),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
