//! Link receive thread
//!
//! Blocks on the UDP socket and forwards datagrams to the node loop.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use heapless::Vec;
use log::{info, trace, warn};

use duet_core::traits::PeerAddress;

use crate::channels::{Received, MAX_DATAGRAM_LEN, RX_CHANNEL};
use crate::link::UdpReceiver;

/// Upper bound on one blocking read
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Pause after a socket error before reading again
const ERROR_BACKOFF: Duration = Duration::from_millis(500);

/// Start the receive thread
pub fn spawn_link_rx(receiver: UdpReceiver) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("link-rx".into())
        .spawn(move || link_rx_loop(receiver))
}

fn link_rx_loop(receiver: UdpReceiver) {
    info!("Link RX thread started");

    let mut buf = [0u8; MAX_DATAGRAM_LEN];
    loop {
        match receiver.recv(&mut buf) {
            Ok(Some((len, from))) => {
                forward(&buf[..len.min(MAX_DATAGRAM_LEN)], from);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Link read failed: {}", e);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }
}

/// Queue one datagram for the node loop
///
/// Returns false if the channel was full and the datagram was dropped.
fn forward(bytes: &[u8], from: PeerAddress) -> bool {
    let Ok(bytes) = Vec::from_slice(&bytes[..bytes.len().min(MAX_DATAGRAM_LEN)]) else {
        return false;
    };
    trace!("RX {} bytes from {}", bytes.len(), from);

    if RX_CHANNEL.try_send(Received { bytes, from }).is_err() {
        warn!("RX channel full, dropping datagram from {}", from);
        return false;
    }
    true
}
