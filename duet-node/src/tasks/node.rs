//! Node loop
//!
//! Runs one frame every `FRAME_MS`: apply queued datagrams, run the node's
//! timers, then redraw the screen if it changed.

use embassy_time::{Duration, Instant, Ticker};
use log::{debug, info, trace, warn};

use duet_core::time::Millis;
use duet_core::traits::Link;
use duet_core::{DropReason, Node, NodeEvent, Outbox};
use duet_display::{compose, DisplayBackend, Identity, Screen};

use crate::channels::{Received, RX_CHANNEL};

/// Frame period in milliseconds
pub const FRAME_MS: u64 = 20;

/// How often the counters are logged
const STATS_INTERVAL_MS: Millis = 10_000;

/// Node, link and display driven together
pub struct Runner<L: Link, D: DisplayBackend> {
    node: Node,
    link: L,
    display: D,
    screen: Screen,
    shown: Option<Screen>,
    last_stats: Millis,
}

impl<L: Link, D: DisplayBackend> Runner<L, D> {
    pub fn new(node: Node, link: L, display: D) -> Self {
        Self {
            node,
            link,
            display,
            screen: Screen::new(),
            shown: None,
            last_stats: 0,
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    #[cfg(test)]
    fn link(&self) -> &L {
        &self.link
    }

    #[cfg(test)]
    fn display(&self) -> &D {
        &self.display
    }

    /// Run one frame
    pub fn frame(&mut self, incoming: impl IntoIterator<Item = Received>, now: Millis) {
        for received in incoming {
            let outbox = self.node.handle_datagram(&received.bytes, received.from, now);
            self.flush(&outbox);
        }

        let outbox = self.node.tick(now);
        self.flush(&outbox);

        self.redraw(now);
        self.log_stats(now);
    }

    fn flush(&mut self, outbox: &Outbox) {
        report(outbox.event());
        match self.node.deliver(outbox, &mut self.link) {
            Ok(0) => {}
            Ok(sent) => trace!("TX {} datagram(s)", sent),
            Err(e) => warn!("Link send failed: {:?}", e),
        }
    }

    fn redraw(&mut self, now: Millis) {
        let view = self.node.snapshot(now);
        compose(&mut self.screen, &view, &Identity::from_config(self.node.config()));
        if self.shown.as_ref() == Some(&self.screen) {
            return;
        }

        match self.display.render(&self.screen) {
            Ok(()) => self.shown = Some(self.screen.clone()),
            Err(e) => warn!("Display update failed: {:?}", e),
        }
    }

    fn log_stats(&mut self, now: Millis) {
        if now.wrapping_sub(self.last_stats) < STATS_INTERVAL_MS {
            return;
        }
        self.last_stats = now;

        let stats = self.node.stats();
        debug!(
            "rx {} applied {} dropped {} tx {} tx-failed {}",
            stats.received, stats.dispatched, stats.dropped, stats.sent, stats.send_failures
        );
    }
}

fn report(event: Option<NodeEvent>) {
    match event {
        Some(NodeEvent::Paired(peer)) => info!("Paired with {}", peer),
        Some(NodeEvent::Reacked(peer)) => debug!("Repeated pair request from {} acknowledged", peer),
        Some(NodeEvent::Switched(demo)) => info!("Demo: {}", demo.name()),
        Some(NodeEvent::Applied(demo)) => trace!("{} message applied", demo.name()),
        Some(NodeEvent::Dropped(
            reason @ (DropReason::Malformed(_) | DropReason::Unrecognized(_)),
        )) => trace!("Dropped datagram: {:?}", reason),
        Some(NodeEvent::Dropped(reason)) => debug!("Dropped datagram: {:?}", reason),
        None => {}
    }
}

/// Node loop - drains the receive channel and runs a frame per tick
pub async fn node_task<L: Link, D: DisplayBackend>(mut runner: Runner<L, D>, start: Instant) {
    info!("Node loop started ({:?})", runner.node().role());

    let mut ticker = Ticker::every(Duration::from_millis(FRAME_MS));
    loop {
        let now = start.elapsed().as_millis() as Millis;
        runner.frame(core::iter::from_fn(|| RX_CHANNEL.try_receive().ok()), now);
        ticker.next().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duet_core::config::{NodeConfig, Role};
    use duet_core::traits::{Destination, LinkError, PeerAddress};
    use duet_display::DisplayError;
    use duet_protocol::{DemoId, Message, Payload, DATAGRAM_SIZE};

    const PEER: PeerAddress = PeerAddress::new([127, 0, 0, 1, 0xBA, 0xB9]);

    #[derive(Default)]
    struct FakeLink {
        registered: Vec<PeerAddress>,
        sent: Vec<(Destination, [u8; DATAGRAM_SIZE])>,
    }

    impl Link for FakeLink {
        fn send(&mut self, dest: Destination, datagram: &[u8; DATAGRAM_SIZE]) -> Result<(), LinkError> {
            self.sent.push((dest, *datagram));
            Ok(())
        }

        fn register_peer(&mut self, peer: PeerAddress) -> Result<(), LinkError> {
            self.registered.push(peer);
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingDisplay {
        renders: usize,
        last_header: String,
    }

    impl DisplayBackend for CountingDisplay {
        fn clear(&mut self) -> Result<(), DisplayError> {
            Ok(())
        }

        fn draw_text(&mut self, row: u8, _col: u8, text: &str) -> Result<(), DisplayError> {
            if row == 0 {
                self.last_header = text.to_string();
            }
            Ok(())
        }

        fn invert_region(&mut self, _row: u8, _start: u8, _end: u8) -> Result<(), DisplayError> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), DisplayError> {
            self.renders += 1;
            Ok(())
        }

        fn dimensions(&self) -> (u8, u8) {
            (21, 8)
        }

        fn is_ready(&self) -> bool {
            true
        }
    }

    fn runner(role: Role) -> Runner<FakeLink, CountingDisplay> {
        Runner::new(
            Node::new(NodeConfig::new(role), 0),
            FakeLink::default(),
            CountingDisplay::default(),
        )
    }

    fn datagram(message: Message) -> Received {
        Received {
            bytes: heapless::Vec::from_slice(&message.to_bytes()).unwrap(),
            from: PEER,
        }
    }

    #[test]
    fn test_searching_frame() {
        let mut runner = runner(Role::Master);
        runner.frame([], 0);

        assert_eq!(runner.link().sent.len(), 1);
        assert_eq!(runner.link().sent[0].0, Destination::Broadcast);
        assert_eq!(runner.display().renders, 1);
    }

    #[test]
    fn test_unchanged_screen_not_redrawn() {
        let mut runner = runner(Role::Master);
        runner.frame([], 0);
        runner.frame([], 20);
        runner.frame([], 40);
        assert_eq!(runner.display().renders, 1);

        // Searching dots advance
        runner.frame([], 500);
        assert_eq!(runner.display().renders, 2);
    }

    #[test]
    fn test_ack_pairs_and_registers() {
        let mut runner = runner(Role::Master);
        runner.frame([], 0);
        runner.frame([datagram(Message::new(0, Payload::PairAck))], 20);

        assert!(runner.node().pairing().is_paired());
        assert_eq!(runner.link().registered, vec![PEER]);
        assert!(runner.display().last_header.contains("EYES"));
    }

    #[test]
    fn test_slave_answers_request() {
        let mut runner = runner(Role::Slave);
        runner.frame([datagram(Message::new(0, Payload::PairRequest))], 0);

        assert_eq!(runner.link().registered, vec![PEER]);
        let acks = runner
            .link()
            .sent
            .iter()
            .filter(|(dest, bytes)| {
                *dest == Destination::Peer(PEER)
                    && Message::from_bytes(bytes).map(|m| m.payload) == Ok(Payload::PairAck)
            })
            .count();
        assert_eq!(acks, 1);
    }

    #[test]
    fn test_garbage_counted_as_drop() {
        let mut runner = runner(Role::Slave);
        let junk = Received {
            bytes: heapless::Vec::from_slice(&[0xFF, 0x00]).unwrap(),
            from: PEER,
        };
        runner.frame([junk], 0);

        assert_eq!(runner.node().stats().dropped, 1);
        assert_eq!(runner.node().current_demo(), DemoId::Eyes);
    }
}
