//! Node state container
//!
//! [`Node`] owns everything one device knows: pairing state, the rotation
//! session and the active demo. It never touches the link directly. Each
//! entry point returns an [`Outbox`] of datagrams to transmit, which the
//! caller hands to a [`Link`] through [`Node::deliver`].
//!
//! Inbound validation:
//! - pairing and `DemoSync` messages are never checked against the local demo
//! - an in-demo payload whose DEMO byte disagrees with its own kind is dropped
//! - the master drops in-demo payloads for any demo but its own as stale
//! - the slave treats a payload for the demo after its own as a missed
//!   `DemoSync` and switches before applying it; anything else is stale

use heapless::Vec;

use duet_protocol::{CodecError, DemoId, Message, Payload};

use crate::config::{NodeConfig, Role};
use crate::demos::{DemoState, DemoView};
use crate::pairing::{PairingAction, PairingEvent, PairingManager, PairingState};
use crate::scheduler::{DemoScheduler, DemoSession};
use crate::time::Millis;
use crate::traits::{Destination, Link, LinkError, PeerAddress};

/// Most datagrams a single step can produce
pub const OUTBOX_CAPACITY: usize = 4;

/// Searching animation step
const SEARCH_DOT_MS: u32 = 500;
/// Searching animation length
const SEARCH_DOT_COUNT: u32 = 4;

/// Why an inbound datagram was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DropReason {
    /// Could not be decoded
    Malformed(CodecError),
    /// Unknown message kind
    Unrecognized(u8),
    /// In-demo message before pairing completed
    NotPaired,
    /// Handshake message after pairing completed
    AlreadyPaired,
    /// `DemoSync` received by the master
    NotAuthoritative,
    /// DEMO byte does not match the payload kind
    Mistagged,
    /// Payload for a demo that is not running
    Stale,
    /// The active demo declined the payload
    Rejected,
}

/// Notable outcome of a node step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeEvent {
    /// Pairing completed; the peer must be registered with the link
    Paired(PeerAddress),
    /// The bound peer asked again and was answered
    Reacked(PeerAddress),
    /// A different demo is now active
    Switched(DemoId),
    /// A payload was applied to the active demo
    Applied(DemoId),
    /// An inbound datagram was discarded
    Dropped(DropReason),
}

/// One datagram waiting for the link
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Outgoing {
    pub dest: Destination,
    pub message: Message,
}

/// Datagrams produced by one node step, plus what happened
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outbox {
    messages: Vec<Outgoing, OUTBOX_CAPACITY>,
    event: Option<NodeEvent>,
}

impl Outbox {
    /// Create an empty outbox
    pub fn new() -> Self {
        Self::default()
    }

    fn with_event(event: NodeEvent) -> Self {
        Self {
            messages: Vec::new(),
            event: Some(event),
        }
    }

    fn push(&mut self, dest: Destination, message: Message) {
        // Capacity covers the worst case (sync plus one demo payload)
        let _ = self.messages.push(Outgoing { dest, message });
    }

    /// Datagrams to transmit, in order
    pub fn messages(&self) -> &[Outgoing] {
        &self.messages
    }

    /// Notable outcome of the step, if any
    pub fn event(&self) -> Option<NodeEvent> {
        self.event
    }

    /// Check if there is nothing to transmit
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Message counters for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeStats {
    /// Datagrams handed to the node
    pub received: u32,
    /// Datagrams that changed pairing, rotation or demo state
    pub dispatched: u32,
    /// Datagrams discarded
    pub dropped: u32,
    /// Datagrams the link accepted
    pub sent: u32,
    /// Datagrams the link refused
    pub send_failures: u32,
}

/// Render-ready snapshot of the node
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeView {
    /// Looking for a peer
    Searching {
        /// Animated dots, 0-3
        dots: u8,
    },
    /// Paired and running a demo
    Running {
        demo: DemoId,
        remaining_ms: u32,
        duration_ms: u32,
        view: DemoView,
    },
}

/// Everything one device knows
#[derive(Debug, Clone)]
pub struct Node {
    config: NodeConfig,
    pairing: PairingManager,
    scheduler: DemoScheduler,
    demo: DemoState,
    stats: NodeStats,
}

impl Node {
    /// Create a node in the searching state
    pub fn new(config: NodeConfig, now: Millis) -> Self {
        let demo = DemoState::activate(DemoId::Eyes, config.role, now);
        Self {
            scheduler: DemoScheduler::new(config.timing.demo_duration_ms),
            pairing: PairingManager::new(),
            demo,
            stats: NodeStats::default(),
            config,
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn role(&self) -> Role {
        self.config.role
    }

    pub fn pairing(&self) -> PairingState {
        self.pairing.state()
    }

    pub fn peer(&self) -> Option<PeerAddress> {
        self.pairing.peer()
    }

    pub fn session(&self) -> DemoSession {
        self.scheduler.session()
    }

    pub fn current_demo(&self) -> DemoId {
        self.scheduler.current()
    }

    /// Active demo sub-state
    pub fn demo(&self) -> &DemoState {
        &self.demo
    }

    pub fn stats(&self) -> NodeStats {
        self.stats
    }

    /// Decode raw bytes from `from` and apply them
    ///
    /// Malformed datagrams change nothing but the drop counter.
    pub fn handle_datagram(&mut self, bytes: &[u8], from: PeerAddress, now: Millis) -> Outbox {
        match Message::from_bytes(bytes) {
            Ok(message) => self.apply(message, from, now),
            Err(e) => {
                self.stats.received = self.stats.received.wrapping_add(1);
                self.discard(DropReason::Malformed(e))
            }
        }
    }

    /// Apply a decoded message from `from`
    pub fn apply(&mut self, message: Message, from: PeerAddress, now: Millis) -> Outbox {
        self.stats.received = self.stats.received.wrapping_add(1);

        match message.payload {
            Payload::PairRequest => self.pair(PairingEvent::RequestReceived(from), now),
            Payload::PairAck => self.pair(PairingEvent::AckReceived(from), now),
            Payload::Unrecognized { msg_type, .. } => self.discard(DropReason::Unrecognized(msg_type)),
            _ if !self.pairing.state().is_paired() => self.discard(DropReason::NotPaired),
            Payload::DemoSync(value) => self.sync(value, now),
            payload => self.dispatch(message.demo_mode, payload, now),
        }
    }

    /// Run timers: discovery while searching, rotation and the active demo
    /// once paired
    pub fn tick(&mut self, now: Millis) -> Outbox {
        let timing = self.config.timing;
        let mut outbox = Outbox::new();

        let Some(peer) = self.pairing.peer() else {
            if self.pairing.poll_request(now, timing.pair_interval_ms) {
                outbox.push(Destination::Broadcast, Message::new(0, Payload::PairRequest));
            }
            return outbox;
        };

        if self.config.role.is_master() {
            if let Some(next) = self.scheduler.poll(now) {
                self.demo = DemoState::activate(next, self.config.role, now);
                outbox.event = Some(NodeEvent::Switched(next));
                outbox.push(
                    Destination::Peer(peer),
                    Message::new(next.index(), Payload::DemoSync(next.index() as i32)),
                );
            }
        }

        if let Some(payload) = self.demo.tick(now, &timing) {
            outbox.push(
                Destination::Peer(peer),
                Message::new(self.current_demo().index(), payload),
            );
        }
        outbox
    }

    /// Hand an outbox to the link
    ///
    /// Registers a freshly paired peer first. Every datagram is attempted
    /// once; the first failure is returned after the rest were tried.
    pub fn deliver<L: Link>(&mut self, outbox: &Outbox, link: &mut L) -> Result<usize, LinkError> {
        if let Some(NodeEvent::Paired(peer)) = outbox.event() {
            link.register_peer(peer)?;
        }

        let mut sent = 0;
        let mut first_error = None;
        for outgoing in outbox.messages() {
            match link.send(outgoing.dest, &outgoing.message.to_bytes()) {
                Ok(()) => {
                    sent += 1;
                    self.stats.sent = self.stats.sent.wrapping_add(1);
                }
                Err(e) => {
                    self.stats.send_failures = self.stats.send_failures.wrapping_add(1);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(sent),
        }
    }

    /// Snapshot for the renderer
    pub fn snapshot(&self, now: Millis) -> NodeView {
        if !self.pairing.state().is_paired() {
            return NodeView::Searching {
                dots: ((now / SEARCH_DOT_MS) % SEARCH_DOT_COUNT) as u8,
            };
        }

        NodeView::Running {
            demo: self.current_demo(),
            remaining_ms: self.scheduler.remaining_ms(now),
            duration_ms: self.scheduler.duration_ms(),
            view: self.demo.view(now, &self.config.timing),
        }
    }

    fn discard(&mut self, reason: DropReason) -> Outbox {
        self.stats.dropped = self.stats.dropped.wrapping_add(1);
        Outbox::with_event(NodeEvent::Dropped(reason))
    }

    fn dispatched(&mut self, event: NodeEvent) -> Outbox {
        self.stats.dispatched = self.stats.dispatched.wrapping_add(1);
        Outbox::with_event(event)
    }

    fn activate(&mut self, demo: DemoId, now: Millis) {
        self.scheduler.switch_to(demo, now);
        self.demo = DemoState::activate(demo, self.config.role, now);
    }

    fn pair(&mut self, event: PairingEvent, now: Millis) -> Outbox {
        match self.pairing.handle(event, now) {
            PairingAction::Ignore => self.discard(DropReason::AlreadyPaired),
            PairingAction::Pair(peer) => {
                self.scheduler.start(now);
                self.demo = DemoState::activate(DemoId::Eyes, self.config.role, now);
                self.dispatched(NodeEvent::Paired(peer))
            }
            PairingAction::PairAndAck(peer) => {
                self.scheduler.start(now);
                self.demo = DemoState::activate(DemoId::Eyes, self.config.role, now);
                let mut outbox = self.dispatched(NodeEvent::Paired(peer));
                outbox.push(Destination::Peer(peer), Message::new(0, Payload::PairAck));
                outbox
            }
            PairingAction::Reack(peer) => {
                let mut outbox = self.dispatched(NodeEvent::Reacked(peer));
                outbox.push(Destination::Peer(peer), Message::new(0, Payload::PairAck));
                outbox
            }
        }
    }

    fn sync(&mut self, value: i32, now: Millis) -> Outbox {
        if self.config.role.is_master() {
            return self.discard(DropReason::NotAuthoritative);
        }
        let demo = self.scheduler.apply_sync(value, now);
        self.demo = DemoState::activate(demo, self.config.role, now);
        self.dispatched(NodeEvent::Switched(demo))
    }

    fn dispatch(&mut self, demo_mode: u8, payload: Payload, now: Millis) -> Outbox {
        let Some(owner) = payload.demo() else {
            return self.discard(DropReason::Rejected);
        };
        if demo_mode != owner.index() {
            return self.discard(DropReason::Mistagged);
        }

        let current = self.current_demo();
        let mut switched = false;
        if owner != current {
            if self.config.role.is_master() || owner != current.next() {
                return self.discard(DropReason::Stale);
            }
            self.activate(owner, now);
            switched = true;
        }

        if !self.demo.on_message(&payload, now) {
            return self.discard(DropReason::Rejected);
        }

        if switched {
            self.dispatched(NodeEvent::Switched(owner))
        } else {
            self.dispatched(NodeEvent::Applied(owner))
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use duet_protocol::{
        BallHandoff, EyeFrame, EyePhase, Icon, MorseSignal, SnakeHandoff, DATAGRAM_SIZE,
    };
    use std::vec::Vec as StdVec;

    const MASTER_ADDR: PeerAddress = PeerAddress::new([0xA; 6]);
    const SLAVE_ADDR: PeerAddress = PeerAddress::new([0xB; 6]);

    #[derive(Default)]
    struct RecordingLink {
        registered: StdVec<PeerAddress>,
        sent: StdVec<(Destination, [u8; DATAGRAM_SIZE])>,
        fail_sends: bool,
    }

    impl Link for RecordingLink {
        fn send(&mut self, dest: Destination, datagram: &[u8; DATAGRAM_SIZE]) -> Result<(), LinkError> {
            if self.fail_sends {
                return Err(LinkError::SendFailed);
            }
            self.sent.push((dest, *datagram));
            Ok(())
        }

        fn register_peer(&mut self, peer: PeerAddress) -> Result<(), LinkError> {
            self.registered.push(peer);
            Ok(())
        }
    }

    fn paired(role: Role, now: Millis) -> Node {
        let mut node = Node::new(NodeConfig::new(role), 0);
        let from = if role.is_master() { SLAVE_ADDR } else { MASTER_ADDR };
        node.apply(Message::new(0, Payload::PairAck), from, now);
        node
    }

    #[test]
    fn test_searching_broadcasts_requests() {
        let mut node = Node::new(NodeConfig::new(Role::Master), 0);

        let outbox = node.tick(0);
        assert_eq!(
            outbox.messages(),
            &[Outgoing {
                dest: Destination::Broadcast,
                message: Message::new(0, Payload::PairRequest),
            }]
        );
        assert!(node.tick(400).is_empty());
        assert_eq!(node.tick(501).messages().len(), 1);
    }

    #[test]
    fn test_request_pairs_and_acks() {
        let mut node = Node::new(NodeConfig::new(Role::Slave), 0);
        let outbox = node.apply(Message::new(0, Payload::PairRequest), MASTER_ADDR, 1_000);

        assert_eq!(outbox.event(), Some(NodeEvent::Paired(MASTER_ADDR)));
        assert_eq!(
            outbox.messages(),
            &[Outgoing {
                dest: Destination::Peer(MASTER_ADDR),
                message: Message::new(0, Payload::PairAck),
            }]
        );
        assert_eq!(node.peer(), Some(MASTER_ADDR));
        assert_eq!(node.session().started_at, 1_000);
    }

    #[test]
    fn test_pairing_idempotent() {
        let mut node = paired(Role::Master, 100);
        let outbox = node.apply(Message::new(0, Payload::PairRequest), PeerAddress::new([7; 6]), 200);

        assert_eq!(outbox.event(), Some(NodeEvent::Dropped(DropReason::AlreadyPaired)));
        assert!(outbox.is_empty());
        assert_eq!(node.peer(), Some(SLAVE_ADDR));
    }

    #[test]
    fn test_lost_ack_is_answered_again() {
        let mut node = Node::new(NodeConfig::new(Role::Slave), 0);
        node.apply(Message::new(0, Payload::PairRequest), MASTER_ADDR, 100);
        node.apply(Message::new(1, Payload::DemoSync(1)), MASTER_ADDR, 200);

        let outbox = node.apply(Message::new(0, Payload::PairRequest), MASTER_ADDR, 600);
        assert_eq!(outbox.event(), Some(NodeEvent::Reacked(MASTER_ADDR)));
        assert_eq!(outbox.messages()[0].message, Message::new(0, Payload::PairAck));
        assert_eq!(node.current_demo(), DemoId::Ball);
        assert_eq!(node.session().started_at, 200);
    }

    #[test]
    fn test_demo_messages_ignored_while_searching() {
        let mut node = Node::new(NodeConfig::new(Role::Slave), 0);
        let outbox = node.apply(Message::new(3, Payload::Counter(4)), MASTER_ADDR, 10);
        assert_eq!(outbox.event(), Some(NodeEvent::Dropped(DropReason::NotPaired)));

        let outbox = node.apply(Message::new(2, Payload::DemoSync(2)), MASTER_ADDR, 10);
        assert_eq!(outbox.event(), Some(NodeEvent::Dropped(DropReason::NotPaired)));
        assert_eq!(node.current_demo(), DemoId::Eyes);
    }

    #[test]
    fn test_truncated_datagram_changes_nothing() {
        let mut node = paired(Role::Slave, 0);
        let before = node.demo().clone();
        let bytes = Message::new(5, Payload::DemoSync(5)).to_bytes();

        let outbox = node.handle_datagram(&bytes[..5], MASTER_ADDR, 50);
        assert_eq!(
            outbox.event(),
            Some(NodeEvent::Dropped(DropReason::Malformed(CodecError::Truncated)))
        );
        assert_eq!(node.current_demo(), DemoId::Eyes);
        assert_eq!(node.demo(), &before);
        assert_eq!(node.stats().dropped, 1);
    }

    #[test]
    fn test_unknown_kind_not_dispatched() {
        let mut node = paired(Role::Slave, 0);
        let bytes = [0u8, 42, 1, 0, 0, 0];
        let outbox = node.handle_datagram(&bytes, MASTER_ADDR, 50);
        assert_eq!(outbox.event(), Some(NodeEvent::Dropped(DropReason::Unrecognized(42))));
    }

    #[test]
    fn test_master_rotates_and_syncs() {
        let mut node = paired(Role::Master, 1_000);
        let outbox = node.tick(11_000);

        assert_eq!(outbox.event(), Some(NodeEvent::Switched(DemoId::Ball)));
        assert_eq!(
            outbox.messages()[0],
            Outgoing {
                dest: Destination::Peer(SLAVE_ADDR),
                message: Message::new(1, Payload::DemoSync(1)),
            }
        );
        assert!(matches!(node.demo(), DemoState::Ball(ball) if ball.owns_ball()));
    }

    #[test]
    fn test_slave_never_rotates() {
        let mut node = paired(Role::Slave, 0);
        for t in (0..60_000).step_by(20) {
            let outbox = node.tick(t);
            assert!(outbox
                .messages()
                .iter()
                .all(|o| !matches!(o.message.payload, Payload::DemoSync(_))));
        }
        assert_eq!(node.current_demo(), DemoId::Eyes);
    }

    #[test]
    fn test_sync_resets_sub_state() {
        let mut node = paired(Role::Slave, 0);
        node.apply(Message::new(1, Payload::DemoSync(1)), MASTER_ADDR, 100);
        node.apply(Message::new(1, Payload::Ball(BallHandoff::new(30.0, 1.0))), MASTER_ADDR, 200);
        assert!(matches!(node.demo(), DemoState::Ball(ball) if ball.owns_ball()));

        let outbox = node.apply(Message::new(3, Payload::DemoSync(3)), MASTER_ADDR, 300);
        assert_eq!(outbox.event(), Some(NodeEvent::Switched(DemoId::Counter)));
        match node.demo() {
            DemoState::Counter(counter) => {
                assert_eq!(counter.value(), 0);
                assert!(!counter.my_turn());
            }
            other => panic!("expected counter, got {:?}", other),
        }
        assert_eq!(node.session().started_at, 300);
    }

    /// A payload that moves each demo away from its fresh slave state
    fn disturbing_payload(demo: DemoId) -> Payload {
        match demo {
            DemoId::Eyes => Payload::Eye(EyeFrame::new(EyePhase::Single, 7, -4, true)),
            DemoId::Ball => Payload::Ball(BallHandoff::new(30.0, 1.0)),
            DemoId::Icon => Payload::Icon(Icon::Star),
            DemoId::Counter => Payload::Counter(5),
            DemoId::Seesaw => Payload::Seesaw(9),
            DemoId::Morse => Payload::Morse(MorseSignal::Dash),
            DemoId::Snake => Payload::Snake(SnakeHandoff::new(30, 1)),
        }
    }

    #[test]
    fn test_sync_converges_to_fresh_state_for_every_demo() {
        for demo in DemoId::ALL {
            let mut node = paired(Role::Slave, 0);
            let index = demo.index();
            node.apply(Message::new(index, Payload::DemoSync(index as i32)), MASTER_ADDR, 100);
            let fresh = DemoState::activate(demo, Role::Slave, 100);

            let outbox = node.apply(Message::new(index, disturbing_payload(demo)), MASTER_ADDR, 200);
            assert_eq!(outbox.event(), Some(NodeEvent::Applied(demo)));
            node.tick(1_000);
            assert_ne!(node.demo(), &fresh, "{:?} state did not move", demo);

            // Same demo again, through a wrapped sync value
            let value = index as i32 + 7;
            node.apply(Message::new(index, Payload::DemoSync(value)), MASTER_ADDR, 2_000);
            assert_eq!(
                node.demo(),
                &DemoState::activate(DemoId::from_sync_value(value), Role::Slave, 2_000)
            );

            // And from there into the next demo
            let next = demo.next();
            node.apply(Message::new(next.index(), disturbing_payload(next)), MASTER_ADDR, 2_500);
            node.apply(Message::new(index, Payload::DemoSync(index as i32)), MASTER_ADDR, 3_000);
            assert_eq!(node.demo(), &DemoState::activate(demo, Role::Slave, 3_000));
        }
    }

    #[test]
    fn test_sync_value_wraps() {
        let mut node = paired(Role::Slave, 0);
        node.apply(Message::new(0, Payload::DemoSync(9)), MASTER_ADDR, 100);
        assert_eq!(node.current_demo(), DemoId::Icon);
    }

    #[test]
    fn test_master_ignores_sync() {
        let mut node = paired(Role::Master, 0);
        let outbox = node.apply(Message::new(4, Payload::DemoSync(4)), SLAVE_ADDR, 100);
        assert_eq!(outbox.event(), Some(NodeEvent::Dropped(DropReason::NotAuthoritative)));
        assert_eq!(node.current_demo(), DemoId::Eyes);
    }

    #[test]
    fn test_mistagged_payload_dropped() {
        let mut node = paired(Role::Slave, 0);
        node.apply(Message::new(3, Payload::DemoSync(3)), MASTER_ADDR, 0);
        let outbox = node.apply(Message::new(2, Payload::Counter(1)), MASTER_ADDR, 10);
        assert_eq!(outbox.event(), Some(NodeEvent::Dropped(DropReason::Mistagged)));
    }

    #[test]
    fn test_master_drops_stale_payload() {
        let mut node = paired(Role::Master, 0);
        node.tick(10_000); // now in Ball
        let outbox = node.apply(Message::new(0, Payload::Eye(Default::default())), SLAVE_ADDR, 10_020);
        assert_eq!(outbox.event(), Some(NodeEvent::Dropped(DropReason::Stale)));
    }

    #[test]
    fn test_slave_implied_switch() {
        let mut node = paired(Role::Slave, 0);
        node.apply(Message::new(1, Payload::DemoSync(1)), MASTER_ADDR, 100);

        // DemoSync(2) lost; first icon arrives tagged with the next demo
        let outbox = node.apply(Message::new(2, Payload::Icon(Icon::Star)), MASTER_ADDR, 2_200);
        assert_eq!(outbox.event(), Some(NodeEvent::Switched(DemoId::Icon)));
        match node.demo() {
            DemoState::Icon(icon) => {
                assert_eq!(icon.icon(), Icon::Star);
                assert!(icon.my_turn());
            }
            other => panic!("expected icon, got {:?}", other),
        }
    }

    #[test]
    fn test_slave_drops_late_payload_from_previous_demo() {
        let mut node = paired(Role::Slave, 0);
        node.apply(Message::new(5, Payload::DemoSync(5)), MASTER_ADDR, 100);
        let outbox = node.apply(Message::new(4, Payload::Seesaw(3)), MASTER_ADDR, 110);
        assert_eq!(outbox.event(), Some(NodeEvent::Dropped(DropReason::Stale)));
        assert_eq!(node.current_demo(), DemoId::Morse);
    }

    #[test]
    fn test_rejected_payload_counted() {
        let mut node = paired(Role::Master, 0);
        let outbox = node.apply(Message::new(0, Payload::Eye(Default::default())), SLAVE_ADDR, 10);
        assert_eq!(outbox.event(), Some(NodeEvent::Dropped(DropReason::Rejected)));

        let mut slave = paired(Role::Slave, 0);
        slave.apply(Message::new(5, Payload::DemoSync(5)), MASTER_ADDR, 0);
        let outbox = slave.apply(Message::new(5, Payload::Morse(MorseSignal::Dot)), MASTER_ADDR, 10);
        assert_eq!(outbox.event(), Some(NodeEvent::Applied(DemoId::Morse)));
    }

    #[test]
    fn test_in_demo_messages_tagged_with_current_demo() {
        let mut node = paired(Role::Master, 0);
        node.tick(30_000); // Counter
        let outbox = node.tick(30_801);
        let message = outbox.messages()[0].message;
        assert_eq!(message.demo_mode, DemoId::Counter.index());
        assert_eq!(message.payload, Payload::Counter(1));
    }

    #[test]
    fn test_deliver_registers_before_ack() {
        let mut node = Node::new(NodeConfig::new(Role::Slave), 0);
        let mut link = RecordingLink::default();
        let outbox = node.apply(Message::new(0, Payload::PairRequest), MASTER_ADDR, 0);

        assert_eq!(node.deliver(&outbox, &mut link), Ok(1));
        assert_eq!(link.registered, [MASTER_ADDR]);
        assert_eq!(link.sent[0].0, Destination::Peer(MASTER_ADDR));
        assert_eq!(link.sent[0].1, [0, 1, 0, 0, 0, 0]);
        assert_eq!(node.stats().sent, 1);
    }

    #[test]
    fn test_deliver_counts_failures() {
        let mut node = Node::new(NodeConfig::new(Role::Master), 0);
        let mut link = RecordingLink {
            fail_sends: true,
            ..Default::default()
        };
        let outbox = node.tick(0);
        assert_eq!(node.deliver(&outbox, &mut link), Err(LinkError::SendFailed));
        assert_eq!(node.stats().send_failures, 1);
        assert_eq!(node.stats().sent, 0);
    }

    #[test]
    fn test_snapshot_searching_dots() {
        let node = Node::new(NodeConfig::new(Role::Master), 0);
        assert_eq!(node.snapshot(0), NodeView::Searching { dots: 0 });
        assert_eq!(node.snapshot(1_600), NodeView::Searching { dots: 3 });
        assert_eq!(node.snapshot(2_000), NodeView::Searching { dots: 0 });
    }

    #[test]
    fn test_snapshot_running() {
        let node = paired(Role::Master, 1_000);
        match node.snapshot(4_000) {
            NodeView::Running {
                demo,
                remaining_ms,
                duration_ms,
                view,
            } => {
                assert_eq!(demo, DemoId::Eyes);
                assert_eq!(remaining_ms, 7_000);
                assert_eq!(duration_ms, 10_000);
                assert!(matches!(view, DemoView::Eyes(_)));
            }
            other => panic!("expected running view, got {:?}", other),
        }
    }
}
