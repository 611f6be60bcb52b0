//! Two nodes wired through an in-memory link
//!
//! Every datagram a node hands to its link is routed straight into the
//! other node, optionally dropped by a deterministic loss generator.

use duet_core::config::{NodeConfig, Role};
use duet_core::demos::DemoState;
use duet_core::pairing::PairingState;
use duet_core::traits::{Destination, Link, LinkError, PeerAddress};
use duet_core::{Node, Outbox};
use duet_protocol::{DemoId, DATAGRAM_SIZE};

const MASTER_ADDR: PeerAddress = PeerAddress::new([0x24, 0x6f, 0x28, 0, 0, 0xA]);
const SLAVE_ADDR: PeerAddress = PeerAddress::new([0x24, 0x6f, 0x28, 0, 0, 0xB]);
const FRAME_MS: u32 = 20;

#[derive(Default)]
struct Wire {
    sent: Vec<(Destination, [u8; DATAGRAM_SIZE])>,
}

impl Link for Wire {
    fn send(&mut self, dest: Destination, datagram: &[u8; DATAGRAM_SIZE]) -> Result<(), LinkError> {
        self.sent.push((dest, *datagram));
        Ok(())
    }

    fn register_peer(&mut self, _peer: PeerAddress) -> Result<(), LinkError> {
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Master,
    Slave,
}

impl Side {
    fn other(self) -> Self {
        match self {
            Side::Master => Side::Slave,
            Side::Slave => Side::Master,
        }
    }

    fn addr(self) -> PeerAddress {
        match self {
            Side::Master => MASTER_ADDR,
            Side::Slave => SLAVE_ADDR,
        }
    }
}

struct Sim {
    master: Node,
    slave: Node,
    now: u32,
    loss_percent: u32,
    rng: u32,
    delivered: u32,
    lost: u32,
}

impl Sim {
    fn new(loss_percent: u32) -> Self {
        Self {
            master: Node::new(NodeConfig::new(Role::Master), 0),
            slave: Node::new(NodeConfig::new(Role::Slave), 0),
            now: 0,
            loss_percent,
            rng: 0x2545_f491,
            delivered: 0,
            lost: 0,
        }
    }

    fn node_mut(&mut self, side: Side) -> &mut Node {
        match side {
            Side::Master => &mut self.master,
            Side::Slave => &mut self.slave,
        }
    }

    fn lose(&mut self) -> bool {
        self.rng = self.rng.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (self.rng >> 16) % 100 < self.loss_percent
    }

    fn route(&mut self, from: Side, outbox: Outbox) {
        let mut wire = Wire::default();
        let _ = self.node_mut(from).deliver(&outbox, &mut wire);

        let to = from.other();
        for (dest, bytes) in wire.sent {
            if dest != Destination::Broadcast && dest != Destination::Peer(to.addr()) {
                continue;
            }
            if self.lose() {
                self.lost += 1;
                continue;
            }
            self.delivered += 1;
            let now = self.now;
            let reply = self.node_mut(to).handle_datagram(&bytes, from.addr(), now);
            self.route(to, reply);
        }
    }

    fn step(&mut self) {
        self.now += FRAME_MS;
        let now = self.now;
        let outbox = self.master.tick(now);
        self.route(Side::Master, outbox);
        let outbox = self.slave.tick(now);
        self.route(Side::Slave, outbox);
    }

    fn run_until(&mut self, t: u32) {
        while self.now < t {
            self.step();
        }
    }

    fn pair(&mut self) -> u32 {
        while !(self.master.pairing().is_paired() && self.slave.pairing().is_paired()) {
            self.step();
            assert!(self.now < 30_000, "nodes never paired");
        }
        self.master.session().started_at
    }
}

#[test]
fn test_pairing_binds_each_other() {
    let mut sim = Sim::new(0);
    sim.pair();

    assert_eq!(sim.master.pairing(), PairingState::Paired(SLAVE_ADDR));
    assert_eq!(sim.slave.pairing(), PairingState::Paired(MASTER_ADDR));
    assert_eq!(sim.master.current_demo(), DemoId::Eyes);
    assert_eq!(sim.slave.current_demo(), DemoId::Eyes);
}

#[test]
fn test_pairing_survives_loss() {
    let mut sim = Sim::new(60);
    sim.pair();
    assert_eq!(sim.master.peer(), Some(SLAVE_ADDR));
    assert_eq!(sim.slave.peer(), Some(MASTER_ADDR));
}

#[test]
fn test_rotation_lockstep_without_loss() {
    let mut sim = Sim::new(0);
    let epoch = sim.pair();

    while sim.now < epoch + 150_000 {
        sim.step();
        let expected = ((sim.now - epoch) / 10_000 % 7) as u8;
        assert_eq!(sim.master.current_demo().index(), expected);
        assert_eq!(sim.slave.current_demo(), sim.master.current_demo());
    }
}

#[test]
fn test_rotation_heals_under_loss() {
    let mut sim = Sim::new(10);
    let epoch = sim.pair();

    let mut agree = 0u32;
    let mut total = 0u32;
    while sim.now < epoch + 210_000 {
        sim.step();
        total += 1;
        if sim.slave.current_demo() == sim.master.current_demo() {
            agree += 1;
        }
    }

    assert!(sim.lost > 0);
    assert!(agree * 100 / total >= 85, "agreement {}/{}", agree, total);
}

#[test]
fn test_ball_possession_is_exclusive() {
    let mut sim = Sim::new(0);
    let epoch = sim.pair();
    sim.run_until(epoch + 10_000);
    assert_eq!(sim.slave.current_demo(), DemoId::Ball);

    while sim.now < epoch + 19_900 {
        sim.step();
        if let (DemoState::Ball(a), DemoState::Ball(b)) = (sim.master.demo(), sim.slave.demo()) {
            assert!(!(a.owns_ball() && b.owns_ball()));
        }
    }

    match (sim.master.demo(), sim.slave.demo()) {
        (DemoState::Ball(a), DemoState::Ball(b)) => {
            assert!(a.exchanges() >= 2);
            assert_eq!(a.exchanges(), b.exchanges());
        }
        _ => panic!("left the ball demo early"),
    }
}

#[test]
fn test_counter_turns_alternate() {
    let mut sim = Sim::new(0);
    let epoch = sim.pair();
    sim.run_until(epoch + 30_000);

    while sim.now < epoch + 39_900 {
        sim.step();
        if let (DemoState::Counter(a), DemoState::Counter(b)) = (sim.master.demo(), sim.slave.demo()) {
            assert!(!(a.my_turn() && b.my_turn()));
            assert!((a.value() - b.value()).abs() <= 1);
        }
    }

    match sim.master.demo() {
        DemoState::Counter(counter) => assert!(counter.value() >= 8),
        other => panic!("expected counter, got {:?}", other),
    }
}

#[test]
fn test_snake_crosses_both_ways() {
    let mut sim = Sim::new(0);
    let epoch = sim.pair();
    sim.run_until(epoch + 60_000);
    assert_eq!(sim.slave.current_demo(), DemoId::Snake);

    let mut slave_owned = false;
    let mut returned = false;
    while sim.now < epoch + 69_900 {
        sim.step();
        if let (DemoState::Snake(a), DemoState::Snake(b)) = (sim.master.demo(), sim.slave.demo()) {
            assert!(!(a.owns_snake() && b.owns_snake()));
            slave_owned |= b.owns_snake();
            returned |= slave_owned && a.owns_snake();
        }
    }
    assert!(slave_owned);
    assert!(returned);
}

#[test]
fn test_slave_mirrors_master_eyes() {
    let mut sim = Sim::new(0);
    let epoch = sim.pair();
    sim.run_until(epoch + 4_000);

    let view = |node: &Node, now| match node.snapshot(now) {
        duet_core::NodeView::Running {
            view: duet_core::demos::DemoView::Eyes(frame),
            ..
        } => frame,
        other => panic!("expected eyes, got {:?}", other),
    };

    let master = view(&sim.master, sim.now);
    let slave = view(&sim.slave, sim.now);
    assert_eq!(slave.phase, master.phase);
    assert!((slave.ox - master.ox).abs() <= 1);
}
