//! Pairing state machine

use crate::time::{elapsed, Millis};
use crate::traits::PeerAddress;

/// Discovery state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PairingState {
    /// Broadcasting requests, no peer yet
    #[default]
    Searching,
    /// Bound to a peer; never changes again
    Paired(PeerAddress),
}

/// Handshake messages that drive the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PairingEvent {
    /// A peer is searching
    RequestReceived(PeerAddress),
    /// A peer answered our request
    AckReceived(PeerAddress),
}

/// What the node must do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PairingAction {
    /// Already paired; the message changes nothing
    Ignore,
    /// Register the peer and start the session
    Pair(PeerAddress),
    /// Register the peer, reply with `PairAck`, start the session
    PairAndAck(PeerAddress),
    /// Our own peer is still searching because our `PairAck` was lost;
    /// answer again without touching the session
    Reack(PeerAddress),
}

impl PairingState {
    /// Process a handshake event and return the new state
    pub fn transition(self, event: PairingEvent) -> (Self, PairingAction) {
        match (self, event) {
            (PairingState::Searching, PairingEvent::RequestReceived(peer)) => {
                (PairingState::Paired(peer), PairingAction::PairAndAck(peer))
            }
            (PairingState::Searching, PairingEvent::AckReceived(peer)) => {
                (PairingState::Paired(peer), PairingAction::Pair(peer))
            }
            (PairingState::Paired(peer), PairingEvent::RequestReceived(from)) if from == peer => {
                (PairingState::Paired(peer), PairingAction::Reack(peer))
            }
            (paired @ PairingState::Paired(_), _) => (paired, PairingAction::Ignore),
        }
    }

    /// The bound peer, if any
    pub fn peer(&self) -> Option<PeerAddress> {
        match self {
            PairingState::Searching => None,
            PairingState::Paired(peer) => Some(*peer),
        }
    }

    /// Check if a peer is bound
    pub fn is_paired(&self) -> bool {
        matches!(self, PairingState::Paired(_))
    }
}

/// Pairing state plus the discovery broadcast timer
#[derive(Debug, Clone, Default)]
pub struct PairingManager {
    state: PairingState,
    last_request: Option<Millis>,
    epoch: Option<Millis>,
}

impl PairingManager {
    /// Create a manager in the searching state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> PairingState {
        self.state
    }

    /// Bound peer, if paired
    pub fn peer(&self) -> Option<PeerAddress> {
        self.state.peer()
    }

    /// Time at which pairing completed
    pub fn epoch(&self) -> Option<Millis> {
        self.epoch
    }

    /// Check whether a discovery broadcast is due
    ///
    /// The first call while searching is always due; after that one
    /// broadcast per `interval_ms`. Never due once paired.
    pub fn poll_request(&mut self, now: Millis, interval_ms: u32) -> bool {
        if self.state.is_paired() {
            return false;
        }

        let due = match self.last_request {
            None => true,
            Some(last) => elapsed(now, last) > interval_ms,
        };
        if due {
            self.last_request = Some(now);
        }
        due
    }

    /// Feed a handshake event received at `now`
    pub fn handle(&mut self, event: PairingEvent, now: Millis) -> PairingAction {
        let (next, action) = self.state.transition(event);
        if matches!(action, PairingAction::Pair(_) | PairingAction::PairAndAck(_)) {
            self.epoch = Some(now);
        }
        self.state = next;
        action
    }
}
