//! Morse exchange
//!
//! One side sends its message a symbol at a time and closes it with the end
//! marker, which hands the sending role to the other side. The master sends
//! SOS, the slave answers OK.

use heapless::Vec;

use duet_protocol::MorseSignal;

use crate::config::{Role, Timing};
use crate::time::{elapsed, Millis};

/// Symbols kept for display
pub const MORSE_BUFFER_LEN: usize = 11;

/// Cursor blink half-period
const CURSOR_BLINK_MS: u32 = 400;

/// A role's message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Script {
    label: &'static str,
    pattern: &'static str,
}

const MASTER_SCRIPT: Script = Script {
    label: "SOS",
    pattern: "...---...",
};

const SLAVE_SCRIPT: Script = Script {
    label: "OK",
    pattern: "----.-",
};

#[derive(Debug, Clone, PartialEq)]
pub struct MorseDemo {
    own: Script,
    peer: Script,
    sending: bool,
    index: usize,
    buffer: Vec<MorseSignal, MORSE_BUFFER_LEN>,
    timer: Millis,
}

/// What the renderer draws
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MorseView {
    pub sending: bool,
    /// Message being sent or received
    pub label: &'static str,
    /// Symbols echoed or received so far
    pub symbols: Vec<MorseSignal, MORSE_BUFFER_LEN>,
    /// Blinking cursor phase while sending
    pub cursor: bool,
}

impl MorseDemo {
    /// Master opens as sender, slave as receiver
    pub fn activate(role: Role, now: Millis) -> Self {
        let (own, peer) = match role {
            Role::Master => (MASTER_SCRIPT, SLAVE_SCRIPT),
            Role::Slave => (SLAVE_SCRIPT, MASTER_SCRIPT),
        };
        Self {
            own,
            peer,
            sending: role.is_master(),
            index: 0,
            buffer: Vec::new(),
            timer: now,
        }
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn symbols(&self) -> &[MorseSignal] {
        &self.buffer
    }

    /// Emit the next symbol, or the end marker after the last one
    pub fn tick(&mut self, now: Millis, timing: &Timing) -> Option<MorseSignal> {
        if !self.sending || elapsed(now, self.timer) <= timing.morse_symbol_ms {
            return None;
        }
        self.timer = now;

        let next = self
            .own
            .pattern
            .chars()
            .nth(self.index)
            .and_then(MorseSignal::from_char);

        match next {
            Some(signal) => {
                self.index += 1;
                let _ = self.buffer.push(signal);
                Some(signal)
            }
            None => {
                self.sending = false;
                self.index = 0;
                self.buffer.clear();
                Some(MorseSignal::End)
            }
        }
    }

    /// Apply a received symbol
    ///
    /// The end marker makes this side the sender. Symbols arriving while
    /// sending are ignored and reported as not applied.
    pub fn on_signal(&mut self, signal: MorseSignal, now: Millis) -> bool {
        match signal {
            MorseSignal::End => {
                self.sending = true;
                self.index = 0;
                self.buffer.clear();
                self.timer = now;
                true
            }
            _ if self.sending => false,
            symbol => {
                let _ = self.buffer.push(symbol);
                true
            }
        }
    }

    pub fn view(&self, now: Millis) -> MorseView {
        MorseView {
            sending: self.sending,
            label: if self.sending {
                self.own.label
            } else {
                self.peer.label
            },
            symbols: self.buffer.clone(),
            cursor: self.sending && (now / CURSOR_BLINK_MS) % 2 == 0,
        }
    }
}
