//! Datagram encoding and decoding for the peer protocol.
//!
//! Datagram format (6 bytes, no padding):
//! - DEMO (1 byte): demo index the sender believes is active
//! - TYPE (1 byte): message kind identifier
//! - VALUE (4 bytes): little-endian `i32`, interpretation set by TYPE

/// Size of every datagram on the wire
pub const DATAGRAM_SIZE: usize = 6;

/// Errors that can occur during datagram encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Datagram is shorter than [`DATAGRAM_SIZE`]
    Truncated,
    /// Value cannot be carried by the message kind
    InvalidValue,
}

/// A raw datagram as it travels over the link
///
/// No field is validated here; the kind byte may hold any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Datagram {
    /// Demo index tag
    pub demo_mode: u8,
    /// Message kind identifier
    pub msg_type: u8,
    /// Kind-specific value
    pub value: i32,
}

impl Datagram {
    /// Create a new datagram
    pub const fn new(demo_mode: u8, msg_type: u8, value: i32) -> Self {
        Self {
            demo_mode,
            msg_type,
            value,
        }
    }

    /// Encode this datagram into its fixed wire form
    pub fn encode(&self) -> [u8; DATAGRAM_SIZE] {
        let mut bytes = [0u8; DATAGRAM_SIZE];
        bytes[0] = self.demo_mode;
        bytes[1] = self.msg_type;
        bytes[2..].copy_from_slice(&self.value.to_le_bytes());
        bytes
    }

    /// Decode a datagram from received bytes
    ///
    /// Anything shorter than [`DATAGRAM_SIZE`] is rejected. Trailing bytes
    /// beyond the fixed size are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() < DATAGRAM_SIZE {
            return Err(CodecError::Truncated);
        }

        let mut value = [0u8; 4];
        value.copy_from_slice(&bytes[2..DATAGRAM_SIZE]);

        Ok(Self {
            demo_mode: bytes[0],
            msg_type: bytes[1],
            value: i32::from_le_bytes(value),
        })
    }
}
