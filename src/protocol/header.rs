//! LWNX flags word
//!
//! The two bytes after the start byte carry the direction bit and the payload length.

use super::{Direction, MAX_ENCODED_PAYLOAD};

/// Little-endian 16-bit flags word
///
/// # Wire Format
///
/// ```text
///  15                         6 5         1   0
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     Payload Length (10)     | Reserved  | W |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The payload length counts the command ID byte, so a request without data
/// has a length of 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagsWord(u16);

impl FlagsWord {
    /// Direction bit (set for writes)
    pub const WRITE: u16 = 1 << 0;
    /// Bits 1-5, reserved
    pub const RESERVED_MASK: u16 = 0b11_1110;
    /// Shift of the payload length field
    pub const LENGTH_SHIFT: u32 = 6;

    /// Build a flags word. `payload_len` must not exceed 1023.
    #[must_use]
    pub fn new(direction: Direction, payload_len: usize) -> Self {
        debug_assert!(payload_len <= MAX_ENCODED_PAYLOAD, "payload length overflows field");
        let len = (payload_len & MAX_ENCODED_PAYLOAD) as u16;
        let write = match direction {
            Direction::Read => 0,
            Direction::Write => Self::WRITE,
        };
        Self((len << Self::LENGTH_SHIFT) | write)
    }

    /// Wrap a raw word
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Decode from the two bytes following the start byte
    #[must_use]
    pub const fn from_le_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_le_bytes(bytes))
    }

    /// Raw word
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Encode as the two wire bytes
    #[must_use]
    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    /// Payload length including the command ID byte
    #[must_use]
    pub const fn payload_len(self) -> usize {
        (self.0 >> Self::LENGTH_SHIFT) as usize
    }

    /// Whether the write bit is set
    #[must_use]
    pub const fn is_write(self) -> bool {
        self.0 & Self::WRITE != 0
    }

    /// Direction encoded in bit 0
    #[must_use]
    pub const fn direction(self) -> Direction {
        if self.is_write() {
            Direction::Write
        } else {
            Direction::Read
        }
    }

    /// Reserved bits as found on the wire
    #[must_use]
    pub const fn reserved(self) -> u16 {
        (self.0 & Self::RESERVED_MASK) >> 1
    }
}
