//! Byte-at-a-time LWNX frame parser
//!
//! The parser never fails hard: anything unexpected drops it back to
//! [`ParseState::Idle`], where it waits for the next start byte.

use std::fmt;

use super::{CRC_SIZE, FLAGS_END, HEADER_SIZE, ResponsePacket, START_BYTE, crc16};

/// Parser position within a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseState {
    /// Waiting for a start byte
    #[default]
    Idle,
    /// Start byte seen, next is flags low
    GotStart,
    /// Flags low seen, next is flags high
    GotFlagsLow,
    /// Length known, collecting payload and CRC
    Collecting,
}

/// Why a frame was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Announced payload does not fit the buffer
    TooLong {
        /// Payload length from the flags word
        len: usize,
        /// Largest length the buffer accepts
        max: usize,
    },
    /// Flags word announced no command ID
    Empty,
    /// Trailing CRC did not match
    BadCrc {
        /// CRC computed over the frame
        expected: u16,
        /// CRC carried by the frame
        found: u16,
    },
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong { len, max } => write!(f, "packet too long: {len} bytes (max {max})"),
            Self::Empty => write!(f, "packet has no command ID"),
            Self::BadCrc { expected, found } => {
                write!(f, "bad CRC: expected {expected:#06x}, got {found:#06x}")
            }
        }
    }
}

/// Result of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// More bytes needed
    Incomplete,
    /// A CRC-valid packet is buffered
    Complete,
    /// The frame in progress was dropped; the parser is idle again
    Invalid(InvalidReason),
}

impl ParseOutcome {
    /// Check if a packet completed
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl ResponsePacket {
    /// Advance the parser by one received byte.
    pub fn feed(&mut self, byte: u8) -> ParseOutcome {
        match self.state {
            ParseState::Idle => {
                if byte == START_BYTE {
                    self.data[0] = byte;
                    self.size = 1;
                    self.command_id = None;
                    self.state = ParseState::GotStart;
                }
                ParseOutcome::Incomplete
            }
            ParseState::GotStart => {
                self.data[1] = byte;
                self.size = 2;
                self.state = ParseState::GotFlagsLow;
                ParseOutcome::Incomplete
            }
            ParseState::GotFlagsLow => {
                self.data[2] = byte;
                self.size = FLAGS_END;
                self.state = ParseState::Idle;

                let len = u16::from_le_bytes([self.data[1], byte]) as usize >> 6;
                let max = self.max_payload_len();
                if len > max {
                    return ParseOutcome::Invalid(InvalidReason::TooLong { len, max });
                }
                if len == 0 {
                    return ParseOutcome::Invalid(InvalidReason::Empty);
                }

                self.remaining = len + CRC_SIZE;
                self.state = ParseState::Collecting;
                ParseOutcome::Incomplete
            }
            ParseState::Collecting => {
                self.data[self.size] = byte;
                self.size += 1;
                self.remaining -= 1;
                if self.remaining > 0 {
                    return ParseOutcome::Incomplete;
                }

                self.state = ParseState::Idle;
                let crc_at = self.size - CRC_SIZE;
                let found = u16::from_le_bytes([self.data[crc_at], self.data[crc_at + 1]]);
                let expected = crc16(&self.data[..crc_at]);
                if found != expected {
                    return ParseOutcome::Invalid(InvalidReason::BadCrc { expected, found });
                }

                self.command_id = Some(self.data[HEADER_SIZE - 1]);
                ParseOutcome::Complete
            }
        }
    }

    /// Feed a run of bytes, stopping right after the first complete packet.
    ///
    /// Returns how many bytes were consumed and whether a packet completed.
    pub fn feed_slice(&mut self, bytes: &[u8]) -> (usize, bool) {
        for (index, &byte) in bytes.iter().enumerate() {
            if self.feed(byte).is_complete() {
                return (index + 1, true);
            }
        }
        (bytes.len(), false)
    }
}
