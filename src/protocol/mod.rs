//! LWNX protocol core implementation
//!
//! This module provides the wire format, CRC, codec and byte-at-a-time parser for LWNX.

mod codec;
mod crc;
mod error;
mod header;
pub(crate) mod metrics;
mod packet;
mod parser;
mod types;

pub use codec::{decode, encode, encode_into};
pub use crc::crc16;
pub use error::{Error, Result};
pub use header::FlagsWord;
pub use metrics::LinkStats;
pub use packet::{Packet, ResponsePacket};
pub use parser::{InvalidReason, ParseOutcome, ParseState};
pub use types::{Direction, FirmwareVersion};

/// Every LWNX frame begins with this byte.
pub const START_BYTE: u8 = 0xAA;

/// Start byte plus the two flags bytes.
pub const FLAGS_END: usize = 3;

/// Offset of the first data byte (start, flags low, flags high, command ID).
pub const HEADER_SIZE: usize = 4;

/// Trailing CRC size in bytes.
pub const CRC_SIZE: usize = 2;

/// Smallest possible frame: header plus CRC, no data.
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + CRC_SIZE;

/// Largest payload length the 10-bit flags field can carry (command ID included).
pub const MAX_ENCODED_PAYLOAD: usize = 0x3FF;

/// Default receive buffer capacity used by LWNX devices and hosts.
pub const DEFAULT_PACKET_CAPACITY: usize = 1024;

/// Largest payload length (command ID included) the parser accepts into a
/// buffer of `capacity` bytes.
///
/// Devices count the CRC into the remaining length and require that count to
/// fit in `capacity - 5`, so the length field itself is bounded by
/// `capacity - 7` (1017 for the default buffer).
#[must_use]
pub const fn max_payload_for_capacity(capacity: usize) -> usize {
    capacity.saturating_sub(FLAGS_END + CRC_SIZE + CRC_SIZE)
}

/// Payload bound for the default 1024-byte buffer (1017).
pub const MAX_PAYLOAD_SIZE: usize = max_payload_for_capacity(DEFAULT_PACKET_CAPACITY);

/// Smallest receive buffer whose bound still admits a command ID.
pub const MIN_PACKET_CAPACITY: usize = FLAGS_END + CRC_SIZE + CRC_SIZE + 1;
