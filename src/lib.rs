//! LWNX - binary command protocol for LightWare-style LiDAR rangefinders
//!
//! This library implements the framing, CRC, incremental parser and
//! request/response engine of the LWNX protocol. The byte transport and the
//! millisecond clock are supplied by the caller, so the same code runs over a
//! serial port, an I2C bridge or a simulator.
//!
//! # Quick Start
//!
//! ```rust
//! use lwnx::{Direction, ResponsePacket, encode};
//!
//! // Product name request (command 0, read, no data)
//! let frame = encode(0, Direction::Read, &[])?;
//! assert_eq!(frame, [0xAA, 0x40, 0x00, 0x00, 0x70, 0x9F]);
//!
//! // Parse it back one byte at a time
//! let mut packet = ResponsePacket::new();
//! let (_, complete) = packet.feed_slice(&frame);
//! assert!(complete);
//! assert_eq!(packet.command_id(), Some(0));
//! # Ok::<(), lwnx::Error>(())
//! ```
//!
//! Talking to a device goes through an [`Endpoint`]:
//!
//! ```rust,no_run
//! use lwnx::{Endpoint, IoTransport};
//! # fn open_port() -> std::net::TcpStream { unimplemented!() }
//!
//! let mut endpoint = Endpoint::new(IoTransport::new(open_port()));
//! let model = endpoint.read_str16(0)?;
//! endpoint.write_u32(30, 5)?;
//! let reading = endpoint.recv_packet(44, 1_000)?;
//! # let _ = (model, reading);
//! # Ok::<(), lwnx::Error>(())
//! ```
//!
//! # Features
//!
//! - **Wire-exact framing** - CRC-16 (0x1021, seed 0) and 10-bit length field
//! - **Non-blocking parser** - resynchronizes on the next start byte after noise
//! - **Managed commands** - per-attempt timeout and resend
//! - **Streaming** - await-any and non-blocking polling for unsolicited packets

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod protocol;
pub mod transport;

pub use protocol::{
    DEFAULT_PACKET_CAPACITY, Direction, Error, FirmwareVersion, FlagsWord, InvalidReason,
    LinkStats, MAX_PAYLOAD_SIZE, MIN_PACKET_CAPACITY, Packet, ParseOutcome, ParseState,
    ResponsePacket, Result, START_BYTE, crc16, decode, encode,
};
pub use transport::{ByteTransport, Clock, Endpoint, EndpointConfig, IoTransport, MonotonicClock};
