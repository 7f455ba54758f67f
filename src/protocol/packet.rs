//! LWNX packets: the owned, decoded form and the reusable receive buffer

use bytes::Bytes;

use super::{
    CRC_SIZE, DEFAULT_PACKET_CAPACITY, Direction, FLAGS_END, FlagsWord, HEADER_SIZE,
    MIN_FRAME_SIZE, MIN_PACKET_CAPACITY, ParseState, max_payload_for_capacity,
};

/// Decoded LWNX packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    command_id: u8,
    direction: Direction,
    /// Data bytes following the command ID
    payload: Bytes,
}

impl Packet {
    /// Create a new packet
    pub fn new(command_id: u8, direction: Direction, payload: impl Into<Bytes>) -> Self {
        Self {
            command_id,
            direction,
            payload: payload.into(),
        }
    }

    /// Read request without data
    #[must_use]
    pub fn read_request(command_id: u8) -> Self {
        Self::new(command_id, Direction::Read, Bytes::new())
    }

    /// Get command ID
    #[must_use]
    pub const fn command_id(&self) -> u8 {
        self.command_id
    }

    /// Get direction
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Check if the write bit is set
    #[must_use]
    pub const fn is_write(&self) -> bool {
        self.direction.is_write()
    }

    /// Get payload (data only, command ID excluded)
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Consume the packet and return the payload
    #[must_use]
    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    /// Size of the encoded frame
    #[must_use]
    pub fn frame_len(&self) -> usize {
        MIN_FRAME_SIZE + self.payload.len()
    }

    /// Encode packet to a wire frame
    pub fn encode(&self) -> super::Result<Vec<u8>> {
        super::encode(self.command_id, self.direction, &self.payload)
    }

    /// Decode packet from a complete wire frame
    pub fn decode(bytes: &[u8]) -> super::Result<Self> {
        super::decode(bytes)
    }
}

/// Reusable receive buffer driven one byte at a time by [`ResponsePacket::feed`].
///
/// The buffer keeps the raw frame exactly as received so callers can inspect
/// the header and CRC after a successful parse.
#[derive(Debug, Clone)]
pub struct ResponsePacket {
    pub(super) data: Vec<u8>,
    pub(super) size: usize,
    pub(super) remaining: usize,
    pub(super) state: ParseState,
    pub(super) command_id: Option<u8>,
}

impl ResponsePacket {
    /// Create a buffer with the standard 1024-byte capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_PACKET_CAPACITY)
    }

    /// Create a buffer holding frames of up to `capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is below [`MIN_PACKET_CAPACITY`], where no frame
    /// could ever be accepted.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity >= MIN_PACKET_CAPACITY,
            "packet capacity must hold at least {MIN_PACKET_CAPACITY} bytes"
        );
        Self {
            data: vec![0u8; capacity],
            size: 0,
            remaining: 0,
            state: ParseState::Idle,
            command_id: None,
        }
    }

    /// Prepare for a new incoming packet.
    pub fn reset(&mut self) {
        self.size = 0;
        self.remaining = 0;
        self.state = ParseState::Idle;
        self.command_id = None;
    }

    /// Current parser state
    #[must_use]
    pub const fn state(&self) -> ParseState {
        self.state
    }

    /// Bytes stored so far
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Bytes still expected before the frame is complete (CRC included)
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    /// Buffer capacity in bytes
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Largest payload length (command ID included) this buffer accepts
    #[must_use]
    pub fn max_payload_len(&self) -> usize {
        max_payload_for_capacity(self.capacity())
    }

    /// Command ID of the last complete packet
    #[must_use]
    pub const fn command_id(&self) -> Option<u8> {
        self.command_id
    }

    /// Check whether the buffer holds a complete, CRC-valid packet
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.command_id.is_some()
    }

    /// Raw bytes received for the current frame
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.size]
    }

    /// Flags word, once both flags bytes have arrived
    #[must_use]
    pub fn flags(&self) -> Option<FlagsWord> {
        (self.size >= FLAGS_END).then(|| FlagsWord::from_le_bytes([self.data[1], self.data[2]]))
    }

    /// Data bytes of the complete packet (command ID and CRC excluded).
    ///
    /// Empty while no complete packet is buffered.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        if self.is_complete() {
            &self.data[HEADER_SIZE..self.size - CRC_SIZE]
        } else {
            &[]
        }
    }

    /// Copy up to `out.len()` data bytes into `out`, returning how many were copied.
    ///
    /// A shorter payload copies only what was received.
    pub fn copy_payload(&self, out: &mut [u8]) -> usize {
        let payload = self.payload();
        let len = payload.len().min(out.len());
        out[..len].copy_from_slice(&payload[..len]);
        len
    }

    /// Owned copy of the complete packet
    #[must_use]
    pub fn to_packet(&self) -> Option<Packet> {
        let command_id = self.command_id?;
        let direction = self.flags().map(FlagsWord::direction).unwrap_or_default();
        Some(Packet::new(
            command_id,
            direction,
            Bytes::copy_from_slice(self.payload()),
        ))
    }
}

impl Default for ResponsePacket {
    fn default() -> Self {
        Self::new()
    }
}
