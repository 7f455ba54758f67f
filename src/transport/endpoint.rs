//! Request/response engine on top of a byte transport.

use std::io;

use bytes::Bytes;
use tracing::{debug, instrument, trace};

use crate::protocol::{
    DEFAULT_PACKET_CAPACITY, Direction, Error, LinkStats, MIN_FRAME_SIZE, MIN_PACKET_CAPACITY,
    Packet, ParseOutcome, ResponsePacket, Result, encode_into,
};

use super::buffer::RxBuffer;
use super::clock::{Clock, Deadline, MonotonicClock};
use super::port::ByteTransport;

/// Per-attempt wait used by LWNX hosts.
pub const DEFAULT_TIMEOUT_MS: u32 = 200;

/// Send+wait cycles for a managed command.
pub const DEFAULT_ATTEMPTS: u32 = 4;

/// Endpoint configuration options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EndpointConfig {
    /// How long each managed-command attempt waits for its reply.
    pub timeout_ms: u32,
    /// Total send+wait cycles before a managed command fails (at least one is made).
    pub attempts: u32,
    /// Maximum bytes requested from the transport per read.
    pub read_chunk: usize,
    /// Pause between empty reads while waiting; zero yields instead.
    pub idle_sleep_ms: u32,
    /// Receive buffer size; bounds the longest accepted frame. Values below
    /// [`MIN_PACKET_CAPACITY`](crate::protocol::MIN_PACKET_CAPACITY) are raised to it.
    pub packet_capacity: usize,
}

impl EndpointConfig {
    /// Set the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the managed-command attempt budget.
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Set the transport read size.
    #[must_use]
    pub const fn with_read_chunk(mut self, read_chunk: usize) -> Self {
        self.read_chunk = read_chunk;
        self
    }

    /// Set the idle pause between empty reads.
    #[must_use]
    pub const fn with_idle_sleep_ms(mut self, idle_sleep_ms: u32) -> Self {
        self.idle_sleep_ms = idle_sleep_ms;
        self
    }

    /// Set the receive buffer size.
    #[must_use]
    pub const fn with_packet_capacity(mut self, packet_capacity: usize) -> Self {
        self.packet_capacity = packet_capacity;
        self
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            attempts: DEFAULT_ATTEMPTS,
            read_chunk: 64,
            idle_sleep_ms: 0,
            packet_capacity: DEFAULT_PACKET_CAPACITY,
        }
    }
}

/// One device link: a transport, a clock and the receive state for it.
///
/// All operations take `&mut self`, so at most one receive is in flight per
/// endpoint. The transport is only borrowed through [`ByteTransport`]; pass
/// `&mut port` to keep ownership with the caller.
#[derive(Debug)]
pub struct Endpoint<T, C = MonotonicClock> {
    transport: T,
    clock: C,
    config: EndpointConfig,
    rx: ResponsePacket,
    backlog: RxBuffer,
    tx: Vec<u8>,
    stats: LinkStats,
}

impl<T: ByteTransport> Endpoint<T, MonotonicClock> {
    /// Create an endpoint with default configuration and the system clock.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, MonotonicClock::new(), EndpointConfig::default())
    }
}

impl<T: ByteTransport, C: Clock> Endpoint<T, C> {
    /// Create an endpoint with default configuration and the given clock.
    pub fn with_clock(transport: T, clock: C) -> Self {
        Self::with_config(transport, clock, EndpointConfig::default())
    }

    /// Create an endpoint with explicit configuration.
    ///
    /// A `packet_capacity` too small to accept any frame is raised to the minimum.
    pub fn with_config(transport: T, clock: C, mut config: EndpointConfig) -> Self {
        if config.packet_capacity < MIN_PACKET_CAPACITY {
            debug!(
                requested = config.packet_capacity,
                used = MIN_PACKET_CAPACITY,
                "packet capacity raised to minimum"
            );
            config.packet_capacity = MIN_PACKET_CAPACITY;
        }
        let rx = ResponsePacket::with_capacity(config.packet_capacity);
        let backlog = RxBuffer::new(config.read_chunk);
        Self {
            transport,
            clock,
            config,
            rx,
            backlog,
            tx: Vec::with_capacity(MIN_FRAME_SIZE + 16),
            stats: LinkStats::default(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Link counters since creation or the last [`Endpoint::reset_stats`].
    #[must_use]
    pub const fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Zero the link counters.
    pub fn reset_stats(&mut self) {
        self.stats = LinkStats::default();
    }

    /// Borrow the transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Borrow the clock.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Receive buffer, holding the raw frame of the last packet received.
    #[must_use]
    pub const fn response(&self) -> &ResponsePacket {
        &self.rx
    }

    /// Drop buffered bytes and any partially parsed frame.
    pub fn discard_input(&mut self) {
        trace!(dropped = self.backlog.len(), "discarding buffered input");
        self.backlog.clear();
        self.rx.reset();
    }

    /// Release the transport and clock.
    pub fn into_parts(self) -> (T, C) {
        (self.transport, self.clock)
    }

    /// Block for `ms` milliseconds on the endpoint clock.
    pub fn delay_ms(&self, ms: u32) {
        self.clock.sleep_ms(ms);
    }

    /// Encode and write one frame without waiting for a reply.
    #[instrument(level = "trace", skip(self, direction, data))]
    pub fn send_packet(
        &mut self,
        command_id: u8,
        direction: impl Into<Direction>,
        data: &[u8],
    ) -> Result<()> {
        self.tx.clear();
        self.tx.resize(MIN_FRAME_SIZE + data.len(), 0);
        let len = encode_into(command_id, direction, data, &mut self.tx)?;

        let mut written = 0;
        while written < len {
            let n = self.transport.write(&self.tx[written..len])?;
            if n == 0 {
                return Err(Error::Transport(io::ErrorKind::WriteZero.into()));
            }
            written += n;
        }
        self.stats.record_sent(len);
        Ok(())
    }

    /// Send a managed command and wait for the reply with the same command ID.
    ///
    /// Each attempt writes the request and waits up to
    /// [`EndpointConfig::timeout_ms`]; silence triggers a resend until
    /// [`EndpointConfig::attempts`] is used up. The reply data is cut to
    /// `expected_len` bytes; a shorter reply is returned as received.
    ///
    /// # Errors
    ///
    /// [`Error::NoResponse`] once every attempt went unanswered, or
    /// [`Error::Transport`] immediately on an I/O failure (never retried).
    #[instrument(level = "debug", skip(self, direction, request))]
    pub fn send_and_await(
        &mut self,
        command_id: u8,
        direction: impl Into<Direction>,
        request: &[u8],
        expected_len: usize,
    ) -> Result<Bytes> {
        let direction = direction.into();
        let attempts = self.config.attempts.max(1);

        for attempt in 1..=attempts {
            if attempt > 1 {
                self.stats.retries += 1;
                debug!(command_id, attempt, "no reply, resending");
            }

            self.send_packet(command_id, direction, request)?;

            if let Some(packet) = self.wait_for(Some(command_id), self.config.timeout_ms)? {
                let payload = packet.into_payload();
                let len = payload.len().min(expected_len);
                return Ok(payload.slice(..len));
            }
        }

        debug!(command_id, attempts, "managed command unanswered");
        Err(Error::NoResponse {
            command_id,
            attempts,
        })
    }

    /// Managed command that copies the reply data into `out`.
    ///
    /// Returns the number of bytes copied, which is less than `out.len()`
    /// when the device answered with less.
    pub fn send_and_await_into(
        &mut self,
        command_id: u8,
        direction: impl Into<Direction>,
        request: &[u8],
        out: &mut [u8],
    ) -> Result<usize> {
        let payload = self.send_and_await(command_id, direction, request, out.len())?;
        out[..payload.len()].copy_from_slice(&payload);
        Ok(payload.len())
    }

    /// Wait for a packet with `command_id` without sending anything.
    ///
    /// Used for streamed packets whose ID is known in advance. Packets with
    /// other IDs are discarded.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] when nothing matching arrived in time.
    #[instrument(level = "debug", skip(self))]
    pub fn recv_packet(&mut self, command_id: u8, timeout_ms: u32) -> Result<Packet> {
        self.wait_for(Some(command_id), timeout_ms)?
            .ok_or(Error::Timeout { timeout_ms })
    }

    /// Wait for the next valid packet of any command ID.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] when no packet completed in time. Not retried.
    #[instrument(level = "debug", skip(self))]
    pub fn recv_any(&mut self, timeout_ms: u32) -> Result<Packet> {
        self.wait_for(None, timeout_ms)?
            .ok_or(Error::Timeout { timeout_ms })
    }

    /// Poll for a packet with `command_id` without blocking.
    ///
    /// Parses already buffered bytes, then performs at most one transport
    /// read. Parser state carries over between polls, so a frame may arrive
    /// across many calls.
    pub fn try_recv(&mut self, command_id: u8) -> Result<Option<Packet>> {
        self.poll(Some(command_id))
    }

    /// Poll for a packet of any command ID without blocking.
    pub fn try_recv_any(&mut self) -> Result<Option<Packet>> {
        self.poll(None)
    }

    fn poll(&mut self, filter: Option<u8>) -> Result<Option<Packet>> {
        if let Some(packet) = self.drain_backlog(filter) {
            return Ok(Some(packet));
        }
        let n = self.backlog.fill(&mut self.transport)?;
        self.stats.bytes_received += n as u64;
        Ok(self.drain_backlog(filter))
    }

    /// Blocking receive loop shared by managed commands and the receive calls.
    ///
    /// Returns `Ok(None)` when the deadline passes first.
    fn wait_for(&mut self, filter: Option<u8>, timeout_ms: u32) -> Result<Option<Packet>> {
        self.rx.reset();
        let deadline = Deadline::start(self.clock.now_ms(), timeout_ms);

        loop {
            if let Some(packet) = self.drain_backlog(filter) {
                return Ok(Some(packet));
            }

            if deadline.expired(self.clock.now_ms()) {
                self.stats.timeouts += 1;
                debug!(?filter, timeout_ms, "receive timed out");
                return Ok(None);
            }

            let n = self.backlog.fill(&mut self.transport)?;
            if n == 0 {
                self.clock.sleep_ms(self.config.idle_sleep_ms);
            }
            self.stats.bytes_received += n as u64;
        }
    }

    /// Feed buffered bytes until a wanted packet completes or the backlog is empty.
    fn drain_backlog(&mut self, filter: Option<u8>) -> Option<Packet> {
        while let Some(byte) = self.backlog.pop() {
            let outcome = self.rx.feed(byte);
            self.stats.record_outcome(outcome);

            match outcome {
                ParseOutcome::Incomplete => {}
                ParseOutcome::Invalid(reason) => trace!(%reason, "dropped frame"),
                ParseOutcome::Complete => {
                    let Some(command_id) = self.rx.command_id() else {
                        continue;
                    };
                    if filter.is_none_or(|wanted| wanted == command_id) {
                        return self.rx.to_packet();
                    }
                    self.stats.packets_discarded += 1;
                    trace!(command_id, ?filter, "discarded unrelated packet");
                }
            }
        }
        None
    }
}
