#![allow(dead_code)]

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::rc::Rc;

use lwnx::{ByteTransport, Clock, Direction, Packet, ResponsePacket, encode};

/// Shared simulated millisecond counter. Sleeping advances it; an idle
/// sleep of zero still advances one tick so waits always make progress.
#[derive(Clone, Default)]
pub struct SimClock(Rc<Cell<u32>>);

impl SimClock {
    pub fn starting_at(ms: u32) -> Self {
        Self(Rc::new(Cell::new(ms)))
    }

    pub fn advance(&self, ms: u32) {
        self.0.set(self.0.get().wrapping_add(ms));
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }

    fn sleep_ms(&self, ms: u32) {
        self.advance(ms.max(1));
    }
}

struct Pending {
    ready_at_elapsed: u32,
    bytes: Vec<u8>,
}

/// Rangefinder simulator speaking LWNX over an in-memory link.
pub struct SimSensor {
    clock: SimClock,
    epoch: u32,
    parser: ResponsePacket,
    outbox: VecDeque<Pending>,
    registers: HashMap<u8, Vec<u8>>,
    /// Host requests seen, with the simulated time they arrived.
    pub requests: Vec<(u32, Packet)>,
    /// Delay between a request and its reply becoming readable.
    pub latency_ms: u32,
    /// Number of upcoming requests to ignore.
    pub ignore_requests: usize,
    /// Number of upcoming replies to send with a broken CRC.
    pub corrupt_replies: usize,
    /// Bytes returned per read call at most.
    pub max_read: usize,
    /// Fail every write with this error kind.
    pub write_error: Option<io::ErrorKind>,
    /// Fail every read with this error kind.
    pub read_error: Option<io::ErrorKind>,
    /// Number of read calls made by the host.
    pub reads: usize,
}

impl SimSensor {
    pub fn new(clock: SimClock) -> Self {
        let epoch = clock.now_ms();
        Self {
            clock,
            epoch,
            parser: ResponsePacket::new(),
            outbox: VecDeque::new(),
            registers: HashMap::new(),
            requests: Vec::new(),
            latency_ms: 2,
            ignore_requests: 0,
            corrupt_replies: 0,
            max_read: usize::MAX,
            write_error: None,
            read_error: None,
            reads: 0,
        }
    }

    pub fn with_register(mut self, command_id: u8, value: &[u8]) -> Self {
        self.registers.insert(command_id, value.to_vec());
        self
    }

    fn elapsed(&self) -> u32 {
        self.clock.now_ms().wrapping_sub(self.epoch)
    }

    /// Queue raw bytes that become readable after `delay_ms`.
    pub fn push_raw(&mut self, delay_ms: u32, bytes: &[u8]) {
        let ready_at_elapsed = self.elapsed() + delay_ms;
        self.outbox.push_back(Pending {
            ready_at_elapsed,
            bytes: bytes.to_vec(),
        });
    }

    /// Queue an unsolicited packet.
    pub fn push_stream(&mut self, delay_ms: u32, command_id: u8, data: &[u8]) {
        let frame = encode(command_id, Direction::Read, data).unwrap();
        self.push_raw(delay_ms, &frame);
    }

    fn handle_request(&mut self, request: Packet) {
        self.requests.push((self.clock.now_ms(), request.clone()));

        if self.ignore_requests > 0 {
            self.ignore_requests -= 1;
            return;
        }

        let command_id = request.command_id();
        if request.is_write() {
            self.registers
                .insert(command_id, request.payload().to_vec());
        }
        let value = self.registers.get(&command_id).cloned().unwrap_or_default();
        let mut frame = encode(command_id, request.direction(), &value).unwrap();

        if self.corrupt_replies > 0 {
            self.corrupt_replies -= 1;
            let last = frame.len() - 1;
            frame[last] ^= 0x10;
        }

        let latency = self.latency_ms;
        self.push_raw(latency, &frame);
    }
}

impl ByteTransport for SimSensor {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        if let Some(kind) = self.write_error {
            return Err(kind.into());
        }
        for &byte in bytes {
            if self.parser.feed(byte).is_complete() {
                let request = self.parser.to_packet().unwrap();
                self.handle_request(request);
            }
        }
        Ok(bytes.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        if let Some(kind) = self.read_error {
            return Err(kind.into());
        }

        let now = self.elapsed();
        let limit = buf.len().min(self.max_read);
        let mut n = 0;
        while n < limit {
            let Some(front) = self.outbox.front_mut() else {
                break;
            };
            if front.ready_at_elapsed > now {
                break;
            }
            let take = (limit - n).min(front.bytes.len());
            buf[n..n + take].copy_from_slice(&front.bytes[..take]);
            front.bytes.drain(..take);
            n += take;
            if front.bytes.is_empty() {
                self.outbox.pop_front();
            }
        }
        Ok(n)
    }
}
