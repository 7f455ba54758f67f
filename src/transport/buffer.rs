//! Receive backlog between the transport and the parser.
//!
//! Reads are chunked for throughput, but the parser stops at the end of the
//! first packet it completes; whatever followed stays here for the next
//! receive instead of being thrown away.

use std::io;

use bytes::{Buf, BytesMut};

use super::ByteTransport;

#[derive(Debug)]
pub(crate) struct RxBuffer {
    pending: BytesMut,
    scratch: Vec<u8>,
}

impl RxBuffer {
    pub(crate) fn new(chunk: usize) -> Self {
        let chunk = chunk.max(1);
        Self {
            pending: BytesMut::with_capacity(chunk),
            scratch: vec![0u8; chunk],
        }
    }

    /// Perform exactly one transport read, appending what arrived.
    pub(crate) fn fill<T: ByteTransport + ?Sized>(&mut self, transport: &mut T) -> io::Result<usize> {
        let n = transport.read(&mut self.scratch)?;
        let n = n.min(self.scratch.len());
        self.pending.extend_from_slice(&self.scratch[..n]);
        Ok(n)
    }

    /// Next unparsed byte.
    pub(crate) fn pop(&mut self) -> Option<u8> {
        self.pending.has_remaining().then(|| self.pending.get_u8())
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }
}
