//! Byte transport capability and an adapter for `std::io` streams.

use std::io::{self, ErrorKind, Read, Write};

/// Raw byte link to a device (serial port, I2C bridge, socket, simulator).
///
/// The endpoint borrows or owns an implementation but never opens or
/// closes the underlying device.
pub trait ByteTransport {
    /// Write bytes, returning how many were accepted.
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize>;

    /// Read up to `buf.len()` bytes. `Ok(0)` means nothing is available right now.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<T: ByteTransport + ?Sized> ByteTransport for &mut T {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        (**self).write(bytes)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }
}

impl<T: ByteTransport + ?Sized> ByteTransport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        (**self).write(bytes)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }
}

/// Adapts a blocking `Read + Write` stream to [`ByteTransport`].
///
/// Serial port handles report an expired read timeout as `TimedOut` and
/// non-blocking descriptors report `WouldBlock`; both mean "no data yet"
/// here, as does `Interrupted`.
#[derive(Debug)]
pub struct IoTransport<T> {
    inner: T,
}

impl<T> IoTransport<T> {
    /// Wrap a stream.
    pub const fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Borrow the wrapped stream.
    pub const fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the wrapped stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Unwrap the stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + Write> ByteTransport for IoTransport<T> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(bytes)?;
        self.inner.flush()?;
        Ok(written)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf) {
            Ok(n) => Ok(n),
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                ) =>
            {
                Ok(0)
            }
            Err(err) => Err(err),
        }
    }
}
