//! Typed managed commands for register-style reads and writes.
//!
//! Values travel little-endian; strings occupy a fixed 16-byte, NUL-padded field.

use bytes::Bytes;

use crate::protocol::{Direction, Error, FirmwareVersion, Result};

use super::clock::Clock;
use super::endpoint::Endpoint;
use super::port::ByteTransport;

/// Width of string registers.
pub const STR16_LEN: usize = 16;

macro_rules! scalar_commands {
    ($($read:ident, $write:ident => $ty:ty;)*) => {
        $(
            #[doc = concat!("Read a little-endian `", stringify!($ty), "` register.")]
            ///
            /// # Errors
            ///
            /// [`Error::ShortResponse`] if the reply is too short for the value.
            pub fn $read(&mut self, command_id: u8) -> Result<$ty> {
                self.read_array(command_id).map(<$ty>::from_le_bytes)
            }

            #[doc = concat!("Write a little-endian `", stringify!($ty), "` register.")]
            pub fn $write(&mut self, command_id: u8, value: $ty) -> Result<()> {
                self.write_data(command_id, &value.to_le_bytes())
            }
        )*
    };
}

impl<T: ByteTransport, C: Clock> Endpoint<T, C> {
    scalar_commands! {
        read_u8, write_u8 => u8;
        read_u16, write_u16 => u16;
        read_u32, write_u32 => u32;
        read_i8, write_i8 => i8;
        read_i16, write_i16 => i16;
        read_i32, write_i32 => i32;
    }

    /// Managed read returning up to `len` data bytes.
    pub fn read_data(&mut self, command_id: u8, len: usize) -> Result<Bytes> {
        self.send_and_await(command_id, Direction::Read, &[], len)
    }

    /// Managed write; the device's echo is not inspected.
    pub fn write_data(&mut self, command_id: u8, data: &[u8]) -> Result<()> {
        self.send_and_await(command_id, Direction::Write, data, 0)
            .map(drop)
    }

    /// Read a 16-byte string register, stopping at the first NUL.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidUtf8`] if the register does not hold UTF-8 text.
    pub fn read_str16(&mut self, command_id: u8) -> Result<String> {
        let raw = self.read_data(command_id, STR16_LEN)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8(raw[..end].to_vec())?)
    }

    /// Write a 16-byte string register. Longer input is truncated.
    pub fn write_str16(&mut self, command_id: u8, value: &str) -> Result<()> {
        let mut field = [0u8; STR16_LEN];
        let len = value.len().min(STR16_LEN);
        field[..len].copy_from_slice(&value.as_bytes()[..len]);
        self.write_data(command_id, &field)
    }

    /// Read a packed firmware version register.
    pub fn read_firmware_version(&mut self, command_id: u8) -> Result<FirmwareVersion> {
        self.read_u32(command_id).map(FirmwareVersion::from)
    }

    fn read_array<const N: usize>(&mut self, command_id: u8) -> Result<[u8; N]> {
        let payload = self.read_data(command_id, N)?;
        <[u8; N]>::try_from(&payload[..]).map_err(|_| Error::ShortResponse {
            command_id,
            needed: N,
            got: payload.len(),
        })
    }
}
