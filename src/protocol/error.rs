//! LWNX error types

use thiserror::Error;

/// LWNX protocol errors
#[derive(Error, Debug)]
pub enum Error {
    /// Managed command ran out of attempts without a matching reply
    #[error("no response to command {command_id} after {attempts} attempts")]
    NoResponse {
        /// Command that was sent
        command_id: u8,
        /// Number of send+wait cycles performed
        attempts: u32,
    },

    /// Blocking receive reached its deadline
    #[error("timed out after {timeout_ms}ms waiting for a packet")]
    Timeout {
        /// Wait that elapsed
        timeout_ms: u32,
    },

    /// Byte transport failure
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// Payload does not fit the flags length field
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Payload size
        size: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Buffer too small
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Frame does not begin with the start byte
    #[error("invalid start byte: expected 0xAA, got {found:#04x}")]
    InvalidStartByte {
        /// Found byte
        found: u8,
    },

    /// Frame length disagrees with its flags word
    #[error("frame length mismatch: flags announce {expected} bytes, got {got}")]
    LengthMismatch {
        /// Length implied by the flags word
        expected: usize,
        /// Length of the supplied frame
        got: usize,
    },

    /// Checksum mismatch
    #[error("checksum mismatch: expected {expected:#06x}, got {found:#06x}")]
    ChecksumMismatch {
        /// Checksum computed over the frame
        expected: u16,
        /// Checksum carried by the frame
        found: u16,
    },

    /// Reply carried fewer data bytes than the requested value needs
    #[error("short response to command {command_id}: need {needed} bytes, got {got}")]
    ShortResponse {
        /// Command that was answered
        command_id: u8,
        /// Bytes required
        needed: usize,
        /// Bytes received
        got: usize,
    },

    /// Invalid UTF-8
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Whether this error means the device stayed silent rather than the link failing.
    #[must_use]
    pub const fn is_silence(&self) -> bool {
        matches!(self, Self::NoResponse { .. } | Self::Timeout { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
