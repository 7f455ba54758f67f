//! LWNX request direction and decoded value types

use std::fmt;

/// Request direction carried in bit 0 of the flags word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Ask the device for the current value
    #[default]
    Read,
    /// Send a new value to the device
    Write,
}

impl Direction {
    /// Check if this is a write
    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl From<bool> for Direction {
    fn from(is_write: bool) -> Self {
        if is_write { Self::Write } else { Self::Read }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Firmware version packed into a 32-bit register value
///
/// Byte 0 holds the patch number, byte 1 the minor and byte 2 the major
/// version; byte 3 is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FirmwareVersion {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
    /// Patch version
    pub patch: u8,
}

impl FirmwareVersion {
    /// Create a version from its parts
    #[must_use]
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Pack back into the register layout
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        u32::from_le_bytes([self.patch, self.minor, self.major, 0])
    }
}

impl From<u32> for FirmwareVersion {
    fn from(raw: u32) -> Self {
        let [patch, minor, major, _] = raw.to_le_bytes();
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
