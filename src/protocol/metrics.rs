use super::{InvalidReason, ParseOutcome};

/// Per-endpoint link counters.
///
/// Kept on the endpoint rather than in globals so several sensors on one
/// host report independently.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkStats {
    /// Frames handed to the transport
    pub frames_sent: u64,
    /// Bytes handed to the transport
    pub bytes_sent: u64,
    /// Bytes read from the transport
    pub bytes_received: u64,
    /// CRC-valid packets assembled
    pub packets_received: u64,
    /// Valid packets dropped because another command ID was awaited
    pub packets_discarded: u64,
    /// Frames dropped for a CRC mismatch
    pub crc_errors: u64,
    /// Frames dropped for an impossible length
    pub length_errors: u64,
    /// Managed-command resends after a silent attempt
    pub retries: u64,
    /// Waits that reached their deadline
    pub timeouts: u64,
}

impl LinkStats {
    #[inline]
    pub(crate) fn record_outcome(&mut self, outcome: ParseOutcome) {
        match outcome {
            ParseOutcome::Incomplete => {}
            ParseOutcome::Complete => self.packets_received += 1,
            ParseOutcome::Invalid(InvalidReason::BadCrc { .. }) => self.crc_errors += 1,
            ParseOutcome::Invalid(InvalidReason::TooLong { .. } | InvalidReason::Empty) => {
                self.length_errors += 1;
            }
        }
    }

    #[inline]
    pub(crate) fn record_sent(&mut self, len: usize) {
        self.frames_sent += 1;
        self.bytes_sent += len as u64;
    }

    /// Frames lost to corruption of any kind.
    #[must_use]
    pub const fn framing_errors(&self) -> u64 {
        self.crc_errors + self.length_errors
    }

    /// Share of assembled frames that were corrupt, if any frame was seen.
    #[must_use]
    pub fn error_rate(&self) -> Option<f64> {
        let total = self.packets_received + self.framing_errors();
        if total == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(self.framing_errors() as f64 / total as f64)
    }
}
