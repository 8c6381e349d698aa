//! Checksum preflight between two endpoints.
//!
//! Before trusting index handles from a peer, the surrounding protocol can exchange a
//! [`TableSummary`] of each side's table and compare them. A mismatch means the two sides
//! registered different type sets, typically because their built-in types disagree.
//!
//! The summary travels as 12 bytes: the entry count as a little-endian `u32` followed by the
//! checksum as a little-endian `u64`.

use log::warn;

use crate::{Error, Result};

/// Count and checksum of a [`TypeTable`](super::TypeTable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableSummary {
    /// Number of registered types, including the reserved slots
    pub count: u32,
    /// Sum of the fingerprints of all registered types
    pub checksum: u64,
}

impl TableSummary {
    /// Size of the encoded summary in bytes
    pub const ENCODED_LEN: usize = 12;

    /// Encode the summary for exchange
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut bytes = [0u8; Self::ENCODED_LEN];
        bytes[..4].copy_from_slice(&self.count.to_le_bytes());
        bytes[4..].copy_from_slice(&self.checksum.to_le_bytes());
        bytes
    }

    /// Decode a summary received from the peer
    ///
    /// ## Arguments
    /// * 'data' - Exactly [`ENCODED_LEN`](Self::ENCODED_LEN) bytes
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if `data` has the wrong length.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != Self::ENCODED_LEN {
            return Err(malformed_error!(
                "Table summary must be {} bytes, got {}",
                Self::ENCODED_LEN,
                data.len()
            ));
        }

        let mut count = [0u8; 4];
        count.copy_from_slice(&data[..4]);
        let mut checksum = [0u8; 8];
        checksum.copy_from_slice(&data[4..]);

        Ok(TableSummary {
            count: u32::from_le_bytes(count),
            checksum: u64::from_le_bytes(checksum),
        })
    }

    /// Compare against the peer's summary
    ///
    /// # Errors
    /// Returns [`Error::ChecksumMismatch`] if count or checksum differ.
    pub fn ensure_compatible(&self, remote: &TableSummary) -> Result<()> {
        if self == remote {
            return Ok(());
        }

        warn!(
            "type table mismatch: local {} / 0x{:016x}, remote {} / 0x{:016x}",
            self.count, self.checksum, remote.count, remote.checksum
        );
        Err(Error::ChecksumMismatch {
            local_count: self.count,
            local_checksum: self.checksum,
            remote_count: remote.count,
            remote_checksum: remote.checksum,
        })
    }
}
