//! The advisory binary TRF file header.

use serde::{Deserialize, Serialize};

/// Byte length of the fixed binary header (magic + three u32 fields).
pub const HEADER_LEN: usize = 16;

/// Decoded binary TRF header.
///
/// Advisory only. The `frame_count` field has been observed to disagree
/// with the actual record count, so it is surfaced for diagnostics and
/// never used to gate decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInfo {
    /// The 4-byte magic tag (always `TRF1` when present).
    pub magic: [u8; 4],

    /// Format version as written by the producer.
    pub version: u32,

    /// Frame count as advertised by the producer. Unreliable.
    pub advertised_frame_count: u32,

    /// Data-region size as advertised by the producer.
    pub advertised_data_size: u32,
}
