//! Hypothesized binary record geometry.

use serde::{Deserialize, Serialize};

/// Header sizes worth probing, smallest first. Enumeration order is a
/// tie-break policy: earlier candidates win on equal score.
pub const HEADER_SIZE_CANDIDATES: [usize; 7] = [16, 20, 24, 32, 64, 128, 256];

/// Record sizes observed or plausible across vidstab builds.
pub const RECORD_SIZE_CANDIDATES: [usize; 14] = [
    24, 32, 48, 52, 64, 96, 128, 256, 512, 1024, 2048, 2752, 2756, 2760,
];

/// A hypothesized (header size, record size) pair describing binary
/// record geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutCandidate {
    /// Bytes before the first record.
    pub header_size: usize,

    /// Bytes per record.
    pub record_size: usize,
}

impl LayoutCandidate {
    /// Default layout used when detection fails: a 20-byte header
    /// followed by 24-byte records of 6 floats each.
    pub const FALLBACK: Self = Self {
        header_size: 20,
        record_size: 24,
    };

    /// Number of whole records the buffer holds under this layout.
    pub fn frame_count(&self, buffer_len: usize) -> usize {
        buffer_len.saturating_sub(self.header_size) / self.record_size
    }

    /// Whether the data region divides evenly into records.
    pub fn divides_evenly(&self, buffer_len: usize) -> bool {
        buffer_len >= self.header_size
            && (buffer_len - self.header_size) % self.record_size == 0
    }

    /// How many 32-bit float fields fit in one record.
    pub fn floats_per_record(&self) -> usize {
        self.record_size / 4
    }

    /// Byte offset of the record at `index`.
    pub fn record_offset(&self, index: usize) -> usize {
        self.header_size + index * self.record_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_ignores_trailing_partial_record() {
        let layout = LayoutCandidate {
            header_size: 16,
            record_size: 24,
        };
        assert_eq!(layout.frame_count(16 + 24 * 3), 3);
        assert_eq!(layout.frame_count(16 + 24 * 3 + 7), 3);
        assert_eq!(layout.frame_count(10), 0);
    }

    #[test]
    fn divides_evenly_requires_exact_fit() {
        let layout = LayoutCandidate {
            header_size: 20,
            record_size: 24,
        };
        assert!(layout.divides_evenly(20 + 24 * 100));
        assert!(!layout.divides_evenly(20 + 24 * 100 + 1));
        assert!(!layout.divides_evenly(12));
    }

    #[test]
    fn fallback_matches_legacy_geometry() {
        assert_eq!(LayoutCandidate::FALLBACK.header_size, 20);
        assert_eq!(LayoutCandidate::FALLBACK.record_size, 24);
        assert_eq!(LayoutCandidate::FALLBACK.floats_per_record(), 6);
    }
}
