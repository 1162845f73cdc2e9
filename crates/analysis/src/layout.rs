//! Binary layout detection.
//!
//! The true TRF record geometry is undocumented and varies between
//! vidstab builds, so this module searches a bounded space of plausible
//! (header size, record size) pairs and validates each candidate by
//! decoding a sample of records and checking numeric plausibility.
//! Bounded magnitudes, no NaNs, and a low sample RMS substitute for a
//! format specification.
//!
//! The search space is small (at most 7×14 pairs), so brute force is
//! acceptable; the expensive full decode is deferred until a candidate
//! is chosen.

use tracing::{debug, info};
use trfscope_transform_model::{
    LayoutCandidate, HEADER_SIZE_CANDIDATES, RECORD_SIZE_CANDIDATES,
};

use crate::decode::{field_in_bounds, read_f32_le};

/// A candidate is rejected when the sample RMS of dx or dy reaches this
/// value: a layout can divide the buffer evenly and still decode
/// garbage magnitudes.
pub const SAMPLE_RMS_LIMIT: f64 = 1_000.0;

// Frame-count plausibility bounds, both exclusive.
const MIN_FRAME_COUNT: usize = 100;
const MAX_FRAME_COUNT: usize = 1_000_000;

// At most this many float fields are decoded per sampled record.
const MAX_SAMPLE_FIELDS: usize = 16;

// A candidate within this many frames of the caller's expectation is
// accepted immediately without scanning further.
const EXCELLENT_FRAME_DIFF: u64 = 10;

/// A feasible configuration, surfaced for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct FeasibleConfig {
    pub layout: LayoutCandidate,
    pub frame_count: usize,
}

/// Layout search engine over enumerated (header size, record size)
/// candidates.
///
/// Selection is first-fit in enumeration order (header sizes outer and
/// ascending, record sizes inner), not a global optimum search. When
/// `expected_frames` is supplied the engine keeps scanning and prefers
/// the accepted candidate whose frame count is closest to the
/// expectation, short-circuiting on a near-exact match.
#[derive(Debug, Clone)]
pub struct LayoutSearch {
    /// Header sizes to probe, smallest first.
    pub header_sizes: Vec<usize>,

    /// Record sizes to probe under each header size.
    pub record_sizes: Vec<usize>,

    /// Records decoded per candidate for validation, clamped to 10..=20.
    pub sample_window: usize,

    /// A-priori frame-count expectation (e.g. inferred from capture
    /// duration and rate) used to bias selection.
    pub expected_frames: Option<u64>,
}

impl Default for LayoutSearch {
    fn default() -> Self {
        Self {
            header_sizes: HEADER_SIZE_CANDIDATES.to_vec(),
            record_sizes: RECORD_SIZE_CANDIDATES.to_vec(),
            sample_window: 20,
            expected_frames: None,
        }
    }
}

impl LayoutSearch {
    /// Default candidate sets with an optional frame-count expectation.
    pub fn with_expected_frames(expected_frames: Option<u64>) -> Self {
        Self {
            expected_frames,
            ..Default::default()
        }
    }

    /// Frame count under `candidate`, or `None` if the pair is
    /// infeasible for this buffer length.
    fn feasible_frame_count(
        &self,
        buffer_len: usize,
        candidate: LayoutCandidate,
    ) -> Option<usize> {
        if candidate.record_size == 0 || candidate.record_size % 4 != 0 {
            return None;
        }
        if !candidate.divides_evenly(buffer_len) {
            return None;
        }
        let frames = candidate.frame_count(buffer_len);
        (frames > MIN_FRAME_COUNT && frames < MAX_FRAME_COUNT).then_some(frames)
    }

    /// Every feasible configuration for this buffer length, in
    /// enumeration order. Diagnostic only; feasibility says nothing
    /// about decode plausibility.
    pub fn feasible_configs(&self, buffer_len: usize) -> Vec<FeasibleConfig> {
        let mut configs = Vec::new();
        for &header_size in &self.header_sizes {
            for &record_size in &self.record_sizes {
                let candidate = LayoutCandidate {
                    header_size,
                    record_size,
                };
                if let Some(frame_count) = self.feasible_frame_count(buffer_len, candidate) {
                    configs.push(FeasibleConfig {
                        layout: candidate,
                        frame_count,
                    });
                }
            }
        }
        configs
    }

    /// Search for a layout that decodes plausibly.
    ///
    /// Returns `None` when no candidate validates; the caller is
    /// expected to fall back to [`LayoutCandidate::FALLBACK`].
    pub fn search(&self, buffer: &[u8]) -> Option<LayoutCandidate> {
        let sample_window = self.sample_window.clamp(10, 20);
        let mut best: Option<(u64, LayoutCandidate, usize)> = None;

        for &header_size in &self.header_sizes {
            for &record_size in &self.record_sizes {
                let candidate = LayoutCandidate {
                    header_size,
                    record_size,
                };
                let Some(frames) = self.feasible_frame_count(buffer.len(), candidate) else {
                    continue;
                };

                debug!(header_size, record_size, frames, "testing layout candidate");

                let Some((dx_rms, dy_rms)) = sample_rms(buffer, candidate, sample_window, frames)
                else {
                    debug!(header_size, record_size, "sample rejected: invalid values");
                    continue;
                };
                if dx_rms >= SAMPLE_RMS_LIMIT || dy_rms >= SAMPLE_RMS_LIMIT {
                    debug!(
                        header_size,
                        record_size, dx_rms, dy_rms, "sample rejected: implausible magnitudes"
                    );
                    continue;
                }

                let Some(expected) = self.expected_frames else {
                    info!(
                        header_size,
                        record_size, frames, "layout detected (first fit)"
                    );
                    return Some(candidate);
                };

                let diff = (frames as i64 - expected as i64).unsigned_abs();
                if diff < EXCELLENT_FRAME_DIFF {
                    info!(
                        header_size,
                        record_size, frames, expected, "layout detected (matches expectation)"
                    );
                    return Some(candidate);
                }
                if best.map_or(true, |(best_diff, _, _)| diff < best_diff) {
                    best = Some((diff, candidate, frames));
                }
            }
        }

        best.map(|(diff, candidate, frames)| {
            info!(
                header_size = candidate.header_size,
                record_size = candidate.record_size,
                frames,
                diff_from_expected = diff,
                "layout detected (closest to expectation)"
            );
            candidate
        })
    }
}

/// Decode a sample of records at the front of the data region and
/// return the RMS of the first two fields, or `None` if any sampled
/// record reads past the buffer or carries an out-of-bounds field.
fn sample_rms(
    buffer: &[u8],
    candidate: LayoutCandidate,
    sample_window: usize,
    frames: usize,
) -> Option<(f64, f64)> {
    let take = sample_window.min(frames);
    let fields = candidate.floats_per_record().min(MAX_SAMPLE_FIELDS);
    if take == 0 || fields < 3 {
        return None;
    }

    let mut sum_dx_sq = 0.0;
    let mut sum_dy_sq = 0.0;

    for i in 0..take {
        let offset = candidate.record_offset(i);
        if offset + fields * 4 > buffer.len() {
            return None;
        }

        let mut first = [0.0f64; 3];
        for j in 0..fields {
            let value = f64::from(read_f32_le(buffer, offset + j * 4)?);
            if j < 3 {
                if !field_in_bounds(value) {
                    return None;
                }
                first[j] = value;
            }
        }

        sum_dx_sq += first[0] * first[0];
        sum_dy_sq += first[1] * first[1];
    }

    let n = take as f64;
    Some(((sum_dx_sq / n).sqrt(), (sum_dy_sq / n).sqrt()))
}
