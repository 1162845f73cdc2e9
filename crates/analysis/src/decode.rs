//! Bulk decoding and sanitization of binary transform records.

use tracing::{debug, warn};
use trfscope_transform_model::{LayoutCandidate, Transform};

/// Decoded fields that are NaN or exceed this magnitude are sanitized.
pub const FIELD_MAGNITUDE_LIMIT: f64 = 10_000.0;

/// Hard cap on decoded records, bounding memory on pathological inputs.
pub const MAX_RECORDS_DEFAULT: usize = 100_000;

// Thresholds for anomaly warnings during bulk decode. Transforms this
// large are suspicious even when they pass the sanitization bounds.
const ANOMALY_SHIFT_LIMIT: f64 = 100.0;
const ANOMALY_ANGLE_LIMIT: f64 = std::f64::consts::PI;

pub(crate) fn read_f32_le(buffer: &[u8], offset: usize) -> Option<f32> {
    let bytes = buffer.get(offset..offset + 4)?;
    Some(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub(crate) fn read_u32_le(buffer: &[u8], offset: usize) -> Option<u32> {
    let bytes = buffer.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Whether a decoded field needs no sanitization.
pub fn field_in_bounds(value: f64) -> bool {
    value.is_finite() && value.abs() <= FIELD_MAGNITUDE_LIMIT
}

/// Replace an out-of-range or non-finite field with a safe default.
pub fn sanitize_field(value: f64) -> f64 {
    if field_in_bounds(value) {
        value
    } else {
        0.0
    }
}

/// Sanitize every field of a transform. Idempotent: sanitized fields
/// are always within bounds.
pub fn sanitize_transform(transform: Transform) -> Transform {
    Transform {
        dx: sanitize_field(transform.dx),
        dy: sanitize_field(transform.dy),
        da: transform.da.map(sanitize_field),
    }
}

/// Result of replaying a layout over the full data region.
#[derive(Debug, Clone, Default)]
pub struct DecodedTransforms {
    /// All decoded records in frame order, sanitized in place.
    pub transforms: Vec<Transform>,

    /// The subset of records whose original decoded fields were all
    /// within bounds. Metrics are computed over this subset.
    pub valid: Vec<Transform>,
}

impl DecodedTransforms {
    pub fn valid_count(&self) -> usize {
        self.valid.len()
    }
}

/// Replay `layout` across the buffer, extracting the first 3 float
/// fields of each record as (dx, dy, da).
///
/// Decoding is capped at `max_records` and stops early, without
/// erroring, the moment a record would read past the buffer end: a
/// truncated file yields a truncated, valid result.
pub fn decode_transforms(
    buffer: &[u8],
    layout: LayoutCandidate,
    max_records: usize,
) -> DecodedTransforms {
    let frames = layout.frame_count(buffer.len());
    let budget = frames.min(max_records);
    if budget < frames {
        warn!(
            frames,
            max_records, "frame count exceeds record budget; decoding a prefix"
        );
    }

    let mut decoded = DecodedTransforms {
        transforms: Vec::with_capacity(budget),
        valid: Vec::new(),
    };

    for i in 0..budget {
        let offset = layout.record_offset(i);
        if offset + layout.record_size > buffer.len() {
            warn!(frame = i, "record extends past end of buffer; stopping early");
            break;
        }

        let (Some(dx), Some(dy), Some(da)) = (
            read_f32_le(buffer, offset).map(f64::from),
            read_f32_le(buffer, offset + 4).map(f64::from),
            read_f32_le(buffer, offset + 8).map(f64::from),
        ) else {
            warn!(frame = i, "record too short for three fields; stopping early");
            break;
        };

        if i < 10 {
            debug!(frame = i, dx, dy, da, "decoded record");
        }

        if dx.abs() > ANOMALY_SHIFT_LIMIT
            || dy.abs() > ANOMALY_SHIFT_LIMIT
            || da.abs() > ANOMALY_ANGLE_LIMIT
        {
            warn!(frame = i, dx, dy, da, "large transform detected");
        }

        let raw = Transform::new(dx, dy, da);
        if field_in_bounds(dx) && field_in_bounds(dy) && field_in_bounds(da) {
            decoded.valid.push(raw);
        }
        decoded.transforms.push(sanitize_transform(raw));
    }

    decoded
}
