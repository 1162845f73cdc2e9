//! Per-frame motion-correction transforms and the text TRF format.
//!
//! The text format is UTF-8 line-oriented: lines beginning with `#` and
//! empty lines are skipped; data lines are whitespace-separated fields
//! where field 0 is the frame index (ignored on parse) and fields 1..=3
//! are dx, dy, da as decimal floating point.

use serde::{Deserialize, Serialize};
use trfscope_common::{TrfError, TrfResult};

/// A single per-frame motion correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Horizontal pixel shift.
    pub dx: f64,

    /// Vertical pixel shift.
    pub dy: f64,

    /// Rotation in radians, when the source carried a third component.
    pub da: Option<f64>,
}

impl Transform {
    /// Create a transform with all three components.
    pub fn new(dx: f64, dy: f64, da: f64) -> Self {
        Self {
            dx,
            dy,
            da: Some(da),
        }
    }

    /// Create a translation-only transform.
    pub fn planar(dx: f64, dy: f64) -> Self {
        Self { dx, dy, da: None }
    }
}

/// Parse transforms from text TRF content.
///
/// Data lines with fewer than 4 fields are skipped; a field that is
/// present but not a valid decimal float is a format error.
pub fn parse_text_transforms(content: &str) -> TrfResult<Vec<Transform>> {
    let mut transforms = Vec::new();

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            continue;
        }

        // fields[0] is the frame index; sequence order is authoritative.
        let parse = |field: &str| -> TrfResult<f64> {
            field.parse::<f64>().map_err(|e| {
                TrfError::format(format!(
                    "line {}: invalid float {:?}: {}",
                    lineno + 1,
                    field,
                    e
                ))
            })
        };

        transforms.push(Transform::new(
            parse(fields[1])?,
            parse(fields[2])?,
            parse(fields[3])?,
        ));
    }

    Ok(transforms)
}

/// Serialize transforms to text TRF format.
///
/// Emits a 2-line comment header restating the frame count, then one
/// `index dx dy da` line per transform with 6-decimal fixed point.
pub fn serialize_transforms(transforms: &[Transform]) -> String {
    let mut output = String::new();
    output.push_str("# trfscope transform data\n");
    output.push_str(&format!("# Frame count: {}\n", transforms.len()));

    for (i, t) in transforms.iter().enumerate() {
        output.push_str(&format!(
            "{} {:.6} {:.6} {:.6}\n",
            i,
            t.dx,
            t.dy,
            t.da.unwrap_or(0.0)
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let content = "# comment\n\n0 1.0 2.0 0.1\n1 -1.0 -2.0 -0.1\n";
        let transforms = parse_text_transforms(content).unwrap();
        assert_eq!(transforms.len(), 2);
        assert_eq!(transforms[0], Transform::new(1.0, 2.0, 0.1));
        assert_eq!(transforms[1], Transform::new(-1.0, -2.0, -0.1));
    }

    #[test]
    fn parse_preserves_file_order() {
        let content = "0 1.0 0.0 0.0\n1 2.0 0.0 0.0\n2 3.0 0.0 0.0\n";
        let transforms = parse_text_transforms(content).unwrap();
        let dx: Vec<f64> = transforms.iter().map(|t| t.dx).collect();
        assert_eq!(dx, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn parse_skips_short_lines() {
        let content = "0 1.0 2.0\n0 1.0 2.0 0.1\n";
        let transforms = parse_text_transforms(content).unwrap();
        assert_eq!(transforms.len(), 1);
    }

    #[test]
    fn parse_rejects_malformed_floats() {
        let content = "0 1.0 oops 0.1\n";
        let err = parse_text_transforms(content).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn serialize_writes_header_and_fixed_point_lines() {
        let transforms = vec![Transform::new(1.5, -2.25, 0.125)];
        let text = serialize_transforms(&transforms);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# trfscope transform data");
        assert_eq!(lines[1], "# Frame count: 1");
        assert_eq!(lines[2], "0 1.500000 -2.250000 0.125000");
    }

    proptest! {
        /// Export-then-parse agrees with the original within 6-decimal
        /// rounding.
        #[test]
        fn text_round_trip_within_rounding(
            triples in prop::collection::vec(
                (-1000.0f64..1000.0, -1000.0f64..1000.0, -3.2f64..3.2),
                1..100,
            )
        ) {
            let original: Vec<Transform> = triples
                .iter()
                .map(|&(dx, dy, da)| Transform::new(dx, dy, da))
                .collect();

            let text = serialize_transforms(&original);
            let parsed = parse_text_transforms(&text).unwrap();

            prop_assert_eq!(parsed.len(), original.len());
            for (a, b) in original.iter().zip(&parsed) {
                prop_assert!((a.dx - b.dx).abs() < 1e-6);
                prop_assert!((a.dy - b.dy).abs() < 1e-6);
                prop_assert!((a.da.unwrap() - b.da.unwrap()).abs() < 1e-6);
            }
        }
    }
}
