//! Aggregate stability metrics over a transform sequence.

use serde::{Deserialize, Serialize};
use trfscope_transform_model::Transform;

/// Derived, immutable stability snapshot for one input.
///
/// `da_*` fields are present iff at least one transform carried a
/// rotation component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityMetrics {
    /// Total decoded records, including sanitized ones.
    pub frame_count: usize,

    /// Records that decoded within bounds and needed no sanitization.
    pub valid_frame_count: usize,

    pub dx_rms: f64,
    pub dy_rms: f64,
    pub dx_mean_abs: f64,
    pub dy_mean_abs: f64,
    pub dx_range: (f64, f64),
    pub dy_range: (f64, f64),

    #[serde(skip_serializing_if = "Option::is_none")]
    pub da_rms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub da_mean_abs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub da_range: Option<(f64, f64)>,

    /// Composite instability score: `dx_rms + dy_rms + da_rms`.
    /// Lower is better. The sole cross-file comparison statistic.
    pub instability_index: f64,
}

fn rms(values: &[f64]) -> f64 {
    (values.iter().map(|x| x * x).sum::<f64>() / values.len() as f64).sqrt()
}

fn mean_abs(values: &[f64]) -> f64 {
    values.iter().map(|x| x.abs()).sum::<f64>() / values.len() as f64
}

fn range(values: &[f64]) -> (f64, f64) {
    values.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(min, max), &x| (min.min(x), max.max(x)),
    )
}

/// Reduce a transform sequence to aggregate statistics.
///
/// Returns `None` on an empty sequence; the caller reports an absent
/// result instead of crashing or fabricating zeros.
pub fn summarize(transforms: &[Transform]) -> Option<StabilityMetrics> {
    if transforms.is_empty() {
        return None;
    }

    let dx: Vec<f64> = transforms.iter().map(|t| t.dx).collect();
    let dy: Vec<f64> = transforms.iter().map(|t| t.dy).collect();
    let da: Vec<f64> = transforms.iter().filter_map(|t| t.da).collect();

    let dx_rms = rms(&dx);
    let dy_rms = rms(&dy);
    let da_rms = (!da.is_empty()).then(|| rms(&da));

    Some(StabilityMetrics {
        frame_count: transforms.len(),
        valid_frame_count: transforms.len(),
        dx_rms,
        dy_rms,
        dx_mean_abs: mean_abs(&dx),
        dy_mean_abs: mean_abs(&dy),
        dx_range: range(&dx),
        dy_range: range(&dy),
        da_rms,
        da_mean_abs: (!da.is_empty()).then(|| mean_abs(&da)),
        da_range: (!da.is_empty()).then(|| range(&da)),
        instability_index: dx_rms + dy_rms + da_rms.unwrap_or(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_rejects_empty_input() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn summarize_computes_known_values() {
        let transforms = vec![
            Transform::new(1.0, 2.0, 0.1),
            Transform::new(-1.0, -2.0, -0.1),
        ];
        let metrics = summarize(&transforms).unwrap();

        assert_eq!(metrics.frame_count, 2);
        assert!((metrics.dx_rms - 1.0).abs() < 1e-12);
        assert!((metrics.dy_rms - 2.0).abs() < 1e-12);
        assert!((metrics.dx_mean_abs - 1.0).abs() < 1e-12);
        assert!((metrics.da_rms.unwrap() - 0.1).abs() < 1e-12);
        assert_eq!(metrics.dx_range, (-1.0, 1.0));
        assert_eq!(metrics.dy_range, (-2.0, 2.0));
        assert_eq!(
            metrics.instability_index,
            metrics.dx_rms + metrics.dy_rms + metrics.da_rms.unwrap()
        );
    }

    #[test]
    fn rotation_fields_absent_for_planar_transforms() {
        let transforms = vec![Transform::planar(3.0, 4.0), Transform::planar(-3.0, -4.0)];
        let metrics = summarize(&transforms).unwrap();

        assert!(metrics.da_rms.is_none());
        assert!(metrics.da_mean_abs.is_none());
        assert!(metrics.da_range.is_none());
        assert_eq!(metrics.instability_index, metrics.dx_rms + metrics.dy_rms);
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let metrics = summarize(&[Transform::planar(1.0, 1.0)]).unwrap();
        let json = serde_json::to_string(&metrics).unwrap();
        assert!(!json.contains("da_rms"));

        let metrics = summarize(&[Transform::new(1.0, 1.0, 0.5)]).unwrap();
        let json = serde_json::to_string(&metrics).unwrap();
        assert!(json.contains("da_rms"));
    }
}
