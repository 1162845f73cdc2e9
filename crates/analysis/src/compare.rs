//! Cross-file stability comparison.

use serde::{Deserialize, Serialize};

use crate::metrics::StabilityMetrics;

/// Which input won a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

/// Outcome of comparing two analysis runs by instability index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Comparison {
    /// At least one side produced no metrics (e.g. unparsable source).
    Incomparable,

    /// Both sides produced metrics; lower instability index wins.
    Decided {
        winner: Side,
        absolute_difference: f64,
        relative_improvement_pct: f64,
    },
}

/// Compare two metric snapshots. Absent metrics on either side make the
/// pair incomparable.
pub fn compare(a: Option<&StabilityMetrics>, b: Option<&StabilityMetrics>) -> Comparison {
    let (Some(a), Some(b)) = (a, b) else {
        return Comparison::Incomparable;
    };

    let index_a = a.instability_index;
    let index_b = b.instability_index;

    let winner = if index_a <= index_b { Side::A } else { Side::B };
    let absolute_difference = (index_a - index_b).abs();
    let max_index = index_a.max(index_b);
    let relative_improvement_pct = if max_index > 0.0 {
        100.0 * absolute_difference / max_index
    } else {
        0.0
    };

    Comparison::Decided {
        winner,
        absolute_difference,
        relative_improvement_pct,
    }
}
