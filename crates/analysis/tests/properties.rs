//! Property tests for sanitization and metric identities.

use proptest::prelude::*;

use trfscope_analysis::decode::{field_in_bounds, sanitize_transform};
use trfscope_analysis::metrics::summarize;
use trfscope_transform_model::Transform;

/// Fields as they might come out of a misdetected binary layout:
/// ordinary values, out-of-range magnitudes, and non-finite garbage.
fn wild_field() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -20_000.0f64..20_000.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
    ]
}

proptest! {
    #[test]
    fn sanitization_is_idempotent(
        dx in wild_field(),
        dy in wild_field(),
        da in wild_field(),
    ) {
        let raw = Transform::new(dx, dy, da);
        let once = sanitize_transform(raw);
        let twice = sanitize_transform(once);

        prop_assert_eq!(once, twice);
        prop_assert!(field_in_bounds(once.dx));
        prop_assert!(field_in_bounds(once.dy));
        prop_assert!(field_in_bounds(once.da.unwrap()));
    }

    #[test]
    fn instability_index_is_the_rms_sum(
        triples in prop::collection::vec(
            (-500.0f64..500.0, -500.0f64..500.0, -3.0f64..3.0),
            1..300,
        )
    ) {
        let transforms: Vec<Transform> = triples
            .iter()
            .map(|&(dx, dy, da)| Transform::new(dx, dy, da))
            .collect();

        let metrics = summarize(&transforms).unwrap();
        prop_assert!(metrics.instability_index >= 0.0);
        prop_assert_eq!(
            metrics.instability_index,
            metrics.dx_rms + metrics.dy_rms + metrics.da_rms.unwrap()
        );
    }

    #[test]
    fn instability_index_without_rotation(
        pairs in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 1..300)
    ) {
        let transforms: Vec<Transform> = pairs
            .iter()
            .map(|&(dx, dy)| Transform::planar(dx, dy))
            .collect();

        let metrics = summarize(&transforms).unwrap();
        prop_assert!(metrics.da_rms.is_none());
        prop_assert_eq!(
            metrics.instability_index,
            metrics.dx_rms + metrics.dy_rms
        );
    }
}
