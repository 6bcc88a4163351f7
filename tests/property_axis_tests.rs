use chart_geometry::core::DataValue;
use chart_geometry::core::axis::{reduce_ticks, rotation_angle};
use proptest::prelude::*;

proptest! {
    #[test]
    fn rotation_snaps_to_thirty_degree_steps(
        labels in prop::collection::vec("[a-z]{0,40}", 0..40),
        width in 0.0f64..2_000.0,
        max_length in 1usize..32
    ) {
        let angle = rotation_angle(&labels, width, max_length);
        prop_assert!([0.0, -30.0, -60.0, -90.0].contains(&angle));
    }

    #[test]
    fn wider_axes_never_rotate_more(
        labels in prop::collection::vec("[a-z]{1,20}", 1..20),
        width in 10.0f64..1_000.0,
        extra in 0.0f64..1_000.0
    ) {
        let narrow = rotation_angle(&labels, width, 16);
        let wide = rotation_angle(&labels, width + extra, 16);
        prop_assert!(wide >= narrow);
    }

    #[test]
    fn reduced_ticks_are_an_ordered_subset(
        count in 0usize..200,
        max_ticks in 0usize..50
    ) {
        let ticks: Vec<DataValue> = (0..count).map(|index| DataValue::Number(index as f64)).collect();
        let reduced = reduce_ticks(&ticks, max_ticks);

        if count <= max_ticks {
            prop_assert_eq!(&reduced, &ticks);
        } else if max_ticks == 0 {
            prop_assert!(reduced.is_empty());
        } else {
            prop_assert!(reduced.len() < max_ticks * 2);
            prop_assert_eq!(&reduced[0], &ticks[0]);
            let positions: Vec<f64> = reduced
                .iter()
                .filter_map(DataValue::as_continuous)
                .collect();
            prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
