use std::f64::consts::{FRAC_PI_2, PI, TAU};

use approx::assert_abs_diff_eq;
use chart_geometry::core::arc::{
    PieLayout, exploded_outer_radius, interpolate_angles, label_visible, pie_angles, pie_radii,
    pie_slices, polar_to_xy, push_apart_labels, text_anchor_for,
};
use chart_geometry::core::label::TextAnchor;
use chart_geometry::core::{
    ArcAngles, ArcDescriptor, ColorHelper, ColorScheme, DataPoint, DataValue, ScaleType,
};

fn colors(names: &[&str]) -> ColorHelper {
    ColorHelper::new(
        ColorScheme::default(),
        ScaleType::Ordinal,
        names.iter().map(|name| DataValue::text(*name)).collect(),
    )
    .expect("valid palette")
}

#[test]
fn pie_angles_accumulate_over_a_full_turn() {
    let angles = pie_angles(&[1.0, 1.0, 2.0]);
    let expected = [(0.0, FRAC_PI_2), (FRAC_PI_2, PI), (PI, TAU)];
    assert_eq!(angles.len(), 3);
    for (actual, (start, end)) in angles.iter().zip(expected) {
        assert_abs_diff_eq!(actual.start_angle, start, epsilon = 1e-12);
        assert_abs_diff_eq!(actual.end_angle, end, epsilon = 1e-12);
    }
}

#[test]
fn non_positive_values_get_empty_spans() {
    let angles = pie_angles(&[-3.0, 2.0, 0.0, f64::NAN]);
    assert_eq!(angles[0].span(), 0.0);
    assert_abs_diff_eq!(angles[1].span(), TAU, epsilon = 1e-12);
    assert_eq!(angles[2].span(), 0.0);
    assert_eq!(angles[3].span(), 0.0);

    let zeros = pie_angles(&[0.0, 0.0]);
    assert!(zeros.iter().all(|angles| angles.span() == 0.0));
}

#[test]
fn arc_path_handles_degenerate_and_full_turns() {
    let empty = ArcDescriptor::new(ArcAngles::new(0.0, 1.0), 0.0, 0.0);
    assert_eq!(empty.path(), "M0,0Z");

    let full = ArcDescriptor::new(ArcAngles::new(0.0, TAU), 0.0, 10.0).path();
    assert_eq!(full.matches('A').count(), 2);
    assert!(full.ends_with('Z'));

    let ring = ArcDescriptor::new(ArcAngles::new(0.0, TAU), 5.0, 10.0).path();
    assert_eq!(ring.matches('A').count(), 4);
}

#[test]
fn sector_paths_close_through_the_center_or_inner_edge() {
    let wedge = ArcDescriptor::new(ArcAngles::new(0.0, FRAC_PI_2), 0.0, 10.0).path();
    assert!(wedge.starts_with('M'));
    assert!(wedge.contains("A10,10,0,0,1,"));
    assert!(wedge.ends_with("L0,0Z"));

    let band = ArcDescriptor::new(ArcAngles::new(0.0, 3.0 * FRAC_PI_2), 4.0, 10.0).path();
    assert!(band.contains("A10,10,0,1,1,"));
    assert!(band.contains("A4,4,0,1,0,"));
}

#[test]
fn centroid_sits_mid_angle_mid_radius() {
    let arc = ArcDescriptor::new(ArcAngles::new(0.0, PI), 0.0, 100.0);
    let (x, y) = arc.centroid();
    assert_abs_diff_eq!(x, 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(y, 0.0, epsilon = 1e-9);
}

#[test]
fn polar_angles_start_at_twelve_o_clock() {
    let (x, y) = polar_to_xy(10.0, 0.0);
    assert_abs_diff_eq!(x, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(y, -10.0, epsilon = 1e-9);

    let (x, y) = polar_to_xy(10.0, FRAC_PI_2);
    assert_abs_diff_eq!(x, 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(y, 0.0, epsilon = 1e-9);
}

#[test]
fn radii_depend_on_labels_and_doughnut() {
    assert_eq!(pie_radii(400.0, 300.0, false, false, 0.25), (0.0, 150.0));
    assert_eq!(pie_radii(400.0, 300.0, true, false, 0.25), (0.0, 100.0));
    assert_eq!(pie_radii(400.0, 300.0, false, true, 0.25), (112.5, 150.0));
}

#[test]
fn labels_need_a_wide_enough_slice() {
    assert!(label_visible(true, ArcAngles::new(0.0, 0.2)));
    assert!(!label_visible(true, ArcAngles::new(0.0, 0.05)));
    assert!(!label_visible(false, ArcAngles::new(0.0, PI)));
}

#[test]
fn label_anchor_depends_on_side() {
    assert_eq!(text_anchor_for(ArcAngles::new(0.0, FRAC_PI_2)), TextAnchor::Start);
    assert_eq!(text_anchor_for(ArcAngles::new(PI, TAU)), TextAnchor::End);
}

#[test]
fn explode_scales_only_plain_pies() {
    assert_eq!(exploded_outer_radius(100.0, 0.0, 5.0, 10.0, true), 50.0);
    assert_eq!(exploded_outer_radius(100.0, 20.0, 5.0, 10.0, true), 100.0);
    assert_eq!(exploded_outer_radius(100.0, 0.0, 5.0, 10.0, false), 100.0);
}

#[test]
fn overlapping_labels_are_pushed_apart() {
    let mut positions = vec![(10.0, 0.0), (10.0, 4.0)];
    push_apart_labels(&mut positions, &[true, true], 10.0);
    assert_eq!(positions[1], (10.0, 10.0));

    let mut left = vec![(-10.0, 0.0), (-10.0, -4.0)];
    push_apart_labels(&mut left, &[true, true], 10.0);
    assert_eq!(left[1], (-10.0, -10.0));

    let mut opposite = vec![(10.0, 0.0), (-10.0, 4.0)];
    push_apart_labels(&mut opposite, &[true, true], 10.0);
    assert_eq!(opposite[1], (-10.0, 4.0));

    let mut hidden = vec![(10.0, 0.0), (10.0, 4.0)];
    push_apart_labels(&mut hidden, &[false, true], 10.0);
    assert_eq!(hidden[1], (10.0, 4.0));
}

#[test]
fn angle_transitions_interpolate_linearly() {
    let from = ArcAngles::new(0.0, 1.0);
    let to = ArcAngles::new(1.0, 3.0);
    assert_eq!(interpolate_angles(from, to, 0.5), ArcAngles::new(0.5, 2.0));
    assert_eq!(interpolate_angles(from, to, 2.0), to);
}

#[test]
fn pie_slices_carry_paths_colors_and_labels() {
    let points = vec![DataPoint::new("a", 1.0), DataPoint::new("b", 1.0)];
    let layout = PieLayout {
        inner_radius: 0.0,
        outer_radius: 100.0,
        explode_slices: false,
        show_labels: true,
    };
    let slices = pie_slices(&points, &colors(&["a", "b"]), &layout);

    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0].color, "#a8385d");
    assert_eq!(slices[1].color, "#7aa3e5");
    assert_eq!(slices[0].aria_label, "a - 1");
    assert_abs_diff_eq!(slices[0].centroid.0, 50.0, epsilon = 1e-9);

    let first = slices[0].text_label.as_ref().expect("wide slice is labelled");
    assert_eq!(first.text_anchor, TextAnchor::Start);
    assert_abs_diff_eq!(first.x, 150.0, epsilon = 1e-9);
    assert!(first.line.starts_with('M'));
    let second = slices[1].text_label.as_ref().expect("wide slice is labelled");
    assert_eq!(second.text_anchor, TextAnchor::End);
    assert_abs_diff_eq!(second.x, -150.0, epsilon = 1e-9);
}

#[test]
fn exploded_pie_shrinks_smaller_slices() {
    let points = vec![DataPoint::new("a", 1.0), DataPoint::new("b", 2.0)];
    let layout = PieLayout {
        inner_radius: 0.0,
        outer_radius: 100.0,
        explode_slices: true,
        show_labels: false,
    };
    let slices = pie_slices(&points, &colors(&["a", "b"]), &layout);
    assert_abs_diff_eq!(slices[0].arc.outer_radius, 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(slices[1].arc.outer_radius, 100.0, epsilon = 1e-9);
    assert!(slices.iter().all(|slice| slice.text_label.is_none()));
}
