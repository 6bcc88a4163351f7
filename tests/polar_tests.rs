use std::f64::consts::{FRAC_PI_2, PI};

use approx::assert_abs_diff_eq;
use chart_geometry::core::domain::x_domain;
use chart_geometry::core::label::TextAnchor;
use chart_geometry::core::polar::{
    polar_outer_radius, polar_radius_scale, polar_series_geometry, polar_x_scale, polar_y_domain,
    radial_point, radius_ticks, theta_ticks,
};
use chart_geometry::core::{
    ColorHelper, ColorScheme, ContinuousScale, DataPoint, DataValue, ScaleType, Series,
};

fn compass() -> Vec<Series> {
    vec![Series::new(
        "wind",
        vec![
            DataPoint::new("north", 3.0),
            DataPoint::new("east", 8.0).with_range(Some(1.0), None),
            DataPoint::new("south", 5.0),
            DataPoint::new("west", 4.0),
        ],
    )]
}

#[test]
fn outer_radius_leaves_room_for_labels() {
    assert_abs_diff_eq!(polar_outer_radius(600.0, 400.0), 400.0 / 3.0, epsilon = 1e-9);
    assert_eq!(polar_outer_radius(0.0, 400.0), 0.0);
}

#[test]
fn radius_domain_starts_at_zero_unless_auto_scaled() {
    let results = compass();
    assert_eq!(polar_y_domain(&results, false, None), (0.0, 8.0));
    assert_eq!(polar_y_domain(&results, true, None), (1.0, 8.0));
    assert_eq!(polar_y_domain(&results, false, Some(20.0)), (0.0, 20.0));
    assert_eq!(polar_y_domain(&[], true, None), (0.0, 0.0));
}

#[test]
fn ordinal_keys_spread_over_the_turn() {
    let domain = x_domain(&compass(), None, None);
    let scale = polar_x_scale(&domain, false).expect("ordinal scale");
    let angles: Vec<f64> = domain.x_set.iter().map(|key| scale.position(key)).collect();
    let expected = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2];
    for (angle, expected) in angles.iter().zip(expected) {
        assert_abs_diff_eq!(*angle, expected, epsilon = 1e-9);
    }
}

#[test]
fn radial_points_start_at_twelve_o_clock() {
    assert_eq!(radial_point(0.0, 10.0), (0.0, -10.0));
    let (x, y) = radial_point(FRAC_PI_2, 10.0);
    assert_abs_diff_eq!(x, 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(y, 0.0, epsilon = 1e-9);
}

#[test]
fn theta_labels_anchor_by_side() {
    let domain = x_domain(&compass(), None, None);
    let scale = polar_x_scale(&domain, false).expect("ordinal scale");
    let ticks = theta_ticks(&domain.x_set, &scale, 100.0, None);

    assert_eq!(ticks.len(), 4);
    assert_eq!(ticks[0].label, "north");
    assert_eq!(ticks[1].text_anchor, TextAnchor::Start);
    assert_eq!(ticks[3].text_anchor, TextAnchor::End);
    assert_abs_diff_eq!(ticks[0].start.1, -100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(ticks[3].position.0, -110.0, epsilon = 1e-9);
}

#[test]
fn radius_grid_runs_outermost_first() {
    let scale = ContinuousScale::linear((0.0, 100.0), (0.0, 200.0)).expect("valid scale");
    let ticks = radius_ticks(scale, 200.0);
    assert_eq!(ticks, vec![200.0, 160.0, 120.0, 80.0, 40.0, 0.0]);
}

#[test]
fn radius_scale_can_be_niced() {
    let scale = polar_radius_scale((0.0, 8.7), 100.0, true).expect("finite domain");
    assert_eq!(scale.domain(), (0.0, 9.0));
    assert_eq!(scale.range(), (0.0, 100.0));
}

#[test]
fn series_outline_is_closed() {
    let results = compass();
    let domain = x_domain(&results, None, None);
    let scale = polar_x_scale(&domain, false).expect("ordinal scale");
    let radius = polar_radius_scale((0.0, 10.0), 100.0, false).expect("finite domain");
    let colors = ColorHelper::new(
        ColorScheme::default(),
        ScaleType::Ordinal,
        vec![DataValue::text("wind")],
    )
    .expect("valid palette");

    let geometry = polar_series_geometry(&results[0], &scale, radius, &domain.x_set, &colors);
    assert!(geometry.path.starts_with("M0,-30L"));
    assert!(geometry.path.ends_with('Z'));
    assert_eq!(geometry.points.len(), 4);
    assert_abs_diff_eq!(geometry.points[1].0, 80.0, epsilon = 1e-9);
    assert_eq!(geometry.color, "#a8385d");
}
