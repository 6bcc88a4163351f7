use chart_geometry::core::box_plot::{
    BoxOptions, box_geometry, box_quartiles, box_value_domain, quantile_sorted,
};
use chart_geometry::core::{
    BandScale, ColorHelper, ColorScheme, ContinuousScale, DataPoint, DataValue, ScaleType, Series,
};

fn series(name: &str, values: &[f64]) -> Series {
    Series::new(
        name,
        values
            .iter()
            .enumerate()
            .map(|(index, value)| DataPoint::new(format!("p{index}"), *value))
            .collect(),
    )
}

#[test]
fn quantiles_interpolate_between_ranks() {
    let epsilon = 1e-9;
    let sorted = [1.0, 2.0, 3.0, 4.0];
    assert!((quantile_sorted(&sorted, 0.25).expect("non-empty") - 1.75).abs() <= epsilon);
    assert_eq!(quantile_sorted(&sorted, 0.0), Some(1.0));
    assert_eq!(quantile_sorted(&sorted, 1.0), Some(4.0));
    assert_eq!(quantile_sorted(&[7.0], 0.5), Some(7.0));
    assert_eq!(quantile_sorted(&[], 0.5), None);
    assert_eq!(quantile_sorted(&sorted, f64::NAN), None);
}

#[test]
fn quartiles_sort_and_skip_non_finite_values() {
    let quartiles = box_quartiles(&[4.0, f64::NAN, 1.0, 3.0, 2.0]).expect("finite values");
    assert_eq!(quartiles, [1.75, 2.5, 3.25]);
    assert!(box_quartiles(&[]).is_none());
    assert!(box_quartiles(&[f64::INFINITY]).is_none());
}

#[test]
fn value_domain_spans_all_series() {
    let results = vec![series("a", &[3.0, 9.0]), series("b", &[-1.0])];
    assert_eq!(box_value_domain(&results), (-1.0, 9.0));
    assert_eq!(box_value_domain(&[]), (0.0, 0.0));
}

#[test]
fn box_spans_first_to_third_quartile() {
    let epsilon = 1e-9;
    let data = series("s", &[1.0, 2.0, 3.0, 4.0]);
    let x_scale = BandScale::new(vec![DataValue::text("s")], (0.0, 100.0));
    let y_scale = ContinuousScale::linear((0.0, 4.0), (400.0, 0.0)).expect("valid scale");
    let colors = ColorHelper::new(ColorScheme::default(), ScaleType::Ordinal, vec![DataValue::text("s")])
        .expect("valid palette");

    let geometry = box_geometry(&data, &x_scale, y_scale, &colors, &BoxOptions::default())
        .expect("box with values");

    assert!((geometry.y - 75.0).abs() <= epsilon);
    assert!((geometry.height - 150.0).abs() <= epsilon);
    assert_eq!((geometry.x, geometry.width), (0.0, 100.0));
    assert_eq!(geometry.value, 2.5);
    assert_eq!(geometry.whiskers, (1.0, 4.0));
    assert_eq!(geometry.radius, 5.0);
    assert_eq!(geometry.color, "#a8385d");
    assert!(geometry.gradient_stops.is_none());
    assert_eq!(geometry.aria_label, "s - Median: 2.5");
    let tooltip = geometry.tooltip_text.as_deref().expect("tooltip enabled");
    assert!(tooltip.contains("Q1: 1.75"));
    assert!(tooltip.contains("Max: 4"));

    let lines = geometry.lines;
    assert_eq!((lines.vertical.x1, lines.vertical.y1, lines.vertical.y2), (50.0, 300.0, 0.0));
    assert!((lines.median.y1 - 150.0).abs() <= epsilon);
    assert_eq!((lines.median.x1, lines.median.x2), (104.0, -4.0));

    let collapsed = lines.collapsed();
    assert_eq!(collapsed.vertical.y1, collapsed.median.y1);
    assert_eq!(collapsed.top.y2, collapsed.median.y1);
}

#[test]
fn empty_series_has_no_box() {
    let x_scale = BandScale::new(vec![DataValue::text("s")], (0.0, 100.0));
    let y_scale = ContinuousScale::linear((0.0, 1.0), (100.0, 0.0)).expect("valid scale");
    let colors = ColorHelper::new(ColorScheme::default(), ScaleType::Ordinal, Vec::new())
        .expect("valid palette");
    let options = BoxOptions {
        tooltip_disabled: true,
        ..BoxOptions::default()
    };
    assert!(box_geometry(&series("s", &[]), &x_scale, y_scale, &colors, &options).is_none());
}
