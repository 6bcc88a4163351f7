use chart_geometry::core::color::{CustomColor, Rgb, fade_in_stops};
use chart_geometry::core::legend::{advanced_legend, legend_entries, round_percentages};
use chart_geometry::core::{
    ColorHelper, ColorMapping, ColorScheme, DataPoint, DataValue, ScaleType,
};
use chart_geometry::ChartError;

fn keys(names: &[&str]) -> Vec<DataValue> {
    names.iter().map(|name| DataValue::text(*name)).collect()
}

fn ordinal(names: &[&str]) -> ColorHelper {
    ColorHelper::new(ColorScheme::default(), ScaleType::Ordinal, keys(names)).expect("valid palette")
}

#[test]
fn default_scheme_is_cool() {
    let scheme = ColorScheme::default();
    assert_eq!(scheme.name, "cool");
    assert_eq!(
        &scheme.domain[..4],
        &["#a8385d", "#7aa3e5", "#a27ea8", "#aae3f5"]
    );
}

#[test]
fn ordinal_colors_follow_domain_position() {
    let colors = ordinal(&["a", "b"]);
    assert_eq!(colors.get_color(&DataValue::text("a")), "#a8385d");
    assert_eq!(colors.get_color(&DataValue::text("b")), "#7aa3e5");
    assert_eq!(colors.get_color(&DataValue::text("unknown")), "#a27ea8");
}

#[test]
fn ordinal_palette_cycles() {
    let names: Vec<String> = (0..11).map(|i| format!("k{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let colors = ordinal(&refs);
    assert_eq!(colors.get_color(&DataValue::text("k10")), "#a8385d");
}

#[test]
fn custom_colors_override_case_insensitively() {
    let colors = ordinal(&["Alpha", "beta"]).with_custom_colors(vec![CustomColor {
        name: "alpha".to_owned(),
        value: "#123456".to_owned(),
    }]);
    assert_eq!(colors.get_color(&DataValue::text("Alpha")), "#123456");
    assert_eq!(colors.get_color(&DataValue::text("beta")), "#7aa3e5");
}

#[test]
fn linear_colors_interpolate_in_rgb() {
    let colors = ColorHelper::new(
        ColorScheme::default(),
        ScaleType::Linear,
        vec![DataValue::Number(0.0), DataValue::Number(100.0)],
    )
    .expect("valid palette");
    assert_eq!(colors.get_color(&DataValue::Number(0.0)), "rgb(168, 56, 93)");
    assert_eq!(colors.get_color(&DataValue::Number(10.0)), "rgb(122, 163, 229)");
    assert_eq!(colors.get_color(&DataValue::text("n/a")), "rgb(168, 56, 93)");

    let stops = colors.linear_gradient_stops(50.0, None);
    assert!(stops.len() >= 2);
    assert_eq!(stops.first().map(|stop| stop.offset), Some(0.0));
    assert_eq!(stops.last().map(|stop| stop.offset), Some(100.0));
}

#[test]
fn scheme_lookup_and_validation() {
    let scheme = ColorScheme::named("VIVID").expect("built-in scheme");
    assert_eq!(scheme.name, "vivid");
    assert!(ColorScheme::named("no-such-scheme").is_none());
    assert!(ColorScheme::names().contains(&"cool"));

    let err = ColorScheme::new("empty", Vec::new()).expect_err("empty palette");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}

#[test]
fn rgb_parses_common_notations() {
    let white = Rgb::parse("#fff").expect("short hex");
    assert_eq!((white.red, white.green, white.blue), (255.0, 255.0, 255.0));

    let teal = Rgb::parse(" rgb(0, 128, 128) ").expect("rgb notation");
    assert_eq!(teal.to_css(), "rgb(0, 128, 128)");

    assert!(Rgb::parse("#12").is_err());
    assert!(Rgb::parse("rgb(1, 2)").is_err());
    assert!(Rgb::parse("teal").is_err());
}

#[test]
fn fade_in_runs_from_partial_to_full_opacity() {
    let stops = fade_in_stops("#abcdef", 0.2);
    assert_eq!(stops.len(), 2);
    assert_eq!((stops[0].offset, stops[0].opacity), (0.0, 0.2));
    assert_eq!((stops[1].offset, stops[1].opacity), (100.0, 1.0));
    assert!(stops.iter().all(|stop| stop.color == "#abcdef"));
}

#[test]
fn legend_dedupes_by_formatted_label() {
    let domain = vec![
        DataValue::Number(1000.0),
        DataValue::text("1,000"),
        DataValue::text("other"),
    ];
    let colors = ColorHelper::new(ColorScheme::default(), ScaleType::Ordinal, domain.clone())
        .expect("valid palette");
    let entries = legend_entries(&domain, &colors);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].formatted_label, "1,000");
    assert_eq!(entries[0].label, DataValue::Number(1000.0));
    assert_eq!(entries[1].color, "#a27ea8");
}

#[test]
fn percentages_round_to_exactly_one_hundred() {
    assert_eq!(round_percentages(&[1.0, 1.0, 1.0]), vec![34.0, 33.0, 33.0]);
    assert_eq!(round_percentages(&[1.0, 2.0, 7.0]), vec![10.0, 20.0, 70.0]);
    assert_eq!(round_percentages(&[0.0, 0.0]), vec![0.0, 0.0]);
    assert!(round_percentages(&[]).is_empty());
}

#[test]
fn advanced_legend_reports_totals_and_shares() {
    let points = vec![
        DataPoint::new("small", 1000.0),
        DataPoint::new("large", 3000.0),
    ];
    let colors = ordinal(&["small", "large"]);

    let legend = advanced_legend(&points, &colors, true);
    assert_eq!(legend.total, 4000.0);
    assert_eq!(legend.formatted_total, "4,000");
    assert_eq!(legend.items[0].percentage, 25.0);
    assert_eq!(legend.items[1].formatted_percentage, "75");
    assert_eq!(legend.items[1].formatted_value, "3,000");
    assert_eq!(legend.items[0].color, "#a8385d");

    let raw = advanced_legend(&[DataPoint::new("only", 0.0)], &colors, false);
    assert_eq!(raw.items[0].percentage, 0.0);
}
