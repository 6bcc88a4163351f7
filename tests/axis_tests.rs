use chart_geometry::core::axis::{
    AxisOrientation, ReferenceLine, layout_x_axis, layout_y_axis, reduce_ticks, rotation_angle,
    x_axis_ticks, y_axis_ticks,
};
use chart_geometry::core::label::{
    TextAnchor, escape_label, format_label, tick_lines, trim_label,
};
use chart_geometry::core::{AxisTickOptions, BandScale, ContinuousScale, DataValue, Scale};
use chrono::{TimeZone, Utc};

fn linear(domain: (f64, f64), range: (f64, f64)) -> Scale {
    Scale::Continuous(ContinuousScale::linear(domain, range).expect("valid scale"))
}

fn numbers(count: usize) -> Vec<DataValue> {
    (0..count).map(|i| DataValue::Number(i as f64)).collect()
}

#[test]
fn reduce_ticks_keeps_every_nth() {
    let ticks = numbers(10);
    assert_eq!(
        reduce_ticks(&ticks, 3),
        vec![
            DataValue::Number(0.0),
            DataValue::Number(3.0),
            DataValue::Number(6.0),
            DataValue::Number(9.0)
        ]
    );
    assert_eq!(reduce_ticks(&ticks, 20).len(), 10);
    assert!(reduce_ticks(&ticks, 0).is_empty());
}

#[test]
fn reduce_ticks_may_overshoot_below_twice_the_cap() {
    assert_eq!(reduce_ticks(&numbers(39), 20).len(), 39);
    assert_eq!(reduce_ticks(&numbers(40), 20).len(), 20);
    assert_eq!(reduce_ticks(&numbers(59), 20).len(), 30);
}

#[test]
fn tick_counts_follow_axis_length() {
    let scale = linear((0.0, 100.0), (0.0, 500.0));
    assert_eq!(x_axis_ticks(&scale, None, 500.0).len(), 6);

    let scale = linear((0.0, 100.0), (200.0, 0.0));
    assert_eq!(y_axis_ticks(&scale, None, 200.0).len(), 6);

    let explicit = vec![DataValue::Number(7.0)];
    assert_eq!(x_axis_ticks(&scale, Some(explicit.as_slice()), 500.0), explicit);
}

#[test]
fn categorical_ticks_are_subsampled() {
    let scale = Scale::Banded(BandScale::new(numbers(50), (0.0, 200.0)));
    assert_eq!(x_axis_ticks(&scale, None, 200.0).len(), 10);
}

#[test]
fn rotation_steps_until_labels_fit() {
    let labels: Vec<String> = (0..10).map(|i| format!("category-label-{i:02}")).collect();
    assert_eq!(labels[0].chars().count(), 17);
    assert_eq!(rotation_angle(&labels, 300.0, 16), -90.0);
    assert_eq!(rotation_angle(&labels, 1000.0, 16), -30.0);
    assert_eq!(rotation_angle(&labels, 5000.0, 16), 0.0);
    assert_eq!(rotation_angle(&[], 10.0, 16), 0.0);
}

#[test]
fn x_axis_layout_places_linear_ticks() {
    let scale = linear((0.0, 100.0), (0.0, 500.0));
    let layout = layout_x_axis(&scale, 500.0, &AxisTickOptions::default(), 300.0, None);

    assert_eq!(layout.ticks.len(), 6);
    assert_eq!(layout.ticks[1].value, DataValue::Number(20.0));
    assert_eq!(layout.ticks[1].position, 100.0);
    assert_eq!(layout.ticks[5].label, "100");
    assert_eq!(layout.rotation_angle, 0.0);
    assert_eq!(layout.text_anchor, TextAnchor::Middle);
    assert_eq!(layout.approx_height, 14.0);
    assert!(layout.reference.is_none());
}

#[test]
fn crowded_x_axis_rotates_and_anchors_at_end() {
    let keys: Vec<DataValue> = (0..10)
        .map(|i| DataValue::text(format!("category-name-{i:02}")))
        .collect();
    let scale = Scale::Banded(BandScale::new(keys, (0.0, 300.0)));
    let layout = layout_x_axis(&scale, 300.0, &AxisTickOptions::default(), 300.0, None);

    assert_eq!(layout.rotation_angle, -90.0);
    assert_eq!(layout.text_anchor, TextAnchor::End);
    assert_eq!(layout.ticks[0].position, 15.0);
    assert_eq!(layout.ticks[0].lines, vec!["category-name-00".to_owned()]);

    let flat = AxisTickOptions {
        rotate_ticks: false,
        ..AxisTickOptions::default()
    };
    let layout = layout_x_axis(&scale, 300.0, &flat, 300.0, None);
    assert_eq!(layout.rotation_angle, 0.0);
    assert_eq!(layout.text_anchor, TextAnchor::Middle);
}

#[test]
fn wrapped_band_labels_split_into_lines() {
    let keys = vec![
        DataValue::text("a rather long category name"),
        DataValue::text("short"),
    ];
    let scale = Scale::Banded(BandScale::new(keys, (0.0, 200.0)));
    let options = AxisTickOptions {
        wrap_ticks: true,
        rotate_ticks: false,
        ..AxisTickOptions::default()
    };
    let layout = layout_x_axis(&scale, 200.0, &options, 300.0, None);
    assert_eq!(
        layout.ticks[0].lines,
        vec!["a rather long".to_owned(), "category name".to_owned()]
    );
    assert_eq!(layout.ticks[1].lines, vec!["short".to_owned()]);
}

#[test]
fn custom_formatter_drives_labels() {
    let scale = linear((0.0, 100.0), (0.0, 500.0));
    let formatter: &dyn Fn(&DataValue) -> String = &|value| format!("{value} units");
    let layout = layout_x_axis(&scale, 500.0, &AxisTickOptions::default(), 300.0, Some(formatter));
    assert_eq!(layout.ticks[1].label, "20 units");
}

#[test]
fn y_axis_anchor_follows_orientation() {
    let scale = linear((0.0, 100.0), (200.0, 0.0));
    let left = AxisTickOptions::default().oriented(AxisOrientation::Left);
    let layout = layout_y_axis(&scale, 200.0, &left, 400.0, None);
    assert_eq!(layout.text_anchor, TextAnchor::End);
    assert_eq!(layout.ticks[0].position, 200.0);
    assert_eq!(layout.approx_width, 21.0);

    let right = AxisTickOptions::default().oriented(AxisOrientation::Right);
    assert_eq!(layout_y_axis(&scale, 200.0, &right, 400.0, None).text_anchor, TextAnchor::Start);
}

#[test]
fn reference_band_needs_two_lines() {
    let scale = linear((0.0, 100.0), (200.0, 0.0));
    let mut options = AxisTickOptions {
        show_ref_lines: true,
        reference_lines: vec![
            ReferenceLine {
                name: "low".to_owned(),
                value: 20.0,
            },
            ReferenceLine {
                name: "high".to_owned(),
                value: 60.0,
            },
        ],
        ..AxisTickOptions::default()
    }
    .oriented(AxisOrientation::Left);

    let layout = layout_y_axis(&scale, 200.0, &options, 400.0, None);
    let reference = layout.reference.expect("reference lines shown");
    assert_eq!(reference.lines.len(), 2);
    assert_eq!(reference.min_position, 160.0);
    assert_eq!(reference.max_position, 80.0);
    assert!(reference.band_path.is_some());

    options.reference_lines.truncate(1);
    let layout = layout_y_axis(&scale, 200.0, &options, 400.0, None);
    let reference = layout.reference.expect("reference line shown");
    assert!(reference.band_path.is_none());

    options.show_ref_lines = false;
    assert!(layout_y_axis(&scale, 200.0, &options, 400.0, None).reference.is_none());
}

#[test]
fn tick_lines_pack_words_and_slice_runs() {
    assert_eq!(
        tick_lines("alpha beta gamma", 10, 5),
        vec!["alpha beta".to_owned(), "gamma".to_owned()]
    );
    assert_eq!(
        tick_lines("abcdefghij", 4, 2),
        vec!["abcd".to_owned(), "efgh...".to_owned()]
    );
}

#[test]
fn labels_trim_escape_and_format() {
    assert_eq!(trim_label("  hello world  ", 5), "hello...");
    assert_eq!(trim_label(" short ", 16), "short");
    assert_eq!(escape_label("<a & 'b'>"), "&lt;a &amp; &#x27;b&#x27;&gt;");
    assert_eq!(format_label(&DataValue::Number(1_234_567.0)), "1,234,567");
    let date = Utc
        .with_ymd_and_hms(2024, 2, 29, 12, 0, 0)
        .single()
        .expect("valid date");
    assert_eq!(format_label(&DataValue::Date(date)), "2024-02-29");
}
