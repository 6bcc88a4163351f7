use chart_geometry::ChartError;
use chart_geometry::api::{
    BarChartFrame, BarChartOptions, BarChartPipeline, CHART_FRAME_JSON_SCHEMA_V1, ChartEngine,
    ColorOptions, FrameJsonContract, GaugeChartOptions, GaugePipeline, HeatMapOptions,
    HeatMapPipeline, LineAreaKind, LineAreaPipeline, LineChartOptions, PieChartOptions,
    PiePipeline,
};
use chart_geometry::core::bar::BarOrientation;
use chart_geometry::core::{DataPoint, DataValue, ScaleType, Series, StackMode, Viewport};
use chart_geometry::render::{NullRenderer, PathPrimitive, RenderFrame};

fn fruit() -> Vec<DataPoint> {
    vec![DataPoint::new("apples", 10.0), DataPoint::new("pears", 5.0)]
}

fn quarters() -> Vec<Series> {
    vec![
        Series::new("q1", vec![DataPoint::new("x", 10.0), DataPoint::new("y", 20.0)]),
        Series::new("q2", vec![DataPoint::new("x", 5.0), DataPoint::new("y", 5.0)]),
    ]
}

fn readings() -> Vec<Series> {
    vec![
        Series::new(
            "cpu",
            vec![
                DataPoint::new(1.0, 10.0),
                DataPoint::new(2.0, 30.0),
                DataPoint::new(3.0, 20.0),
            ],
        ),
        Series::new(
            "ram",
            vec![
                DataPoint::new(1.0, 40.0),
                DataPoint::new(2.0, 50.0),
                DataPoint::new(3.0, 45.0),
            ],
        ),
    ]
}

fn bar_frame() -> BarChartFrame {
    BarChartPipeline::new(BarChartOptions::default())
        .expect("default options are valid")
        .compute(&fruit(), Viewport::new(200, 100))
        .expect("bar frame")
}

#[test]
fn single_series_bar_chart() {
    let frame = bar_frame();

    assert_eq!(frame.mode, StackMode::Standard);
    assert_eq!(frame.value_domain.bounds(), Some((0.0, 10.0)));
    assert_eq!(
        frame.category_domain,
        vec![DataValue::text("apples"), DataValue::text("pears")]
    );
    assert_eq!(frame.groups.len(), 1);
    assert_eq!(frame.visible_bar_count(), 2);
    assert_eq!(frame.legend.len(), 2);
    assert!(!frame.value_axis.ticks.is_empty());

    let tallest = frame.bars().next().expect("first bar");
    assert_eq!(tallest.y, 0.0);
    assert_eq!(tallest.height, 100.0);
}

#[test]
fn stacked_bars_share_one_band_per_group() {
    let pipeline = BarChartPipeline::new(BarChartOptions::new(
        BarOrientation::Vertical,
        StackMode::Stacked,
    ))
    .expect("valid options");
    let frame = pipeline
        .compute_series(&quarters(), Viewport::new(300, 150))
        .expect("stacked frame");

    assert_eq!(frame.value_domain.bounds(), Some((0.0, 30.0)));
    assert_eq!(frame.groups.len(), 2);
    assert_eq!(frame.bars().count(), 4);
    assert_eq!(frame.groups[0].name, Some(DataValue::text("q1")));
    for group in &frame.groups {
        assert!(group.bars.iter().all(|bar| bar.x == group.offset));
    }
}

#[test]
fn grouped_bars_sit_side_by_side() {
    let pipeline = BarChartPipeline::new(BarChartOptions::default()).expect("valid options");
    let frame = pipeline
        .compute_series(&quarters(), Viewport::new(300, 150))
        .expect("grouped frame");

    assert_eq!(frame.value_domain.bounds(), Some((0.0, 20.0)));
    let first = &frame.groups[0];
    assert!(first.bars[0].x < first.bars[1].x);
    assert_eq!(frame.legend.len(), 2);
}

#[test]
fn line_chart_hover_finds_the_closest_key() {
    let results = readings();
    let pipeline = LineAreaPipeline::new(LineChartOptions::default());
    let frame = pipeline
        .compute(&results, Viewport::new(200, 100))
        .expect("line frame");

    assert_eq!(frame.x_domain.scale_type, ScaleType::Linear);
    assert_eq!(frame.lines.len(), 2);
    assert!(frame.areas.is_empty());
    assert!(frame.offsets.is_none());

    let hover = pipeline
        .hover(&frame, &results, 95.0)
        .expect("hover resolves")
        .expect("keys present");
    assert_eq!(hover.anchor.index, 1);
    assert_eq!(hover.anchor.x_value, DataValue::Number(2.0));
    assert_eq!(hover.circles.len(), 2);
    assert_eq!(hover.tooltip_lines.len(), 2);
}

#[test]
fn stacked_area_chart_carries_offsets() {
    let results = readings();
    let pipeline = LineAreaPipeline::new(LineChartOptions::new(LineAreaKind::StackedArea));
    let frame = pipeline
        .compute(&results, Viewport::new(200, 100))
        .expect("area frame");

    assert_eq!(frame.areas.len(), 2);
    let offsets = frame.offsets.as_ref().expect("stacked offsets");
    assert_eq!(offsets.len(), 2);
    assert_eq!(offsets[1][1].offset0, 30.0);
    assert_eq!(offsets[1][1].offset1, 80.0);
    assert_eq!(frame.y_domain.bounds().map(|(_, max)| max), Some(80.0));
}

#[test]
fn stacked_area_accepts_years_written_as_text() {
    let results = vec![
        Series::new("a", vec![DataPoint::new("2010", 10.0), DataPoint::new("2011", 20.0)]),
        Series::new("b", vec![DataPoint::new("2010", 5.0), DataPoint::new("2011", 7.0)]),
    ];
    let pipeline = LineAreaPipeline::new(LineChartOptions::new(LineAreaKind::StackedArea));
    let frame = pipeline
        .compute(&results, Viewport::new(200, 100))
        .expect("area frame");

    assert_eq!(frame.x_domain.scale_type, ScaleType::Linear);
    assert_eq!(frame.y_domain.bounds().map(|(_, max)| max), Some(27.0));
    let offsets = frame.offsets.as_ref().expect("stacked offsets");
    assert_eq!(offsets[1][1].offset0, 20.0);
    assert_eq!(offsets[1][1].offset1, 27.0);

    let hover = pipeline
        .hover(&frame, &results, 200.0)
        .expect("hover resolves")
        .expect("keys present");
    assert_eq!(hover.anchor.x_value, DataValue::Number(2011.0));
    assert_eq!(hover.circles.len(), 2);
    assert_eq!(hover.tooltip_lines.len(), 2);
}

#[test]
fn normalized_area_tooltips_show_percentages() {
    let results = readings();
    let options = LineChartOptions::new(LineAreaKind::NormalizedArea);
    assert!(options.show_percentage);
    let pipeline = LineAreaPipeline::new(options);
    let frame = pipeline
        .compute(&results, Viewport::new(200, 100))
        .expect("area frame");

    assert_eq!(frame.y_domain.bounds(), Some((0.0, 100.0)));
    let hover = pipeline
        .hover(&frame, &results, 0.0)
        .expect("hover resolves")
        .expect("keys present");
    assert_eq!(hover.anchor.index, 0);
    assert!(hover.tooltip_lines[0].contains("20.00%"));
}

#[test]
fn pie_chart_is_centered_in_its_margins() {
    let pipeline = PiePipeline::new(PieChartOptions::default()).expect("valid options");
    let frame = pipeline
        .compute(&fruit(), Viewport::new(400, 300))
        .expect("pie frame");

    assert_eq!(frame.center, (200.0, 150.0));
    assert_eq!(frame.inner_radius, 0.0);
    assert_eq!(frame.outer_radius, 130.0);
    assert_eq!(frame.slices.len(), 2);
    assert_eq!(frame.legend.total, 15.0);
    assert_eq!(frame.legend.items.len(), 2);
}

#[test]
fn doughnut_needs_a_valid_arc_width() {
    assert!(matches!(
        PiePipeline::new(PieChartOptions::default().doughnut(1.5)),
        Err(ChartError::InvalidConfig(_))
    ));

    let frame = PiePipeline::new(PieChartOptions::default().doughnut(0.5))
        .expect("valid options")
        .compute(&fruit(), Viewport::new(400, 300))
        .expect("doughnut frame");
    assert!(frame.inner_radius > 0.0);
    assert!(frame.inner_radius < frame.outer_radius);
}

#[test]
fn gauge_pipeline_builds_rings_and_axis() {
    let pipeline =
        GaugePipeline::new(GaugeChartOptions::default().with_bounds(0.0, 200.0)).expect("valid");
    let frame = pipeline
        .compute(&[DataPoint::new("ram", 150.0)], Viewport::new(400, 300))
        .expect("gauge frame");

    assert_eq!(frame.center, (200.0, 150.0));
    assert_eq!(frame.domain, (0.0, 200.0));
    assert_eq!(frame.arcs.len(), 1);
    assert_eq!(frame.display_value, "150");
    assert_eq!(frame.legend.len(), 1);
    let ticks = frame.ticks.as_ref().expect("axis shown");
    assert!(!ticks.big.is_empty());
}

#[test]
fn gauge_rejects_inverted_bounds() {
    assert!(matches!(
        GaugePipeline::new(GaugeChartOptions::default().with_bounds(10.0, 0.0)),
        Err(ChartError::InvalidConfig(_))
    ));
}

#[test]
fn heat_map_pipeline_colors_every_cell() {
    let results = vec![
        Series::new("s1", vec![DataPoint::new("a", 1.0), DataPoint::new("b", 2.0)]),
        Series::new("s2", vec![DataPoint::new("a", 3.0), DataPoint::new("b", 2.0)]),
    ];
    let frame = HeatMapPipeline::new(HeatMapOptions::default())
        .compute(&results, Viewport::new(200, 100))
        .expect("heat map frame");

    assert_eq!(frame.color_scale_type, ScaleType::Linear);
    assert_eq!(
        frame.color_domain,
        vec![DataValue::Number(0.0), DataValue::Number(3.0)]
    );
    assert_eq!(frame.background.len(), 4);
    assert_eq!(frame.cells.len(), 4);
    assert_eq!(frame.x_axis.ticks.len(), 2);
    assert_eq!(frame.y_axis.ticks.len(), 2);
}

#[test]
fn empty_viewports_are_rejected() {
    let err = BarChartPipeline::new(BarChartOptions::default())
        .expect("valid options")
        .compute(&fruit(), Viewport::new(0, 100))
        .expect_err("zero width");
    assert!(matches!(
        err,
        ChartError::InvalidViewport {
            width: 0,
            height: 100
        }
    ));

    assert!(
        LineAreaPipeline::new(LineChartOptions::default())
            .compute(&readings(), Viewport::new(100, 0))
            .is_err()
    );
}

#[test]
fn unknown_color_scheme_is_a_config_error() {
    let options =
        BarChartOptions::default().with_colors(ColorOptions::default().with_scheme("nope"));
    let err = BarChartPipeline::new(options)
        .expect("padding is valid")
        .compute(&fruit(), Viewport::new(200, 100))
        .expect_err("unknown scheme");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}

#[test]
fn options_round_trip_through_json() {
    let options = BarChartOptions::new(BarOrientation::Horizontal, StackMode::Normalized)
        .with_round_domains(true);
    let json = options.to_json_pretty().expect("serialize");
    let parsed = BarChartOptions::from_json_str(&json).expect("parse");
    assert_eq!(parsed, options);

    assert_eq!(
        BarChartOptions::from_json_str("{}").expect("defaults"),
        BarChartOptions::default()
    );
    assert_eq!(
        LineChartOptions::from_json_str("{\"kind\":\"stacked_area\"}")
            .expect("kind only")
            .kind,
        LineAreaKind::StackedArea
    );
}

#[test]
fn invalid_options_json_is_reported() {
    assert!(matches!(
        BarChartOptions::from_json_str("{\"bar_padding\": -1.0}"),
        Err(ChartError::InvalidConfig(_))
    ));
    assert!(matches!(
        BarChartOptions::from_json_str("not json"),
        Err(ChartError::InvalidData(_))
    ));
    assert!(matches!(
        PieChartOptions::from_json_str("{\"arc_width\": 2.0}"),
        Err(ChartError::InvalidConfig(_))
    ));
}

#[test]
fn frames_round_trip_through_the_json_contract() {
    let frame = bar_frame();

    let bare = frame.to_json_pretty().expect("serialize frame");
    assert_eq!(BarChartFrame::from_json_compat_str(&bare).expect("bare frame"), frame);

    let wrapped = frame.to_json_contract_v1_pretty().expect("serialize contract");
    let value: serde_json::Value = serde_json::from_str(&wrapped).expect("valid json");
    assert_eq!(value["schema_version"], CHART_FRAME_JSON_SCHEMA_V1);
    assert_eq!(value["kind"], "bar");
    assert_eq!(
        BarChartFrame::from_json_compat_str(&wrapped).expect("wrapped frame"),
        frame
    );
}

#[test]
fn json_contract_checks_version_and_kind() {
    let wrapped = bar_frame()
        .to_json_contract_v1_pretty()
        .expect("serialize contract");
    let value: serde_json::Value = serde_json::from_str(&wrapped).expect("valid json");

    let mut wrong_kind = value.clone();
    wrong_kind["kind"] = serde_json::Value::from("pie");
    let err = BarChartFrame::from_json_compat_str(&wrong_kind.to_string()).expect_err("kind");
    assert!(err.to_string().contains("expected a `bar` frame, found `pie`"));

    let mut wrong_version = value;
    wrong_version["schema_version"] = serde_json::Value::from(2);
    let err = BarChartFrame::from_json_compat_str(&wrong_version.to_string()).expect_err("version");
    assert!(err.to_string().contains("unsupported bar frame schema version: 2"));

    assert!(BarChartFrame::from_json_compat_str("{}").is_err());
}

#[test]
fn engine_forwards_frames_to_the_renderer() {
    let mut engine = ChartEngine::new(NullRenderer::default());

    let bar = engine.render(&bar_frame()).expect("bar renders");
    assert_eq!(bar.paths.len(), 2);
    assert!(!bar.texts.is_empty());
    assert_eq!(engine.renderer().frames_rendered, 1);
    assert_eq!(engine.renderer().last_path_count, 2);
    assert_eq!(engine.renderer().last_viewport, Some(Viewport::new(200, 100)));

    let pie = PiePipeline::new(PieChartOptions::default().with_labels(true))
        .expect("valid options")
        .compute(&fruit(), Viewport::new(400, 300))
        .expect("pie frame");
    let rendered = engine.render(&pie).expect("pie renders");
    assert!(rendered.paths.len() >= 2);

    let renderer = engine.into_renderer();
    assert_eq!(renderer.frames_rendered, 2);
    assert_eq!(renderer.last_text_count, rendered.texts.len());
}

#[test]
fn render_frame_validation_rejects_bad_content() {
    assert!(RenderFrame::new(Viewport::new(10, 10)).validate().is_ok());
    assert!(RenderFrame::new(Viewport::new(10, 10)).is_empty());
    assert!(matches!(
        RenderFrame::new(Viewport::new(0, 10)).validate(),
        Err(ChartError::InvalidViewport { .. })
    ));

    let mut frame = RenderFrame::new(Viewport::new(10, 10));
    frame.paths.push(PathPrimitive::filled("M0,0Z", "#a8385d"));
    frame.paths.push(PathPrimitive::filled("", "#a8385d"));
    assert_eq!(frame.primitive_count(), 2);
    let err = frame.validate().expect_err("empty path data");
    assert!(err.to_string().contains("path #1"));

    let mut engine = ChartEngine::new(NullRenderer::default());
    let invalid = RenderFrame::new(Viewport::new(0, 0));
    assert!(engine.render_frame(&invalid).is_err());
    assert_eq!(engine.renderer().frames_rendered, 0);
}
