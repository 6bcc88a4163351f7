use chart_geometry::core::heat_map::{
    HeatMapPadding, heat_map_background, heat_map_cells, heat_map_color_domain, heat_map_domains,
    heat_map_scales, heat_map_value_scale_type,
};
use chart_geometry::core::scale::InnerPadding;
use chart_geometry::core::{
    ColorHelper, ColorMapping, ColorScheme, DataPoint, DataValue, ScaleType, Series,
};

fn results() -> Vec<Series> {
    vec![
        Series::new("s1", vec![DataPoint::new("a", 1.0), DataPoint::new("b", 2.0)]),
        Series::new("s2", vec![DataPoint::new("a", 3.0), DataPoint::new("b", 2.0)]),
    ]
}

#[test]
fn domains_split_columns_rows_and_values() {
    let domains = heat_map_domains(&results());
    assert_eq!(domains.x_domain, vec![DataValue::text("s1"), DataValue::text("s2")]);
    assert_eq!(domains.y_domain, vec![DataValue::text("a"), DataValue::text("b")]);
    assert_eq!(
        domains.value_domain,
        vec![
            DataValue::Number(1.0),
            DataValue::Number(2.0),
            DataValue::Number(3.0)
        ]
    );
    assert_eq!(heat_map_value_scale_type(&domains), ScaleType::Linear);
}

#[test]
fn linear_color_domain_starts_at_zero_or_override() {
    let domains = heat_map_domains(&results());
    assert_eq!(
        heat_map_color_domain(&domains, ScaleType::Linear, None, None),
        vec![DataValue::Number(0.0), DataValue::Number(3.0)]
    );
    assert_eq!(
        heat_map_color_domain(&domains, ScaleType::Linear, Some(-1.0), Some(10.0)),
        vec![DataValue::Number(-1.0), DataValue::Number(10.0)]
    );
    assert_eq!(
        heat_map_color_domain(&domains, ScaleType::Ordinal, None, None),
        domains.value_domain
    );
}

#[test]
fn rows_run_bottom_to_top() {
    let domains = heat_map_domains(&results());
    let (x_scale, y_scale) = heat_map_scales(
        &domains,
        200.0,
        100.0,
        HeatMapPadding::uniform(InnerPadding::Percent(0.0)),
    );

    assert_eq!(x_scale.apply(&DataValue::text("s1")), Some(0.0));
    assert_eq!(x_scale.apply(&DataValue::text("s2")), Some(100.0));
    assert_eq!(x_scale.bandwidth(), 100.0);
    assert_eq!(y_scale.apply(&DataValue::text("a")), Some(50.0));
    assert_eq!(y_scale.apply(&DataValue::text("b")), Some(0.0));
    assert_eq!(y_scale.bandwidth(), 50.0);
}

#[test]
fn default_padding_leaves_gaps_between_cells() {
    let domains = heat_map_domains(&results());
    let (x_scale, _) = heat_map_scales(&domains, 200.0, 100.0, HeatMapPadding::default());
    assert!(x_scale.bandwidth() < x_scale.step());
}

#[test]
fn background_covers_every_cell() {
    let domains = heat_map_domains(&results());
    let (x_scale, y_scale) = heat_map_scales(
        &domains,
        200.0,
        100.0,
        HeatMapPadding::uniform(InnerPadding::Percent(0.0)),
    );
    let rects = heat_map_background(&x_scale, &y_scale);
    assert_eq!(rects.len(), 4);
    assert!(rects.iter().all(|rect| rect.rx == 3.0));
    assert_eq!((rects[3].x, rects[3].y), (100.0, 0.0));
}

#[test]
fn cells_are_placed_and_colored_by_value() {
    let results = results();
    let domains = heat_map_domains(&results);
    let (x_scale, y_scale) = heat_map_scales(
        &domains,
        200.0,
        100.0,
        HeatMapPadding::uniform(InnerPadding::Percent(0.0)),
    );
    let colors = ColorHelper::new(
        ColorScheme::default(),
        ScaleType::Linear,
        heat_map_color_domain(&domains, ScaleType::Linear, None, None),
    )
    .expect("valid palette");

    let cells = heat_map_cells(&results, &x_scale, &y_scale, &colors);
    assert_eq!(cells.len(), 4);

    let cell = &cells[2];
    assert_eq!(cell.series, "s2");
    assert_eq!(cell.name, DataValue::text("a"));
    assert_eq!((cell.x, cell.y, cell.width, cell.height), (100.0, 50.0, 100.0, 50.0));
    assert_eq!(cell.fill, colors.get_color(&DataValue::Number(3.0)));
    assert_eq!(cell.gradient_stops.len(), 2);
    assert!(cell.tooltip_text.contains("s2 \u{2022} a"));
    assert!(cell.tooltip_text.contains(">3</span>"));
}
