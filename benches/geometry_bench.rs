use chart_geometry::api::{
    BarChartOptions, BarChartPipeline, LineAreaKind, LineAreaPipeline, LineChartOptions,
    PieChartOptions, PiePipeline,
};
use chart_geometry::core::axis::layout_x_axis;
use chart_geometry::core::bar::BarOrientation;
use chart_geometry::core::tree_map::squarify;
use chart_geometry::core::{
    AxisTickOptions, BandScale, DataPoint, DataValue, Scale, Series, StackMode, Viewport,
};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn grouped_series(groups: usize, keys: usize) -> Vec<Series> {
    (0..groups)
        .map(|group| {
            let points = (0..keys)
                .map(|key| {
                    let value = ((group * 31 + key * 17) % 97) as f64 - 20.0;
                    DataPoint::new(format!("key-{key}"), value)
                })
                .collect();
            Series::new(format!("group-{group}"), points)
        })
        .collect()
}

fn bench_stacked_bars_200x10(c: &mut Criterion) {
    let results = grouped_series(200, 10);
    let pipeline = BarChartPipeline::new(BarChartOptions::new(
        BarOrientation::Vertical,
        StackMode::Stacked,
    ))
    .expect("valid options");
    let viewport = Viewport::new(1920, 1080);

    c.bench_function("stacked_bars_200x10", |b| {
        b.iter(|| {
            let _ = pipeline
                .compute_series(black_box(&results), black_box(viewport))
                .expect("stacked frame");
        })
    });
}

fn bench_stacked_area_5k(c: &mut Criterion) {
    let results: Vec<Series> = (0..5)
        .map(|series| {
            let points = (0..1_000)
                .map(|i| DataPoint::new(i as f64, ((i * (series + 3)) % 50) as f64 + 1.0))
                .collect();
            Series::new(format!("series-{series}"), points)
        })
        .collect();
    let pipeline = LineAreaPipeline::new(LineChartOptions::new(LineAreaKind::StackedArea));
    let viewport = Viewport::new(1600, 900);

    c.bench_function("stacked_area_5k", |b| {
        b.iter(|| {
            let _ = pipeline
                .compute(black_box(&results), black_box(viewport))
                .expect("area frame");
        })
    });
}

fn bench_band_axis_layout_500(c: &mut Criterion) {
    let keys: Vec<DataValue> = (0..500)
        .map(|i| DataValue::text(format!("category number {i}")))
        .collect();
    let scale = Scale::Banded(BandScale::new(keys, (0.0, 1_200.0)).with_padding_inner(0.1));
    let options = AxisTickOptions::default();

    c.bench_function("band_axis_layout_500", |b| {
        b.iter(|| {
            let _ = layout_x_axis(
                black_box(&scale),
                black_box(1_200.0),
                black_box(&options),
                black_box(600.0),
                None,
            );
        })
    });
}

fn bench_pie_with_labels_100(c: &mut Criterion) {
    let points: Vec<DataPoint> = (0..100)
        .map(|i| DataPoint::new(format!("slice-{i}"), (i % 13 + 1) as f64))
        .collect();
    let pipeline =
        PiePipeline::new(PieChartOptions::default().with_labels(true)).expect("valid options");
    let viewport = Viewport::new(800, 600);

    c.bench_function("pie_with_labels_100", |b| {
        b.iter(|| {
            let _ = pipeline
                .compute(black_box(&points), black_box(viewport))
                .expect("pie frame");
        })
    });
}

fn bench_squarify_1k(c: &mut Criterion) {
    let values: Vec<f64> = (0..1_000).map(|i| ((i * 7) % 101 + 1) as f64).collect();

    c.bench_function("squarify_1k", |b| {
        b.iter(|| {
            let _ = squarify(black_box(&values), black_box(1_600.0), black_box(900.0));
        })
    });
}

criterion_group!(
    benches,
    bench_stacked_bars_200x10,
    bench_stacked_area_5k,
    bench_band_axis_layout_500,
    bench_pie_with_labels_100,
    bench_squarify_1k
);
criterion_main!(benches);
