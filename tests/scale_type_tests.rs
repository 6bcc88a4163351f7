use chart_geometry::core::scale_type::infer_scale_type_with;
use chart_geometry::core::{DataValue, ScaleType, infer_scale_type};
use chrono::{TimeZone, Utc};

fn date(day: u32) -> DataValue {
    DataValue::Date(Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).single().expect("valid date"))
}

#[test]
fn all_dates_infer_time() {
    let values = vec![date(1), date(2), date(5)];
    assert_eq!(infer_scale_type(&values), ScaleType::Time);
}

#[test]
fn numbers_and_numeric_text_infer_linear() {
    let values = vec![
        DataValue::Number(1.0),
        DataValue::text("2.5"),
        DataValue::text(" 40 "),
    ];
    assert_eq!(infer_scale_type(&values), ScaleType::Linear);
}

#[test]
fn plain_text_infers_ordinal() {
    let values = vec![DataValue::text("north"), DataValue::text("south")];
    assert_eq!(infer_scale_type(&values), ScaleType::Ordinal);
}

#[test]
fn mixed_values_fall_back_to_ordinal() {
    let values = vec![date(1), DataValue::Number(3.0)];
    assert_eq!(infer_scale_type(&values), ScaleType::Ordinal);

    let values = vec![DataValue::Number(3.0), DataValue::text("three")];
    assert_eq!(infer_scale_type(&values), ScaleType::Ordinal);
}

#[test]
fn empty_input_is_ordinal() {
    assert_eq!(infer_scale_type(&[]), ScaleType::Ordinal);
}

#[test]
fn date_check_can_be_skipped() {
    let values = vec![date(1), date(2)];
    assert_eq!(infer_scale_type_with(&values, false), ScaleType::Ordinal);

    let numbers = vec![DataValue::Number(1.0), DataValue::Number(2.0)];
    assert_eq!(infer_scale_type_with(&numbers, false), ScaleType::Linear);
}

#[test]
fn non_finite_text_is_not_numeric() {
    let values = vec![DataValue::text("inf"), DataValue::Number(1.0)];
    assert_eq!(infer_scale_type(&values), ScaleType::Ordinal);
}

#[test]
fn continuous_types_are_flagged() {
    assert!(ScaleType::Time.is_continuous());
    assert!(ScaleType::Linear.is_continuous());
    assert!(!ScaleType::Ordinal.is_continuous());
}
