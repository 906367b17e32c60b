use fbref_ingest::record::{CellValue, SquadRow};
use fbref_ingest::sanitize::{
    clean_player_name, coerce_float, coerce_int, is_player_name, parse_age, sanitize_row,
};

fn row(pairs: &[(&str, CellValue)]) -> SquadRow {
    let mut row = SquadRow::new();
    for (key, value) in pairs {
        row.set(key, value.clone());
    }
    row
}

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

#[test]
fn aggregate_rows_are_rejected() {
    for name in [
        "Squad Total",
        "squad total 2",
        "Opponent Total",
        "Opponent",
        "Matches",
        "Team Total",
        "",
        "   ",
    ] {
        let r = row(&[("player_name", text(name))]);
        assert!(sanitize_row(r).is_none(), "{name:?} should be dropped");
    }
}

#[test]
fn rows_without_a_name_column_are_rejected() {
    let r = row(&[("goals", CellValue::Int(3))]);
    assert!(sanitize_row(r).is_none());
}

#[test]
fn names_are_cleaned() {
    assert_eq!(clean_player_name("  Martin Ødegaard* "), "Martin Ødegaard");
    assert_eq!(clean_player_name("Gabriel\u{a0}Jesus++"), "Gabriel Jesus");
    assert!(is_player_name("Bukayo Saka"));
    assert!(!is_player_name("Squad Total"));
}

#[test]
fn integer_coercion_grid() {
    let cases = [
        (Some(text("1,234")), Some(1234)),
        (Some(text("1234.0")), Some(1234)),
        (Some(text("12.9")), Some(12)),
        (Some(text("NaN")), Some(0)),
        (Some(text("-")), Some(0)),
        (Some(CellValue::Float(f64::NAN)), Some(0)),
        (Some(CellValue::Float(f64::INFINITY)), Some(0)),
        (Some(CellValue::Int(42)), Some(42)),
        (Some(CellValue::Bool(true)), Some(1)),
        (Some(CellValue::Absent), Some(0)),
        (None, Some(0)),
    ];
    for (input, expected) in cases {
        assert_eq!(coerce_int(input.as_ref(), Some(0)), expected, "{input:?}");
    }
    assert_eq!(coerce_int(None, None), None);
    assert_eq!(coerce_int(Some(&text("abc")), None), None);
}

#[test]
fn float_coercion_grid() {
    assert_eq!(coerce_float(Some(&text("1,234.5")), 0.0), 1234.5);
    assert_eq!(coerce_float(Some(&CellValue::Int(3)), 0.0), 3.0);
    assert_eq!(coerce_float(Some(&CellValue::Float(f64::NAN)), 0.0), 0.0);
    assert_eq!(coerce_float(Some(&text("nan")), 0.0), 0.0);
    assert_eq!(coerce_float(None, 0.0), 0.0);
}

#[test]
fn age_keeps_the_years_segment() {
    assert_eq!(parse_age(Some(&text("23-150"))), Some(23));
    assert_eq!(parse_age(Some(&CellValue::Int(31))), Some(31));
    assert_eq!(parse_age(Some(&CellValue::Float(19.0))), Some(19));
    assert_eq!(parse_age(Some(&text(""))), None);
    assert_eq!(parse_age(Some(&CellValue::Absent)), None);
    assert_eq!(parse_age(None), None);
}

#[test]
fn sanitize_coerces_listed_columns_only() {
    let r = row(&[
        ("player_name", text("Kai Havertz*")),
        ("age", text("25-080")),
        ("minutes_played", text("2,410")),
        ("expected_goals", text("NaN")),
        ("Touches", text("1,001")),
    ]);
    let clean = sanitize_row(r).expect("player row");
    assert_eq!(clean.get("player_name"), Some(&text("Kai Havertz")));
    assert_eq!(clean.get("age"), Some(&CellValue::Int(25)));
    assert_eq!(clean.get("minutes_played"), Some(&CellValue::Int(2410)));
    assert_eq!(clean.get("expected_goals"), Some(&CellValue::Float(0.0)));
    assert_eq!(clean.get("Touches"), Some(&text("1,001")));
    assert!(!clean.contains("goals"));
}
