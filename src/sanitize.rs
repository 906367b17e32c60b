use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::{CellValue, SquadRow};

pub const INTEGER_COLUMNS: &[&str] = &[
    "matches_played",
    "starts",
    "minutes_played",
    "goals",
    "assists",
    "goals_plus_assists",
    "non_penalty_goals",
    "non_penalty_goals_plus_assists",
    "penalties_scored",
    "penalties_attempted",
    "yellow_cards",
    "red_cards",
    "progressive_carries",
    "progressive_passes",
    "progressive_passes_received",
];

pub const FLOAT_COLUMNS: &[&str] = &[
    "expected_goals",
    "expected_assists",
    "non_penalty_expected_goals",
    "expected_goals_plus_assists",
    "minutes_90s",
];

/// Aggregate and sub-header rows that share the player column.
const NON_PLAYER_NAMES: &[&str] = &[
    "squad total",
    "squad total 2",
    "opponent total",
    "opponent",
    "matches",
];

static FOOTNOTE_MARKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[+*]+").expect("static regex"));

pub fn clean_player_name(raw: &str) -> String {
    let replaced = raw.replace('\u{a0}', " ");
    FOOTNOTE_MARKS
        .replace_all(replaced.trim(), "")
        .trim()
        .to_string()
}

pub fn is_player_name(cleaned: &str) -> bool {
    if cleaned.trim().is_empty() {
        return false;
    }
    let lower = cleaned.trim().to_lowercase();
    !NON_PLAYER_NAMES.contains(&lower.as_str()) && !lower.ends_with("total")
}

/// Cleans one squad row. Returns `None` for rows that are not players.
pub fn sanitize_row(mut row: SquadRow) -> Option<SquadRow> {
    let raw_name = row
        .lookup(&["player_name", "Player"])
        .and_then(CellValue::as_text)?;
    let name = clean_player_name(&raw_name);
    if !is_player_name(&name) {
        return None;
    }
    row.set("player_name", CellValue::Text(name));

    if row.contains("age") {
        let age = parse_age(row.get("age"));
        row.set("age", age.map(CellValue::Int).unwrap_or(CellValue::Absent));
    }
    for column in INTEGER_COLUMNS {
        if row.contains(column) {
            let value = coerce_int(row.get(column), Some(0)).unwrap_or(0);
            row.set(column, CellValue::Int(value));
        }
    }
    for column in FLOAT_COLUMNS {
        if row.contains(column) {
            let value = coerce_float(row.get(column), 0.0);
            row.set(column, CellValue::Float(value));
        }
    }
    Some(row)
}

/// Integer coercion over any extracted value. `default` is returned for
/// absent, unparsable or NaN input; pass `None` where unknown must stay
/// distinguishable from zero.
pub fn coerce_int(value: Option<&CellValue>, default: Option<i64>) -> Option<i64> {
    match value {
        None | Some(CellValue::Absent) => default,
        Some(CellValue::Bool(b)) => Some(i64::from(*b)),
        Some(CellValue::Int(i)) => Some(*i),
        Some(CellValue::Float(f)) => truncate(*f).or(default),
        Some(CellValue::Text(s)) => parse_number(s).and_then(truncate).or(default),
    }
}

pub fn coerce_float(value: Option<&CellValue>, default: f64) -> f64 {
    let parsed = match value {
        None | Some(CellValue::Absent) => None,
        Some(CellValue::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(CellValue::Int(i)) => Some(*i as f64),
        Some(CellValue::Float(f)) => Some(*f),
        Some(CellValue::Text(s)) => parse_number(s),
    };
    parsed.filter(|f| f.is_finite()).unwrap_or(default)
}

/// Ages come as whole years or as `years-days` (`"23-150"`).
pub fn parse_age(value: Option<&CellValue>) -> Option<i64> {
    match value? {
        CellValue::Text(s) => {
            let text = s.trim();
            let years = text.split('-').next().unwrap_or_default().trim();
            if years.is_empty() {
                return None;
            }
            parse_number(years).and_then(truncate)
        }
        CellValue::Bool(_) => None,
        other => coerce_int(Some(other), None),
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|f| !f.is_nan())
}

fn truncate(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    Some(f.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_strips_thousands() {
        assert_eq!(parse_number("1,234.0"), Some(1234.0));
        assert_eq!(parse_number(" 12 "), Some(12.0));
        assert_eq!(parse_number("nan"), None);
        assert_eq!(parse_number("-"), None);
    }
}
