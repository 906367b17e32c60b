use std::collections::HashSet;

use fbref_ingest::columns::{HeaderCell, canonical_name, normalize_columns};

fn tuple(parts: &[&str]) -> HeaderCell {
    HeaderCell::Tuple(parts.iter().map(|p| p.to_string()).collect())
}

fn scalar(label: &str) -> HeaderCell {
    HeaderCell::Scalar(label.to_string())
}

fn squad_headers() -> Vec<HeaderCell> {
    vec![
        tuple(&["Unnamed: 0_level_0", "Player"]),
        tuple(&["Unnamed: 1_level_0", "Nation"]),
        tuple(&["Unnamed: 2_level_0", "Pos"]),
        tuple(&["Unnamed: 3_level_0", "Age"]),
        tuple(&["Playing Time", "MP"]),
        tuple(&["Playing Time", "Min"]),
        tuple(&["Performance", "Gls"]),
        tuple(&["Performance", "Ast"]),
        tuple(&["Per 90 Minutes", "Gls"]),
        tuple(&["Per 90 Minutes", "Ast"]),
        tuple(&["Expected", "xG"]),
        tuple(&["Per 90 Minutes", "xG"]),
        tuple(&["Unnamed: 12_level_0", "Matches"]),
        tuple(&["", ""]),
    ]
}

#[test]
fn grouped_headers_become_canonical_names() {
    let names = normalize_columns(&squad_headers());
    assert_eq!(
        names,
        vec![
            "player_name",
            "nationality",
            "position",
            "age",
            "matches_played",
            "minutes_played",
            "goals",
            "assists",
            "Gls_1",
            "Ast_1",
            "expected_goals",
            "xG_1",
            "Matches",
            "column_13",
        ]
    );
}

#[test]
fn normalized_names_are_unique_and_non_empty() {
    let headers = vec![
        scalar("Gls"),
        scalar("goals"),
        scalar(""),
        scalar("Gls"),
        scalar("  "),
        scalar("column_2"),
    ];
    let names = normalize_columns(&headers);
    assert_eq!(names.len(), headers.len());
    assert!(names.iter().all(|n| !n.is_empty()));
    let unique = names.iter().collect::<HashSet<_>>();
    assert_eq!(unique.len(), names.len());
}

#[test]
fn normalization_is_deterministic() {
    let first = normalize_columns(&squad_headers());
    let second = normalize_columns(&squad_headers());
    assert_eq!(first, second);
}

#[test]
fn unmapped_names_pass_through() {
    assert_eq!(canonical_name("Gls"), "goals");
    assert_eq!(canonical_name("npxG+xAG"), "expected_goals_plus_assists");
    assert_eq!(canonical_name("Touches"), "Touches");
}
