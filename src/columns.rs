use std::collections::HashSet;

/// A header as read from the table: one label, or one label per header row
/// when the table has grouped (multi-row) headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderCell {
    Scalar(String),
    Tuple(Vec<String>),
}

/// Source abbreviations and the descriptive names used everywhere else.
pub const COLUMN_RENAMES: &[(&str, &str)] = &[
    ("Player", "player_name"),
    ("Pos", "position"),
    ("Nation", "nationality"),
    ("Age", "age"),
    ("Born", "birth_year"),
    ("MP", "matches_played"),
    ("Starts", "starts"),
    ("Min", "minutes_played"),
    ("90s", "minutes_90s"),
    ("Gls", "goals"),
    ("Ast", "assists"),
    ("G+A", "goals_plus_assists"),
    ("G-PK", "non_penalty_goals"),
    ("G+A-PK", "non_penalty_goals_plus_assists"),
    ("PK", "penalties_scored"),
    ("PKatt", "penalties_attempted"),
    ("CrdY", "yellow_cards"),
    ("CrdR", "red_cards"),
    ("xG", "expected_goals"),
    ("npxG", "non_penalty_expected_goals"),
    ("xAG", "expected_assists"),
    ("npxG+xAG", "expected_goals_plus_assists"),
    ("PrgC", "progressive_carries"),
    ("PrgP", "progressive_passes"),
    ("PrgR", "progressive_passes_received"),
];

pub fn canonical_name(source: &str) -> &str {
    COLUMN_RENAMES
        .iter()
        .find(|(from, _)| *from == source)
        .map(|(_, to)| *to)
        .unwrap_or(source)
}

/// Flattens headers into unique, non-empty names. Grouped headers keep their
/// leaf label; repeated labels get `_1`, `_2`, ... in order of appearance.
pub fn flatten_headers(headers: &[HeaderCell]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(headers.len());
    let mut taken: HashSet<String> = HashSet::with_capacity(headers.len());

    for (idx, header) in headers.iter().enumerate() {
        let mut name = match header {
            HeaderCell::Scalar(label) => label.trim().to_string(),
            HeaderCell::Tuple(parts) => leaf_label(parts),
        };
        if name.is_empty() {
            name = format!("column_{idx}");
        }
        let name = unique_name(name, &taken);
        taken.insert(name.clone());
        out.push(name);
    }
    out
}

/// Applies the rename map. A rename that would clash with a name already in
/// use keeps the source label instead.
pub fn canonicalize(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    for name in names {
        let renamed = canonical_name(name);
        let clashes = taken.contains(renamed) || names.iter().any(|n| n.as_str() == renamed);
        let chosen = if renamed != name.as_str() && clashes {
            name.clone()
        } else {
            renamed.to_string()
        };
        let chosen = unique_name(chosen, &taken);
        taken.insert(chosen.clone());
        out.push(chosen);
    }
    out
}

/// Flatten then rename: the column list the rest of the pipeline keys on.
pub fn normalize_columns(headers: &[HeaderCell]) -> Vec<String> {
    canonicalize(&flatten_headers(headers))
}

fn leaf_label(parts: &[String]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !is_placeholder(part))
        .next_back()
        .map(str::to_string)
        .or_else(|| parts.last().map(|last| last.trim().to_string()))
        .filter(|label| !is_placeholder(label))
        .unwrap_or_default()
}

fn is_placeholder(segment: &str) -> bool {
    segment.is_empty() || segment.starts_with("Unnamed")
}

fn unique_name(name: String, taken: &HashSet<String>) -> String {
    if !taken.contains(&name) {
        return name;
    }
    let mut n = 1usize;
    loop {
        let candidate = format!("{name}_{n}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(parts: &[&str]) -> HeaderCell {
        HeaderCell::Tuple(parts.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn leaf_label_skips_generated_segments() {
        assert_eq!(leaf_label(&["Unnamed: 0_level_0".into(), "Player".into()]), "Player");
        assert_eq!(leaf_label(&["Performance".into(), "".into()]), "Performance");
        assert_eq!(leaf_label(&["Unnamed: 3_level_0".into(), "".into()]), "");
    }

    #[test]
    fn tuple_headers_keep_leaf_and_suffix_repeats() {
        let headers = vec![
            tuple(&["", "Player"]),
            tuple(&["Performance", "Gls"]),
            tuple(&["Per 90 Minutes", "Gls"]),
            tuple(&["Per 90 Minutes", "Gls"]),
            tuple(&["", ""]),
        ];
        assert_eq!(
            flatten_headers(&headers),
            vec!["Player", "Gls", "Gls_1", "Gls_2", "column_4"]
        );
    }

    #[test]
    fn rename_does_not_create_duplicates() {
        let names = vec!["goals".to_string(), "Gls".to_string(), "Ast".to_string()];
        assert_eq!(canonicalize(&names), vec!["goals", "Gls", "assists"]);
    }
}
