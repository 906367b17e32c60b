use once_cell::sync::Lazy;
use regex::Regex;

static SEASON_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}-\d{4}").expect("static regex"));
static TRAILING_STATS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*Stats$").expect("static regex"));
static TRAILING_COMPETITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(([^()]+)\)\s*$").expect("static regex"));

/// What a squad page says about itself in its heading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub team_name: Option<String>,
    pub season: Option<String>,
    pub competition: Option<String>,
}

/// Reads `"2024-2025 Arsenal Stats (Premier League)"` style headings.
pub fn infer_from_heading(heading: &str) -> PageMetadata {
    let mut text = heading.split_whitespace().collect::<Vec<_>>().join(" ");

    let season = SEASON_RANGE.find(&text).map(|m| m.as_str().to_string());
    if let Some(season) = season.as_deref() {
        text = text.replace(season, "").trim().to_string();
    }

    let mut competition = None;
    if let Some(caps) = TRAILING_COMPETITION.captures(&text) {
        competition = caps.get(1).map(|m| m.as_str().trim().to_string());
        let start = caps.get(0).map(|m| m.start()).unwrap_or(text.len());
        text.truncate(start);
    }

    let team = TRAILING_STATS.replace(text.trim(), "");
    let team = team.trim_matches(|ch: char| ch == ' ' || ch == '-').to_string();

    PageMetadata {
        team_name: (!team.is_empty()).then_some(team),
        season,
        competition: competition.filter(|c| !c.is_empty()),
    }
}

/// `.../squads/18bb7c10/Arsenal-Stats` -> `"Arsenal"`.
pub fn team_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    segment.replace("-Stats", "").replace('-', " ").trim().to_string()
}

/// Heading first, URL second.
pub fn resolve_team_name(metadata: &PageMetadata, url: &str) -> String {
    metadata
        .team_name
        .clone()
        .unwrap_or_else(|| team_name_from_url(url))
}
