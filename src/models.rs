use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static YEAR_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})\s*[-/]\s*(\d{4})").expect("static regex"));
static SINGLE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub fbref_url: Option<String>,
    pub league: Option<String>,
    pub country: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: i64,
    pub name: String,
    pub start_year: i32,
    pub end_year: i32,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub nationality: Option<String>,
    pub age: Option<i64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub fbref_url: Option<String>,
    pub team_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Season aggregates for one player. Counters default to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub matches_played: i64,
    pub starts: i64,
    pub minutes_played: i64,
    pub minutes_90s: f64,
    pub goals: i64,
    pub assists: i64,
    pub goals_plus_assists: i64,
    pub non_penalty_goals: i64,
    pub non_penalty_goals_plus_assists: i64,
    pub penalties_scored: i64,
    pub penalties_attempted: i64,
    pub yellow_cards: i64,
    pub red_cards: i64,
    pub expected_goals: f64,
    pub non_penalty_expected_goals: f64,
    pub expected_assists: f64,
    pub expected_goals_plus_assists: f64,
    pub progressive_carries: i64,
    pub progressive_passes: i64,
    pub progressive_passes_received: i64,
    pub passes_completed: i64,
    pub passes_attempted: i64,
    pub pass_completion_rate: f64,
    pub tackles: i64,
    pub interceptions: i64,
    pub blocks: i64,
    pub clearances: i64,
    pub shots: i64,
    pub shots_on_target: i64,
    pub shot_accuracy: f64,
    pub touches: i64,
    pub dribbles_completed: i64,
    pub dribbles_attempted: i64,
    pub fouls_committed: i64,
    pub fouls_drawn: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub id: i64,
    pub player_id: i64,
    pub season_id: i64,
    pub team_id: Option<i64>,
    pub stats: StatLine,
    pub data_source: String,
    pub raw_data: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Per-match figures as parsed from a player's match log table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchLine {
    pub minutes_played: i64,
    pub goals: i64,
    pub assists: i64,
    pub shots: i64,
    pub shots_on_target: i64,
    pub expected_goals: f64,
    pub expected_assists: f64,
    pub passes_completed: i64,
    pub passes_attempted: i64,
    pub tackles: i64,
    pub interceptions: i64,
    pub touches: i64,
    pub dribbles_completed: i64,
    pub fouls_committed: i64,
    pub fouls_drawn: i64,
    pub yellow_cards: i64,
    pub red_cards: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchLog {
    pub id: i64,
    pub player_id: i64,
    pub season_id: i64,
    pub match_date: NaiveDate,
    pub competition: Option<String>,
    pub round_info: Option<String>,
    pub venue: Option<String>,
    pub opponent: Option<String>,
    pub result: Option<String>,
    pub line: MatchLine,
    pub raw_data: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeStatus {
    Success,
    Partial,
    Failed,
}

impl ScrapeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ScrapeStatus::Success => "success",
            ScrapeStatus::Partial => "partial",
            ScrapeStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapingLog {
    pub id: i64,
    pub source_url: String,
    pub scraping_type: String,
    pub status: String,
    pub records_count: i64,
    pub error_message: Option<String>,
    pub execution_time: Option<f64>,
    pub created_at: String,
}

/// Start and end year for a season label. Tries `YYYY-YYYY`, then a lone
/// `YYYY` (ending the following year), then the current year.
pub fn parse_season_bounds(label: &str) -> (i32, i32) {
    parse_season_bounds_at(label, Utc::now().year())
}

pub fn parse_season_bounds_at(label: &str, current_year: i32) -> (i32, i32) {
    if let Some(caps) = YEAR_PAIR.captures(label) {
        let start = caps.get(1).and_then(|m| m.as_str().parse::<i32>().ok());
        let end = caps.get(2).and_then(|m| m.as_str().parse::<i32>().ok());
        if let (Some(start), Some(end)) = (start, end) {
            return (start, end);
        }
    }
    if let Some(year) = SINGLE_YEAR
        .find(label)
        .and_then(|m| m.as_str().parse::<i32>().ok())
    {
        return (year, year + 1);
    }
    (current_year, current_year + 1)
}

/// The label stored when a payload carries none.
pub fn current_season_label() -> String {
    let (start, end) = parse_season_bounds("");
    format!("{start}-{end}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_bounds_priority() {
        assert_eq!(parse_season_bounds_at("2024-2025", 2030), (2024, 2025));
        assert_eq!(parse_season_bounds_at("2024", 2030), (2024, 2025));
        assert_eq!(parse_season_bounds_at("", 2030), (2030, 2031));
        assert_eq!(parse_season_bounds_at("next season", 2030), (2030, 2031));
    }
}
