use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{MatchLine, StatLine};
use crate::record::{CellValue, SquadRow, scrub_json};
use crate::sanitize::{clean_player_name, coerce_float, coerce_int, parse_age};

// Candidate keys per canonical field: the canonical name first, then the
// source abbreviation it is renamed from.
const PLAYER_NAME: &[&str] = &["player_name", "Player"];
const PLAYER_URL: &[&str] = &["player_url"];
const POSITION: &[&str] = &["position", "Pos"];
const NATIONALITY: &[&str] = &["nationality", "Nation"];
const AGE: &[&str] = &["age", "Age"];

const MATCHES_PLAYED: &[&str] = &["matches_played", "MP"];
const STARTS: &[&str] = &["starts", "Starts"];
const MINUTES_PLAYED: &[&str] = &["minutes_played", "Min", "minutes"];
const MINUTES_90S: &[&str] = &["minutes_90s", "90s"];
const GOALS: &[&str] = &["goals", "Gls"];
const ASSISTS: &[&str] = &["assists", "Ast"];
const GOALS_PLUS_ASSISTS: &[&str] = &["goals_plus_assists", "G+A"];
const NON_PENALTY_GOALS: &[&str] = &["non_penalty_goals", "G-PK"];
const NON_PENALTY_GOALS_PLUS_ASSISTS: &[&str] = &["non_penalty_goals_plus_assists", "G+A-PK"];
const PENALTIES_SCORED: &[&str] = &["penalties_scored", "PK"];
const PENALTIES_ATTEMPTED: &[&str] = &["penalties_attempted", "PKatt"];
const YELLOW_CARDS: &[&str] = &["yellow_cards", "CrdY"];
const RED_CARDS: &[&str] = &["red_cards", "CrdR"];
const EXPECTED_GOALS: &[&str] = &["expected_goals", "xG"];
const NON_PENALTY_EXPECTED_GOALS: &[&str] = &["non_penalty_expected_goals", "npxG"];
const EXPECTED_ASSISTS: &[&str] = &["expected_assists", "xAG"];
const EXPECTED_GOALS_PLUS_ASSISTS: &[&str] = &["expected_goals_plus_assists", "npxG+xAG"];
const PROGRESSIVE_CARRIES: &[&str] = &["progressive_carries", "PrgC"];
const PROGRESSIVE_PASSES: &[&str] = &["progressive_passes", "PrgP"];
const PROGRESSIVE_PASSES_RECEIVED: &[&str] = &["progressive_passes_received", "PrgR"];
const PASSES_COMPLETED: &[&str] = &["passes_completed", "Cmp"];
const PASSES_ATTEMPTED: &[&str] = &["passes_attempted", "Att"];
const PASS_COMPLETION_RATE: &[&str] = &["pass_completion_rate", "Cmp%"];
const TACKLES: &[&str] = &["tackles", "Tkl"];
const INTERCEPTIONS: &[&str] = &["interceptions", "Int"];
const BLOCKS: &[&str] = &["blocks", "Blocks"];
const CLEARANCES: &[&str] = &["clearances", "Clr"];
const SHOTS: &[&str] = &["shots", "Sh"];
const SHOTS_ON_TARGET: &[&str] = &["shots_on_target", "SoT"];
const SHOT_ACCURACY: &[&str] = &["shot_accuracy", "SoT%"];
const TOUCHES: &[&str] = &["touches", "Touches"];
const DRIBBLES_COMPLETED: &[&str] = &["dribbles_completed", "Succ"];
const DRIBBLES_ATTEMPTED: &[&str] = &["dribbles_attempted", "Att_1"];
const FOULS_COMMITTED: &[&str] = &["fouls_committed", "Fls"];
const FOULS_DRAWN: &[&str] = &["fouls_drawn", "Fld"];

const MATCH_DATE: &[&str] = &["match_date", "Date"];
const COMPETITION: &[&str] = &["competition", "Comp"];
const ROUND: &[&str] = &["round_info", "Round"];
const VENUE: &[&str] = &["venue", "Venue"];
const OPPONENT: &[&str] = &["opponent", "Opponent"];
const RESULT: &[&str] = &["result", "Result"];

const TEAM_NAME: &[&str] = &["team_name"];
const TEAM_URL: &[&str] = &["team_url"];
const LEAGUE: &[&str] = &["league"];
const SEASON: &[&str] = &["season"];

/// Everything persisted for one player row of one squad page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPayload {
    pub team_name: String,
    pub team_url: Option<String>,
    pub league: Option<String>,
    pub season: Option<String>,
    pub player_name: String,
    pub player_url: Option<String>,
    pub position: Option<String>,
    pub nationality: Option<String>,
    pub age: Option<i64>,
    pub stats: StatLine,
    pub raw_data: Value,
}

/// Page-level values shared by every payload built from one squad table.
#[derive(Debug, Clone, Default)]
pub struct PayloadContext<'a> {
    pub team_name: &'a str,
    pub team_url: Option<&'a str>,
    pub league: Option<&'a str>,
    pub season: &'a str,
}

pub fn build_player_payload(row: &SquadRow, ctx: &PayloadContext<'_>) -> Option<PlayerPayload> {
    let player_name = text_field(row, PLAYER_NAME)
        .map(|name| clean_player_name(&name))
        .filter(|name| !name.is_empty())?;

    let mut raw = row.clone();
    if !raw.contains("player_name") {
        raw.set("player_name", CellValue::Text(player_name.clone()));
    }

    Some(PlayerPayload {
        team_name: ctx.team_name.to_string(),
        team_url: ctx.team_url.map(str::to_string),
        league: ctx.league.map(str::to_string),
        season: Some(ctx.season.to_string()),
        player_name,
        player_url: text_field(row, PLAYER_URL),
        position: text_field(row, POSITION),
        nationality: text_field(row, NATIONALITY),
        age: parse_age(row.lookup(AGE)),
        stats: stat_line(row),
        raw_data: scrub_json(raw.to_json()),
    })
}

pub fn build_player_payloads(rows: &[SquadRow], ctx: &PayloadContext<'_>) -> Vec<PlayerPayload> {
    rows.iter()
        .filter_map(|row| build_player_payload(row, ctx))
        .collect()
}

impl PlayerPayload {
    /// Reads a loose JSON object (API submission or stored snapshot) through
    /// the same coercion rules as scraped rows. Missing names stay empty so
    /// the persistence layer can count the record as rejected.
    pub fn from_json(value: &Value) -> Self {
        let row = value
            .as_object()
            .map(SquadRow::from_json_object)
            .unwrap_or_default();
        let raw_data = value
            .get("raw_data")
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(|| value.clone());

        PlayerPayload {
            team_name: text_field(&row, TEAM_NAME).unwrap_or_default(),
            team_url: text_field(&row, TEAM_URL),
            league: text_field(&row, LEAGUE),
            season: text_field(&row, SEASON),
            player_name: text_field(&row, PLAYER_NAME)
                .map(|name| clean_player_name(&name))
                .unwrap_or_default(),
            player_url: text_field(&row, PLAYER_URL),
            position: text_field(&row, POSITION),
            nationality: text_field(&row, NATIONALITY),
            age: parse_age(row.lookup(AGE)),
            stats: stat_line(&row),
            raw_data: scrub_json(raw_data),
        }
    }
}

/// One row of a player's match log table. Rows without a readable date
/// (totals, separators) keep `match_date` empty and are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchLogPayload {
    pub match_date: Option<NaiveDate>,
    pub competition: Option<String>,
    pub round_info: Option<String>,
    pub venue: Option<String>,
    pub opponent: Option<String>,
    pub result: Option<String>,
    pub line: MatchLine,
    pub raw_data: Value,
}

pub fn build_match_log_payload(row: &SquadRow) -> MatchLogPayload {
    let match_date = text_field(row, MATCH_DATE)
        .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok());
    MatchLogPayload {
        match_date,
        competition: text_field(row, COMPETITION),
        round_info: text_field(row, ROUND),
        venue: text_field(row, VENUE),
        opponent: text_field(row, OPPONENT),
        result: text_field(row, RESULT),
        line: match_line(row),
        raw_data: scrub_json(row.to_json()),
    }
}

/// Pairs detail links with rows in order. Rows past the end of `links` keep
/// no link.
pub fn attach_player_links(rows: &mut [SquadRow], links: &[Option<String>]) {
    for (idx, row) in rows.iter_mut().enumerate() {
        let value = links
            .get(idx)
            .cloned()
            .flatten()
            .map(CellValue::Text)
            .unwrap_or(CellValue::Absent);
        row.set("player_url", value);
    }
}

pub fn stat_line(row: &SquadRow) -> StatLine {
    let int = |keys: &[&str]| int_field(row, keys);
    let float = |keys: &[&str]| float_field(row, keys);
    StatLine {
        matches_played: int(MATCHES_PLAYED),
        starts: int(STARTS),
        minutes_played: int(MINUTES_PLAYED),
        minutes_90s: float(MINUTES_90S),
        goals: int(GOALS),
        assists: int(ASSISTS),
        goals_plus_assists: int(GOALS_PLUS_ASSISTS),
        non_penalty_goals: int(NON_PENALTY_GOALS),
        non_penalty_goals_plus_assists: int(NON_PENALTY_GOALS_PLUS_ASSISTS),
        penalties_scored: int(PENALTIES_SCORED),
        penalties_attempted: int(PENALTIES_ATTEMPTED),
        yellow_cards: int(YELLOW_CARDS),
        red_cards: int(RED_CARDS),
        expected_goals: float(EXPECTED_GOALS),
        non_penalty_expected_goals: float(NON_PENALTY_EXPECTED_GOALS),
        expected_assists: float(EXPECTED_ASSISTS),
        expected_goals_plus_assists: float(EXPECTED_GOALS_PLUS_ASSISTS),
        progressive_carries: int(PROGRESSIVE_CARRIES),
        progressive_passes: int(PROGRESSIVE_PASSES),
        progressive_passes_received: int(PROGRESSIVE_PASSES_RECEIVED),
        passes_completed: int(PASSES_COMPLETED),
        passes_attempted: int(PASSES_ATTEMPTED),
        pass_completion_rate: float(PASS_COMPLETION_RATE),
        tackles: int(TACKLES),
        interceptions: int(INTERCEPTIONS),
        blocks: int(BLOCKS),
        clearances: int(CLEARANCES),
        shots: int(SHOTS),
        shots_on_target: int(SHOTS_ON_TARGET),
        shot_accuracy: float(SHOT_ACCURACY),
        touches: int(TOUCHES),
        dribbles_completed: int(DRIBBLES_COMPLETED),
        dribbles_attempted: int(DRIBBLES_ATTEMPTED),
        fouls_committed: int(FOULS_COMMITTED),
        fouls_drawn: int(FOULS_DRAWN),
    }
}

pub fn match_line(row: &SquadRow) -> MatchLine {
    let int = |keys: &[&str]| int_field(row, keys);
    let float = |keys: &[&str]| float_field(row, keys);
    MatchLine {
        minutes_played: int(MINUTES_PLAYED),
        goals: int(GOALS),
        assists: int(ASSISTS),
        shots: int(SHOTS),
        shots_on_target: int(SHOTS_ON_TARGET),
        expected_goals: float(EXPECTED_GOALS),
        expected_assists: float(EXPECTED_ASSISTS),
        passes_completed: int(PASSES_COMPLETED),
        passes_attempted: int(PASSES_ATTEMPTED),
        tackles: int(TACKLES),
        interceptions: int(INTERCEPTIONS),
        touches: int(TOUCHES),
        dribbles_completed: int(DRIBBLES_COMPLETED),
        fouls_committed: int(FOULS_COMMITTED),
        fouls_drawn: int(FOULS_DRAWN),
        yellow_cards: int(YELLOW_CARDS),
        red_cards: int(RED_CARDS),
    }
}

pub fn text_field(row: &SquadRow, keys: &[&str]) -> Option<String> {
    row.lookup(keys).and_then(CellValue::as_text)
}

fn int_field(row: &SquadRow, keys: &[&str]) -> i64 {
    coerce_int(row.lookup(keys), Some(0)).unwrap_or(0)
}

fn float_field(row: &SquadRow, keys: &[&str]) -> f64 {
    coerce_float(row.lookup(keys), 0.0)
}
