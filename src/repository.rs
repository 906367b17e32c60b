//! Per-entity queries. Every function takes a plain `&Connection` so it runs
//! the same against a connection, a transaction or a savepoint.

use chrono::{NaiveDate, Utc};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use serde::{Deserialize, Serialize};

use crate::models::{
    MatchLine, MatchLog, Player, PlayerStats, ScrapeStatus, ScrapingLog, Season, StatLine, Team,
};

const TEAM_COLUMNS: &str = "id, name, fbref_url, league, country, created_at, updated_at";
const SEASON_COLUMNS: &str = "id, name, start_year, end_year, is_active, created_at";
const PLAYER_COLUMNS: &str = "id, name, full_name, position, nationality, age, height, weight, \
     fbref_url, team_id, created_at, updated_at";

/// Counter columns of `player_stats`, in the order `stat_values` emits them.
const STAT_COLUMNS: &[&str] = &[
    "matches_played",
    "starts",
    "minutes_played",
    "minutes_90s",
    "goals",
    "assists",
    "goals_plus_assists",
    "non_penalty_goals",
    "non_penalty_goals_plus_assists",
    "penalties_scored",
    "penalties_attempted",
    "yellow_cards",
    "red_cards",
    "expected_goals",
    "non_penalty_expected_goals",
    "expected_assists",
    "expected_goals_plus_assists",
    "progressive_carries",
    "progressive_passes",
    "progressive_passes_received",
    "passes_completed",
    "passes_attempted",
    "pass_completion_rate",
    "tackles",
    "interceptions",
    "blocks",
    "clearances",
    "shots",
    "shots_on_target",
    "shot_accuracy",
    "touches",
    "dribbles_completed",
    "dribbles_attempted",
    "fouls_committed",
    "fouls_drawn",
];

const MATCH_COLUMNS: &[&str] = &[
    "minutes_played",
    "goals",
    "assists",
    "shots",
    "shots_on_target",
    "expected_goals",
    "expected_assists",
    "passes_completed",
    "passes_attempted",
    "tackles",
    "interceptions",
    "touches",
    "dribbles_completed",
    "fouls_committed",
    "fouls_drawn",
    "yellow_cards",
    "red_cards",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamFields {
    pub fbref_url: Option<String>,
    pub league: Option<String>,
    pub country: Option<String>,
}

/// Explicit edit of a team. `None` leaves a column as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub fbref_url: Option<String>,
    pub league: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerFields {
    pub position: Option<String>,
    pub nationality: Option<String>,
    pub age: Option<i64>,
    pub fbref_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMatchLog {
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
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeAttempt<'a> {
    pub source_url: &'a str,
    pub scraping_type: &'a str,
    pub status: ScrapeStatus,
    pub records_count: usize,
    pub error_message: Option<String>,
    pub execution_time: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCounts {
    pub total_players: i64,
    pub total_teams: i64,
    pub total_seasons: i64,
    pub total_stats: i64,
    pub total_match_logs: i64,
}

pub fn now() -> String {
    Utc::now().to_rfc3339()
}

// ---- teams -------------------------------------------------------------

pub fn get_team(conn: &Connection, id: i64) -> rusqlite::Result<Option<Team>> {
    conn.query_row(
        &format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = ?1"),
        params![id],
        team_from_row,
    )
    .optional()
}

pub fn get_team_by_name(conn: &Connection, name: &str) -> rusqlite::Result<Option<Team>> {
    conn.query_row(
        &format!("SELECT {TEAM_COLUMNS} FROM teams WHERE name = ?1"),
        params![name],
        team_from_row,
    )
    .optional()
}

pub fn create_team(conn: &Connection, name: &str, fields: &TeamFields) -> rusqlite::Result<Team> {
    let ts = now();
    conn.execute(
        "INSERT INTO teams (name, fbref_url, league, country, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![name, fields.fbref_url, fields.league, fields.country, ts],
    )?;
    let id = conn.last_insert_rowid();
    get_team(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

/// Existing teams are returned untouched; `fields` only seed a new row.
pub fn get_or_create_team(
    conn: &Connection,
    name: &str,
    fields: &TeamFields,
) -> rusqlite::Result<(Team, bool)> {
    if let Some(team) = get_team_by_name(conn, name)? {
        return Ok((team, false));
    }
    create_team(conn, name, fields).map(|team| (team, true))
}

pub fn update_team(
    conn: &Connection,
    id: i64,
    update: &TeamUpdate,
) -> rusqlite::Result<Option<Team>> {
    let Some(existing) = get_team(conn, id)? else {
        return Ok(None);
    };
    conn.execute(
        "UPDATE teams SET name = ?1, fbref_url = ?2, league = ?3, country = ?4, updated_at = ?5
         WHERE id = ?6",
        params![
            update.name.as_ref().unwrap_or(&existing.name),
            update.fbref_url.as_ref().or(existing.fbref_url.as_ref()),
            update.league.as_ref().or(existing.league.as_ref()),
            update.country.as_ref().or(existing.country.as_ref()),
            now(),
            id
        ],
    )?;
    get_team(conn, id)
}

/// Players keep their rows and lose the team reference.
pub fn delete_team(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let removed = conn.execute("DELETE FROM teams WHERE id = ?1", params![id])?;
    Ok(removed > 0)
}

pub fn teams_by_league(conn: &Connection, league: &str) -> rusqlite::Result<Vec<Team>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TEAM_COLUMNS} FROM teams WHERE league = ?1 ORDER BY name"
    ))?;
    let rows = stmt.query_map(params![league], team_from_row)?;
    rows.collect()
}

pub fn list_teams_with_player_counts(conn: &Connection) -> rusqlite::Result<Vec<(Team, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.fbref_url, t.league, t.country, t.created_at, t.updated_at,
                (SELECT COUNT(*) FROM players p WHERE p.team_id = t.id)
         FROM teams t ORDER BY t.name",
    )?;
    let rows = stmt.query_map([], |row| Ok((team_from_row(row)?, row.get::<_, i64>(7)?)))?;
    rows.collect()
}

fn team_from_row(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        fbref_url: row.get(2)?,
        league: row.get(3)?,
        country: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

// ---- seasons -----------------------------------------------------------

pub fn get_season_by_name(conn: &Connection, name: &str) -> rusqlite::Result<Option<Season>> {
    conn.query_row(
        &format!("SELECT {SEASON_COLUMNS} FROM seasons WHERE name = ?1"),
        params![name],
        season_from_row,
    )
    .optional()
}

pub fn get_or_create_season(
    conn: &Connection,
    name: &str,
    start_year: i32,
    end_year: i32,
) -> rusqlite::Result<Season> {
    if let Some(season) = get_season_by_name(conn, name)? {
        return Ok(season);
    }
    conn.execute(
        "INSERT INTO seasons (name, start_year, end_year, is_active, created_at)
         VALUES (?1, ?2, ?3, 1, ?4)",
        params![name, start_year, end_year, now()],
    )?;
    get_season_by_name(conn, name)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

pub fn active_seasons(conn: &Connection) -> rusqlite::Result<Vec<Season>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SEASON_COLUMNS} FROM seasons WHERE is_active = 1 ORDER BY start_year DESC"
    ))?;
    let rows = stmt.query_map([], season_from_row)?;
    rows.collect()
}

fn season_from_row(row: &Row<'_>) -> rusqlite::Result<Season> {
    Ok(Season {
        id: row.get(0)?,
        name: row.get(1)?,
        start_year: row.get(2)?,
        end_year: row.get(3)?,
        is_active: row.get::<_, i64>(4)? != 0,
        created_at: row.get(5)?,
    })
}

// ---- players -----------------------------------------------------------

pub fn get_player(conn: &Connection, id: i64) -> rusqlite::Result<Option<Player>> {
    conn.query_row(
        &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1"),
        params![id],
        player_from_row,
    )
    .optional()
}

pub fn get_player_by_name_and_team(
    conn: &Connection,
    name: &str,
    team_id: i64,
) -> rusqlite::Result<Option<Player>> {
    conn.query_row(
        &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE name = ?1 AND team_id = ?2"),
        params![name, team_id],
        player_from_row,
    )
    .optional()
}

pub fn get_or_create_player(
    conn: &Connection,
    name: &str,
    team_id: i64,
    fields: &PlayerFields,
) -> rusqlite::Result<(Player, bool)> {
    if let Some(player) = get_player_by_name_and_team(conn, name, team_id)? {
        return Ok((player, false));
    }
    let ts = now();
    conn.execute(
        "INSERT INTO players
            (name, position, nationality, age, fbref_url, team_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        params![
            name,
            fields.position,
            fields.nationality,
            fields.age,
            fields.fbref_url,
            team_id,
            ts
        ],
    )?;
    let id = conn.last_insert_rowid();
    let player = get_player(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
    Ok((player, true))
}

/// Writes newly scraped details that differ from what is stored. Missing new
/// values never blank out existing ones. Returns whether a write happened.
pub fn refresh_player_details(
    conn: &Connection,
    player: &Player,
    fields: &PlayerFields,
) -> rusqlite::Result<bool> {
    let position = pick_text(&player.position, &fields.position);
    let nationality = pick_text(&player.nationality, &fields.nationality);
    let fbref_url = pick_text(&player.fbref_url, &fields.fbref_url);
    let age = match fields.age {
        Some(age) if player.age != Some(age) => Some(age),
        _ => None,
    };
    if position.is_none() && nationality.is_none() && fbref_url.is_none() && age.is_none() {
        return Ok(false);
    }
    conn.execute(
        "UPDATE players SET
            position = COALESCE(?1, position),
            nationality = COALESCE(?2, nationality),
            age = COALESCE(?3, age),
            fbref_url = COALESCE(?4, fbref_url),
            updated_at = ?5
         WHERE id = ?6",
        params![position, nationality, age, fbref_url, now(), player.id],
    )?;
    Ok(true)
}

fn pick_text<'a>(current: &Option<String>, incoming: &'a Option<String>) -> Option<&'a str> {
    let incoming = incoming.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    (current.as_deref() != Some(incoming)).then_some(incoming)
}

pub fn players_by_team(conn: &Connection, team_id: i64) -> rusqlite::Result<Vec<Player>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLAYER_COLUMNS} FROM players WHERE team_id = ?1 ORDER BY name"
    ))?;
    let rows = stmt.query_map(params![team_id], player_from_row)?;
    rows.collect()
}

pub fn players_by_position(conn: &Connection, position: &str) -> rusqlite::Result<Vec<Player>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLAYER_COLUMNS} FROM players WHERE position = ?1 ORDER BY name"
    ))?;
    let rows = stmt.query_map(params![position], player_from_row)?;
    rows.collect()
}

/// Case-insensitive substring match on the display name.
pub fn search_players(conn: &Connection, pattern: &str) -> rusqlite::Result<Vec<Player>> {
    let like = format!("%{}%", pattern.trim());
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLAYER_COLUMNS} FROM players WHERE name LIKE ?1 ORDER BY name"
    ))?;
    let rows = stmt.query_map(params![like], player_from_row)?;
    rows.collect()
}

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        full_name: row.get(2)?,
        position: row.get(3)?,
        nationality: row.get(4)?,
        age: row.get(5)?,
        height: row.get(6)?,
        weight: row.get(7)?,
        fbref_url: row.get(8)?,
        team_id: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

// ---- player stats ------------------------------------------------------

pub fn get_stats_by_player_and_season(
    conn: &Connection,
    player_id: i64,
    season_id: i64,
) -> rusqlite::Result<Option<PlayerStats>> {
    conn.query_row(
        "SELECT * FROM player_stats WHERE player_id = ?1 AND season_id = ?2",
        params![player_id, season_id],
        player_stats_from_row,
    )
    .optional()
}

/// Overwrites the (player, season) row in place when present, inserts it
/// otherwise. Returns the row id and whether it was created.
pub fn upsert_player_stats(
    conn: &Connection,
    player_id: i64,
    season_id: i64,
    team_id: Option<i64>,
    stats: &StatLine,
    raw_data: Option<&str>,
) -> rusqlite::Result<(i64, bool)> {
    let ts = now();
    let values = stat_values(stats);

    if let Some(existing) = get_stats_by_player_and_season(conn, player_id, season_id)? {
        let assignments = STAT_COLUMNS
            .iter()
            .enumerate()
            .map(|(idx, col)| format!("{col} = ?{}", idx + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let n = STAT_COLUMNS.len();
        let sql = format!(
            "UPDATE player_stats SET {assignments}, team_id = ?{}, raw_data = ?{}, updated_at = ?{}
             WHERE id = ?{}",
            n + 1,
            n + 2,
            n + 3,
            n + 4
        );
        let tail = [
            opt_int(team_id),
            opt_text(raw_data),
            SqlValue::Text(ts),
            SqlValue::Integer(existing.id),
        ];
        conn.execute(&sql, params_from_iter(values.into_iter().chain(tail)))?;
        return Ok((existing.id, false));
    }

    let columns = STAT_COLUMNS.join(", ");
    let total = STAT_COLUMNS.len() + 6;
    let placeholders = (1..=total)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO player_stats
            (player_id, season_id, team_id, raw_data, created_at, updated_at, {columns})
         VALUES ({placeholders})"
    );
    let head = [
        SqlValue::Integer(player_id),
        SqlValue::Integer(season_id),
        opt_int(team_id),
        opt_text(raw_data),
        SqlValue::Text(ts.clone()),
        SqlValue::Text(ts),
    ];
    conn.execute(&sql, params_from_iter(head.into_iter().chain(values)))?;
    Ok((conn.last_insert_rowid(), true))
}

pub fn stats_by_season(
    conn: &Connection,
    season_id: i64,
    limit: Option<usize>,
) -> rusqlite::Result<Vec<PlayerStats>> {
    let limit = limit.map(|l| l as i64).unwrap_or(-1);
    let mut stmt = conn.prepare(
        "SELECT * FROM player_stats WHERE season_id = ?1 ORDER BY id LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![season_id, limit], player_stats_from_row)?;
    rows.collect()
}

pub fn stats_by_player(
    conn: &Connection,
    player_id: i64,
) -> rusqlite::Result<Vec<(String, PlayerStats)>> {
    let mut stmt = conn.prepare(
        "SELECT s.name, ps.* FROM player_stats ps
         JOIN seasons s ON s.id = ps.season_id
         WHERE ps.player_id = ?1 ORDER BY s.start_year DESC",
    )?;
    let rows = stmt.query_map(params![player_id], |row| {
        Ok((row.get::<_, String>(0)?, player_stats_from_row(row)?))
    })?;
    rows.collect()
}

pub fn top_scorers(
    conn: &Connection,
    season_id: i64,
    limit: usize,
) -> rusqlite::Result<Vec<PlayerStats>> {
    top_by(conn, season_id, "goals", limit)
}

pub fn top_assisters(
    conn: &Connection,
    season_id: i64,
    limit: usize,
) -> rusqlite::Result<Vec<PlayerStats>> {
    top_by(conn, season_id, "assists", limit)
}

/// Every player of a team paired with their line for one season, if any.
pub fn team_players_with_stats(
    conn: &Connection,
    team_id: i64,
    season_id: i64,
) -> rusqlite::Result<Vec<(Player, Option<PlayerStats>)>> {
    players_by_team(conn, team_id)?
        .into_iter()
        .map(|player| {
            let stats = get_stats_by_player_and_season(conn, player.id, season_id)?;
            Ok((player, stats))
        })
        .collect()
}

fn top_by(
    conn: &Connection,
    season_id: i64,
    column: &str,
    limit: usize,
) -> rusqlite::Result<Vec<PlayerStats>> {
    debug_assert!(STAT_COLUMNS.contains(&column));
    let mut stmt = conn.prepare(&format!(
        "SELECT * FROM player_stats WHERE season_id = ?1 ORDER BY {column} DESC, id ASC LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![season_id, limit as i64], player_stats_from_row)?;
    rows.collect()
}

fn stat_values(s: &StatLine) -> Vec<SqlValue> {
    let i = SqlValue::Integer;
    let f = SqlValue::Real;
    vec![
        i(s.matches_played),
        i(s.starts),
        i(s.minutes_played),
        f(s.minutes_90s),
        i(s.goals),
        i(s.assists),
        i(s.goals_plus_assists),
        i(s.non_penalty_goals),
        i(s.non_penalty_goals_plus_assists),
        i(s.penalties_scored),
        i(s.penalties_attempted),
        i(s.yellow_cards),
        i(s.red_cards),
        f(s.expected_goals),
        f(s.non_penalty_expected_goals),
        f(s.expected_assists),
        f(s.expected_goals_plus_assists),
        i(s.progressive_carries),
        i(s.progressive_passes),
        i(s.progressive_passes_received),
        i(s.passes_completed),
        i(s.passes_attempted),
        f(s.pass_completion_rate),
        i(s.tackles),
        i(s.interceptions),
        i(s.blocks),
        i(s.clearances),
        i(s.shots),
        i(s.shots_on_target),
        f(s.shot_accuracy),
        i(s.touches),
        i(s.dribbles_completed),
        i(s.dribbles_attempted),
        i(s.fouls_committed),
        i(s.fouls_drawn),
    ]
}

fn stat_line_from_row(row: &Row<'_>) -> rusqlite::Result<StatLine> {
    Ok(StatLine {
        matches_played: row.get("matches_played")?,
        starts: row.get("starts")?,
        minutes_played: row.get("minutes_played")?,
        minutes_90s: row.get("minutes_90s")?,
        goals: row.get("goals")?,
        assists: row.get("assists")?,
        goals_plus_assists: row.get("goals_plus_assists")?,
        non_penalty_goals: row.get("non_penalty_goals")?,
        non_penalty_goals_plus_assists: row.get("non_penalty_goals_plus_assists")?,
        penalties_scored: row.get("penalties_scored")?,
        penalties_attempted: row.get("penalties_attempted")?,
        yellow_cards: row.get("yellow_cards")?,
        red_cards: row.get("red_cards")?,
        expected_goals: row.get("expected_goals")?,
        non_penalty_expected_goals: row.get("non_penalty_expected_goals")?,
        expected_assists: row.get("expected_assists")?,
        expected_goals_plus_assists: row.get("expected_goals_plus_assists")?,
        progressive_carries: row.get("progressive_carries")?,
        progressive_passes: row.get("progressive_passes")?,
        progressive_passes_received: row.get("progressive_passes_received")?,
        passes_completed: row.get("passes_completed")?,
        passes_attempted: row.get("passes_attempted")?,
        pass_completion_rate: row.get("pass_completion_rate")?,
        tackles: row.get("tackles")?,
        interceptions: row.get("interceptions")?,
        blocks: row.get("blocks")?,
        clearances: row.get("clearances")?,
        shots: row.get("shots")?,
        shots_on_target: row.get("shots_on_target")?,
        shot_accuracy: row.get("shot_accuracy")?,
        touches: row.get("touches")?,
        dribbles_completed: row.get("dribbles_completed")?,
        dribbles_attempted: row.get("dribbles_attempted")?,
        fouls_committed: row.get("fouls_committed")?,
        fouls_drawn: row.get("fouls_drawn")?,
    })
}

fn player_stats_from_row(row: &Row<'_>) -> rusqlite::Result<PlayerStats> {
    Ok(PlayerStats {
        id: row.get("id")?,
        player_id: row.get("player_id")?,
        season_id: row.get("season_id")?,
        team_id: row.get("team_id")?,
        stats: stat_line_from_row(row)?,
        data_source: row.get("data_source")?,
        raw_data: row.get("raw_data")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

// ---- match logs --------------------------------------------------------

pub fn get_match_log_by_player_and_date(
    conn: &Connection,
    player_id: i64,
    match_date: NaiveDate,
) -> rusqlite::Result<Option<MatchLog>> {
    conn.query_row(
        "SELECT * FROM match_logs WHERE player_id = ?1 AND match_date = ?2",
        params![player_id, match_date.to_string()],
        match_log_from_row,
    )
    .optional()
}

pub fn upsert_match_log(conn: &Connection, log: &NewMatchLog) -> rusqlite::Result<(i64, bool)> {
    let mut values = vec![
        opt_string(&log.competition),
        opt_string(&log.round_info),
        opt_string(&log.venue),
        opt_string(&log.opponent),
        opt_string(&log.result),
        opt_string(&log.raw_data),
    ];
    values.extend(match_values(&log.line));
    let fixed = ["competition", "round_info", "venue", "opponent", "result", "raw_data"];
    let columns = fixed.iter().chain(MATCH_COLUMNS).copied().collect::<Vec<_>>();

    if let Some(existing) = get_match_log_by_player_and_date(conn, log.player_id, log.match_date)? {
        let assignments = columns
            .iter()
            .enumerate()
            .map(|(idx, col)| format!("{col} = ?{}", idx + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE match_logs SET {assignments}, season_id = ?{} WHERE id = ?{}",
            columns.len() + 1,
            columns.len() + 2
        );
        let tail = [SqlValue::Integer(log.season_id), SqlValue::Integer(existing.id)];
        conn.execute(&sql, params_from_iter(values.into_iter().chain(tail)))?;
        return Ok((existing.id, false));
    }

    let total = columns.len() + 4;
    let placeholders = (1..=total)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO match_logs (player_id, season_id, match_date, created_at, {})
         VALUES ({placeholders})",
        columns.join(", ")
    );
    let head = [
        SqlValue::Integer(log.player_id),
        SqlValue::Integer(log.season_id),
        SqlValue::Text(log.match_date.to_string()),
        SqlValue::Text(now()),
    ];
    conn.execute(&sql, params_from_iter(head.into_iter().chain(values)))?;
    Ok((conn.last_insert_rowid(), true))
}

pub fn match_logs_by_player(
    conn: &Connection,
    player_id: i64,
    season_id: Option<i64>,
) -> rusqlite::Result<Vec<MatchLog>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM match_logs
         WHERE player_id = ?1 AND (?2 IS NULL OR season_id = ?2)
         ORDER BY match_date DESC",
    )?;
    let rows = stmt.query_map(params![player_id, season_id], match_log_from_row)?;
    rows.collect()
}

fn match_values(m: &MatchLine) -> Vec<SqlValue> {
    let i = SqlValue::Integer;
    let f = SqlValue::Real;
    vec![
        i(m.minutes_played),
        i(m.goals),
        i(m.assists),
        i(m.shots),
        i(m.shots_on_target),
        f(m.expected_goals),
        f(m.expected_assists),
        i(m.passes_completed),
        i(m.passes_attempted),
        i(m.tackles),
        i(m.interceptions),
        i(m.touches),
        i(m.dribbles_completed),
        i(m.fouls_committed),
        i(m.fouls_drawn),
        i(m.yellow_cards),
        i(m.red_cards),
    ]
}

fn match_log_from_row(row: &Row<'_>) -> rusqlite::Result<MatchLog> {
    let raw_date: String = row.get("match_date")?;
    let match_date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d").map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
    })?;
    Ok(MatchLog {
        id: row.get("id")?,
        player_id: row.get("player_id")?,
        season_id: row.get("season_id")?,
        match_date,
        competition: row.get("competition")?,
        round_info: row.get("round_info")?,
        venue: row.get("venue")?,
        opponent: row.get("opponent")?,
        result: row.get("result")?,
        line: MatchLine {
            minutes_played: row.get("minutes_played")?,
            goals: row.get("goals")?,
            assists: row.get("assists")?,
            shots: row.get("shots")?,
            shots_on_target: row.get("shots_on_target")?,
            expected_goals: row.get("expected_goals")?,
            expected_assists: row.get("expected_assists")?,
            passes_completed: row.get("passes_completed")?,
            passes_attempted: row.get("passes_attempted")?,
            tackles: row.get("tackles")?,
            interceptions: row.get("interceptions")?,
            touches: row.get("touches")?,
            dribbles_completed: row.get("dribbles_completed")?,
            fouls_committed: row.get("fouls_committed")?,
            fouls_drawn: row.get("fouls_drawn")?,
            yellow_cards: row.get("yellow_cards")?,
            red_cards: row.get("red_cards")?,
        },
        raw_data: row.get("raw_data")?,
        created_at: row.get("created_at")?,
    })
}

// ---- scraping logs -----------------------------------------------------

pub fn log_scraping_attempt(
    conn: &Connection,
    attempt: &ScrapeAttempt<'_>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO scraping_logs
            (source_url, scraping_type, status, records_count, error_message,
             execution_time, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            attempt.source_url,
            attempt.scraping_type,
            attempt.status.as_str(),
            attempt.records_count as i64,
            attempt.error_message,
            attempt.execution_time,
            now()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn recent_scraping_logs(
    conn: &Connection,
    limit: usize,
) -> rusqlite::Result<Vec<ScrapingLog>> {
    let mut stmt = conn.prepare(
        "SELECT id, source_url, scraping_type, status, records_count, error_message,
                execution_time, created_at
         FROM scraping_logs ORDER BY id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit as i64], |row| {
        Ok(ScrapingLog {
            id: row.get(0)?,
            source_url: row.get(1)?,
            scraping_type: row.get(2)?,
            status: row.get(3)?,
            records_count: row.get(4)?,
            error_message: row.get(5)?,
            execution_time: row.get(6)?,
            created_at: row.get(7)?,
        })
    })?;
    rows.collect()
}

// ---- summary -----------------------------------------------------------

pub fn summary_counts(conn: &Connection) -> rusqlite::Result<SummaryCounts> {
    let count = |table: &str| -> rusqlite::Result<i64> {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
    };
    Ok(SummaryCounts {
        total_players: count("players")?,
        total_teams: count("teams")?,
        total_seasons: count("seasons")?,
        total_stats: count("player_stats")?,
        total_match_logs: count("match_logs")?,
    })
}

fn opt_int(v: Option<i64>) -> SqlValue {
    v.map(SqlValue::Integer).unwrap_or(SqlValue::Null)
}

fn opt_text(v: Option<&str>) -> SqlValue {
    v.map(|s| SqlValue::Text(s.to_string())).unwrap_or(SqlValue::Null)
}

fn opt_string(v: &Option<String>) -> SqlValue {
    opt_text(v.as_deref())
}
