use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::db;
use crate::error::PersistError;
use crate::models::{current_season_label, parse_season_bounds};
use crate::payload::{MatchLogPayload, PlayerPayload};
use crate::repository::{self, NewMatchLog, PlayerFields, TeamFields};
use crate::sanitize::clean_player_name;

/// Distinct teams and players touched by one batch, stat lines written, and
/// payloads rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub teams: usize,
    pub players: usize,
    pub stats: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLogSummary {
    pub saved: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Owns the connection used for every write. Build one per run and pass it
/// to whatever needs to persist.
pub struct DataService {
    conn: Connection,
}

impl DataService {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(db::open_db(path)?))
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(db::open_in_memory()?))
    }

    /// Read access for the query functions in `repository`.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Upserts a batch in one transaction. Each payload runs in its own
    /// savepoint, so a rejected or failing record only rolls back itself.
    pub fn save_player_data(&mut self, payloads: &[PlayerPayload]) -> Result<SaveSummary> {
        let mut tx = self
            .conn
            .transaction()
            .context("begin player batch transaction")?;

        let mut team_ids = HashSet::new();
        let mut player_ids = HashSet::new();
        let mut stats = 0usize;
        let mut errors = 0usize;

        for payload in payloads {
            let sp = tx.savepoint().context("open payload savepoint")?;
            let saved = save_one(&sp, payload);
            match saved {
                Ok(ids) => match sp.commit() {
                    Ok(()) => {
                        team_ids.insert(ids.team_id);
                        player_ids.insert(ids.player_id);
                        stats += 1;
                    }
                    Err(err) => {
                        warn!(
                            player = %payload.player_name,
                            error = %err,
                            "payload release failed"
                        );
                        errors += 1;
                    }
                },
                Err(err) => {
                    warn!(
                        team = %payload.team_name,
                        player = %payload.player_name,
                        error = %err,
                        "skipping payload"
                    );
                    errors += 1;
                }
            }
        }

        tx.commit().context("commit player batch transaction")?;

        let summary = SaveSummary {
            teams: team_ids.len(),
            players: player_ids.len(),
            stats,
            errors,
        };
        info!(
            teams = summary.teams,
            players = summary.players,
            stats = summary.stats,
            errors = summary.errors,
            "player batch saved"
        );
        Ok(summary)
    }

    /// Upserts match log rows for one player by match date. Rows without a
    /// date are skipped.
    pub fn save_match_logs(
        &mut self,
        player_id: i64,
        season: &str,
        rows: &[MatchLogPayload],
    ) -> Result<MatchLogSummary> {
        let tx = self
            .conn
            .transaction()
            .context("begin match log transaction")?;

        let label = season_label(Some(season));
        let (start, end) = parse_season_bounds(&label);
        let season = repository::get_or_create_season(&tx, &label, start, end)
            .context("resolve match log season")?;

        let mut summary = MatchLogSummary::default();
        for row in rows {
            let Some(match_date) = row.match_date else {
                summary.skipped += 1;
                continue;
            };
            let raw_data = serde_json::to_string(&row.raw_data).ok();
            let log = NewMatchLog {
                player_id,
                season_id: season.id,
                match_date,
                competition: row.competition.clone(),
                round_info: row.round_info.clone(),
                venue: row.venue.clone(),
                opponent: row.opponent.clone(),
                result: row.result.clone(),
                line: row.line.clone(),
                raw_data,
            };
            match repository::upsert_match_log(&tx, &log) {
                Ok(_) => summary.saved += 1,
                Err(err) => {
                    warn!(player_id, %match_date, error = %err, "skipping match log row");
                    summary.errors += 1;
                }
            }
        }

        tx.commit().context("commit match log transaction")?;
        debug!(player_id, saved = summary.saved, skipped = summary.skipped, "match logs saved");
        Ok(summary)
    }
}

struct SavedIds {
    team_id: i64,
    player_id: i64,
}

fn save_one(conn: &Connection, payload: &PlayerPayload) -> Result<SavedIds, PersistError> {
    let team_name = clean_team_name(&payload.team_name);
    if team_name.is_empty() {
        return Err(PersistError::MissingTeamName);
    }
    let player_name = clean_player_name(&payload.player_name);
    if player_name.is_empty() {
        return Err(PersistError::MissingPlayerName);
    }

    let (team, _) = repository::get_or_create_team(
        conn,
        &team_name,
        &TeamFields {
            fbref_url: payload.team_url.clone(),
            league: payload.league.clone(),
            country: None,
        },
    )?;

    let label = season_label(payload.season.as_deref());
    let (start, end) = parse_season_bounds(&label);
    let season = repository::get_or_create_season(conn, &label, start, end)?;

    let fields = PlayerFields {
        position: payload.position.clone(),
        nationality: payload.nationality.clone(),
        age: payload.age,
        fbref_url: payload.player_url.clone(),
    };
    let (player, created) = repository::get_or_create_player(conn, &player_name, team.id, &fields)?;
    if !created {
        repository::refresh_player_details(conn, &player, &fields)?;
    }

    let raw_data = serde_json::to_string(&payload.raw_data)?;
    repository::upsert_player_stats(
        conn,
        player.id,
        season.id,
        Some(team.id),
        &payload.stats,
        Some(&raw_data),
    )?;

    Ok(SavedIds {
        team_id: team.id,
        player_id: player.id,
    })
}

/// Team identity key: NBSP folded to a space, outer whitespace dropped.
pub fn clean_team_name(raw: &str) -> String {
    raw.replace('\u{a0}', " ").trim().to_string()
}

fn season_label(season: Option<&str>) -> String {
    season
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(current_season_label)
}
