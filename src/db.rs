use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode = WAL;")
        .context("enable wal")?;
    init_schema(&conn)?;
    info!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS teams (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            fbref_url TEXT NULL,
            league TEXT NULL,
            country TEXT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_teams_league ON teams(league);

        CREATE TABLE IF NOT EXISTS seasons (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            start_year INTEGER NOT NULL,
            end_year INTEGER NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS players (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            full_name TEXT NULL,
            position TEXT NULL,
            nationality TEXT NULL,
            age INTEGER NULL,
            height REAL NULL,
            weight REAL NULL,
            fbref_url TEXT NULL,
            team_id INTEGER NULL REFERENCES teams(id) ON DELETE SET NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_players_name_team ON players(name, team_id);
        CREATE INDEX IF NOT EXISTS idx_players_position ON players(position);

        CREATE TABLE IF NOT EXISTS player_stats (
            id INTEGER PRIMARY KEY,
            player_id INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
            season_id INTEGER NOT NULL REFERENCES seasons(id) ON DELETE CASCADE,
            team_id INTEGER NULL REFERENCES teams(id) ON DELETE SET NULL,
            matches_played INTEGER NOT NULL DEFAULT 0,
            starts INTEGER NOT NULL DEFAULT 0,
            minutes_played INTEGER NOT NULL DEFAULT 0,
            minutes_90s REAL NOT NULL DEFAULT 0,
            goals INTEGER NOT NULL DEFAULT 0,
            assists INTEGER NOT NULL DEFAULT 0,
            goals_plus_assists INTEGER NOT NULL DEFAULT 0,
            non_penalty_goals INTEGER NOT NULL DEFAULT 0,
            non_penalty_goals_plus_assists INTEGER NOT NULL DEFAULT 0,
            penalties_scored INTEGER NOT NULL DEFAULT 0,
            penalties_attempted INTEGER NOT NULL DEFAULT 0,
            yellow_cards INTEGER NOT NULL DEFAULT 0,
            red_cards INTEGER NOT NULL DEFAULT 0,
            expected_goals REAL NOT NULL DEFAULT 0,
            non_penalty_expected_goals REAL NOT NULL DEFAULT 0,
            expected_assists REAL NOT NULL DEFAULT 0,
            expected_goals_plus_assists REAL NOT NULL DEFAULT 0,
            progressive_carries INTEGER NOT NULL DEFAULT 0,
            progressive_passes INTEGER NOT NULL DEFAULT 0,
            progressive_passes_received INTEGER NOT NULL DEFAULT 0,
            passes_completed INTEGER NOT NULL DEFAULT 0,
            passes_attempted INTEGER NOT NULL DEFAULT 0,
            pass_completion_rate REAL NOT NULL DEFAULT 0,
            tackles INTEGER NOT NULL DEFAULT 0,
            interceptions INTEGER NOT NULL DEFAULT 0,
            blocks INTEGER NOT NULL DEFAULT 0,
            clearances INTEGER NOT NULL DEFAULT 0,
            shots INTEGER NOT NULL DEFAULT 0,
            shots_on_target INTEGER NOT NULL DEFAULT 0,
            shot_accuracy REAL NOT NULL DEFAULT 0,
            touches INTEGER NOT NULL DEFAULT 0,
            dribbles_completed INTEGER NOT NULL DEFAULT 0,
            dribbles_attempted INTEGER NOT NULL DEFAULT 0,
            fouls_committed INTEGER NOT NULL DEFAULT 0,
            fouls_drawn INTEGER NOT NULL DEFAULT 0,
            data_source TEXT NOT NULL DEFAULT 'fbref',
            raw_data TEXT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(player_id, season_id)
        );
        CREATE INDEX IF NOT EXISTS idx_player_stats_season ON player_stats(season_id);

        CREATE TABLE IF NOT EXISTS match_logs (
            id INTEGER PRIMARY KEY,
            player_id INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
            season_id INTEGER NOT NULL REFERENCES seasons(id) ON DELETE CASCADE,
            match_date TEXT NOT NULL,
            competition TEXT NULL,
            round_info TEXT NULL,
            venue TEXT NULL,
            opponent TEXT NULL,
            result TEXT NULL,
            minutes_played INTEGER NOT NULL DEFAULT 0,
            goals INTEGER NOT NULL DEFAULT 0,
            assists INTEGER NOT NULL DEFAULT 0,
            shots INTEGER NOT NULL DEFAULT 0,
            shots_on_target INTEGER NOT NULL DEFAULT 0,
            expected_goals REAL NOT NULL DEFAULT 0,
            expected_assists REAL NOT NULL DEFAULT 0,
            passes_completed INTEGER NOT NULL DEFAULT 0,
            passes_attempted INTEGER NOT NULL DEFAULT 0,
            tackles INTEGER NOT NULL DEFAULT 0,
            interceptions INTEGER NOT NULL DEFAULT 0,
            touches INTEGER NOT NULL DEFAULT 0,
            dribbles_completed INTEGER NOT NULL DEFAULT 0,
            fouls_committed INTEGER NOT NULL DEFAULT 0,
            fouls_drawn INTEGER NOT NULL DEFAULT 0,
            yellow_cards INTEGER NOT NULL DEFAULT 0,
            red_cards INTEGER NOT NULL DEFAULT 0,
            raw_data TEXT NULL,
            created_at TEXT NOT NULL,
            UNIQUE(player_id, match_date)
        );

        CREATE TABLE IF NOT EXISTS scraping_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_url TEXT NOT NULL,
            scraping_type TEXT NOT NULL,
            status TEXT NOT NULL,
            records_count INTEGER NOT NULL DEFAULT 0,
            error_message TEXT NULL,
            execution_time REAL NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_scraping_logs_created ON scraping_logs(created_at);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}
