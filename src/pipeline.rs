use std::time::Instant;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::fbref::FbrefScraper;
use crate::models::ScrapeStatus;
use crate::payload::PlayerPayload;
use crate::repository::{self, ScrapeAttempt};
use crate::sanitize::clean_player_name;
use crate::service::{DataService, SaveSummary, clean_team_name};

pub const TEST_TEAM_URL: &str = "https://fbref.com/en/squads/18bb7c10/Arsenal-Stats";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeMode {
    /// Every team of every configured league.
    Full,
    /// One team page given by `team_url`.
    Team,
    /// One fixed team page, for smoke runs.
    #[default]
    Test,
}

/// A scrape job as submitted by the CLI or the web layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub mode: ScrapeMode,
    #[serde(default)]
    pub team_url: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub leagues: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
}

impl OperationResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub pages_ok: usize,
    pub pages_failed: usize,
    pub payloads: usize,
    pub saved: SaveSummary,
    pub match_logs: usize,
}

impl RunSummary {
    fn absorb(&mut self, other: RunSummary) {
        self.pages_ok += other.pages_ok;
        self.pages_failed += other.pages_failed;
        self.payloads += other.payloads;
        self.saved.teams += other.saved.teams;
        self.saved.players += other.saved.players;
        self.saved.stats += other.saved.stats;
        self.saved.errors += other.saved.errors;
        self.match_logs += other.match_logs;
    }
}

/// Runs scrape jobs page by page and stores what each page yields. Every
/// page attempt leaves one scraping log row.
pub struct IngestPipeline {
    scraper: FbrefScraper,
    service: DataService,
    default_leagues: Vec<String>,
    match_logs: bool,
}

impl IngestPipeline {
    pub fn new(scraper: FbrefScraper, service: DataService, default_leagues: Vec<String>) -> Self {
        Self {
            scraper,
            service,
            default_leagues,
            match_logs: false,
        }
    }

    /// Also fetch per-player match logs after each squad page.
    pub fn with_match_logs(mut self, enabled: bool) -> Self {
        self.match_logs = enabled;
        self
    }

    pub fn service(&self) -> &DataService {
        &self.service
    }

    pub fn run(&mut self, request: &ScrapeRequest) -> OperationResult {
        let season = request.season.as_deref();
        let outcome = match request.mode {
            ScrapeMode::Full => {
                let leagues = request
                    .leagues
                    .clone()
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| self.default_leagues.clone());
                self.run_full(&leagues, season)
            }
            ScrapeMode::Team => {
                let Some(team_url) = request.team_url.as_deref().filter(|u| !u.trim().is_empty())
                else {
                    return OperationResult::failed("team mode requires a team url");
                };
                self.run_single_team(team_url, season)
            }
            ScrapeMode::Test => self.run_single_team(TEST_TEAM_URL, season),
        };

        match outcome {
            Ok(summary) if summary.payloads == 0 => OperationResult::failed(format!(
                "no player data scraped ({} pages failed)",
                summary.pages_failed
            )),
            Ok(summary) => OperationResult::ok(format!(
                "scraped {} players from {} pages ({} failed); \
                 saved {} teams, {} players, {} stat lines, {} errors",
                summary.payloads,
                summary.pages_ok,
                summary.pages_failed,
                summary.saved.teams,
                summary.saved.players,
                summary.saved.stats,
                summary.saved.errors
            )),
            Err(err) => OperationResult::failed(format!("{err:#}")),
        }
    }

    pub fn run_full(&mut self, leagues: &[String], season: Option<&str>) -> Result<RunSummary> {
        let started = Instant::now();
        info!(leagues = leagues.len(), "full scrape starting");
        let mut total = RunSummary::default();
        for league_url in leagues {
            total.absorb(self.scrape_league_data(league_url, season)?);
        }
        info!(
            secs = started.elapsed().as_secs_f64(),
            players = total.payloads,
            failed_pages = total.pages_failed,
            "full scrape finished"
        );
        Ok(total)
    }

    pub fn run_single_team(&mut self, team_url: &str, season: Option<&str>) -> Result<RunSummary> {
        info!(url = %team_url, "single team scrape starting");
        self.ingest_team(team_url, season)
    }

    /// Discovers the teams of one league and ingests each. A team page that
    /// fails is logged and skipped.
    pub fn scrape_league_data(
        &mut self,
        league_url: &str,
        season: Option<&str>,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let started = Instant::now();
        let teams = match self.scraper.get_league_teams(league_url) {
            Ok(teams) => {
                self.record_attempt(league_url, "league", Ok(teams.len()), started);
                summary.pages_ok += 1;
                teams
            }
            Err(err) => {
                warn!(url = %league_url, error = %err, "league page skipped");
                self.record_attempt(league_url, "league", Err(&err), started);
                summary.pages_failed += 1;
                return Ok(summary);
            }
        };
        if teams.is_empty() {
            warn!(url = %league_url, "league page lists no teams");
        }

        for team_url in &teams {
            summary.absorb(self.ingest_team(team_url, season)?);
        }
        info!(
            url = %league_url,
            teams = teams.len(),
            players = summary.payloads,
            "league finished"
        );
        Ok(summary)
    }

    fn ingest_team(&mut self, team_url: &str, season: Option<&str>) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let started = Instant::now();
        let payloads = match self.scraper.scrape_team(team_url, season) {
            Ok(payloads) => {
                self.record_attempt(team_url, "team", Ok(payloads.len()), started);
                summary.pages_ok += 1;
                payloads
            }
            Err(err) => {
                warn!(url = %team_url, error = %err, "team page skipped");
                self.record_attempt(team_url, "team", Err(&err), started);
                summary.pages_failed += 1;
                return Ok(summary);
            }
        };

        summary.payloads = payloads.len();
        summary.saved = self.service.save_player_data(&payloads)?;
        if self.match_logs {
            self.ingest_match_logs(&payloads, season, &mut summary)?;
        }
        Ok(summary)
    }

    fn ingest_match_logs(
        &mut self,
        payloads: &[PlayerPayload],
        season: Option<&str>,
        summary: &mut RunSummary,
    ) -> Result<()> {
        for payload in payloads {
            let Some(player_url) = payload.player_url.as_deref() else {
                continue;
            };
            let season = season
                .or(payload.season.as_deref())
                .unwrap_or(self.scraper.default_season())
                .to_string();
            let Some(player_id) = self.stored_player_id(payload)? else {
                continue;
            };

            let started = Instant::now();
            match self.scraper.get_player_match_logs(player_url, &season) {
                Ok(rows) => {
                    self.record_attempt(player_url, "match_logs", Ok(rows.len()), started);
                    summary.pages_ok += 1;
                    let saved = self.service.save_match_logs(player_id, &season, &rows)?;
                    summary.match_logs += saved.saved;
                }
                Err(err) => {
                    warn!(url = %player_url, error = %err, "match log page skipped");
                    self.record_attempt(player_url, "match_logs", Err(&err), started);
                    summary.pages_failed += 1;
                }
            }
        }
        Ok(())
    }

    fn stored_player_id(&self, payload: &PlayerPayload) -> Result<Option<i64>> {
        let conn = self.service.connection();
        let team_name = clean_team_name(&payload.team_name);
        let Some(team) = repository::get_team_by_name(conn, &team_name)? else {
            return Ok(None);
        };
        let player_name = clean_player_name(&payload.player_name);
        Ok(repository::get_player_by_name_and_team(conn, &player_name, team.id)?.map(|p| p.id))
    }

    fn record_attempt(
        &self,
        url: &str,
        kind: &str,
        outcome: Result<usize, &ScrapeError>,
        started: Instant,
    ) {
        let (status, records_count, error_message) = match outcome {
            Ok(0) => (ScrapeStatus::Partial, 0, None),
            Ok(n) => (ScrapeStatus::Success, n, None),
            Err(err) => (ScrapeStatus::Failed, 0, Some(err.to_string())),
        };
        let attempt = ScrapeAttempt {
            source_url: url,
            scraping_type: kind,
            status,
            records_count,
            error_message,
            execution_time: Some(started.elapsed().as_secs_f64()),
        };
        if let Err(err) = repository::log_scraping_attempt(self.service.connection(), &attempt) {
            warn!(url, error = %err, "could not write scraping log");
        }
    }
}
