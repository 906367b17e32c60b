use std::collections::HashSet;

use anyhow::Context;
use scraper::Html;
use tracing::{debug, info};
use url::Url;

use crate::config::ScrapeSettings;
use crate::error::ScrapeError;
use crate::http_client::Fetcher;
use crate::metadata::{infer_from_heading, resolve_team_name};
use crate::payload::{
    MatchLogPayload, PayloadContext, PlayerPayload, attach_player_links, build_match_log_payload,
    build_player_payloads,
};
use crate::record::SquadRow;
use crate::sanitize::sanitize_row;
use crate::table::{extract_player_links, extract_table, find_table, first_text, selector};

pub const SQUAD_TABLE_ID: &str = "stats_standard";
pub const MATCH_LOG_TABLE_ID: &str = "matchlogs_for";

/// A parsed squad page: what the heading says plus the sanitized player rows
/// with their detail links already attached.
#[derive(Debug, Clone)]
pub struct SquadPage {
    pub team_name: String,
    pub league: Option<String>,
    pub season: Option<String>,
    pub rows: Vec<SquadRow>,
}

impl SquadPage {
    /// Season precedence: explicit request, then page heading, then default.
    pub fn into_payloads(
        self,
        team_url: &str,
        season_override: Option<&str>,
        default_season: &str,
    ) -> Vec<PlayerPayload> {
        let season = season_override
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or(self.season.as_deref())
            .unwrap_or(default_season);
        let ctx = PayloadContext {
            team_name: &self.team_name,
            team_url: Some(team_url),
            league: self.league.as_deref(),
            season,
        };
        build_player_payloads(&self.rows, &ctx)
    }
}

pub fn parse_squad_page(html: &str, page_url: &str, base: &Url) -> Result<SquadPage, ScrapeError> {
    let document = Html::parse_document(html);
    let metadata = first_text(&document, "h1")?
        .map(|heading| infer_from_heading(&heading))
        .unwrap_or_default();

    let table = find_table(&document, SQUAD_TABLE_ID)?.ok_or_else(|| ScrapeError::TableNotFound {
        url: page_url.to_string(),
        id: SQUAD_TABLE_ID.to_string(),
    })?;

    // Links are attached before sanitizing so dropped total rows cannot
    // shift them onto the wrong player.
    let links = extract_player_links(table, base)?;
    let mut rows = extract_table(table)?.into_rows();
    attach_player_links(&mut rows, &links);
    let rows = rows.into_iter().filter_map(sanitize_row).collect::<Vec<_>>();

    Ok(SquadPage {
        team_name: resolve_team_name(&metadata, page_url),
        league: metadata.competition,
        season: metadata.season,
        rows,
    })
}

/// Absolute squad URLs linked from a league page, first sighting order.
pub fn parse_league_teams(html: &str, base: &Url) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let anchors = selector(r#"a[href*="/squads/"]"#)?;

    let mut seen = HashSet::new();
    let mut teams = Vec::new();
    for anchor in document.select(&anchors) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(url) = base.join(href) else {
            continue;
        };
        let url = url.to_string();
        if seen.insert(url.clone()) {
            teams.push(url);
        }
    }
    Ok(teams)
}

pub fn parse_match_logs(html: &str, page_url: &str) -> Result<Vec<MatchLogPayload>, ScrapeError> {
    let document = Html::parse_document(html);
    let table =
        find_table(&document, MATCH_LOG_TABLE_ID)?.ok_or_else(|| ScrapeError::TableNotFound {
            url: page_url.to_string(),
            id: MATCH_LOG_TABLE_ID.to_string(),
        })?;
    Ok(extract_table(table)?
        .into_rows()
        .iter()
        .map(build_match_log_payload)
        .collect())
}

/// `/en/players/{id}/{slug}` -> `/en/players/{id}/matchlogs/{season}/{slug}-Match-Logs`.
pub fn match_logs_url(player_url: &str, season: &str) -> Result<String, ScrapeError> {
    let url = Url::parse(player_url).map_err(|_| ScrapeError::Url(player_url.to_string()))?;
    let segments = url
        .path_segments()
        .map(|segs| segs.filter(|s| !s.is_empty()).collect::<Vec<_>>())
        .unwrap_or_default();

    let players_at = segments
        .iter()
        .position(|seg| *seg == "players")
        .ok_or_else(|| ScrapeError::Url(player_url.to_string()))?;
    let (Some(id), Some(slug)) = (segments.get(players_at + 1), segments.get(players_at + 2)) else {
        return Err(ScrapeError::Url(player_url.to_string()));
    };
    let prefix = segments[..players_at].join("/");
    let path = if prefix.is_empty() {
        format!("/players/{id}/matchlogs/{season}/{slug}-Match-Logs")
    } else {
        format!("/{prefix}/players/{id}/matchlogs/{season}/{slug}-Match-Logs")
    };
    url.join(&path)
        .map(|u| u.to_string())
        .map_err(|_| ScrapeError::Url(player_url.to_string()))
}

/// Fetches and parses pages from the stats site, one at a time.
pub struct FbrefScraper {
    fetcher: Fetcher,
    base_url: Url,
    default_season: String,
}

impl FbrefScraper {
    pub fn new(settings: &ScrapeSettings) -> anyhow::Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .with_context(|| format!("invalid base url {}", settings.base_url))?;
        Ok(Self {
            fetcher: Fetcher::new(settings)?,
            base_url,
            default_season: settings.default_season.clone(),
        })
    }

    pub fn default_season(&self) -> &str {
        &self.default_season
    }

    pub fn resolve(&self, url: &str) -> Result<String, ScrapeError> {
        self.base_url
            .join(url.trim())
            .map(|u| u.to_string())
            .map_err(|_| ScrapeError::Url(url.to_string()))
    }

    pub fn scrape_team(
        &self,
        team_url: &str,
        season: Option<&str>,
    ) -> Result<Vec<PlayerPayload>, ScrapeError> {
        let url = self.resolve(team_url)?;
        let html = self.fetcher.fetch_html(&url)?;
        let page = parse_squad_page(&html, &url, &self.base_url)?;
        let team_name = page.team_name.clone();
        let payloads = page.into_payloads(&url, season, &self.default_season);
        info!(url = %url, team = %team_name, players = payloads.len(), "squad page parsed");
        Ok(payloads)
    }

    pub fn get_league_teams(&self, league_url: &str) -> Result<Vec<String>, ScrapeError> {
        let url = self.resolve(league_url)?;
        let html = self.fetcher.fetch_html(&url)?;
        let teams = parse_league_teams(&html, &self.base_url)?;
        info!(url = %url, teams = teams.len(), "league page parsed");
        Ok(teams)
    }

    pub fn get_player_match_logs(
        &self,
        player_url: &str,
        season: &str,
    ) -> Result<Vec<MatchLogPayload>, ScrapeError> {
        let url = match_logs_url(&self.resolve(player_url)?, season)?;
        let html = self.fetcher.fetch_html(&url)?;
        let rows = parse_match_logs(&html, &url)?;
        debug!(url = %url, rows = rows.len(), "match log page parsed");
        Ok(rows)
    }
}
