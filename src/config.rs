use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};

const APP_DIR: &str = "fbref_ingest";
const DB_FILE: &str = "fbref.sqlite";
const MIN_DELAY_SECS: f64 = 0.5;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_BASE_URL: &str = "https://fbref.com";
pub const DEFAULT_SEASON: &str = "2024-2025";
pub const DEFAULT_LEAGUES: &[&str] = &[
    "https://fbref.com/en/comps/9/Premier-League-Stats",
    "https://fbref.com/en/comps/12/La-Liga-Stats",
];

#[derive(Debug, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub scrape: ScrapeSettings,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub delay: Duration,
    pub timeout: Duration,
    pub user_agent: String,
    pub base_url: String,
    pub default_season: String,
    pub default_leagues: Vec<String>,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(2),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_season: DEFAULT_SEASON.to_string(),
            default_leagues: DEFAULT_LEAGUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Unparsable numbers fall back to
    /// defaults; a delay under half a second is rejected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = ScrapeSettings::default();

        let delay_secs = get("SCRAPING_DELAY")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(defaults.delay.as_secs_f64());
        if !delay_secs.is_finite() || delay_secs < MIN_DELAY_SECS {
            return Err(anyhow!(
                "SCRAPING_DELAY must be at least {MIN_DELAY_SECS} seconds (got {delay_secs})"
            ));
        }
        let timeout_secs = get("SCRAPING_TIMEOUT")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(defaults.timeout.as_secs())
            .max(1);

        let default_leagues = get("DEFAULT_LEAGUES")
            .map(|raw| split_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.default_leagues);

        let path = get("FBREF_DB_PATH")
            .map(PathBuf::from)
            .or_else(|| default_db_path_from(&get))
            .unwrap_or_else(|| PathBuf::from(DB_FILE));

        Ok(Self {
            database: DatabaseSettings { path },
            scrape: ScrapeSettings {
                delay: Duration::from_secs_f64(delay_secs),
                timeout: Duration::from_secs(timeout_secs),
                user_agent: get("SCRAPING_USER_AGENT").unwrap_or(defaults.user_agent),
                base_url: get("FBREF_BASE_URL").unwrap_or(defaults.base_url),
                default_season: get("DEFAULT_SEASON").unwrap_or(defaults.default_season),
                default_leagues,
            },
        })
    }
}

fn default_db_path_from(get: &dyn Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(base) = get("XDG_CACHE_HOME") {
        return Some(PathBuf::from(base).join(APP_DIR).join(DB_FILE));
    }
    let home = get("HOME")?;
    Some(PathBuf::from(home).join(".cache").join(APP_DIR).join(DB_FILE))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split([',', ';', ' '])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_env() {
        let s = settings(&[("HOME", "/home/u")]).unwrap();
        assert_eq!(s.scrape.delay, Duration::from_secs(2));
        assert_eq!(s.scrape.timeout, Duration::from_secs(30));
        assert_eq!(s.scrape.default_season, "2024-2025");
        assert_eq!(s.scrape.default_leagues.len(), 2);
        assert_eq!(
            s.database.path,
            PathBuf::from("/home/u/.cache/fbref_ingest/fbref.sqlite")
        );
    }

    #[test]
    fn env_overrides_and_bad_numbers_fall_back() {
        let s = settings(&[
            ("SCRAPING_DELAY", "3.5"),
            ("SCRAPING_TIMEOUT", "abc"),
            ("FBREF_DB_PATH", "/tmp/x.sqlite"),
            ("DEFAULT_LEAGUES", "https://a, https://b;https://c"),
        ])
        .unwrap();
        assert_eq!(s.scrape.delay, Duration::from_millis(3500));
        assert_eq!(s.scrape.timeout, Duration::from_secs(30));
        assert_eq!(s.database.path, PathBuf::from("/tmp/x.sqlite"));
        assert_eq!(s.scrape.default_leagues, vec!["https://a", "https://b", "https://c"]);
    }

    #[test]
    fn delay_below_minimum_is_rejected() {
        assert!(settings(&[("SCRAPING_DELAY", "0.1")]).is_err());
    }
}
