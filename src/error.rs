use reqwest::StatusCode;
use thiserror::Error;

/// Failures while turning a source page into rows. Every variant means the
/// page is skipped; none of them are retried.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("http {status} for {url}")]
    Status { url: String, status: StatusCode },
    #[error("no table with id containing '{id}' on {url}")]
    TableNotFound { url: String, id: String },
    #[error("invalid selector '{0}'")]
    Selector(String),
    #[error("invalid url '{0}'")]
    Url(String),
}

/// Failures while upserting a single payload. These are counted per record
/// and never abort the batch.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("payload has no team name")]
    MissingTeamName,
    #[error("payload has no player name")]
    MissingPlayerName,
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("raw snapshot encode: {0}")]
    Encode(#[from] serde_json::Error),
}
