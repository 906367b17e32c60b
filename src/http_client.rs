use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::{debug, warn};

use crate::config::ScrapeSettings;
use crate::error::ScrapeError;

/// Blocking page fetcher. Sleeps for the configured delay after every
/// request, successful or not, to stay under the source's rate limit.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    user_agent: String,
    delay: Duration,
}

impl Fetcher {
    pub fn new(settings: &ScrapeSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            client,
            user_agent: settings.user_agent.clone(),
            delay: settings.delay,
        })
    }

    pub fn fetch_html(&self, url: &str) -> Result<String, ScrapeError> {
        let result = self.request(url);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        result
    }

    fn request(&self, url: &str) -> Result<String, ScrapeError> {
        debug!(url, "fetching page");
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()?;
        let status = resp.status();
        if !is_accepted(status) {
            warn!(url, %status, "page request rejected");
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(resp.text()?)
    }
}

/// Only a plain 200 carries a page body worth parsing.
fn is_accepted(status: StatusCode) -> bool {
    status == StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ok_status_is_accepted() {
        assert!(is_accepted(StatusCode::OK));
        assert!(!is_accepted(StatusCode::NON_AUTHORITATIVE_INFORMATION));
        assert!(!is_accepted(StatusCode::NO_CONTENT));
        assert!(!is_accepted(StatusCode::TOO_MANY_REQUESTS));
    }
}
