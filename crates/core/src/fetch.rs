//! Content fetching from URLs.
//!
//! This module retrieves raw HTML over HTTP/HTTPS.
//! It performs a single attempt per call; retries are the caller's business.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{NewsletterError, Result};

/// Identifies as a desktop browser; some sites refuse unknown agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 10, user_agent: BROWSER_USER_AGENT.to_string() }
    }
}

/// Fetches HTML content from a URL.
///
/// Non-success statuses are errors, as are timeouts and malformed URLs.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| NewsletterError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(NewsletterError::InvalidUrl(format!(
            "unsupported scheme '{}' (expected http or https)",
            parsed_url.scheme()
        )));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(NewsletterError::HttpError)?;

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                NewsletterError::Timeout { timeout: config.timeout }
            } else {
                NewsletterError::HttpError(e)
            }
        })?
        .error_for_status()?;

    let content = response.text().await?;

    Ok(content)
}
