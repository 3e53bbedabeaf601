//! HTTP client for store search pages.

mod origin;

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

pub use origin::{absolutize, encode_component, extract_domain};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_ES: &str = "es-ES,es;q=0.9,en;q=0.8";

/// Fetches store search pages with a fixed browser-like header set.
///
/// Every request is attempted up to `max_attempts` times with linear backoff
/// (`backoff_ms * attempt`) between failures.
#[derive(Debug, Clone)]
pub struct StoreClient {
    client: Client,
    max_attempts: u32,
    backoff_ms: u64,
}

impl StoreClient {
    /// Creates a `StoreClient` with the given per-request timeout, `User-Agent`,
    /// and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_attempts: u32,
        backoff_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_attempts,
            backoff_ms,
        })
    }

    /// Builds a client from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying client cannot be built.
    pub fn from_config(config: &comoprecio_core::AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            config.scraper_max_attempts,
            config.scraper_retry_backoff_ms,
        )
    }

    /// GETs `url` and returns the response body.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `url` does not parse (not retried).
    /// - [`ScraperError::UnexpectedStatus`] for a non-2xx status after all attempts.
    /// - [`ScraperError::Http`] for network or timeout failures after all attempts.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        retry_with_backoff(self.max_attempts, self.backoff_ms, || {
            let parsed = parsed.clone();
            async move {
                let response = self
                    .client
                    .get(parsed.clone())
                    .header(reqwest::header::ACCEPT, ACCEPT_HTML)
                    .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_ES)
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: parsed.to_string(),
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
