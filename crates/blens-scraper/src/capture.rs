//! Screenshot capture through an external headless-browser rendering service.
//!
//! The service contract is narrow: `POST {base}/screenshot` with a JSON body
//! `{"url": "..."}` returns raw PNG bytes. Capture is always optional — the
//! audit pipeline treats a missing screenshot as a normal state, so every
//! failure here resolves to `None` after a `warn` log.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::Serialize;

use crate::error::ScrapeError;
use crate::fetch::normalize_url;

#[derive(Serialize)]
struct ScreenshotRequest<'a> {
    url: &'a str,
}

/// HTTP client for the rendering service.
pub struct CaptureClient {
    client: Client,
    endpoint: String,
}

impl CaptureClient {
    /// Creates a `CaptureClient` for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/screenshot", base_url.trim_end_matches('/')),
        })
    }

    /// Captures a rendered screenshot of `raw_url`, base64-encoded.
    pub async fn capture_page(&self, raw_url: &str) -> Option<String> {
        let url = normalize_url(raw_url);
        match self.screenshot(&url).await {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "page screenshot failed");
                None
            }
        }
    }

    /// Captures a screenshot of a search-engine results page for
    /// `company_name`, base64-encoded.
    pub async fn capture_search(&self, company_name: &str) -> Option<String> {
        let query = utf8_percent_encode(company_name.trim(), NON_ALPHANUMERIC).to_string();
        let url = format!("https://www.google.com/search?q={query}");
        match self.screenshot(&url).await {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                tracing::warn!(company = company_name, error = %e, "search screenshot failed");
                None
            }
        }
    }

    async fn screenshot(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ScreenshotRequest { url })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ScrapeError::EmptyBody {
                url: url.to_string(),
            });
        }

        Ok(BASE64.encode(&bytes))
    }
}
