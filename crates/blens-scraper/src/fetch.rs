//! Best-effort page fetching with a single `www.` fallback.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScrapeError;

/// Normalizes caller-supplied URL input.
///
/// Trims surrounding whitespace and prepends `https://` when no
/// `http://`/`https://` scheme is present. No further validation — a
/// malformed URL fails naturally inside the fetcher.
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Returns the same URL with `www.` inserted after the scheme, or `None`
/// when the host already starts with `www.` (no distinct fallback exists).
fn with_www_host(url: &str) -> Option<String> {
    let scheme_end = url.find("://")? + 3;
    let rest = &url[scheme_end..];
    if rest.starts_with("www.") {
        return None;
    }
    Some(format!("{}www.{rest}", &url[..scheme_end]))
}

/// HTTP client for retrieving raw page HTML.
///
/// `fetch_page` never fails from its caller's point of view: any
/// transport-level error triggers exactly one retry against the `www.`
/// variant of the URL, and a second failure resolves to `None`. Non-2xx
/// statuses are not failures — the body is still page content worth
/// extracting (error pages carry brand copy too).
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Creates a `PageFetcher` with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches the HTML body for `raw_url`, normalizing it first.
    ///
    /// On a transport error the fetch is retried once with `www.` inserted
    /// after the scheme; a second failure yields `None`. Both failures are
    /// logged at `warn`.
    pub async fn fetch_page(&self, raw_url: &str) -> Option<String> {
        let url = normalize_url(raw_url);

        match self.get_text(&url).await {
            Ok(body) => Some(body),
            Err(primary_err) => {
                tracing::warn!(url = %url, error = %primary_err, "page fetch failed");

                let fallback = with_www_host(&url)?;
                match self.get_text(&fallback).await {
                    Ok(body) => Some(body),
                    Err(fallback_err) => {
                        tracing::warn!(
                            url = %fallback,
                            error = %fallback_err,
                            "www-fallback fetch failed, giving up"
                        );
                        None
                    }
                }
            }
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client.get(url).send().await?.text().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_url_prepends_https() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
    }

    #[test]
    fn normalize_url_trims_whitespace() {
        assert_eq!(normalize_url("  example.com  "), "https://example.com");
    }

    #[test]
    fn normalize_url_keeps_https_scheme() {
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn normalize_url_keeps_http_scheme() {
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
    }

    #[test]
    fn with_www_host_inserts_after_scheme() {
        assert_eq!(
            with_www_host("https://example.com/about").as_deref(),
            Some("https://www.example.com/about")
        );
    }

    #[test]
    fn with_www_host_skips_existing_www() {
        assert!(with_www_host("https://www.example.com").is_none());
    }

    #[test]
    fn with_www_host_requires_scheme() {
        assert!(with_www_host("example.com").is_none());
    }
}
