//! HTTP client for Amazon requests using wreq for TLS fingerprint emulation.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;
use wreq_util::Emulation;

/// A single GET attempt - enables mocking for tests.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches `url` once and returns the response body.
    ///
    /// Transport errors and non-2xx statuses are errors.
    async fn get(&self, url: &str) -> Result<String>;
}

/// Amazon HTTP client with browser impersonation.
pub struct AmazonClient {
    client: Client,
    user_agent: String,
}

impl AmazonClient {
    /// Creates a new Amazon client with the given configuration.
    pub async fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        // Configure proxy if specified
        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self { client, user_agent: config.user_agent.clone() })
    }
}

#[async_trait]
impl PageSource for AmazonClient {
    async fn get(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Accept-Encoding", "gzip, deflate, br")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 503 {
            warn!("Rate limited (503). Consider using a proxy or increasing the delay.");
            anyhow::bail!("Rate limited by Amazon (503)");
        }

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }
}

/// Builds search result URLs for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPages {
    base_url: String,
    query: String,
    language: String,
}

impl SearchPages {
    /// Creates the URL builder for a site root, query and language.
    pub fn new(
        base_url: impl Into<String>,
        query: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            query: query.into(),
            language: language.into(),
        }
    }

    /// Creates the URL builder from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_url, &config.query, &config.language)
    }

    /// Returns the site root without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the URL of a search results page.
    pub fn url(&self, page: u32) -> String {
        format!(
            "{}/-/en/s?k={}&page={}&language={}",
            self.base_url,
            urlencoding::encode(&self.query),
            page,
            urlencoding::encode(&self.language)
        )
    }
}
