//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Browser identification sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

/// Application configuration with layered loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Site root, also used to resolve relative product links
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Search keywords
    #[serde(default = "default_query")]
    pub query: String,

    /// `language` parameter of the search URL
    #[serde(default = "default_language")]
    pub language: String,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// First search page to scrape
    #[serde(default = "default_first_page")]
    pub first_page: u32,

    /// Last search page to scrape (inclusive)
    #[serde(default = "default_last_page")]
    pub last_page: u32,

    /// Attempts per URL, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between failed attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Pause after each fetched product page in milliseconds
    #[serde(default = "default_item_delay_ms")]
    pub item_delay_ms: u64,

    /// Workbook path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// What to do with a page whose detail fetches all failed
    #[serde(default)]
    pub aggregation: PageAggregation,
}

fn default_base_url() -> String {
    "https://www.amazon.eg".to_string()
}

fn default_query() -> String {
    "laptop".to_string()
}

fn default_language() -> String {
    "en_AE".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_first_page() -> u32 {
    1
}

fn default_last_page() -> u32 {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    5000
}

fn default_item_delay_ms() -> u64 {
    1000
}

fn default_output() -> PathBuf {
    PathBuf::from("amazon_laptops.xlsx")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            query: default_query(),
            language: default_language(),
            user_agent: default_user_agent(),
            proxy: None,
            first_page: default_first_page(),
            last_page: default_last_page(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            item_delay_ms: default_item_delay_ms(),
            output: default_output(),
            aggregation: PageAggregation::default(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("amz-laptops").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(proxy) = std::env::var("AMZ_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(output) = std::env::var("AMZ_OUTPUT") {
            if !output.is_empty() {
                self.output = PathBuf::from(output);
            }
        }

        if let Ok(delay) = std::env::var("AMZ_ITEM_DELAY") {
            if let Ok(d) = delay.parse() {
                self.item_delay_ms = d;
            }
        }

        self
    }

    /// Rejects settings the scraper cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            anyhow::bail!("base_url must not be empty");
        }
        if self.first_page == 0 {
            anyhow::bail!("first_page must be at least 1");
        }
        if self.first_page > self.last_page {
            anyhow::bail!(
                "first_page ({}) must not be greater than last_page ({})",
                self.first_page,
                self.last_page
            );
        }
        if self.max_attempts == 0 {
            anyhow::bail!("max_attempts must be at least 1");
        }
        Ok(())
    }

    /// Search pages to scrape, in order.
    pub fn pages(&self) -> std::ops::RangeInclusive<u32> {
        self.first_page..=self.last_page
    }
}

/// Whether a page's listing rows survive when it produced no detail rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageAggregation {
    /// Keep a page only if both its listing and detail tables have rows
    #[default]
    RequireBoth,
    /// Keep listing rows even when every detail fetch failed
    KeepListings,
}

impl std::str::FromStr for PageAggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "require-both" | "both" => Ok(PageAggregation::RequireBoth),
            "keep-listings" | "listings" => Ok(PageAggregation::KeepListings),
            _ => Err(format!("Unknown aggregation: {}. Use: require-both, keep-listings", s)),
        }
    }
}

impl std::fmt::Display for PageAggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageAggregation::RequireBoth => write!(f, "require-both"),
            PageAggregation::KeepListings => write!(f, "keep-listings"),
        }
    }
}
