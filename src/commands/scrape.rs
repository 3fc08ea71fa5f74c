//! Scrape command implementation.

use crate::amazon::{AmazonClient, PageSource};
use crate::config::Config;
use crate::export;
use crate::pipeline::{Pipeline, RunOutput};
use anyhow::{Context, Result};
use tracing::info;

/// Scrapes the configured search pages and saves the workbook.
pub struct ScrapeCommand {
    config: Config,
}

impl ScrapeCommand {
    /// Creates a new scrape command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the scrape and returns a summary line for the console.
    pub async fn execute(&self) -> Result<String> {
        self.config.validate().context("Invalid configuration")?;

        let client =
            AmazonClient::new(&self.config).await.context("Failed to create HTTP client")?;

        self.execute_with_source(&client).await
    }

    /// Runs the scrape with a provided page source (for testing).
    pub async fn execute_with_source(&self, source: &(impl PageSource + ?Sized)) -> Result<String> {
        self.config.validate().context("Invalid configuration")?;

        info!(
            "Scraping '{}' pages {} to {} from {}",
            self.config.query, self.config.first_page, self.config.last_page, self.config.base_url
        );

        let pipeline = Pipeline::new(source, &self.config);
        let output = pipeline.run(self.config.pages()).await;

        export::write_workbook(&output.tables, &self.config.output)?;

        Ok(self.summary(&output))
    }

    fn summary(&self, output: &RunOutput) -> String {
        let mut lines = vec![format!(
            "Data saved successfully in '{}': {} listings, {} details",
            self.config.output.display(),
            output.tables.listings.len(),
            output.tables.details.len()
        )];

        let stats = &output.stats;
        let dropped = stats.pages_failed + stats.pages_skipped;
        if dropped > 0 {
            lines.push(format!(
                "Skipped {} of {} pages ({} failed, {} empty)",
                dropped, stats.pages_requested, stats.pages_failed, stats.pages_skipped
            ));
        }
        if stats.detail_failures > 0 {
            lines.push(format!("{} product pages could not be fetched", stats.detail_failures));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amazon::SearchPages;
    use crate::export::{DETAILS_SHEET, GENERAL_SHEET};
    use async_trait::async_trait;
    use calamine::{open_workbook, Reader, Xlsx};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Mock site serving one search page with a single product.
    struct MockAmazon {
        fail_all: bool,
        calls: AtomicU32,
    }

    impl MockAmazon {
        fn new() -> Self {
            Self { fail_all: false, calls: AtomicU32::new(0) }
        }

        fn failing() -> Self {
            Self { fail_all: true, calls: AtomicU32::new(0) }
        }
    }

    #[async_trait]
    impl PageSource for MockAmazon {
        async fn get(&self, url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_all {
                anyhow::bail!("Simulated network error");
            }
            if url.contains("/dp/") {
                return Ok(r#"<table><tr class="a-spacing-small po-brand">
                    <td class="a-span9">MSI</td></tr></table>"#
                    .to_string());
            }
            if url.contains("page=1&") {
                return Ok(r#"<div class="sg-col-inner"><h2>MSI Thin GF63</h2>
                    <span class="a-price-whole">32,999.</span>
                    <a class="a-link-normal s-line-clamp-4 s-link-style a-text-normal" href="/dp/B0MSI">x</a>
                    </div>"#
                    .to_string());
            }
            Ok("<html></html>".to_string())
        }
    }

    fn make_test_config(output: std::path::PathBuf) -> Config {
        Config {
            base_url: "http://shop.test".to_string(),
            first_page: 1,
            last_page: 2,
            max_attempts: 1,
            retry_delay_ms: 0,
            item_delay_ms: 0,
            output,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_scrape_command_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let cmd = ScrapeCommand::new(make_test_config(path.clone()));

        let summary = cmd.execute_with_source(&MockAmazon::new()).await.unwrap();
        assert!(summary.contains("1 listings, 1 details"));
        assert!(summary.contains("Skipped 1 of 2 pages (0 failed, 1 empty)"));

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(workbook.worksheet_range(GENERAL_SHEET).unwrap().height(), 2);
        assert_eq!(workbook.worksheet_range(DETAILS_SHEET).unwrap().height(), 2);
    }

    #[tokio::test]
    async fn test_scrape_command_network_down_still_exports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let cmd = ScrapeCommand::new(make_test_config(path.clone()));
        let source = MockAmazon::failing();

        let summary = cmd.execute_with_source(&source).await.unwrap();
        assert!(summary.contains("0 listings, 0 details"));
        assert!(summary.contains("2 failed"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_scrape_command_export_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.xlsx");
        let cmd = ScrapeCommand::new(make_test_config(path));

        let result = cmd.execute_with_source(&MockAmazon::new()).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to save workbook"));
    }

    #[tokio::test]
    async fn test_scrape_command_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = make_test_config(dir.path().join("out.xlsx"));
        config.first_page = 5;
        config.last_page = 1;
        let source = MockAmazon::new();

        let result = ScrapeCommand::new(config).execute_with_source(&source).await;
        assert!(result.unwrap_err().to_string().contains("Invalid configuration"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_search_urls_match_mock_routing() {
        let pages = SearchPages::new("http://shop.test", "laptop", "en_AE");
        assert!(pages.url(1).contains("page=1&"));
        assert!(!pages.url(10).contains("page=1&"));
    }
}
