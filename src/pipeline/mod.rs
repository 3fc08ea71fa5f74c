//! Two-stage scrape: search pages first, then one detail page per product.

pub mod fetcher;

use crate::amazon::client::{PageSource, SearchPages};
use crate::amazon::models::{DetailRecord, ListingRecord, Tables};
use crate::amazon::parser::Parser;
use crate::config::{Config, PageAggregation};
use crate::retry::RetryPolicy;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

pub use fetcher::Fetcher;

/// Counters collected over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Search pages attempted
    pub pages_requested: usize,
    /// Search pages whose rows made it into the tables
    pub pages_aggregated: usize,
    /// Search pages that could not be fetched
    pub pages_failed: usize,
    /// Search pages fetched but left out of the tables
    pub pages_skipped: usize,
    /// Detail pages that could not be fetched
    pub detail_failures: usize,
    /// Listing cards dropped because their name was already seen
    pub duplicates: usize,
}

/// Result of a run: the aggregated tables and what happened along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutput {
    pub tables: Tables,
    pub stats: RunStats,
}

/// Drives pagination, detail scraping and aggregation.
pub struct Pipeline<'a, S: PageSource + ?Sized> {
    fetcher: Fetcher<'a, S>,
    parser: Parser,
    search: SearchPages,
    item_delay: Duration,
    aggregation: PageAggregation,
}

impl<'a, S: PageSource + ?Sized> Pipeline<'a, S> {
    /// Creates a pipeline fetching through `source` with settings from `config`.
    pub fn new(source: &'a S, config: &Config) -> Self {
        let search = SearchPages::from_config(config);

        Self {
            fetcher: Fetcher::new(source, RetryPolicy::from_config(config)),
            parser: Parser::new(search.base_url()),
            search,
            item_delay: Duration::from_millis(config.item_delay_ms),
            aggregation: config.aggregation,
        }
    }

    /// Scrapes every page in `pages`, in order.
    ///
    /// A page that cannot be fetched is skipped; the run never aborts. Rows
    /// keep page order, then document order within a page.
    pub async fn run(&self, pages: impl IntoIterator<Item = u32>) -> RunOutput {
        let mut output = RunOutput::default();
        let mut seen = HashSet::new();

        for page in pages {
            output.stats.pages_requested += 1;
            info!("Fetching page {}...", page);

            let Some(page_tables) = self.scrape_page(page, &seen, &mut output.stats).await
            else {
                output.stats.pages_failed += 1;
                warn!("Skipping page {} due to errors.", page);
                continue;
            };

            if self.should_aggregate(&page_tables) {
                info!(
                    "Page {}: {} listings, {} details",
                    page,
                    page_tables.listings.len(),
                    page_tables.details.len()
                );
                // Only rows that made it into the tables count as seen
                seen.extend(page_tables.listings.iter().map(|l| l.name.clone()));
                output.tables.extend(page_tables);
                output.stats.pages_aggregated += 1;
            } else {
                output.stats.pages_skipped += 1;
                warn!("Skipping page {} due to empty data.", page);
            }
        }

        info!(
            "Collected {} listings and {} details from {} of {} pages",
            output.tables.listings.len(),
            output.tables.details.len(),
            output.stats.pages_aggregated,
            output.stats.pages_requested
        );

        output
    }

    /// Fetches a product page and reads its specification table.
    ///
    /// Returns `None` when the page could not be fetched.
    pub async fn extract_detail(&self, name: &str, url: &str) -> Option<DetailRecord> {
        let html = self.fetcher.fetch(url, &format!("details for '{}'", name)).await?;
        Some(self.parser.parse_detail(name, &html))
    }

    /// Scrapes one search page and the detail pages of its new products.
    ///
    /// Returns `None` only when the search page itself could not be fetched.
    async fn scrape_page(
        &self,
        page: u32,
        seen: &HashSet<String>,
        stats: &mut RunStats,
    ) -> Option<Tables> {
        let url = self.search.url(page);
        let html = self.fetcher.fetch(&url, &format!("page {}", page)).await?;

        let records = self.parser.parse_listing(&html);
        let found = records.len();
        let listings = dedupe_by_name(records, seen);
        stats.duplicates += found - listings.len();
        debug!("Page {}: {} cards, {} new", page, found, listings.len());

        let mut details = Vec::with_capacity(listings.len());
        for listing in &listings {
            match self.extract_detail(&listing.name, &listing.detail_url).await {
                Some(detail) => {
                    details.push(detail);
                    self.pace().await;
                }
                None => stats.detail_failures += 1,
            }
        }

        Some(Tables { listings, details })
    }

    /// Decides whether a fetched page contributes its rows.
    fn should_aggregate(&self, tables: &Tables) -> bool {
        match self.aggregation {
            PageAggregation::RequireBoth => {
                !tables.listings.is_empty() && !tables.details.is_empty()
            }
            PageAggregation::KeepListings => !tables.listings.is_empty(),
        }
    }

    /// Sleeps between product page requests.
    async fn pace(&self) {
        if !self.item_delay.is_zero() {
            tokio::time::sleep(self.item_delay).await;
        }
    }
}

/// Keeps the first record for each name, in order.
///
/// Names in `seen` are already in the tables from an earlier page and are
/// dropped as well. `seen` itself is left untouched.
pub fn dedupe_by_name(records: Vec<ListingRecord>, seen: &HashSet<String>) -> Vec<ListingRecord> {
    let mut page_names = HashSet::new();
    records
        .into_iter()
        .filter(|record| !seen.contains(&record.name) && page_names.insert(record.name.clone()))
        .collect()
}
