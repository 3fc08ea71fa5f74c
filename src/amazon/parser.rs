//! HTML parser for Amazon listing pages and product detail pages.

use crate::amazon::models::{DetailRecord, ListingRecord, NOT_AVAILABLE, UNKNOWN};
use crate::amazon::selectors::{detail, errors, listing};
use scraper::{ElementRef, Html};
use thiserror::Error;
use tracing::{debug, trace};

/// A 2xx response that is a bot check instead of the requested page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlockedPage {
    #[error("CAPTCHA detected. Amazon is blocking requests. Try using a proxy or waiting before retrying.")]
    Captcha,
    #[error("Amazon error page detected (503). The service may be temporarily unavailable.")]
    ServiceUnavailable,
}

/// Parser for Amazon HTML pages.
pub struct Parser {
    base_url: String,
}

impl Parser {
    /// Creates a parser that resolves relative links against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into().trim_end_matches('/').to_string() }
    }

    /// Parses a search results page into listing records.
    ///
    /// Cards without a name or a detail link are dropped. The result keeps
    /// document order and may contain repeated names.
    pub fn parse_listing(&self, html: &str) -> Vec<ListingRecord> {
        let document = Html::parse_document(html);

        let records: Vec<ListingRecord> = document
            .select(&listing::CONTAINER)
            .map(|card| self.parse_card(card))
            .filter(|record| {
                let keep = record.is_complete();
                if !keep {
                    trace!("Skipping incomplete card: {}", record.name);
                }
                keep
            })
            .collect();

        debug!("Parsed {} listing records", records.len());
        records
    }

    /// Parses the product overview table of a detail page.
    ///
    /// Every attribute starts at its mapping default and is replaced only when
    /// both the row and its value cell exist.
    pub fn parse_detail(&self, device: &str, html: &str) -> DetailRecord {
        let document = Html::parse_document(html);
        let mut record = DetailRecord::unknown(device);

        for (mapping, row_selector) in detail::ROWS.iter() {
            record.set(mapping.field, mapping.default);

            let value = document
                .select(row_selector)
                .next()
                .and_then(|row| row.select(&detail::VALUE).next())
                .map(element_text);

            match value {
                Some(value) => record.set(mapping.field, value),
                None => trace!("No '{}' row for {}", mapping.key, device),
            }
        }

        record
    }

    /// Parses a single product card.
    fn parse_card(&self, card: ElementRef) -> ListingRecord {
        let name = card
            .select(&listing::NAME)
            .next()
            .map(element_text)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let review_label = card
            .select(&listing::REVIEWS)
            .next()
            .map(element_text)
            .unwrap_or_else(|| UNKNOWN.to_string());

        let detail_url = card
            .select(&listing::DETAIL_LINK)
            .next()
            .and_then(|e| e.value().attr("href"))
            .map(|href| self.absolute_url(href))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let price = card
            .select(&listing::PRICE_WHOLE)
            .next()
            .and_then(|e| parse_price(&element_text(e)));

        ListingRecord { name, review_label, price, detail_url }
    }

    /// Resolves an href from the page against the site base URL.
    fn absolute_url(&self, href: &str) -> String {
        if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{}", self.base_url, href)
        }
    }
}

/// Checks for CAPTCHA or error pages served with a success status.
pub fn check_for_errors(html: &str) -> Result<(), BlockedPage> {
    let document = Html::parse_document(html);

    if document.select(&errors::CAPTCHA).next().is_some() {
        return Err(BlockedPage::Captcha);
    }

    if document.select(&errors::DOG_PAGE).next().is_some() {
        return Err(BlockedPage::ServiceUnavailable);
    }

    Ok(())
}

/// Parses a price label by dropping everything except digits and '.'.
///
/// "1,234.56 EGP" becomes 1234.56. Labels with no usable number yield `None`.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse().ok()
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
