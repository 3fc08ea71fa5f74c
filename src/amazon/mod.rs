//! Amazon-specific modules for HTTP client, parsing, and data models.

pub mod client;
pub mod models;
pub mod parser;
pub mod selectors;

pub use client::{AmazonClient, PageSource, SearchPages};
pub use models::{DetailField, DetailRecord, ListingRecord, Tables};
pub use parser::{BlockedPage, Parser};
