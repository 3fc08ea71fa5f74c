//! amz-laptops - Scrapes amazon.eg laptop listings into an Excel workbook
//!
//! Search result pages are scraped first, then every product's detail page.
//! The two tables are saved as the "General Info" and "Details" sheets.

pub mod amazon;
pub mod commands;
pub mod config;
pub mod export;
pub mod pipeline;
pub mod retry;

pub use amazon::models::{DetailRecord, ListingRecord, Tables};
pub use config::Config;
pub use pipeline::{Pipeline, RunOutput, RunStats};
