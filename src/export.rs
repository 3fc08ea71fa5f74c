//! Excel export: one sheet for listings, one for specifications.

use crate::amazon::models::{DetailField, DetailRecord, ListingRecord, Tables};
use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::info;

/// Sheet holding one row per listing card.
pub const GENERAL_SHEET: &str = "General Info";

/// Sheet holding one row per scraped detail page.
pub const DETAILS_SHEET: &str = "Details";

/// Header row of the listing sheet.
pub const LISTING_HEADERS: [&str; 4] = ["Device Name", "Reviews", "Price (EGP)", "Product Link"];

/// Header row of the details sheet: the device name, then every attribute.
pub fn detail_headers() -> Vec<&'static str> {
    std::iter::once("Device").chain(DetailField::all().iter().map(|f| f.header())).collect()
}

/// Writes both tables to a new workbook at `path`, replacing any existing file.
pub fn write_workbook(tables: &Tables, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(GENERAL_SHEET)?;
    write_listings(sheet, &tables.listings)
        .with_context(|| format!("Failed to write sheet '{}'", GENERAL_SHEET))?;

    let sheet = workbook.add_worksheet();
    sheet.set_name(DETAILS_SHEET)?;
    write_details(sheet, &tables.details)
        .with_context(|| format!("Failed to write sheet '{}'", DETAILS_SHEET))?;

    workbook
        .save(path)
        .with_context(|| format!("Failed to save workbook: {}", path.display()))?;

    info!(
        "Saved {} listings and {} details to {}",
        tables.listings.len(),
        tables.details.len(),
        path.display()
    );
    Ok(())
}

fn write_header(sheet: &mut Worksheet, headers: &[&str]) -> Result<(), XlsxError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    Ok(())
}

fn write_listings(sheet: &mut Worksheet, listings: &[ListingRecord]) -> Result<(), XlsxError> {
    write_header(sheet, &LISTING_HEADERS)?;

    for (i, listing) in listings.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, listing.name.as_str())?;
        sheet.write_string(row, 1, listing.review_label.as_str())?;
        // Missing prices stay blank rather than 0
        if let Some(price) = listing.price {
            sheet.write_number(row, 2, price)?;
        }
        sheet.write_string(row, 3, listing.detail_url.as_str())?;
    }
    Ok(())
}

fn write_details(sheet: &mut Worksheet, details: &[DetailRecord]) -> Result<(), XlsxError> {
    write_header(sheet, &detail_headers())?;

    for (i, detail) in details.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, detail.device.as_str())?;
        for (col, field) in DetailField::all().iter().enumerate() {
            sheet.write_string(row, (col + 1) as u16, detail.get(*field))?;
        }
    }
    Ok(())
}
