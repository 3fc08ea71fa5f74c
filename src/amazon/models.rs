//! Data models for listing rows, specification rows and the run accumulator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder for fields the page did not provide.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for a missing name or link on a listing card.
pub const NOT_AVAILABLE: &str = "N/A";

/// One product card from a search results page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Product name (de-duplication key within a run)
    pub name: String,
    /// Review count label as shown on the card, e.g. "1,204"
    pub review_label: String,
    /// Whole price, `None` when the card shows no price
    pub price: Option<f64>,
    /// Absolute URL of the product detail page
    pub detail_url: String,
}

impl ListingRecord {
    /// A card only counts when both the name and the detail link were found.
    pub fn is_complete(&self) -> bool {
        self.name != NOT_AVAILABLE && self.detail_url != NOT_AVAILABLE
    }
}

/// Columns of the specification table, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailField {
    Brand,
    Model,
    Screen,
    Color,
    Storage,
    Cpu,
    Ram,
    Os,
    SpecialFeatures,
    Graphics,
}

impl DetailField {
    /// Returns all fields in column order.
    pub fn all() -> &'static [DetailField] {
        &[
            DetailField::Brand,
            DetailField::Model,
            DetailField::Screen,
            DetailField::Color,
            DetailField::Storage,
            DetailField::Cpu,
            DetailField::Ram,
            DetailField::Os,
            DetailField::SpecialFeatures,
            DetailField::Graphics,
        ]
    }

    /// Column header used in the exported sheet.
    pub fn header(&self) -> &'static str {
        match self {
            DetailField::Brand => "Brand",
            DetailField::Model => "Model",
            DetailField::Screen => "Screen",
            DetailField::Color => "Color",
            DetailField::Storage => "HDD",
            DetailField::Cpu => "CPU",
            DetailField::Ram => "RAM",
            DetailField::Os => "OS",
            DetailField::SpecialFeatures => "Special Features",
            DetailField::Graphics => "Graphics",
        }
    }
}

impl fmt::Display for DetailField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Specification attributes scraped from a product detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    /// Listing name this row belongs to
    pub device: String,
    pub brand: String,
    pub model: String,
    pub screen: String,
    pub color: String,
    pub storage: String,
    pub cpu: String,
    pub ram: String,
    pub os: String,
    pub special_features: String,
    pub graphics: String,
}

impl DetailRecord {
    /// Creates a record with every attribute set to "Unknown".
    pub fn unknown(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            brand: UNKNOWN.to_string(),
            model: UNKNOWN.to_string(),
            screen: UNKNOWN.to_string(),
            color: UNKNOWN.to_string(),
            storage: UNKNOWN.to_string(),
            cpu: UNKNOWN.to_string(),
            ram: UNKNOWN.to_string(),
            os: UNKNOWN.to_string(),
            special_features: UNKNOWN.to_string(),
            graphics: UNKNOWN.to_string(),
        }
    }

    /// Returns the value stored for a field.
    pub fn get(&self, field: DetailField) -> &str {
        match field {
            DetailField::Brand => &self.brand,
            DetailField::Model => &self.model,
            DetailField::Screen => &self.screen,
            DetailField::Color => &self.color,
            DetailField::Storage => &self.storage,
            DetailField::Cpu => &self.cpu,
            DetailField::Ram => &self.ram,
            DetailField::Os => &self.os,
            DetailField::SpecialFeatures => &self.special_features,
            DetailField::Graphics => &self.graphics,
        }
    }

    /// Overwrites the value stored for a field.
    pub fn set(&mut self, field: DetailField, value: impl Into<String>) {
        let slot = match field {
            DetailField::Brand => &mut self.brand,
            DetailField::Model => &mut self.model,
            DetailField::Screen => &mut self.screen,
            DetailField::Color => &mut self.color,
            DetailField::Storage => &mut self.storage,
            DetailField::Cpu => &mut self.cpu,
            DetailField::Ram => &mut self.ram,
            DetailField::Os => &mut self.os,
            DetailField::SpecialFeatures => &mut self.special_features,
            DetailField::Graphics => &mut self.graphics,
        };
        *slot = value.into();
    }
}

/// Listing and detail rows collected over a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    pub listings: Vec<ListingRecord>,
    pub details: Vec<DetailRecord>,
}

impl Tables {
    /// Creates empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends another set of rows, keeping their order.
    pub fn extend(&mut self, other: Tables) {
        self.listings.extend(other.listings);
        self.details.extend(other.details);
    }

    /// Returns true if neither table has rows.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty() && self.details.is_empty()
    }
}
