//! Integration tests for the HTML parser using fixture files.

use amz_laptops::amazon::models::{DetailField, UNKNOWN};
use amz_laptops::amazon::parser::{check_for_errors, Parser};
use amz_laptops::pipeline::dedupe_by_name;
use std::collections::HashSet;

const LISTING_FIXTURE: &str = include_str!("fixtures/listing_page.html");
const DETAIL_FIXTURE: &str = include_str!("fixtures/detail_page.html");

const BASE: &str = "https://www.amazon.eg";

#[test]
fn test_parse_listing_page() {
    let parser = Parser::new(BASE);
    let records = parser.parse_listing(LISTING_FIXTURE);

    // Header, banner and the card without a link are dropped; the sponsored
    // repeat of the first product is kept until de-duplication
    assert_eq!(records.len(), 3);

    let lenovo = &records[0];
    assert!(lenovo.name.starts_with("Lenovo IdeaPad Slim 3 15IRH8"));
    assert_eq!(lenovo.review_label, "1,204");
    assert_eq!(lenovo.price, Some(21499.0));
    assert_eq!(
        lenovo.detail_url,
        "https://www.amazon.eg/-/en/Lenovo-IdeaPad-Slim-3-15IRH8/dp/B0CX1LENOV/ref=sr_1_1"
    );

    let hp = &records[1];
    assert!(hp.name.starts_with("HP Victus 15"));
    assert_eq!(hp.review_label, UNKNOWN);
    assert_eq!(hp.price, None);

    assert_eq!(records[2].name, lenovo.name);
    assert_eq!(records[2].price, Some(20999.0));
}

#[test]
fn test_listing_page_dedupes_to_first_occurrence() {
    let parser = Parser::new(BASE);
    let unique = dedupe_by_name(parser.parse_listing(LISTING_FIXTURE), &HashSet::new());

    assert_eq!(unique.len(), 2);
    assert_eq!(unique[0].price, Some(21499.0));
    assert!(unique[1].name.starts_with("HP Victus"));
}

#[test]
fn test_parse_detail_page() {
    let parser = Parser::new(BASE);
    let record = parser.parse_detail("Lenovo IdeaPad Slim 3", DETAIL_FIXTURE);

    assert_eq!(record.device, "Lenovo IdeaPad Slim 3");
    assert_eq!(record.get(DetailField::Brand), "Lenovo");
    assert_eq!(record.get(DetailField::Model), "IdeaPad Slim 3");
    assert_eq!(record.get(DetailField::Screen), "15.6 Inches");
    assert_eq!(record.get(DetailField::Color), "Arctic Grey");
    assert_eq!(record.get(DetailField::Storage), "512 GB");
    assert_eq!(record.get(DetailField::Cpu), "Core i5");
    assert_eq!(record.get(DetailField::Ram), "8 GB");
    assert_eq!(record.get(DetailField::Os), "Windows 11 Home");
    // Row missing entirely
    assert_eq!(record.get(DetailField::SpecialFeatures), UNKNOWN);
    // Row present but without a value cell
    assert_eq!(record.get(DetailField::Graphics), UNKNOWN);
}

#[test]
fn test_detail_page_against_listing_markup() {
    let parser = Parser::new(BASE);
    let record = parser.parse_detail("Not a product page", LISTING_FIXTURE);

    for field in DetailField::all() {
        assert_eq!(record.get(*field), UNKNOWN, "{} should be unknown", field);
    }
}

#[test]
fn test_fixtures_are_not_blocked_pages() {
    assert!(check_for_errors(LISTING_FIXTURE).is_ok());
    assert!(check_for_errors(DETAIL_FIXTURE).is_ok());
}
