//! CSS selectors and attribute-key tables for Amazon HTML parsing.
//!
//! Everything that depends on Amazon's markup lives here.
//! Update this file when Amazon changes their HTML structure.
//!
//! **Update process**: When parsing fails, capture HTML sample,
//! update selectors, and add test fixture.

use crate::amazon::models::{DetailField, UNKNOWN};
use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for search results pages.
pub mod listing {
    use super::*;

    /// Product card container. Nested containers match too; duplicates are
    /// removed by name afterwards.
    pub static CONTAINER: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.sg-col-inner").unwrap());

    /// Product name heading.
    pub static NAME: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").unwrap());

    /// Review count label under the rating stars.
    pub static REVIEWS: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.a-size-base.s-underline-text").unwrap());

    /// Title link pointing at the detail page.
    pub static DETAIL_LINK: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("a.a-link-normal.s-line-clamp-4.s-link-style.a-text-normal").unwrap()
    });

    /// Whole part of the displayed price.
    pub static PRICE_WHOLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.a-price-whole").unwrap());
}

/// Selectors for product detail pages.
pub mod detail {
    use super::*;

    /// Maps one row of the product overview table to an output column.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldMapping {
        /// Row class identifying the attribute, e.g. `po-brand`
        pub key: &'static str,
        /// Column the value is stored in
        pub field: DetailField,
        /// Value kept when the row or its value cell is missing
        pub default: &'static str,
    }

    impl FieldMapping {
        const fn new(key: &'static str, field: DetailField) -> Self {
            Self { key, field, default: UNKNOWN }
        }
    }

    /// Product overview rows, in output column order.
    pub const DETAIL_FIELDS: &[FieldMapping] = &[
        FieldMapping::new("po-brand", DetailField::Brand),
        FieldMapping::new("po-model_name", DetailField::Model),
        FieldMapping::new("po-display.size", DetailField::Screen),
        FieldMapping::new("po-color", DetailField::Color),
        FieldMapping::new("po-hard_disk.size", DetailField::Storage),
        FieldMapping::new("po-cpu_model.family", DetailField::Cpu),
        FieldMapping::new("po-ram_memory.installed_size", DetailField::Ram),
        FieldMapping::new("po-operating_system", DetailField::Os),
        FieldMapping::new("po-special_feature", DetailField::SpecialFeatures),
        FieldMapping::new("po-graphics_description", DetailField::Graphics),
    ];

    /// Builds the row selector for an attribute key.
    ///
    /// Keys such as `po-display.size` contain dots, so the class is matched
    /// as an attribute word instead of a `.class` selector.
    pub fn row_selector(key: &str) -> Result<Selector, String> {
        Selector::parse(&format!("tr.a-spacing-small[class~='{}']", key))
            .map_err(|e| format!("Invalid row selector for '{}': {:?}", key, e))
    }

    /// Row selectors for every entry of [`DETAIL_FIELDS`], compiled once.
    pub static ROWS: LazyLock<Vec<(FieldMapping, Selector)>> = LazyLock::new(|| {
        DETAIL_FIELDS.iter().map(|m| (*m, row_selector(m.key).unwrap())).collect()
    });

    /// Value cell inside an overview row.
    pub static VALUE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("td.a-span9").unwrap());
}

/// Selectors for detecting error/captcha pages.
pub mod errors {
    use super::*;

    /// CAPTCHA form.
    pub static CAPTCHA: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "form[action*='validateCaptcha'], \
             img[src*='captcha']",
        )
        .unwrap()
    });

    /// Dog page (Amazon's error page).
    pub static DOG_PAGE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "img[alt*='dog'], \
             .a-box-inner a[href='/ref=cs_503_link']",
        )
        .unwrap()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_selectors_compile() {
        // Force evaluation of all lazy selectors to ensure they compile
        let _ = &*listing::CONTAINER;
        let _ = &*listing::NAME;
        let _ = &*listing::REVIEWS;
        let _ = &*listing::DETAIL_LINK;
        let _ = &*listing::PRICE_WHOLE;
        let _ = &*detail::VALUE;
        let _ = &*errors::CAPTCHA;
        let _ = &*errors::DOG_PAGE;
        assert_eq!(detail::ROWS.len(), detail::DETAIL_FIELDS.len());
    }

    #[test]
    fn test_detail_fields_cover_every_column_once() {
        let fields: Vec<_> = detail::DETAIL_FIELDS.iter().map(|m| m.field).collect();
        assert_eq!(fields, DetailField::all());
        assert!(detail::DETAIL_FIELDS.iter().all(|m| m.default == UNKNOWN));
    }

    #[test]
    fn test_row_selector_with_dotted_key() {
        let html = Html::parse_document(
            r#"<table>
                <tr class="a-spacing-small po-display.size"><td class="a-span9">15.6 Inches</td></tr>
                <tr class="a-spacing-small po-display"><td class="a-span9">wrong row</td></tr>
            </table>"#,
        );

        let selector = detail::row_selector("po-display.size").unwrap();
        let rows: Vec<_> = html.select(&selector).collect();
        assert_eq!(rows.len(), 1);

        let value = rows[0].select(&detail::VALUE).next().unwrap();
        assert_eq!(value.text().collect::<String>(), "15.6 Inches");
    }

    #[test]
    fn test_row_selector_requires_spacing_class() {
        let html = Html::parse_document(
            r#"<table><tr class="po-brand"><td class="a-span9">Lenovo</td></tr></table>"#,
        );
        let selector = detail::row_selector("po-brand").unwrap();
        assert!(html.select(&selector).next().is_none());
    }

    #[test]
    fn test_listing_link_needs_all_classes() {
        let html = Html::parse_document(
            r#"<div class="sg-col-inner">
                <a class="a-link-normal s-link-style" href="/dp/PARTIAL">partial</a>
                <a class="a-link-normal s-line-clamp-4 s-link-style a-text-normal" href="/dp/FULL">full</a>
            </div>"#,
        );

        let links: Vec<_> = html
            .select(&listing::DETAIL_LINK)
            .filter_map(|e| e.value().attr("href"))
            .collect();
        assert_eq!(links, vec!["/dp/FULL"]);
    }
}
