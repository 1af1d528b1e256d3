//! Local Shopee listing extractor.
//!
//! Works on search-result pages saved to disk (`shop-listing-*.txt`), not on
//! live traffic. Each of the three fields is resolved with a primary styled
//! selector and a regex fallback over the container's full text.

use crate::config::ListingsConfig;
use crate::error::ScrapeError;
use crate::models::ProductRecord;
use anyhow::Result;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// List saved listing pages under `dir` matching a `prefix*suffix` pattern,
/// sorted by filename. A missing directory is treated as empty.
pub fn discover_listing_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let (prefix, suffix) = pattern.split_once('*').unwrap_or((pattern, ""));

    if !dir.exists() {
        return Ok(vec![]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if path.is_file() && name.starts_with(prefix) && name.ends_with(suffix) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Product extractor with all selectors and patterns compiled up front.
pub struct ListingExtractor {
    item_sel: Selector,
    name_fallback_sel: Selector,
    span_sel: Selector,
    div_sel: Selector,
    name_text: Regex,
    price_class: Regex,
    price_text: Regex,
    sold_class: Regex,
    sold_text: Regex,
}

fn compile_selector(s: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(s).map_err(|e| ScrapeError::Selector {
        selector: s.to_string(),
        reason: e.to_string(),
    })
}

fn compile_pattern(s: &str) -> Result<Regex, ScrapeError> {
    Regex::new(s).map_err(|source| ScrapeError::Pattern {
        pattern: s.to_string(),
        source,
    })
}

impl ListingExtractor {
    pub fn new(config: &ListingsConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            item_sel: compile_selector(&config.item_selector)?,
            name_fallback_sel: compile_selector(&config.name_fallback_selector)?,
            span_sel: compile_selector("span")?,
            div_sel: compile_selector("div")?,
            name_text: compile_pattern(&config.name_text_pattern)?,
            price_class: compile_pattern(&config.price_class_pattern)?,
            price_text: compile_pattern(&config.price_text_pattern)?,
            sold_class: compile_pattern(&config.sold_class_pattern)?,
            sold_text: compile_pattern(&config.sold_text_pattern)?,
        })
    }

    /// Extract every product from one saved page, in document order.
    ///
    /// A container without a resolvable name is logged and skipped; it never
    /// aborts the rest of the page.
    pub fn extract_products(&self, html: &str) -> Vec<ProductRecord> {
        let doc = Html::parse_document(html);
        let items: Vec<ElementRef> = doc.select(&self.item_sel).collect();
        info!("Found {} product items", items.len());

        let mut records = Vec::new();
        for (idx, item) in items.iter().enumerate() {
            match self.extract_product(*item) {
                Ok(record) => {
                    info!(
                        "Product {}: {} | RM{} | {} sold",
                        idx + 1,
                        record.name,
                        record.price,
                        record.units_sold
                    );
                    records.push(record);
                }
                Err(e) => warn!("Skipping item {}: {}", idx + 1, e),
            }
        }
        records
    }

    fn extract_product(&self, item: ElementRef) -> Result<ProductRecord, ScrapeError> {
        let name = self
            .product_name(item)
            .ok_or_else(|| ScrapeError::MalformedItem {
                reason: "no product name found".to_string(),
            })?;

        Ok(ProductRecord {
            name,
            price: self.product_price(item).unwrap_or_else(|| "N/A".to_string()),
            units_sold: self.units_sold(item).unwrap_or_else(|| "N/A".to_string()),
        })
    }

    /// Name: first text node with a brand token and a 5-digit set number,
    /// falling back to the clamped title element.
    fn product_name(&self, item: ElementRef) -> Option<String> {
        for text in item.text() {
            if self.name_text.is_match(text) {
                return Some(text.trim().to_string());
            }
        }

        item.select(&self.name_fallback_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|name| !name.is_empty())
    }

    /// Price: styled price span, falling back to an `RM 1,234.00` scan over
    /// the whole container. Grouping commas are stripped either way.
    fn product_price(&self, item: ElementRef) -> Option<String> {
        let styled = item
            .select(&self.span_sel)
            .find(|el| self.class_matches(el, &self.price_class))
            .map(|el| {
                let text = el.text().collect::<String>();
                text.trim().replace(',', "")
            })
            .filter(|price| !price.is_empty());
        if styled.is_some() {
            return styled;
        }

        let full_text = item.text().collect::<String>();
        self.price_text
            .captures(&full_text)
            .map(|caps| caps[1].replace(',', ""))
    }

    /// Units sold: styled "sold" label, falling back to the same token scan
    /// over the whole container.
    fn units_sold(&self, item: ElementRef) -> Option<String> {
        let styled = item
            .select(&self.div_sel)
            .find(|el| self.class_matches(el, &self.sold_class))
            .and_then(|el| {
                let text = el.text().collect::<String>();
                self.sold_token(&text)
            });
        if styled.is_some() {
            return styled;
        }

        let full_text = item.text().collect::<String>();
        self.sold_token(&full_text)
    }

    fn sold_token(&self, text: &str) -> Option<String> {
        self.sold_text
            .captures(text)
            .map(|caps| caps[1].trim().replace(',', ""))
    }

    fn class_matches(&self, el: &ElementRef, pattern: &Regex) -> bool {
        el.value()
            .attr("class")
            .is_some_and(|class| pattern.is_match(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListingsConfig;

    fn extractor() -> ListingExtractor {
        ListingExtractor::new(&ListingsConfig::default()).unwrap()
    }

    fn page(items: &[&str]) -> String {
        let body: String = items
            .iter()
            .map(|inner| format!(r#"<div class="shop-search-result-view__item">{inner}</div>"#))
            .collect();
        format!("<html><body><div class=\"shop-search-result-view\">{body}</div></body></html>")
    }

    const FULL_ITEM: &str = r#"
        <a href="/product/1">
          <div class="line-clamp-2">LEGO Star Wars 75192 Millennium Falcon UCS</div>
          <span class="text-base/5 truncate font-medium">1,299.00</span>
          <div class="text-shopee-black87 truncate text-xs">2.3k sold</div>
        </a>"#;

    #[test]
    fn extracts_full_record_from_styled_markup() {
        let records = extractor().extract_products(&page(&[FULL_ITEM]));
        assert_eq!(records.len(), 1);
        assert!(records[0].name.contains("75192"));
        assert_eq!(records[0].price, "1299.00");
        assert_eq!(records[0].units_sold, "2.3k");
    }

    #[test]
    fn falls_back_to_text_scans_when_styled_elements_missing() {
        let item = r#"
            <div class="line-clamp-2">LEGO Technic 42115 Lamborghini</div>
            <div>RM 1,849.90</div>
            <div>5,021 sold</div>"#;
        let records = extractor().extract_products(&page(&[item]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].price, "1849.90");
        assert_eq!(records[0].units_sold, "5021");
    }

    #[test]
    fn name_falls_back_to_clamped_title_without_set_number() {
        let item = r#"
            <div class="line-clamp-2">LEGO Classic brick box</div>
            <span class="text-base/5 font-medium">89.00</span>"#;
        let records = extractor().extract_products(&page(&[item]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "LEGO Classic brick box");
    }

    #[test]
    fn missing_price_and_sold_default_to_sentinel() {
        let item = r#"<div class="line-clamp-2">LEGO City 60367 Passenger Airplane</div>"#;
        let records = extractor().extract_products(&page(&[item]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].price, "N/A");
        assert_eq!(records[0].units_sold, "N/A");
    }

    #[test]
    fn container_without_name_is_skipped() {
        let nameless = r#"<span class="text-base/5 font-medium">49.90</span>"#;
        let records = extractor().extract_products(&page(&[nameless, FULL_ITEM]));
        assert_eq!(records.len(), 1);
        assert!(records[0].name.contains("75192"));
    }

    #[test]
    fn zero_containers_yield_no_records() {
        let html = "<html><body><div>nothing to see</div></body></html>";
        assert!(extractor().extract_products(html).is_empty());
    }

    #[test]
    fn records_preserve_document_order() {
        let second = r#"<div class="line-clamp-2">LEGO Icons 10311 Orchid</div>"#;
        let records = extractor().extract_products(&page(&[FULL_ITEM, second]));
        assert_eq!(records.len(), 2);
        assert!(records[0].name.contains("75192"));
        assert!(records[1].name.contains("10311"));
    }

    #[test]
    fn discovers_files_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["shop-listing-2.txt", "shop-listing-1.txt", "notes.md"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }

        let files = discover_listing_files(dir.path(), "shop-listing-*.txt").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["shop-listing-1.txt", "shop-listing-2.txt"]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let files = discover_listing_files(Path::new("does/not/exist"), "shop-listing-*.txt");
        assert!(files.unwrap().is_empty());
    }
}
