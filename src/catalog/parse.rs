//! HTML parsing for the two BrickLink pages.

use crate::config::CatalogConfig;
use crate::error::ScrapeError;
use scraper::{ElementRef, Html, Selector};

pub struct PageSelectors {
    pub title: Selector,
    pub weight: Selector,
    pub price_boxes: Selector,
}

fn compile(s: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(s).map_err(|e| ScrapeError::Selector {
        selector: s.to_string(),
        reason: e.to_string(),
    })
}

impl PageSelectors {
    pub fn compile(config: &CatalogConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            title: compile(&config.title_selector)?,
            weight: compile(&config.weight_selector)?,
            price_boxes: compile(&config.price_box_selector)?,
        })
    }
}

/// Header fields from the catalog item page. Both are optional: the page
/// renders fine without either element.
#[derive(Debug, Default)]
pub struct ItemHeader {
    pub title: Option<String>,
    pub weight: Option<String>,
}

pub fn parse_item_header(html: &str, selectors: &PageSelectors) -> ItemHeader {
    let doc = Html::parse_document(html);
    ItemHeader {
        title: first_text(&doc, &selectors.title),
        weight: first_text(&doc, &selectors.weight),
    }
}

fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Text of every price-guide cell matched by the structural selector, in
/// document order. Text nodes are trimmed and joined with newlines so the
/// label patterns see one field per line.
pub fn select_price_boxes(html: &str, boxes: &Selector) -> Vec<String> {
    let doc = Html::parse_document(html);
    doc.select(boxes).map(element_text_lines).collect()
}

fn element_text_lines(el: ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
