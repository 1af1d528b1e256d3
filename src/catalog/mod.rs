pub mod clean;
pub mod http_client;
pub mod parse;

use crate::config::CatalogConfig;
use crate::error::ScrapeError;
use crate::models::{CatalogLocator, ItemKind, ItemPriceSummary, PriceBucket};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use url::Url;

use self::clean::BucketPatterns;
use self::http_client::HttpClient;
use self::parse::PageSelectors;

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable price-data source abstraction.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_item_prices(&self, url: &str) -> Result<ItemPriceSummary, ScrapeError>;
}

// ── Locator ───────────────────────────────────────────────────────────────────

/// Derive the catalog locator from an item URL's query string.
///
/// Recognized parameters are scanned in [`ItemKind::PRIORITY`] order, not in
/// the order they appear in the URL.
pub fn locate_item(url: &str) -> Result<CatalogLocator, ScrapeError> {
    let parsed = Url::parse(url).map_err(|source| ScrapeError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let params: HashMap<String, String> = parsed.query_pairs().into_owned().collect();

    for kind in ItemKind::PRIORITY {
        if let Some(id) = params.get(kind.code()) {
            if !id.is_empty() {
                return Ok(CatalogLocator {
                    kind,
                    id: id.clone(),
                });
            }
        }
    }

    Err(ScrapeError::LocatorNotFound {
        url: url.to_string(),
    })
}

// ── BrickLink scraper ─────────────────────────────────────────────────────────

pub struct BricklinkScraper {
    client: HttpClient,
    base_url: String,
    selectors: PageSelectors,
    patterns: BucketPatterns,
}

impl BricklinkScraper {
    pub fn new(config: &CatalogConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            client: HttpClient::new(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            selectors: PageSelectors::compile(config)?,
            patterns: BucketPatterns::compile()?,
        })
    }

    /// Price guide URL for a locator. e.g. S=31113-1 → /catalogPG.asp?S=31113-1
    fn price_guide_url(&self, locator: &CatalogLocator) -> String {
        format!(
            "{}/catalogPG.asp?{}={}",
            self.base_url,
            locator.kind.code(),
            locator.id
        )
    }
}

#[async_trait]
impl CatalogSource for BricklinkScraper {
    async fn fetch_item_prices(&self, url: &str) -> Result<ItemPriceSummary, ScrapeError> {
        let locator = locate_item(url)?;
        info!("Fetching item page for {}={}", locator.kind.code(), locator.id);

        let item_body = self.client.get_text(url).await?;
        let header = parse::parse_item_header(&item_body, &self.selectors);
        debug!(
            "Item header: title={:?} weight={:?}",
            header.title, header.weight
        );

        let guide_url = self.price_guide_url(&locator);
        info!("Fetching price guide ({})", guide_url);
        let guide_body = self.client.get_text(&guide_url).await?;

        let cells = parse::select_price_boxes(&guide_body, &self.selectors.price_boxes);

        // Positional assignment only happens on a full set of four cells;
        // a short page leaves every bucket empty.
        let mut buckets: [Option<PriceBucket>; 4] = [None, None, None, None];
        if cells.len() >= 4 {
            for (slot, text) in buckets.iter_mut().zip(&cells) {
                *slot = self.patterns.parse_price_bucket(text);
            }
        } else {
            warn!(
                "Price guide returned {} cells, expected 4; leaving all buckets empty",
                cells.len()
            );
        }
        let [six_month_new, six_month_used, current_new, current_used] = buckets;

        Ok(ItemPriceSummary {
            locator,
            title: header.title,
            weight: header.weight,
            six_month_new,
            six_month_used,
            current_new,
            current_used,
            scraped_at: Utc::now().naive_utc(),
        })
    }
}
