use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ── Shopee product record ─────────────────────────────────────────────────────

/// One product row extracted from a saved search-result page.
///
/// `price` and `units_sold` keep the raw text shape of the page (minus
/// grouping commas) and fall back to `"N/A"` when unresolved, so every CSV
/// row has the same three columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    #[serde(rename = "Product Name")]
    pub name: String,
    #[serde(rename = "Price (RM)")]
    pub price: String,
    #[serde(rename = "Units Sold")]
    pub units_sold: String,
}

// ── BrickLink catalog locator ─────────────────────────────────────────────────

/// BrickLink item type, as used in catalog URLs (`?S=31113-1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    #[serde(rename = "P")]
    Part,
    #[serde(rename = "S")]
    Set,
    #[serde(rename = "M")]
    Minifig,
    #[serde(rename = "G")]
    Gear,
    #[serde(rename = "C")]
    Catalog,
    #[serde(rename = "I")]
    Instructions,
    #[serde(rename = "O")]
    OriginalBox,
    #[serde(rename = "B")]
    Book,
}

impl ItemKind {
    /// Scan order when a URL carries more than one recognized parameter.
    pub const PRIORITY: [ItemKind; 8] = [
        ItemKind::Part,
        ItemKind::Set,
        ItemKind::Minifig,
        ItemKind::Gear,
        ItemKind::Catalog,
        ItemKind::Instructions,
        ItemKind::OriginalBox,
        ItemKind::Book,
    ];

    /// The single-letter code used as the query parameter name on BrickLink.
    pub fn code(self) -> &'static str {
        match self {
            ItemKind::Part => "P",
            ItemKind::Set => "S",
            ItemKind::Minifig => "M",
            ItemKind::Gear => "G",
            ItemKind::Catalog => "C",
            ItemKind::Instructions => "I",
            ItemKind::OriginalBox => "O",
            ItemKind::Book => "B",
        }
    }
}

/// Identifies one catalog item: type code + item number (e.g. S + 31113-1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogLocator {
    pub kind: ItemKind,
    pub id: String,
}

// ── Price guide ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Money {
    pub currency: String, // "USD", "EUR", ...
    pub amount: f64,
}

/// One pricing-statistics snapshot from the price guide page.
///
/// All fields are independently optional; a cell where none of them resolve
/// is represented as no bucket at all rather than an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PriceBucket {
    pub times_sold: Option<u32>,
    pub total_lots: Option<u32>,
    pub total_qty: Option<u32>,
    pub min_price: Option<Money>,
    pub avg_price: Option<Money>,
    pub qty_avg_price: Option<Money>,
    pub max_price: Option<Money>,
}

impl PriceBucket {
    pub fn is_empty(&self) -> bool {
        self.times_sold.is_none()
            && self.total_lots.is_none()
            && self.total_qty.is_none()
            && self.min_price.is_none()
            && self.avg_price.is_none()
            && self.qty_avg_price.is_none()
            && self.max_price.is_none()
    }
}

/// Everything collected for one catalog item: header info from the item page
/// and the four price guide buckets (6-month / current × new / used).
///
/// Absent values serialize as explicit JSON `null` so the output shape is
/// stable across items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemPriceSummary {
    pub locator: CatalogLocator,
    pub title: Option<String>,
    pub weight: Option<String>,
    pub six_month_new: Option<PriceBucket>,
    pub six_month_used: Option<PriceBucket>,
    pub current_new: Option<PriceBucket>,
    pub current_used: Option<PriceBucket>,
    pub scraped_at: NaiveDateTime,
}
