//! Price guide cell text → typed bucket coercion.
//!
//! The label patterns below match the literal field labels BrickLink renders
//! inside each price guide cell. They are deliberately independent: each one
//! can hit or miss on its own, and a cell where all seven miss produces no
//! bucket at all.

use crate::error::ScrapeError;
use crate::models::{Money, PriceBucket};
use regex::Regex;

pub const TIMES_SOLD_PATTERN: &str = r"(?i)Times Sold:\s*(\d+)";
pub const TOTAL_LOTS_PATTERN: &str = r"(?i)Total Lots:\s*(\d+)";
pub const TOTAL_QTY_PATTERN: &str = r"(?i)Total Qty:\s*(\d+)";
pub const MIN_PRICE_PATTERN: &str = r"(?i)Min Price:\s*([A-Z]+)\s+([\d,\.]+)";
pub const AVG_PRICE_PATTERN: &str = r"(?i)Avg Price:\s*([A-Z]+)\s+([\d,\.]+)";
pub const QTY_AVG_PRICE_PATTERN: &str = r"(?i)Qty Avg Price:\s*([A-Z]+)\s+([\d,\.]+)";
pub const MAX_PRICE_PATTERN: &str = r"(?i)Max Price:\s*([A-Z]+)\s+([\d,\.]+)";

/// Marker BrickLink renders in place of statistics when a bucket has no data.
const UNAVAILABLE_MARKER: &str = "(unavailable)";

pub struct BucketPatterns {
    times_sold: Regex,
    total_lots: Regex,
    total_qty: Regex,
    min_price: Regex,
    avg_price: Regex,
    qty_avg_price: Regex,
    max_price: Regex,
}

fn compile(pattern: &str) -> Result<Regex, ScrapeError> {
    Regex::new(pattern).map_err(|source| ScrapeError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl BucketPatterns {
    pub fn compile() -> Result<Self, ScrapeError> {
        Ok(Self {
            times_sold: compile(TIMES_SOLD_PATTERN)?,
            total_lots: compile(TOTAL_LOTS_PATTERN)?,
            total_qty: compile(TOTAL_QTY_PATTERN)?,
            min_price: compile(MIN_PRICE_PATTERN)?,
            avg_price: compile(AVG_PRICE_PATTERN)?,
            qty_avg_price: compile(QTY_AVG_PRICE_PATTERN)?,
            max_price: compile(MAX_PRICE_PATTERN)?,
        })
    }

    /// Parse one cell's text into a bucket.
    ///
    /// An `(unavailable)` marker wins over any numbers also present in the
    /// text; a cell where no field resolves is `None`, never an empty bucket.
    pub fn parse_price_bucket(&self, text: &str) -> Option<PriceBucket> {
        if text.to_lowercase().contains(UNAVAILABLE_MARKER) {
            return None;
        }

        let bucket = PriceBucket {
            times_sold: count_field(&self.times_sold, text),
            total_lots: count_field(&self.total_lots, text),
            total_qty: count_field(&self.total_qty, text),
            min_price: money_field(&self.min_price, text),
            avg_price: money_field(&self.avg_price, text),
            qty_avg_price: money_field(&self.qty_avg_price, text),
            max_price: money_field(&self.max_price, text),
        };

        if bucket.is_empty() { None } else { Some(bucket) }
    }
}

fn count_field(pattern: &Regex, text: &str) -> Option<u32> {
    pattern.captures(text)?.get(1)?.as_str().parse().ok()
}

/// `Min Price: USD 1,234.56` → currency uppercased, amount with grouping
/// separators stripped.
fn money_field(pattern: &Regex, text: &str) -> Option<Money> {
    let caps = pattern.captures(text)?;
    let currency = caps.get(1)?.as_str().to_uppercase();
    let amount: f64 = caps.get(2)?.as_str().replace(',', "").parse().ok()?;
    Some(Money { currency, amount })
}
