use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub listings: ListingsConfig,
    pub catalog: CatalogConfig,
}

/// Local listing extractor configuration.
///
/// The selector and pattern strings encode the exact markup of Shopee search
/// result pages; they live here rather than in the extraction code so a
/// markup change only needs a config update.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListingsConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// `prefix*suffix` filename glob for saved listing pages.
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,

    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    #[serde(default = "default_item_selector")]
    pub item_selector: String,

    #[serde(default = "default_name_text_pattern")]
    pub name_text_pattern: String,

    #[serde(default = "default_name_fallback_selector")]
    pub name_fallback_selector: String,

    #[serde(default = "default_price_class_pattern")]
    pub price_class_pattern: String,

    #[serde(default = "default_price_text_pattern")]
    pub price_text_pattern: String,

    #[serde(default = "default_sold_class_pattern")]
    pub sold_class_pattern: String,

    #[serde(default = "default_sold_text_pattern")]
    pub sold_text_pattern: String,
}

/// BrickLink fetcher configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_title_selector")]
    pub title_selector: String,

    #[serde(default = "default_weight_selector")]
    pub weight_selector: String,

    /// Structural path to the four price-guide cells. Order-dependent:
    /// 6-month new, 6-month used, current new, current used.
    #[serde(default = "default_price_box_selector")]
    pub price_box_selector: String,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_input_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_file_pattern() -> String {
    "shop-listing-*.txt".to_string()
}
fn default_output_path() -> PathBuf {
    PathBuf::from("shopee-products.csv")
}
fn default_item_selector() -> String {
    "div.shop-search-result-view__item".to_string()
}
fn default_name_text_pattern() -> String {
    r"(?i)LEGO.*\d{5}".to_string()
}
fn default_name_fallback_selector() -> String {
    r#"div[class*="line-clamp-2"]"#.to_string()
}
fn default_price_class_pattern() -> String {
    "text-base/5.*font-medium".to_string()
}
fn default_price_text_pattern() -> String {
    r"RM\s*([0-9,.]+)".to_string()
}
fn default_sold_class_pattern() -> String {
    "text-shopee-black87.*text-xs".to_string()
}
fn default_sold_text_pattern() -> String {
    r"([0-9kK.+,]+)\s*sold".to_string()
}
fn default_base_url() -> String {
    "https://www.bricklink.com".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36"
        .to_string()
}
fn default_title_selector() -> String {
    "h1#item-name-title".to_string()
}
fn default_weight_selector() -> String {
    "span#item-weight-info".to_string()
}
fn default_price_box_selector() -> String {
    "#id-main-legacy-table table tr:nth-of-type(3) > td > table td".to_string()
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("BRICKMARKET").separator("__"))
            .build()?;

        let app_cfg: AppConfig = cfg.try_deserialize().unwrap_or_else(|_| AppConfig::default());
        Ok(app_cfg)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listings: ListingsConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            file_pattern: default_file_pattern(),
            output_path: default_output_path(),
            item_selector: default_item_selector(),
            name_text_pattern: default_name_text_pattern(),
            name_fallback_selector: default_name_fallback_selector(),
            price_class_pattern: default_price_class_pattern(),
            price_text_pattern: default_price_text_pattern(),
            sold_class_pattern: default_sold_class_pattern(),
            sold_text_pattern: default_sold_text_pattern(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            title_selector: default_title_selector(),
            weight_selector: default_weight_selector(),
            price_box_selector: default_price_box_selector(),
        }
    }
}
