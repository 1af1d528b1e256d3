use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use brickmarket::catalog::{BricklinkScraper, CatalogSource};
use brickmarket::config::AppConfig;
use brickmarket::export;
use brickmarket::listings::{ListingExtractor, discover_listing_files};
use brickmarket::utils;

#[derive(Parser)]
#[command(name = "brickmarket", about = "LEGO resale market data collector", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Parse saved Shopee listing pages and export products to CSV
    ExportListings {
        /// Directory containing saved shop-listing-*.txt pages (default: config value)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Output CSV path (default: config value)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Fetch the BrickLink price guide for one catalog item URL
    Prices {
        /// Item URL, e.g. https://www.bricklink.com/v2/catalog/catalogitem.page?S=31113-1
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "brickmarket=info,warn",
        1 => "brickmarket=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::ExportListings { dir, out } => {
            let _t = utils::Timer::start("Listing export");
            let dir = dir.unwrap_or_else(|| config.listings.input_dir.clone());
            let out = out.unwrap_or_else(|| config.listings.output_path.clone());

            let extractor = ListingExtractor::new(&config.listings)?;
            let files = discover_listing_files(&dir, &config.listings.file_pattern)?;
            info!("Found {} shop listing files in {:?}", files.len(), dir);

            let mut all_products = Vec::new();
            for path in &files {
                info!("Parsing {:?}...", path);
                let html = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {:?}", path))?;
                all_products.extend(extractor.extract_products(&html));
            }

            if export::write_products(&out, &all_products)? {
                info!(
                    "Exported {} products to {:?}",
                    utils::fmt_number(all_products.len() as i64),
                    out
                );
            }
        }

        Command::Prices { url } => {
            let _t = utils::Timer::start("Price guide fetch");
            let scraper = BricklinkScraper::new(&config.catalog)?;
            let summary = scraper.fetch_item_prices(&url).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
