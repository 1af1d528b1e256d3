//! CSV export for extracted product records.

use crate::models::ProductRecord;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Write all records to `path` as a three-column CSV.
///
/// With zero records no file is created at all; returns whether a file was
/// written. Quoting and escaping follow standard CSV rules.
pub fn write_products(path: &Path, records: &[ProductRecord]) -> Result<bool> {
    if records.is_empty() {
        info!("No products extracted, skipping CSV export");
        return Ok(false);
    }

    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(true)
}
