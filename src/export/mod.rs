//! CSV export of visible rows.
//!
//! Each page exports to a fixed filename. Enum columns are written as
//! their display label and currency columns with the configured symbol;
//! quoting of commas, quotes and newlines is left to the csv writer.

use crate::detail::render_value;
use crate::models::Record;
use crate::pages::{Column, Page};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Export options.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub currency_symbol: String,
    pub delimiter: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "₦".to_string(),
            delimiter: b',',
        }
    }
}

/// Render rows to CSV text with a header row.
pub fn to_csv(rows: &[&Record], columns: &[Column], options: &ExportOptions) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(Vec::new());

    writer
        .write_record(columns.iter().map(|c| c.header))
        .context("Failed to write CSV header")?;

    for row in rows {
        let values: Vec<String> = columns
            .iter()
            .map(|c| render_value(c, row, &options.currency_symbol).unwrap_or_default())
            .collect();
        writer
            .write_record(&values)
            .with_context(|| format!("Failed to write CSV row for {}", row.id))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Write the page's export file into `dir`, returning its path.
pub fn write_export(
    page: Page,
    rows: &[&Record],
    dir: &Path,
    options: &ExportOptions,
) -> Result<PathBuf> {
    let profile = page.profile();
    let content = to_csv(rows, profile.columns, options)?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(profile.export_filename);
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write export to {}", path.display()))?;

    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(path)
}
