//! Output files for both pipelines.

use crate::vprok::{ProductRecord, ProductSnapshot};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Catalog records, pretty-printed JSON.
pub const CATALOG_FILE: &str = "products_api.txt";

/// Product fields, one `Label: value` per line.
pub const PRODUCT_FILE: &str = "product.txt";

/// Full-page product screenshot.
pub const SCREENSHOT_FILE: &str = "screenshot.jpg";

/// Written instead of an empty product file.
pub const NO_DATA: &str = "Нет данных";

/// Renders catalog records as a JSON array indented by two spaces.
pub fn catalog_json(records: &[ProductRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize products")
}

/// Renders the present product fields as text lines.
pub fn product_text(snapshot: &ProductSnapshot) -> String {
    let fields = [
        ("Цена", Some(snapshot.price.as_str())),
        ("Старая цена", Some(snapshot.old_price.as_str())),
        ("Рейтинг", snapshot.rating.as_deref()),
        ("Количество отзывов", snapshot.reviews_count.as_deref()),
    ];

    let lines: Vec<String> = fields
        .into_iter()
        .filter_map(|(label, value)| value.filter(|v| !v.is_empty()).map(|v| format!("{}: {}", label, v)))
        .collect();

    if lines.is_empty() {
        NO_DATA.to_string()
    } else {
        lines.join("\n")
    }
}

/// Writes the catalog file.
pub fn write_catalog(path: &Path, records: &[ProductRecord]) -> Result<()> {
    write(path, &catalog_json(records)?)
}

/// Writes the product file.
pub fn write_product(path: &Path, snapshot: &ProductSnapshot) -> Result<()> {
    write(path, &product_text(snapshot))
}

fn write(path: &Path, content: &str) -> Result<()> {
    debug!("Writing {} bytes to {}", content.len(), path.display());
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
