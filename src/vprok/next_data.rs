//! Reader for the Next.js `__NEXT_DATA__` block embedded in catalog pages.

use crate::error::NextDataError;
use crate::vprok::selectors::catalog;
use scraper::Html;
use serde_json::Value;
use tracing::{debug, trace};

/// Extracts the raw product entries from a rendered catalog page.
pub fn products_from_html(html: &str) -> Result<Vec<Value>, NextDataError> {
    let script = script_text(html).ok_or(NextDataError::MissingBlock)?;
    products_from_json(&script)
}

/// Parses the initial-state JSON and returns the product entries.
pub fn products_from_json(json: &str) -> Result<Vec<Value>, NextDataError> {
    let state: Value = serde_json::from_str(json)?;
    debug!("Parsed __NEXT_DATA__ ({} bytes)", json.len());

    let products = catalog_products(&state);
    if products.is_empty() {
        return Err(NextDataError::NoProducts);
    }
    Ok(products)
}

/// Descends to the catalog product array; anything else along the path is empty.
pub fn catalog_products(state: &Value) -> Vec<Value> {
    match state.pointer(catalog::PRODUCTS_POINTER) {
        Some(Value::Array(items)) => items.clone(),
        Some(other) => {
            trace!("Product path holds a non-array value: {}", other);
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn script_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let element = document.select(&catalog::NEXT_DATA).next()?;
    Some(element.text().collect::<String>())
}
