//! Maps raw catalog entries from `__NEXT_DATA__` to [`ProductRecord`]s.
//!
//! The mapping is total: any JSON value produces a record, with `"-"` or `0`
//! standing in for absent data. A value is absent when it is null, `false`,
//! zero or an empty string; anything else is copied through unchanged.

use crate::vprok::models::{OrDash, ProductRecord, DASH};
use serde_json::Value;

/// Builds a record from one raw product entry.
pub fn map_product(entry: &Value, base_url: &str) -> ProductRecord {
    let price = present(entry.get("price")).cloned().unwrap_or_else(|| Value::from(0));
    let old_price = entry.get("oldPrice").filter(|v| is_positive(v));
    let discount = entry.get("discount").filter(|v| is_positive(v));

    ProductRecord {
        name: present(entry.get("name")).map(label).unwrap_or_else(|| DASH.to_string()),
        url: product_url(base_url, present(entry.get("url")).map(label).as_deref()),
        rating: present(entry.get("rating")).cloned().into(),
        reviews: present(entry.get("reviews")).cloned().unwrap_or_else(|| Value::from(0)),
        promo_price: if old_price.is_some() { OrDash::Value(price.clone()) } else { OrDash::Dash },
        price,
        price_before_promo: old_price.cloned().into(),
        discount: discount.cloned().into(),
    }
}

/// Maps every entry in order.
pub fn map_products(entries: &[Value], base_url: &str) -> Vec<ProductRecord> {
    entries.iter().map(|entry| map_product(entry, base_url)).collect()
}

/// Site origin joined with a relative product path.
pub fn product_url(base_url: &str, path: Option<&str>) -> String {
    match path {
        Some(path) if path.starts_with('/') => format!("{}{}", base_url.trim_end_matches('/'), path),
        Some(path) => format!("{}{}", base_url, path),
        None => base_url.to_string(),
    }
}

/// The value unless it is null, `false`, zero or `""`.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `value > 0`, with numeric strings compared by their number.
fn is_positive(value: &Value) -> bool {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    };
    n.is_some_and(|v| v > 0.0)
}
