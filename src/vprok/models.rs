//! Data models for catalog records, product snapshots and region outcomes.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Placeholder written when a catalog value is unavailable.
pub const DASH: &str = "-";

/// Old-price text written to `product.txt` when no old price renders.
/// Quoted, unlike the catalog placeholder.
pub const OLD_PRICE_PLACEHOLDER: &str = "\"-\"";

/// Price text written when neither the regular nor the discount price renders.
pub const SOLD_OUT: &str = "не определена. Товар вероятно распродан";

/// A value or the `"-"` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum OrDash<T> {
    Value(T),
    Dash,
}

impl<T> OrDash<T> {
    pub fn is_dash(&self) -> bool {
        matches!(self, OrDash::Dash)
    }
}

impl<T> From<Option<T>> for OrDash<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(OrDash::Dash, OrDash::Value)
    }
}

impl<T: Serialize> Serialize for OrDash<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OrDash::Value(v) => v.serialize(serializer),
            OrDash::Dash => serializer.serialize_str(DASH),
        }
    }
}

/// One catalog product as written to `products_api.txt`.
///
/// Field order and key names are the output format. Values are kept as they
/// appear in the source data, so `80` stays `80` and `12.5` stays `12.5`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    #[serde(rename = "Название товара")]
    pub name: String,
    // Leading Latin "C" is part of the established output key.
    #[serde(rename = "Cсылка на страницу товара")]
    pub url: String,
    #[serde(rename = "Рейтинг")]
    pub rating: OrDash<Value>,
    #[serde(rename = "Количество отзывов")]
    pub reviews: Value,
    #[serde(rename = "Цена")]
    pub price: Value,
    #[serde(rename = "Акционная цена")]
    pub promo_price: OrDash<Value>,
    #[serde(rename = "Цена до акции")]
    pub price_before_promo: OrDash<Value>,
    #[serde(rename = "Размер скидки")]
    pub discount: OrDash<Value>,
}

/// Fields scraped from a product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSnapshot {
    /// Cleaned price or [`SOLD_OUT`]
    pub price: String,
    /// Cleaned old price or [`OLD_PRICE_PLACEHOLDER`]
    pub old_price: String,
    pub rating: Option<String>,
    pub reviews_count: Option<String>,
}

/// Result of trying to switch the delivery region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionOutcome {
    /// Page now shows the requested region.
    pub applied: bool,
    /// Why the region was not applied.
    pub reason: Option<String>,
    /// Last region label read from the page before any change.
    pub previous: String,
    /// A picker interaction happened.
    pub changed: bool,
}

impl RegionOutcome {
    pub fn already_active(current: impl Into<String>) -> Self {
        Self { applied: true, reason: None, previous: current.into(), changed: false }
    }

    pub fn switched(previous: impl Into<String>) -> Self {
        Self { applied: true, reason: None, previous: previous.into(), changed: true }
    }

    pub fn skipped(previous: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { applied: false, reason: Some(reason.into()), previous: previous.into(), changed: false }
    }
}
