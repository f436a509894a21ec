//! Field scraping for product pages.

use crate::vprok::browser::PageDriver;
use crate::vprok::models::{ProductSnapshot, OLD_PRICE_PLACEHOLDER, SOLD_OUT};
use crate::vprok::selectors::product;
use tracing::debug;

/// Reads price, old price, rating and review count from the live page.
///
/// All five reads run concurrently; a failed read only blanks its own field.
pub async fn extract_snapshot(driver: &impl PageDriver) -> ProductSnapshot {
    let (regular, discount, old, rating, reviews) = tokio::join!(
        read_text(driver, product::REGULAR_PRICE),
        read_text(driver, product::DISCOUNT_PRICE),
        read_text(driver, product::OLD_PRICE),
        read_text(driver, product::RATING),
        read_text(driver, product::REVIEWS_COUNT),
    );

    build_snapshot(regular, discount, old, rating, reviews)
}

/// Applies the price fallback and numeric cleaning to raw field texts.
pub fn build_snapshot(
    regular: Option<String>,
    discount: Option<String>,
    old: Option<String>,
    rating: Option<String>,
    reviews: Option<String>,
) -> ProductSnapshot {
    let price = regular
        .or(discount)
        .and_then(|t| clean_number(&t))
        .unwrap_or_else(|| SOLD_OUT.to_string());

    ProductSnapshot {
        price,
        old_price: old.and_then(|t| clean_number(&t)).unwrap_or_else(|| OLD_PRICE_PLACEHOLDER.to_string()),
        rating: rating.and_then(|t| clean_number(&t)),
        reviews_count: reviews.and_then(|t| clean_number(&t)),
    }
}

/// Keeps only digit, `.` and `,` characters.
///
/// Text with no such characters is returned unchanged; empty text is `None`.
pub fn clean_number(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let digits: String = text.chars().filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',').collect();
    if digits.is_empty() {
        Some(text.to_string())
    } else {
        Some(digits)
    }
}

async fn read_text(driver: &impl PageDriver, selector: &str) -> Option<String> {
    match driver.text_content(selector).await {
        Ok(Some(text)) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Ok(None) => {
            debug!("No element for {}", selector);
            None
        }
        Err(e) => {
            debug!("Failed to read {}: {:#}", selector, e);
            None
        }
    }
}
