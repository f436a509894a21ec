//! CSS selectors for vprok.ru pages.
//!
//! The site ships CSS-module class names with build hashes appended
//! (`ProductPage_buyBlockDesktop__x1Yz`), so every selector matches on a
//! stable class-name prefix with `[class*=...]`.
//!
//! **Update process**: when a field stops resolving, capture the page HTML,
//! update the selector here and add a fixture under `tests/fixtures`.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for catalog (category) pages.
pub mod catalog {
    use super::*;

    /// Next.js initial-state script.
    pub static NEXT_DATA: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("script#__NEXT_DATA__").unwrap());

    /// JSON pointer from the initial state to the product array.
    pub const PRODUCTS_POINTER: &str = "/props/pageProps/initialStore/catalogPage/products";
}

/// Selectors for single product pages. Evaluated in the live page.
pub mod product {
    /// Desktop buy block; its presence means the product page rendered.
    pub const BUY_BLOCK: &str = "[class*=ProductPage_buyBlockDesktop]";

    /// Price after discount.
    pub const DISCOUNT_PRICE: &str =
        "[class*=ProductPage_buyBlockDesktop] [class*='Price_role_discount']";

    /// Strikethrough price before discount.
    pub const OLD_PRICE: &str = "[class*=ProductPage_buyBlockDesktop] [class*='Price_role_old']";

    /// Price without a running promotion.
    pub const REGULAR_PRICE: &str =
        "[class*='ProductPage_buyBlockDesktop'] [class*='Price_role_regular']";

    /// Star rating value.
    pub const RATING: &str = "[class*='ActionsRow_stars']";

    /// Review counter next to the stars.
    pub const REVIEWS_COUNT: &str = "[class*='ActionsRow_reviews_']";
}

/// Selectors for the delivery-region picker in the header.
pub mod region {
    /// Header control showing the active region; clicking opens the picker.
    pub const CURRENT: &str = "[class*='Region_text']";

    /// One entry in the picker's region list.
    pub const LIST_ENTRY: &str = "[class*='UiRegionListBase_button']";

    /// Path fragment of the API call that returns (and confirms) regions.
    pub const LIST_ENDPOINT: &str = "/regionList";
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_next_data_selector() {
        let html = r#"<html><body>
            <script id="other">{}</script>
            <script id="__NEXT_DATA__" type="application/json">{"props":{}}</script>
        </body></html>"#;
        let doc = Html::parse_document(html);
        let found: Vec<_> = doc.select(&catalog::NEXT_DATA).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value().id(), Some("__NEXT_DATA__"));
    }

    #[test]
    fn test_product_selectors_parse() {
        for css in [
            product::BUY_BLOCK,
            product::DISCOUNT_PRICE,
            product::OLD_PRICE,
            product::REGULAR_PRICE,
            product::RATING,
            product::REVIEWS_COUNT,
            region::CURRENT,
            region::LIST_ENTRY,
        ] {
            assert!(Selector::parse(css).is_ok(), "selector failed to parse: {}", css);
        }
    }

    #[test]
    fn test_product_selectors_match_hashed_classes() {
        let html = r#"<html><body>
            <div class="ProductPage_buyBlockDesktop__Ab12c">
                <span class="Price_price__1 Price_role_regular__Xy9">89,99 ₽</span>
                <span class="Price_price__1 Price_role_old__Zz1">120 ₽</span>
            </div>
            <div class="ActionsRow_stars__q1">4.8</div>
            <div class="ActionsRow_reviews__r2">12 отзывов</div>
            <span class="Region_text__k3">Москва и область</span>
        </body></html>"#;
        let doc = Html::parse_document(html);
        let first_text = |css: &str| {
            let sel = Selector::parse(css).unwrap();
            doc.select(&sel).next().map(|e| e.text().collect::<String>())
        };

        assert_eq!(first_text(product::REGULAR_PRICE).as_deref(), Some("89,99 ₽"));
        assert_eq!(first_text(product::OLD_PRICE).as_deref(), Some("120 ₽"));
        assert!(first_text(product::DISCOUNT_PRICE).is_none());
        assert_eq!(first_text(product::RATING).as_deref(), Some("4.8"));
        assert_eq!(first_text(product::REVIEWS_COUNT).as_deref(), Some("12 отзывов"));
        assert_eq!(first_text(region::CURRENT).as_deref(), Some("Москва и область"));
    }
}
