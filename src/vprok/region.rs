//! Delivery-region selection on product pages.
//!
//! Prices depend on the delivery region, so the requested region is applied
//! through the header picker before anything is read. Selection is best
//! effort: every failure is reported in the returned [`RegionOutcome`] and
//! the caller decides whether to continue.

use crate::config::Timeouts;
use crate::error::RegionError;
use crate::vprok::browser::PageDriver;
use crate::vprok::models::RegionOutcome;
use crate::vprok::responses::ResponsePattern;
use crate::vprok::selectors::region;
use tracing::{debug, info, warn};

/// Collapses whitespace runs, trims and lowercases a region label.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// True when two labels name the same region.
pub fn same_region(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Index of the first label equal to `target` after normalization.
pub fn find_region(labels: &[String], target: &str) -> Option<usize> {
    let target = normalize(target);
    labels.iter().position(|label| normalize(label) == target)
}

/// Switches the page to `target` unless it is already active.
pub async fn select_region(driver: &impl PageDriver, target: &str, timeouts: &Timeouts) -> RegionOutcome {
    let mut current = String::new();

    match apply(driver, target, timeouts, &mut current).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(
                "Keeping default region \"{}\". Selection of \"{}\" skipped: {}",
                current.trim(),
                target,
                e
            );
            RegionOutcome::skipped(current.trim(), e.to_string())
        }
    }
}

async fn apply(
    driver: &impl PageDriver,
    target: &str,
    timeouts: &Timeouts,
    current: &mut String,
) -> Result<RegionOutcome, RegionError> {
    *current = driver.text_content(region::CURRENT).await?.ok_or(RegionError::ControlMissing)?;

    if same_region(current, target) {
        debug!("Region \"{}\" already active", current.trim());
        return Ok(RegionOutcome::already_active(current.trim()));
    }

    driver.click(region::CURRENT, 0).await?;
    driver.wait_for_selector(region::LIST_ENTRY, timeouts.region_picker()).await?;

    let labels = driver.all_text(region::LIST_ENTRY).await?;
    let index = find_region(&labels, target).ok_or_else(|| RegionError::NotFound(target.to_string()))?;

    let since = driver.responses().mark();
    driver.click(region::LIST_ENTRY, index).await?;

    let confirm = ResponsePattern::contains(region::LIST_ENDPOINT).with_status(200);
    driver.responses().wait_for(&confirm, since, timeouts.region_confirm()).await?;

    info!("Region switched from \"{}\" to \"{}\"", current.trim(), labels[index].trim());
    Ok(RegionOutcome::switched(current.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vprok::mock::MockPage;

    const MOSCOW: &str = "Москва и область";
    const SPB: &str = "Санкт-Петербург и область";

    fn fast_timeouts() -> Timeouts {
        Timeouts { region_picker_ms: 50, region_confirm_ms: 50, ..Timeouts::default() }
    }

    fn picker_page() -> MockPage {
        MockPage::new()
            .with_text(region::CURRENT, "  Москва  и область ")
            .with_list(region::LIST_ENTRY, &[MOSCOW, SPB, "Казань"])
    }

    #[tokio::test]
    async fn test_already_active_no_interactions() {
        let page = picker_page();
        let outcome = select_region(&page, "МОСКВА И ОБЛАСТЬ", &fast_timeouts()).await;

        assert!(outcome.applied);
        assert!(!outcome.changed);
        assert_eq!(outcome.previous, "Москва  и область");
        assert!(page.actions().is_empty());
    }

    #[tokio::test]
    async fn test_switches_region() {
        let page = picker_page().confirming_region_clicks();
        let outcome = select_region(&page, " санкт-петербург и  область", &fast_timeouts()).await;

        assert!(outcome.applied);
        assert!(outcome.changed);
        assert!(outcome.reason.is_none());
        assert_eq!(
            page.actions(),
            vec![
                format!("click {} #0", region::CURRENT),
                format!("wait {}", region::LIST_ENTRY),
                format!("click {} #1", region::LIST_ENTRY),
            ]
        );
    }

    #[tokio::test]
    async fn test_region_not_in_list() {
        let page = picker_page().confirming_region_clicks();
        let outcome = select_region(&page, "Владивосток", &fast_timeouts()).await;

        assert!(!outcome.applied);
        assert_eq!(outcome.previous, "Москва  и область");
        let reason = outcome.reason.unwrap();
        assert!(reason.contains("Владивосток"));
        assert!(reason.contains("not found"));
        // Picker opened, nothing selected
        assert_eq!(page.actions().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_control() {
        let page = MockPage::new().with_list(region::LIST_ENTRY, &[SPB]);
        let outcome = select_region(&page, SPB, &fast_timeouts()).await;

        assert!(!outcome.applied);
        assert_eq!(outcome.previous, "");
        assert_eq!(outcome.reason.as_deref(), Some("current region control not found"));
        assert!(page.actions().is_empty());
    }

    #[tokio::test]
    async fn test_picker_never_opens() {
        let page = MockPage::new().with_text(region::CURRENT, MOSCOW);
        let outcome = select_region(&page, SPB, &fast_timeouts()).await;

        assert!(!outcome.applied);
        assert!(outcome.reason.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_no_confirmation_response() {
        let page = picker_page();
        let outcome = select_region(&page, SPB, &fast_timeouts()).await;

        assert!(!outcome.applied);
        assert!(outcome.reason.unwrap().contains("/regionList"));
        assert_eq!(page.actions().len(), 3);
    }

    #[tokio::test]
    async fn test_click_failure_is_caught() {
        let page = picker_page().with_failing(region::LIST_ENTRY);
        let outcome = select_region(&page, SPB, &fast_timeouts()).await;

        assert!(!outcome.applied);
        assert!(outcome.reason.unwrap().contains("not clickable"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Москва   и\nобласть "), "москва и область");
        assert_eq!(normalize("САНКТ-ПЕТЕРБУРГ\tи область"), "санкт-петербург и область");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_same_region() {
        assert!(same_region("Москва и область", " москва  И ОБЛАСТЬ"));
        assert!(!same_region("Москва и область", "Москва"));
    }

    #[test]
    fn test_find_region_first_match() {
        let labels = vec![
            "Москва и область".to_string(),
            "Санкт-Петербург и область".to_string(),
            " санкт-петербург  и область ".to_string(),
        ];
        assert_eq!(find_region(&labels, "САНКТ-ПЕТЕРБУРГ И ОБЛАСТЬ"), Some(1));
        assert_eq!(find_region(&labels, "Казань"), None);
    }
}
