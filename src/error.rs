//! Classified failures for the scraping pipelines.
//!
//! Browser plumbing reports `anyhow::Error`; these types exist where a caller
//! branches on the kind of failure.

use std::time::Duration;
use thiserror::Error;

/// Failures while reading the embedded `__NEXT_DATA__` block.
#[derive(Debug, Error)]
pub enum NextDataError {
    #[error("embedded data block #__NEXT_DATA__ not found on page")]
    MissingBlock,

    #[error("failed to parse __NEXT_DATA__: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("no products found")]
    NoProducts,
}

/// Reasons the region picker could not apply the requested region.
#[derive(Debug, Error)]
pub enum RegionError {
    #[error("current region control not found")]
    ControlMissing,

    #[error("Region \"{0}\" not found")]
    NotFound(String),

    #[error(transparent)]
    Wait(#[from] WaitTimeout),

    #[error(transparent)]
    Browser(#[from] anyhow::Error),
}

/// A fixed-deadline wait that expired.
#[derive(Debug, Clone, Error)]
#[error("timed out after {}ms waiting for {what}", .after.as_millis())]
pub struct WaitTimeout {
    pub what: String,
    pub after: Duration,
}

impl WaitTimeout {
    pub fn new(what: impl Into<String>, after: Duration) -> Self {
        Self { what: what.into(), after }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_timeout_message() {
        let err = WaitTimeout::new("selector .x", Duration::from_secs(5));
        assert_eq!(err.to_string(), "timed out after 5000ms waiting for selector .x");
    }

    #[test]
    fn test_region_not_found_names_region() {
        let err = RegionError::NotFound("Москва и область".to_string());
        assert_eq!(err.to_string(), "Region \"Москва и область\" not found");
    }

    #[test]
    fn test_malformed_from_serde() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: NextDataError = parse_err.into();
        assert!(err.to_string().starts_with("failed to parse __NEXT_DATA__"));
    }
}
