//! vprok-parser - browser-driven scrapers for vprok.ru
//!
//! Two independent pipelines share this library: the catalog extractor reads
//! the product list embedded in a category page, the product inspector sets a
//! delivery region on a product page and scrapes its prices.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod vprok;

pub use config::Config;
pub use vprok::{ProductRecord, ProductSnapshot, RegionOutcome};
