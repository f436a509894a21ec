//! vprok.ru-specific modules: browser driver, page readers and data models.

pub mod browser;
pub mod extract;
pub mod mapper;
pub mod models;
pub mod next_data;
pub mod region;
pub mod responses;
pub mod selectors;

#[cfg(test)]
pub(crate) mod mock;

pub use browser::{BrowserSession, ChromePage, LaunchOptions, PageDriver};
pub use models::{OrDash, ProductRecord, ProductSnapshot, RegionOutcome};
pub use responses::{ObservedResponse, ResponseLog, ResponsePattern};
