//! CLI command implementations.

pub mod catalog;
pub mod product;

pub use catalog::{CatalogCommand, CatalogReport};
pub use product::{ProductCommand, ProductReport};
