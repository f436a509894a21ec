//! Catalog extraction command implementation.

use crate::config::Config;
use crate::error::NextDataError;
use crate::format::{self, CATALOG_FILE};
use crate::vprok::mapper::map_products;
use crate::vprok::next_data::products_from_html;
use crate::vprok::{BrowserSession, LaunchOptions, PageDriver, ResponsePattern};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// What a catalog run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogReport {
    /// Records were written to `path`.
    Saved { count: usize, path: PathBuf },
    /// Nothing was written.
    NoProducts { reason: String },
}

/// Extracts the first page of a catalog into `products_api.txt`.
pub struct CatalogCommand {
    config: Config,
}

impl CatalogCommand {
    /// Creates a new catalog command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Launches a browser, runs the extraction and always closes the browser.
    pub async fn execute(&self, url: &str) -> Result<CatalogReport> {
        let session = BrowserSession::launch(&self.config, &LaunchOptions::catalog()).await?;

        let result = match session.open_page().await {
            Ok(page) => self.execute_with_driver(&page, url).await,
            Err(e) => Err(e),
        };

        session.close().await;
        result
    }

    /// Runs the extraction on a provided page (for testing).
    pub async fn execute_with_driver(&self, driver: &impl PageDriver, url: &str) -> Result<CatalogReport> {
        let timeouts = &self.config.timeouts;

        info!("Opening URL: {}", url);
        let since = driver.responses().mark();
        driver.goto(url, timeouts.navigation()).await.context("Failed to load catalog page")?;

        match driver
            .responses()
            .wait_for(&ResponsePattern::exact(url), since, timeouts.document_response())
            .await
        {
            Ok(response) if response.status != 200 => {
                anyhow::bail!("Ошибка загрузки страницы: {}", response.status);
            }
            Ok(_) => debug!("Document response 200 for {}", url),
            // Redirects and URL normalization change the document URL; the
            // rendered page is still authoritative.
            Err(e) => debug!("Document response not observed: {}", e),
        }

        let html = driver.content().await?;
        let entries = match products_from_html(&html) {
            Ok(entries) => entries,
            Err(NextDataError::MissingBlock) => return Err(NextDataError::MissingBlock.into()),
            Err(NextDataError::Malformed(e)) => {
                warn!("Ошибка парсинга __NEXT_DATA__: {}", e);
                return Ok(CatalogReport::NoProducts { reason: format!("malformed __NEXT_DATA__: {}", e) });
            }
            Err(NextDataError::NoProducts) => {
                info!("Товары не найдены (возможно, пустая страница или блокировка).");
                return Ok(CatalogReport::NoProducts { reason: "no products found".to_string() });
            }
        };

        let records = map_products(&entries, &self.config.base_url);
        info!("Найдено товаров: {}", records.len());

        let path = self.config.output_path(CATALOG_FILE);
        format::write_catalog(&path, &records)?;
        info!("Данные сохранены: {}", path.display());

        Ok(CatalogReport::Saved { count: records.len(), path })
    }
}
