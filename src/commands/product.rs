//! Product inspection command implementation.

use crate::config::Config;
use crate::format::{self, PRODUCT_FILE, SCREENSHOT_FILE};
use crate::vprok::extract::extract_snapshot;
use crate::vprok::region::select_region;
use crate::vprok::selectors::{product, region};
use crate::vprok::{BrowserSession, LaunchOptions, PageDriver, ProductSnapshot, RegionOutcome, ResponsePattern};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

/// What a product run produced.
#[derive(Debug, Clone)]
pub struct ProductReport {
    pub snapshot: ProductSnapshot,
    pub region: RegionOutcome,
    pub screenshot: PathBuf,
    pub output: PathBuf,
}

/// Opens a product page in a region, screenshots it and saves its prices.
pub struct ProductCommand {
    config: Config,
}

impl ProductCommand {
    /// Creates a new product command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Launches a browser, runs the inspection and always closes the browser.
    pub async fn execute(&self, url: &str, region: &str) -> Result<ProductReport> {
        let session = BrowserSession::launch(&self.config, &LaunchOptions::product(&self.config)).await?;

        let result = match session.open_page().await {
            Ok(page) => self.execute_with_driver(&page, url, region).await,
            Err(e) => Err(e),
        };

        session.close().await;
        result
    }

    /// Runs the inspection on a provided page (for testing).
    pub async fn execute_with_driver(
        &self,
        driver: &impl PageDriver,
        url: &str,
        target_region: &str,
    ) -> Result<ProductReport> {
        let timeouts = &self.config.timeouts;

        info!("Opening URL: {}", url);
        let since = driver.responses().mark();
        driver.goto(url, timeouts.navigation()).await.context("Failed to load product page")?;

        let region_list = ResponsePattern::contains(region::LIST_ENDPOINT).with_status(200);
        driver
            .responses()
            .wait_for(&region_list, since, timeouts.region_list())
            .await
            .context("Region list did not load")?;

        driver
            .wait_for_selector(product::BUY_BLOCK, timeouts.product_block())
            .await
            .map_err(|_| anyhow::anyhow!("Product not found"))?;

        info!("Setting region to: {}", target_region);
        let outcome = select_region(driver, target_region, timeouts).await;
        if !outcome.applied && self.config.strict_region {
            anyhow::bail!(
                "Region \"{}\" could not be applied: {}",
                target_region,
                outcome.reason.as_deref().unwrap_or("unknown reason")
            );
        }

        let screenshot = self.config.output_path(SCREENSHOT_FILE);
        info!("Taking screenshot to {}", screenshot.display());
        driver.screenshot(&screenshot, self.config.screenshot_quality).await?;

        info!("Extracting product data");
        let snapshot = extract_snapshot(driver).await;

        let output = self.config.output_path(PRODUCT_FILE);
        format::write_product(&output, &snapshot)?;
        info!("Saved to {}", output.display());

        Ok(ProductReport { snapshot, region: outcome, screenshot, output })
    }
}
