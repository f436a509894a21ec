//! vprok-product - screenshot a vprok.ru product page and save its prices
//!
//! Usage: `vprok-product <PRODUCT_URL> <REGION...>`, e.g.
//! `vprok-product https://www.vprok.ru/product/... Санкт-Петербург и область`

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use vprok_parser::cli::{init_logging, region_label, CommonArgs};
use vprok_parser::commands::ProductCommand;

#[derive(Parser)]
#[command(
    name = "vprok-product",
    version,
    about = "Open a product page in a delivery region, save screenshot.jpg and product.txt"
)]
struct Cli {
    /// Product page URL
    url: String,

    /// Delivery region; remaining words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    region: Vec<String>,

    /// Fail when the region cannot be applied instead of using the page default
    #[arg(long)]
    strict_region: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.common.verbose);

    let Some(region) = region_label(&cli.region) else {
        eprintln!("Usage: vprok-product <PRODUCT_URL> <REGION...>");
        return ExitCode::from(2);
    };

    match run(&cli, &region).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, region: &str) -> Result<()> {
    let mut config = cli.common.load_config()?;
    if cli.strict_region {
        config.strict_region = true;
    }

    let report = ProductCommand::new(config).execute(&cli.url, region).await?;
    println!("Saved to {}", report.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_and_region_words() {
        let cli = Cli::try_parse_from(["vprok-product", "https://www.vprok.ru/product/x--1", "Москва", "и", "область"])
            .unwrap();
        assert_eq!(cli.url, "https://www.vprok.ru/product/x--1");
        assert_eq!(region_label(&cli.region).as_deref(), Some("Москва и область"));
        assert!(!cli.strict_region);
    }

    #[test]
    fn test_missing_region_is_usage_error() {
        let err = Cli::try_parse_from(["vprok-product", "https://www.vprok.ru/product/x--1"])
            .err()
            .unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_url_is_usage_error() {
        let err = Cli::try_parse_from(["vprok-product"]).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_strict_region_flag() {
        let cli = Cli::try_parse_from(["vprok-product", "--strict-region", "https://x/p", "Казань"]).unwrap();
        assert!(cli.strict_region);
    }
}
