//! vprok-catalog - extract the first page of a vprok.ru catalog
//!
//! Usage: `vprok-catalog https://www.vprok.ru/catalog/7382/pomidory-i-ovoschnye-nabory`

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use vprok_parser::cli::{init_logging, CommonArgs};
use vprok_parser::commands::{CatalogCommand, CatalogReport};

#[derive(Parser)]
#[command(
    name = "vprok-catalog",
    version,
    about = "Extract catalog products from the page's embedded data into products_api.txt"
)]
struct Cli {
    /// Catalog page URL
    url: String,

    /// Site origin used to build product links
    #[arg(long, env = "VPROK_BASE_URL")]
    base_url: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.common.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = cli.common.load_config()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let cmd = CatalogCommand::new(config);
    match cmd.execute(&cli.url).await? {
        CatalogReport::Saved { count, path } => {
            println!("Saved {} products to {}", count, path.display());
        }
        CatalogReport::NoProducts { reason } => {
            println!("No products saved: {}", reason);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url() {
        let cli = Cli::try_parse_from(["vprok-catalog", "-o", "/tmp/out", "https://www.vprok.ru/catalog/7382"]).unwrap();
        assert_eq!(cli.url, "https://www.vprok.ru/catalog/7382");
        assert_eq!(cli.common.output_dir.as_deref(), Some(std::path::Path::new("/tmp/out")));
    }

    #[test]
    fn test_missing_url_is_usage_error() {
        let err = Cli::try_parse_from(["vprok-catalog"]).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }
}
