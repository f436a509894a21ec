//! Flags and setup shared by both binaries.

use crate::config::Config;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Options accepted by every binary.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Chromium/Chrome executable
    #[arg(long, env = "VPROK_CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Directory for output files (default: current directory)
    #[arg(short, long, env = "VPROK_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Loads the layered config and applies these flags on top.
    pub fn load_config(&self) -> Result<Config> {
        let config = Config::load(self.config.as_deref())?.with_env();
        Ok(self.apply(config))
    }

    /// CLI overrides; unset flags keep the config value.
    pub fn apply(&self, mut config: Config) -> Config {
        if self.headless {
            config.headless = true;
        }
        if let Some(path) = &self.chrome_path {
            config.chrome_path = Some(path.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        config
    }
}

/// Joins region words into one label; `None` when nothing but whitespace remains.
pub fn region_label(parts: &[String]) -> Option<String> {
    let label = parts.join(" ");
    let label = label.trim();
    (!label.is_empty()).then(|| label.to_string())
}

/// Initializes tracing; INFO by default so progress messages show.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,chromiumoxide=warn"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
