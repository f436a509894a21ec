//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Site origin used to absolutize catalog product links.
pub const DEFAULT_BASE_URL: &str = "https://www.vprok.ru";

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site origin (scheme + host, no trailing path)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Run Chromium without a window
    #[serde(default)]
    pub headless: bool,

    /// Explicit Chromium/Chrome executable
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,

    /// Window size for the product inspector
    #[serde(default)]
    pub viewport: Viewport,

    /// Browser UI language passed as `--lang`
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Directory for output files (current directory when unset)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// JPEG quality for the product screenshot
    #[serde(default = "default_screenshot_quality")]
    pub screenshot_quality: u8,

    /// Abort the product run when the requested region could not be applied
    #[serde(default)]
    pub strict_region: bool,

    /// Fixed deadlines for every browser wait
    #[serde(default)]
    pub timeouts: Timeouts,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_lang() -> String {
    "ru-RU,ru".to_string()
}

fn default_screenshot_quality() -> u8 {
    85
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            headless: false,
            chrome_path: None,
            viewport: Viewport::default(),
            lang: default_lang(),
            output_dir: None,
            screenshot_quality: default_screenshot_quality(),
            strict_region: false,
            timeouts: Timeouts::default(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("vprok.toml");
        if local_config.exists() {
            debug!("Found vprok.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("vprok-parser").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(base_url) = std::env::var("VPROK_BASE_URL") {
            if !base_url.trim().is_empty() {
                self.base_url = base_url;
            }
        }

        if let Ok(headless) = std::env::var("VPROK_HEADLESS") {
            match headless.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.headless = true,
                "0" | "false" | "no" => self.headless = false,
                _ => {}
            }
        }

        if let Ok(path) = std::env::var("VPROK_CHROME_PATH") {
            self.chrome_path = Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("VPROK_OUTPUT_DIR") {
            self.output_dir = Some(PathBuf::from(dir));
        }

        self
    }

    /// Resolves an output file name against the configured directory.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

/// Browser window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1366, height: 900 }
    }
}

/// Deadlines in milliseconds. Every wait has exactly one and is never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub navigation_ms: u64,
    pub document_response_ms: u64,
    pub region_list_ms: u64,
    pub product_block_ms: u64,
    pub region_picker_ms: u64,
    pub region_confirm_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation_ms: 60_000,
            document_response_ms: 15_000,
            region_list_ms: 15_000,
            product_block_ms: 5_000,
            region_picker_ms: 5_000,
            region_confirm_ms: 7_000,
        }
    }
}

impl Timeouts {
    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    pub fn document_response(&self) -> Duration {
        Duration::from_millis(self.document_response_ms)
    }

    pub fn region_list(&self) -> Duration {
        Duration::from_millis(self.region_list_ms)
    }

    pub fn product_block(&self) -> Duration {
        Duration::from_millis(self.product_block_ms)
    }

    pub fn region_picker(&self) -> Duration {
        Duration::from_millis(self.region_picker_ms)
    }

    pub fn region_confirm(&self) -> Duration {
        Duration::from_millis(self.region_confirm_ms)
    }
}
