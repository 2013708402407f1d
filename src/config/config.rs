use crate::api_client::DEFAULT_BASE_URL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const API_KEY_ENV: &str = "PIXABAY_API_KEY";
pub const API_URL_ENV: &str = "PIXSEARCH_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Search endpoint
    pub base_url: String,

    /// Pixabay API key; the PIXABAY_API_KEY environment variable wins
    pub key: String,

    /// Request timeout; unset leaves the transport default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Reject queries shorter than two characters
    pub strict_validation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for notification icons
    pub use_glyphs: bool,

    /// Seconds a notification stays on screen
    pub toast_seconds: u64,

    /// Show likes/views/comments/downloads under each card
    pub show_stats: bool,

    pub icons: IconConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub warning: String,
    pub success: String,
    pub info: String,
    pub error: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            key: String::new(),
            timeout_secs: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strict_validation: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            toast_seconds: 5,
            show_stats: true,
            icons: IconConfig::default(),
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            warning: "⚠️".to_string(),
            success: "✅".to_string(),
            info: "ℹ️".to_string(),
            error: "❌".to_string(),
        }
    }
}

impl IconConfig {
    /// ASCII alternatives for terminals without glyph support
    pub fn simple() -> Self {
        Self {
            warning: "[!]".to_string(),
            success: "[OK]".to_string(),
            info: "[i]".to_string(),
            error: "[X]".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load config from the default location, creating it on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config.with_env_overrides());
        }

        Ok(Self::load_from(&config_path)?.with_env_overrides())
    }

    /// Parse a config file without touching the environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        if !config.display.use_glyphs {
            config.display.icons = IconConfig::simple();
        }

        debug!(target: "config", "Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        info!(target: "config", "Saved config to {}", path.display());

        Ok(())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.key = key.trim().to_string();
            }
        }
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
        self
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("pixsearch").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# pixsearch configuration file
# Location: ~/.config/pixsearch/config.toml (Linux)
#           ~/Library/Application Support/pixsearch/config.toml (macOS)
#           %APPDATA%\pixsearch\config.toml (Windows)

[api]
# Search endpoint
base_url = "https://pixabay.com/api/"

# Your Pixabay API key (https://pixabay.com/api/docs/)
# The PIXABAY_API_KEY environment variable overrides this value
key = ""

# Request timeout in seconds (leave commented to use the HTTP client default)
# timeout_secs = 15

[search]
# Reject queries shorter than two characters
strict_validation = true

[display]
# Use Unicode glyphs for notification icons
# Set to false for ASCII-only mode
use_glyphs = true

# How long notifications stay visible
toast_seconds = 5

# Show likes/views/comments/downloads under each card
show_stats = true

[display.icons]
warning = "⚠️"
success = "✅"
info = "ℹ️"
error = "❌"
"#
        .to_string()
    }

    /// Initialize config with a setup wizard
    pub fn init_wizard() -> Result<Self> {
        println!("pixsearch Configuration Setup");
        println!("=============================");

        print!("Does your terminal support Unicode icons? (y/n) [y]: ");
        std::io::Write::flush(&mut std::io::stdout())?;
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        let use_glyphs = !input.trim().eq_ignore_ascii_case("n");

        let mut config = Config::default();
        config.display.use_glyphs = use_glyphs;
        if !use_glyphs {
            config.display.icons = IconConfig::simple();
        }

        print!("Pixabay API key (leave empty to use {}): ", API_KEY_ENV);
        std::io::Write::flush(&mut std::io::stdout())?;
        input.clear();
        std::io::stdin().read_line(&mut input)?;
        config.api.key = input.trim().to_string();

        config.save()?;

        println!("\nConfiguration saved to: {:?}", Config::get_config_path()?);
        println!("You can edit this file directly to customize further.");

        Ok(config)
    }
}
