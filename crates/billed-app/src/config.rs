//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BILLED_BILLS_COLLECTION=bills                                      │
//! │     BILLED_DEFAULT_PCT=20                                              │
//! │     BILLED_DATE_STYLE=short                                            │
//! │     BILLED_CURRENCY_SYMBOL=€                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/billed/config.toml (Linux)                               │
//! │     ~/Library/Application Support/com.billed.billed/config.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! bills_collection = "bills"
//!
//! [upload]
//! allowed_extensions = ["jpg", "jpeg", "png"]
//! allowed_mime_types = ["image/jpeg", "image/png"]
//!
//! [form]
//! default_pct = 20
//!
//! [display]
//! date_style = "short"   # short | iso
//! currency_symbol = "€"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use billed_core::validation::{FileRules, FormRules};
use billed_core::{DateStyle, DisplayOptions, BILLS_COLLECTION, DEFAULT_PCT};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// `[store]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_bills_collection")]
    pub bills_collection: String,
}

fn default_bills_collection() -> String {
    BILLS_COLLECTION.to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            bills_collection: default_bills_collection(),
        }
    }
}

/// `[upload]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSettings {
    #[serde(default = "default_extensions")]
    pub allowed_extensions: Vec<String>,

    #[serde(default = "default_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    FileRules::default().allowed_extensions
}

fn default_mime_types() -> Vec<String> {
    FileRules::default().allowed_mime_types
}

impl Default for UploadSettings {
    fn default() -> Self {
        UploadSettings {
            allowed_extensions: default_extensions(),
            allowed_mime_types: default_mime_types(),
        }
    }
}

/// `[form]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSettings {
    /// VAT rate used when the pct field is left empty.
    #[serde(default = "default_pct")]
    pub default_pct: u32,
}

fn default_pct() -> u32 {
    DEFAULT_PCT
}

impl Default for FormSettings {
    fn default() -> Self {
        FormSettings {
            default_pct: default_pct(),
        }
    }
}

/// `[display]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default)]
    pub date_style: DateStyle,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "€".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            date_style: DateStyle::default(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub upload: UploadSettings,

    #[serde(default)]
    pub form: FormSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, or the platform default)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` must exist; a missing platform file means defaults.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                info!(?path, "Loading config from file");
                Self::from_file(&path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => {
                    info!(?path, "Loading config from file");
                    Self::from_file(&path)?
                }
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.bills_collection.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "store.bills_collection must not be empty".into(),
            ));
        }

        if self.upload.allowed_extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "upload.allowed_extensions must not be empty".into(),
            ));
        }

        if self.upload.allowed_mime_types.is_empty() {
            return Err(ConfigError::Invalid(
                "upload.allowed_mime_types must not be empty".into(),
            ));
        }

        if let Some(mime) = self
            .upload
            .allowed_mime_types
            .iter()
            .find(|mime| !mime.starts_with("image/"))
        {
            return Err(ConfigError::Invalid(format!(
                "upload.allowed_mime_types only accepts image types, got: {}",
                mime
            )));
        }

        if self.form.default_pct > 100 {
            return Err(ConfigError::Invalid(format!(
                "form.default_pct must be between 0 and 100, got: {}",
                self.form.default_pct
            )));
        }

        Ok(())
    }

    /// Applies `BILLED_*` overrides read through `var`.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(collection) = var("BILLED_BILLS_COLLECTION") {
            debug!(collection = %collection, "Overriding bills collection from environment");
            self.store.bills_collection = collection;
        }

        if let Some(pct) = var("BILLED_DEFAULT_PCT") {
            match pct.parse::<u32>() {
                Ok(p) => self.form.default_pct = p,
                Err(_) => warn!(pct = %pct, "Ignoring non-numeric BILLED_DEFAULT_PCT"),
            }
        }

        if let Some(style) = var("BILLED_DATE_STYLE") {
            match style.parse() {
                Ok(parsed) => self.display.date_style = parsed,
                Err(e) => warn!(style = %style, "Ignoring BILLED_DATE_STYLE: {}", e),
            }
        }

        if let Some(symbol) = var("BILLED_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "billed", "billed")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn bills_collection(&self) -> &str {
        &self.store.bills_collection
    }

    pub fn file_rules(&self) -> FileRules {
        FileRules {
            allowed_extensions: self.upload.allowed_extensions.clone(),
            allowed_mime_types: self.upload.allowed_mime_types.clone(),
        }
    }

    pub fn form_rules(&self) -> FormRules {
        FormRules {
            default_pct: self.form.default_pct,
        }
    }

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            date_style: self.display.date_style,
            currency_symbol: self.display.currency_symbol.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
