//! # Client Configuration
//!
//! Settings of the employee screens: which proof files are accepted, the
//! VAT percentage fallback, the display locale, and the log filter.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BILLED_LOCALE=en                                                   │
//! │     BILLED_DEFAULT_PCT=10                                              │
//! │     BILLED_LOG=debug                                                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/billed/billed.toml (Linux)                               │
//! │     ~/Library/Application Support/com.billed.billed/billed.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     jpg/jpeg/png, pct 20, locale fr                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # billed.toml
//! [upload]
//! allowed_content_types = ["image/jpeg", "image/jpg", "image/png"]
//! invalid_type_message = "Invalid file type. Please upload an image file (jpg, jpeg, or png)."
//!
//! [bill]
//! default_pct = 20
//!
//! [display]
//! locale = "fr"  # fr | en
//!
//! [logging]
//! filter = "info,billed=debug"
//! ```

use std::path::PathBuf;

use billed_core::{Locale, ALLOWED_PROOF_CONTENT_TYPES, DEFAULT_PCT, INVALID_FILE_TYPE_MESSAGE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Upload Settings
// =============================================================================

/// Proof file acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Declared content types accepted for a proof file.
    #[serde(default = "default_allowed_content_types")]
    pub allowed_content_types: Vec<String>,

    /// Alert shown when a file of another type is picked.
    #[serde(default = "default_invalid_type_message")]
    pub invalid_type_message: String,
}

fn default_allowed_content_types() -> Vec<String> {
    ALLOWED_PROOF_CONTENT_TYPES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_invalid_type_message() -> String {
    INVALID_FILE_TYPE_MESSAGE.to_string()
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            allowed_content_types: default_allowed_content_types(),
            invalid_type_message: default_invalid_type_message(),
        }
    }
}

// =============================================================================
// Bill Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillConfig {
    /// VAT percentage used when the form's `pct` is unusable (0..=100).
    #[serde(default = "default_pct")]
    pub default_pct: u32,
}

fn default_pct() -> u32 {
    DEFAULT_PCT
}

impl Default for BillConfig {
    fn default() -> Self {
        BillConfig {
            default_pct: default_pct(),
        }
    }
}

// =============================================================================
// Display Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub locale: Locale,
}

// =============================================================================
// Logging Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,billed=debug".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub bill: BillConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from `config_path`, else `billed.toml` in the platform config dir
    /// 3. Apply environment variable overrides
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        if self.upload.allowed_content_types.is_empty() {
            return Err(ClientError::Config(
                "upload.allowed_content_types must not be empty".into(),
            ));
        }

        if self.bill.default_pct > 100 {
            return Err(ClientError::Config(format!(
                "bill.default_pct must be between 0 and 100, got: {}",
                self.bill.default_pct
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides looked up by environment variable name.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(locale) = lookup("BILLED_LOCALE") {
            match locale.parse() {
                Ok(parsed) => {
                    debug!(locale = %locale, "Overriding locale from environment");
                    self.display.locale = parsed;
                }
                Err(e) => warn!(error = %e, "Ignoring BILLED_LOCALE"),
            }
        }

        if let Some(pct) = lookup("BILLED_DEFAULT_PCT") {
            if let Ok(p) = pct.trim().parse::<u32>() {
                self.bill.default_pct = p;
            }
        }

        if let Some(filter) = lookup("BILLED_LOG") {
            self.logging.filter = filter;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "billed", "billed")
            .map(|dirs| dirs.config_dir().join("billed.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn locale(&self) -> Locale {
        self.display.locale
    }

    pub fn default_pct(&self) -> u32 {
        self.bill.default_pct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.default_pct(), 20);
        assert_eq!(config.locale(), Locale::Fr);
        assert_eq!(config.upload.allowed_content_types.len(), 3);
        assert_eq!(config.upload.invalid_type_message, INVALID_FILE_TYPE_MESSAGE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.bill.default_pct = 101;
        assert!(config.validate().is_err());

        config.bill.default_pct = 0;
        assert!(config.validate().is_ok());

        config.upload.allowed_content_types.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [display]
            locale = "en"
            "#,
        )
        .unwrap();
        assert_eq!(config.locale(), Locale::En);
        assert_eq!(config.default_pct(), 20);
        assert_eq!(config.logging.filter, "info,billed=debug");
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BILLED_LOCALE", "en"),
            ("BILLED_DEFAULT_PCT", "10"),
            ("BILLED_LOG", "warn"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.locale(), Locale::En);
        assert_eq!(config.default_pct(), 10);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut config = ClientConfig::default();
        config.apply_overrides(|key| match key {
            "BILLED_LOCALE" => Some("klingon".to_string()),
            "BILLED_DEFAULT_PCT" => Some("lots".to_string()),
            _ => None,
        });
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("billed-{}", uuid::Uuid::new_v4()))
            .join("billed.toml");

        let mut config = ClientConfig::default();
        config.bill.default_pct = 15;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[upload]"));
        assert!(contents.contains("[bill]"));

        let loaded: ClientConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.default_pct(), 15);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = std::env::temp_dir().join(format!("billed-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("billed.toml");
        std::fs::write(&path, "[bill]\ndefault_pct = 250\n").unwrap();

        assert!(matches!(
            ClientConfig::load(Some(path.clone())),
            Err(ClientError::Config(_))
        ));
        assert_eq!(ClientConfig::load_or_default(Some(path)).default_pct(), 20);

        let _ = std::fs::remove_dir_all(dir);
    }
}
