//! Configuration management for AtacFlux CLI
//!
//! Optional request overrides in ~/.config/atacflux/config.toml. The API key
//! is never stored here; it comes from ANTHROPIC_API_KEY only.

use anyhow::{Context, Result};
use atacflux::services::anthropic::DEFAULT_BASE_URL;
use atacflux::CompletionOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "atacflux";
const CONFIG_FILE: &str = "config.toml";

/// CLI Configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub base_url: Option<String>,
}

/// Values given on the command line, which win over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub base_url: Option<String>,
}

/// Everything a run needs besides the credential
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub options: CompletionOptions,
    pub base_url: String,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir.join(CONFIG_FILE))
    }

    /// Load the default config file, or defaults if there is none
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load an explicit config file; it must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;

        Ok(config)
    }

    /// Apply CLI overrides, then built-in defaults
    pub fn resolve(&self, overrides: Overrides) -> Settings {
        let defaults = CompletionOptions::default();

        Settings {
            options: CompletionOptions {
                model: overrides
                    .model
                    .or_else(|| self.model.clone())
                    .unwrap_or(defaults.model),
                max_tokens: overrides
                    .max_tokens
                    .or(self.max_tokens)
                    .unwrap_or(defaults.max_tokens),
            },
            base_url: overrides
                .base_url
                .or_else(|| self.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_resolves_to_defaults() {
        let settings = Config::default().resolve(Overrides::default());

        assert_eq!(settings.options.model, "claude-sonnet-4-20250514");
        assert_eq!(settings.options.max_tokens, 1000);
        assert_eq!(settings.base_url, "https://api.anthropic.com");
    }

    #[test]
    fn test_file_values_are_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = \"claude-opus-4-20250514\"\nmax_tokens = 2000").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.model.as_deref(), Some("claude-opus-4-20250514"));
        assert_eq!(config.max_tokens, Some(2000));
        assert_eq!(config.base_url, None);
    }

    #[test]
    fn test_flags_win_over_file() {
        let config = Config {
            model: Some("from-file".to_string()),
            max_tokens: Some(2000),
            base_url: Some("http://file".to_string()),
        };
        let settings = config.resolve(Overrides {
            model: Some("from-flag".to_string()),
            max_tokens: None,
            base_url: None,
        });

        assert_eq!(settings.options.model, "from-flag");
        assert_eq!(settings.options.max_tokens, 2000);
        assert_eq!(settings.base_url, "http://file");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_tokens = \"lots\"").unwrap();

        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("absent.toml")).is_err());
    }
}
