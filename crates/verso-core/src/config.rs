//! Configuration management for verso.
//!
//! Loads configuration from ${VERSO_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod paths {
    //! Path resolution for verso configuration and data directories.
    //!
    //! VERSO_HOME resolution order:
    //! 1. VERSO_HOME environment variable (if set)
    //! 2. ~/.config/verso (default)

    use std::path::PathBuf;

    /// Returns the user's home directory, if the platform exposes one.
    pub fn home_dir() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
    }

    /// Returns the verso home directory.
    ///
    /// Checks VERSO_HOME env var first, falls back to ~/.config/verso.
    ///
    /// # Panics
    /// Panics when neither VERSO_HOME nor a home directory can be determined.
    pub fn verso_home() -> PathBuf {
        if let Ok(home) = std::env::var("VERSO_HOME") {
            return PathBuf::from(home);
        }

        home_dir()
            .map(|h| h.join(".config").join("verso"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        verso_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        verso_home().join("logs")
    }
}

/// Per-provider settings under `[providers.gemini]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiProviderConfig {
    /// API key; env vars are the fallback.
    pub api_key: Option<String>,
    /// Endpoint override; the GEMINI_BASE_URL env var takes precedence.
    pub base_url: Option<String>,
}

/// Provider configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub gemini: GeminiProviderConfig,
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The Gemini model to use.
    pub model: String,

    /// Fixed sampling temperature for every request.
    pub temperature: f32,

    /// Maximum tokens for responses (optional).
    pub max_output_tokens: Option<u32>,

    /// Provider configuration (API key, base URL).
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl Config {
    const DEFAULT_MODEL: &str = "gemini-2.0-flash";
    const DEFAULT_TEMPERATURE: f32 = 0.5;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: Self::DEFAULT_MODEL.to_string(),
            temperature: Self::DEFAULT_TEMPERATURE,
            max_output_tokens: None,
            providers: ProvidersConfig::default(),
        }
    }
}

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}
