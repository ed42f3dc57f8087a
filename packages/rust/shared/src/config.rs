//! Application configuration for ytextract.
//!
//! User config lives at `~/.ytextract/ytextract.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "ytextract.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".ytextract";

// ---------------------------------------------------------------------------
// Config structs (matching ytextract.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// How many feed entries to parse per channel.
    #[serde(default = "default_max_feed_entries")]
    pub max_feed_entries: usize,

    /// Preferred transcript language; English is always tried after it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_language: Option<String>,

    /// Pretty-print JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_feed_entries: default_max_feed_entries(),
            transcript_language: None,
            pretty: true,
        }
    }
}

fn default_max_feed_entries() -> usize {
    1
}
fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Runtime options (merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime feed parsing options.
#[derive(Debug, Clone)]
pub struct FeedOptions {
    /// Entries beyond this count are skipped without being parsed.
    pub max_entries: usize,
}

impl From<&AppConfig> for FeedOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_entries: config.defaults.max_feed_entries,
        }
    }
}

/// Runtime transcript selection options.
#[derive(Debug, Clone, Default)]
pub struct TranscriptOptions {
    /// Requested language tag, e.g. `es`. `None` means English.
    pub language: Option<String>,
}

impl From<&AppConfig> for TranscriptOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            language: config.defaults.transcript_language.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.ytextract/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ExtractError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.ytextract/ytextract.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        ExtractError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    if config.defaults.max_feed_entries == 0 {
        return Err(ExtractError::config(format!(
            "{}: defaults.max_feed_entries must be at least 1",
            path.display()
        )));
    }

    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ExtractError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ExtractError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ExtractError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
