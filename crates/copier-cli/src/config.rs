//! Configuration file management for copier.
//!
//! Provides a TOML-based config file at `~/.config/copier/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Batch size used when nothing else is configured.
pub const DEFAULT_BATCH_SIZE: usize = 16;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub copy: CopySection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CopySection {
    /// Units requested per batch read.
    pub batch_size: usize,
    /// Upper bound on steps for `copy-all`. Absent means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the copier config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/copier` or `~/.config/copier`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("copier");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("copier")
}

/// Return the path to the copier config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file.
///
/// Returns `Ok(None)` when the file does not exist. A file that exists but
/// cannot be parsed is an error.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopierConfig {
    pub batch_size: usize,
    pub max_steps: Option<usize>,
}

impl CopierConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Batch size: `cli_batch_size` > `COPIER_BATCH_SIZE` env > `copy.batch_size`
    ///   > [`DEFAULT_BATCH_SIZE`]
    /// - Step limit: `cli_max_steps` > `COPIER_MAX_STEPS` env > `copy.max_steps` > unbounded
    pub fn resolve(cli_batch_size: Option<usize>, cli_max_steps: Option<usize>) -> Result<Self> {
        let file_config = load_config()?;

        let batch_size = if let Some(n) = cli_batch_size {
            n
        } else if let Some(n) = env_usize("COPIER_BATCH_SIZE")? {
            n
        } else if let Some(ref cfg) = file_config {
            cfg.copy.batch_size
        } else {
            DEFAULT_BATCH_SIZE
        };

        let max_steps = if cli_max_steps.is_some() {
            cli_max_steps
        } else if let Some(n) = env_usize("COPIER_MAX_STEPS")? {
            Some(n)
        } else {
            file_config.and_then(|cfg| cfg.copy.max_steps)
        };

        Ok(Self {
            batch_size,
            max_steps,
        })
    }
}

/// Read a non-negative integer from the environment. Unset is `None`.
fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{key} env var is not a non-negative integer: {raw:?}")),
        Err(_) => Ok(None),
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
