//! Configuration and settings for the `netfacts` binary.
//!
//! This module consolidates CLI argument parsing and TOML configuration
//! loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use config::Config as RawConfig;
use serde::Deserialize;

/// netfacts - network fact collection from captured command output
#[derive(Parser, Debug)]
#[command(name = "netfacts")]
#[command(about = "Assembles network facts from captured diagnostic command output")]
pub struct Args {
    /// Path to the configuration file (TOML format)
    #[arg(short = 'c', value_name = "CONFIG_PATH")]
    pub config: PathBuf,
}

/// File-backed configuration for `netfacts`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding the captured command output files.
    pub dump_dir: PathBuf,

    /// Path to the log file. Logs go to stderr when unset.
    pub log_path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from the specified path with environment variable
    /// overrides (prefix `NETFACTS_`).
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = RawConfig::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("NETFACTS").try_parsing(true))
            .build()
            .with_context(|| format!("Failed to load config from: {}", path.display()))?;

        let config: Self = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        Ok(config)
    }
}
