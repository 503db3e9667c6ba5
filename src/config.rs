//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.adminsift.toml` files.

use crate::export::ExportOptions;
use crate::risk::{self, ThresholdTable};
use crate::view::RiskTables;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working and dataset directories.
pub const CONFIG_FILE: &str = ".adminsift.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Risk bucketing thresholds.
    #[serde(default)]
    pub risk: RiskConfig,

    /// CSV export settings.
    #[serde(default)]
    pub export: ExportConfig,

    /// View settings.
    #[serde(default)]
    pub view: ViewConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory export files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            verbose: false,
        }
    }
}

fn default_output_dir() -> String {
    "exports".to_string()
}

/// Threshold cut points, ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Dispute-rate bounds in percent: low, medium.
    #[serde(default = "default_dispute_rate")]
    pub dispute_rate: Vec<f64>,

    /// Risk-score bounds on 0-100: low, medium, high.
    #[serde(default = "default_risk_score")]
    pub risk_score: Vec<f64>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            dispute_rate: default_dispute_rate(),
            risk_score: default_risk_score(),
        }
    }
}

fn default_dispute_rate() -> Vec<f64> {
    risk::DISPUTE_RATE_BOUNDS.to_vec()
}

fn default_risk_score() -> Vec<f64> {
    risk::RISK_SCORE_BOUNDS.to_vec()
}

impl RiskConfig {
    /// Build validated threshold tables.
    pub fn tables(&self) -> Result<RiskTables> {
        Ok(RiskTables {
            dispute_rate: ThresholdTable::dispute_rate(&self.dispute_rate)
                .context("Invalid [risk] dispute_rate thresholds")?,
            risk_score: ThresholdTable::risk_score(&self.risk_score)
                .context("Invalid [risk] risk_score thresholds")?,
        })
    }
}

/// CSV export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Symbol prefixed to currency values.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Field delimiter; must be a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_currency_symbol() -> String {
    "₦".to_string()
}

fn default_delimiter() -> char {
    ','
}

impl ExportConfig {
    pub fn options(&self) -> Result<ExportOptions> {
        if !self.delimiter.is_ascii() {
            anyhow::bail!(
                "Export delimiter must be an ASCII character, got '{}'",
                self.delimiter
            );
        }
        Ok(ExportOptions {
            currency_symbol: self.currency_symbol.clone(),
            delimiter: self.delimiter as u8,
        })
    }
}

/// View settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Simulated refresh delay in milliseconds.
    #[serde(default = "default_refresh_delay")]
    pub refresh_delay_ms: u64,

    /// Maximum rows printed in the Markdown view (0 = all).
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            refresh_delay_ms: default_refresh_delay(),
            page_size: default_page_size(),
        }
    }
}

fn default_refresh_delay() -> u64 {
    1500
}

fn default_page_size() -> usize {
    25
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Find and load the configuration for a run.
    ///
    /// Lookup order: the explicit path, then `.adminsift.toml` in the
    /// working directory, then the one next to the dataset. Returns the
    /// file used, or `None` when falling back to defaults. A file that
    /// exists but fails to parse is an error.
    pub fn resolve(explicit: Option<&Path>, data: &Path) -> Result<(Self, Option<PathBuf>)> {
        Self::resolve_from(explicit, Path::new("."), data)
    }

    /// [`Config::resolve`] with an explicit working directory.
    pub fn resolve_from(
        explicit: Option<&Path>,
        working_dir: &Path,
        data: &Path,
    ) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        let data_dir = if data.is_dir() { Some(data) } else { data.parent() };
        let candidates = std::iter::once(working_dir).chain(data_dir);

        for dir in candidates {
            if let Some(config) = Self::load_from_dir(dir)? {
                return Ok((config, Some(dir.join(CONFIG_FILE))));
            }
        }

        Ok((Self::default(), None))
    }

    /// Try to load configuration from a directory (e.g. the dataset directory).
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were explicitly given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.export_dir {
            self.general.output_dir = dir.display().to_string();
        }

        if let Some(ref symbol) = args.currency {
            self.export.currency_symbol = symbol.clone();
        }

        if let Some(delay) = args.refresh_delay_ms {
            self.view.refresh_delay_ms = delay;
        }

        if let Some(limit) = args.limit {
            self.view.page_size = limit;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Log level after merging: `--quiet` wins, then `verbose` from
    /// either the CLI or `[general]`.
    pub fn log_level(&self, args: &crate::cli::Args) -> tracing::Level {
        if self.general.verbose && !args.quiet {
            tracing::Level::DEBUG
        } else {
            args.log_level()
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
