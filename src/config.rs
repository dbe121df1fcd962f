//! Configuration handling for taskrank
//!
//! Settings are read from the first file found among:
//!
//! 1. an explicit path (`--config` or `TASKRANK_CONFIG`)
//! 2. `.taskrank.toml` in the current directory or any parent
//! 3. `~/.config/taskrank/config.toml` (platform config dir)
//!
//! Missing settings fall back to the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{CycleCheck, Strategy};
use crate::engine::{RankOptions, DEFAULT_SUGGESTION_LIMIT};

/// Project-local config file name
pub const PROJECT_CONFIG_FILE: &str = ".taskrank.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Ranking configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Strategy used when neither the flag nor the request names one
    pub default_strategy: Strategy,

    /// How many tasks Suggest returns
    pub suggestion_limit: usize,

    /// Cycle check applied by Analyze
    pub cycle_check: CycleCheck,

    /// Run the Analyze cycle check before Suggest as well
    pub suggest_checks_cycles: bool,

    /// File the configuration was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_strategy: Strategy::SmartBalance,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            cycle_check: CycleCheck::Mutual,
            suggest_checks_cycles: false,
            source: None,
        }
    }
}

impl Config {
    /// Loads configuration, preferring `explicit` when given
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            return Self::from_file(path);
        }

        let candidate = std::env::current_dir()
            .ok()
            .and_then(|dir| Self::find_project_config(&dir))
            .or_else(|| {
                Self::global_config_dir()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|path| path.is_file())
            });

        match candidate {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "taskrank", "taskrank").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Finds `.taskrank.toml` in `start` or its nearest ancestor
    pub fn find_project_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(PROJECT_CONFIG_FILE))
            .find(|path| path.is_file())
    }

    /// Reads configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;
        config.source = Some(path.to_path_buf());

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parses and validates TOML content
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.suggestion_limit == 0 {
            return Err(ConfigError::Invalid(
                "suggestion_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Options for an Analyze run
    pub fn analyze_options(&self, strategy: Strategy, today: NaiveDate) -> RankOptions {
        RankOptions::analyze(strategy, today).with_cycle_check(Some(self.cycle_check))
    }

    /// Options for a Suggest run
    pub fn suggest_options(&self, strategy: Strategy, today: NaiveDate) -> RankOptions {
        let check = self.suggest_checks_cycles.then_some(self.cycle_check);
        RankOptions::suggest(strategy, today)
            .with_cycle_check(check)
            .with_limit(self.suggestion_limit)
    }

    /// Picks the strategy: flag, then request, then configured default
    pub fn resolve_strategy(&self, flag: Option<Strategy>, requested: Option<&str>) -> Strategy {
        flag.or_else(|| requested.map(Strategy::from_name_or_default))
            .unwrap_or(self.default_strategy)
    }
}
