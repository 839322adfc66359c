//! Run configuration
//!
//! Read from a TOML file (default `depbump.toml` next to the job file):
//!
//! ```toml
//! raise-on-ignored = true
//! update-strategy = "bump-versions-if-necessary"
//!
//! [cooldown]
//! default-days = 3
//! semver-major-days = 14
//! exclude = ["internal-*"]
//!
//! [[ignore]]
//! dependency-name = "rails"
//! versions = [">= 8.0"]
//! ```
//!
//! Command-line flags are applied on top with [`Config::with_overrides`].

use crate::domain::IgnoreRule;
use crate::error::ConfigError;
use crate::grammar::UpdateStrategy;
use crate::update::CooldownOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up next to the job file
pub const DEFAULT_CONFIG_FILE: &str = "depbump.toml";

/// Ignore expressions for one dependency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IgnoreEntry {
    pub dependency_name: String,
    #[serde(default)]
    pub versions: Vec<String>,
}

/// Settings shared by every dependency of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Fail a dependency when ignore rules remove every candidate
    pub raise_on_ignored: bool,
    pub update_strategy: UpdateStrategy,
    pub cooldown: CooldownOptions,
    pub ignore: Vec<IgnoreEntry>,
}

impl Config {
    /// Read and validate a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse TOML content; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the explicit config file, or the default one beside the job file
    ///
    /// A missing default file yields the default configuration; a missing
    /// explicit file is an error.
    pub fn load(explicit: Option<&Path>, job_path: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let path = default_path(job_path);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply command-line overrides (builder pattern)
    pub fn with_overrides(mut self, cooldown: Option<Duration>, strict_ignores: bool) -> Self {
        if let Some(cooldown) = cooldown {
            self.cooldown.default_days = duration_days(cooldown);
        }
        if strict_ignores {
            self.raise_on_ignored = true;
        }
        self
    }

    /// Ignore rules configured for `dependency`
    pub fn ignore_rules_for(&self, dependency: &str) -> Vec<IgnoreRule> {
        self.ignore
            .iter()
            .filter(|entry| entry.dependency_name == dependency)
            .flat_map(|entry| entry.versions.iter())
            .filter_map(|expr| IgnoreRule::parse(expr).ok())
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for entry in &self.ignore {
            for expr in &entry.versions {
                IgnoreRule::parse(expr).map_err(|e| ConfigError::InvalidIgnoreRule {
                    dependency: entry.dependency_name.clone(),
                    rule: expr.clone(),
                    message: e.to_string(),
                })?;
            }
        }
        Ok(())
    }
}

/// `depbump.toml` in the job file's directory
pub fn default_path(job_path: &Path) -> PathBuf {
    job_path
        .parent()
        .map(|dir| dir.join(DEFAULT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Parse duration string in format: Nd (days), Nw (weeks), Nm (months)
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    let invalid = || ConfigError::InvalidDuration {
        value: s.to_string(),
    };

    let (num_str, days_per_unit) = if let Some(n) = s.strip_suffix('d') {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('w') {
        (n, 7)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 30)
    } else {
        return Err(invalid());
    };

    let num: u64 = num_str.parse().map_err(|_| invalid())?;
    Ok(Duration::from_secs(num * days_per_unit * 24 * 60 * 60))
}

/// Whole days in a duration, saturating
pub fn duration_days(duration: Duration) -> u32 {
    u32::try_from(duration.as_secs() / 86_400).unwrap_or(u32::MAX)
}
