//! Run settings: file locations, worker count and unknown-operator policy.
//!
//! Defaults mirror the original data layout. An optional YAML file (`ARKLEDGER_CONFIG`, default
//! `arkledger.yaml`) overrides them, and environment variables override the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::UnknownOperatorPolicy;
use crate::data::curve::DEFAULT_CURVE_PATH;
use crate::data::inventory::{DEFAULT_EVENTS_PATH, DEFAULT_INVENTORY_PATH};
use crate::data::material::DEFAULT_MATERIALS_DIR;
use crate::data::operator::DEFAULT_OPERATORS_DIR;
use crate::data::roster::DEFAULT_ROSTER_PATH;
use crate::report::DEFAULT_REPORTS_DIR;

pub const DEFAULT_CONFIG_PATH: &str = "arkledger.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub operators_dir: PathBuf,
    pub materials_dir: PathBuf,
    pub curve_path: PathBuf,
    pub roster_path: PathBuf,
    pub inventory_path: PathBuf,
    pub events_path: PathBuf,
    pub reports_dir: PathBuf,
    /// Worker threads for per-operator computation; 0 uses every core.
    pub workers: usize,
    pub on_unknown: UnknownOperatorPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            operators_dir: PathBuf::from(DEFAULT_OPERATORS_DIR),
            materials_dir: PathBuf::from(DEFAULT_MATERIALS_DIR),
            curve_path: PathBuf::from(DEFAULT_CURVE_PATH),
            roster_path: PathBuf::from(DEFAULT_ROSTER_PATH),
            inventory_path: PathBuf::from(DEFAULT_INVENTORY_PATH),
            events_path: PathBuf::from(DEFAULT_EVENTS_PATH),
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            workers: 0,
            on_unknown: UnknownOperatorPolicy::default(),
        }
    }
}

impl Settings {
    /// Defaults, then the config file, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let (path, explicit) = match std::env::var("ARKLEDGER_CONFIG") {
            Ok(path) => (PathBuf::from(path), true),
            Err(_) => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };
        let mut settings = if explicit || path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        debug!(?settings, "settings resolved");
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `ARKLEDGER_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(data_dir) = lookup("ARKLEDGER_DATA_DIR") {
            let data_dir = PathBuf::from(data_dir);
            self.operators_dir = data_dir.join("operators");
            self.materials_dir = data_dir.join("resources");
            self.curve_path = data_dir.join("explmd.csv");
        }
        if let Some(roster) = lookup("ARKLEDGER_ROSTER") {
            self.roster_path = PathBuf::from(roster);
        }
        if let Some(reports) = lookup("ARKLEDGER_REPORTS_DIR") {
            self.reports_dir = PathBuf::from(reports);
        }
        if let Some(workers) = lookup("ARKLEDGER_WORKERS") {
            self.workers = workers
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "ARKLEDGER_WORKERS",
                    value: workers.clone(),
                })?;
        }
        if let Some(policy) = lookup("ARKLEDGER_ON_UNKNOWN") {
            self.on_unknown =
                UnknownOperatorPolicy::parse(&policy).ok_or(ConfigError::InvalidValue {
                    key: "ARKLEDGER_ON_UNKNOWN",
                    value: policy.clone(),
                })?;
        }
        Ok(())
    }
}
