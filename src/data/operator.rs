//! Operator catalog: upgrade-tree definitions loaded from one JSON file per operator.
//! Layout follows the scraper output (`operators/{n}stars/{Name}.json`); the directory is walked
//! recursively so any nesting works.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::LookupError;
use crate::ledger::ResourceQuantity;

pub const DEFAULT_OPERATORS_DIR: &str = "data/operators";

/// Highest skill level; masteries start after it.
pub const MAX_SKILL_LEVEL: u8 = 7;
/// Highest mastery level per skill.
pub const MAX_MASTERY_LEVEL: u8 = 3;
/// Mastery slots a progression record can carry (skills 1-3, plus 4-5 for the one operator
/// with extra skills).
pub const MASTERY_SLOTS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse operator file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("operator '{name}' is defined twice ({} and {})", first.display(), second.display())]
    DuplicateName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// One level of an upgrade track and what it costs to reach it from the previous level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "StepRecord")]
pub struct UpgradeStep {
    pub level: u8,
    pub cost: ResourceQuantity,
}

impl UpgradeStep {
    pub fn new(level: u8, cost: ResourceQuantity) -> Self {
        Self { level, cost }
    }
}

#[derive(Debug, Deserialize)]
struct StepRecord {
    level: u8,
    #[serde(default)]
    resources: ResourceList,
}

#[derive(Debug, Deserialize)]
struct ResourceEntry {
    name: String,
    quantity: i64,
}

/// Step resources as written by the scraper: normally a list of `{name, quantity}`, but stages an
/// operator cannot reach were written as an empty object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResourceList {
    Entries(Vec<ResourceEntry>),
    Map(BTreeMap<String, i64>),
}

impl Default for ResourceList {
    fn default() -> Self {
        ResourceList::Entries(Vec::new())
    }
}

impl From<StepRecord> for UpgradeStep {
    fn from(record: StepRecord) -> Self {
        let cost = match record.resources {
            ResourceList::Entries(entries) => entries
                .into_iter()
                .map(|entry| (entry.name, entry.quantity))
                .collect(),
            ResourceList::Map(map) => map.into_iter().collect(),
        };
        UpgradeStep {
            level: record.level,
            cost,
        }
    }
}

/// Mastery track of one skill slot: three steps, mastery levels 1-3.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MasteryTrack {
    pub skill: u8,
    #[serde(default)]
    pub upgrade: Vec<UpgradeStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SkillTree {
    /// Shared skill level track, levels 1-7. Level 1 is free.
    #[serde(default)]
    pub upgrade: Vec<UpgradeStep>,
    #[serde(default)]
    pub mastery: Vec<MasteryTrack>,
}

/// Immutable upgrade tree of one operator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OperatorDefinition {
    pub name: String,
    pub stars: u8,
    #[serde(default)]
    pub elite: Vec<UpgradeStep>,
    #[serde(default)]
    pub skills: SkillTree,
}

impl OperatorDefinition {
    /// Masteries exist only above 3 stars.
    pub fn supports_mastery(&self) -> bool {
        self.stars > 3
    }

    /// Highest elite stage the catalog holds a non-empty step for.
    pub fn max_elite_in_catalog(&self) -> u8 {
        self.elite
            .iter()
            .filter(|step| !step.cost.is_empty())
            .map(|step| step.level)
            .max()
            .unwrap_or(0)
    }
}

/// Normalize an operator name for lookup: trimmed, lowercase, inner whitespace collapsed.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read-only catalog of operator definitions, keyed by normalized name.
#[derive(Debug, Clone, Default)]
pub struct OperatorCatalog {
    by_key: HashMap<String, OperatorDefinition>,
}

impl OperatorCatalog {
    /// Build from in-memory definitions. Names colliding after normalization are rejected.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = OperatorDefinition>,
    ) -> Result<Self, CatalogError> {
        Self::from_sourced(
            definitions
                .into_iter()
                .map(|definition| (PathBuf::from("<memory>"), definition)),
        )
    }

    fn from_sourced(
        definitions: impl IntoIterator<Item = (PathBuf, OperatorDefinition)>,
    ) -> Result<Self, CatalogError> {
        let mut by_key = HashMap::new();
        let mut sources: HashMap<String, PathBuf> = HashMap::new();
        for (path, definition) in definitions {
            let key = normalize_name(&definition.name);
            if let Some(first) = sources.get(&key) {
                return Err(CatalogError::DuplicateName {
                    name: definition.name,
                    first: first.clone(),
                    second: path,
                });
            }
            sources.insert(key.clone(), path);
            by_key.insert(key, definition);
        }
        Ok(Self { by_key })
    }

    /// Load every `*.json` file below `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        collect_json_files(dir, &mut paths)?;
        paths.sort();

        let mut definitions = Vec::with_capacity(paths.len());
        for path in paths {
            let definition = load_operator_file(&path)?;
            debug!(operator = %definition.name, path = %path.display(), "loaded operator");
            definitions.push((path, definition));
        }
        let catalog = Self::from_sourced(definitions)?;
        info!(count = catalog.len(), dir = %dir.display(), "operator catalog loaded");
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&OperatorDefinition> {
        self.by_key.get(&normalize_name(name))
    }

    /// Like [OperatorCatalog::get] but fails with [LookupError::UnknownOperator].
    pub fn lookup(&self, name: &str) -> Result<&OperatorDefinition, LookupError> {
        self.get(name)
            .ok_or_else(|| LookupError::UnknownOperator(name.trim().to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Definitions sorted by name.
    pub fn definitions(&self) -> Vec<&OperatorDefinition> {
        let mut all: Vec<_> = self.by_key.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

pub fn load_operator_file(path: &Path) -> Result<OperatorDefinition, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), CatalogError> {
    let entries = fs::read_dir(dir).map_err(|source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_json_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }
    Ok(())
}
