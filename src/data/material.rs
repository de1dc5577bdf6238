//! Material catalog: tier, drop availability and LMD value per material, joined onto the
//! roster-wide resources report. Recipes in the source files are not read.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data::operator::{collect_json_files, CatalogError};

pub const DEFAULT_MATERIALS_DIR: &str = "data/resources";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialInfo {
    pub name: String,
    #[serde(default)]
    pub tier: u8,
    #[serde(default)]
    pub droppable: bool,
    #[serde(default)]
    pub lmd: i64,
}

#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    by_name: HashMap<String, MaterialInfo>,
}

impl MaterialCatalog {
    pub fn from_materials(materials: impl IntoIterator<Item = MaterialInfo>) -> Self {
        Self {
            by_name: materials
                .into_iter()
                .map(|material| (material.name.clone(), material))
                .collect(),
        }
    }

    /// Load every `*.json` below `dir`. A missing directory yields an empty catalog.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            info!(dir = %dir.display(), "no material catalog, report columns left blank");
            return Ok(Self::default());
        }
        let mut paths = Vec::new();
        collect_json_files(dir, &mut paths)?;
        paths.sort();

        let mut materials = Vec::with_capacity(paths.len());
        for path in paths {
            let raw = fs::read_to_string(&path).map_err(|source| CatalogError::Io {
                path: path.clone(),
                source,
            })?;
            let material: MaterialInfo =
                serde_json::from_str(&raw).map_err(|source| CatalogError::Json {
                    path: path.clone(),
                    source,
                })?;
            materials.push(material);
        }
        let catalog = Self::from_materials(materials);
        info!(count = catalog.len(), dir = %dir.display(), "material catalog loaded");
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&MaterialInfo> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
