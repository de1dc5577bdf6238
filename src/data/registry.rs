//! Data registry: the read-only catalogs every run needs, loaded once and shared.
//! Records borrow from it; nothing here is mutated after loading.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Settings;
use crate::data::curve::ProgressionCurveTable;
use crate::data::material::MaterialCatalog;
use crate::data::operator::OperatorCatalog;
use crate::error::Result;

/// Where one dataset came from and how many entries it held, recorded in the run manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSetEntry {
    pub name: String,
    pub path: String,
    pub entries: usize,
}

impl DataSetEntry {
    fn new(name: &str, path: &Path, entries: usize) -> Self {
        Self {
            name: name.to_string(),
            path: path.display().to_string(),
            entries,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DataRegistry {
    pub operators: OperatorCatalog,
    pub curve: ProgressionCurveTable,
    pub materials: MaterialCatalog,
    pub datasets: Vec<DataSetEntry>,
}

impl DataRegistry {
    /// Build from catalogs already in memory.
    pub fn from_parts(
        operators: OperatorCatalog,
        curve: ProgressionCurveTable,
        materials: MaterialCatalog,
    ) -> Self {
        Self {
            operators,
            curve,
            materials,
            datasets: Vec::new(),
        }
    }

    /// Load operator catalog, curve table and material catalog from the configured locations.
    pub fn load(settings: &Settings) -> Result<Arc<Self>> {
        let operators = OperatorCatalog::load_dir(&settings.operators_dir)?;
        let curve = ProgressionCurveTable::load_csv(&settings.curve_path)?;
        let materials = MaterialCatalog::load_dir(&settings.materials_dir)?;

        let datasets = vec![
            DataSetEntry::new("operators", &settings.operators_dir, operators.len()),
            DataSetEntry::new("curve", &settings.curve_path, curve.len()),
            DataSetEntry::new("materials", &settings.materials_dir, materials.len()),
        ];
        info!(
            operators = operators.len(),
            curve_points = curve.len(),
            materials = materials.len(),
            "data registry loaded"
        );
        Ok(Arc::new(Self {
            operators,
            curve,
            materials,
            datasets,
        }))
    }
}
