//! Run manifest: what a report run read and wrote, kept next to the reports.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::SkippedOperator;
use crate::data::registry::DataSetEntry;

use super::ReportError;

pub const MANIFEST_FILE: &str = "report-manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEntry {
    pub path: String,
    pub rows: usize,
}

impl OutputEntry {
    pub fn new(path: &Path, rows: usize) -> Self {
        Self {
            path: path.display().to_string(),
            rows,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub run_id: Uuid,
    pub generated_at: String,
    pub roster_size: usize,
    pub skipped: Vec<SkippedOperator>,
    pub datasets: Vec<DataSetEntry>,
    pub outputs: Vec<OutputEntry>,
}

impl RunManifest {
    pub fn new(roster_size: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: chrono::Utc::now()
                .format("%Y-%m-%dT%H:%M:%SZ")
                .to_string(),
            roster_size,
            skipped: Vec::new(),
            datasets: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn write(&self, path: &Path) -> Result<(), ReportError> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
