//! Roster construction: progression inputs resolved into records against the registry.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::data::registry::DataRegistry;
use crate::data::roster::ProgressionInput;
use crate::error::LookupError;
use crate::progression::OperatorProgress;

/// What to do with a roster row the catalog or curve cannot resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownOperatorPolicy {
    /// Fail the whole run on the first unresolved row.
    #[default]
    Abort,
    /// Log the row, leave it out of every aggregate and list it in [Roster::skipped].
    Skip,
}

impl UnknownOperatorPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "abort" => Some(Self::Abort),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedOperator {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Roster<'a> {
    records: Vec<OperatorProgress<'a>>,
    skipped: Vec<SkippedOperator>,
}

impl<'a> Roster<'a> {
    pub fn build(
        registry: &'a DataRegistry,
        inputs: &[ProgressionInput],
        policy: UnknownOperatorPolicy,
    ) -> Result<Self, LookupError> {
        let mut records = Vec::with_capacity(inputs.len());
        let mut skipped = Vec::new();
        for input in inputs {
            match OperatorProgress::new(&registry.operators, &registry.curve, input) {
                Ok(record) => records.push(record),
                Err(err) if policy == UnknownOperatorPolicy::Skip => {
                    warn!(operator = %input.name, error = %err, "skipping roster row");
                    skipped.push(SkippedOperator {
                        name: input.name.clone(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
        info!(
            records = records.len(),
            skipped = skipped.len(),
            "roster resolved"
        );
        Ok(Self { records, skipped })
    }

    pub fn records(&self) -> &[OperatorProgress<'a>] {
        &self.records
    }

    pub fn skipped(&self) -> &[SkippedOperator] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
