//! Roster-wide aggregation. Every reduction is a key-wise sum over independent records, so the
//! work is split across rayon workers and the result does not depend on record order.

pub mod roster;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::ledger::ResourceQuantity;
use crate::parallel::{batch_ranges, WorkerPool};
use crate::progression::{OperatorProgress, OperatorSummary};

pub use roster::{Roster, SkippedOperator, UnknownOperatorPolicy};

/// Which resource view of a record to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Total,
    Spent,
    Needed,
}

impl Attribute {
    pub fn select(self, record: &OperatorProgress<'_>) -> ResourceQuantity {
        match self {
            Attribute::Total => record.total_resources(),
            Attribute::Spent => record.spent_resources(),
            Attribute::Needed => record.needed_resources(),
        }
    }
}

/// Key-wise sum of `f(record)` over every record. Empty input gives an empty quantity.
pub fn aggregate_with<F>(records: &[OperatorProgress<'_>], f: F) -> ResourceQuantity
where
    F: Fn(&OperatorProgress<'_>) -> ResourceQuantity + Sync + Send,
{
    records
        .par_iter()
        .map(f)
        .reduce(ResourceQuantity::default, |acc, quantity| acc + quantity)
}

pub fn aggregate_attribute(
    records: &[OperatorProgress<'_>],
    attribute: Attribute,
) -> ResourceQuantity {
    aggregate_with(records, |record| attribute.select(record))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterTotals {
    pub total: ResourceQuantity,
    pub spent: ResourceQuantity,
    pub needed: ResourceQuantity,
}

impl RosterTotals {
    pub fn from_records(records: &[OperatorProgress<'_>]) -> Self {
        let (total, spent) = rayon::join(
            || aggregate_attribute(records, Attribute::Total),
            || aggregate_attribute(records, Attribute::Spent),
        );
        let needed = aggregate_attribute(records, Attribute::Needed);
        debug!(
            records = records.len(),
            resources = total.len(),
            "roster totals aggregated"
        );
        Self {
            total,
            spent,
            needed,
        }
    }
}

/// Per-record summaries, in record order, computed in batches on `pool`.
pub fn summarize(
    records: &[OperatorProgress<'_>],
    pool: &WorkerPool,
) -> Result<Vec<OperatorSummary>, rayon::ThreadPoolBuildError> {
    pool.install(|| {
        let ranges = batch_ranges(records.len(), rayon::current_num_threads());
        ranges
            .par_iter()
            .map(|range| {
                debug!(start = range.start, end = range.end, "summarizing batch");
                records[range.clone()]
                    .iter()
                    .map(OperatorProgress::summary)
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    })
}
