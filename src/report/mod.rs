//! Report projection: roster totals and per-operator summaries written as `;`-delimited CSV,
//! the resources report again as an `.xlsx` workbook, plus a JSON manifest describing the run.

pub mod manifest;
pub mod workbook;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::aggregate::RosterTotals;
use crate::data::material::MaterialCatalog;
use crate::data::operator::MASTERY_SLOTS;
use crate::ledger::ResourceQuantity;
use crate::progression::{percentage, OperatorSummary};

pub use manifest::{OutputEntry, RunManifest, MANIFEST_FILE};
pub use workbook::write_resources_workbook;

pub const DEFAULT_REPORTS_DIR: &str = "files/reports";

/// Mastery columns shown in the operator report; slots 4 and 5 stay in the JSON output only.
const REPORTED_MASTERY_SLOTS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write CSV {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("failed to write workbook {}: {source}", path.display())]
    Xlsx {
        path: PathBuf,
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("failed to encode manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// One line of the roster-wide resources report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRow {
    pub resource: String,
    pub tier: Option<u8>,
    pub lmd: Option<i64>,
    pub droppable: Option<bool>,
    pub total: i64,
    pub spent: i64,
    pub needed: i64,
    pub owned: i64,
    pub missing: i64,
    pub percentage: f64,
}

/// Rows for every resource named in the roster's total or spent quantities, sorted by name.
/// `missing` is what is still needed after what the player owns, never below zero.
pub fn resource_rows(
    totals: &RosterTotals,
    owned: &ResourceQuantity,
    materials: &MaterialCatalog,
) -> Vec<ResourceRow> {
    let mut names: Vec<&str> = totals.total.names().chain(totals.spent.names()).collect();
    names.sort_unstable();
    names.dedup();

    names
        .into_iter()
        .map(|name| {
            let info = materials.get(name);
            let total = totals.total.get(name);
            let spent = totals.spent.get(name);
            let needed = totals.needed.get(name);
            let held = owned.get(name);
            ResourceRow {
                resource: name.to_string(),
                tier: info.map(|m| m.tier),
                lmd: info.map(|m| m.lmd),
                droppable: info.map(|m| m.droppable),
                total,
                spent,
                needed,
                owned: held,
                missing: (needed - held).max(0),
                percentage: percentage(spent, total),
            }
        })
        .collect()
}

/// `"{qty}x {name}"` per non-zero entry, one per line; `None` when nothing is left.
pub fn format_resources(quantity: &ResourceQuantity) -> String {
    let lines: Vec<String> = quantity
        .iter()
        .filter(|(_, count)| *count != 0)
        .map(|(name, count)| format!("{count}x {name}"))
        .collect();
    if lines.is_empty() {
        "None".to_string()
    } else {
        lines.join("\n")
    }
}

/// Highest overall completion first, then higher rank, then name.
pub fn sort_summaries(summaries: &mut [OperatorSummary]) {
    summaries.sort_by(|a, b| {
        b.overall_percentage
            .total_cmp(&a.overall_percentage)
            .then_with(|| b.stars.cmp(&a.stars))
            .then_with(|| a.name.cmp(&b.name))
    });
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn pct(value: f64) -> String {
    format!("{value:.2}")
}

const RESOURCE_HEADER: [&str; 10] = [
    "Resource",
    "Tier",
    "LMD",
    "Droppable",
    "Total",
    "Spent",
    "Needed",
    "Owned",
    "Missing",
    "Percentage",
];

fn operator_header() -> Vec<String> {
    let mut header: Vec<String> = [
        "operator",
        "overall_percentage",
        "material_percentage",
        "currency_percentage",
        "exp_ticket_percentage",
        "stars",
        "level",
        "elite",
        "skill_level",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    header.extend((1..=REPORTED_MASTERY_SLOTS).map(|slot| format!("s{slot}_mastery")));
    header.extend(
        [
            "skill_upgrade_resources",
            "elite1_resources",
            "elite2_resources",
            "elite_resources",
            "mastery_resources",
            "total_resources",
            "spent_resources",
            "needed_resources",
            "needed_material_quantity",
            "total_material_quantity",
            "needed_currency",
            "total_elite_currency",
            "spent_elite_currency",
            "needed_exp_tickets",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    header
}

fn operator_record(summary: &OperatorSummary) -> Vec<String> {
    let mut record = vec![
        summary.name.clone(),
        pct(summary.overall_percentage),
        pct(summary.material_percentage),
        pct(summary.currency_percentage),
        pct(summary.exp_ticket_percentage),
        summary.stars.to_string(),
        summary.level.to_string(),
        summary.elite.to_string(),
        summary.skill_level.to_string(),
    ];
    record.extend(
        summary.mastery[..REPORTED_MASTERY_SLOTS.min(MASTERY_SLOTS)]
            .iter()
            .map(u8::to_string),
    );
    record.extend([
        format_resources(&summary.skill_upgrade_resources),
        format_resources(&summary.elite1_resources),
        format_resources(&summary.elite2_resources),
        format_resources(&summary.elite_resources),
        format_resources(&summary.mastery_resources),
        format_resources(&summary.total_resources),
        format_resources(&summary.spent_resources),
        format_resources(&summary.needed_resources),
        summary.needed_material_quantity.to_string(),
        summary.total_material_quantity.to_string(),
        summary.needed_currency.to_string(),
        summary.total_elite_currency.to_string(),
        summary.spent_elite_currency.to_string(),
        summary.needed_exp_tickets.to_string(),
    ]);
    record
}

fn csv_writer(path: &Path) -> Result<csv::Writer<fs::File>, ReportError> {
    csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .map_err(|source| ReportError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

fn write_rows<I>(path: &Path, header: Vec<String>, rows: I) -> Result<usize, ReportError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let csv_error = |source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv_writer(path)?;
    writer.write_record(&header).map_err(csv_error)?;
    let mut count = 0;
    for row in rows {
        writer.write_record(&row).map_err(csv_error)?;
        count += 1;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(count)
}

pub fn write_resources_report(path: &Path, rows: &[ResourceRow]) -> Result<usize, ReportError> {
    let header = RESOURCE_HEADER.iter().map(|s| s.to_string()).collect();
    write_rows(
        path,
        header,
        rows.iter().map(|row| {
            vec![
                row.resource.clone(),
                optional(row.tier),
                optional(row.lmd),
                optional(row.droppable),
                row.total.to_string(),
                row.spent.to_string(),
                row.needed.to_string(),
                row.owned.to_string(),
                row.missing.to_string(),
                pct(row.percentage),
            ]
        }),
    )
}

/// Write summaries in the order given; see [sort_summaries].
pub fn write_operator_report(
    path: &Path,
    summaries: &[OperatorSummary],
) -> Result<usize, ReportError> {
    write_rows(path, operator_header(), summaries.iter().map(operator_record))
}

/// Dated report file names under one directory.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub dir: PathBuf,
    pub date: NaiveDate,
}

impl ReportPaths {
    pub fn new(dir: impl Into<PathBuf>, date: NaiveDate) -> Self {
        Self {
            dir: dir.into(),
            date,
        }
    }

    pub fn resources(&self) -> PathBuf {
        self.dir
            .join(format!("{}-resources-report.csv", self.date.format("%Y-%m-%d")))
    }

    pub fn resources_workbook(&self) -> PathBuf {
        self.dir
            .join(format!("{}-resources-report.xlsx", self.date.format("%Y-%m-%d")))
    }

    pub fn by_operator(&self) -> PathBuf {
        self.dir.join(format!(
            "{}-resources-by-operator-report.csv",
            self.date.format("%Y-%m-%d")
        ))
    }

    pub fn manifest(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    pub fn ensure_dir(&self) -> Result<(), ReportError> {
        fs::create_dir_all(&self.dir).map_err(|source| ReportError::Io {
            path: self.dir.clone(),
            source,
        })
    }
}

/// Write both reports plus the resources workbook, returning one manifest entry per file.
pub fn write_reports(
    paths: &ReportPaths,
    rows: &[ResourceRow],
    summaries: &[OperatorSummary],
) -> Result<Vec<OutputEntry>, ReportError> {
    paths.ensure_dir()?;
    let resources_path = paths.resources();
    let resource_count = write_resources_report(&resources_path, rows)?;
    info!(path = %resources_path.display(), rows = resource_count, "resources report written");

    let operators_path = paths.by_operator();
    let operator_count = write_operator_report(&operators_path, summaries)?;
    info!(path = %operators_path.display(), rows = operator_count, "operator report written");

    let workbook_path = paths.resources_workbook();
    let workbook_count = write_resources_workbook(&workbook_path, rows)?;
    info!(path = %workbook_path.display(), rows = workbook_count, "resources workbook written");

    Ok(vec![
        OutputEntry::new(&resources_path, resource_count),
        OutputEntry::new(&operators_path, operator_count),
        OutputEntry::new(&workbook_path, workbook_count),
    ])
}
