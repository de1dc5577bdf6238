//! Player-owned materials: current inventory plus rewards of events not yet finished.
//!
//! - Inventory CSV: `resource,quantity` rows, no header.
//! - Event CSV: header `event,done,<resource>...`, one row per event; only rows with `done`
//!   false count.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::ledger::{combine, ResourceQuantity};

pub const DEFAULT_INVENTORY_PATH: &str = "files/user_resources.csv";
pub const DEFAULT_EVENTS_PATH: &str = "files/event_resources.csv";

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: invalid quantity '{value}' for '{resource}'")]
    InvalidQuantity {
        line: usize,
        resource: String,
        value: String,
    },

    #[error("event file has no '{0}' column")]
    MissingColumn(&'static str),

    #[error("line {line}: invalid done flag '{value}'")]
    InvalidFlag { line: usize, value: String },
}

fn parse_quantity(raw: &str, line: usize, resource: &str) -> Result<i64, InventoryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| InventoryError::InvalidQuantity {
            line,
            resource: resource.to_string(),
            value: trimmed.to_string(),
        })
}

fn parse_flag(raw: &str, line: usize) -> Result<bool, InventoryError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "x" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(InventoryError::InvalidFlag {
            line,
            value: other.to_string(),
        }),
    }
}

pub fn parse_inventory(raw: &str) -> Result<ResourceQuantity, InventoryError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());
    let mut owned = ResourceQuantity::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let Some(resource) = record.get(0).filter(|name| !name.is_empty()) else {
            continue;
        };
        let quantity = parse_quantity(record.get(1).unwrap_or(""), index + 1, resource)?;
        owned.accumulate(resource, quantity);
    }
    Ok(owned)
}

/// Sum of rewards from events whose `done` flag is false.
pub fn parse_pending_events(raw: &str) -> Result<ResourceQuantity, InventoryError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());
    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let done_index = header
        .iter()
        .position(|h| h.eq_ignore_ascii_case("done"))
        .ok_or(InventoryError::MissingColumn("done"))?;
    let event_index = header.iter().position(|h| h.eq_ignore_ascii_case("event"));

    let mut pending = ResourceQuantity::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = index + 2;
        if parse_flag(record.get(done_index).unwrap_or(""), line)? {
            continue;
        }
        for (column, cell) in record.iter().enumerate() {
            if column == done_index || Some(column) == event_index {
                continue;
            }
            let Some(resource) = header.get(column) else {
                continue;
            };
            pending.accumulate(resource.as_str(), parse_quantity(cell, line, resource)?);
        }
    }
    Ok(pending)
}

fn read_optional(path: &Path) -> Result<Option<String>, InventoryError> {
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .map_err(|source| InventoryError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Owned materials: inventory plus pending event rewards. Either file may be absent.
pub fn load_owned(inventory: &Path, events: &Path) -> Result<ResourceQuantity, InventoryError> {
    let on_hand = match read_optional(inventory)? {
        Some(raw) => parse_inventory(&raw)?,
        None => ResourceQuantity::new(),
    };
    let pending = match read_optional(events)? {
        Some(raw) => parse_pending_events(&raw)?,
        None => ResourceQuantity::new(),
    };
    let owned = combine([&on_hand, &pending]);
    info!(
        resources = owned.len(),
        inventory = %inventory.display(),
        events = %events.display(),
        "owned materials loaded"
    );
    Ok(owned)
}
