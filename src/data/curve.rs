//! Currency/EXP curve: cumulative LMD and experience needed to reach each (elite, level) of a rank.
//!
//! CSV columns: `rank,elite,level,currency_cost,experience_cost` and optionally
//! `cumulative_currency,cumulative_experience`. Missing cumulative values are prefix sums of the
//! per-level costs in (elite, level) order within the rank.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::LookupError;

pub const DEFAULT_CURVE_PATH: &str = "data/explmd.csv";

/// Experience per EXP ticket.
pub const EXPERIENCE_PER_TICKET: i64 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum CurveError {
    #[error("failed to open curve table {}: {source}", path.display())]
    Open { path: PathBuf, source: csv::Error },

    #[error("invalid curve table row: {0}")]
    Csv(#[from] csv::Error),

    #[error("curve table lists rank {rank}, elite {elite}, level {level} twice")]
    DuplicatePoint { rank: u8, elite: u8, level: u16 },
}

/// One row of the curve table as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct CurveRow {
    pub rank: u8,
    pub elite: u8,
    pub level: u16,
    #[serde(default)]
    pub currency_cost: i64,
    #[serde(default)]
    pub experience_cost: i64,
    #[serde(default)]
    pub cumulative_currency: Option<i64>,
    #[serde(default)]
    pub cumulative_experience: Option<i64>,
}

/// Resolved position on the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurvePoint {
    pub rank: u8,
    pub elite: u8,
    pub level: u16,
    pub currency_cost: i64,
    pub experience_cost: i64,
    pub cumulative_currency: i64,
    pub cumulative_experience: i64,
}

impl CurvePoint {
    /// Nothing spent yet.
    pub fn origin(rank: u8, elite: u8) -> Self {
        Self {
            rank,
            elite,
            level: 0,
            currency_cost: 0,
            experience_cost: 0,
            cumulative_currency: 0,
            cumulative_experience: 0,
        }
    }

    /// Cumulative experience expressed in EXP tickets, truncated.
    pub fn experience_tickets(&self) -> i64 {
        self.cumulative_experience / EXPERIENCE_PER_TICKET
    }
}

/// Immutable curve table keyed by (rank, elite, level).
#[derive(Debug, Clone, Default)]
pub struct ProgressionCurveTable {
    points: BTreeMap<(u8, u8, u16), CurvePoint>,
    max_by_rank: HashMap<u8, (u8, u16)>,
}

impl ProgressionCurveTable {
    pub fn from_rows(rows: impl IntoIterator<Item = CurveRow>) -> Result<Self, CurveError> {
        let mut by_rank: BTreeMap<u8, BTreeMap<(u8, u16), CurveRow>> = BTreeMap::new();
        for row in rows {
            let slot = by_rank.entry(row.rank).or_default();
            let key = (row.elite, row.level);
            if slot.contains_key(&key) {
                return Err(CurveError::DuplicatePoint {
                    rank: row.rank,
                    elite: row.elite,
                    level: row.level,
                });
            }
            slot.insert(key, row);
        }

        let mut points = BTreeMap::new();
        let mut max_by_rank = HashMap::new();
        for (rank, rows) in by_rank {
            let mut currency = 0i64;
            let mut experience = 0i64;
            for ((elite, level), row) in rows {
                currency = row
                    .cumulative_currency
                    .unwrap_or(currency + row.currency_cost);
                experience = row
                    .cumulative_experience
                    .unwrap_or(experience + row.experience_cost);
                points.insert(
                    (rank, elite, level),
                    CurvePoint {
                        rank,
                        elite,
                        level,
                        currency_cost: row.currency_cost,
                        experience_cost: row.experience_cost,
                        cumulative_currency: currency,
                        cumulative_experience: experience,
                    },
                );
                // rows iterate in (elite, level) order, so the last one is the maximum
                max_by_rank.insert(rank, (elite, level));
            }
        }
        Ok(Self {
            points,
            max_by_rank,
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CurveError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let rows = reader
            .deserialize::<CurveRow>()
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }

    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self, CurveError> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|source| CurveError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        let rows = reader
            .deserialize::<CurveRow>()
            .collect::<Result<Vec<_>, _>>()?;
        let table = Self::from_rows(rows)?;
        info!(points = table.len(), path = %path.display(), "curve table loaded");
        Ok(table)
    }

    /// Point at (rank, elite, level). Level 0 means nothing recorded and resolves to the origin.
    pub fn lookup(&self, rank: u8, elite: u8, level: u16) -> Result<CurvePoint, LookupError> {
        if !self.max_by_rank.contains_key(&rank) {
            return Err(LookupError::UnknownRank(rank));
        }
        if level == 0 {
            return Ok(CurvePoint::origin(rank, elite));
        }
        self.points
            .get(&(rank, elite, level))
            .copied()
            .ok_or(LookupError::MissingCurvePoint { rank, elite, level })
    }

    /// Highest (elite, level) attainable at `rank`.
    pub fn max_position(&self, rank: u8) -> Result<(u8, u16), LookupError> {
        self.max_by_rank
            .get(&rank)
            .copied()
            .ok_or(LookupError::UnknownRank(rank))
    }

    pub fn max_point(&self, rank: u8) -> Result<CurvePoint, LookupError> {
        let (elite, level) = self.max_position(rank)?;
        self.lookup(rank, elite, level)
    }

    /// Highest level reachable at `elite` for `rank`, if the stage exists.
    pub fn max_level(&self, rank: u8, elite: u8) -> Option<u16> {
        self.points
            .range((rank, elite, 0)..=(rank, elite, u16::MAX))
            .next_back()
            .map(|(_, point)| point.level)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
rank,elite,level,currency_cost,experience_cost
4,0,1,0,0
4,0,2,30,100
4,0,3,40,200
4,1,1,0,0
4,1,2,90,1500
";

    #[test]
    fn cumulative_columns_are_derived_when_absent() {
        let table = ProgressionCurveTable::from_reader(TABLE.as_bytes()).unwrap();
        let point = table.lookup(4, 1, 2).unwrap();
        assert_eq!(point.cumulative_currency, 160);
        assert_eq!(point.cumulative_experience, 1800);
        assert_eq!(point.experience_tickets(), 1);
    }

    #[test]
    fn explicit_cumulative_values_win() {
        let raw = "\
rank,elite,level,currency_cost,experience_cost,cumulative_currency,cumulative_experience
3,0,1,0,0,0,0
3,0,2,10,10,500,2500
3,0,3,10,10,,
";
        let table = ProgressionCurveTable::from_reader(raw.as_bytes()).unwrap();
        assert_eq!(table.lookup(3, 0, 2).unwrap().cumulative_currency, 500);
        assert_eq!(table.lookup(3, 0, 3).unwrap().cumulative_currency, 510);
        assert_eq!(table.lookup(3, 0, 3).unwrap().cumulative_experience, 2510);
    }

    #[test]
    fn max_position_is_last_elite_and_level() {
        let table = ProgressionCurveTable::from_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(table.max_position(4).unwrap(), (1, 2));
        assert_eq!(table.max_level(4, 0), Some(3));
        assert_eq!(table.max_level(4, 2), None);
    }

    #[test]
    fn level_zero_is_origin_and_unknown_positions_fail() {
        let table = ProgressionCurveTable::from_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(table.lookup(4, 0, 0).unwrap().cumulative_currency, 0);
        assert_eq!(table.lookup(5, 0, 1), Err(LookupError::UnknownRank(5)));
        assert_eq!(
            table.lookup(4, 0, 9),
            Err(LookupError::MissingCurvePoint {
                rank: 4,
                elite: 0,
                level: 9
            })
        );
    }

    #[test]
    fn duplicate_points_are_rejected() {
        let raw = "rank,elite,level,currency_cost,experience_cost\n1,0,1,0,0\n1,0,1,5,5\n";
        let err = ProgressionCurveTable::from_reader(raw.as_bytes()).unwrap_err();
        assert!(matches!(err, CurveError::DuplicatePoint { rank: 1, .. }));
    }
}
