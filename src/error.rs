//! Error types shared across modules, and the umbrella [Error] the CLI reports.

use crate::config::ConfigError;
use crate::data::curve::CurveError;
use crate::data::inventory::InventoryError;
use crate::data::operator::CatalogError;
use crate::data::roster::ParseError;
use crate::report::ReportError;

/// A name or position the read-only catalogs cannot resolve. Raised at record construction;
/// no default data is substituted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("curve table has no entries for rank {0}")]
    UnknownRank(u8),

    #[error("curve table has no entry for rank {rank}, elite {elite}, level {level}")]
    MissingCurvePoint { rank: u8, elite: u8, level: u16 },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
