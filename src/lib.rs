//! Operator resource accounting: what a roster has spent on upgrades, what it still needs, and
//! how complete each operator is.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod ledger;
pub mod parallel;
pub mod progression;
pub mod report;

pub use error::{Error, LookupError, Result};
