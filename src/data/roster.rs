//! Roster progression input: one row per owned operator.
//!
//! Columns are matched by header name (case-insensitive): `name`, `level`, `elite_level` (or
//! `elite`), `skill_level`, `s1_mastery`..`s5_mastery`. Other columns are ignored, blank or
//! missing numbers read as 0, anything else that is not an unsigned integer is an error.
//! CSV files may use `;` (the original spreadsheet export) or `,`; `.xlsx` workbooks are read
//! from their first sheet.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::Reader;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::data::operator::MASTERY_SLOTS;

pub const DEFAULT_ROSTER_PATH: &str = "files/user_operators.csv";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read roster {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid roster CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read roster workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        source: calamine::Error,
    },

    #[error("roster workbook {} has no sheets", path.display())]
    EmptyWorkbook { path: PathBuf },

    #[error("roster has no 'name' column")]
    MissingNameColumn,

    #[error("row {row}, column '{column}': '{value}' is not a valid non-negative integer")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

/// Current progression of one operator, as recorded by the player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionInput {
    pub name: String,
    pub level: u16,
    pub elite: u8,
    pub skill_level: u8,
    /// Mastery per skill slot 1..=5; 0 means not started.
    pub mastery: [u8; MASTERY_SLOTS],
}

impl ProgressionInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_level(mut self, elite: u8, level: u16) -> Self {
        self.elite = elite;
        self.level = level;
        self
    }

    pub fn with_skill_level(mut self, skill_level: u8) -> Self {
        self.skill_level = skill_level;
        self
    }

    /// Mastery for skill slot `skill` (1-based). Out-of-range slots are ignored.
    pub fn with_mastery(mut self, skill: u8, level: u8) -> Self {
        if let Some(slot) = usize::from(skill)
            .checked_sub(1)
            .and_then(|index| self.mastery.get_mut(index))
        {
            *slot = level;
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Level,
    Elite,
    SkillLevel,
    Mastery(usize),
}

fn column_for_header(header: &str) -> Option<Column> {
    let header = header.trim().to_lowercase();
    match header.as_str() {
        "name" | "operator" => Some(Column::Name),
        "level" => Some(Column::Level),
        "elite" | "elite_level" => Some(Column::Elite),
        "skill_level" => Some(Column::SkillLevel),
        _ => {
            let slot = header
                .strip_prefix('s')?
                .strip_suffix("_mastery")?
                .parse::<usize>()
                .ok()?;
            (1..=MASTERY_SLOTS)
                .contains(&slot)
                .then_some(Column::Mastery(slot - 1))
        }
    }
}

fn parse_number<T: std::str::FromStr + Default>(
    raw: &str,
    row: usize,
    column: &str,
) -> Result<T, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(T::default());
    }
    trimmed.parse::<T>().map_err(|_| ParseError::InvalidNumber {
        row,
        column: column.to_string(),
        value: trimmed.to_string(),
    })
}

/// Parse header + data rows. `first_row` is the 1-based line number of the first data row, used
/// in error messages.
pub fn parse_rows<I>(
    header: &[String],
    rows: I,
    first_row: usize,
) -> Result<Vec<ProgressionInput>, ParseError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let columns: Vec<Option<Column>> = header.iter().map(|h| column_for_header(h)).collect();
    if !columns.contains(&Some(Column::Name)) {
        return Err(ParseError::MissingNameColumn);
    }

    let mut inputs = Vec::new();
    for (offset, cells) in rows.into_iter().enumerate() {
        let row = first_row + offset;
        let mut input = ProgressionInput::default();
        for (index, cell) in cells.iter().enumerate() {
            let Some(Some(column)) = columns.get(index) else {
                continue;
            };
            let header_name = header[index].trim();
            match column {
                Column::Name => input.name = cell.trim().to_string(),
                Column::Level => input.level = parse_number(cell, row, header_name)?,
                Column::Elite => input.elite = parse_number(cell, row, header_name)?,
                Column::SkillLevel => input.skill_level = parse_number(cell, row, header_name)?,
                Column::Mastery(slot) => input.mastery[*slot] = parse_number(cell, row, header_name)?,
            }
        }
        if input.name.is_empty() {
            debug!(row, "skipping roster row without a name");
            continue;
        }
        inputs.push(input);
    }
    Ok(inputs)
}

fn sniff_delimiter(raw: &str) -> u8 {
    let header = raw.lines().next().unwrap_or_default();
    if header.contains(';') {
        b';'
    } else {
        b','
    }
}

/// Parse CSV text. The delimiter is taken from the header line.
pub fn parse_csv(raw: &str) -> Result<Vec<ProgressionInput>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(raw))
        .flexible(true)
        .from_reader(raw.as_bytes());
    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect::<Vec<_>>()))
        .collect::<Result<Vec<_>, _>>()?;
    parse_rows(&header, rows, 2)
}

fn cell_str(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        calamine::Data::Float(f) => format!("{f}"),
        calamine::Data::Int(i) => format!("{i}"),
        calamine::Data::Bool(b) => format!("{b}"),
        other => format!("{other:?}"),
    }
}

/// Read the first sheet of a workbook; row 1 is the header.
pub fn load_workbook(path: &Path) -> Result<Vec<ProgressionInput>, ParseError> {
    let workbook_error = |source| ParseError::Workbook {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = calamine::open_workbook_auto(path).map_err(workbook_error)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ParseError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?;
    let range = workbook.worksheet_range(&sheet).map_err(workbook_error)?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_str).collect::<Vec<_>>());
    let header = rows.next().ok_or(ParseError::MissingNameColumn)?;
    parse_rows(&header, rows, 2)
}

/// Load a roster from CSV or a spreadsheet, chosen by file extension.
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<ProgressionInput>, ParseError> {
    let path = path.as_ref();
    let is_workbook = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "xlsx" | "xlsm" | "xls" | "ods"));

    let inputs = if is_workbook {
        load_workbook(path)?
    } else {
        let raw = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_csv(&raw)?
    };
    info!(count = inputs.len(), path = %path.display(), "roster loaded");
    Ok(inputs)
}
