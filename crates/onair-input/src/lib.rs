//! # onair-input
//!
//! Reads worksheets of a spreadsheet workbook into [`RawTable`]s.
//!
//! The first row of a worksheet is the header; every following row is a
//! data row. Any format calamine understands works (xlsx, xlsm, xlsb, xls,
//! ods).
//!
//! ## Example
//!
//! ```rust,ignore
//! use onair_input::Workbook;
//!
//! let mut workbook = Workbook::open("broadcast.xlsx")?;
//! let table = workbook.read_table("2023")?;
//! println!("{} rows", table.len());
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, ExcelDateTime, Range, Reader, Sheets};
use onair_core::{Cell, RawTable};
use thiserror::Error;
use tracing::debug;

/// Spreadsheet input error
#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot open workbook {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: calamine::Error,
    },

    #[error("sheet '{sheet}' not found (available: {})", .available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("cannot read sheet '{sheet}': {source}")]
    Read {
        sheet: String,
        source: calamine::Error,
    },
}

/// An open spreadsheet workbook
pub struct Workbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl Workbook {
    /// Open a workbook, detecting the format from the file extension
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref().to_path_buf();
        let sheets = open_workbook_auto(&path).map_err(|source| InputError::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, sheets })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Worksheet names in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    /// Read one worksheet; the first row becomes the header
    pub fn read_table(&mut self, sheet: &str) -> Result<RawTable, InputError> {
        let available = self.sheet_names();
        if !available.iter().any(|name| name == sheet) {
            return Err(InputError::SheetNotFound {
                sheet: sheet.to_string(),
                available,
            });
        }

        let range = self
            .sheets
            .worksheet_range(sheet)
            .map_err(|source| InputError::Read {
                sheet: sheet.to_string(),
                source,
            })?;

        let table = table_from_range(&range);
        debug!(
            sheet,
            columns = table.columns.len(),
            rows = table.len(),
            "worksheet read"
        );
        Ok(table)
    }
}

/// Convert a calamine range, header row first
pub fn table_from_range(range: &Range<Data>) -> RawTable {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return RawTable::default();
    };

    let mut table = RawTable::new(header.iter().map(|data| cell_from_data(data).to_text()));
    for row in rows {
        table.push_row(row.iter().map(cell_from_data).collect());
    }
    table
}

/// Map a calamine cell onto the core cell model
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) => Cell::Text(s.clone()),
        Data::DateTime(dt) => datetime_cell(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Durations and times of day become seconds; calendar dates are not numbers
fn datetime_cell(dt: &ExcelDateTime) -> Cell {
    let days = dt.as_f64();
    if dt.is_duration() || (0.0..1.0).contains(&days) {
        Cell::Number(days * SECONDS_PER_DAY)
    } else {
        Cell::Empty
    }
}

const SECONDS_PER_DAY: f64 = 86_400.0;
