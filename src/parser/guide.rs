//! Guiding file reader.
//!
//! The guiding file lists one recording per row: the entry name in the first
//! column (`S<n> <condition> <trial>`), the insole side in `sideFoot` and the
//! stance time ranges in every column from `stance phase 1` onward.
//! Spreadsheets (xlsx, xlsm, xls, ods) are read with `calamine`; a CSV export
//! of the same sheet is read with `csv`.

use crate::tree::frame::Foot;
use crate::utils::config::{FIRST_STANCE_COLUMN, FOOT_COLUMN};
use crate::utils::error::ParseError;
use calamine::{open_workbook_auto, Reader};
use log::debug;
use std::path::Path;

/// One row of the guiding file
#[derive(Debug, Clone, PartialEq)]
pub struct GuideEntry {
    /// Zero-based data row (header excluded)
    pub row: usize,
    /// Entry name, also the recording file stem
    pub name: String,
    pub foot: Foot,
    /// Raw stance cells in column order, empty cells included
    pub stances: Vec<String>,
}

/// Read every entry of a guiding file
///
/// **Public** - used by the trial parser and the `inspect` command
///
/// # Errors
/// * `ParseError::Io` / `ParseError::Csv` / `ParseError::Workbook` - unreadable file
/// * `ParseError::EmptyWorkbook` - spreadsheet without sheets or rows
/// * `ParseError::MissingColumn` - `sideFoot` or `stance phase 1` absent
/// * `ParseError::InvalidFoot` - a `sideFoot` cell is neither L nor R
pub fn read_guide(path: impl AsRef<Path>) -> Result<Vec<GuideEntry>, ParseError> {
    let path = path.as_ref();
    debug!("Reading guiding file: {}", path.display());

    let (headers, rows) = if is_csv(path) {
        read_csv_table(path)?
    } else {
        read_workbook_table(path)?
    };

    entries_from_table(&headers, rows)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

fn read_csv_table(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), ParseError> {
    let file = std::fs::File::open(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(|c| c.trim().to_string()).collect());
    }

    Ok((headers, rows))
}

fn read_workbook_table(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), ParseError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ParseError::EmptyWorkbook(path.display().to_string()))??;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()));

    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| ParseError::EmptyWorkbook(path.display().to_string()))?
        .collect();
    let rows: Vec<Vec<String>> = rows.map(|row| row.collect()).collect();

    Ok((headers, rows))
}

/// Turn a header row plus data rows into entries.
///
/// Rows whose cells are all empty are dropped.
fn entries_from_table(
    headers: &[String],
    rows: Vec<Vec<String>>,
) -> Result<Vec<GuideEntry>, ParseError> {
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
    };
    let foot_col = column(FOOT_COLUMN)?;
    let first_stance = column(FIRST_STANCE_COLUMN)?;

    let mut entries = Vec::with_capacity(rows.len());
    for (row, cells) in rows.into_iter().enumerate() {
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }

        let cell = |idx: usize| cells.get(idx).cloned().unwrap_or_default();
        entries.push(GuideEntry {
            row,
            name: cell(0),
            foot: cell(foot_col).parse()?,
            stances: cells.iter().skip(first_stance).cloned().collect(),
        });
    }

    debug!("Guiding file holds {} entries", entries.len());
    Ok(entries)
}
