//! Whole-collection spreadsheet export.
//!
//! The column set is the records' own field set: the union of keys in
//! first-seen order, with no renaming. One row per record, one sheet.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::DocsError;
use crate::xlsx::{write_workbook, Cell};

/// Which list is being exported. Fixes the file and sheet names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Orders,
    Customers,
}

impl ExportKind {
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Orders => "orders_report.xlsx",
            Self::Customers => "users_report.xlsx",
        }
    }

    #[must_use]
    pub const fn sheet_name(self) -> &'static str {
        match self {
            Self::Orders => "Orders",
            Self::Customers => "Users",
        }
    }
}

/// Column used for records that do not serialize to an object.
const SCALAR_COLUMN: &str = "value";

fn to_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Empty,
        Value::Bool(b) => Cell::Bool(*b),
        Value::Number(n) => Cell::Number(n.to_string()),
        Value::String(s) => Cell::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => Cell::Text(value.to_string()),
    }
}

/// Header row followed by one row per record.
fn tabulate(records: &[Value]) -> Vec<Vec<Cell>> {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        match record {
            Value::Object(map) => {
                for key in map.keys() {
                    if !columns.contains(&key.as_str()) {
                        columns.push(key);
                    }
                }
            }
            _ => {
                if !columns.contains(&SCALAR_COLUMN) {
                    columns.push(SCALAR_COLUMN);
                }
            }
        }
    }

    let header = columns.iter().map(|c| Cell::Text((*c).to_owned())).collect();
    let body = records.iter().map(|record| {
        columns
            .iter()
            .map(|column| match record {
                Value::Object(map) => map.get(*column).map_or(Cell::Empty, to_cell),
                scalar if *column == SCALAR_COLUMN => to_cell(scalar),
                _ => Cell::Empty,
            })
            .collect()
    });
    std::iter::once(header).chain(body).collect()
}

/// Builds the workbook bytes for `records` on a sheet named `sheet_name`.
///
/// Identical input yields identical bytes.
///
/// # Errors
///
/// Returns [`DocsError`] if a record cannot be serialized or the package
/// cannot be written.
pub fn build_workbook<T: Serialize>(records: &[T], sheet_name: &str) -> Result<Vec<u8>, DocsError> {
    let values = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    let rows = tabulate(&values);
    tracing::debug!(sheet = sheet_name, rows = values.len(), columns = rows.first().map_or(0, Vec::len), "building workbook");
    write_workbook(sheet_name, &rows)
}

/// Writes the export for `kind` into `dir` and returns the file path.
///
/// # Errors
///
/// Same as [`build_workbook`], plus [`DocsError::Io`] if the file cannot be
/// written.
pub fn write_export<T: Serialize>(
    records: &[T],
    kind: ExportKind,
    dir: &Path,
) -> Result<PathBuf, DocsError> {
    let bytes = build_workbook(records, kind.sheet_name())?;
    crate::save_bytes(dir, kind.file_name(), &bytes)
}
