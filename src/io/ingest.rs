//! CSV and spreadsheet ingest into raw tables.
//!
//! A `RawTable` is the schema-agnostic form every source parser consumes:
//! header names (normalized) plus string cells. No interpretation of the
//! values happens here; that belongs to `sources` and `normalize`.
//!
//! Design goals:
//! - **Lenient rows**: short rows are accepted, undecodable rows are recorded
//!   as row errors and skipped
//! - **Forgiving headers**: case, surrounding whitespace and a UTF-8 BOM are ignored

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use csv::StringRecord;

use crate::error::SourceError;

/// A row-level error encountered while reading a table.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// One data row with its 1-based line number in the source file.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub line: usize,
    record: StringRecord,
}

/// Tabular input as read from one source file.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    header_map: HashMap<String, usize>,
    rows: Vec<RawRow>,
    row_errors: Vec<RowError>,
}

impl RawTable {
    /// Read a CSV file.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Read CSV from any reader. Fails only when the header row is unreadable.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers().map_err(SourceError::Headers)?.clone();
        let header_map = build_header_map(&headers);

        let mut rows = Vec::new();
        let mut row_errors = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            // records() starts after the header line; CSV lines are 1-based.
            let line = result
                .as_ref()
                .ok()
                .and_then(|r| r.position())
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);

            match result {
                Ok(record) => rows.push(RawRow { line, record }),
                Err(e) => row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                }),
            }
        }

        Ok(Self {
            header_map,
            rows,
            row_errors,
        })
    }

    /// Read the first sheet of an Excel workbook (`.xlsx`, `.xls`).
    ///
    /// The first row is the header row. Every cell is rendered to text so
    /// parsers see the same string cells as for CSV input.
    pub fn from_workbook(path: &Path) -> Result<Self, SourceError> {
        let workbook_error = |source| SourceError::Workbook {
            path: path.to_path_buf(),
            source,
        };

        let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(SourceError::EmptyWorkbook)?
            .map_err(workbook_error)?;

        let mut sheet_rows = range.rows();
        let headers = sheet_rows.next().map(cells_to_record).unwrap_or_default();
        let header_map = build_header_map(&headers);

        let rows = sheet_rows
            .enumerate()
            .map(|(idx, cells)| RawRow {
                line: idx + 2,
                record: cells_to_record(cells),
            })
            .collect();

        Ok(Self {
            header_map,
            rows,
            row_errors: Vec::new(),
        })
    }

    /// Build a table directly from headers and rows.
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        let header_map = build_header_map(&StringRecord::from(headers.to_vec()));
        let rows = rows
            .iter()
            .enumerate()
            .map(|(idx, cells)| RawRow {
                line: idx + 2,
                record: StringRecord::from(cells.to_vec()),
            })
            .collect();
        Self {
            header_map,
            rows,
            row_errors: Vec::new(),
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.header_map.contains_key(name)
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn row_errors(&self) -> &[RowError] {
        &self.row_errors
    }

    /// Trimmed, non-empty cell value for the (normalized) column `name`.
    pub fn get<'a>(&self, row: &'a RawRow, name: &str) -> Option<&'a str> {
        let idx = self.header_map.get(name)?;
        row.record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins for duplicated headers.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn cells_to_record(cells: &[Data]) -> StringRecord {
    let values: Vec<String> = cells
        .iter()
        .map(|cell| match cell {
            Data::Empty => String::new(),
            other => other.to_string().trim().to_string(),
        })
        .collect();
    StringRecord::from(values)
}

fn normalize_header_name(name: &str) -> String {
    // Excel exports often carry a BOM on the first header ("\u{feff}SKU").
    let name = name.trim().trim_start_matches('\u{feff}').trim();
    name.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_normalized() {
        let csv = "\u{feff}SKU , Quantity,TOTAL\nA1,2,3.5\n";
        let table = RawTable::from_reader(csv.as_bytes()).unwrap();
        assert!(table.has_column("sku"));
        assert!(table.has_column("quantity"));
        assert!(table.has_column("total"));

        let row = &table.rows()[0];
        assert_eq!(table.get(row, "sku"), Some("A1"));
        assert_eq!(table.get(row, "total"), Some("3.5"));
        assert_eq!(row.line, 2);
    }

    #[test]
    fn short_rows_and_blank_cells_read_as_missing() {
        let csv = "SKU,Quantity,Total\nA1\nB2, ,4\n";
        let table = RawTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.rows().len(), 2);

        let first = &table.rows()[0];
        assert_eq!(table.get(first, "quantity"), None);
        let second = &table.rows()[1];
        assert_eq!(table.get(second, "quantity"), None);
        assert_eq!(table.get(second, "total"), Some("4"));
        assert_eq!(table.get(second, "unknown"), None);
    }

    #[test]
    fn undecodable_rows_become_row_errors() {
        let mut bytes = b"SKU,Quantity\nA1,1\n".to_vec();
        bytes.extend_from_slice(b"B\xff,2\n");
        bytes.extend_from_slice(b"C3,3\n");

        let table = RawTable::from_reader(bytes.as_slice()).unwrap();
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.row_errors().len(), 1);
    }

    #[test]
    fn workbook_first_sheet_reads_like_csv() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/curexa_orders.xlsx");
        let table = RawTable::from_workbook(&path).unwrap();

        assert!(table.has_column("sku"));
        assert!(table.has_column("line item"));
        assert_eq!(table.rows().len(), 5);

        let row = &table.rows()[2];
        assert_eq!(row.line, 4);
        assert_eq!(table.get(row, "sku"), Some("BPC-157"));
        assert_eq!(table.get(row, "quantity"), Some("2"));
        assert_eq!(table.get(row, "total"), Some("120"));
    }

    #[test]
    fn unreadable_workbook_is_a_workbook_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.xlsx");
        std::fs::write(&path, "not a zip archive").unwrap();

        let err = RawTable::from_workbook(&path).unwrap_err();
        assert!(matches!(err, SourceError::Workbook { .. }));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = RawTable::from_path(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, SourceError::Open { .. }));
    }
}
