// src/sheet/mod.rs

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use umya_spreadsheet::{reader, writer, Spreadsheet, Worksheet, XlsxError};

use crate::extract::CompanyRecord;

/// Errors from loading or persisting the workbook. Surfaced to the
/// caller as-is; nothing is retried or recovered.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The workbook could not be read or written (missing, corrupt,
    /// or unwritable file).
    #[error("workbook {path:?}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },
    /// The sheet has no column to deduplicate against.
    #[error("workbook {path:?} has no `{column}` column")]
    MissingKeyColumn { path: PathBuf, column: String },
}

/// Result of an append attempt. A duplicate is a recognized outcome,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Inserted,
    Duplicate,
}

/// Store over a single workbook file. Holds the path only; every
/// operation is a full load, mutate in memory, write back cycle, and
/// the file is closed between calls. Only the active sheet is used.
pub struct SheetStore {
    path: PathBuf,
}

impl SheetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure every required column exists on the active sheet,
    /// creating the workbook if there is none yet. Existing columns,
    /// their order, and existing rows are left untouched, so running
    /// this twice changes nothing.
    pub fn ensure_schema(&self, required: &[&str]) -> Result<(), StoreError> {
        let existed = self.path.exists();
        let mut book = if existed {
            self.load()?
        } else {
            info!(path = %self.path.display(), "creating new workbook");
            umya_spreadsheet::new_file()
        };

        let sheet = book.get_active_sheet_mut();
        let mut headers = header_row(sheet);
        let mut added = 0u32;
        for column in required {
            if headers.iter().any(|h| h == column) {
                continue;
            }
            let col = headers.len() as u32 + 1;
            sheet.get_cell_mut((col, 1)).set_value(*column);
            headers.push((*column).to_string());
            added += 1;
        }

        if added > 0 || !existed {
            self.persist(&book)?;
        }
        debug!(added, "schema check complete");
        Ok(())
    }

    /// Append `record` unless a data row already carries its key. The
    /// key is compared by exact string equality in `key_column`; on a
    /// hit nothing is written. Values land under matching header
    /// names, so pre-existing columns keep their positions and columns
    /// with no record counterpart stay empty.
    pub fn append_if_absent(
        &self,
        record: &CompanyRecord,
        key_column: &str,
    ) -> Result<AppendOutcome, StoreError> {
        let mut book = self.load()?;
        let sheet = book.get_active_sheet_mut();
        let headers = header_row(sheet);

        let key_col = headers
            .iter()
            .position(|h| h == key_column)
            .ok_or_else(|| StoreError::MissingKeyColumn {
                path: self.path.clone(),
                column: key_column.to_string(),
            })? as u32
            + 1;
        let key = record.column_value(key_column).unwrap_or_default();

        let last_row = sheet.get_highest_row();
        for row in 2..=last_row {
            if sheet.get_value((key_col, row)) == key {
                debug!(key, row, "company already present");
                return Ok(AppendOutcome::Duplicate);
            }
        }

        let new_row = last_row.max(1) + 1;
        for (idx, header) in headers.iter().enumerate() {
            if let Some(value) = record.column_value(header) {
                sheet.get_cell_mut((idx as u32 + 1, new_row)).set_value(value);
            }
        }
        self.persist(&book)?;
        info!(key, row = new_row, "appended company row");
        Ok(AppendOutcome::Inserted)
    }

    /// Clear text wrapping on every cell so rows render single-line.
    /// Runs as its own load/write pass after a successful append, the
    /// same full rewrite the other operations use.
    pub fn normalize_format(&self) -> Result<(), StoreError> {
        let mut book = self.load()?;
        let sheet = book.get_active_sheet_mut();
        let (width, height) = sheet.get_highest_column_and_row();
        for row in 1..=height {
            for col in 1..=width {
                sheet
                    .get_style_mut((col, row))
                    .get_alignment_mut()
                    .set_wrap_text(false);
            }
        }
        self.persist(&book)
    }

    fn load(&self) -> Result<Spreadsheet, StoreError> {
        reader::xlsx::read(&self.path).map_err(|source| StoreError::Workbook {
            path: self.path.clone(),
            source,
        })
    }

    fn persist(&self, book: &Spreadsheet) -> Result<(), StoreError> {
        writer::xlsx::write(book, &self.path).map_err(|source| StoreError::Workbook {
            path: self.path.clone(),
            source,
        })
    }
}

/// Header names from row 1, in column order. Empty cells come back as
/// empty strings so positions line up with column numbers.
fn header_row(sheet: &Worksheet) -> Vec<String> {
    let width = sheet.get_highest_column();
    (1..=width).map(|col| sheet.get_value((col, 1))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{KEY_COLUMN, SHEET_COLUMNS};
    use tempfile::tempdir;

    fn sample_record(name: &str) -> CompanyRecord {
        CompanyRecord {
            name: name.to_string(),
            phone: "555-1234".to_string(),
            email: Some("info@example.com".to_string()),
            industry: "Tools".to_string(),
            company_type: "LLC".to_string(),
            import_export: None,
            country: "US".to_string(),
            website: None,
            operations: "Makes anvils".to_string(),
        }
    }

    fn read_sheet(path: &Path) -> Spreadsheet {
        reader::xlsx::read(path).unwrap()
    }

    #[test]
    fn ensure_schema_creates_workbook_with_required_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.xlsx");
        let store = SheetStore::new(&path);
        store.ensure_schema(&SHEET_COLUMNS).unwrap();

        let book = read_sheet(&path);
        let sheet = book.get_active_sheet();
        assert_eq!(sheet.get_highest_column(), 9);
        for (idx, column) in SHEET_COLUMNS.iter().enumerate() {
            assert_eq!(&sheet.get_value((idx as u32 + 1, 1)), column);
        }
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.xlsx");
        let store = SheetStore::new(&path);
        store.ensure_schema(&SHEET_COLUMNS).unwrap();
        store.ensure_schema(&SHEET_COLUMNS).unwrap();

        let book = read_sheet(&path);
        assert_eq!(book.get_active_sheet().get_highest_column(), 9);
    }

    #[test]
    fn ensure_schema_repairs_partial_header_and_keeps_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.xlsx");

        // A workbook from before the tool: two columns, one data row.
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_active_sheet_mut();
        sheet.get_cell_mut((1, 1)).set_value("Company Name");
        sheet.get_cell_mut((2, 1)).set_value("Notes");
        sheet.get_cell_mut((1, 2)).set_value("Acme");
        sheet.get_cell_mut((2, 2)).set_value("call back");
        writer::xlsx::write(&book, &path).unwrap();

        let store = SheetStore::new(&path);
        store.ensure_schema(&SHEET_COLUMNS).unwrap();

        let book = read_sheet(&path);
        let sheet = book.get_active_sheet();
        // 2 existing + 8 missing required columns appended after them.
        assert_eq!(sheet.get_highest_column(), 10);
        assert_eq!(sheet.get_value((1, 1)), "Company Name");
        assert_eq!(sheet.get_value((2, 1)), "Notes");
        assert_eq!(sheet.get_value((3, 1)), "Company Phone");
        assert_eq!(sheet.get_value((10, 1)), "Operations");
        // Existing row intact, new columns empty for it.
        assert_eq!(sheet.get_value((1, 2)), "Acme");
        assert_eq!(sheet.get_value((2, 2)), "call back");
        assert_eq!(sheet.get_value((3, 2)), "");
    }

    #[test]
    fn append_writes_row_matching_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.xlsx");
        let store = SheetStore::new(&path);
        store.ensure_schema(&SHEET_COLUMNS).unwrap();

        let outcome = store
            .append_if_absent(&sample_record("Acme"), KEY_COLUMN)
            .unwrap();
        assert_eq!(outcome, AppendOutcome::Inserted);

        let book = read_sheet(&path);
        let sheet = book.get_active_sheet();
        assert_eq!(sheet.get_highest_row(), 2);
        assert_eq!(sheet.get_value((1, 2)), "Acme");
        assert_eq!(sheet.get_value((2, 2)), "555-1234");
        assert_eq!(sheet.get_value((3, 2)), "info@example.com");
        assert_eq!(sheet.get_value((4, 2)), "Tools");
        assert_eq!(sheet.get_value((5, 2)), "LLC");
        // Absent optional fields leave empty cells.
        assert_eq!(sheet.get_value((6, 2)), "");
        assert_eq!(sheet.get_value((7, 2)), "US");
        assert_eq!(sheet.get_value((8, 2)), "");
        assert_eq!(sheet.get_value((9, 2)), "Makes anvils");
    }

    #[test]
    fn append_same_key_reports_duplicate_and_keeps_row_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.xlsx");
        let store = SheetStore::new(&path);
        store.ensure_schema(&SHEET_COLUMNS).unwrap();

        store
            .append_if_absent(&sample_record("Acme"), KEY_COLUMN)
            .unwrap();
        let outcome = store
            .append_if_absent(&sample_record("Acme"), KEY_COLUMN)
            .unwrap();
        assert_eq!(outcome, AppendOutcome::Duplicate);

        let book = read_sheet(&path);
        assert_eq!(book.get_active_sheet().get_highest_row(), 2);
    }

    #[test]
    fn append_new_key_adds_exactly_one_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.xlsx");
        let store = SheetStore::new(&path);
        store.ensure_schema(&SHEET_COLUMNS).unwrap();

        store
            .append_if_absent(&sample_record("Acme"), KEY_COLUMN)
            .unwrap();
        store
            .append_if_absent(&sample_record("Globex"), KEY_COLUMN)
            .unwrap();

        let book = read_sheet(&path);
        let sheet = book.get_active_sheet();
        assert_eq!(sheet.get_highest_row(), 3);
        assert_eq!(sheet.get_value((1, 3)), "Globex");
    }

    #[test]
    fn append_without_key_column_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.xlsx");

        let mut book = umya_spreadsheet::new_file();
        book.get_active_sheet_mut()
            .get_cell_mut((1, 1))
            .set_value("Notes");
        writer::xlsx::write(&book, &path).unwrap();

        let store = SheetStore::new(&path);
        let err = store
            .append_if_absent(&sample_record("Acme"), KEY_COLUMN)
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingKeyColumn { .. }));
    }

    #[test]
    fn append_on_missing_file_surfaces_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.xlsx");
        let store = SheetStore::new(&path);
        let err = store
            .append_if_absent(&sample_record("Acme"), KEY_COLUMN)
            .unwrap_err();
        assert!(matches!(err, StoreError::Workbook { .. }));
    }

    #[test]
    fn normalize_format_preserves_cell_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.xlsx");
        let store = SheetStore::new(&path);
        store.ensure_schema(&SHEET_COLUMNS).unwrap();
        store
            .append_if_absent(&sample_record("Acme"), KEY_COLUMN)
            .unwrap();

        store.normalize_format().unwrap();

        let book = read_sheet(&path);
        let sheet = book.get_active_sheet();
        assert_eq!(sheet.get_value((1, 1)), "Company Name");
        assert_eq!(sheet.get_value((1, 2)), "Acme");
        assert_eq!(sheet.get_value((9, 2)), "Makes anvils");
    }
}
