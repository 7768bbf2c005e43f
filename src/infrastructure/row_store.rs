//! Spreadsheet-backed row store.
//!
//! Owns the loaded dataset exclusively: column order, row text, and the
//! merge of cleaned records back into rows. Reads xlsx/xls via calamine,
//! writes xlsx via rust_xlsxwriter and JSON via serde_json.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, DataType, Reader};
use serde_json::{Map, Value};
use tracing::info;

use crate::domain::columns::{is_output_column, OUTPUT_COLUMNS};
use crate::domain::error::{AppError, Result};
use crate::domain::record::CleanedRecord;
use crate::domain::row::Row;
use crate::infrastructure::storage;

pub struct RowStore {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    source_path: Option<PathBuf>,
    output_dir: PathBuf,
}

impl RowStore {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            source_path: None,
            output_dir: PathBuf::from(storage::OUTPUT_DIR),
        }
    }

    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::new()
        }
    }

    /// Load a spreadsheet, replacing any previously loaded dataset. The
    /// first row of the first sheet is the header; every cell is coerced to
    /// text; missing output columns are appended empty.
    pub fn load(&mut self, path: &Path) -> Result<usize> {
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| AppError::LoadError(format!("Failed to open {}: {}", path.display(), e)))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AppError::LoadError("No worksheet found".to_string()))?
            .map_err(|e| AppError::LoadError(format!("Failed to read worksheet: {}", e)))?;

        let mut sheet_rows = range.rows();
        let header = sheet_rows
            .next()
            .ok_or_else(|| AppError::LoadError("Worksheet is empty".to_string()))?;

        let mut columns: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let name = cell_text(cell);
                if name.is_empty() {
                    format!("column_{}", idx)
                } else {
                    name
                }
            })
            .collect();

        let mut rows: Vec<Vec<String>> = sheet_rows
            .map(|row| {
                let mut values: Vec<String> = row.iter().map(cell_text).collect();
                values.resize(columns.len(), String::new());
                values
            })
            .collect();

        for column in OUTPUT_COLUMNS {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
                for row in &mut rows {
                    row.push(String::new());
                }
            }
        }
        // Output columns already present in the sheet still need every row
        // padded out to the full width.
        for row in &mut rows {
            row.resize(columns.len(), String::new());
        }

        info!(path = %path.display(), rows = rows.len(), "Loaded spreadsheet");

        self.columns = columns;
        self.rows = rows;
        self.source_path = Some(path.to_path_buf());
        Ok(self.rows.len())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row(&self, index: usize) -> Result<Row> {
        let values = self.checked_row(index)?;
        Ok(Row::new(self.columns.clone(), values.clone()))
    }

    /// Merge a cleaned record into the row at `index`. Only known output
    /// columns are written; everything else in the row is left untouched.
    pub fn update_row(&mut self, index: usize, record: &CleanedRecord) -> Result<()> {
        self.checked_row(index)?;
        for (key, value) in record.column_values() {
            if !is_output_column(key) {
                continue;
            }
            if let Some(pos) = self.columns.iter().position(|c| c == key) {
                self.rows[index][pos] = value;
            }
        }
        Ok(())
    }

    /// Serialize the dataset to xlsx. With no explicit path, a timestamped
    /// name under the output directory is derived from the source file.
    pub fn save_excel(&self, path: Option<&Path>) -> Result<PathBuf> {
        self.check_loaded()?;
        let path = self.resolve_output_path(path, "xlsx")?;

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (col, name) in self.columns.iter().enumerate() {
            worksheet
                .write_string(0, col as u16, name)
                .map_err(|e| AppError::IoError(format!("Failed to write header: {}", e)))?;
        }
        for (row_idx, row) in self.rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                worksheet
                    .write_string((row_idx + 1) as u32, col as u16, value)
                    .map_err(|e| AppError::IoError(format!("Failed to write cell: {}", e)))?;
            }
        }
        workbook
            .save(&path)
            .map_err(|e| AppError::IoError(format!("Failed to save {}: {}", path.display(), e)))?;

        info!(path = %path.display(), "Saved Excel output");
        Ok(path)
    }

    /// Serialize the dataset as a JSON array of per-row objects with keys in
    /// column order. Non-ASCII text is written raw, never escaped.
    pub fn save_json(&self, path: Option<&Path>) -> Result<PathBuf> {
        self.check_loaded()?;
        let path = self.resolve_output_path(path, "json")?;

        let records: Vec<Value> = self.rows.iter().map(|row| self.row_object(row)).collect();
        let text = serde_json::to_string_pretty(&records)
            .map_err(|e| AppError::IoError(format!("Failed to serialize JSON: {}", e)))?;
        fs::write(&path, text)?;

        info!(path = %path.display(), "Saved JSON output");
        Ok(path)
    }

    /// Pretty JSON of a single row, for display alongside processing.
    pub fn row_json(&self, index: usize) -> Result<String> {
        let values = self.checked_row(index)?;
        serde_json::to_string_pretty(&self.row_object(values))
            .map_err(|e| AppError::IoError(format!("Failed to serialize row: {}", e)))
    }

    fn row_object(&self, values: &[String]) -> Value {
        let mut object = Map::new();
        for (name, value) in self.columns.iter().zip(values) {
            object.insert(name.clone(), Value::String(value.clone()));
        }
        Value::Object(object)
    }

    fn resolve_output_path(&self, path: Option<&Path>, ext: &str) -> Result<PathBuf> {
        match path {
            Some(p) => {
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        storage::ensure_dir(parent)?;
                    }
                }
                Ok(p.to_path_buf())
            }
            None => {
                let source = self
                    .source_path
                    .as_ref()
                    .ok_or_else(|| AppError::NotLoaded("no source file to derive a name from".to_string()))?;
                storage::ensure_dir(&self.output_dir)?;
                Ok(storage::timestamped_output_path(&self.output_dir, source, ext))
            }
        }
    }

    fn check_loaded(&self) -> Result<()> {
        if self.rows.is_empty() {
            return Err(AppError::NotLoaded("load a spreadsheet first".to_string()));
        }
        Ok(())
    }

    fn checked_row(&self, index: usize) -> Result<&Vec<String>> {
        self.check_loaded()?;
        self.rows.get(index).ok_or_else(|| {
            AppError::RangeError(format!(
                "row index {} out of range 0..{}",
                index,
                self.rows.len()
            ))
        })
    }
}

impl Default for RowStore {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_text(cell: &calamine::Data) -> String {
    cell.as_string()
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{}", cell))
}
