//! CSV data source and the in-memory table it produces.

use crate::data::schema::{ColumnType, SchemaDefinition, infer_schema};
use crate::error::MlError;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// A table of string cells as read from disk.
///
/// Rows are aligned with `columns`; every row has exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataBatch {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataBatch {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of the named column in the header, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Result<Vec<&str>, MlError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| MlError::missing_column(name))?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Parse the named columns, in the given order, into a row-major `f64` matrix.
    pub fn numeric_matrix(&self, names: &[&str]) -> Result<Array2<f64>, MlError> {
        let indices = names
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| MlError::missing_column(*name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut values = Vec::with_capacity(self.row_count() * indices.len());
        for (row_idx, row) in self.rows.iter().enumerate() {
            for (&col_idx, name) in indices.iter().zip(names) {
                let cell = &row[col_idx];
                let value = cell.parse::<f64>().map_err(|_| {
                    MlError::dataset(format!(
                        "column '{name}' row {}: '{cell}' is not numeric",
                        row_idx + 1
                    ))
                })?;
                values.push(value);
            }
        }

        Array2::from_shape_vec((self.row_count(), indices.len()), values)
            .map_err(|e| MlError::dataset(format!("Failed to shape feature matrix: {e}")))
    }

    /// Every column as a feature, in file order.
    ///
    /// Fails up front if any column is not numeric.
    pub fn features(&self) -> Result<Array2<f64>, MlError> {
        let schema = self.schema();
        let non_numeric: Vec<&str> = schema
            .columns
            .iter()
            .filter(|c| !matches!(c.dtype, ColumnType::Integer | ColumnType::Float))
            .map(|c| c.name.as_str())
            .collect();
        if !non_numeric.is_empty() {
            return Err(MlError::dataset(format!(
                "non-numeric columns cannot be used as features: {}",
                non_numeric.join(", ")
            )));
        }

        let names: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        self.numeric_matrix(&names)
    }

    pub fn schema(&self) -> SchemaDefinition {
        infer_schema(self)
    }
}

/// CSV file data source.
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub path: PathBuf,
    pub delimiter: char,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: ',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read the whole file into a [`DataBatch`].
    pub fn load(&self) -> Result<DataBatch, MlError> {
        let content = std::fs::read_to_string(&self.path)?;
        let batch = self.parse(&content)?;
        info!(
            path = %self.path.display(),
            rows = batch.row_count(),
            columns = batch.column_count(),
            "Loaded CSV dataset"
        );
        Ok(batch)
    }

    fn parse(&self, content: &str) -> Result<DataBatch, MlError> {
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines.next().ok_or_else(|| {
            MlError::dataset(format!("Empty CSV file: {}", self.path.display()))
        })?;
        let columns = self.split(header);
        debug!(?columns, "Parsed CSV header");

        let mut rows = Vec::new();
        for (line_idx, line) in lines {
            let row = self.split(line);
            if row.len() != columns.len() {
                return Err(MlError::dataset(format!(
                    "{} line {}: expected {} fields, found {}",
                    self.path.display(),
                    line_idx + 1,
                    columns.len(),
                    row.len()
                )));
            }
            rows.push(row);
        }

        Ok(DataBatch { columns, rows })
    }

    fn split(&self, line: &str) -> Vec<String> {
        line.split(self.delimiter)
            .map(|s| s.trim().trim_matches('"').to_string())
            .collect()
    }
}
