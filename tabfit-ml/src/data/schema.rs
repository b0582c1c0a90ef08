//! Schema definition and type inference for datasets.

use crate::data::source::DataBatch;
use serde::{Deserialize, Serialize};

/// Column data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    String,
    Empty,
}

/// Schema definition for a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub columns: Vec<ColumnSchema>,
}

impl SchemaDefinition {
    /// Names of the columns whose every cell parses as a number.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| matches!(c.dtype, ColumnType::Integer | ColumnType::Float))
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Schema for a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub dtype: ColumnType,
}

/// Infer column type from its cells.
pub fn infer_column_type(values: &[&str]) -> ColumnType {
    if values.is_empty() {
        return ColumnType::Empty;
    }

    let mut has_float = false;
    for v in values {
        if v.parse::<i64>().is_ok() {
            continue;
        }
        if v.parse::<f64>().is_ok() {
            has_float = true;
            continue;
        }
        return ColumnType::String;
    }

    if has_float {
        ColumnType::Float
    } else {
        ColumnType::Integer
    }
}

/// Infer schema from a data batch.
pub fn infer_schema(batch: &DataBatch) -> SchemaDefinition {
    let columns = batch
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let values: Vec<&str> = batch.rows.iter().map(|row| row[i].as_str()).collect();
            ColumnSchema {
                name: name.clone(),
                dtype: infer_column_type(&values),
            }
        })
        .collect();

    SchemaDefinition { columns }
}
