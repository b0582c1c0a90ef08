//! Data loading — CSV ingestion and column type inference.

pub mod schema;
pub mod source;

pub use schema::{ColumnSchema, ColumnType, SchemaDefinition, infer_schema};
pub use source::{CsvSource, DataBatch};
