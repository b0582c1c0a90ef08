//! Target preprocessing.

pub mod label;

pub use label::LabelEncoder;
