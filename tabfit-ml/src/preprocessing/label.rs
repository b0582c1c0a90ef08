//! Label encoding between categorical strings and dense integer codes.

use crate::error::MlError;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Bijective mapping between label strings and codes `0..n_classes`.
///
/// Classes are kept in sorted order; a label's code is its position in that
/// order, so fitting the same set of labels always yields the same codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Build the vocabulary from every label observed.
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Result<Self, MlError> {
        if labels.is_empty() {
            return Err(MlError::invalid_input(
                "cannot fit a label encoder on an empty column",
            ));
        }
        let classes: BTreeSet<&str> = labels.iter().map(|l| l.as_ref()).collect();
        Ok(Self {
            classes: classes.into_iter().map(str::to_string).collect(),
        })
    }

    pub fn fit_transform<S: AsRef<str>>(labels: &[S]) -> Result<(Self, Array1<usize>), MlError> {
        let encoder = Self::fit(labels)?;
        let codes = encoder.transform(labels)?;
        Ok((encoder, codes))
    }

    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Array1<usize>, MlError> {
        labels
            .iter()
            .map(|label| self.encode(label.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Array1::from)
    }

    pub fn encode(&self, label: &str) -> Result<usize, MlError> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| MlError::UnknownLabel(label.to_string()))
    }

    pub fn inverse_transform(&self, codes: &[usize]) -> Result<Vec<String>, MlError> {
        codes
            .iter()
            .map(|&code| self.decode(code).map(str::to_string))
            .collect()
    }

    pub fn decode(&self, code: usize) -> Result<&str, MlError> {
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or(MlError::UnknownCode {
                code,
                n_classes: self.classes.len(),
            })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}
