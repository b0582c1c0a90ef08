//! Descriptions of the classical algorithms tabfit fits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fitted algorithm and its fixed hyperparameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassicalAlgorithm {
    KMeans { n_clusters: usize, random_state: u64 },
    Knn { n_neighbors: usize },
}

impl ClassicalAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::KMeans { .. } => "k-means",
            Self::Knn { .. } => "k-nearest-neighbors",
        }
    }

    /// Crate providing the implementation.
    pub fn backend(&self) -> &'static str {
        match self {
            Self::KMeans { .. } => "linfa-clustering",
            Self::Knn { .. } => "linfa-nn",
        }
    }
}

impl fmt::Display for ClassicalAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KMeans {
                n_clusters,
                random_state,
            } => write!(
                f,
                "{} (n_clusters={n_clusters}, random_state={random_state})",
                self.name()
            ),
            Self::Knn { n_neighbors } => {
                write!(f, "{} (n_neighbors={n_neighbors})", self.name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let kmeans = ClassicalAlgorithm::KMeans {
            n_clusters: 3,
            random_state: 42,
        };
        assert_eq!(
            kmeans.to_string(),
            "k-means (n_clusters=3, random_state=42)"
        );
        assert_eq!(
            ClassicalAlgorithm::Knn { n_neighbors: 3 }.to_string(),
            "k-nearest-neighbors (n_neighbors=3)"
        );
    }

    #[test]
    fn test_backend() {
        assert_eq!(
            ClassicalAlgorithm::Knn { n_neighbors: 1 }.backend(),
            "linfa-nn"
        );
    }
}
