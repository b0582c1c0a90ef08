//! Training-set summaries for fitted models.

use crate::algorithms::kmeans::KMeansModel;
use crate::error::MlError;
use serde::{Deserialize, Serialize};

/// Fraction of positions where `predicted` equals `truth`.
pub fn accuracy(predicted: &[usize], truth: &[usize]) -> Result<f64, MlError> {
    if predicted.len() != truth.len() {
        return Err(MlError::invalid_input(format!(
            "{} predictions for {} targets",
            predicted.len(),
            truth.len()
        )));
    }
    if truth.is_empty() {
        return Err(MlError::invalid_input("accuracy of an empty set"));
    }
    let correct = predicted.iter().zip(truth).filter(|(p, t)| p == t).count();
    Ok(correct as f64 / truth.len() as f64)
}

/// One cluster of a fitted k-means model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster: usize,
    pub size: usize,
    pub centroid: Vec<f64>,
}

/// Full report of a k-means fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeansReport {
    pub algorithm: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub inertia: f64,
    pub clusters: Vec<ClusterSummary>,
}

pub fn summarize_clusters(model: &KMeansModel) -> Vec<ClusterSummary> {
    model
        .cluster_sizes()
        .into_iter()
        .zip(model.centroids().rows())
        .enumerate()
        .map(|(cluster, (size, centroid))| ClusterSummary {
            cluster,
            size,
            centroid: centroid.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KMeansConfig;
    use ndarray::array;

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[0, 1, 1, 0], &[0, 1, 0, 0]).unwrap(), 0.75);
        assert!(accuracy(&[0], &[0, 1]).is_err());
        assert!(accuracy(&[], &[]).is_err());
    }

    #[test]
    fn test_summarize_clusters() {
        let records = array![[0.0, 0.0], [0.0, 1.0], [10.0, 10.0], [10.0, 11.0]];
        let config = KMeansConfig {
            n_clusters: 2,
            ..KMeansConfig::default()
        };
        let model = KMeansModel::fit(&records, &config).unwrap();
        let summary = summarize_clusters(&model);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary.iter().map(|c| c.size).sum::<usize>(), 4);
        for cluster in &summary {
            assert_eq!(cluster.size, 2);
            assert_eq!(cluster.centroid.len(), 2);
            // Centroids settle within the fit tolerance of the cluster means.
            let y = cluster.centroid[1];
            assert!((y - 0.5).abs() < 1e-3 || (y - 10.5).abs() < 1e-3, "y = {y}");
        }
    }
}
