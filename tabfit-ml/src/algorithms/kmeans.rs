//! K-means clustering pipeline backed by `linfa-clustering`.

use crate::algorithms::classical::ClassicalAlgorithm;
use crate::config::{DataConfig, KMeansConfig};
use crate::data::{CsvSource, DataBatch};
use crate::error::MlError;
use linfa::DatasetBase;
use linfa::traits::{Fit, Predict};
use linfa_clustering::KMeans;
use linfa_nn::distance::L2Dist;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand_xoshiro::Xoshiro256Plus;
use rand_xoshiro::rand_core::SeedableRng;
use tracing::{debug, info, warn};

/// A fitted k-means model together with the assignment of its training rows.
#[derive(Debug, Clone)]
pub struct KMeansModel {
    inner: KMeans<f64, L2Dist>,
    labels: Array1<usize>,
    algorithm: ClassicalAlgorithm,
}

impl KMeansModel {
    /// Fit on `records` (one row per observation) with the configured hyperparameters.
    pub fn fit(records: &Array2<f64>, config: &KMeansConfig) -> Result<Self, MlError> {
        if config.n_clusters == 0 {
            return Err(MlError::invalid_input("n_clusters must be at least 1"));
        }
        if records.nrows() < config.n_clusters {
            return Err(MlError::invalid_input(format!(
                "{} rows cannot be partitioned into {} clusters",
                records.nrows(),
                config.n_clusters
            )));
        }

        let algorithm = ClassicalAlgorithm::KMeans {
            n_clusters: config.n_clusters,
            random_state: config.random_state,
        };
        debug!(
            %algorithm,
            backend = algorithm.backend(),
            n_runs = config.n_runs,
            "Fitting"
        );

        let rng = Xoshiro256Plus::seed_from_u64(config.random_state);
        let dataset = DatasetBase::from(records.clone());
        let inner = KMeans::<f64, L2Dist>::params_with_rng(config.n_clusters, rng)
            .n_runs(config.n_runs)
            .max_n_iterations(config.max_n_iterations)
            .tolerance(config.tolerance)
            .fit(&dataset)?;

        let labels = inner.predict(records);
        let model = Self {
            inner,
            labels,
            algorithm,
        };

        let sizes = model.cluster_sizes();
        if sizes.iter().any(|&size| size == 0) {
            warn!(?sizes, "K-means produced an empty cluster");
        }
        info!(rows = records.nrows(), ?sizes, "Fitted k-means model");
        Ok(model)
    }

    /// Cluster id of every training row, in input order.
    pub fn labels(&self) -> &Array1<usize> {
        &self.labels
    }

    /// One centroid per row.
    pub fn centroids(&self) -> &Array2<f64> {
        self.inner.centroids()
    }

    pub fn n_clusters(&self) -> usize {
        self.inner.centroids().nrows()
    }

    pub fn algorithm(&self) -> &ClassicalAlgorithm {
        &self.algorithm
    }

    /// Assign each row to its nearest centroid.
    pub fn predict(&self, records: &Array2<f64>) -> Result<Array1<usize>, MlError> {
        if records.ncols() != self.centroids().ncols() {
            return Err(MlError::invalid_input(format!(
                "expected {} features, got {}",
                self.centroids().ncols(),
                records.ncols()
            )));
        }
        Ok(self.inner.predict(records))
    }

    /// Number of training rows assigned to each cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_clusters()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }

    /// Sum of squared distances from each row to its assigned centroid.
    pub fn inertia(&self, records: &Array2<f64>) -> Result<f64, MlError> {
        let labels = self.predict(records)?;
        Ok(records
            .axis_iter(Axis(0))
            .zip(labels.iter())
            .map(|(row, &label)| squared_distance(row, self.centroids().row(label)))
            .sum())
    }
}

fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Load the configured dataset and fit k-means on all of its columns.
///
/// Returns the fitted model and the table it was fitted on.
pub fn train_kmeans(
    config: &KMeansConfig,
    data: &DataConfig,
) -> Result<(KMeansModel, DataBatch), MlError> {
    let batch = CsvSource::new(&config.dataset_path)
        .with_delimiter(data.delimiter)
        .load()?;
    let records = batch.features()?;
    let model = KMeansModel::fit(&records, config)?;
    Ok((model, batch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use pretty_assertions::assert_eq;

    fn blobs() -> Array2<f64> {
        array![
            [1.0, 1.0],
            [1.2, 0.8],
            [0.9, 1.1],
            [10.0, 10.0],
            [10.2, 9.9],
            [9.8, 10.1],
            [-10.0, 5.0],
            [-9.8, 5.2],
            [-10.1, 4.9],
        ]
    }

    #[test]
    fn test_fit_separates_blobs() {
        let records = blobs();
        let model = KMeansModel::fit(&records, &KMeansConfig::default()).unwrap();
        let labels = model.labels();

        assert_eq!(labels.len(), 9);
        assert_eq!(model.n_clusters(), 3);
        assert_eq!(model.cluster_sizes(), vec![3, 3, 3]);
        for group in labels.to_vec().chunks(3) {
            assert!(group.iter().all(|&l| l == group[0]), "{labels:?}");
        }
    }

    #[test]
    fn test_fit_is_deterministic_for_a_seed() {
        let records = blobs();
        let config = KMeansConfig::default();
        let a = KMeansModel::fit(&records, &config).unwrap();
        let b = KMeansModel::fit(&records, &config).unwrap();
        assert_eq!(a.labels(), b.labels());
    }

    #[test]
    fn test_predict_matches_training_labels() {
        let records = blobs();
        let model = KMeansModel::fit(&records, &KMeansConfig::default()).unwrap();
        let predicted = model.predict(&array![[10.1, 10.0], [1.0, 0.9]]).unwrap();
        assert_eq!(predicted[0], model.labels()[3]);
        assert_eq!(predicted[1], model.labels()[0]);
    }

    #[test]
    fn test_inertia_is_small_for_tight_blobs() {
        let records = blobs();
        let model = KMeansModel::fit(&records, &KMeansConfig::default()).unwrap();
        let inertia = model.inertia(&records).unwrap();
        assert!(inertia > 0.0 && inertia < 1.0, "inertia = {inertia}");
    }

    #[test]
    fn test_too_few_rows() {
        let err = KMeansModel::fit(&array![[1.0, 2.0], [3.0, 4.0]], &KMeansConfig::default())
            .unwrap_err();
        assert!(matches!(err, MlError::InvalidInput(_)));
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let model = KMeansModel::fit(&blobs(), &KMeansConfig::default()).unwrap();
        assert!(model.predict(&array![[1.0, 2.0, 3.0]]).is_err());
    }

    #[test]
    fn test_train_kmeans_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kmeans.csv");
        let mut csv = String::from("x,y\n");
        for row in blobs().rows() {
            csv.push_str(&format!("{},{}\n", row[0], row[1]));
        }
        std::fs::write(&path, csv).unwrap();

        let config = KMeansConfig {
            dataset_path: path,
            ..KMeansConfig::default()
        };
        let (model, data) = train_kmeans(&config, &DataConfig::default()).unwrap();
        assert_eq!(data.row_count(), 9);
        assert_eq!(model.labels().len(), data.row_count());
        assert!(model.labels().iter().all(|&l| l < 3));
    }
}
