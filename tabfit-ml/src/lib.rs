//! # tabfit-ml — off-the-shelf clustering and classification on CSV tables
//!
//! Two straight-line pipelines, each a thin layer over a `linfa` model:
//!
//! - [`train_kmeans`]: load an unlabeled numeric table and fit k-means
//!   (3 clusters, seed 42 by default) on every column.
//! - [`train_knn`]: load `Height`/`Weight` features with a `Gender` label,
//!   label-encode the target and fit a 3-nearest-neighbors classifier.
//!   [`predict_label`] classifies a single point and decodes the result.
//!
//! Hyperparameters and dataset paths come from [`TabfitConfig`], layered with
//! `figment` from defaults, config files and `TABFIT_*` environment variables.

pub mod algorithms;
pub mod config;
pub mod data;
pub mod error;
pub mod preprocessing;

pub use algorithms::{
    ClassicalAlgorithm, ClusterSummary, KMeansModel, KMeansReport, KnnClassifier, accuracy,
    predict_label, summarize_clusters, train_kmeans, train_knn,
};
pub use config::{DataConfig, KMeansConfig, KnnConfig, TabfitConfig, load_config};
pub use data::{CsvSource, DataBatch};
pub use error::MlError;
pub use preprocessing::LabelEncoder;
