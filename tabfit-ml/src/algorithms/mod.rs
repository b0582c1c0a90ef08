//! Model pipelines — k-means clustering, k-NN classification, evaluation.

pub mod classical;
pub mod evaluation;
pub mod kmeans;
pub mod knn;

pub use classical::ClassicalAlgorithm;
pub use evaluation::{ClusterSummary, KMeansReport, accuracy, summarize_clusters};
pub use kmeans::{KMeansModel, train_kmeans};
pub use knn::{KnnClassifier, predict_label, train_knn};
