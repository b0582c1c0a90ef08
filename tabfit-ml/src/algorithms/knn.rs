//! K-nearest-neighbors classification backed by `linfa-nn` neighbour search.

use crate::algorithms::classical::ClassicalAlgorithm;
use crate::config::{DataConfig, KnnConfig};
use crate::data::CsvSource;
use crate::error::MlError;
use crate::preprocessing::LabelEncoder;
use linfa_nn::distance::L2Dist;
use linfa_nn::{CommonNearestNeighbour, NearestNeighbour};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use tracing::{debug, info};

/// A k-NN classifier over integer class codes.
///
/// Fitting only stores the training set; a k-d tree over it is built per
/// `predict` call and queried for the `n_neighbors` closest rows (L2).
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    records: Array2<f64>,
    targets: Array1<usize>,
    n_neighbors: usize,
    n_classes: usize,
}

impl KnnClassifier {
    pub fn fit(
        records: Array2<f64>,
        targets: Array1<usize>,
        n_neighbors: usize,
    ) -> Result<Self, MlError> {
        if n_neighbors == 0 {
            return Err(MlError::invalid_input("n_neighbors must be at least 1"));
        }
        if records.nrows() == 0 {
            return Err(MlError::invalid_input("cannot fit k-NN on an empty table"));
        }
        if records.nrows() != targets.len() {
            return Err(MlError::invalid_input(format!(
                "{} rows but {} targets",
                records.nrows(),
                targets.len()
            )));
        }
        if n_neighbors > records.nrows() {
            return Err(MlError::invalid_input(format!(
                "n_neighbors ({n_neighbors}) exceeds the number of training rows ({})",
                records.nrows()
            )));
        }

        let n_classes = targets.iter().max().map_or(0, |&max| max + 1);
        debug!(
            rows = records.nrows(),
            features = records.ncols(),
            n_classes,
            "Fitting k-NN"
        );
        Ok(Self {
            records,
            targets,
            n_neighbors,
            n_classes,
        })
    }

    pub fn n_features(&self) -> usize {
        self.records.ncols()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn targets(&self) -> &Array1<usize> {
        &self.targets
    }

    pub fn records(&self) -> &Array2<f64> {
        &self.records
    }

    pub fn algorithm(&self) -> ClassicalAlgorithm {
        ClassicalAlgorithm::Knn {
            n_neighbors: self.n_neighbors,
        }
    }

    /// Predict a class code for every row of `records`.
    pub fn predict(&self, records: ArrayView2<f64>) -> Result<Array1<usize>, MlError> {
        if records.ncols() != self.n_features() {
            return Err(MlError::invalid_input(format!(
                "expected {} features, got {}",
                self.n_features(),
                records.ncols()
            )));
        }

        let index = CommonNearestNeighbour::KdTree.from_batch(&self.records, L2Dist)?;
        let mut predictions = Array1::zeros(records.nrows());
        for (row, prediction) in records.axis_iter(Axis(0)).zip(predictions.iter_mut()) {
            let neighbours = index.k_nearest(row, self.n_neighbors)?;
            *prediction = self.vote(neighbours.iter().map(|(_, idx)| self.targets[*idx]));
        }
        Ok(predictions)
    }

    /// Most frequent class; ties go to the smallest code.
    fn vote(&self, classes: impl Iterator<Item = usize>) -> usize {
        let mut counts = vec![0usize; self.n_classes];
        for class in classes {
            counts[class] += 1;
        }
        let mut best = 0;
        for (class, &count) in counts.iter().enumerate() {
            if count > counts[best] {
                best = class;
            }
        }
        best
    }
}

/// Load the configured dataset, encode its label column and fit k-NN.
///
/// Returns the fitted classifier and the encoder needed to decode its predictions.
pub fn train_knn(
    config: &KnnConfig,
    data: &DataConfig,
) -> Result<(KnnClassifier, LabelEncoder), MlError> {
    let batch = CsvSource::new(&config.dataset_path)
        .with_delimiter(data.delimiter)
        .load()?;

    let feature_columns: Vec<&str> = config.feature_columns.iter().map(String::as_str).collect();
    let records = batch.numeric_matrix(&feature_columns)?;
    let labels = batch.column(&config.label_column)?;
    let (encoder, targets) = LabelEncoder::fit_transform(&labels[..])?;

    let model = KnnClassifier::fit(records, targets, config.n_neighbors)?;
    info!(
        algorithm = %model.algorithm(),
        backend = model.algorithm().backend(),
        rows = batch.row_count(),
        classes = ?encoder.classes(),
        "Fitted k-NN classifier"
    );
    Ok((model, encoder))
}

/// Classify a single point and decode the result to its label string.
pub fn predict_label(
    model: &KnnClassifier,
    encoder: &LabelEncoder,
    point: &[f64],
) -> Result<String, MlError> {
    let records = ArrayView2::from_shape((1, point.len()), point)
        .map_err(|e| MlError::invalid_input(format!("bad prediction point: {e}")))?;
    let codes = model.predict(records)?;
    let label = encoder.decode(codes[0])?.to_string();
    debug!(?point, %label, "Predicted label");
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use pretty_assertions::assert_eq;

    fn training_set() -> (Array2<f64>, Array1<usize>) {
        let records = array![
            [150.0, 45.0],
            [155.0, 50.0],
            [160.0, 52.0],
            [175.0, 75.0],
            [180.0, 80.0],
            [185.0, 85.0],
        ];
        (records, array![0, 0, 0, 1, 1, 1])
    }

    #[test]
    fn test_predict_majority() {
        let (records, targets) = training_set();
        let model = KnnClassifier::fit(records, targets, 3).unwrap();
        let predicted = model
            .predict(array![[152.0, 47.0], [182.0, 82.0]].view())
            .unwrap();
        assert_eq!(predicted.to_vec(), vec![0, 1]);
    }

    #[test]
    fn test_training_points_predict_themselves_with_one_neighbour() {
        let (records, targets) = training_set();
        let model = KnnClassifier::fit(records.clone(), targets.clone(), 1).unwrap();
        assert_eq!(model.predict(records.view()).unwrap(), targets);
    }

    #[test]
    fn test_tie_goes_to_smallest_code() {
        let records = array![[0.0], [1.0], [10.0], [11.0]];
        let targets = array![1, 1, 0, 0];
        let model = KnnClassifier::fit(records, targets, 4).unwrap();
        assert_eq!(model.predict(array![[0.0]].view()).unwrap()[0], 0);
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let (records, targets) = training_set();
        assert!(KnnClassifier::fit(records.clone(), targets.clone(), 0).is_err());
        assert!(KnnClassifier::fit(records.clone(), targets.clone(), 7).is_err());
        assert!(KnnClassifier::fit(records, array![0, 1], 3).is_err());
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let (records, targets) = training_set();
        let model = KnnClassifier::fit(records, targets, 3).unwrap();
        assert!(model.predict(array![[1.0, 2.0, 3.0]].view()).is_err());
    }

    #[test]
    fn test_train_knn_and_predict_label() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knn.csv");
        std::fs::write(
            &path,
            "Height,Weight,Gender\n\
             150,45,Female\n155,50,Female\n160,52,Female\n\
             175,75,Male\n180,80,Male\n185,85,Male\n",
        )
        .unwrap();

        let config = KnnConfig {
            dataset_path: path,
            ..KnnConfig::default()
        };
        let (model, encoder) = train_knn(&config, &DataConfig::default()).unwrap();
        assert_eq!(model.n_classes(), 2);
        assert_eq!(predict_label(&model, &encoder, &[158.0, 50.0]).unwrap(), "Female");
        assert_eq!(predict_label(&model, &encoder, &[183.0, 84.0]).unwrap(), "Male");
    }

    #[test]
    fn test_train_knn_missing_label_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knn.csv");
        std::fs::write(&path, "Height,Weight\n150,45\n").unwrap();
        let config = KnnConfig {
            dataset_path: path,
            ..KnnConfig::default()
        };
        assert!(matches!(
            train_knn(&config, &DataConfig::default()),
            Err(MlError::MissingColumn(_))
        ));
    }
}
