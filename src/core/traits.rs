//! Core traits for the SVM implementation

use crate::core::{Prediction, Result, Sample};

/// Dataset abstraction over labelled dense feature vectors
pub trait Dataset {
    /// Number of samples in the dataset
    fn len(&self) -> usize;

    /// Number of features (dimensionality)
    fn dim(&self) -> usize;

    /// Get a single sample by index
    ///
    /// # Panics
    /// Panics if index >= len()
    fn get_sample(&self, i: usize) -> Sample;

    /// Borrow all samples in index order
    fn samples(&self) -> &[Sample];

    /// Get all labels as a vector
    fn get_labels(&self) -> Vec<f64> {
        self.samples().iter().map(|s| s.label).collect()
    }

    /// Check if the dataset is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fitted binary classifier
pub trait SVMModel {
    /// Predict a single feature vector
    ///
    /// Fails with `DimensionMismatch` when the vector does not have the
    /// dimensionality the model was trained on.
    fn predict(&self, features: &[f64]) -> Result<Prediction>;

    /// Predict multiple feature vectors, preserving input order
    fn predict_batch(&self, samples: &[Sample]) -> Result<Vec<Prediction>> {
        samples.iter().map(|s| self.predict(&s.features)).collect()
    }

    /// Get the number of support vectors
    fn n_support_vectors(&self) -> usize;

    /// Get the bias term
    fn bias(&self) -> f64;
}
