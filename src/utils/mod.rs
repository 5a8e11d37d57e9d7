//! Utility functions for SVM operations

use crate::core::Sample;

/// Feature scaling utilities
pub mod scaling {
    use crate::core::{Result, SVMError};

    /// Fixed per-feature bounds for min-max normalization to [0, 1]
    #[derive(Debug, Clone, PartialEq)]
    pub struct MinMaxBounds {
        lower: Vec<f64>,
        upper: Vec<f64>,
    }

    impl MinMaxBounds {
        /// Create a bounds table; every upper bound must exceed its lower bound
        pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
            if lower.len() != upper.len() {
                return Err(SVMError::DimensionMismatch {
                    expected: lower.len(),
                    actual: upper.len(),
                });
            }
            if let Some(i) = lower.iter().zip(&upper).position(|(lo, hi)| hi <= lo) {
                return Err(SVMError::InvalidParameter(format!(
                    "Upper bound must exceed lower bound for feature {i}: [{}, {}]",
                    lower[i], upper[i]
                )));
            }
            Ok(Self { lower, upper })
        }

        /// Number of features covered by the table
        pub fn dim(&self) -> usize {
            self.lower.len()
        }

        /// Scale one feature value
        pub fn scale_value(&self, feature: usize, value: f64) -> f64 {
            (value - self.lower[feature]) / (self.upper[feature] - self.lower[feature])
        }

        /// Scale a feature vector in place
        pub fn transform(&self, features: &mut [f64]) -> Result<()> {
            if features.len() != self.dim() {
                return Err(SVMError::DimensionMismatch {
                    expected: self.dim(),
                    actual: features.len(),
                });
            }
            for (j, value) in features.iter_mut().enumerate() {
                *value = self.scale_value(j, *value);
            }
            Ok(())
        }
    }
}

/// Validation of training and prediction inputs
pub mod validation {
    use super::*;
    use crate::core::{Result, SVMError};

    /// Validate a training set and return its dimensionality
    ///
    /// Rejects empty sets, mixed dimensionality, non-finite feature values
    /// and labels outside {-1, +1}.
    pub fn validate_training_set(samples: &[Sample]) -> Result<usize> {
        let dim = samples.first().map(Sample::dim).ok_or(SVMError::EmptyDataset)?;

        for (i, sample) in samples.iter().enumerate() {
            if sample.dim() != dim {
                return Err(SVMError::DimensionMismatch {
                    expected: dim,
                    actual: sample.dim(),
                });
            }
            if sample.label != 1.0 && sample.label != -1.0 {
                return Err(SVMError::InvalidLabel(sample.label));
            }
            if let Some(j) = sample.features.iter().position(|v| !v.is_finite()) {
                return Err(SVMError::InvalidDataset(format!(
                    "Non-finite feature value at sample {i}, feature {j}"
                )));
            }
        }

        Ok(dim)
    }

    /// Validate a feature vector against the dimensionality of a model
    pub fn validate_dimension(features: &[f64], expected: usize) -> Result<()> {
        if features.len() != expected {
            return Err(SVMError::DimensionMismatch {
                expected,
                actual: features.len(),
            });
        }
        Ok(())
    }

    /// Label shared by every sample, if the set contains a single class
    pub fn single_class(samples: &[Sample]) -> Option<f64> {
        let first = samples.first()?.label;
        samples.iter().all(|s| s.label == first).then_some(first)
    }
}

/// Statistical utilities for datasets
pub mod stats {
    use super::*;

    /// Count positive and negative labels
    pub fn label_balance(samples: &[Sample]) -> LabelBalance {
        let positive = samples.iter().filter(|s| s.label > 0.0).count();
        LabelBalance {
            positive,
            negative: samples.len() - positive,
        }
    }
}

/// Class counts of a labelled set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelBalance {
    pub positive: usize,
    pub negative: usize,
}
