//! Core type definitions for the SVM

use crate::core::{Result, SVMError};
use crate::kernel::KernelKind;
use serde::{Deserialize, Serialize};

/// Prediction result containing label and decision value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class label (+1 or -1)
    pub label: f64,
    /// Raw decision function value
    pub decision_value: f64,
}

impl Prediction {
    /// Build a prediction from a raw decision value.
    ///
    /// A decision value of exactly zero lies on the separating surface and
    /// is assigned to the negative class.
    pub fn from_decision(decision_value: f64) -> Self {
        let label = if decision_value > 0.0 { 1.0 } else { -1.0 };
        Self {
            label,
            decision_value,
        }
    }

    /// Get confidence as absolute value of decision value
    pub fn confidence(&self) -> f64 {
        self.decision_value.abs()
    }
}

/// Training or test example: a dense feature vector and its class label
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Feature vector, fixed dimensionality across a dataset
    pub features: Vec<f64>,
    /// Class label (+1 or -1)
    pub label: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(features: Vec<f64>, label: f64) -> Self {
        Self { features, label }
    }

    /// Dimensionality of the feature vector
    pub fn dim(&self) -> usize {
        self.features.len()
    }
}

impl AsRef<[f64]> for Sample {
    fn as_ref(&self) -> &[f64] {
        &self.features
    }
}

/// Fitted dual variables of one SMO run
#[derive(Debug, Clone, PartialEq)]
pub struct DualState {
    /// Lagrange multipliers, one per training example, 0 <= alpha_i <= C
    pub alpha: Vec<f64>,
    /// Bias term (b)
    pub b: f64,
    /// Indices of support vectors (alpha > 0)
    pub support_vectors: Vec<usize>,
    /// Number of outer passes performed
    pub passes: usize,
    /// Whether the last pass committed no update
    pub converged: bool,
    /// Dual objective value at the returned point
    pub objective_value: f64,
}

/// Hyperparameters of the trainer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvmConfig {
    /// Kernel family and its parameter
    pub kernel: KernelKind,
    /// Soft-margin penalty (upper bound for alpha)
    pub c: f64,
    /// Tolerance for the KKT conditions
    pub epsilon: f64,
    /// Maximum number of outer passes over the training set
    pub max_passes: usize,
    /// Pair updates smaller than this in both alphas are discarded
    pub min_alpha_change: f64,
}

impl Default for SvmConfig {
    fn default() -> Self {
        Self {
            kernel: KernelKind::default(),
            c: 200.0,
            epsilon: 0.0001,
            max_passes: 1000,
            min_alpha_change: 1e-7,
        }
    }
}

impl SvmConfig {
    /// Check that every hyperparameter is usable
    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "C must be positive and finite, got: {}",
                self.c
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "epsilon must be positive and finite, got: {}",
                self.epsilon
            )));
        }
        if self.max_passes == 0 {
            return Err(SVMError::InvalidParameter(
                "max_passes must be at least 1".to_string(),
            ));
        }
        if !(self.min_alpha_change.is_finite() && self.min_alpha_change >= 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "min_alpha_change must be non-negative, got: {}",
                self.min_alpha_change
            )));
        }
        self.kernel.validate()
    }
}
