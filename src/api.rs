//! High-level API for Support Vector Machine operations
//!
//! This module provides a user-friendly interface for common SVM tasks,
//! including training, prediction, and model evaluation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use supervise::api::SVM;
//! use supervise::data::{StudentDataset, StudentOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Train a Gaussian SVM on the student data
//! let model = SVM::new()
//!     .with_c(200.0)
//!     .with_sigma(10.0)
//!     .train_from_student("student-train.csv", StudentOptions::default())?;
//!
//! // Score a held-out file
//! let test = StudentDataset::from_file("student-test.csv", StudentOptions::default())?;
//! let metrics = model.evaluate_detailed(&test)?;
//! println!("F1: {:.4}", metrics.f1_score());
//! # Ok(())
//! # }
//! ```

use crate::core::{Dataset, Prediction, Result, SVMError, SVMModel, Sample, SvmConfig};
use crate::data::{CSVDataset, StudentDataset, StudentOptions};
use crate::kernel::KernelKind;
use crate::optimizer::{SVMTrainer, TrainedSVM};
use crate::solver::TrainingObserver;
use std::fmt;
use std::path::Path;

/// High-level SVM interface with builder pattern
#[derive(Debug, Clone, Default)]
pub struct SVM {
    config: SvmConfig,
}

impl SVM {
    /// Create a new SVM with the default Gaussian kernel and parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an SVM from a complete configuration
    pub fn with_config(config: SvmConfig) -> Self {
        Self { config }
    }

    /// Set the kernel
    pub fn with_kernel(mut self, kernel: KernelKind) -> Self {
        self.config.kernel = kernel;
        self
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set KKT tolerance
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Use a Gaussian kernel with the given width
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.config.kernel = KernelKind::Gaussian { sigma };
        self
    }

    /// Use a polynomial kernel with the given degree
    pub fn with_degree(mut self, degree: u32) -> Self {
        self.config.kernel = KernelKind::Polynomial { degree };
        self
    }

    /// Set maximum number of outer passes
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.config.max_passes = max_passes;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &SvmConfig {
        &self.config
    }

    /// Train on a dataset
    pub fn train<D: Dataset>(self, dataset: &D) -> Result<TrainedModel> {
        self.train_samples(dataset.samples())
    }

    /// Train on samples
    pub fn train_samples(self, samples: &[Sample]) -> Result<TrainedModel> {
        let model = SVMTrainer::new(self.config.clone()).fit_samples(samples)?;
        Ok(TrainedModel {
            model,
            config: self.config,
        })
    }

    /// Train on samples, reporting progress to `observer`
    pub fn train_with_observer(
        self,
        samples: &[Sample],
        observer: &mut dyn TrainingObserver,
    ) -> Result<TrainedModel> {
        let model = SVMTrainer::new(self.config.clone()).fit_with_observer(samples, observer)?;
        Ok(TrainedModel {
            model,
            config: self.config,
        })
    }

    /// Train from a numeric CSV file (automatically detects headers)
    pub fn train_from_csv<P: AsRef<Path>>(self, path: P) -> Result<TrainedModel> {
        let dataset = CSVDataset::from_file(path)?;
        self.train(&dataset)
    }

    /// Train from a student-performance file
    pub fn train_from_student<P: AsRef<Path>>(
        self,
        path: P,
        options: StudentOptions,
    ) -> Result<TrainedModel> {
        let dataset = StudentDataset::from_file(path, options)?;
        self.train(&dataset)
    }
}

/// Trained SVM model with high-level prediction interface
#[derive(Debug, Clone)]
pub struct TrainedModel {
    model: TrainedSVM,
    config: SvmConfig,
}

impl TrainedModel {
    pub(crate) fn from_parts(model: TrainedSVM, config: SvmConfig) -> Self {
        Self { model, config }
    }

    /// Predict a single sample
    pub fn predict(&self, sample: &Sample) -> Result<Prediction> {
        self.model.predict(&sample.features)
    }

    /// Predict multiple samples, failing on the first of the wrong dimension
    pub fn predict_batch(&self, samples: &[Sample]) -> Result<Vec<Prediction>> {
        self.model.classifier().predict_batch(samples)
    }

    /// Predict every sample of a dataset
    pub fn predict_dataset<D: Dataset>(&self, dataset: &D) -> Result<Vec<Prediction>> {
        self.predict_batch(dataset.samples())
    }

    /// Predict from CSV file
    pub fn predict_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Prediction>> {
        let dataset = CSVDataset::from_file(path)?;
        self.predict_dataset(&dataset)
    }

    /// Evaluate accuracy on a dataset
    pub fn evaluate<D: Dataset>(&self, dataset: &D) -> Result<f64> {
        Ok(self.evaluate_detailed(dataset)?.accuracy())
    }

    /// Get detailed evaluation metrics
    pub fn evaluate_detailed<D: Dataset>(&self, dataset: &D) -> Result<EvaluationMetrics> {
        let predicted: Vec<f64> = self
            .predict_dataset(dataset)?
            .iter()
            .map(|p| p.label)
            .collect();
        EvaluationMetrics::from_labels(&dataset.get_labels(), &predicted)
    }

    /// Get model information
    pub fn info(&self) -> ModelInfo {
        let state = self.model.state();
        ModelInfo {
            kernel: self.config.kernel,
            n_support_vectors: self.model.n_support_vectors(),
            bias: self.model.bias(),
            passes: state.passes,
            converged: state.converged,
            objective_value: state.objective_value,
            support_vector_indices: self.model.support_vector_indices().to_vec(),
        }
    }

    /// Configuration the model was trained with
    pub fn config(&self) -> &SvmConfig {
        &self.config
    }

    /// Get the underlying trained model
    pub fn inner(&self) -> &TrainedSVM {
        &self.model
    }
}

/// Train once on `training` and classify every vector of `test` in order
pub fn predict<T: AsRef<[f64]>>(
    training: &[Sample],
    test: &[T],
    config: &SvmConfig,
) -> Result<Vec<f64>> {
    let model = SVMTrainer::new(config.clone()).fit_samples(training)?;
    model.classifier().classify_all(test)
}

/// Detailed evaluation metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    pub fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    /// Confusion counts of `predicted` against `truth`
    ///
    /// A label counts as positive only when it equals +1; anything else is
    /// treated as negative.
    pub fn from_labels(truth: &[f64], predicted: &[f64]) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(SVMError::DimensionMismatch {
                expected: truth.len(),
                actual: predicted.len(),
            });
        }

        let mut metrics = Self::default();
        for (&actual, &pred) in truth.iter().zip(predicted) {
            match (pred == 1.0, actual == 1.0) {
                (true, true) => metrics.true_positives += 1,
                (false, false) => metrics.true_negatives += 1,
                (true, false) => metrics.false_positives += 1,
                (false, true) => metrics.false_negatives += 1,
            }
        }
        Ok(metrics)
    }

    /// Total number of scored examples
    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// Calculate accuracy: (TP + TN) / (TP + TN + FP + FN)
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.true_positives + self.true_negatives) as f64 / total as f64
        }
    }

    /// Calculate precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        let denominator = self.true_positives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate recall (sensitivity): TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        let denominator = self.true_positives + self.false_negatives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate F1 score: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(&self) -> f64 {
        if self.true_positives == 0 {
            return 0.0;
        }
        let p = self.precision();
        let r = self.recall();
        2.0 * (p * r) / (p + r)
    }

    /// Calculate specificity: TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        let denominator = self.true_negatives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_negatives as f64 / denominator as f64
        }
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TP: {}", self.true_positives)?;
        writeln!(f, "TN: {}", self.true_negatives)?;
        writeln!(f, "FP: {}", self.false_positives)?;
        writeln!(f, "FN: {}", self.false_negatives)?;
        writeln!(f, "Accuracy:    {:.4}", self.accuracy())?;
        writeln!(f, "Precision:   {:.4}", self.precision())?;
        writeln!(f, "Recall:      {:.4}", self.recall())?;
        writeln!(f, "Specificity: {:.4}", self.specificity())?;
        write!(f, "F1:          {:.4}", self.f1_score())
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub kernel: KernelKind,
    pub n_support_vectors: usize,
    pub bias: f64,
    pub passes: usize,
    pub converged: bool,
    pub objective_value: f64,
    pub support_vector_indices: Vec<usize>,
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;

    /// Train a Gaussian SVM on CSV data with default parameters
    pub fn train_csv<P: AsRef<Path>>(path: P) -> Result<TrainedModel> {
        SVM::new().train_from_csv(path)
    }

    /// Train a linear SVM on CSV data with custom C parameter
    pub fn train_csv_linear<P: AsRef<Path>>(path: P, c: f64) -> Result<TrainedModel> {
        SVM::new()
            .with_kernel(KernelKind::Linear)
            .with_c(c)
            .train_from_csv(path)
    }

    /// Train on a student file with default parameters and options
    pub fn train_student<P: AsRef<Path>>(path: P) -> Result<TrainedModel> {
        SVM::new().train_from_student(path, StudentOptions::default())
    }

    /// Train on the student training file and score the test file
    pub fn evaluate_student_split<P1: AsRef<Path>, P2: AsRef<Path>>(
        train_path: P1,
        test_path: P2,
    ) -> Result<EvaluationMetrics> {
        let model = train_student(train_path)?;
        let test = StudentDataset::from_file(test_path, StudentOptions::default())?;
        model.evaluate_detailed(&test)
    }

    /// Sequential train/test split of a dataset, returning test accuracy
    pub fn simple_validation<D: Dataset>(
        dataset: &D,
        train_ratio: f64,
        config: &SvmConfig,
    ) -> Result<f64> {
        if train_ratio <= 0.0 || train_ratio >= 1.0 {
            return Err(SVMError::InvalidParameter(format!(
                "Train ratio must be between 0 and 1, got: {train_ratio}"
            )));
        }

        let samples = dataset.samples();
        let train_size = (samples.len() as f64 * train_ratio) as usize;
        let (train, test) = samples.split_at(train_size);
        if test.is_empty() {
            return Err(SVMError::EmptyDataset);
        }

        let predicted = predict(train, test, config)?;
        let correct = predicted
            .iter()
            .zip(test)
            .filter(|(&pred, sample)| pred == sample.label)
            .count();

        Ok(correct as f64 / test.len() as f64)
    }
}
