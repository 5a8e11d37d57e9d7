//! Training and classification front-ends
//!
//! [`SVMTrainer`] runs the SMO solver over a training set and hands back a
//! [`TrainedSVM`] that owns the fitted state. A [`Classifier`] borrows that
//! state to evaluate the decision function on new vectors.

use crate::core::{Dataset, DualState, Prediction, Result, SVMError, SVMModel, Sample, SvmConfig};
use crate::kernel::KernelKind;
use crate::solver::{SMOSolver, TrainingObserver};
use crate::utils::validation;

/// SVM trainer that owns the hyperparameters of a fit
pub struct SVMTrainer {
    config: SvmConfig,
}

impl SVMTrainer {
    /// Create a new trainer with the given configuration
    pub fn new(config: SvmConfig) -> Self {
        Self { config }
    }

    /// Create a trainer with default parameters and the given kernel
    pub fn with_kernel(kernel: KernelKind) -> Self {
        Self::new(SvmConfig {
            kernel,
            ..SvmConfig::default()
        })
    }

    /// Fit on every sample of a dataset
    pub fn fit<D: Dataset>(&self, dataset: &D) -> Result<TrainedSVM> {
        self.fit_samples(dataset.samples())
    }

    /// Fit on a slice of samples
    pub fn fit_samples(&self, samples: &[Sample]) -> Result<TrainedSVM> {
        let solver = SMOSolver::new(self.config.clone());
        let state = solver.solve(samples)?;
        Ok(TrainedSVM::new(self.config.kernel, dim_of(samples), samples.to_vec(), state))
    }

    /// Fit on a slice of samples, reporting progress to `observer`
    pub fn fit_with_observer(
        &self,
        samples: &[Sample],
        observer: &mut dyn TrainingObserver,
    ) -> Result<TrainedSVM> {
        let solver = SMOSolver::new(self.config.clone());
        let state = solver.solve_with_observer(samples, observer)?;
        Ok(TrainedSVM::new(self.config.kernel, dim_of(samples), samples.to_vec(), state))
    }

    /// Get the trainer configuration
    pub fn config(&self) -> &SvmConfig {
        &self.config
    }
}

fn dim_of(samples: &[Sample]) -> usize {
    samples.first().map(Sample::dim).unwrap_or(0)
}

/// Fitted model: training vectors, labels and the final dual state
#[derive(Debug, Clone)]
pub struct TrainedSVM {
    kernel: KernelKind,
    dim: usize,
    samples: Vec<Sample>,
    state: DualState,
}

impl TrainedSVM {
    pub(crate) fn new(kernel: KernelKind, dim: usize, samples: Vec<Sample>, state: DualState) -> Self {
        Self {
            kernel,
            dim,
            samples,
            state,
        }
    }

    /// Rebuild a model from stored vectors, multipliers and bias
    ///
    /// `dim` is the input dimensionality the model accepts; it is kept
    /// separately so a model without support vectors still checks its input.
    pub fn from_parts(
        kernel: KernelKind,
        dim: usize,
        samples: Vec<Sample>,
        alpha: Vec<f64>,
        b: f64,
    ) -> Result<Self> {
        kernel.validate()?;
        if alpha.len() != samples.len() {
            return Err(SVMError::DimensionMismatch {
                expected: samples.len(),
                actual: alpha.len(),
            });
        }
        if !samples.is_empty() {
            let actual = validation::validate_training_set(&samples)?;
            if actual != dim {
                return Err(SVMError::DimensionMismatch {
                    expected: dim,
                    actual,
                });
            }
        }
        if let Some(a) = alpha.iter().find(|a| !(a.is_finite() && **a >= 0.0)) {
            return Err(SVMError::InvalidParameter(format!(
                "Alpha values must be finite and non-negative, got: {a}"
            )));
        }

        let support_vectors = alpha
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| if a > 0.0 { Some(i) } else { None })
            .collect();

        Ok(Self::new(
            kernel,
            dim,
            samples,
            DualState {
                alpha,
                b,
                support_vectors,
                passes: 0,
                converged: true,
                objective_value: 0.0,
            },
        ))
    }

    /// Borrow the fitted state for classification
    pub fn classifier(&self) -> Classifier<'_> {
        Classifier {
            kernel: &self.kernel,
            samples: &self.samples,
            alpha: &self.state.alpha,
            support_vectors: &self.state.support_vectors,
            b: self.state.b,
            dim: self.dim,
        }
    }

    /// Get the decision function value for a feature vector
    pub fn decision_function(&self, features: &[f64]) -> Result<f64> {
        self.classifier().decision_function(features)
    }

    /// Predicted label (+1 or -1) for a feature vector
    pub fn classify(&self, features: &[f64]) -> Result<f64> {
        self.classifier().classify(features)
    }

    /// Kernel used for training
    pub fn kernel(&self) -> &KernelKind {
        &self.kernel
    }

    /// Fitted dual state
    pub fn state(&self) -> &DualState {
        &self.state
    }

    /// Training samples in their original order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Dimensionality of the vectors the model accepts
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Support vectors with their multipliers
    pub fn support_vectors(&self) -> impl Iterator<Item = (&Sample, f64)> + '_ {
        self.state
            .support_vectors
            .iter()
            .map(move |&i| (&self.samples[i], self.state.alpha[i]))
    }

    /// Get the indices of support vectors in the training set
    pub fn support_vector_indices(&self) -> &[usize] {
        &self.state.support_vectors
    }
}

impl SVMModel for TrainedSVM {
    fn predict(&self, features: &[f64]) -> Result<Prediction> {
        self.classifier().predict(features)
    }

    fn n_support_vectors(&self) -> usize {
        self.state.support_vectors.len()
    }

    fn bias(&self) -> f64 {
        self.state.b
    }
}

/// Read-only view over a fitted model
///
/// Evaluates f(x) = Σ alpha_i y_i K(x, x_i) + b over the support vectors
/// only, so a call costs O(S·D) for S support vectors.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    kernel: &'a KernelKind,
    samples: &'a [Sample],
    alpha: &'a [f64],
    support_vectors: &'a [usize],
    b: f64,
    dim: usize,
}

impl<'a> Classifier<'a> {
    /// Raw decision value for a feature vector
    pub fn decision_function(&self, features: &[f64]) -> Result<f64> {
        validation::validate_dimension(features, self.dim)?;
        Ok(self.decision_unchecked(features))
    }

    /// Decision value for a vector already known to have `dim` features
    fn decision_unchecked(&self, features: &[f64]) -> f64 {
        self.support_vectors
            .iter()
            .map(|&i| {
                let sv = &self.samples[i];
                self.alpha[i] * sv.label * self.kernel.evaluate(features, &sv.features)
            })
            .sum::<f64>()
            + self.b
    }

    /// Predicted label; a zero decision value maps to -1
    pub fn classify(&self, features: &[f64]) -> Result<f64> {
        self.predict(features).map(|p| p.label)
    }

    /// Classify a batch of vectors, failing on the first malformed one
    pub fn classify_all<T: AsRef<[f64]>>(&self, data: &[T]) -> Result<Vec<f64>> {
        data.iter().map(|datum| self.classify(datum.as_ref())).collect()
    }
}

impl SVMModel for Classifier<'_> {
    fn predict(&self, features: &[f64]) -> Result<Prediction> {
        self.decision_function(features).map(Prediction::from_decision)
    }

    fn n_support_vectors(&self) -> usize {
        self.support_vectors.len()
    }

    fn bias(&self) -> f64 {
        self.b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_trainer(c: f64) -> SVMTrainer {
        SVMTrainer::new(SvmConfig {
            kernel: KernelKind::Linear,
            c,
            ..SvmConfig::default()
        })
    }

    #[test]
    fn test_trainer_with_kernel_uses_defaults() {
        let trainer = SVMTrainer::with_kernel(KernelKind::Linear);
        assert_eq!(trainer.config().kernel, KernelKind::Linear);
        assert_eq!(trainer.config().c, 200.0);
        assert_eq!(trainer.config().epsilon, 0.0001);
    }

    #[test]
    fn test_svm_training_simple_case() {
        let samples = vec![
            Sample::new(vec![2.0], 1.0),
            Sample::new(vec![-2.0], -1.0),
            Sample::new(vec![1.5], 1.0),
            Sample::new(vec![-1.5], -1.0),
        ];

        let model = linear_trainer(1.0)
            .fit_samples(&samples)
            .expect("Training should succeed");

        assert!(model.n_support_vectors() > 0);
        assert_eq!(model.dim(), 1);

        for sample in &samples {
            assert_eq!(model.classify(&sample.features).unwrap(), sample.label);
        }
    }

    #[test]
    fn test_decision_function_orders_points() {
        let samples = vec![Sample::new(vec![1.0], 1.0), Sample::new(vec![-1.0], -1.0)];
        let model = linear_trainer(1.0).fit_samples(&samples).unwrap();

        let positive = model.decision_function(&[0.5]).unwrap();
        let negative = model.decision_function(&[-0.5]).unwrap();
        assert!(positive > negative);
        assert!(positive > 0.0);
        assert!(negative < 0.0);
    }

    #[test]
    fn test_classifier_borrows_fitted_state() {
        let samples = vec![
            Sample::new(vec![1.0, 1.0], 1.0),
            Sample::new(vec![-1.0, -1.0], -1.0),
        ];
        let model = linear_trainer(1.0).fit_samples(&samples).unwrap();
        let classifier = model.classifier();

        assert_eq!(classifier.n_support_vectors(), model.n_support_vectors());
        assert_eq!(classifier.bias(), model.bias());

        let predictions = classifier
            .predict_batch(&[
                Sample::new(vec![0.5, 0.5], 1.0),
                Sample::new(vec![-0.5, -0.5], -1.0),
            ])
            .unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].label, 1.0);
        assert_eq!(predictions[1].label, -1.0);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let samples = vec![
            Sample::new(vec![0.0, 0.0], -1.0),
            Sample::new(vec![1.0, 1.0], -1.0),
            Sample::new(vec![0.0, 1.0], 1.0),
            Sample::new(vec![1.0, 0.0], 1.0),
        ];
        let model = SVMTrainer::with_kernel(KernelKind::Gaussian { sigma: 0.5 })
            .fit_samples(&samples)
            .unwrap();
        let classifier = model.classifier();

        let point = [0.3, 0.8];
        let first = classifier.decision_function(&point).unwrap();
        for _ in 0..5 {
            assert_eq!(classifier.decision_function(&point).unwrap(), first);
            assert_eq!(
                classifier.classify(&point).unwrap(),
                model.classify(&point).unwrap()
            );
        }
    }

    #[test]
    fn test_classify_rejects_wrong_dimension() {
        let samples = vec![
            Sample::new(vec![1.0, 1.0], 1.0),
            Sample::new(vec![-1.0, -1.0], -1.0),
        ];
        let model = linear_trainer(1.0).fit_samples(&samples).unwrap();

        assert_eq!(model.classify(&[1.0, 2.0]).unwrap(), 1.0);

        // Too short and too long are both refused, not truncated
        assert!(matches!(
            model.classify(&[5.0]),
            Err(SVMError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(matches!(
            model.classify(&[5.0, 5.0, 5.0]),
            Err(SVMError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
        assert!(model.decision_function(&[5.0]).is_err());
        assert!(model.predict(&[]).is_err());

        let classifier = model.classifier();
        assert!(matches!(
            classifier.classify(&[5.0]),
            Err(SVMError::DimensionMismatch { .. })
        ));
        assert!(classifier
            .classify_all(&[vec![1.0, 1.0], vec![1.0]])
            .is_err());
        assert_eq!(
            classifier
                .classify_all(&[vec![1.0, 1.0], vec![-1.0, -2.0]])
                .unwrap(),
            vec![1.0, -1.0]
        );
    }

    #[test]
    fn test_model_without_support_vectors_checks_dimension() {
        let model = TrainedSVM::from_parts(KernelKind::Linear, 3, vec![], vec![], 1.0).unwrap();

        assert_eq!(model.classify(&[0.0, 0.0, 0.0]).unwrap(), 1.0);
        assert!(matches!(
            model.classify(&[0.0]),
            Err(SVMError::DimensionMismatch {
                expected: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_zero_decision_is_negative_class() {
        let model = TrainedSVM::from_parts(
            KernelKind::Linear,
            1,
            vec![Sample::new(vec![1.0], 1.0)],
            vec![0.0],
            0.0,
        )
        .unwrap();

        assert_eq!(model.decision_function(&[3.0]).unwrap(), 0.0);
        assert_eq!(model.classify(&[3.0]).unwrap(), -1.0);
        assert_eq!(model.n_support_vectors(), 0);
    }

    #[test]
    fn test_from_parts_validation() {
        let samples = vec![Sample::new(vec![1.0], 1.0)];
        assert!(
            TrainedSVM::from_parts(KernelKind::Linear, 1, samples.clone(), vec![], 0.0).is_err()
        );
        assert!(
            TrainedSVM::from_parts(KernelKind::Linear, 1, samples.clone(), vec![-1.0], 0.0)
                .is_err()
        );
        assert!(matches!(
            TrainedSVM::from_parts(KernelKind::Linear, 2, samples.clone(), vec![1.0], 0.0),
            Err(SVMError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(TrainedSVM::from_parts(
            KernelKind::Gaussian { sigma: -1.0 },
            1,
            samples,
            vec![1.0],
            0.0
        )
        .is_err());
    }

    #[test]
    fn test_support_vector_access() {
        let samples = vec![
            Sample::new(vec![2.0], 1.0),
            Sample::new(vec![-2.0], -1.0),
            Sample::new(vec![1.0], 1.0),
        ];
        let model = linear_trainer(1.0).fit_samples(&samples).unwrap();

        let indices = model.support_vector_indices();
        assert_eq!(model.support_vectors().count(), indices.len());
        for (sample, alpha) in model.support_vectors() {
            assert!(alpha > 0.0);
            assert!(samples.contains(sample));
        }
        for &idx in indices {
            assert!(idx < samples.len());
        }
    }

    #[test]
    fn test_single_class_model_predicts_that_class() {
        let samples = vec![Sample::new(vec![0.0, 1.0], 1.0), Sample::new(vec![2.0, 3.0], 1.0)];
        let model = SVMTrainer::with_kernel(KernelKind::Gaussian { sigma: 1.0 })
            .fit_samples(&samples)
            .unwrap();

        for point in [[0.0, 0.0], [10.0, -4.0], [2.0, 3.0]] {
            assert_eq!(model.classify(&point).unwrap(), 1.0);
        }
    }
}
