//! Model serialization and persistence
//!
//! This module provides functionality to save and load trained SVM models
//! for use with the CLI application and other scenarios where model persistence is needed.

use crate::api::TrainedModel;
use crate::core::{Result, SVMError, SVMModel, Sample, SvmConfig};
use crate::kernel::KernelKind;
use crate::optimizer::TrainedSVM;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable representation of a trained SVM model
///
/// Only support vectors are stored; training examples with alpha = 0 do not
/// contribute to the decision function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableModel {
    /// Kernel family and parameter
    pub kernel: KernelKind,
    /// Support vectors with their labels
    pub support_vectors: Vec<Sample>,
    /// Alpha values times labels (alpha_i * y_i)
    pub alpha_y: Vec<f64>,
    /// Bias term
    pub bias: f64,
    /// Model metadata
    pub metadata: ModelMetadata,
}

/// Model metadata for tracking and validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Number of support vectors
    pub n_support_vectors: usize,
    /// Number of training examples the model was fitted on
    pub n_training_samples: usize,
    /// Feature dimensionality
    pub dim: usize,
    /// Training parameters used
    pub training_params: SvmConfig,
    /// Outer SMO passes performed
    pub passes: usize,
    /// Whether training converged before the pass limit
    pub converged: bool,
    /// Creation timestamp
    pub created_at: String,
}

impl SerializableModel {
    /// Create a serializable model from a trained model
    pub fn from_trained_model(model: &TrainedModel) -> Self {
        let inner = model.inner();
        let state = inner.state();

        let (support_vectors, alpha_y): (Vec<Sample>, Vec<f64>) = inner
            .support_vectors()
            .map(|(sample, alpha)| (sample.clone(), alpha * sample.label))
            .unzip();

        Self {
            kernel: *inner.kernel(),
            support_vectors,
            alpha_y,
            bias: inner.bias(),
            metadata: ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                n_support_vectors: inner.n_support_vectors(),
                n_training_samples: inner.samples().len(),
                dim: inner.dim(),
                training_params: model.config().clone(),
                passes: state.passes,
                converged: state.converged,
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let model = serde_json::from_reader(reader)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        Ok(model)
    }

    /// Convert back to a trained model that classifies like the original
    pub fn to_trained_model(&self) -> Result<TrainedModel> {
        if self.alpha_y.len() != self.support_vectors.len() {
            return Err(SVMError::SerializationError(format!(
                "{} support vectors but {} coefficients",
                self.support_vectors.len(),
                self.alpha_y.len()
            )));
        }

        let alpha = self
            .alpha_y
            .iter()
            .zip(&self.support_vectors)
            .map(|(&ay, sv)| ay * sv.label)
            .collect();

        let inner = TrainedSVM::from_parts(
            self.kernel,
            self.metadata.dim,
            self.support_vectors.clone(),
            alpha,
            self.bias,
        )?;
        Ok(TrainedModel::from_parts(
            inner,
            self.metadata.training_params.clone(),
        ))
    }

    /// Print model summary
    pub fn print_summary(&self) {
        let params = &self.metadata.training_params;
        println!("=== SVM Model Summary ===");
        println!("Kernel: {}", self.kernel);
        println!("Support Vectors: {}", self.metadata.n_support_vectors);
        println!("Training Samples: {}", self.metadata.n_training_samples);
        println!("Features: {}", self.metadata.dim);
        println!("Bias: {:.6}", self.bias);
        println!("Passes: {}", self.metadata.passes);
        println!("Converged: {}", self.metadata.converged);
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
        println!("Training Parameters:");
        println!("  C: {}", params.c);
        println!("  Epsilon: {}", params.epsilon);
        println!("  Max Passes: {}", params.max_passes);
    }
}
