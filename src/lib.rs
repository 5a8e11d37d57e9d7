//! Support Vector Machine trained with Sequential Minimal Optimization
//!
//! Binary soft-margin classifier over dense feature vectors, with linear,
//! Gaussian and polynomial kernels, a loader for the UCI student-performance
//! dataset and a grid search over the Gaussian hyperparameters.
//!
//! Based on "Sequential Minimal Optimization: A Fast Algorithm for Training
//! Support Vector Machines" by John C. Platt

pub mod api;
pub mod cache;
pub mod core;
pub mod data;
pub mod kernel;
pub mod optimizer;
pub mod persistence;
pub mod search;
pub mod solver;
pub mod utils;

// Re-export main types for convenience
pub use crate::api::{predict, EvaluationMetrics, ModelInfo, TrainedModel, SVM};
pub use crate::cache::GramMatrix;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{Result, SVMError};
pub use crate::data::{CSVDataset, StudentDataset, StudentOptions};
pub use crate::kernel::{Kernel, KernelKind};
pub use crate::optimizer::{Classifier, SVMTrainer, TrainedSVM};
pub use crate::search::{GridSearch, GridSearchResult};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
