//! SVM solver implementations
//!
//! This module implements the Sequential Minimal Optimization (SMO) algorithm
//! over a dense precomputed kernel matrix, together with the KKT optimality
//! test it relies on and the progress observers it reports to.

pub mod kkt;
pub mod progress;
pub mod smo;

pub use self::progress::{LogProgress, NoProgress, PassSummary, TrainingObserver};
pub use self::smo::*;
