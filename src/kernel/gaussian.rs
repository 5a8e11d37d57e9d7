//! Gaussian (RBF) kernel implementation
//!
//! The Gaussian kernel is defined as: K(x, y) = exp(-||x - y||² / (2σ²))
//! where σ (sigma) controls the kernel width.

use crate::kernel::Kernel;

/// Gaussian kernel: K(x, y) = exp(-||x - y||² / (2σ²))
///
/// The sigma parameter controls the reach of each training example:
/// - Large sigma: far-away points still look similar, the model behaves
///   almost like a low-dimensional one
/// - Small sigma: only very close points are similar, any labelling becomes
///   separable and the model overfits
#[derive(Debug, Clone, Copy)]
pub struct GaussianKernel {
    sigma: f64,
}

impl GaussianKernel {
    /// Create a new Gaussian kernel with the given width
    ///
    /// # Panics
    /// Panics if sigma is not positive
    pub fn new(sigma: f64) -> Self {
        assert!(sigma > 0.0, "Sigma must be positive, got: {}", sigma);
        Self { sigma }
    }

    /// Get the sigma parameter
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Default for GaussianKernel {
    /// Default Gaussian kernel with sigma = 10
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl Kernel for GaussianKernel {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        gaussian(x, y, self.sigma)
    }

    fn name(&self) -> &'static str {
        "gaussian"
    }
}

pub(crate) fn gaussian(x: &[f64], y: &[f64], sigma: f64) -> f64 {
    let squared_distance = squared_euclidean_distance(x, y);
    (-squared_distance / (2.0 * sigma * sigma)).exp()
}

/// Compute squared Euclidean distance ||x - y||² between two dense vectors
pub(crate) fn squared_euclidean_distance(x: &[f64], y: &[f64]) -> f64 {
    x.iter()
        .zip(y)
        .map(|(a, b)| {
            let diff = a - b;
            diff * diff
        })
        .sum()
}
