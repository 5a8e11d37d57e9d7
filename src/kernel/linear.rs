//! Linear kernel implementation

use crate::kernel::Kernel;

/// Linear kernel: K(x, y) = x^T * y
///
/// This is the simplest kernel function, computing the dot product between two vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearKernel;

impl LinearKernel {
    /// Create a new linear kernel
    pub fn new() -> Self {
        Self
    }
}

impl Kernel for LinearKernel {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        dot_product(x, y)
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

/// Compute dot product between two dense vectors
pub(crate) fn dot_product(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_kernel_basic() {
        let kernel = LinearKernel::new();

        let x = [1.0, 0.0, 2.0];
        let y = [0.0, 1.0, 2.0];

        // Only the last coordinate contributes: 2.0 * 2.0 = 4.0
        assert_eq!(kernel.compute(&x, &y), 4.0);
    }

    #[test]
    fn test_linear_kernel_identical() {
        let kernel = LinearKernel::new();
        let x = [1.0, 2.0, 3.0];

        // x^T * x = 1^2 + 2^2 + 3^2 = 14
        assert_eq!(kernel.compute(&x, &x), 14.0);
    }

    #[test]
    fn test_linear_kernel_orthogonal() {
        let kernel = LinearKernel::new();
        assert_eq!(kernel.compute(&[1.0, 0.0], &[0.0, 5.0]), 0.0);
    }

    #[test]
    fn test_linear_kernel_symmetry() {
        let kernel = LinearKernel::new();
        let x = [0.3, -1.2, 4.0];
        let y = [2.5, 0.7, -0.1];
        assert_eq!(kernel.compute(&x, &y), kernel.compute(&y, &x));
    }

    #[test]
    fn test_dot_product_empty() {
        assert_eq!(dot_product(&[], &[]), 0.0);
    }
}
