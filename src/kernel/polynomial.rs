//! Polynomial Kernel Implementation
//!
//! The polynomial kernel is defined as:
//! K(x, y) = (<x, y> + 1)^p
//!
//! Common configurations:
//! - p = 1: linear kernel shifted by a constant
//! - p = 2: quadratic kernel (default)
//! - p = 0: constant kernel, every pair has similarity 1

use crate::kernel::linear::dot_product;
use crate::kernel::traits::Kernel;

/// Polynomial kernel with configurable degree
#[derive(Debug, Clone, Copy)]
pub struct PolynomialKernel {
    /// Degree of the polynomial (default: 2)
    pub degree: u32,
}

impl PolynomialKernel {
    /// Creates a new polynomial kernel of the given degree
    ///
    /// # Examples
    /// ```
    /// use supervise::kernel::{Kernel, PolynomialKernel};
    ///
    /// // Quadratic kernel: (x·y + 1)²
    /// let kernel = PolynomialKernel::new(2);
    /// assert_eq!(kernel.compute(&[1.0, 2.0], &[2.0, 1.0]), 25.0);
    /// ```
    pub fn new(degree: u32) -> Self {
        Self { degree }
    }

    /// Creates a quadratic kernel: (<x,y> + 1)²
    pub fn quadratic() -> Self {
        Self::new(2)
    }
}

impl Default for PolynomialKernel {
    fn default() -> Self {
        Self::quadratic()
    }
}

impl Kernel for PolynomialKernel {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        polynomial(x, y, self.degree)
    }

    fn name(&self) -> &'static str {
        "polynomial"
    }
}

pub(crate) fn polynomial(x: &[f64], y: &[f64], degree: u32) -> f64 {
    let base = dot_product(x, y) + 1.0;
    // Integer exponentiation; degrees beyond i32 would overflow any f64 anyway
    base.powi(degree.min(i32::MAX as u32) as i32)
}
