//! Kernel trait definition

/// Kernel function trait
///
/// A kernel function K(x, y) must be symmetric and satisfy Mercer's
/// condition to be valid for SVM training. Both arguments are dense feature
/// vectors of the same dimensionality; callers validate dimensions before
/// evaluating.
pub trait Kernel {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: &[f64], y: &[f64]) -> f64;

    /// Human-readable kernel name
    fn name(&self) -> &'static str;
}
