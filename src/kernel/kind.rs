//! Closed set of kernel families used by the trainer

use crate::core::{Result, SVMError};
use crate::kernel::gaussian::gaussian;
use crate::kernel::linear::dot_product;
use crate::kernel::polynomial::polynomial;
use crate::kernel::Kernel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kernel family together with its hyperparameter
///
/// The trainer holds one `KernelKind` for the whole fit and dispatches every
/// evaluation through [`KernelKind::evaluate`].
///
/// # Examples
/// ```
/// use supervise::kernel::KernelKind;
///
/// let kernel = KernelKind::Gaussian { sigma: 10.0 };
/// assert_eq!(kernel.evaluate(&[1.0, 2.0], &[1.0, 2.0]), 1.0);
/// assert_eq!(KernelKind::Linear.evaluate(&[1.0, 2.0], &[3.0, 4.0]), 11.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KernelKind {
    /// K(u, v) = u·v
    Linear,
    /// K(u, v) = exp(-||u - v||² / (2σ²))
    Gaussian { sigma: f64 },
    /// K(u, v) = (u·v + 1)^p
    Polynomial { degree: u32 },
}

impl Default for KernelKind {
    fn default() -> Self {
        KernelKind::Gaussian { sigma: 10.0 }
    }
}

impl KernelKind {
    /// Evaluate the kernel on two vectors of equal dimensionality
    pub fn evaluate(&self, u: &[f64], v: &[f64]) -> f64 {
        match *self {
            KernelKind::Linear => dot_product(u, v),
            KernelKind::Gaussian { sigma } => gaussian(u, v, sigma),
            KernelKind::Polynomial { degree } => polynomial(u, v, degree),
        }
    }

    /// Check the kernel parameter
    pub fn validate(&self) -> Result<()> {
        match *self {
            KernelKind::Gaussian { sigma } if !(sigma.is_finite() && sigma > 0.0) => Err(
                SVMError::InvalidParameter(format!(
                    "Gaussian sigma must be positive and finite, got: {sigma}"
                )),
            ),
            _ => Ok(()),
        }
    }
}

impl Kernel for KernelKind {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        self.evaluate(x, y)
    }

    fn name(&self) -> &'static str {
        match self {
            KernelKind::Linear => "linear",
            KernelKind::Gaussian { .. } => "gaussian",
            KernelKind::Polynomial { .. } => "polynomial",
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelKind::Linear => write!(f, "linear"),
            KernelKind::Gaussian { sigma } => write!(f, "gaussian(sigma={sigma})"),
            KernelKind::Polynomial { degree } => write!(f, "polynomial(p={degree})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{GaussianKernel, LinearKernel, PolynomialKernel};
    use approx::assert_relative_eq;

    const U: [f64; 3] = [0.2, -1.0, 3.5];
    const V: [f64; 3] = [1.4, 0.6, -0.3];

    #[test]
    fn test_dispatch_matches_kernel_structs() {
        assert_eq!(
            KernelKind::Linear.evaluate(&U, &V),
            LinearKernel::new().compute(&U, &V)
        );
        assert_eq!(
            KernelKind::Gaussian { sigma: 2.0 }.evaluate(&U, &V),
            GaussianKernel::new(2.0).compute(&U, &V)
        );
        assert_eq!(
            KernelKind::Polynomial { degree: 3 }.evaluate(&U, &V),
            PolynomialKernel::new(3).compute(&U, &V)
        );
    }

    #[test]
    fn test_every_kind_is_symmetric() {
        let kinds = [
            KernelKind::Linear,
            KernelKind::Gaussian { sigma: 0.5 },
            KernelKind::Polynomial { degree: 2 },
        ];
        for kind in kinds {
            assert_relative_eq!(kind.evaluate(&U, &V), kind.evaluate(&V, &U), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gaussian_self_similarity() {
        for sigma in [0.1, 1.0, 10.0] {
            let kind = KernelKind::Gaussian { sigma };
            assert_eq!(kind.evaluate(&U, &U), 1.0);
            assert_eq!(kind.evaluate(&V, &V), 1.0);
        }
    }

    #[test]
    fn test_validate() {
        assert!(KernelKind::Linear.validate().is_ok());
        assert!(KernelKind::Polynomial { degree: 0 }.validate().is_ok());
        assert!(KernelKind::Gaussian { sigma: 1.0 }.validate().is_ok());
        assert!(KernelKind::Gaussian { sigma: 0.0 }.validate().is_err());
        assert!(KernelKind::Gaussian { sigma: f64::NAN }.validate().is_err());
    }

    #[test]
    fn test_display_and_name() {
        assert_eq!(KernelKind::Linear.to_string(), "linear");
        assert_eq!(
            KernelKind::Gaussian { sigma: 10.0 }.to_string(),
            "gaussian(sigma=10)"
        );
        assert_eq!(
            KernelKind::Polynomial { degree: 2 }.to_string(),
            "polynomial(p=2)"
        );
        assert_eq!(KernelKind::default().name(), "gaussian");
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&KernelKind::Polynomial { degree: 3 }).unwrap();
        assert_eq!(json, r#"{"type":"polynomial","degree":3}"#);

        let back: KernelKind = serde_json::from_str(r#"{"type":"linear"}"#).unwrap();
        assert_eq!(back, KernelKind::Linear);
    }
}
