//! Kernel functions for SVM

pub mod gaussian;
pub mod kind;
pub mod linear;
pub mod polynomial;
pub mod traits;

pub use self::gaussian::GaussianKernel;
pub use self::kind::KernelKind;
pub use self::linear::LinearKernel;
pub use self::polynomial::PolynomialKernel;
pub use self::traits::*;
