//! Precomputed kernel (Gram) matrix
//!
//! The SMO solver evaluates the kernel once per unordered pair of training
//! examples before optimization starts and reads every K(i, j) from this
//! dense matrix afterwards. Kernel matrices are symmetric, so each pair is
//! computed once and mirrored.

use crate::core::Sample;
use crate::kernel::KernelKind;

/// Dense symmetric N×N matrix of pairwise kernel values
#[derive(Debug, Clone, PartialEq)]
pub struct GramMatrix {
    n: usize,
    values: Vec<f64>,
    evaluations: usize,
}

impl GramMatrix {
    /// Build the matrix for a training set
    pub fn compute(kernel: &KernelKind, samples: &[Sample]) -> Self {
        let n = samples.len();
        let mut values = vec![0.0; n * n];
        let mut evaluations = 0;

        for i in 0..n {
            for j in i..n {
                let value = kernel.evaluate(&samples[i].features, &samples[j].features);
                values[i * n + j] = value;
                values[j * n + i] = value;
                evaluations += 1;
            }
        }

        Self {
            n,
            values,
            evaluations,
        }
    }

    /// Kernel value K(i, j)
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Row i of the matrix, i.e. K(i, ·)
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Number of training examples the matrix was built for
    pub fn len(&self) -> usize {
        self.n
    }

    /// Check if the matrix is empty
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Number of kernel evaluations spent building the matrix
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Memory held by the matrix entries in bytes
    pub fn memory_bytes(&self) -> usize {
        self.values.len() * std::mem::size_of::<f64>()
    }

    /// Check G[i][j] == G[j][i] for every pair
    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| (i + 1..self.n).all(|j| self.get(i, j) == self.get(j, i)))
    }
}
