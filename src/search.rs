//! Grid search over Gaussian-kernel hyperparameters
//!
//! Every combination of C, sigma and epsilon is trained on a prefix of the
//! training set and scored by F1 on the test set. Combinations are visited
//! with C outermost and epsilon innermost; the first combination reaching
//! the highest F1 wins.

use crate::api::{self, EvaluationMetrics};
use crate::core::{Result, SVMError, Sample, SvmConfig};
use crate::kernel::KernelKind;
use log::{debug, info};

/// One evaluated combination
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub c: f64,
    pub sigma: f64,
    pub epsilon: f64,
    pub f1: f64,
}

/// Outcome of a grid search
#[derive(Debug, Clone, Default)]
pub struct GridSearchResult {
    /// Best combination, `None` when no combination scored above zero
    pub best: Option<GridPoint>,
    /// Every combination in visiting order
    pub evaluated: Vec<GridPoint>,
}

/// Exhaustive search over (C, sigma, epsilon)
#[derive(Debug, Clone)]
pub struct GridSearch {
    c_values: Vec<f64>,
    sigma_values: Vec<f64>,
    epsilon_values: Vec<f64>,
    subset: usize,
    max_passes: usize,
}

impl Default for GridSearch {
    fn default() -> Self {
        Self {
            // 2^-5, 2^-3, ..., 2^15
            c_values: (-5..=15).step_by(2).map(|e| 2f64.powi(e)).collect(),
            // 2^-3, ..., 2^7
            sigma_values: (-3..=7).map(|e| 2f64.powi(e)).collect(),
            // 10^-6, ..., 10^-1
            epsilon_values: (-6..=-1).map(|e| 10f64.powi(e)).collect(),
            subset: 100,
            max_passes: SvmConfig::default().max_passes,
        }
    }
}

impl GridSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_c_values(mut self, values: Vec<f64>) -> Self {
        self.c_values = values;
        self
    }

    pub fn with_sigma_values(mut self, values: Vec<f64>) -> Self {
        self.sigma_values = values;
        self
    }

    pub fn with_epsilon_values(mut self, values: Vec<f64>) -> Self {
        self.epsilon_values = values;
        self
    }

    /// Train each combination on the first `subset` training samples
    pub fn with_subset(mut self, subset: usize) -> Self {
        self.subset = subset;
        self
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Number of combinations the search will train
    pub fn n_combinations(&self) -> usize {
        self.c_values.len() * self.sigma_values.len() * self.epsilon_values.len()
    }

    /// Run the search
    pub fn run(&self, train: &[Sample], test: &[Sample]) -> Result<GridSearchResult> {
        if self.n_combinations() == 0 {
            return Err(SVMError::InvalidParameter(
                "Grid search needs at least one value per hyperparameter".to_string(),
            ));
        }
        if self.subset == 0 {
            return Err(SVMError::InvalidParameter(
                "Grid search subset must be at least 1".to_string(),
            ));
        }
        if test.is_empty() {
            return Err(SVMError::EmptyDataset);
        }

        let train = &train[..self.subset.min(train.len())];
        let truth: Vec<f64> = test.iter().map(|s| s.label).collect();
        info!(
            "Grid search over {} combinations, {} training and {} test samples",
            self.n_combinations(),
            train.len(),
            test.len()
        );

        let mut result = GridSearchResult::default();
        let mut best_f1 = 0.0;

        for &c in &self.c_values {
            for &sigma in &self.sigma_values {
                for &epsilon in &self.epsilon_values {
                    let config = SvmConfig {
                        kernel: KernelKind::Gaussian { sigma },
                        c,
                        epsilon,
                        max_passes: self.max_passes,
                        ..SvmConfig::default()
                    };
                    let predicted = api::predict(train, test, &config)?;
                    let f1 = EvaluationMetrics::from_labels(&truth, &predicted)?.f1_score();
                    debug!("C={c} sigma={sigma} epsilon={epsilon}: F1={f1:.4}");

                    let point = GridPoint {
                        c,
                        sigma,
                        epsilon,
                        f1,
                    };
                    if f1 > best_f1 {
                        best_f1 = f1;
                        result.best = Some(point);
                    }
                    result.evaluated.push(point);
                }
            }
        }

        match &result.best {
            Some(best) => info!(
                "Best F1 {:.4} at C={} sigma={} epsilon={}",
                best.f1, best.c, best.sigma, best.epsilon
            ),
            None => info!("No combination scored above zero"),
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clusters() -> Vec<Sample> {
        let mut samples = Vec::new();
        for k in 0..20 {
            let dx = ((k % 5) as f64 - 2.0) * 0.15;
            let dy = ((k / 5) as f64 - 1.5) * 0.2;
            samples.push(Sample::new(vec![2.0 + dx, 2.0 + dy], 1.0));
            samples.push(Sample::new(vec![-2.0 - dy, -2.0 + dx], -1.0));
        }
        samples
    }

    fn small_grid() -> GridSearch {
        GridSearch::new()
            .with_c_values(vec![1.0, 10.0])
            .with_sigma_values(vec![1.0, 2.0])
            .with_epsilon_values(vec![1e-3])
    }

    #[test]
    fn test_default_grids() {
        let search = GridSearch::default();
        assert_eq!(search.c_values.len(), 11);
        assert_eq!(search.c_values[0], 1.0 / 32.0);
        assert_eq!(search.c_values[10], 32768.0);
        assert_eq!(search.sigma_values.len(), 11);
        assert_eq!(search.sigma_values[0], 0.125);
        assert_eq!(search.sigma_values[10], 128.0);
        assert_eq!(search.epsilon_values.len(), 6);
        assert_eq!(search.subset, 100);
        assert_eq!(search.n_combinations(), 726);
    }

    #[test]
    fn test_search_finds_perfect_combination() {
        let data = clusters();
        let result = small_grid().run(&data, &data).unwrap();

        assert_eq!(result.evaluated.len(), 4);
        let best = result.best.expect("a combination should score");
        assert_eq!(best.f1, 1.0);
        // First combination reaching the best score wins
        let first_best = result.evaluated.iter().find(|p| p.f1 == 1.0).unwrap();
        assert_eq!(best, *first_best);
    }

    #[test]
    fn test_search_visits_c_outermost() {
        let data = clusters();
        let result = small_grid().run(&data, &data).unwrap();
        let order: Vec<(f64, f64)> = result.evaluated.iter().map(|p| (p.c, p.sigma)).collect();
        assert_eq!(order, vec![(1.0, 1.0), (1.0, 2.0), (10.0, 1.0), (10.0, 2.0)]);
    }

    #[test]
    fn test_search_without_positive_score() {
        let data = clusters();
        let negatives: Vec<Sample> = data.iter().filter(|s| s.label < 0.0).cloned().collect();
        let result = small_grid().run(&data, &negatives).unwrap();
        assert!(result.best.is_none());
        assert!(result.evaluated.iter().all(|p| p.f1 == 0.0));
    }

    #[test]
    fn test_search_rejects_empty_grid() {
        let data = clusters();
        let search = small_grid().with_sigma_values(vec![]);
        assert!(matches!(
            search.run(&data, &data),
            Err(SVMError::InvalidParameter(_))
        ));
        assert!(small_grid().with_subset(0).run(&data, &data).is_err());
    }

    #[test]
    fn test_subset_limits_training() {
        let data = clusters();
        // The first two samples are one of each class
        let result = small_grid().with_subset(2).run(&data, &data).unwrap();
        assert_eq!(result.evaluated.len(), 4);
        assert!(result.best.is_some());
    }
}
