//! Sequential Minimal Optimization (SMO) solver implementation
//!
//! Solves the soft-margin SVM dual by repeatedly optimizing a pair of
//! Lagrange multipliers over a precomputed Gram matrix. Outer passes visit
//! every example in index order; a KKT violator becomes the first variable
//! and its partner is chosen by the maximum |E_i - E_j| heuristic.

use crate::cache::GramMatrix;
use crate::core::{DualState, Result, Sample, SvmConfig};
use crate::solver::kkt;
use crate::solver::progress::{LogProgress, PassSummary, TrainingObserver};
use crate::utils::validation;
use log::{info, warn};

/// Below this value K_ii + K_jj - 2K_ij is treated as zero
const MIN_ETA: f64 = 1e-12;

/// SMO solver for SVM optimization
pub struct SMOSolver {
    config: SvmConfig,
}

/// Result of one attempted pair update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOutcome {
    Committed,
    NoProgress,
    Degenerate,
}

/// Mutable optimization state, exclusively owned by one `solve` call
struct SmoState<'a> {
    samples: &'a [Sample],
    gram: &'a GramMatrix,
    alpha: Vec<f64>,
    b: f64,
    /// E_i = g(x_i) - y_i, kept in sync with alpha and b after every commit
    errors: Vec<f64>,
}

impl SMOSolver {
    /// Create a new SMO solver with the given configuration
    pub fn new(config: SvmConfig) -> Self {
        Self { config }
    }

    /// Get the solver configuration
    pub fn config(&self) -> &SvmConfig {
        &self.config
    }

    /// Solve the SVM optimization problem, reporting progress through `log`
    pub fn solve(&self, samples: &[Sample]) -> Result<DualState> {
        self.solve_with_observer(samples, &mut LogProgress)
    }

    /// Solve the SVM optimization problem with a custom progress observer
    pub fn solve_with_observer(
        &self,
        samples: &[Sample],
        observer: &mut dyn TrainingObserver,
    ) -> Result<DualState> {
        self.config.validate()?;
        let dim = validation::validate_training_set(samples)?;

        info!(
            "Training on {} samples with {} features, kernel={}, C={}, epsilon={}",
            samples.len(),
            dim,
            self.config.kernel,
            self.config.c,
            self.config.epsilon
        );

        // With a single class the equality constraint sum(alpha_i * y_i) = 0
        // pins every alpha to zero; the bias alone carries the class.
        if let Some(label) = validation::single_class(samples) {
            warn!("All training labels are {label}; every prediction will be {label}");
            observer.fit_finished(0, true);
            return Ok(DualState {
                alpha: vec![0.0; samples.len()],
                b: label,
                support_vectors: Vec::new(),
                passes: 0,
                converged: true,
                objective_value: 0.0,
            });
        }

        let gram = GramMatrix::compute(&self.config.kernel, samples);
        self.solve_with_gram(samples, &gram, observer)
    }

    /// Run the SMO loop over an already computed Gram matrix
    ///
    /// The samples must have passed validation and `gram` must have been
    /// built from them with this solver's kernel.
    pub fn solve_with_gram(
        &self,
        samples: &[Sample],
        gram: &GramMatrix,
        observer: &mut dyn TrainingObserver,
    ) -> Result<DualState> {
        let n = samples.len();
        let mut state = SmoState {
            samples,
            gram,
            alpha: vec![0.0; n],
            b: 0.0,
            // All alphas start at zero, so g(x_i) = 0 and E_i = -y_i
            errors: samples.iter().map(|s| -s.label).collect(),
        };

        let mut passes = 0;
        let mut converged = false;

        while passes < self.config.max_passes {
            passes += 1;
            observer.pass_started(passes, n);

            let mut summary = PassSummary {
                pass: passes,
                violations: 0,
                updates: 0,
                degenerate_pairs: 0,
            };

            for i in 0..n {
                if self.satisfies_kkt(&state, i) {
                    continue;
                }
                summary.violations += 1;

                for j in self.second_choices(&state, i) {
                    match self.take_step(&mut state, i, j) {
                        StepOutcome::Committed => {
                            summary.updates += 1;
                            break;
                        }
                        StepOutcome::Degenerate => summary.degenerate_pairs += 1,
                        StepOutcome::NoProgress => {}
                    }
                }
            }

            observer.pass_finished(&summary);

            if summary.updates == 0 {
                converged = true;
                break;
            }
        }

        observer.fit_finished(passes, converged);

        let support_vectors: Vec<usize> = state
            .alpha
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| if a > 0.0 { Some(i) } else { None })
            .collect();

        let objective_value = calculate_objective(&state.alpha, samples, gram, &support_vectors);

        Ok(DualState {
            alpha: state.alpha,
            b: state.b,
            support_vectors,
            passes,
            converged,
            objective_value,
        })
    }

    fn satisfies_kkt(&self, state: &SmoState<'_>, i: usize) -> bool {
        let y_i = state.samples[i].label;
        // y_i * g(x_i) = y_i * (E_i + y_i)
        let margin = y_i * (state.errors[i] + y_i);
        kkt::is_satisfied(state.alpha[i], margin, self.config.c, self.config.epsilon)
    }

    /// Partner candidates for `i`, best first
    ///
    /// The head of the list is argmax_k |E_i - E_k|. When that pair makes no
    /// progress the remaining examples are tried in the same order, ties
    /// broken by index.
    fn second_choices(&self, state: &SmoState<'_>, i: usize) -> Vec<usize> {
        let e_i = state.errors[i];
        let mut candidates: Vec<(usize, f64)> = state
            .errors
            .iter()
            .enumerate()
            .filter(|&(k, _)| k != i)
            .map(|(k, &e_k)| (k, (e_i - e_k).abs()))
            .collect();

        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
        candidates.into_iter().map(|(k, _)| k).collect()
    }

    /// Perform the analytic two-variable update for examples i and j
    fn take_step(&self, state: &mut SmoState<'_>, i: usize, j: usize) -> StepOutcome {
        let c = self.config.c;
        let y_i = state.samples[i].label;
        let y_j = state.samples[j].label;
        let alpha_i_old = state.alpha[i];
        let alpha_j_old = state.alpha[j];
        let e_i = state.errors[i];
        let e_j = state.errors[j];

        let k_ii = state.gram.get(i, i);
        let k_jj = state.gram.get(j, j);
        let k_ij = state.gram.get(i, j);

        let eta = k_ii + k_jj - 2.0 * k_ij;
        if eta <= MIN_ETA {
            // Identical points under the kernel: the pair has no curvature
            return StepOutcome::Degenerate;
        }

        // Bounds on the new alpha_j
        let (low, high) = if y_i == y_j {
            let sum = alpha_i_old + alpha_j_old;
            (0.0_f64.max(sum - c), c.min(sum))
        } else {
            let diff = alpha_j_old - alpha_i_old;
            (0.0_f64.max(diff), c.min(c + diff))
        };

        let alpha_j_new = (alpha_j_old + y_j * (e_i - e_j) / eta).clamp(low, high.max(low));
        let alpha_i_new =
            (alpha_i_old + y_i * y_j * (alpha_j_old - alpha_j_new)).clamp(0.0, c);

        let delta_i = alpha_i_new - alpha_i_old;
        let delta_j = alpha_j_new - alpha_j_old;

        if delta_i.abs() < self.config.min_alpha_change
            && delta_j.abs() < self.config.min_alpha_change
        {
            return StepOutcome::NoProgress;
        }

        let b_old = state.b;
        let b_1 = -e_i - y_i * k_ii * delta_i - y_j * k_ij * delta_j + b_old;
        let b_2 = -e_j - y_i * k_ij * delta_i - y_j * k_jj * delta_j + b_old;

        let b_new = if alpha_i_new > 0.0 && alpha_i_new < c {
            b_1
        } else if alpha_j_new > 0.0 && alpha_j_new < c {
            b_2
        } else {
            (b_1 + b_2) / 2.0
        };

        state.alpha[i] = alpha_i_new;
        state.alpha[j] = alpha_j_new;
        state.b = b_new;

        let delta_b = b_new - b_old;
        let row_i = state.gram.row(i);
        let row_j = state.gram.row(j);
        for (k, error) in state.errors.iter_mut().enumerate() {
            *error += y_i * delta_i * row_i[k] + y_j * delta_j * row_j[k] + delta_b;
        }

        StepOutcome::Committed
    }
}

/// Dual objective: sum(alpha) - 1/2 * sum_ij alpha_i alpha_j y_i y_j K_ij
fn calculate_objective(
    alpha: &[f64],
    samples: &[Sample],
    gram: &GramMatrix,
    support_vectors: &[usize],
) -> f64 {
    let linear: f64 = alpha.iter().sum();
    let mut quadratic = 0.0;

    for &i in support_vectors {
        for &j in support_vectors {
            quadratic += alpha[i] * alpha[j] * samples[i].label * samples[j].label * gram.get(i, j);
        }
    }

    linear - 0.5 * quadratic
}
