//! Progress reporting for the SMO loop
//!
//! Observers are advisory: they receive copies of the loop counters and
//! cannot influence the optimization.

use log::{debug, info, warn};

/// Summary of one outer pass over the training set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    /// 1-based pass number
    pub pass: usize,
    /// Examples that violated the KKT conditions at their turn
    pub violations: usize,
    /// Pair updates committed during the pass
    pub updates: usize,
    /// Pairs skipped because K_ii + K_jj - 2K_ij vanished
    pub degenerate_pairs: usize,
}

/// Receives progress events from the solver
pub trait TrainingObserver {
    /// Called before pass `pass` visits the `n` training examples
    fn pass_started(&mut self, _pass: usize, _n: usize) {}

    /// Called after every pass
    fn pass_finished(&mut self, _summary: &PassSummary) {}

    /// Called once when the loop stops
    fn fit_finished(&mut self, _passes: usize, _converged: bool) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl TrainingObserver for NoProgress {}

/// Observer that reports through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl TrainingObserver for LogProgress {
    fn pass_started(&mut self, pass: usize, n: usize) {
        debug!("pass {pass}: examining {n} examples");
    }

    fn pass_finished(&mut self, summary: &PassSummary) {
        debug!(
            "pass {} done: {} KKT violations, {} updates, {} degenerate pairs",
            summary.pass, summary.violations, summary.updates, summary.degenerate_pairs
        );
    }

    fn fit_finished(&mut self, passes: usize, converged: bool) {
        if converged {
            info!("SMO converged after {passes} passes");
        } else {
            warn!("SMO stopped after {passes} passes without converging");
        }
    }
}
