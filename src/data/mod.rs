//! Data loading and dataset implementations
//!
//! This module provides implementations of the Dataset trait for the
//! generic numeric CSV format and for the student-performance files.

pub mod csv;
pub mod student;

pub use self::csv::*;
pub use self::student::{student_bounds, StudentDataset, StudentOptions};
