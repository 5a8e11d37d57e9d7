//! CSV format dataset implementation
//!
//! Supports loading datasets from CSV files where:
//! - The last column is the label
//! - All other columns are dense numeric features
//! - First row can be headers (automatically detected)

use crate::core::{Dataset, Result, SVMError, Sample};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Dataset implementation for comma-separated numeric files
#[derive(Debug, Clone)]
pub struct CSVDataset {
    samples: Vec<Sample>,
    dimensions: usize,
}

impl CSVDataset {
    /// Load a dataset from a CSV file
    ///
    /// The last column is assumed to be the label.
    /// Headers are automatically detected if present.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a dataset from a reader, detecting a header row
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, true)
    }

    /// Load a dataset from a reader with explicit header option
    pub fn from_reader_with_options<R: BufRead>(reader: R, auto_detect_header: bool) -> Result<Self> {
        let mut samples = Vec::new();
        let mut dimensions = None;
        let mut first_content = true;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if first_content {
                first_content = false;
                if auto_detect_header && Self::is_header_line(line) {
                    continue;
                }
            }

            let sample = Self::parse_data_line(line, line_no + 1)?;
            match dimensions {
                None => dimensions = Some(sample.dim()),
                Some(expected) if expected != sample.dim() => {
                    return Err(SVMError::ParseError(format!(
                        "line {}: expected {} features, found {}",
                        line_no + 1,
                        expected,
                        sample.dim()
                    )));
                }
                Some(_) => {}
            }
            samples.push(sample);
        }

        match dimensions {
            Some(dimensions) => Ok(CSVDataset {
                samples,
                dimensions,
            }),
            None => Err(SVMError::EmptyDataset),
        }
    }

    /// Build a dataset from samples already in memory
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self> {
        let dimensions = crate::utils::validation::validate_training_set(&samples)?;
        Ok(Self {
            samples,
            dimensions,
        })
    }

    /// Check if a line appears to be a header
    fn is_header_line(line: &str) -> bool {
        let fields: Vec<&str> = line.split(',').collect();

        if fields.len() < 2 {
            return false;
        }

        // Most feature columns are non-numeric
        let feature_count = fields.len() - 1;
        let non_numeric_count = fields
            .iter()
            .take(feature_count)
            .filter(|field| field.trim().parse::<f64>().is_err())
            .count();

        non_numeric_count * 2 > feature_count
    }

    /// Parse a CSV data line into a Sample
    fn parse_data_line(line: &str, line_no: usize) -> Result<Sample> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        let (label_str, feature_fields) = match fields.split_last() {
            Some((label, features)) if !features.is_empty() => (label, features),
            _ => {
                return Err(SVMError::ParseError(format!(
                    "line {line_no}: too few fields: {line}"
                )))
            }
        };
        let label = label_str
            .parse::<f64>()
            .ok()
            .filter(|label| label.is_finite())
            .ok_or_else(|| {
                SVMError::ParseError(format!("line {line_no}: invalid label: {label_str}"))
            })?;

        // Fold arbitrary numeric labels onto {-1, +1} by sign
        let label = if label > 0.0 { 1.0 } else { -1.0 };

        let features = feature_fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                field.parse::<f64>().map_err(|_| {
                    SVMError::ParseError(format!(
                        "line {line_no}, column {}: invalid feature value: {field}",
                        idx + 1
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(Sample::new(features, label))
    }
}

impl Dataset for CSVDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn dim(&self) -> usize {
        self.dimensions
    }

    fn get_sample(&self, i: usize) -> Sample {
        self.samples[i].clone()
    }

    fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_csv_basic() {
        let data = "1.0,2.0,1\n3.0,4.0,-1\n";
        let dataset = CSVDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dim(), 2);

        let sample1 = dataset.get_sample(0);
        assert_eq!(sample1.label, 1.0);
        assert_eq!(sample1.features, vec![1.0, 2.0]);

        let sample2 = dataset.get_sample(1);
        assert_eq!(sample2.label, -1.0);
        assert_eq!(sample2.features, vec![3.0, 4.0]);
    }

    #[test]
    fn test_csv_with_headers() {
        let data = "feature1,feature2,label\n1.0,2.0,1\n3.0,4.0,-1\n";
        let dataset = CSVDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 2); // Headers should be skipped
        assert_eq!(dataset.get_labels(), vec![1.0, -1.0]);
    }

    #[test]
    fn test_csv_keeps_zero_features() {
        let data = "1.0,0.0,2.0,1\n0.0,3.0,0.0,-1\n";
        let dataset = CSVDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.dim(), 3);
        assert_eq!(dataset.get_sample(0).features, vec![1.0, 0.0, 2.0]);
        assert_eq!(dataset.get_sample(1).features, vec![0.0, 3.0, 0.0]);
    }

    #[test]
    fn test_csv_label_conversion() {
        let data = "1.0,2.0,0.5\n3.0,4.0,-0.5\n5.0,6.0,0\n";
        let dataset = CSVDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.get_labels(), vec![1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_csv_rejects_non_finite_labels() {
        for label in ["NaN", "nan", "inf", "-inf"] {
            let data = format!("1.0,2.0,1\n3.0,4.0,{label}\n");
            match CSVDataset::from_reader(Cursor::new(data)) {
                Err(SVMError::ParseError(msg)) => {
                    assert!(msg.contains("line 2"), "'{msg}' should name line 2");
                    assert!(msg.contains(label));
                }
                other => panic!("Expected a parse error for label {label}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_csv_empty_lines_and_comments() {
        let data = "# Comment\nx,y,label\n1.0,2.0,1\n\n3.0,4.0,-1\n";
        let dataset = CSVDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_csv_invalid_format() {
        // Too few fields
        assert!(CSVDataset::from_reader(Cursor::new("1.0\n")).is_err());

        // Invalid number
        let result = CSVDataset::from_reader(Cursor::new("1.0,abc,-1\n"));
        assert!(matches!(result, Err(SVMError::ParseError(msg)) if msg.contains("column 2")));

        // Ragged rows
        let result = CSVDataset::from_reader(Cursor::new("1.0,2.0,1\n1.0,-1\n"));
        assert!(matches!(result, Err(SVMError::ParseError(msg)) if msg.contains("line 2")));

        // Nothing but a header
        assert!(matches!(
            CSVDataset::from_reader(Cursor::new("a,b,label\n")),
            Err(SVMError::EmptyDataset)
        ));
    }

    #[test]
    fn test_csv_manual_header_control() {
        let data = "1.0,2.0,1\n3.0,4.0,-1\n";
        let dataset = CSVDataset::from_reader_with_options(Cursor::new(data), false).unwrap();
        assert_eq!(dataset.len(), 2);

        let with_header = "a,b,label\n1.0,2.0,1\n";
        assert!(CSVDataset::from_reader_with_options(Cursor::new(with_header), false).is_err());
    }

    #[test]
    fn test_is_header_line() {
        assert!(CSVDataset::is_header_line("feature1,feature2,label"));
        assert!(CSVDataset::is_header_line("x1,x2,x3,y"));
        assert!(CSVDataset::is_header_line("x,label"));
        assert!(!CSVDataset::is_header_line("1.0,2.0,3.0,1"));
        assert!(!CSVDataset::is_header_line("1")); // Too few fields
    }

    #[test]
    fn test_integration_with_smo() {
        use crate::core::SvmConfig;
        use crate::kernel::KernelKind;
        use crate::solver::SMOSolver;

        let data = "2.0,0.0,1\n-2.0,0.0,-1\n1.5,0.0,1\n-1.5,0.0,-1\n";
        let dataset = CSVDataset::from_reader(Cursor::new(data)).unwrap();

        let config = SvmConfig {
            kernel: KernelKind::Linear,
            c: 1.0,
            ..SvmConfig::default()
        };
        let result = SMOSolver::new(config)
            .solve(dataset.samples())
            .expect("Should solve");

        assert!(!result.support_vectors.is_empty());
        assert!(result.passes > 0);
        assert!(result.converged);
    }
}
