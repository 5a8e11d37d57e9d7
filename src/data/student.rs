//! Loader for the UCI student-performance dataset
//!
//! Rows are `;`-separated with a header line and optional double quotes
//! around fields. Each row holds 30 attributes followed by the period
//! grades G1, G2 and the final grade G3. The class label is +1 (pass) when
//! G3 >= 10 and -1 (fail) otherwise.

use crate::core::{Dataset, Result, SVMError, Sample};
use crate::utils::scaling::MinMaxBounds;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Number of columns in one row
pub const STUDENT_COLUMNS: usize = 33;

/// Number of attributes before the grade columns
pub const STUDENT_ATTRIBUTES: usize = 30;

/// Binary and nominal attributes, encoded as integers per file
const NOMINAL_COLUMNS: [usize; 17] = [0, 1, 3, 4, 5, 8, 9, 10, 11, 15, 16, 17, 18, 19, 20, 21, 22];

/// Final grade at or above this value is a pass
const PASS_GRADE: i64 = 10;

/// Highest possible grade, used to scale G1 and G2
const MAX_GRADE: f64 = 20.0;

const LOWER_BOUNDS: [f64; STUDENT_ATTRIBUTES] = [
    0.0, 0.0, 15.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0,
];

const UPPER_BOUNDS: [f64; STUDENT_ATTRIBUTES] = [
    1.0, 1.0, 22.0, 1.0, 1.0, 1.0, 4.0, 4.0, 4.0, 4.0, 3.0, 2.0, 4.0, 4.0, 3.0, 1.0, 1.0, 1.0, 1.0,
    1.0, 1.0, 1.0, 1.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 93.0,
];

/// Fixed attribute ranges of the student dataset
pub fn student_bounds() -> Result<MinMaxBounds> {
    MinMaxBounds::new(LOWER_BOUNDS.to_vec(), UPPER_BOUNDS.to_vec())
}

/// How student rows are turned into feature vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentOptions {
    /// Scale attributes with the fixed bounds table and grades by 1/20
    pub normalize: bool,
    /// Append G1 and G2 to the attributes
    pub include_grades: bool,
}

impl Default for StudentOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            include_grades: true,
        }
    }
}

impl StudentOptions {
    /// Dimensionality of the produced feature vectors
    pub fn dim(&self) -> usize {
        if self.include_grades {
            STUDENT_ATTRIBUTES + 2
        } else {
            STUDENT_ATTRIBUTES
        }
    }
}

/// Parsed student-performance file
#[derive(Debug, Clone)]
pub struct StudentDataset {
    samples: Vec<Sample>,
    options: StudentOptions,
}

/// One row split into fields, with its 1-based line number
struct RawRow {
    line: usize,
    fields: Vec<String>,
}

impl StudentDataset {
    /// Load a student file
    pub fn from_file<P: AsRef<Path>>(path: P, options: StudentOptions) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), options)
    }

    /// Load student rows from a reader; the first line is the header
    pub fn from_reader<R: BufRead>(reader: R, options: StudentOptions) -> Result<Self> {
        let rows = Self::read_rows(reader)?;
        if rows.is_empty() {
            return Err(SVMError::EmptyDataset);
        }

        let encoders = Self::fit_encoders(&rows);
        let bounds = student_bounds()?;

        let samples = rows
            .iter()
            .map(|row| Self::row_to_sample(row, &encoders, &bounds, options))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { samples, options })
    }

    /// Options the file was loaded with
    pub fn options(&self) -> StudentOptions {
        self.options
    }

    fn read_rows<R: BufRead>(reader: R) -> Result<Vec<RawRow>> {
        let mut rows = Vec::new();

        // Line 1 is the header
        for (idx, line) in reader.lines().enumerate().skip(1) {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let fields: Vec<String> = trimmed
                .split(';')
                .map(|f| f.trim().trim_matches('"').to_string())
                .collect();
            if fields.len() != STUDENT_COLUMNS {
                return Err(SVMError::ParseError(format!(
                    "line {}: expected {STUDENT_COLUMNS} columns, found {}",
                    idx + 1,
                    fields.len()
                )));
            }
            rows.push(RawRow {
                line: idx + 1,
                fields,
            });
        }

        Ok(rows)
    }

    /// Map each nominal column's sorted distinct values to 0, 1, 2, ...
    fn fit_encoders(rows: &[RawRow]) -> BTreeMap<usize, BTreeMap<String, usize>> {
        NOMINAL_COLUMNS
            .iter()
            .map(|&col| {
                let mut codes: BTreeMap<String, usize> = rows
                    .iter()
                    .map(|row| (row.fields[col].clone(), 0))
                    .collect();
                for (code, value) in codes.values_mut().enumerate() {
                    *value = code;
                }
                (col, codes)
            })
            .collect()
    }

    fn parse_int(row: &RawRow, col: usize) -> Result<i64> {
        let field = &row.fields[col];
        field.parse::<i64>().map_err(|_| {
            SVMError::ParseError(format!(
                "line {}, column {}: expected an integer, found '{}'",
                row.line,
                col + 1,
                field
            ))
        })
    }

    fn row_to_sample(
        row: &RawRow,
        encoders: &BTreeMap<usize, BTreeMap<String, usize>>,
        bounds: &MinMaxBounds,
        options: StudentOptions,
    ) -> Result<Sample> {
        let mut features = Vec::with_capacity(options.dim());

        for col in 0..STUDENT_ATTRIBUTES {
            let value = match encoders.get(&col) {
                Some(codes) => codes.get(&row.fields[col]).copied().unwrap_or(0) as f64,
                None => Self::parse_int(row, col)? as f64,
            };
            features.push(value);
        }
        if options.normalize {
            bounds.transform(&mut features)?;
        }

        if options.include_grades {
            for col in [STUDENT_ATTRIBUTES, STUDENT_ATTRIBUTES + 1] {
                let grade = Self::parse_int(row, col)? as f64;
                features.push(if options.normalize {
                    grade / MAX_GRADE
                } else {
                    grade
                });
            }
        }

        let final_grade = Self::parse_int(row, STUDENT_COLUMNS - 1)?;
        let label = if final_grade >= PASS_GRADE { 1.0 } else { -1.0 };

        Ok(Sample::new(features, label))
    }
}

impl Dataset for StudentDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn dim(&self) -> usize {
        self.options.dim()
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
    use approx::assert_relative_eq;
    use std::io::Cursor;

    const HEADER: &str = "school;sex;age;address;famsize;Pstatus;Medu;Fedu;Mjob;Fjob;reason;guardian;traveltime;studytime;failures;schoolsup;famsup;paid;activities;nursery;higher;internet;romantic;famrel;freetime;goout;Dalc;Walc;health;absences;G1;G2;G3";

    const ROW_A: &str = "\"GP\";\"F\";18;\"U\";\"GT3\";\"A\";4;4;\"at_home\";\"teacher\";\"course\";\"mother\";2;2;0;\"yes\";\"no\";\"no\";\"no\";\"yes\";\"yes\";\"no\";\"no\";4;3;4;1;1;3;6;\"5\";\"6\";6";
    const ROW_B: &str = "\"MS\";\"M\";17;\"R\";\"LE3\";\"T\";1;1;\"other\";\"other\";\"home\";\"father\";1;2;0;\"no\";\"yes\";\"no\";\"yes\";\"no\";\"yes\";\"yes\";\"no\";5;3;3;1;1;3;4;\"15\";\"14\";15";

    fn student_file() -> String {
        format!("{HEADER}\n{ROW_A}\n{ROW_B}\n")
    }

    #[test]
    fn test_student_default_options() {
        let dataset =
            StudentDataset::from_reader(Cursor::new(student_file()), StudentOptions::default())
                .unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dim(), 32);
        assert_eq!(dataset.get_labels(), vec![-1.0, 1.0]);

        let a = dataset.get_sample(0);
        assert_eq!(a.dim(), 32);
        // school GP < MS, sex F < M
        assert_eq!(a.features[0], 0.0);
        assert_eq!(a.features[1], 0.0);
        // age 18 in [15, 22]
        assert_relative_eq!(a.features[2], 3.0 / 7.0);
        // absences 6 in [0, 93]
        assert_relative_eq!(a.features[29], 6.0 / 93.0);
        // grades scaled by 1/20
        assert_relative_eq!(a.features[30], 0.25);
        assert_relative_eq!(a.features[31], 0.3);

        let b = dataset.get_sample(1);
        assert_eq!(b.features[0], 1.0);
        assert_eq!(b.features[1], 1.0);
        assert_relative_eq!(b.features[30], 0.75);
    }

    #[test]
    fn test_student_raw_values_without_grades() {
        let options = StudentOptions {
            normalize: false,
            include_grades: false,
        };
        let dataset = StudentDataset::from_reader(Cursor::new(student_file()), options).unwrap();

        assert_eq!(dataset.dim(), 30);
        let a = dataset.get_sample(0);
        assert_eq!(a.dim(), 30);
        assert_eq!(a.features[2], 18.0);
        assert_eq!(a.features[6], 4.0);
        assert_eq!(a.features[29], 6.0);
        // Mjob: at_home < other
        assert_eq!(a.features[8], 0.0);
        assert_eq!(dataset.get_sample(1).features[8], 1.0);
    }

    #[test]
    fn test_student_pass_threshold() {
        let (head, _) = ROW_A.rsplit_once(';').unwrap();
        let data = format!("{HEADER}\n{head};10\n{head};9\n");
        let dataset =
            StudentDataset::from_reader(Cursor::new(data), StudentOptions::default()).unwrap();
        assert_eq!(dataset.get_labels(), vec![1.0, -1.0]);
    }

    #[test]
    fn test_student_wrong_column_count() {
        let data = format!("{HEADER}\n{ROW_A}\n1;2;3\n");
        let result = StudentDataset::from_reader(Cursor::new(data), StudentOptions::default());
        assert!(matches!(result, Err(SVMError::ParseError(msg)) if msg.contains("line 3")));
    }

    #[test]
    fn test_student_bad_integer_names_column() {
        let bad = ROW_A.replacen(";18;", ";old;", 1);
        let data = format!("{HEADER}\n{bad}\n");
        let result = StudentDataset::from_reader(Cursor::new(data), StudentOptions::default());
        assert!(
            matches!(result, Err(SVMError::ParseError(msg)) if msg.contains("line 2") && msg.contains("column 3"))
        );
    }

    #[test]
    fn test_student_header_only_is_empty() {
        let result =
            StudentDataset::from_reader(Cursor::new(format!("{HEADER}\n")), StudentOptions::default());
        assert!(matches!(result, Err(SVMError::EmptyDataset)));
    }

    #[test]
    fn test_student_bounds_table() {
        let bounds = student_bounds().unwrap();
        assert_eq!(bounds.dim(), STUDENT_ATTRIBUTES);
        assert_eq!(bounds.scale_value(29, 93.0), 1.0);
        assert_eq!(bounds.scale_value(2, 15.0), 0.0);
    }
}
