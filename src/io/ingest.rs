//! CSV ingest of the design matrix and vectors.
//!
//! Files are headerless and purely numeric:
//! - the design matrix has one row per observation, one column per covariate
//! - a vector may be written as a single column or as a single row
//!
//! Every row must have the same number of fields; a bad cell is reported with
//! its line and column.

use std::path::Path;

use csv::ReaderBuilder;
use nalgebra::{DMatrix, DVector};

use crate::error::FocusError;

/// Parse CSV text into rows of numbers. `source` names the input in errors.
pub fn parse_rows(text: &str, source: &str) -> Result<Vec<Vec<f64>>, FocusError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source_err| FocusError::Csv {
            path: source.to_string(),
            source: source_err,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.iter().all(str::is_empty) {
            continue;
        }

        let row = record
            .iter()
            .enumerate()
            .map(|(col, field)| {
                field.parse::<f64>().map_err(|e| {
                    FocusError::InvalidConfig(format!(
                        "{source}: line {line}, column {}: '{field}' is not a number ({e})",
                        col + 1
                    ))
                })
            })
            .collect::<Result<Vec<f64>, FocusError>>()?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(FocusError::InvalidDimension(format!("{source}: no numeric rows")));
    }
    Ok(rows)
}

pub fn parse_matrix(text: &str, source: &str) -> Result<DMatrix<f64>, FocusError> {
    let rows = parse_rows(text, source)?;
    let n = rows.len();
    let p = rows[0].len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    if p == 0 || flat.len() != n * p {
        return Err(FocusError::InvalidDimension(format!(
            "{source}: rows have differing numbers of columns"
        )));
    }
    Ok(DMatrix::from_row_slice(n, p, &flat))
}

pub fn parse_vector(text: &str, source: &str) -> Result<DVector<f64>, FocusError> {
    let rows = parse_rows(text, source)?;
    let is_row = rows.len() == 1;
    let is_column = rows.iter().all(|r| r.len() == 1);
    if !(is_row || is_column) {
        return Err(FocusError::InvalidDimension(format!(
            "{source}: expected a single row or a single column, got {} rows",
            rows.len()
        )));
    }
    let values: Vec<f64> = rows.into_iter().flatten().collect();
    Ok(DVector::from_vec(values))
}

fn read_text(path: &Path) -> Result<String, FocusError> {
    std::fs::read_to_string(path)
        .map_err(|e| FocusError::io(format!("Failed to read '{}'", path.display()), e))
}

pub fn read_matrix_csv(path: &Path) -> Result<DMatrix<f64>, FocusError> {
    parse_matrix(&read_text(path)?, &path.display().to_string())
}

pub fn read_vector_csv(path: &Path) -> Result<DVector<f64>, FocusError> {
    parse_vector(&read_text(path)?, &path.display().to_string())
}
