use log::{info, warn};
use std::fs;
use std::path::Path;

use crate::error::{CsvError, GraphixError};

/// Parses headerless `x,y` CSV text into coordinate pairs.
///
/// Blank (or whitespace-only) lines are skipped and do not count towards row
/// numbers. Every other line must have exactly two comma separated fields,
/// each a finite number once surrounding whitespace is trimmed.
///
/// # Errors
/// * [`CsvError::RowShape`] for the first row with a field count other than 2
/// * [`CsvError::Value`] for the first field that is not a finite number
///
/// # Examples
/// ```
/// use graphix::loader::parse_points_csv;
///
/// let rows = parse_points_csv("1,2\n\n3.5, -4\n").unwrap();
/// assert_eq!(rows, vec![(1.0, 2.0), (3.5, -4.0)]);
/// ```
pub fn parse_points_csv(text: &str) -> Result<Vec<(f64, f64)>, CsvError> {
    let rows = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| parse_csv_row(index + 1, line))
        .collect::<Result<Vec<_>, _>>();

    if let Err(e) = &rows {
        warn!("{}", e);
    }
    rows
}

fn parse_csv_row(row: usize, line: &str) -> Result<(f64, f64), CsvError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 2 {
        return Err(CsvError::RowShape {
            row,
            fields: fields.len(),
        });
    }

    let x = parse_field(row, fields[0])?;
    let y = parse_field(row, fields[1])?;
    Ok((x, y))
}

fn parse_field(row: usize, field: &str) -> Result<f64, CsvError> {
    let trimmed = field.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CsvError::Value {
            row,
            value: trimmed.to_string(),
        }),
    }
}

/// Reads a CSV file from disk and parses it with [`parse_points_csv`].
pub fn load_points_csv(path: impl AsRef<Path>) -> Result<Vec<(f64, f64)>, GraphixError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let rows = parse_points_csv(&text)?;
    info!("read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
