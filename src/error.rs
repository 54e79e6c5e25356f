use thiserror::Error;

use crate::equation::EquationId;
use crate::points::PointId;

/// Errors produced while turning user text into a plottable function.
///
/// Every variant carries the text the user typed so the caller can echo it back.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// The text is not a valid arithmetic expression over `x`.
    #[error("invalid expression `{expression}`: {reason}")]
    Compile { expression: String, reason: String },

    /// The text ends in an operator or an open parenthesis.
    #[error("incomplete expression `{0}`")]
    Incomplete(String),

    /// Every probe value evaluated to NaN or an infinity.
    #[error("expression `{0}` produces no graphable values")]
    Ungraphable(String),
}

impl ExpressionError {
    /// The offending input, exactly as it was submitted.
    pub fn expression(&self) -> &str {
        match self {
            ExpressionError::Compile { expression, .. } => expression,
            ExpressionError::Incomplete(expression) => expression,
            ExpressionError::Ungraphable(expression) => expression,
        }
    }
}

/// Errors produced by CSV point import. Row numbers are 1-based and count
/// only non-blank lines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CsvError {
    #[error("row {row}: expected 2 columns, found {fields}")]
    RowShape { row: usize, fields: usize },

    #[error("row {row}: `{value}` is not a finite number")]
    Value { row: usize, value: String },
}

impl CsvError {
    pub fn row(&self) -> usize {
        match self {
            CsvError::RowShape { row, .. } | CsvError::Value { row, .. } => *row,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// One of the two rays of an angle measurement has zero length.
    #[error("angle is undefined when a ray has zero length")]
    DegenerateAngle,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("drawing backend error: {0}")]
    Backend(String),

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// Crate-level error returned by the `Graphix` application state.
#[derive(Error, Debug)]
pub enum GraphixError {
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error("CSV import failed: {0}")]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Measure(#[from] MeasureError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("no equation with id {0}")]
    UnknownEquation(EquationId),

    #[error("no point with id {0}")]
    UnknownPoint(PointId),

    #[error("zoom factor {0} must be finite and positive")]
    InvalidZoom(f64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = GraphixError> = std::result::Result<T, E>;
