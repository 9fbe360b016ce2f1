use thiserror::Error;

/// # GridError
/// Error taxonomy of the crate. Construction problems are reported as
/// `InvalidConfigurationErr` and never leave a partially built
/// interpolant; the remaining variants are fatal to a single evaluation
/// call only.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("Invalid configuration: {0}")]
    InvalidConfigurationErr(String),
    #[error("Dimension mismatch: expected {expected} coordinates, got {got}")]
    DimensionMismatchErr { expected: usize, got: usize },
    #[error(
        "Coordinate {coordinate} is outside the axis range [{lower}, {upper}]{}",
        tolerance_note(.tolerance)
    )]
    OutOfRangeErr {
        coordinate: f64,
        lower: f64,
        upper: f64,
        /// Effective fuzzy tolerance that was attempted, if any.
        tolerance: Option<f64>,
    },
}

fn tolerance_note(tolerance: &Option<f64>) -> String {
    match tolerance {
        Some(tolerance) => format!(" (fuzzy tolerance {} exceeded)", tolerance),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, GridError>;

impl From<GridError> for String {
    fn from(e: GridError) -> Self {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = GridError::OutOfRangeErr {
            coordinate: 30.0,
            lower: 10.0,
            upper: 20.0,
            tolerance: None,
        };
        assert_eq!(
            err.to_string(),
            "Coordinate 30 is outside the axis range [10, 20]"
        );

        let err = GridError::OutOfRangeErr {
            coordinate: 30.0,
            lower: 10.0,
            upper: 20.0,
            tolerance: Some(1e-6),
        };
        assert_eq!(
            err.to_string(),
            "Coordinate 30 is outside the axis range [10, 20] (fuzzy tolerance 0.000001 exceeded)"
        );
    }
}
