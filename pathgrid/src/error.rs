use std::fmt::Display;

use crate::grid::Point;

/// Errors raised while building or editing a [`crate::Grid`].
///
/// A search that cannot reach its goal is not an error, it ends in
/// [`crate::PathFinderState::NoPathFound`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The grid must have at least one row and one column
    InvalidDimensions { rows: usize, columns: usize },
    /// A coordinate outside of `rows x columns`
    OutOfBounds {
        point: Point,
        rows: usize,
        columns: usize,
    },
    /// Start and finish were placed on the same cell
    StartIsFinish(Point),
    /// A text layout could not be parsed (`line` is 1-based)
    Layout { line: usize, message: String },
}

impl Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::InvalidDimensions { rows, columns } => {
                write!(f, "invalid grid dimensions {}x{}", rows, columns)
            }
            GridError::OutOfBounds {
                point,
                rows,
                columns,
            } => write!(
                f,
                "point {} is outside of the {}x{} grid",
                point, rows, columns
            ),
            GridError::StartIsFinish(point) => {
                write!(f, "start and finish are both placed at {}", point)
            }
            GridError::Layout { line, message } => {
                write!(f, "invalid layout on line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for GridError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_messages() {
        let err = GridError::OutOfBounds {
            point: Point { row: 3, col: 9 },
            rows: 2,
            columns: 2,
        };
        assert_eq!(err.to_string(), "point (3, 9) is outside of the 2x2 grid");

        let err = GridError::Layout {
            line: 2,
            message: "unexpected character 'x'".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid layout on line 2: unexpected character 'x'"
        );
    }

    #[test]
    fn test_into_anyhow() {
        let err: anyhow::Error = GridError::StartIsFinish(Point { row: 0, col: 0 }).into();
        assert!(err.downcast_ref::<GridError>().is_some());
    }
}
