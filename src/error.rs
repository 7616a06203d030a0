use core::fmt;
use grid_util::point::Point;

/// Errors raised while validating maze dimensions or search endpoints. Both are reported before
/// any state is built, so a failed call leaves nothing half-initialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MazeError {
    /// Either dimension is zero or larger than the allowed maximum.
    InvalidDimensions { rows: usize, cols: usize },
    /// A start or end point lies outside of the `rows`x`cols` grid.
    InvalidEndpoint { point: Point, rows: usize, cols: usize },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MazeError::InvalidDimensions { rows, cols } => {
                write!(f, "invalid maze dimensions {}x{}", rows, cols)
            }
            MazeError::InvalidEndpoint { point, rows, cols } => write!(
                f,
                "endpoint {} lies outside of the {}x{} maze",
                point, rows, cols
            ),
        }
    }
}

impl std::error::Error for MazeError {}
