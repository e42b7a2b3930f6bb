use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Matrix row count differs from the number of y coordinates.
    RowCount { expected: usize, found: usize },
    /// A matrix row has a different length than the x axis.
    Shape { row: usize, expected: usize, found: usize },
    /// Axis not strictly ordered (x ascending, y descending).
    AxisOrder { axis: Axis, index: usize },
    /// NaN or infinite value in the matrix or on an axis.
    NonFinite { location: String },
    /// Cell edit outside the grid.
    CellOutOfBounds { row: usize, col: usize },
    /// Severe threshold must sit strictly below the low threshold.
    InvalidThresholds { severe_mv: f64, low_mv: f64 },
    InvalidCoverDepth(u32),
    InvalidResistivity(f64),
    UnknownElectrode(String),
}

/// Grid axis, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowCount { expected, found } => {
                write!(f, "grid shape error: expected {expected} row(s), found {found}")
            }
            Self::Shape { row, expected, found } => write!(
                f,
                "grid shape error: row {row} has {found} value(s), expected {expected}"
            ),
            Self::AxisOrder { axis: Axis::X, index } => write!(
                f,
                "x coordinates must be strictly ascending (position {index})"
            ),
            Self::AxisOrder { axis: Axis::Y, index } => write!(
                f,
                "y coordinates must be strictly descending (position {index})"
            ),
            Self::NonFinite { location } => write!(f, "non-finite value at {location}"),
            Self::CellOutOfBounds { row, col } => {
                write!(f, "cell ({row}, {col}) is outside the grid")
            }
            Self::InvalidThresholds { severe_mv, low_mv } => write!(
                f,
                "severe threshold ({severe_mv} mV) must be below low threshold ({low_mv} mV)"
            ),
            Self::InvalidCoverDepth(mm) => write!(f, "cover depth must be positive, got {mm} mm"),
            Self::InvalidResistivity(r) => {
                write!(f, "resistivity must be a positive number, got {r} kOhm.cm")
            }
            Self::UnknownElectrode(name) => write!(f, "unknown reference electrode: {name}"),
        }
    }
}

impl std::error::Error for CoreError {}
