use std::fmt;

/// Which axis an index was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row => write!(f, "row"),
            Self::Column => write!(f, "column"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// An index outside the current cardinality of a store or projection.
    OutOfRange { axis: Axis, index: usize, len: usize },
}

impl GridError {
    pub(crate) fn row(index: usize, len: usize) -> Self {
        Self::OutOfRange { axis: Axis::Row, index, len }
    }

    pub(crate) fn column(index: usize, len: usize) -> Self {
        Self::OutOfRange { axis: Axis::Column, index, len }
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { axis, index, len } => {
                write!(f, "{axis} index {index} out of range (len {len})")
            }
        }
    }
}

impl std::error::Error for GridError {}

pub type Result<T> = std::result::Result<T, GridError>;
