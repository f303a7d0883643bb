use thiserror::Error;

/// An error type for interval and view construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// A coordinate list or a transform does not match the dimensionality of its source.
    ///
    /// Axes are never truncated or padded silently, so composing a view whose
    /// transform has the wrong number of axes is rejected up front.
    #[error("Dimension mismatch: expected {expected} axes, got {actual}")]
    DimensionMismatch {
        /// Number of axes required by the source.
        expected: usize,
        /// Number of axes that were provided.
        actual: usize,
    },

    /// The bounds of an interval violate `max >= min - 1`.
    #[error("Invalid interval on axis {axis}: min {min}, max {max}")]
    InvalidInterval {
        /// The offending axis.
        axis: usize,
        /// Lower bound on that axis.
        min: i64,
        /// Upper bound on that axis.
        max: i64,
    },

    /// An axis index is not smaller than the number of dimensions.
    #[error("Axis {axis} is out of range for {num_dimensions} dimensions")]
    InvalidAxis {
        /// The requested axis.
        axis: usize,
        /// Number of dimensions of the interval.
        num_dimensions: usize,
    },

    /// Two intervals cannot be joined along the concatenation axis.
    #[error("Cannot concatenate along axis {axis}: source {index} has extent {actual} on axis {mismatched_axis}, expected {expected}")]
    IncompatibleConcatenation {
        /// The concatenation axis.
        axis: usize,
        /// Index of the incompatible source.
        index: usize,
        /// Axis whose extent differs.
        mismatched_axis: usize,
        /// Extent of the first source on that axis.
        expected: usize,
        /// Extent of the offending source on that axis.
        actual: usize,
    },

    /// A view that combines several sources was given none.
    #[error("At least one source is required")]
    EmptySources,
}

impl ViewError {
    /// Creates a DimensionMismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }
}

/// Checks that `actual` axes were supplied where `expected` are required.
pub(crate) fn check_dimensions(expected: usize, actual: usize) -> Result<(), ViewError> {
    if expected != actual {
        return Err(ViewError::dimension_mismatch(expected, actual));
    }
    Ok(())
}
