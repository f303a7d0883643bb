use imgview_array::ArrayError;
use imgview_core::ViewError;
use thiserror::Error;

use crate::parallel::ParallelError;

/// Errors related to shapes and morphological operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MorphologyError {
    /// A shape with a fixed number of axes was applied to a source with more axes.
    #[error("Shape covers {expected} axes but the source has {actual}")]
    DimensionMismatch {
        /// Number of axes the shape is defined on.
        expected: usize,
        /// Number of axes of the source.
        actual: usize,
    },

    /// The mask of a mask shape does not match its dimensions.
    #[error("Mask shape expects {expected} entries, got {actual}")]
    InvalidMask {
        /// Product of the mask dimensions.
        expected: usize,
        /// Number of mask entries provided.
        actual: usize,
    },

    /// Building a view over the source or the output failed.
    #[error(transparent)]
    View(#[from] ViewError),

    /// Allocating or partitioning the output failed.
    #[error(transparent)]
    Array(#[from] ArrayError),

    /// A worker failed or the worker pool could not be built.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
