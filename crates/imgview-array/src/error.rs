use thiserror::Error;

/// An error type for array construction and partitioning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    /// The number of elements does not match the requested dimensions.
    ///
    /// The product of the dimensions must equal the length of the data exactly.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Number of elements implied by the dimensions.
        expected: usize,
        /// Number of elements provided.
        actual: usize,
    },

    /// A flat range handed to a split does not continue where the previous one ended.
    ///
    /// Split ranges must be ascending, adjacent and inside the array, so that
    /// every element is reachable from at most one cursor.
    #[error("Invalid range {index}: [{start}, {end}) must start at {expected_start} and end within {len}")]
    InvalidRange {
        /// Position of the range in the request.
        index: usize,
        /// First flat index of the range.
        start: usize,
        /// One past the last flat index of the range.
        end: usize,
        /// Where the range had to start.
        expected_start: usize,
        /// Number of elements in the array.
        len: usize,
    },
}
