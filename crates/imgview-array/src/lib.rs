#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! `ArrayImg` is the reference storage backend: a single `Vec` in raster
//! order, first axis fastest. It implements the random access and iteration
//! traits of `imgview-core` and can hand out disjoint writable cursors for
//! parallel output.

/// Allocator trait and the CPU allocator.
pub mod allocator;

/// The contiguous array and its cursors.
pub mod array;

/// Error types for the array crate.
pub mod error;

pub use crate::allocator::{ArrayAllocator, CpuAllocator};
pub use crate::array::{
    ArrayCursor, ArrayImg, ArrayRandomAccess, ArrayRandomAccessMut, ArraySubCursorMut,
};
pub use crate::error::ArrayError;
