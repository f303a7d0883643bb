#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `imgview-core` defines how n-dimensional data is addressed and traversed,
//! independently of how it is stored. Everything is expressed as small
//! capability traits that storage backends and views implement.
//!
//! # Architecture
//!
//! - **Interval**: inclusive integer bounds per axis, with all derived
//!   accessors provided as default methods
//! - **Localizable / Positionable**: read and write access to an integer position
//! - **RandomAccess / Cursor**: the two ways of reaching elements, jumping to
//!   any coordinate or walking in raster order with the first axis fastest
//! - **Views**: borrowed, zero-copy coordinate transforms over any source
//!
//! # Quick Start
//!
//! ```rust
//! use imgview_core::{view, Cursor, IterableInterval, Interval};
//!
//! // a procedural 2d source, restricted to a 3x2 window and shifted
//! let source = view::function(2, |p: &[i64]| p[0] + 10 * p[1]);
//! let window = view::interval(&source, &[0, 0], &[2, 1]).unwrap();
//! let shifted = view::translate(&window, &[5, 5]).unwrap();
//! assert_eq!(shifted.min_vec(), vec![5, 5]);
//!
//! let mut cursor = shifted.cursor();
//! let mut values = Vec::new();
//! while cursor.has_next() {
//!     values.push(cursor.next_item());
//! }
//! assert_eq!(values, vec![0, 1, 2, 10, 11, 12]);
//! ```

/// Sampler, cursor and random access traits.
pub mod access;

/// Element bounds consumed by the algorithms.
pub mod element;

/// Error types for the core crate.
pub mod error;

/// Cursors that filter the positions of another cursor.
pub mod filter;

/// The interval contract and its stored implementation.
pub mod interval;

/// Free functions over intervals.
pub mod intervals;

/// Position traits and a plain point type.
pub mod position;

/// Raster ordering helpers and the interval cursor.
pub mod raster;

/// Lazy views.
pub mod view;

pub use crate::access::{
    Cursor, ElementSpace, IterableInterval, RandomAccess, RandomAccessible,
    RandomAccessibleInterval, Sampler, SamplerMut,
};
pub use crate::element::{BoundedElement, Element};
pub use crate::error::ViewError;
pub use crate::filter::IntersectionCursor;
pub use crate::interval::{FinalInterval, Interval};
pub use crate::position::{EuclideanSpace, Localizable, Point, Positionable};
pub use crate::raster::IntervalCursor;
pub use crate::view::OutOfBounds;
