#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! Flat morphology over any bounded source of `imgview-core`. A [`shape::Shape`]
//! describes the structuring element, [`neighborhood`] turns it into a
//! neighborhood per source position, and [`morphology`] reduces those
//! neighborhoods in parallel into a new [`imgview_array::ArrayImg`].
//!
//! ```rust
//! use imgview_algorithm::{morphology, shape::DiamondShape};
//! use imgview_array::ArrayImg;
//!
//! let source = ArrayImg::from_shape_fn(&[5, 5], |p| (p[0] == 2 && p[1] == 2) as u8).unwrap();
//! let grown = morphology::dilate(&source, &DiamondShape::new(1), 2).unwrap();
//! assert_eq!(grown.as_slice().iter().filter(|&&v| v == 1).count(), 5);
//! ```

/// Error types for the algorithm crate.
pub mod error;

/// Dilation and erosion.
pub mod morphology;

/// Structuring elements and neighborhoods.
pub mod neighborhood;

/// Chunked execution on a worker pool.
pub mod parallel;

pub mod shape;

pub use crate::error::MorphologyError;
pub use crate::morphology::{Extent, MorphologyParams, Operator};
pub use crate::parallel::{ExecutionStrategy, ParallelError};
