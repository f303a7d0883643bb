//! Flat structuring element shapes.
//!
//! A shape is a stateless recipe: asked for a number of axes it produces the
//! member offsets of its structuring element, and given a source it produces
//! the neighborhoods of that source.

mod line;
mod mask;
mod rectangle;
mod sphere;

pub use line::LineShape;
pub use mask::MaskShape;
pub use rectangle::{CenteredRectangleShape, RectangleShape};
pub use sphere::{DiamondShape, HyperSphereShape};

use imgview_core::{FinalInterval, RandomAccessible};

use crate::error::MorphologyError;
use crate::neighborhood::{Neighborhoods, SharedNeighborhoods, StructuringElement};

/// A flat structuring element that can be instantiated for any source.
pub trait Shape {
    /// Returns the members of the shape for a source with `num_dimensions` axes.
    ///
    /// Shapes defined on more axes keep only their slice through the center;
    /// shapes defined on fewer axes than requested fail.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::DimensionMismatch`] if the shape has a fixed
    /// number of axes smaller than `num_dimensions`.
    fn structuring_element(&self, num_dimensions: usize) -> Result<StructuringElement, MorphologyError>;

    /// Returns the bounding box of the members relative to the center.
    fn sample_neighborhood(&self, num_dimensions: usize) -> Result<FinalInterval, MorphologyError> {
        Ok(self.structuring_element(num_dimensions)?.bounds().clone())
    }

    /// Maps every position of `source` onto one reused neighborhood.
    ///
    /// Cheap per position, but the accesses cannot be shared between threads.
    fn neighborhoods_random_accessible<'s, S: RandomAccessible>(
        &self,
        source: &'s S,
    ) -> Result<SharedNeighborhoods<'s, S>, MorphologyError> {
        let element = self.structuring_element(source.num_dimensions())?;
        Ok(SharedNeighborhoods::new(source, element))
    }

    /// Maps every position of `source` onto its own independent neighborhood.
    fn neighborhoods_random_accessible_safe<'s, S: RandomAccessible>(
        &self,
        source: &'s S,
    ) -> Result<Neighborhoods<'s, S>, MorphologyError> {
        let element = self.structuring_element(source.num_dimensions())?;
        Ok(Neighborhoods::new(source, element))
    }
}

/// Fits an element defined on `rank` axes to a source with `num_dimensions` axes.
pub(crate) fn fit_rank(
    element: StructuringElement,
    num_dimensions: usize,
) -> Result<StructuringElement, MorphologyError> {
    use imgview_core::EuclideanSpace;

    let rank = element.num_dimensions();
    if num_dimensions > rank {
        return Err(MorphologyError::DimensionMismatch {
            expected: rank,
            actual: num_dimensions,
        });
    }
    Ok(element.restrict(num_dimensions))
}
