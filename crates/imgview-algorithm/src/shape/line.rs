use crate::error::MorphologyError;
use crate::neighborhood::StructuringElement;
use crate::shape::Shape;

/// A straight segment along one axis, reaching `span` positions on each side of the center.
///
/// For a source without the shape's axis only the center remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineShape {
    /// Reach from the center along `axis`.
    pub span: usize,
    /// The axis the segment lies on.
    pub axis: usize,
    /// Leaves the center out of the element.
    pub skip_center: bool,
}

impl LineShape {
    /// Creates a line shape.
    pub fn new(span: usize, axis: usize, skip_center: bool) -> Self {
        Self {
            span,
            axis,
            skip_center,
        }
    }
}

impl Shape for LineShape {
    fn structuring_element(&self, num_dimensions: usize) -> Result<StructuringElement, MorphologyError> {
        let n = num_dimensions.max(self.axis + 1);
        let mut radii = vec![0; n];
        radii[self.axis] = self.span as i64;
        let skip_center = self.skip_center;
        let element =
            StructuringElement::from_box(&radii, |p| !(skip_center && p[self.axis] == 0));
        Ok(element.restrict(num_dimensions))
    }
}
