use crate::error::MorphologyError;
use crate::neighborhood::StructuringElement;
use crate::shape::{fit_rank, Shape};

/// A hyper-rectangle reaching `span` positions from the center on every axis.
///
/// The element has side `2 * span + 1` on every axis, whatever the number of axes.
///
/// # Example
///
/// ```rust
/// use imgview_algorithm::shape::{RectangleShape, Shape};
///
/// let square = RectangleShape::new(1, false);
/// let element = square.structuring_element(2).unwrap();
/// assert_eq!(element.len(), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RectangleShape {
    /// Reach from the center along every axis.
    pub span: usize,
    /// Leaves the center out of the element.
    pub skip_center: bool,
}

impl RectangleShape {
    /// Creates a rectangle shape.
    pub fn new(span: usize, skip_center: bool) -> Self {
        Self { span, skip_center }
    }
}

impl Shape for RectangleShape {
    fn structuring_element(&self, num_dimensions: usize) -> Result<StructuringElement, MorphologyError> {
        let radii = vec![self.span as i64; num_dimensions];
        Ok(box_element(&radii, self.skip_center))
    }
}

/// A hyper-rectangle with its own reach per axis.
///
/// The shape is defined on `spans.len()` axes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CenteredRectangleShape {
    /// Reach from the center along each axis.
    pub spans: Vec<usize>,
    /// Leaves the center out of the element.
    pub skip_center: bool,
}

impl CenteredRectangleShape {
    /// Creates a rectangle shape with per-axis spans.
    pub fn new(spans: Vec<usize>, skip_center: bool) -> Self {
        Self { spans, skip_center }
    }
}

impl Shape for CenteredRectangleShape {
    fn structuring_element(&self, num_dimensions: usize) -> Result<StructuringElement, MorphologyError> {
        let radii: Vec<i64> = self.spans.iter().map(|&s| s as i64).collect();
        fit_rank(box_element(&radii, self.skip_center), num_dimensions)
    }
}

fn box_element(radii: &[i64], skip_center: bool) -> StructuringElement {
    StructuringElement::from_box(radii, |p| !(skip_center && p.iter().all(|&o| o == 0)))
}
