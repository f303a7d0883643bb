use imgview_core::raster;

use crate::error::MorphologyError;
use crate::neighborhood::StructuringElement;
use crate::shape::{fit_rank, Shape};

/// An arbitrary flat element given as a boolean mask.
///
/// The mask is laid out with the first axis varying fastest. The member at
/// mask position `p` has offset `p - anchor`.
///
/// # Example
///
/// ```rust
/// use imgview_algorithm::shape::{MaskShape, Shape};
///
/// // a 3x1 horizontal bar anchored on its left end
/// let bar = MaskShape::new(vec![3, 1], vec![true; 3], vec![0, 0]).unwrap();
/// let element = bar.structuring_element(2).unwrap();
/// assert_eq!(element.offset(2), &[2, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskShape {
    dimensions: Vec<usize>,
    mask: Vec<bool>,
    anchor: Vec<i64>,
}

impl MaskShape {
    /// Creates a mask shape.
    ///
    /// # Arguments
    ///
    /// * `dimensions` - The size of the mask along each axis.
    /// * `mask` - One flag per mask position, first axis fastest.
    /// * `anchor` - The mask position that lands on the center.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::InvalidMask`] if `mask` does not have one
    /// entry per position and [`MorphologyError::DimensionMismatch`] if
    /// `anchor` has the wrong number of axes.
    pub fn new(
        dimensions: Vec<usize>,
        mask: Vec<bool>,
        anchor: Vec<i64>,
    ) -> Result<Self, MorphologyError> {
        let expected = dimensions.iter().product::<usize>();
        if mask.len() != expected {
            return Err(MorphologyError::InvalidMask {
                expected,
                actual: mask.len(),
            });
        }
        if anchor.len() != dimensions.len() {
            return Err(MorphologyError::DimensionMismatch {
                expected: dimensions.len(),
                actual: anchor.len(),
            });
        }
        Ok(Self {
            dimensions,
            mask,
            anchor,
        })
    }

    /// Creates a mask shape anchored at the mask center, rounding down.
    pub fn centered(dimensions: Vec<usize>, mask: Vec<bool>) -> Result<Self, MorphologyError> {
        let anchor = dimensions.iter().map(|&d| (d as i64 - 1) / 2).collect();
        Self::new(dimensions, mask, anchor)
    }

    /// Returns the size of the mask along each axis.
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    /// Returns the anchor.
    pub fn anchor(&self) -> &[i64] {
        &self.anchor
    }
}

impl Shape for MaskShape {
    fn structuring_element(&self, num_dimensions: usize) -> Result<StructuringElement, MorphologyError> {
        let n = self.dimensions.len();
        let min = vec![0; n];
        let mut p = vec![0; n];
        let mut offsets = Vec::new();
        for (index, _) in self.mask.iter().enumerate().filter(|(_, &keep)| keep) {
            raster::index_to_position(index, &min, &self.dimensions, &mut p);
            offsets.extend(p.iter().zip(&self.anchor).map(|(c, a)| c - a));
        }
        let lo: Vec<i64> = self.anchor.iter().map(|a| -a).collect();
        let hi: Vec<i64> = self
            .dimensions
            .iter()
            .zip(&self.anchor)
            .map(|(&s, a)| s as i64 - 1 - a)
            .collect();
        fit_rank(StructuringElement::with_box(n, offsets, &lo, &hi), num_dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgview_core::Interval;

    #[test]
    fn test_mask_validation() {
        assert_eq!(
            MaskShape::new(vec![3, 3], vec![true; 8], vec![1, 1]),
            Err(MorphologyError::InvalidMask {
                expected: 9,
                actual: 8
            })
        );
        assert_eq!(
            MaskShape::new(vec![3, 3], vec![true; 9], vec![1]),
            Err(MorphologyError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_cross_mask() -> Result<(), MorphologyError> {
        #[rustfmt::skip]
        let cross = vec![
            false, true, false,
            true,  true, true,
            false, true, false,
        ];
        let shape = MaskShape::centered(vec![3, 3], cross)?;
        assert_eq!(shape.anchor(), &[1, 1]);

        let element = shape.structuring_element(2)?;
        let offsets: Vec<&[i64]> = element.iter().collect();
        assert_eq!(
            offsets,
            vec![&[0, -1][..], &[-1, 0], &[0, 0], &[1, 0], &[0, 1]]
        );
        assert_eq!(element.bounds().dimensions_vec(), vec![3, 3]);

        // the middle row survives on a 1d source
        assert_eq!(shape.structuring_element(1)?.len(), 3);
        Ok(())
    }

    #[test]
    fn test_mask_box_spans_whole_mask() -> Result<(), MorphologyError> {
        let shape = MaskShape::new(vec![3], vec![false, false, true], vec![0])?;
        let element = shape.structuring_element(1)?;
        assert_eq!(element.len(), 1);
        assert_eq!(element.offset(0), &[2]);
        assert_eq!(shape.sample_neighborhood(1)?.min_vec(), vec![0]);
        assert_eq!(shape.sample_neighborhood(1)?.max_vec(), vec![2]);

        let hollow = MaskShape::centered(vec![3, 1], vec![false; 3])?;
        assert!(hollow.structuring_element(2)?.is_empty());
        assert_eq!(hollow.sample_neighborhood(2)?.dimensions_vec(), vec![3, 1]);
        Ok(())
    }
}
