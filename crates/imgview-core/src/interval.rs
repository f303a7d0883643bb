use crate::error::ViewError;
use crate::position::{EuclideanSpace, Positionable};

/// An axis-aligned, integer-indexed bounding box with inclusive bounds.
///
/// Implementors provide [`Interval::min`] and [`Interval::max`]; every other
/// accessor, including the real-valued bounds and the bulk forms that fill
/// caller buffers, is derived from them. Concrete types may override the
/// derived methods when they can answer faster.
///
/// Passing an axis `d >= num_dimensions()` is a contract violation and is not
/// clamped; implementations index their storage directly and panic.
pub trait Interval: EuclideanSpace {
    /// Returns the inclusive lower bound along axis `d`.
    fn min(&self, d: usize) -> i64;

    /// Returns the inclusive upper bound along axis `d`.
    fn max(&self, d: usize) -> i64;

    /// Returns the number of integer positions along axis `d`, `max - min + 1`.
    #[inline]
    fn dimension(&self, d: usize) -> usize {
        (self.max(d) - self.min(d) + 1) as usize
    }

    /// Returns the lower bound along axis `d` as a floating point value.
    #[inline]
    fn real_min(&self, d: usize) -> f64 {
        self.min(d) as f64
    }

    /// Returns the upper bound along axis `d` as a floating point value.
    #[inline]
    fn real_max(&self, d: usize) -> f64 {
        self.max(d) as f64
    }

    /// Writes the lower bounds into `min`.
    fn min_into(&self, min: &mut [i64]) {
        for (d, m) in min.iter_mut().take(self.num_dimensions()).enumerate() {
            *m = self.min(d);
        }
    }

    /// Writes the upper bounds into `max`.
    fn max_into(&self, max: &mut [i64]) {
        for (d, m) in max.iter_mut().take(self.num_dimensions()).enumerate() {
            *m = self.max(d);
        }
    }

    /// Writes the per-axis extents into `dimensions`.
    fn dimensions_into(&self, dimensions: &mut [usize]) {
        for (d, s) in dimensions
            .iter_mut()
            .take(self.num_dimensions())
            .enumerate()
        {
            *s = self.dimension(d);
        }
    }

    /// Writes the real-valued lower bounds into `min`.
    fn real_min_into(&self, min: &mut [f64]) {
        for (d, m) in min.iter_mut().take(self.num_dimensions()).enumerate() {
            *m = self.real_min(d);
        }
    }

    /// Writes the real-valued upper bounds into `max`.
    fn real_max_into(&self, max: &mut [f64]) {
        for (d, m) in max.iter_mut().take(self.num_dimensions()).enumerate() {
            *m = self.real_max(d);
        }
    }

    /// Moves `position` to the lower corner of the interval.
    fn min_to<P: Positionable + ?Sized>(&self, position: &mut P) {
        for d in 0..self.num_dimensions() {
            position.set_coordinate(d, self.min(d));
        }
    }

    /// Moves `position` to the upper corner of the interval.
    fn max_to<P: Positionable + ?Sized>(&self, position: &mut P) {
        for d in 0..self.num_dimensions() {
            position.set_coordinate(d, self.max(d));
        }
    }

    /// Returns the lower bounds as a new vector.
    fn min_vec(&self) -> Vec<i64> {
        (0..self.num_dimensions()).map(|d| self.min(d)).collect()
    }

    /// Returns the upper bounds as a new vector.
    fn max_vec(&self) -> Vec<i64> {
        (0..self.num_dimensions()).map(|d| self.max(d)).collect()
    }

    /// Returns the per-axis extents as a new vector.
    fn dimensions_vec(&self) -> Vec<usize> {
        (0..self.num_dimensions()).map(|d| self.dimension(d)).collect()
    }

    /// Returns the number of integer positions inside the interval.
    fn num_elements(&self) -> usize {
        (0..self.num_dimensions())
            .map(|d| self.dimension(d))
            .product()
    }
}

/// An immutable interval with explicitly stored bounds.
///
/// # Examples
///
/// ```rust
/// use imgview_core::{FinalInterval, Interval};
///
/// let interval = FinalInterval::new(vec![-1, 0], vec![1, 4]).unwrap();
/// assert_eq!(interval.dimension(0), 3);
/// assert_eq!(interval.dimension(1), 5);
/// assert_eq!(interval.num_elements(), 15);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FinalInterval {
    min: Vec<i64>,
    max: Vec<i64>,
}

impl FinalInterval {
    /// Creates an interval from its inclusive bounds.
    ///
    /// # Arguments
    ///
    /// * `min` - The lower bound per axis.
    /// * `max` - The upper bound per axis.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::DimensionMismatch`] if the bound vectors differ in
    /// length and [`ViewError::InvalidInterval`] if any `max < min - 1`.
    pub fn new(min: Vec<i64>, max: Vec<i64>) -> Result<Self, ViewError> {
        crate::error::check_dimensions(min.len(), max.len())?;
        for (axis, (&lo, &hi)) in min.iter().zip(max.iter()).enumerate() {
            if hi < lo - 1 {
                return Err(ViewError::InvalidInterval {
                    axis,
                    min: lo,
                    max: hi,
                });
            }
        }
        Ok(Self { min, max })
    }

    /// Creates a zero-min interval with the given extents.
    pub fn from_dimensions(dimensions: &[usize]) -> Self {
        Self {
            min: vec![0; dimensions.len()],
            max: dimensions.iter().map(|&s| s as i64 - 1).collect(),
        }
    }

    /// Creates an interval from its lower corner and per-axis extents.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::DimensionMismatch`] if the lengths differ.
    pub fn from_min_size(min: &[i64], size: &[usize]) -> Result<Self, ViewError> {
        crate::error::check_dimensions(min.len(), size.len())?;
        let max = min
            .iter()
            .zip(size.iter())
            .map(|(&m, &s)| m + s as i64 - 1)
            .collect();
        Ok(Self {
            min: min.to_vec(),
            max,
        })
    }

    /// Copies the bounds of any interval.
    pub fn from_interval<I: Interval + ?Sized>(interval: &I) -> Self {
        Self {
            min: interval.min_vec(),
            max: interval.max_vec(),
        }
    }

    /// Returns the lower bounds.
    pub fn min_slice(&self) -> &[i64] {
        &self.min
    }

    /// Returns the upper bounds.
    pub fn max_slice(&self) -> &[i64] {
        &self.max
    }
}

impl EuclideanSpace for FinalInterval {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.min.len()
    }
}

impl Interval for FinalInterval {
    #[inline]
    fn min(&self, d: usize) -> i64 {
        self.min[d]
    }

    #[inline]
    fn max(&self, d: usize) -> i64 {
        self.max[d]
    }

    fn min_into(&self, min: &mut [i64]) {
        min[..self.min.len()].copy_from_slice(&self.min);
    }

    fn max_into(&self, max: &mut [i64]) {
        max[..self.max.len()].copy_from_slice(&self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Localizable, Point};

    #[test]
    fn dimension_is_max_minus_min_plus_one() -> Result<(), ViewError> {
        let interval = FinalInterval::new(vec![-3, 0, 5], vec![2, 0, 9])?;
        for d in 0..interval.num_dimensions() {
            assert_eq!(
                interval.dimension(d) as i64,
                interval.max(d) - interval.min(d) + 1
            );
        }
        assert_eq!(interval.dimensions_vec(), vec![6, 1, 5]);
        assert_eq!(interval.num_elements(), 30);
        Ok(())
    }

    #[test]
    fn bulk_forms_match_scalar_accessors() -> Result<(), ViewError> {
        let interval = FinalInterval::new(vec![1, -2], vec![4, 3])?;

        let mut min = [0i64; 2];
        let mut max = [0i64; 2];
        let mut dims = [0usize; 2];
        let mut real_min = [0f64; 2];
        let mut real_max = [0f64; 2];
        interval.min_into(&mut min);
        interval.max_into(&mut max);
        interval.dimensions_into(&mut dims);
        interval.real_min_into(&mut real_min);
        interval.real_max_into(&mut real_max);

        assert_eq!(min, [1, -2]);
        assert_eq!(max, [4, 3]);
        assert_eq!(dims, [4, 6]);
        assert_eq!(real_min, [1.0, -2.0]);
        assert_eq!(real_max, [4.0, 3.0]);

        let mut corner = Point::origin(2);
        interval.max_to(&mut corner);
        assert_eq!(corner.position_vec(), vec![4, 3]);
        interval.min_to(&mut corner);
        assert_eq!(corner.position_vec(), vec![1, -2]);
        Ok(())
    }

    #[test]
    fn empty_axis_is_allowed_transiently() -> Result<(), ViewError> {
        let interval = FinalInterval::new(vec![0, 5], vec![3, 4])?;
        assert_eq!(interval.dimension(1), 0);
        assert_eq!(interval.num_elements(), 0);
        Ok(())
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        assert_eq!(
            FinalInterval::new(vec![0, 5], vec![3, 2]),
            Err(ViewError::InvalidInterval {
                axis: 1,
                min: 5,
                max: 2
            })
        );
        assert_eq!(
            FinalInterval::new(vec![0, 5], vec![3]),
            Err(ViewError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn from_min_size_and_dimensions() -> Result<(), ViewError> {
        let a = FinalInterval::from_min_size(&[2, -1], &[3, 2])?;
        assert_eq!(a.min_slice(), &[2, -1]);
        assert_eq!(a.max_slice(), &[4, 0]);

        let b = FinalInterval::from_dimensions(&[3, 2]);
        assert_eq!(b.max_slice(), &[2, 1]);
        assert_eq!(FinalInterval::from_interval(&b), b);
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
        let interval = FinalInterval::new(vec![0, -1], vec![9, 1])?;
        let json = serde_json::to_string(&interval)?;
        let back: FinalInterval = serde_json::from_str(&json)?;
        assert_eq!(back, interval);
        Ok(())
    }
}
