use std::ops::Range;

use imgview_core::raster::{self, index_to_position};
use imgview_core::{
    Cursor, ElementSpace, EuclideanSpace, Interval, IterableInterval, Localizable, Positionable,
    RandomAccessible, Sampler, SamplerMut,
};

use crate::error::ArrayError;

/// A dense n-dimensional array stored in one contiguous buffer.
///
/// The lower corner is the origin and the first axis is the fastest varying,
/// so element `p` lives at flat index `sum(p[d] * strides[d])` with
/// `strides[0] == 1`.
///
/// # Examples
///
/// ```rust
/// use imgview_array::ArrayImg;
///
/// let array = ArrayImg::from_shape_vec(&[3, 2], vec![1, 2, 3, 4, 5, 6]).unwrap();
/// assert_eq!(array.get(&[1, 0]), Some(&2));
/// assert_eq!(array.get(&[0, 1]), Some(&4));
/// assert!(array.get(&[3, 0]).is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayImg<T> {
    dimensions: Vec<usize>,
    strides: Vec<usize>,
    data: Vec<T>,
}

fn strides_for(dimensions: &[usize]) -> Vec<usize> {
    let mut strides = Vec::with_capacity(dimensions.len());
    let mut stride = 1;
    for &size in dimensions {
        strides.push(stride);
        stride *= size;
    }
    strides
}

impl<T> ArrayImg<T> {
    /// Creates an array from its dimensions and data in raster order.
    ///
    /// # Arguments
    ///
    /// * `dimensions` - The extent of every axis.
    /// * `data` - The elements, first axis fastest.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidShape`] if the data length does not equal
    /// the product of the dimensions.
    pub fn from_shape_vec(dimensions: &[usize], data: Vec<T>) -> Result<Self, ArrayError> {
        let expected = dimensions.iter().product();
        if data.len() != expected {
            return Err(ArrayError::InvalidShape {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            dimensions: dimensions.to_vec(),
            strides: strides_for(dimensions),
            data,
        })
    }

    /// Creates an array with every element set to `value`.
    pub fn from_shape_val(dimensions: &[usize], value: T) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        let len = dimensions.iter().product();
        Self::from_shape_vec(dimensions, vec![value; len])
    }

    /// Creates an array whose element at `p` is `f(p)`.
    ///
    /// # Example
    ///
    /// ```
    /// use imgview_array::ArrayImg;
    ///
    /// let array = ArrayImg::from_shape_fn(&[2, 2], |p| p[0] + 2 * p[1]).unwrap();
    /// assert_eq!(array.as_slice(), &[0, 1, 2, 3]);
    /// ```
    pub fn from_shape_fn<F>(dimensions: &[usize], f: F) -> Result<Self, ArrayError>
    where
        F: Fn(&[i64]) -> T,
    {
        let len: usize = dimensions.iter().product();
        let min = vec![0; dimensions.len()];
        let mut position = vec![0; dimensions.len()];
        let mut data = Vec::with_capacity(len);
        for index in 0..len {
            index_to_position(index, &min, dimensions, &mut position);
            data.push(f(&position));
        }
        Self::from_shape_vec(dimensions, data)
    }

    /// Returns the extent of every axis.
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    /// Returns the flat distance between neighbors along every axis.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the elements in raster order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the elements in raster order, mutably.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the array and returns its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns the flat index of `position`, or `None` if it lies outside.
    pub fn offset_of(&self, position: &[i64]) -> Option<usize> {
        if position.len() != self.dimensions.len() {
            return None;
        }
        let mut offset = 0;
        for ((&p, &size), &stride) in position
            .iter()
            .zip(self.dimensions.iter())
            .zip(self.strides.iter())
        {
            if p < 0 || p as usize >= size {
                return None;
            }
            offset += p as usize * stride;
        }
        Some(offset)
    }

    /// Returns a reference to the element at `position`.
    pub fn get(&self, position: &[i64]) -> Option<&T> {
        self.offset_of(position).map(|offset| &self.data[offset])
    }

    /// Returns a mutable reference to the element at `position`.
    pub fn get_mut(&mut self, position: &[i64]) -> Option<&mut T> {
        self.offset_of(position)
            .map(move |offset| &mut self.data[offset])
    }

    /// Creates a writable random access positioned at the origin.
    pub fn random_access_mut(&mut self) -> ArrayRandomAccessMut<'_, T> {
        ArrayRandomAccessMut {
            position: vec![0; self.dimensions.len()],
            strides: &self.strides,
            data: &mut self.data,
            offset: 0,
        }
    }

    /// Creates a writable cursor over every element.
    pub fn cursor_mut(&mut self) -> ArraySubCursorMut<'_, T> {
        let len = self.data.len();
        ArraySubCursorMut {
            walk: FlatWalk::new(&self.dimensions, 0, len),
            data: &mut self.data,
        }
    }

    /// Splits the array into writable cursors over disjoint flat ranges.
    ///
    /// Every cursor owns its part of the buffer, so the cursors can be moved
    /// to different threads and written concurrently. Each cursor reports the
    /// true coordinates of the elements it visits.
    ///
    /// # Arguments
    ///
    /// * `ranges` - Flat index ranges in raster order. The first starts at 0
    ///   and each following one starts where the previous one ended.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidRange`] for a range that overlaps or leaves
    /// a gap after its predecessor, is reversed, or ends past the array.
    pub fn split_cursors_mut(
        &mut self,
        ranges: &[Range<usize>],
    ) -> Result<Vec<ArraySubCursorMut<'_, T>>, ArrayError> {
        let len = self.data.len();
        let mut expected_start = 0;
        for (index, range) in ranges.iter().enumerate() {
            if range.start != expected_start || range.end < range.start || range.end > len {
                return Err(ArrayError::InvalidRange {
                    index,
                    start: range.start,
                    end: range.end,
                    expected_start,
                    len,
                });
            }
            expected_start = range.end;
        }

        let Self {
            dimensions, data, ..
        } = self;
        let mut rest: &mut [T] = data.as_mut_slice();
        let mut cursors = Vec::with_capacity(ranges.len());
        for range in ranges {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            rest = tail;
            cursors.push(ArraySubCursorMut {
                walk: FlatWalk::new(dimensions, range.start, range.len()),
                data: head,
            });
        }
        Ok(cursors)
    }
}

impl<T> EuclideanSpace for ArrayImg<T> {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.dimensions.len()
    }
}

impl<T> Interval for ArrayImg<T> {
    #[inline]
    fn min(&self, _d: usize) -> i64 {
        0
    }

    #[inline]
    fn max(&self, d: usize) -> i64 {
        self.dimensions[d] as i64 - 1
    }

    #[inline]
    fn dimension(&self, d: usize) -> usize {
        self.dimensions[d]
    }

    fn num_elements(&self) -> usize {
        self.data.len()
    }
}

impl<T> ElementSpace for ArrayImg<T> {
    type Element = T;
}

impl<T: Clone> RandomAccessible for ArrayImg<T> {
    type Access<'a>
        = ArrayRandomAccess<'a, T>
    where
        Self: 'a;

    fn random_access(&self) -> Self::Access<'_> {
        ArrayRandomAccess {
            data: &self.data,
            strides: &self.strides,
            position: vec![0; self.dimensions.len()],
            offset: 0,
        }
    }
}

impl<T: Clone> IterableInterval for ArrayImg<T> {
    type Iter<'a>
        = ArrayCursor<'a, T>
    where
        Self: 'a;

    fn cursor(&self) -> Self::Iter<'_> {
        ArrayCursor {
            data: &self.data,
            walk: FlatWalk::new(&self.dimensions, 0, self.data.len()),
        }
    }

    fn size(&self) -> usize {
        self.data.len()
    }
}

/// Position bookkeeping for a cursor over the flat range `[start, start + len)`.
#[derive(Debug, Clone)]
struct FlatWalk {
    start: usize,
    len: usize,
    // number of fwd steps taken; the current element is `index - 1`
    index: usize,
    position: Vec<i64>,
    min: Vec<i64>,
    max: Vec<i64>,
    dimensions: Vec<usize>,
}

impl FlatWalk {
    fn new(dimensions: &[usize], start: usize, len: usize) -> Self {
        let mut walk = Self {
            start,
            len,
            index: 0,
            position: vec![0; dimensions.len()],
            min: vec![0; dimensions.len()],
            max: dimensions.iter().map(|&s| s as i64 - 1).collect(),
            dimensions: dimensions.to_vec(),
        };
        walk.reset();
        walk
    }

    fn reset(&mut self) {
        self.index = 0;
        index_to_position(self.start, &self.min, &self.dimensions, &mut self.position);
        if let Some(first) = self.position.first_mut() {
            *first -= 1;
        }
    }

    #[inline]
    fn fwd(&mut self) {
        raster::increment(&mut self.position, &self.min, &self.max);
        self.index += 1;
    }

    fn jump_fwd(&mut self, steps: usize) {
        if steps == 0 {
            return;
        }
        self.index += steps;
        index_to_position(
            self.start + self.index - 1,
            &self.min,
            &self.dimensions,
            &mut self.position,
        );
    }

    #[inline]
    fn has_next(&self) -> bool {
        self.index < self.len
    }

    #[inline]
    fn current(&self) -> usize {
        self.index - 1
    }
}

/// A read-only cursor over an [`ArrayImg`].
#[derive(Debug, Clone)]
pub struct ArrayCursor<'a, T> {
    data: &'a [T],
    walk: FlatWalk,
}

impl<T> EuclideanSpace for ArrayCursor<'_, T> {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.walk.position.len()
    }
}

impl<T> Localizable for ArrayCursor<'_, T> {
    #[inline]
    fn coordinate(&self, d: usize) -> i64 {
        self.walk.position[d]
    }
}

impl<T: Clone> Sampler for ArrayCursor<'_, T> {
    type Item = T;

    #[inline]
    fn get(&self) -> T {
        self.data[self.walk.current()].clone()
    }
}

impl<T: Clone> Cursor for ArrayCursor<'_, T> {
    #[inline]
    fn fwd(&mut self) {
        self.walk.fwd();
    }

    #[inline]
    fn has_next(&self) -> bool {
        self.walk.has_next()
    }

    fn reset(&mut self) {
        self.walk.reset();
    }

    fn jump_fwd(&mut self, steps: usize) {
        self.walk.jump_fwd(steps);
    }
}

/// A writable cursor over a contiguous flat range of an [`ArrayImg`].
///
/// Produced by [`ArrayImg::cursor_mut`] and [`ArrayImg::split_cursors_mut`].
/// It exclusively borrows its part of the buffer.
#[derive(Debug)]
pub struct ArraySubCursorMut<'a, T> {
    data: &'a mut [T],
    walk: FlatWalk,
}

impl<T> ArraySubCursorMut<'_, T> {
    /// Returns the flat index of the first element this cursor visits.
    pub fn start(&self) -> usize {
        self.walk.start
    }

    /// Returns the number of elements this cursor visits.
    pub fn len(&self) -> usize {
        self.walk.len
    }

    /// Returns true if the cursor visits no element.
    pub fn is_empty(&self) -> bool {
        self.walk.len == 0
    }
}

impl<T> EuclideanSpace for ArraySubCursorMut<'_, T> {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.walk.position.len()
    }
}

impl<T> Localizable for ArraySubCursorMut<'_, T> {
    #[inline]
    fn coordinate(&self, d: usize) -> i64 {
        self.walk.position[d]
    }
}

impl<T: Clone> Sampler for ArraySubCursorMut<'_, T> {
    type Item = T;

    #[inline]
    fn get(&self) -> T {
        self.data[self.walk.current()].clone()
    }
}

impl<T: Clone> SamplerMut for ArraySubCursorMut<'_, T> {
    #[inline]
    fn set(&mut self, value: T) {
        self.data[self.walk.current()] = value;
    }
}

impl<T: Clone> Cursor for ArraySubCursorMut<'_, T> {
    #[inline]
    fn fwd(&mut self) {
        self.walk.fwd();
    }

    #[inline]
    fn has_next(&self) -> bool {
        self.walk.has_next()
    }

    fn reset(&mut self) {
        self.walk.reset();
    }

    fn jump_fwd(&mut self, steps: usize) {
        self.walk.jump_fwd(steps);
    }
}

/// Read-only random access into an [`ArrayImg`].
///
/// Reading at a position outside the array panics.
#[derive(Debug, Clone)]
pub struct ArrayRandomAccess<'a, T> {
    data: &'a [T],
    strides: &'a [usize],
    position: Vec<i64>,
    offset: i64,
}

impl<T> EuclideanSpace for ArrayRandomAccess<'_, T> {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.position.len()
    }
}

impl<T> Localizable for ArrayRandomAccess<'_, T> {
    #[inline]
    fn coordinate(&self, d: usize) -> i64 {
        self.position[d]
    }
}

impl<T> Positionable for ArrayRandomAccess<'_, T> {
    #[inline]
    fn set_coordinate(&mut self, d: usize, value: i64) {
        self.offset += (value - self.position[d]) * self.strides[d] as i64;
        self.position[d] = value;
    }

    #[inline]
    fn move_coordinate(&mut self, d: usize, distance: i64) {
        self.offset += distance * self.strides[d] as i64;
        self.position[d] += distance;
    }
}

impl<T: Clone> Sampler for ArrayRandomAccess<'_, T> {
    type Item = T;

    #[inline]
    fn get(&self) -> T {
        self.data[self.offset as usize].clone()
    }
}

/// Writable random access into an [`ArrayImg`].
#[derive(Debug)]
pub struct ArrayRandomAccessMut<'a, T> {
    data: &'a mut [T],
    strides: &'a [usize],
    position: Vec<i64>,
    offset: i64,
}

impl<T> EuclideanSpace for ArrayRandomAccessMut<'_, T> {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.position.len()
    }
}

impl<T> Localizable for ArrayRandomAccessMut<'_, T> {
    #[inline]
    fn coordinate(&self, d: usize) -> i64 {
        self.position[d]
    }
}

impl<T> Positionable for ArrayRandomAccessMut<'_, T> {
    #[inline]
    fn set_coordinate(&mut self, d: usize, value: i64) {
        self.offset += (value - self.position[d]) * self.strides[d] as i64;
        self.position[d] = value;
    }

    #[inline]
    fn move_coordinate(&mut self, d: usize, distance: i64) {
        self.offset += distance * self.strides[d] as i64;
        self.position[d] += distance;
    }
}

impl<T: Clone> Sampler for ArrayRandomAccessMut<'_, T> {
    type Item = T;

    #[inline]
    fn get(&self) -> T {
        self.data[self.offset as usize].clone()
    }
}

impl<T: Clone> SamplerMut for ArrayRandomAccessMut<'_, T> {
    #[inline]
    fn set(&mut self, value: T) {
        self.data[self.offset as usize] = value;
    }
}
