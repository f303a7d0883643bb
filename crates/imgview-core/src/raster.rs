//! Flat raster ordering of interval coordinates, first axis fastest.

use crate::access::{Cursor, RandomAccess, Sampler};
use crate::interval::Interval;
use crate::position::{EuclideanSpace, Localizable};

/// Advances `position` by one step in raster order inside `[min, max]`.
///
/// Axis 0 moves fastest. Returns false when the step wrapped past the last
/// position, in which case `position` is back at `min`.
#[inline]
pub fn increment(position: &mut [i64], min: &[i64], max: &[i64]) -> bool {
    for d in 0..position.len() {
        position[d] += 1;
        if position[d] <= max[d] {
            return true;
        }
        position[d] = min[d];
    }
    false
}

/// Writes the coordinates of the `index`-th raster position into `position`.
#[inline]
pub fn index_to_position(index: usize, min: &[i64], dimensions: &[usize], position: &mut [i64]) {
    let mut rem = index;
    for d in 0..dimensions.len() {
        let size = dimensions[d].max(1);
        position[d] = min[d] + (rem % size) as i64;
        rem /= size;
    }
}

/// Returns the raster index of `position`, which must lie inside the interval.
#[inline]
pub fn position_to_index(position: &[i64], min: &[i64], dimensions: &[usize]) -> usize {
    let mut index = 0;
    for d in (0..dimensions.len()).rev() {
        index = index * dimensions[d] + (position[d] - min[d]) as usize;
    }
    index
}

/// A cursor that walks an interval in raster order and reads through a random access.
///
/// This is how views without their own storage become iterable: the interval
/// supplies the traversal, the random access supplies the elements.
#[derive(Debug, Clone)]
pub struct IntervalCursor<A> {
    access: A,
    min: Vec<i64>,
    max: Vec<i64>,
    dimensions: Vec<usize>,
    position: Vec<i64>,
    size: usize,
    index: usize,
}

impl<A: RandomAccess> IntervalCursor<A> {
    /// Creates a cursor over `interval` reading from `access`.
    pub fn new<I: Interval + ?Sized>(interval: &I, access: A) -> Self {
        let min = interval.min_vec();
        let mut position = min.clone();
        if let Some(first) = position.first_mut() {
            *first -= 1;
        }
        Self {
            access,
            max: interval.max_vec(),
            dimensions: interval.dimensions_vec(),
            size: interval.num_elements(),
            min,
            position,
            index: 0,
        }
    }
}

impl<A> EuclideanSpace for IntervalCursor<A> {
    fn num_dimensions(&self) -> usize {
        self.position.len()
    }
}

impl<A> Localizable for IntervalCursor<A> {
    #[inline]
    fn coordinate(&self, d: usize) -> i64 {
        self.position[d]
    }
}

impl<A: RandomAccess> Sampler for IntervalCursor<A> {
    type Item = A::Item;

    #[inline]
    fn get(&self) -> A::Item {
        self.access.get()
    }
}

impl<A: RandomAccess> Cursor for IntervalCursor<A> {
    fn fwd(&mut self) {
        increment(&mut self.position, &self.min, &self.max);
        self.index += 1;
        self.access.set_position(&self.position);
    }

    #[inline]
    fn has_next(&self) -> bool {
        self.index < self.size
    }

    fn reset(&mut self) {
        self.position.copy_from_slice(&self.min);
        if let Some(first) = self.position.first_mut() {
            *first -= 1;
        }
        self.index = 0;
    }

    fn jump_fwd(&mut self, steps: usize) {
        if steps == 0 {
            return;
        }
        self.index += steps;
        index_to_position(self.index - 1, &self.min, &self.dimensions, &mut self.position);
        self.access.set_position(&self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_visits_first_axis_fastest() {
        let min = [0, 10];
        let max = [1, 11];
        let mut p = [0, 10];
        let mut visited = vec![p];
        while increment(&mut p, &min, &max) {
            visited.push(p);
        }
        assert_eq!(visited, vec![[0, 10], [1, 10], [0, 11], [1, 11]]);
        assert_eq!(p, [0, 10]);
    }

    #[test]
    fn index_and_position_are_inverse() {
        let min = [-1, 2, 0];
        let dims = [3, 2, 4];
        let mut p = [0i64; 3];
        for index in 0..24 {
            index_to_position(index, &min, &dims, &mut p);
            assert_eq!(position_to_index(&p, &min, &dims), index);
        }
        index_to_position(4, &min, &dims, &mut p);
        assert_eq!(p, [0, 3, 0]);
    }
}
