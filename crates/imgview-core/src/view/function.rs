use std::fmt;
use std::marker::PhantomData;

use crate::access::{ElementSpace, RandomAccessible, Sampler};
use crate::position::{EuclideanSpace, Localizable, Positionable};

/// An unbounded source whose element at `p` is `f(p)`.
///
/// Nothing is stored; every read evaluates the function at the current
/// position.
pub struct FunctionView<F, T> {
    num_dimensions: usize,
    f: F,
    _marker: PhantomData<fn() -> T>,
}

impl<F, T> FunctionView<F, T>
where
    F: Fn(&[i64]) -> T,
{
    pub(crate) fn new(num_dimensions: usize, f: F) -> Self {
        Self {
            num_dimensions,
            f,
            _marker: PhantomData,
        }
    }

    /// Evaluates the function at `position`.
    pub fn eval(&self, position: &[i64]) -> T {
        (self.f)(position)
    }
}

impl<F, T> fmt::Debug for FunctionView<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionView")
            .field("num_dimensions", &self.num_dimensions)
            .finish_non_exhaustive()
    }
}

impl<F, T> EuclideanSpace for FunctionView<F, T> {
    fn num_dimensions(&self) -> usize {
        self.num_dimensions
    }
}

impl<F, T> ElementSpace for FunctionView<F, T> {
    type Element = T;
}

impl<F, T> RandomAccessible for FunctionView<F, T>
where
    F: Fn(&[i64]) -> T,
{
    type Access<'a>
        = FunctionAccess<'a, F, T>
    where
        Self: 'a;

    fn random_access(&self) -> Self::Access<'_> {
        FunctionAccess {
            f: &self.f,
            position: vec![0; self.num_dimensions],
            _marker: PhantomData,
        }
    }
}

/// Random access into a [`FunctionView`].
pub struct FunctionAccess<'a, F, T> {
    f: &'a F,
    position: Vec<i64>,
    _marker: PhantomData<fn() -> T>,
}

impl<F, T> Clone for FunctionAccess<'_, F, T> {
    fn clone(&self) -> Self {
        Self {
            f: self.f,
            position: self.position.clone(),
            _marker: PhantomData,
        }
    }
}

impl<F, T> fmt::Debug for FunctionAccess<'_, F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionAccess")
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl<F, T> EuclideanSpace for FunctionAccess<'_, F, T> {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.position.len()
    }
}

impl<F, T> Localizable for FunctionAccess<'_, F, T> {
    #[inline]
    fn coordinate(&self, d: usize) -> i64 {
        self.position[d]
    }
}

impl<F, T> Positionable for FunctionAccess<'_, F, T> {
    #[inline]
    fn set_coordinate(&mut self, d: usize, value: i64) {
        self.position[d] = value;
    }

    #[inline]
    fn move_coordinate(&mut self, d: usize, distance: i64) {
        self.position[d] += distance;
    }
}

impl<F, T> Sampler for FunctionAccess<'_, F, T>
where
    F: Fn(&[i64]) -> T,
{
    type Item = T;

    #[inline]
    fn get(&self) -> T {
        (self.f)(&self.position)
    }
}
