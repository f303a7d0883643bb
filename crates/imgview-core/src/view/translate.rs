use crate::access::{
    Cursor, ElementSpace, IterableInterval, RandomAccessible, Sampler, SamplerMut,
};
use crate::interval::Interval;
use crate::position::{EuclideanSpace, Localizable, Positionable};

/// A view whose coordinates are shifted by `delta` relative to its source.
///
/// Reading at `c` reads the source at `c - delta`; the bounds, when the source
/// has any, move by `+delta`.
#[derive(Debug, Clone)]
pub struct TranslateView<'s, S> {
    source: &'s S,
    delta: Vec<i64>,
}

impl<'s, S: EuclideanSpace> TranslateView<'s, S> {
    pub(crate) fn new(source: &'s S, delta: Vec<i64>) -> Self {
        Self { source, delta }
    }

    /// Returns the per-axis shift applied to the source.
    pub fn delta(&self) -> &[i64] {
        &self.delta
    }

    /// Returns the underlying source.
    pub fn source(&self) -> &'s S {
        self.source
    }
}

impl<S: EuclideanSpace> EuclideanSpace for TranslateView<'_, S> {
    fn num_dimensions(&self) -> usize {
        self.source.num_dimensions()
    }
}

impl<S: Interval> Interval for TranslateView<'_, S> {
    #[inline]
    fn min(&self, d: usize) -> i64 {
        self.source.min(d) + self.delta[d]
    }

    #[inline]
    fn max(&self, d: usize) -> i64 {
        self.source.max(d) + self.delta[d]
    }
}

impl<S: ElementSpace> ElementSpace for TranslateView<'_, S> {
    type Element = S::Element;
}

impl<S: RandomAccessible> RandomAccessible for TranslateView<'_, S> {
    type Access<'a>
        = Translated<S::Access<'a>>
    where
        Self: 'a;

    fn random_access(&self) -> Self::Access<'_> {
        Translated::new(self.source.random_access(), self.delta.clone())
    }
}

impl<S: IterableInterval> IterableInterval for TranslateView<'_, S> {
    type Iter<'a>
        = Translated<S::Iter<'a>>
    where
        Self: 'a;

    fn cursor(&self) -> Self::Iter<'_> {
        Translated::new(self.source.cursor(), self.delta.clone())
    }

    fn size(&self) -> usize {
        self.source.size()
    }
}

/// Wraps a random access or a cursor and reports its coordinates shifted by `delta`.
///
/// Element reads and writes pass straight through; only positions are remapped.
/// The morphology engine uses this to address a zero-based output array in
/// the coordinate frame of a grown or shrunk result.
#[derive(Debug, Clone)]
pub struct Translated<T> {
    inner: T,
    delta: Vec<i64>,
}

impl<T: EuclideanSpace> Translated<T> {
    /// Wraps `inner` so that its coordinates appear moved by `delta`.
    ///
    /// # Panics
    ///
    /// Panics if `delta` does not have one entry per axis of `inner`.
    pub fn new(inner: T, delta: Vec<i64>) -> Self {
        assert_eq!(
            inner.num_dimensions(),
            delta.len(),
            "translation must have one entry per axis"
        );
        Self { inner, delta }
    }

    /// Returns the wrapped value.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: EuclideanSpace> EuclideanSpace for Translated<T> {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.delta.len()
    }
}

impl<T: Localizable> Localizable for Translated<T> {
    #[inline]
    fn coordinate(&self, d: usize) -> i64 {
        self.inner.coordinate(d) + self.delta[d]
    }
}

impl<T: Positionable> Positionable for Translated<T> {
    #[inline]
    fn set_coordinate(&mut self, d: usize, value: i64) {
        self.inner.set_coordinate(d, value - self.delta[d]);
    }

    #[inline]
    fn move_coordinate(&mut self, d: usize, distance: i64) {
        self.inner.move_coordinate(d, distance);
    }
}

impl<T: Sampler> Sampler for Translated<T> {
    type Item = T::Item;

    #[inline]
    fn get(&self) -> T::Item {
        self.inner.get()
    }
}

impl<T: SamplerMut> SamplerMut for Translated<T> {
    #[inline]
    fn set(&mut self, value: T::Item) {
        self.inner.set(value);
    }
}

impl<T: Cursor> Cursor for Translated<T> {
    #[inline]
    fn fwd(&mut self) {
        self.inner.fwd();
    }

    #[inline]
    fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn jump_fwd(&mut self, steps: usize) {
        self.inner.jump_fwd(steps);
    }
}
