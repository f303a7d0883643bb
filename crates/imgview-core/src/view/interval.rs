use crate::access::{ElementSpace, IterableInterval, RandomAccessible};
use crate::interval::{FinalInterval, Interval};
use crate::position::EuclideanSpace;
use crate::raster::IntervalCursor;

/// A view that gives its source explicit bounds.
///
/// Random access is forwarded unchanged; the bounds decide what a cursor
/// visits and what consumers treat as the extent of the data. The bounds are
/// not checked against the source, so an interval over an extended view may
/// reach past the original data.
#[derive(Debug, Clone)]
pub struct IntervalView<'s, S> {
    source: &'s S,
    bounds: FinalInterval,
}

impl<'s, S> IntervalView<'s, S> {
    pub(crate) fn new(source: &'s S, bounds: FinalInterval) -> Self {
        Self { source, bounds }
    }

    /// Returns the bounds of the view.
    pub fn bounds(&self) -> &FinalInterval {
        &self.bounds
    }

    /// Returns the underlying source.
    pub fn source(&self) -> &'s S {
        self.source
    }
}

impl<S> EuclideanSpace for IntervalView<'_, S> {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.bounds.num_dimensions()
    }
}

impl<S> Interval for IntervalView<'_, S> {
    #[inline]
    fn min(&self, d: usize) -> i64 {
        self.bounds.min(d)
    }

    #[inline]
    fn max(&self, d: usize) -> i64 {
        self.bounds.max(d)
    }
}

impl<S: ElementSpace> ElementSpace for IntervalView<'_, S> {
    type Element = S::Element;
}

impl<S: RandomAccessible> RandomAccessible for IntervalView<'_, S> {
    type Access<'a>
        = S::Access<'a>
    where
        Self: 'a;

    fn random_access(&self) -> Self::Access<'_> {
        self.source.random_access()
    }
}

impl<S: RandomAccessible> IterableInterval for IntervalView<'_, S> {
    type Iter<'a>
        = IntervalCursor<S::Access<'a>>
    where
        Self: 'a;

    fn cursor(&self) -> Self::Iter<'_> {
        IntervalCursor::new(&self.bounds, self.source.random_access())
    }
}
