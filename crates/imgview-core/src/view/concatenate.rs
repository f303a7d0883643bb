use std::sync::Arc;

use crate::access::{ElementSpace, IterableInterval, RandomAccessible, Sampler};
use crate::error::ViewError;
use crate::interval::{FinalInterval, Interval};
use crate::position::{EuclideanSpace, Localizable, Positionable};
use crate::raster::IntervalCursor;

#[derive(Debug)]
struct Layout {
    axis: usize,
    // view coordinate along `axis` where each source starts
    starts: Vec<i64>,
    source_mins: Vec<Vec<i64>>,
    view_min: Vec<i64>,
}

impl Layout {
    fn locate(&self, coordinate: i64) -> usize {
        // positions before the first or past the last part fall to the nearest part
        self.starts
            .partition_point(|&start| start <= coordinate)
            .saturating_sub(1)
    }

    fn to_source(&self, index: usize, d: usize, value: i64) -> i64 {
        let origin = if d == self.axis {
            self.starts[index]
        } else {
            self.view_min[d]
        };
        value - origin + self.source_mins[index][d]
    }
}

/// Several intervals joined end to end along one axis.
///
/// The view starts at the lower corner of the first source. Each further
/// source follows directly after the previous one along `axis`; on every other
/// axis all sources must have the same extent and are aligned at their minima.
#[derive(Debug, Clone)]
pub struct ConcatenateView<'s, S> {
    sources: Vec<&'s S>,
    bounds: FinalInterval,
    layout: Arc<Layout>,
}

impl<'s, S: Interval> ConcatenateView<'s, S> {
    pub(crate) fn new(axis: usize, sources: &[&'s S]) -> Result<Self, ViewError> {
        let first = sources.first().ok_or(ViewError::EmptySources)?;
        let n = first.num_dimensions();
        if axis >= n {
            return Err(ViewError::InvalidAxis {
                axis,
                num_dimensions: n,
            });
        }

        let view_min = first.min_vec();
        let mut max = first.max_vec();
        let mut starts = Vec::with_capacity(sources.len());
        let mut next_start = view_min[axis];

        for (index, source) in sources.iter().enumerate() {
            crate::error::check_dimensions(n, source.num_dimensions())?;
            for d in (0..n).filter(|&d| d != axis) {
                if source.dimension(d) != first.dimension(d) {
                    return Err(ViewError::IncompatibleConcatenation {
                        axis,
                        index,
                        mismatched_axis: d,
                        expected: first.dimension(d),
                        actual: source.dimension(d),
                    });
                }
            }
            starts.push(next_start);
            next_start += source.dimension(axis) as i64;
        }
        max[axis] = next_start - 1;

        Ok(Self {
            sources: sources.to_vec(),
            bounds: FinalInterval::new(view_min.clone(), max)?,
            layout: Arc::new(Layout {
                axis,
                starts,
                source_mins: sources.iter().map(|s| s.min_vec()).collect(),
                view_min,
            }),
        })
    }

    /// Returns the concatenation axis.
    pub fn axis(&self) -> usize {
        self.layout.axis
    }

    /// Returns the joined sources in order.
    pub fn sources(&self) -> &[&'s S] {
        &self.sources
    }
}

impl<S> EuclideanSpace for ConcatenateView<'_, S> {
    fn num_dimensions(&self) -> usize {
        self.bounds.num_dimensions()
    }
}

impl<S> Interval for ConcatenateView<'_, S> {
    #[inline]
    fn min(&self, d: usize) -> i64 {
        self.bounds.min(d)
    }

    #[inline]
    fn max(&self, d: usize) -> i64 {
        self.bounds.max(d)
    }
}

impl<S: ElementSpace> ElementSpace for ConcatenateView<'_, S> {
    type Element = S::Element;
}

impl<S: RandomAccessible> RandomAccessible for ConcatenateView<'_, S> {
    type Access<'a>
        = ConcatenateAccess<S::Access<'a>>
    where
        Self: 'a;

    fn random_access(&self) -> Self::Access<'_> {
        let n = self.bounds.num_dimensions();
        let mut access = ConcatenateAccess {
            parts: self.sources.iter().map(|s| s.random_access()).collect(),
            layout: Arc::clone(&self.layout),
            position: vec![0; n],
            active: self.layout.locate(0),
        };
        access.sync_active();
        access
    }
}

impl<S: RandomAccessible> IterableInterval for ConcatenateView<'_, S> {
    type Iter<'a>
        = IntervalCursor<ConcatenateAccess<S::Access<'a>>>
    where
        Self: 'a;

    fn cursor(&self) -> Self::Iter<'_> {
        IntervalCursor::new(&self.bounds, self.random_access())
    }
}

/// Random access into a [`ConcatenateView`].
///
/// Holds one access per source and forwards to the one whose part contains
/// the current position along the concatenation axis.
#[derive(Debug, Clone)]
pub struct ConcatenateAccess<A> {
    parts: Vec<A>,
    layout: Arc<Layout>,
    position: Vec<i64>,
    active: usize,
}

impl<A: Positionable> ConcatenateAccess<A> {
    fn sync_active(&mut self) {
        let part = &mut self.parts[self.active];
        for (d, &value) in self.position.iter().enumerate() {
            part.set_coordinate(d, self.layout.to_source(self.active, d, value));
        }
    }
}

impl<A> EuclideanSpace for ConcatenateAccess<A> {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.position.len()
    }
}

impl<A> Localizable for ConcatenateAccess<A> {
    #[inline]
    fn coordinate(&self, d: usize) -> i64 {
        self.position[d]
    }
}

impl<A: Positionable> Positionable for ConcatenateAccess<A> {
    fn set_coordinate(&mut self, d: usize, value: i64) {
        self.position[d] = value;
        if d == self.layout.axis {
            let part = self.layout.locate(value);
            if part != self.active {
                self.active = part;
                self.sync_active();
                return;
            }
        }
        let mapped = self.layout.to_source(self.active, d, value);
        self.parts[self.active].set_coordinate(d, mapped);
    }

    #[inline]
    fn move_coordinate(&mut self, d: usize, distance: i64) {
        self.set_coordinate(d, self.position[d] + distance);
    }
}

impl<A: Sampler> Sampler for ConcatenateAccess<A> {
    type Item = A::Item;

    #[inline]
    fn get(&self) -> A::Item {
        self.parts[self.active].get()
    }
}
