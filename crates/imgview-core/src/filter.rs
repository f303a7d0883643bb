use crate::access::{Cursor, Sampler};
use crate::interval::{FinalInterval, Interval};
use crate::intervals;
use crate::position::{EuclideanSpace, Localizable};

/// A cursor that only visits the positions of an inner cursor lying inside `bounds`.
///
/// The next matching position is located when the current one is consumed
/// (by [`Cursor::fwd`] or [`Cursor::reset`]) and kept as a lookahead copy of
/// the inner cursor. [`Cursor::has_next`] only inspects that lookahead, so it
/// can be called any number of times without moving anything.
///
/// Seeking only moves positions; elements are read exclusively through
/// [`Sampler::get`] at positions that passed the filter, so an inner cursor
/// over a bounded source is never read out of bounds.
#[derive(Debug, Clone)]
pub struct IntersectionCursor<C> {
    current: C,
    lookahead: Option<C>,
    bounds: FinalInterval,
}

impl<C: Cursor + Clone> IntersectionCursor<C> {
    /// Wraps `cursor`, which must be positioned before its first element.
    pub fn new<I: Interval + ?Sized>(cursor: C, bounds: &I) -> Self {
        let bounds = FinalInterval::from_interval(bounds);
        let lookahead = Self::seek(cursor.clone(), &bounds);
        Self {
            current: cursor,
            lookahead,
            bounds,
        }
    }

    /// Returns the filtering bounds.
    pub fn bounds(&self) -> &FinalInterval {
        &self.bounds
    }

    fn seek(mut cursor: C, bounds: &FinalInterval) -> Option<C> {
        while cursor.has_next() {
            cursor.fwd();
            if intervals::contains(bounds, &cursor) {
                return Some(cursor);
            }
        }
        None
    }
}

impl<C: EuclideanSpace> EuclideanSpace for IntersectionCursor<C> {
    fn num_dimensions(&self) -> usize {
        self.current.num_dimensions()
    }
}

impl<C: Localizable> Localizable for IntersectionCursor<C> {
    #[inline]
    fn coordinate(&self, d: usize) -> i64 {
        self.current.coordinate(d)
    }
}

impl<C: Sampler> Sampler for IntersectionCursor<C> {
    type Item = C::Item;

    #[inline]
    fn get(&self) -> C::Item {
        self.current.get()
    }
}

impl<C: Cursor + Clone> Cursor for IntersectionCursor<C> {
    fn fwd(&mut self) {
        if let Some(next) = self.lookahead.take() {
            self.lookahead = Self::seek(next.clone(), &self.bounds);
            self.current = next;
        }
    }

    #[inline]
    fn has_next(&self) -> bool {
        self.lookahead.is_some()
    }

    fn reset(&mut self) {
        self.current.reset();
        self.lookahead = Self::seek(self.current.clone(), &self.bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewError;
    use crate::access::IterableInterval;
    use crate::view;

    fn coordinates<C: Cursor + Localizable>(mut cursor: C) -> Vec<Vec<i64>> {
        let mut out = Vec::new();
        while cursor.has_next() {
            cursor.fwd();
            out.push(cursor.position_vec());
        }
        out
    }

    #[test]
    fn visits_only_contained_positions() -> Result<(), ViewError> {
        let source = view::function(2, |p: &[i64]| p[0] + 10 * p[1]);
        let walk = view::interval(&source, &[0, 0], &[3, 1])?;
        let bounds = FinalInterval::new(vec![1, 1], vec![2, 5])?;

        let cursor = IntersectionCursor::new(walk.cursor(), &bounds);
        assert_eq!(coordinates(cursor), vec![vec![1, 1], vec![2, 1]]);
        Ok(())
    }

    #[test]
    fn has_next_is_idempotent_until_consumed() -> Result<(), ViewError> {
        let source = view::function(1, |p: &[i64]| p[0] * 2);
        let walk = view::interval(&source, &[0], &[9])?;
        let bounds = FinalInterval::new(vec![4], vec![5])?;
        let mut cursor = IntersectionCursor::new(walk.cursor(), &bounds);

        for _ in 0..5 {
            assert!(cursor.has_next());
        }
        cursor.fwd();
        assert_eq!(cursor.get(), 8);
        for _ in 0..5 {
            assert!(cursor.has_next());
        }
        cursor.fwd();
        assert_eq!(cursor.get(), 10);
        for _ in 0..5 {
            assert!(!cursor.has_next());
        }

        cursor.reset();
        assert!(cursor.has_next());
        assert_eq!(cursor.next_item(), 8);
        Ok(())
    }

    #[test]
    fn disjoint_bounds_yield_nothing() -> Result<(), ViewError> {
        let source = view::function(1, |p: &[i64]| p[0]);
        let walk = view::interval(&source, &[0], &[3])?;
        let bounds = FinalInterval::new(vec![10], vec![12])?;
        let cursor = IntersectionCursor::new(walk.cursor(), &bounds);
        assert!(!cursor.has_next());
        Ok(())
    }
}
