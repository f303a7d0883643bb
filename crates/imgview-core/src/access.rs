use crate::interval::Interval;
use crate::position::{EuclideanSpace, Localizable, Positionable};

/// Reads the element at the current position.
pub trait Sampler {
    /// The element type.
    type Item;

    /// Returns the element at the current position.
    ///
    /// The value is a copy of what the backing store holds; use
    /// [`SamplerMut::set`] to write through.
    fn get(&self) -> Self::Item;
}

/// Writes the element at the current position into the backing store.
pub trait SamplerMut: Sampler {
    /// Replaces the element at the current position.
    fn set(&mut self, value: Self::Item);
}

/// A positionable sampler that can jump to any coordinate.
///
/// Copies are independent: each keeps its own position and shares only the
/// backing store, which is what lets every parallel worker hold its own
/// access into the same source.
pub trait RandomAccess: Localizable + Positionable + Sampler + Clone {
    /// Returns an independent copy positioned at the same coordinate.
    fn copy_random_access(&self) -> Self {
        self.clone()
    }
}

impl<A: Localizable + Positionable + Sampler + Clone> RandomAccess for A {}

/// A forward-only traversal in a fixed raster order.
///
/// A fresh cursor is positioned *before* the first element: call
/// [`Cursor::fwd`] once to reach it. [`Cursor::has_next`] takes `&self` and
/// therefore can never move the cursor, however often it is queried.
pub trait Cursor: Localizable + Sampler {
    /// Moves to the next element.
    fn fwd(&mut self);

    /// Returns true if a call to [`Cursor::fwd`] would reach another element.
    fn has_next(&self) -> bool;

    /// Moves back to the position before the first element.
    fn reset(&mut self);

    /// Moves `steps` elements forward, equivalent to calling [`Cursor::fwd`] `steps` times.
    fn jump_fwd(&mut self, steps: usize) {
        for _ in 0..steps {
            self.fwd();
        }
    }

    /// Moves to the next element and returns it.
    fn next_item(&mut self) -> Self::Item {
        self.fwd();
        self.get()
    }

    /// Returns an independent copy at the same position.
    fn copy_cursor(&self) -> Self
    where
        Self: Clone,
    {
        self.clone()
    }
}

/// Declares the element type of a random-accessible or iterable space.
pub trait ElementSpace: EuclideanSpace {
    /// The element type.
    type Element;
}

/// Something that can hand out random accesses at any coordinate of its space.
pub trait RandomAccessible: ElementSpace {
    /// The random access type.
    type Access<'a>: RandomAccess<Item = Self::Element>
    where
        Self: 'a;

    /// Creates a new random access, positioned at the origin.
    fn random_access(&self) -> Self::Access<'_>;
}

/// An interval whose elements can be visited with a cursor.
pub trait IterableInterval: ElementSpace + Interval {
    /// The cursor type.
    type Iter<'a>: Cursor<Item = Self::Element>
    where
        Self: 'a;

    /// Creates a new cursor positioned before the first element.
    fn cursor(&self) -> Self::Iter<'_>;

    /// Returns the number of elements a cursor visits.
    fn size(&self) -> usize {
        self.num_elements()
    }
}

/// A random-accessible source with known bounds.
pub trait RandomAccessibleInterval: RandomAccessible + Interval {}

impl<T: RandomAccessible + Interval> RandomAccessibleInterval for T {}
