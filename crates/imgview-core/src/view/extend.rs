use std::sync::Arc;

use crate::access::{ElementSpace, RandomAccessible, Sampler};
use crate::interval::{FinalInterval, Interval};
use crate::position::{EuclideanSpace, Localizable, Positionable};

/// How reads outside the bounds of a source are answered.
#[derive(Debug, Clone, PartialEq)]
pub enum OutOfBounds<T> {
    /// Every position outside the bounds reads the given value.
    ///
    /// Example: ...d c b a | v v v v...
    Constant(T),

    /// The nearest border element is repeated.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// The source is mirrored, starting with the border element itself.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,

    /// The source is mirrored, starting with the element next to the border.
    ///
    /// Example: ...d c b a | b c d e...
    Reflect101,

    /// The source repeats periodically.
    ///
    /// Example: ...d c b a | w x y z...
    Wrap,
}

impl<T> OutOfBounds<T> {
    /// Maps offset `i` from the lower bound into `[0, len)`.
    ///
    /// `Constant` clamps, so the wrapped access always stays on valid data;
    /// the constant itself is substituted when the element is read.
    #[inline]
    pub fn map_index(&self, i: i64, len: i64) -> i64 {
        if (0..len).contains(&i) {
            return i;
        }
        match self {
            OutOfBounds::Constant(_) | OutOfBounds::Replicate => i.clamp(0, len - 1),
            OutOfBounds::Reflect => {
                let m = i.rem_euclid(2 * len);
                if m >= len {
                    2 * len - 1 - m
                } else {
                    m
                }
            }
            OutOfBounds::Reflect101 => {
                if len == 1 {
                    return 0;
                }
                let m = i.rem_euclid(2 * len - 2);
                if m >= len {
                    2 * len - 2 - m
                } else {
                    m
                }
            }
            OutOfBounds::Wrap => i.rem_euclid(len),
        }
    }
}

/// A view that can be read at any integer coordinate.
///
/// Positions inside the bounds of the source read the source; everything else
/// is answered by the [`OutOfBounds`] policy. The view itself is unbounded.
#[derive(Debug, Clone)]
pub struct ExtendedView<'s, S, T> {
    source: &'s S,
    bounds: Arc<FinalInterval>,
    policy: OutOfBounds<T>,
}

impl<'s, S, T> ExtendedView<'s, S, T> {
    pub(crate) fn new(source: &'s S, bounds: FinalInterval, policy: OutOfBounds<T>) -> Self {
        Self {
            source,
            bounds: Arc::new(bounds),
            policy,
        }
    }

    /// Returns the bounds of the wrapped source.
    pub fn bounds(&self) -> &FinalInterval {
        &self.bounds
    }

    /// Returns the out-of-bounds policy.
    pub fn policy(&self) -> &OutOfBounds<T> {
        &self.policy
    }
}

impl<S, T> EuclideanSpace for ExtendedView<'_, S, T> {
    fn num_dimensions(&self) -> usize {
        self.bounds.num_dimensions()
    }
}

impl<S: ElementSpace<Element = T>, T> ElementSpace for ExtendedView<'_, S, T> {
    type Element = T;
}

impl<S, T> RandomAccessible for ExtendedView<'_, S, T>
where
    S: RandomAccessible<Element = T>,
    T: Clone,
{
    type Access<'a>
        = ExtendedAccess<S::Access<'a>, T>
    where
        Self: 'a;

    fn random_access(&self) -> Self::Access<'_> {
        let n = self.bounds.num_dimensions();
        let mut access = ExtendedAccess {
            inner: self.source.random_access(),
            bounds: Arc::clone(&self.bounds),
            policy: self.policy.clone(),
            position: vec![0; n],
            outside: vec![false; n],
        };
        for d in 0..n {
            access.set_coordinate(d, 0);
        }
        access
    }
}

/// Random access into an [`ExtendedView`].
#[derive(Debug, Clone)]
pub struct ExtendedAccess<A, T> {
    inner: A,
    bounds: Arc<FinalInterval>,
    policy: OutOfBounds<T>,
    position: Vec<i64>,
    outside: Vec<bool>,
}

impl<A, T> ExtendedAccess<A, T> {
    /// Returns true if the current position lies outside the source bounds.
    pub fn is_outside(&self) -> bool {
        self.outside.iter().any(|&o| o)
    }
}

impl<A, T> EuclideanSpace for ExtendedAccess<A, T> {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.position.len()
    }
}

impl<A, T> Localizable for ExtendedAccess<A, T> {
    #[inline]
    fn coordinate(&self, d: usize) -> i64 {
        self.position[d]
    }
}

impl<A: Positionable, T> Positionable for ExtendedAccess<A, T> {
    fn set_coordinate(&mut self, d: usize, value: i64) {
        let min = self.bounds.min(d);
        let len = self.bounds.dimension(d) as i64;
        let offset = value - min;
        self.position[d] = value;
        self.outside[d] = !(0..len).contains(&offset);
        self.inner
            .set_coordinate(d, min + self.policy.map_index(offset, len));
    }

    #[inline]
    fn move_coordinate(&mut self, d: usize, distance: i64) {
        self.set_coordinate(d, self.position[d] + distance);
    }
}

impl<A: Sampler<Item = T>, T: Clone> Sampler for ExtendedAccess<A, T> {
    type Item = T;

    #[inline]
    fn get(&self) -> T {
        match &self.policy {
            OutOfBounds::Constant(value) if self.is_outside() => value.clone(),
            _ => self.inner.get(),
        }
    }
}
