use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use imgview_core::raster;
use imgview_core::{
    Cursor, ElementSpace, EuclideanSpace, FinalInterval, Interval, IterableInterval, Localizable,
    Positionable, RandomAccess, RandomAccessible, Sampler,
};

/// The member offsets of a flat structuring element.
///
/// Offsets are relative to the center and kept in traversal order. Next to
/// the members the element carries its declared box, the sample neighborhood
/// used to size and place the output of the full morphology variants. The box
/// covers every member but does not shrink when members are left out, so a
/// hollow or empty element still spans at least the center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    num_dimensions: usize,
    offsets: Vec<i64>,
    bounds: FinalInterval,
}

impl StructuringElement {
    /// Creates an element from member offsets laid out one after another.
    ///
    /// The box is the bounding box of the members together with the center.
    ///
    /// # Arguments
    ///
    /// * `num_dimensions` - The number of axes of every offset.
    /// * `offsets` - `num_dimensions` coordinates per member, in traversal order.
    ///
    /// # Panics
    ///
    /// Panics if `offsets` is not a whole number of members.
    pub fn new(num_dimensions: usize, offsets: Vec<i64>) -> Self {
        let origin = vec![0; num_dimensions];
        Self::with_box(num_dimensions, offsets, &origin, &origin)
    }

    /// Creates an element whose box spans at least `[min, max]`.
    ///
    /// Members outside `[min, max]` widen the box.
    ///
    /// # Panics
    ///
    /// Panics if `offsets` is not a whole number of members or `min`/`max`
    /// do not have `num_dimensions` entries.
    pub fn with_box(num_dimensions: usize, offsets: Vec<i64>, min: &[i64], max: &[i64]) -> Self {
        assert!(
            num_dimensions == 0 || offsets.len() % num_dimensions == 0,
            "offsets must hold {num_dimensions} coordinates per member"
        );
        assert!(min.len() == num_dimensions && max.len() == num_dimensions);
        let bounds = bounding_box(num_dimensions, &offsets, min, max);
        Self {
            num_dimensions,
            offsets,
            bounds,
        }
    }

    /// Enumerates the box `[-radii, radii]` in raster order and keeps the offsets accepted by `keep`.
    ///
    /// The box of the element is the whole enumerated box.
    pub fn from_box<F>(radii: &[i64], keep: F) -> Self
    where
        F: Fn(&[i64]) -> bool,
    {
        let radii: Vec<i64> = radii.iter().map(|&r| r.max(0)).collect();
        let min: Vec<i64> = radii.iter().map(|r| -r).collect();
        let mut offsets = Vec::new();
        let mut p = min.clone();
        loop {
            if keep(&p) {
                offsets.extend_from_slice(&p);
            }
            if !raster::increment(&mut p, &min, &radii) {
                break;
            }
        }
        Self::with_box(radii.len(), offsets, &min, &radii)
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        if self.num_dimensions == 0 {
            return 0;
        }
        self.offsets.len() / self.num_dimensions
    }

    /// Returns true if the element has no members.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the offset of member `i`.
    pub fn offset(&self, i: usize) -> &[i64] {
        &self.offsets[i * self.num_dimensions..(i + 1) * self.num_dimensions]
    }

    /// Iterates the member offsets in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = &[i64]> {
        self.offsets.chunks_exact(self.num_dimensions.max(1))
    }

    /// Returns the box of the element relative to the center.
    ///
    /// It contains the center and every member, and never has zero extent.
    pub fn bounds(&self) -> &FinalInterval {
        &self.bounds
    }

    /// Drops the axes from `num_dimensions` on.
    ///
    /// Only members whose offset is zero on every dropped axis are kept, so the
    /// result is the slice of the element through its center. The box keeps
    /// its extent on the remaining axes.
    pub fn restrict(&self, num_dimensions: usize) -> Self {
        if num_dimensions >= self.num_dimensions {
            return self.clone();
        }
        let mut offsets = Vec::new();
        for offset in self.iter() {
            if offset[num_dimensions..].iter().all(|&o| o == 0) {
                offsets.extend_from_slice(&offset[..num_dimensions]);
            }
        }
        let min = &self.bounds.min_slice()[..num_dimensions];
        let max = &self.bounds.max_slice()[..num_dimensions];
        Self::with_box(num_dimensions, offsets, min, max)
    }
}

impl EuclideanSpace for StructuringElement {
    fn num_dimensions(&self) -> usize {
        self.num_dimensions
    }
}

fn bounding_box(n: usize, offsets: &[i64], min: &[i64], max: &[i64]) -> FinalInterval {
    let mut lo: Vec<i64> = min.iter().map(|&m| m.min(0)).collect();
    let mut hi: Vec<i64> = max.iter().map(|&m| m.max(0)).collect();
    for offset in offsets.chunks_exact(n.max(1)) {
        for ((l, h), &o) in lo.iter_mut().zip(hi.iter_mut()).zip(offset) {
            *l = (*l).min(o);
            *h = (*h).max(o);
        }
    }
    let size: Vec<usize> = lo.iter().zip(&hi).map(|(l, h)| (h - l + 1) as usize).collect();
    FinalInterval::from_min_size(&lo, &size).unwrap_or_else(|_| FinalInterval::from_dimensions(&size))
}

/// The members of a structuring element placed around a center in some source.
///
/// A neighborhood is a view: its cursor reads the source at `center + offset`
/// for every member, including members outside the bounds of the source.
/// Skipping those is up to the consumer.
#[derive(Debug, Clone)]
pub struct Neighborhood<A> {
    center: Vec<i64>,
    element: Arc<StructuringElement>,
    access: A,
}

impl<A> Neighborhood<A> {
    /// Returns the center position.
    pub fn center(&self) -> &[i64] {
        &self.center
    }

    /// Returns the structuring element.
    pub fn element(&self) -> &StructuringElement {
        &self.element
    }
}

impl<A> EuclideanSpace for Neighborhood<A> {
    fn num_dimensions(&self) -> usize {
        self.center.len()
    }
}

impl<A> Interval for Neighborhood<A> {
    #[inline]
    fn min(&self, d: usize) -> i64 {
        self.center[d] + self.element.bounds().min(d)
    }

    #[inline]
    fn max(&self, d: usize) -> i64 {
        self.center[d] + self.element.bounds().max(d)
    }
}

impl<A: RandomAccess> ElementSpace for Neighborhood<A> {
    type Element = A::Item;
}

impl<A: RandomAccess> IterableInterval for Neighborhood<A> {
    type Iter<'a>
        = NeighborhoodCursor<'a, A>
    where
        Self: 'a;

    fn cursor(&self) -> Self::Iter<'_> {
        NeighborhoodCursor {
            center: &self.center,
            element: &self.element,
            access: self.access.clone(),
            position: self.center.clone(),
            index: 0,
        }
    }

    fn size(&self) -> usize {
        self.element.len()
    }
}

/// Visits the members of a [`Neighborhood`] in traversal order.
#[derive(Debug, Clone)]
pub struct NeighborhoodCursor<'n, A> {
    center: &'n [i64],
    element: &'n StructuringElement,
    access: A,
    position: Vec<i64>,
    index: usize,
}

impl<A> EuclideanSpace for NeighborhoodCursor<'_, A> {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.position.len()
    }
}

impl<A> Localizable for NeighborhoodCursor<'_, A> {
    #[inline]
    fn coordinate(&self, d: usize) -> i64 {
        self.position[d]
    }
}

impl<A: RandomAccess> Sampler for NeighborhoodCursor<'_, A> {
    type Item = A::Item;

    #[inline]
    fn get(&self) -> A::Item {
        self.access.get()
    }
}

impl<A: RandomAccess> Cursor for NeighborhoodCursor<'_, A> {
    fn fwd(&mut self) {
        let offset = self.element.offset(self.index);
        for (d, p) in self.position.iter_mut().enumerate() {
            *p = self.center[d] + offset[d];
        }
        self.access.set_position(&self.position);
        self.index += 1;
    }

    #[inline]
    fn has_next(&self) -> bool {
        self.index < self.element.len()
    }

    fn reset(&mut self) {
        self.index = 0;
        self.position.copy_from_slice(self.center);
    }
}

/// Gives uniform read access to the neighborhood behind either neighborhood variant.
pub trait NeighborhoodHandle {
    /// The random access the neighborhood reads the source with.
    type Access: RandomAccess;

    /// Calls `f` with the neighborhood.
    fn with_neighborhood<R>(&self, f: impl FnOnce(&Neighborhood<Self::Access>) -> R) -> R;
}

impl<A: RandomAccess> NeighborhoodHandle for Neighborhood<A> {
    type Access = A;

    fn with_neighborhood<R>(&self, f: impl FnOnce(&Neighborhood<A>) -> R) -> R {
        f(self)
    }
}

/// Every position of a source mapped to its own, independent neighborhood.
///
/// Each `get()` returns a fresh [`Neighborhood`] that keeps its center no
/// matter how the access moves afterwards. This is the variant to use when
/// several workers read the same source.
#[derive(Debug, Clone)]
pub struct Neighborhoods<'s, S> {
    source: &'s S,
    element: Arc<StructuringElement>,
}

impl<'s, S: RandomAccessible> Neighborhoods<'s, S> {
    /// Pairs `source` with `element`, which must have the rank of the source.
    pub fn new(source: &'s S, element: StructuringElement) -> Self {
        debug_assert_eq!(source.num_dimensions(), element.num_dimensions());
        Self {
            source,
            element: Arc::new(element),
        }
    }

    /// Returns the structuring element.
    pub fn element(&self) -> &StructuringElement {
        &self.element
    }
}

impl<S: EuclideanSpace> EuclideanSpace for Neighborhoods<'_, S> {
    fn num_dimensions(&self) -> usize {
        self.source.num_dimensions()
    }
}

impl<'s, S: RandomAccessible> ElementSpace for Neighborhoods<'s, S> {
    type Element = Neighborhood<S::Access<'s>>;
}

impl<'s, S: RandomAccessible> RandomAccessible for Neighborhoods<'s, S> {
    type Access<'a>
        = NeighborhoodsAccess<S::Access<'s>>
    where
        Self: 'a;

    fn random_access(&self) -> Self::Access<'_> {
        NeighborhoodsAccess {
            center: vec![0; self.source.num_dimensions()],
            element: Arc::clone(&self.element),
            access: self.source.random_access(),
        }
    }
}

/// Random access into [`Neighborhoods`].
#[derive(Debug, Clone)]
pub struct NeighborhoodsAccess<A> {
    center: Vec<i64>,
    element: Arc<StructuringElement>,
    access: A,
}

impl<A> EuclideanSpace for NeighborhoodsAccess<A> {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.center.len()
    }
}

impl<A> Localizable for NeighborhoodsAccess<A> {
    #[inline]
    fn coordinate(&self, d: usize) -> i64 {
        self.center[d]
    }
}

impl<A> Positionable for NeighborhoodsAccess<A> {
    #[inline]
    fn set_coordinate(&mut self, d: usize, value: i64) {
        self.center[d] = value;
    }

    #[inline]
    fn move_coordinate(&mut self, d: usize, distance: i64) {
        self.center[d] += distance;
    }
}

impl<A: Clone> Sampler for NeighborhoodsAccess<A> {
    type Item = Neighborhood<A>;

    fn get(&self) -> Neighborhood<A> {
        Neighborhood {
            center: self.center.clone(),
            element: Arc::clone(&self.element),
            access: self.access.clone(),
        }
    }
}

/// Every position of a source mapped onto one reused neighborhood.
///
/// The access owns a single neighborhood. Moving the access moves that
/// neighborhood and every handle returned by `get()` observes the move. This
/// avoids an allocation per position, and since the state is reference
/// counted without synchronization the access cannot leave its thread:
///
/// ```compile_fail
/// use imgview_algorithm::neighborhood::{SharedNeighborhoods, StructuringElement};
/// use imgview_array::ArrayImg;
/// use imgview_core::RandomAccessible;
///
/// let source = ArrayImg::from_shape_val(&[3], 0u8).unwrap();
/// let element = StructuringElement::from_box(&[1], |_| true);
/// let neighborhoods = SharedNeighborhoods::new(&source, element);
/// let access = neighborhoods.random_access();
/// std::thread::scope(|s| {
///     s.spawn(move || drop(access));
/// });
/// ```
#[derive(Debug, Clone)]
pub struct SharedNeighborhoods<'s, S> {
    source: &'s S,
    element: Arc<StructuringElement>,
}

impl<'s, S: RandomAccessible> SharedNeighborhoods<'s, S> {
    /// Pairs `source` with `element`, which must have the rank of the source.
    pub fn new(source: &'s S, element: StructuringElement) -> Self {
        debug_assert_eq!(source.num_dimensions(), element.num_dimensions());
        Self {
            source,
            element: Arc::new(element),
        }
    }

    /// Returns the structuring element.
    pub fn element(&self) -> &StructuringElement {
        &self.element
    }
}

impl<S: EuclideanSpace> EuclideanSpace for SharedNeighborhoods<'_, S> {
    fn num_dimensions(&self) -> usize {
        self.source.num_dimensions()
    }
}

impl<'s, S: RandomAccessible> ElementSpace for SharedNeighborhoods<'s, S> {
    type Element = SharedNeighborhood<S::Access<'s>>;
}

impl<'s, S: RandomAccessible> RandomAccessible for SharedNeighborhoods<'s, S> {
    type Access<'a>
        = SharedNeighborhoodsAccess<S::Access<'s>>
    where
        Self: 'a;

    fn random_access(&self) -> Self::Access<'_> {
        SharedNeighborhoodsAccess {
            state: Rc::new(RefCell::new(Neighborhood {
                center: vec![0; self.source.num_dimensions()],
                element: Arc::clone(&self.element),
                access: self.source.random_access(),
            })),
        }
    }
}

/// A handle to the neighborhood owned by a [`SharedNeighborhoodsAccess`].
#[derive(Debug, Clone)]
pub struct SharedNeighborhood<A>(Rc<RefCell<Neighborhood<A>>>);

impl<A: RandomAccess> NeighborhoodHandle for SharedNeighborhood<A> {
    type Access = A;

    fn with_neighborhood<R>(&self, f: impl FnOnce(&Neighborhood<A>) -> R) -> R {
        f(&self.0.borrow())
    }
}

/// Random access into [`SharedNeighborhoods`].
#[derive(Debug)]
pub struct SharedNeighborhoodsAccess<A> {
    state: Rc<RefCell<Neighborhood<A>>>,
}

impl<A: Clone> Clone for SharedNeighborhoodsAccess<A> {
    // copies get their own neighborhood, as any random access copy must
    fn clone(&self) -> Self {
        Self {
            state: Rc::new(RefCell::new(self.state.borrow().clone())),
        }
    }
}

impl<A> EuclideanSpace for SharedNeighborhoodsAccess<A> {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.state.borrow().center.len()
    }
}

impl<A> Localizable for SharedNeighborhoodsAccess<A> {
    #[inline]
    fn coordinate(&self, d: usize) -> i64 {
        self.state.borrow().center[d]
    }
}

impl<A> Positionable for SharedNeighborhoodsAccess<A> {
    #[inline]
    fn set_coordinate(&mut self, d: usize, value: i64) {
        self.state.borrow_mut().center[d] = value;
    }

    #[inline]
    fn move_coordinate(&mut self, d: usize, distance: i64) {
        self.state.borrow_mut().center[d] += distance;
    }
}

impl<A> Sampler for SharedNeighborhoodsAccess<A> {
    type Item = SharedNeighborhood<A>;

    fn get(&self) -> SharedNeighborhood<A> {
        SharedNeighborhood(Rc::clone(&self.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgview_array::ArrayImg;
    use imgview_core::intervals;

    fn visited<A: RandomAccess>(nb: &Neighborhood<A>) -> Vec<(Vec<i64>, A::Item)> {
        let mut cursor = nb.cursor();
        let mut out = Vec::new();
        while cursor.has_next() {
            cursor.fwd();
            out.push((cursor.position_vec(), cursor.get()));
        }
        out
    }

    #[test]
    fn test_from_box_is_raster_ordered() {
        let element = StructuringElement::from_box(&[1, 1], |p| p[0] == 0 || p[1] == 0);
        let offsets: Vec<&[i64]> = element.iter().collect();
        assert_eq!(
            offsets,
            vec![&[0, -1][..], &[-1, 0], &[0, 0], &[1, 0], &[0, 1]]
        );
        assert_eq!(element.bounds().min_vec(), vec![-1, -1]);
        assert_eq!(element.bounds().max_vec(), vec![1, 1]);
    }

    #[test]
    fn test_box_survives_dropped_members() {
        let hollow = StructuringElement::from_box(&[0, 2], |p| p != [0, 0]);
        assert_eq!(hollow.len(), 4);
        assert_eq!(hollow.bounds().dimensions_vec(), vec![1, 5]);

        let nothing = StructuringElement::from_box(&[1, 1], |_| false);
        assert!(nothing.is_empty());
        assert_eq!(nothing.bounds().dimensions_vec(), vec![3, 3]);

        // the slice through the center loses every member but keeps the first axis
        let sliced = hollow.restrict(1);
        assert!(sliced.is_empty());
        assert_eq!(sliced.bounds().dimensions_vec(), vec![1]);

        let shifted = StructuringElement::new(1, vec![2]);
        assert_eq!(shifted.bounds().min_vec(), vec![0]);
        assert_eq!(shifted.bounds().max_vec(), vec![2]);
    }

    #[test]
    fn test_restrict_keeps_center_slice() {
        let element = StructuringElement::from_box(&[1, 2], |_| true);
        let line = element.restrict(1);
        assert_eq!(line.len(), 3);
        assert_eq!(line.iter().collect::<Vec<_>>(), vec![&[-1][..], &[0], &[1]]);

        let empty = StructuringElement::new(2, vec![]);
        assert!(empty.is_empty());
        assert_eq!(empty.bounds().dimensions_vec(), vec![1, 1]);
        assert_eq!(empty.bounds().min_vec(), vec![0, 0]);
    }

    #[test]
    fn test_neighborhood_reads_around_center() -> Result<(), Box<dyn std::error::Error>> {
        let source = ArrayImg::from_shape_fn(&[4, 4], |p| p[0] + 10 * p[1])?;
        let element = StructuringElement::from_box(&[1, 0], |_| true);
        let neighborhoods = Neighborhoods::new(&source, element);

        let mut access = neighborhoods.random_access();
        access.set_position(&[2, 3]);
        let nb = access.get();
        assert_eq!(nb.min_vec(), vec![1, 3]);
        assert_eq!(nb.max_vec(), vec![3, 3]);
        assert_eq!(nb.size(), 3);
        assert_eq!(
            visited(&nb),
            vec![(vec![1, 3], 31), (vec![2, 3], 32), (vec![3, 3], 33)]
        );
        Ok(())
    }

    #[test]
    fn test_safe_neighborhoods_are_independent() -> Result<(), Box<dyn std::error::Error>> {
        let source = ArrayImg::from_shape_fn(&[5], |p| p[0] * 2)?;
        let element = StructuringElement::from_box(&[1], |_| true);
        let neighborhoods = Neighborhoods::new(&source, element);

        let mut access = neighborhoods.random_access();
        access.set_position(&[1]);
        let first = access.get();
        access.set_position(&[3]);
        let second = access.get();

        assert_eq!(first.center(), &[1]);
        assert_eq!(second.center(), &[3]);
        assert_eq!(visited(&first).iter().map(|v| v.1).collect::<Vec<_>>(), vec![0, 2, 4]);
        Ok(())
    }

    #[test]
    fn test_shared_neighborhood_follows_the_access() -> Result<(), Box<dyn std::error::Error>> {
        let source = ArrayImg::from_shape_fn(&[5], |p| p[0] * 2)?;
        let element = StructuringElement::from_box(&[1], |_| true);
        let neighborhoods = SharedNeighborhoods::new(&source, element);

        let mut access = neighborhoods.random_access();
        access.set_position(&[1]);
        let handle = access.get();
        access.set_position(&[3]);
        assert_eq!(handle.with_neighborhood(|nb| nb.center().to_vec()), vec![3]);

        let mut copy = access.copy_random_access();
        copy.set_position(&[0]);
        assert_eq!(access.position_vec(), vec![3]);
        assert_eq!(copy.position_vec(), vec![0]);
        Ok(())
    }

    #[test]
    fn test_members_outside_the_source_are_visited() -> Result<(), Box<dyn std::error::Error>> {
        let source = ArrayImg::from_shape_val(&[3, 3], 1u8)?;
        let element = StructuringElement::from_box(&[1, 1], |_| true);
        let neighborhoods = Neighborhoods::new(&source, element);
        let mut access = neighborhoods.random_access();
        access.set_position(&[0, 0]);
        let nb = access.get();

        let mut cursor = nb.cursor();
        let mut inside = 0;
        let mut total = 0;
        while cursor.has_next() {
            cursor.fwd();
            total += 1;
            if intervals::contains(&source, &cursor) {
                inside += 1;
            }
        }
        assert_eq!((inside, total), (4, 9));
        Ok(())
    }
}
