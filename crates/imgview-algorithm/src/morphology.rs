use imgview_array::{ArrayAllocator, ArrayImg, ArraySubCursorMut, CpuAllocator};
use imgview_core::view::Translated;
use imgview_core::{
    intervals, BoundedElement, Cursor, Element, FinalInterval, Interval, IterableInterval,
    RandomAccess, RandomAccessible, RandomAccessibleInterval, Sampler, SamplerMut,
};

use crate::error::MorphologyError;
use crate::neighborhood::{Neighborhood, NeighborhoodHandle};
use crate::parallel::{divide_into_chunks, run_chunked, Chunk, ExecutionStrategy};
use crate::shape::Shape;

/// The reduction applied over each neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    /// Keep the largest member value.
    Dilate,
    /// Keep the smallest member value.
    Erode,
}

/// The extent of the output relative to the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extent {
    /// The output has the dimensions of the source and shares its positions.
    #[default]
    Same,
    /// Dilation grows the output by the neighborhood size minus one on every
    /// axis; erosion shrinks it the same way, down to one pixel.
    Full,
}

/// Parameters of a flat morphological operation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MorphologyParams<T> {
    /// Dilation or erosion.
    pub operator: Operator,
    /// Same-size or full output.
    pub extent: Extent,
    /// The value each reduction starts from, and the result where no member
    /// of the neighborhood lies in the source.
    pub sentinel: T,
    /// Number of workers; 0 is treated as 1.
    pub num_threads: usize,
}

impl<T> MorphologyParams<T> {
    /// Creates a set of parameters.
    pub fn new(operator: Operator, extent: Extent, sentinel: T, num_threads: usize) -> Self {
        Self {
            operator,
            extent,
            sentinel,
            num_threads,
        }
    }
}

/// Computes the output dimensions of a full operation.
///
/// Axes missing from the shorter of the two inputs count as size 1.
///
/// # Example
///
/// ```
/// use imgview_algorithm::morphology::{full_dimensions, Operator};
///
/// assert_eq!(full_dimensions(Operator::Dilate, &[10, 10], &[3, 5]), vec![12, 14]);
/// assert_eq!(full_dimensions(Operator::Erode, &[10, 2], &[3, 5]), vec![8, 1]);
/// ```
pub fn full_dimensions(operator: Operator, source: &[usize], neighborhood: &[usize]) -> Vec<usize> {
    let n = source.len().max(neighborhood.len());
    (0..n)
        .map(|d| {
            let s = source.get(d).copied().unwrap_or(1) as i64;
            let k = neighborhood.get(d).copied().unwrap_or(1) as i64;
            let size = match operator {
                Operator::Dilate => (s + k - 1).max(0),
                Operator::Erode => (s - (k - 1)).max(1),
            };
            size as usize
        })
        .collect()
}

/// Applies a flat morphological operation and returns a freshly allocated result.
///
/// Every output position is reduced over the members of `shape` centered
/// there. Members that fall outside the source are skipped, so no border
/// handling is needed. For [`Extent::Full`] the output positions are shifted
/// so the array starts at the first position whose neighborhood box touches
/// (for dilation) or fits into (for erosion) the source. That is
/// `source.min - nb.max` for dilation and `source.min - nb.min` for erosion.
///
/// The output's flat range is split into `num_threads` chunks. With more than
/// one worker each worker owns an independent neighborhood access and writes
/// to its own disjoint part of the output.
///
/// # Arguments
///
/// * `source` - The bounded source to read.
/// * `shape` - The structuring element.
/// * `params` - Operator, extent, sentinel and worker count.
/// * `allocator` - Creates the output array.
///
/// # Errors
///
/// Returns an error if the shape cannot serve the source's number of axes,
/// the output cannot be allocated, the worker pool cannot be built, or a
/// worker panics while reading the source.
pub fn apply<S, K, A>(
    source: &S,
    shape: &K,
    params: &MorphologyParams<S::Element>,
    allocator: &A,
) -> Result<ArrayImg<S::Element>, MorphologyError>
where
    S: RandomAccessibleInterval + Sync,
    S::Element: Element,
    K: Shape,
    A: ArrayAllocator,
{
    let num_dimensions = source.num_dimensions();
    let sample = shape.sample_neighborhood(num_dimensions)?;
    let source_bounds = FinalInterval::from_interval(source);

    let (dimensions, delta) = match params.extent {
        Extent::Same => (source.dimensions_vec(), source.min_vec()),
        Extent::Full => {
            let dimensions = full_dimensions(
                params.operator,
                &source.dimensions_vec(),
                &sample.dimensions_vec(),
            );
            let delta = (0..num_dimensions)
                .map(|d| {
                    let shift = match params.operator {
                        Operator::Dilate => -sample.max(d),
                        Operator::Erode => -sample.min(d).min(dimensions[d] as i64 - 1),
                    };
                    source.min(d) + shift
                })
                .collect::<Vec<_>>();
            (dimensions, delta)
        }
    };

    let num_threads = params.num_threads.max(1);
    let strategy = ExecutionStrategy::from_num_threads(num_threads);
    log::debug!(
        "{:?} ({:?}) of {:?} with a {:?} neighborhood into {:?} using {} workers",
        params.operator,
        params.extent,
        source.dimensions_vec(),
        sample.dimensions_vec(),
        dimensions,
        num_threads
    );

    let mut output = allocator.create(&dimensions, &params.sentinel)?;
    let chunks = divide_into_chunks(output.len(), num_threads);
    let ranges = chunks.iter().map(Chunk::range).collect::<Vec<_>>();
    let cursors = output
        .split_cursors_mut(&ranges)?
        .into_iter()
        .map(|cursor| Translated::new(cursor, delta.clone()))
        .collect::<Vec<_>>();

    let operator = params.operator;
    let sentinel = &params.sentinel;
    let bounds = &source_bounds;
    match strategy {
        ExecutionStrategy::Serial => {
            let neighborhoods = shape.neighborhoods_random_accessible(source)?;
            run_chunked(strategy, &chunks, cursors, |_, mut target| {
                reduce_chunk(neighborhoods.random_access(), &mut target, bounds, operator, sentinel);
                Ok::<(), MorphologyError>(())
            })?;
        }
        ExecutionStrategy::Fixed(_) => {
            let neighborhoods = shape.neighborhoods_random_accessible_safe(source)?;
            run_chunked(strategy, &chunks, cursors, |_, mut target| {
                reduce_chunk(neighborhoods.random_access(), &mut target, bounds, operator, sentinel);
                Ok::<(), MorphologyError>(())
            })?;
        }
    }

    Ok(output)
}

type ChunkCursor<'a, T> = Translated<ArraySubCursorMut<'a, T>>;

fn reduce_chunk<R, T>(
    mut neighborhoods: R,
    target: &mut ChunkCursor<'_, T>,
    bounds: &FinalInterval,
    operator: Operator,
    sentinel: &T,
) where
    R: RandomAccess,
    R::Item: NeighborhoodHandle,
    <R::Item as NeighborhoodHandle>::Access: RandomAccess<Item = T>,
    T: Element,
{
    while target.has_next() {
        target.fwd();
        neighborhoods.set_position_from(&*target);
        let value = neighborhoods
            .get()
            .with_neighborhood(|nb| reduce(nb, bounds, operator, sentinel));
        target.set(value);
    }
}

fn reduce<A>(nb: &Neighborhood<A>, bounds: &FinalInterval, operator: Operator, sentinel: &A::Item) -> A::Item
where
    A: RandomAccess,
    A::Item: Element,
{
    let mut best = sentinel.clone();
    let mut cursor = nb.cursor();
    while cursor.has_next() {
        cursor.fwd();
        if !intervals::contains(bounds, &cursor) {
            continue;
        }
        let value = cursor.get();
        let better = match operator {
            Operator::Dilate => value > best,
            Operator::Erode => value < best,
        };
        if better {
            best = value;
        }
    }
    best
}

/// Dilates `source` into a new array of the same dimensions.
///
/// Each output pixel is the maximum over the members of `shape` that lie in
/// the source, or the lowest value of the element type if there is none.
///
/// # Example
///
/// ```rust
/// use imgview_algorithm::morphology::dilate;
/// use imgview_algorithm::shape::RectangleShape;
/// use imgview_array::ArrayImg;
///
/// let source = ArrayImg::from_shape_vec(&[3, 3], vec![1u8, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
/// let dilated = dilate(&source, &RectangleShape::new(1, false), 2).unwrap();
/// assert_eq!(dilated.get(&[0, 0]), Some(&5));
/// assert_eq!(dilated.get(&[1, 1]), Some(&9));
/// ```
pub fn dilate<S, K>(source: &S, shape: &K, num_threads: usize) -> Result<ArrayImg<S::Element>, MorphologyError>
where
    S: RandomAccessibleInterval + Sync,
    S::Element: BoundedElement,
    K: Shape,
{
    dilate_with_min(source, shape, <S::Element as BoundedElement>::lowest(), num_threads)
}

/// Dilates `source` into a new array of the same dimensions, seeding every
/// reduction with `min_value`.
pub fn dilate_with_min<S, K>(
    source: &S,
    shape: &K,
    min_value: S::Element,
    num_threads: usize,
) -> Result<ArrayImg<S::Element>, MorphologyError>
where
    S: RandomAccessibleInterval + Sync,
    S::Element: Element,
    K: Shape,
{
    let params = MorphologyParams::new(Operator::Dilate, Extent::Same, min_value, num_threads);
    apply(source, shape, &params, &CpuAllocator)
}

/// Dilates `source` into a new array covering every position whose neighborhood touches it.
///
/// The result is `shape` size minus one larger than the source on every axis.
/// Its first element corresponds to source position `source.min - nb.max`.
pub fn dilate_full<S, K>(source: &S, shape: &K, num_threads: usize) -> Result<ArrayImg<S::Element>, MorphologyError>
where
    S: RandomAccessibleInterval + Sync,
    S::Element: BoundedElement,
    K: Shape,
{
    dilate_full_with_min(source, shape, <S::Element as BoundedElement>::lowest(), num_threads)
}

/// Full dilation seeding every reduction with `min_value`.
pub fn dilate_full_with_min<S, K>(
    source: &S,
    shape: &K,
    min_value: S::Element,
    num_threads: usize,
) -> Result<ArrayImg<S::Element>, MorphologyError>
where
    S: RandomAccessibleInterval + Sync,
    S::Element: Element,
    K: Shape,
{
    let params = MorphologyParams::new(Operator::Dilate, Extent::Full, min_value, num_threads);
    apply(source, shape, &params, &CpuAllocator)
}

/// Erodes `source` into a new array of the same dimensions.
///
/// Each output pixel is the minimum over the members of `shape` that lie in
/// the source, or the highest value of the element type if there is none.
pub fn erode<S, K>(source: &S, shape: &K, num_threads: usize) -> Result<ArrayImg<S::Element>, MorphologyError>
where
    S: RandomAccessibleInterval + Sync,
    S::Element: BoundedElement,
    K: Shape,
{
    erode_with_max(source, shape, <S::Element as BoundedElement>::highest(), num_threads)
}

/// Erodes `source` into a new array of the same dimensions, seeding every
/// reduction with `max_value`.
pub fn erode_with_max<S, K>(
    source: &S,
    shape: &K,
    max_value: S::Element,
    num_threads: usize,
) -> Result<ArrayImg<S::Element>, MorphologyError>
where
    S: RandomAccessibleInterval + Sync,
    S::Element: Element,
    K: Shape,
{
    let params = MorphologyParams::new(Operator::Erode, Extent::Same, max_value, num_threads);
    apply(source, shape, &params, &CpuAllocator)
}

/// Erodes `source` into a new array covering the positions whose neighborhood fits into it.
///
/// The result is `shape` size minus one smaller than the source on every
/// axis, but never less than one pixel.
pub fn erode_full<S, K>(source: &S, shape: &K, num_threads: usize) -> Result<ArrayImg<S::Element>, MorphologyError>
where
    S: RandomAccessibleInterval + Sync,
    S::Element: BoundedElement,
    K: Shape,
{
    erode_full_with_max(source, shape, <S::Element as BoundedElement>::highest(), num_threads)
}

/// Full erosion seeding every reduction with `max_value`.
pub fn erode_full_with_max<S, K>(
    source: &S,
    shape: &K,
    max_value: S::Element,
    num_threads: usize,
) -> Result<ArrayImg<S::Element>, MorphologyError>
where
    S: RandomAccessibleInterval + Sync,
    S::Element: Element,
    K: Shape,
{
    let params = MorphologyParams::new(Operator::Erode, Extent::Full, max_value, num_threads);
    apply(source, shape, &params, &CpuAllocator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{DiamondShape, LineShape, RectangleShape};
    use imgview_core::view;

    fn grid() -> Result<ArrayImg<u8>, MorphologyError> {
        Ok(ArrayImg::from_shape_vec(
            &[3, 3],
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9],
        )?)
    }

    #[test]
    fn test_dilate_square() -> Result<(), MorphologyError> {
        let source = grid()?;
        let dilated = dilate(&source, &RectangleShape::new(1, false), 1)?;
        assert_eq!(dilated.dimensions(), &[3, 3]);
        assert_eq!(dilated.as_slice(), &[5, 6, 6, 8, 9, 9, 8, 9, 9]);
        Ok(())
    }

    #[test]
    fn test_erode_square() -> Result<(), MorphologyError> {
        let source = grid()?;
        let eroded = erode(&source, &RectangleShape::new(1, false), 1)?;
        assert_eq!(eroded.as_slice(), &[1, 1, 2, 1, 1, 2, 4, 4, 5]);
        Ok(())
    }

    #[test]
    fn test_dilate_full_grows_and_shifts() -> Result<(), MorphologyError> {
        let source = ArrayImg::from_shape_vec(&[3], vec![1u8, 7, 2])?;
        let dilated = dilate_full(&source, &RectangleShape::new(1, false), 1)?;
        // positions -1..=3
        assert_eq!(dilated.as_slice(), &[1, 7, 7, 7, 2]);
        Ok(())
    }

    #[test]
    fn test_erode_full_shrinks() -> Result<(), MorphologyError> {
        let source = ArrayImg::from_shape_vec(&[5], vec![4u8, 2, 6, 8, 5])?;
        let eroded = erode_full(&source, &RectangleShape::new(1, false), 1)?;
        // positions 1..=3
        assert_eq!(eroded.as_slice(), &[2, 2, 5]);

        let tiny = ArrayImg::from_shape_vec(&[2], vec![3u8, 1])?;
        let eroded = erode_full(&tiny, &RectangleShape::new(2, false), 1)?;
        assert_eq!(eroded.dimensions(), &[1]);
        Ok(())
    }

    #[test]
    fn test_translated_source_keeps_its_frame() -> Result<(), MorphologyError> {
        let array = ArrayImg::from_shape_vec(&[3], vec![1u8, 7, 2])?;
        let moved = view::translate(&array, &[10])?;
        let dilated = dilate_full(&moved, &RectangleShape::new(1, false), 2)?;
        assert_eq!(dilated.as_slice(), &[1, 7, 7, 7, 2]);

        let window = view::interval(&array, &[1], &[2])?;
        let eroded = erode(&window, &RectangleShape::new(1, false), 1)?;
        assert_eq!(eroded.as_slice(), &[2, 2]);
        Ok(())
    }

    #[test]
    fn test_empty_neighborhood_leaves_sentinel() -> Result<(), MorphologyError> {
        let source = grid()?;
        let hollow_line = LineShape::new(0, 0, true);
        let params = MorphologyParams::new(Operator::Dilate, Extent::Same, 42u8, 3);
        let out = apply(&source, &hollow_line, &params, &CpuAllocator)?;
        assert!(out.as_slice().iter().all(|&v| v == 42));
        Ok(())
    }

    #[test]
    fn test_zero_threads_runs_serially() -> Result<(), MorphologyError> {
        let source = grid()?;
        let serial = dilate(&source, &DiamondShape::new(1), 1)?;
        let zero = dilate(&source, &DiamondShape::new(1), 0)?;
        assert_eq!(serial.as_slice(), zero.as_slice());
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_params_from_json() -> Result<(), Box<dyn std::error::Error>> {
        let json = r#"{"operator":"Erode","extent":"Full","sentinel":255,"num_threads":4}"#;
        let params: MorphologyParams<u8> = serde_json::from_str(json)?;
        assert_eq!(params, MorphologyParams::new(Operator::Erode, Extent::Full, 255, 4));
        Ok(())
    }

    #[test]
    fn test_full_dimensions_missing_axes() {
        assert_eq!(full_dimensions(Operator::Dilate, &[4], &[3, 3]), vec![6, 3]);
        assert_eq!(full_dimensions(Operator::Erode, &[4, 4, 2], &[3]), vec![2, 4, 2]);
    }
}
