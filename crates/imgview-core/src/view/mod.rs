//! Lazy views over random-accessible sources.
//!
//! Every view borrows its source and remaps coordinates on access; no element
//! is ever copied. Views compose freely, so an offset over an interval over an
//! extension is just three nested borrows.

mod concatenate;
mod extend;
mod function;
mod interval;
mod translate;

pub use concatenate::{ConcatenateAccess, ConcatenateView};
pub use extend::{ExtendedAccess, ExtendedView, OutOfBounds};
pub use function::{FunctionAccess, FunctionView};
pub use interval::IntervalView;
pub use translate::{TranslateView, Translated};

use crate::access::RandomAccessibleInterval;
use crate::error::{check_dimensions, ViewError};
use crate::interval::{FinalInterval, Interval};
use crate::position::EuclideanSpace;

/// Shifts `source` by `delta`: the view at `c` reads the source at `c - delta`.
///
/// # Errors
///
/// Returns [`ViewError::DimensionMismatch`] if `delta` does not have one entry per axis.
pub fn translate<'s, S: EuclideanSpace>(
    source: &'s S,
    delta: &[i64],
) -> Result<TranslateView<'s, S>, ViewError> {
    check_dimensions(source.num_dimensions(), delta.len())?;
    Ok(TranslateView::new(source, delta.to_vec()))
}

/// Shifts `source` so that the view at `c` reads the source at `c + offset`.
///
/// This is [`translate`] with the opposite sign.
///
/// # Errors
///
/// Returns [`ViewError::DimensionMismatch`] if `offset` does not have one entry per axis.
pub fn offset<'s, S: EuclideanSpace>(
    source: &'s S,
    offset: &[i64],
) -> Result<TranslateView<'s, S>, ViewError> {
    let delta: Vec<i64> = offset.iter().map(|o| -o).collect();
    translate(source, &delta)
}

/// Restricts `source` to the inclusive box `[min, max]`.
///
/// # Errors
///
/// Returns [`ViewError::DimensionMismatch`] if the bounds do not match the
/// dimensionality of the source and [`ViewError::InvalidInterval`] if they
/// are inverted.
pub fn interval<'s, S: EuclideanSpace>(
    source: &'s S,
    min: &[i64],
    max: &[i64],
) -> Result<IntervalView<'s, S>, ViewError> {
    check_dimensions(source.num_dimensions(), min.len())?;
    let bounds = FinalInterval::new(min.to_vec(), max.to_vec())?;
    Ok(IntervalView::new(source, bounds))
}

/// Restricts `source` to the bounds of `bounds`.
///
/// # Errors
///
/// Returns [`ViewError::DimensionMismatch`] if the dimensionalities differ.
pub fn interval_of<'s, S, I>(source: &'s S, bounds: &I) -> Result<IntervalView<'s, S>, ViewError>
where
    S: EuclideanSpace,
    I: Interval + ?Sized,
{
    check_dimensions(source.num_dimensions(), bounds.num_dimensions())?;
    Ok(IntervalView::new(source, FinalInterval::from_interval(bounds)))
}

/// Makes a bounded source iterable over its own bounds.
pub fn flat_iterable<S: RandomAccessibleInterval>(source: &S) -> IntervalView<'_, S> {
    IntervalView::new(source, FinalInterval::from_interval(source))
}

/// Makes `source` readable at every integer coordinate.
///
/// # Errors
///
/// Returns [`ViewError::InvalidInterval`] if the source is empty along some
/// axis, since there is nothing to extend.
pub fn extend<S: RandomAccessibleInterval>(
    source: &S,
    policy: OutOfBounds<S::Element>,
) -> Result<ExtendedView<'_, S, S::Element>, ViewError> {
    if let Some(axis) = (0..source.num_dimensions()).find(|&d| source.dimension(d) == 0) {
        return Err(ViewError::InvalidInterval {
            axis,
            min: source.min(axis),
            max: source.max(axis),
        });
    }
    Ok(ExtendedView::new(
        source,
        FinalInterval::from_interval(source),
        policy,
    ))
}

/// Joins `sources` end to end along `axis`.
///
/// # Errors
///
/// Returns [`ViewError::EmptySources`] for an empty list,
/// [`ViewError::InvalidAxis`] if `axis` is out of range,
/// [`ViewError::DimensionMismatch`] if the sources differ in dimensionality and
/// [`ViewError::IncompatibleConcatenation`] if they differ in extent on any
/// other axis.
pub fn concatenate<'s, S: Interval>(
    axis: usize,
    sources: &[&'s S],
) -> Result<ConcatenateView<'s, S>, ViewError> {
    ConcatenateView::new(axis, sources)
}

/// Creates an `n`-dimensional source whose element at `p` is `f(p)`.
pub fn function<T, F: Fn(&[i64]) -> T>(n: usize, f: F) -> FunctionView<F, T> {
    FunctionView::new(n, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Cursor, IterableInterval, RandomAccessible, Sampler};
    use crate::intervals;
    use crate::position::{Localizable, Positionable};

    fn ramp2(p: &[i64]) -> i64 {
        p[0] + 10 * p[1]
    }

    #[test]
    fn translate_and_offset_are_inverse() -> Result<(), ViewError> {
        let source = function(2, ramp2);
        let bounded = interval(&source, &[0, 0], &[2, 2])?;

        let moved = translate(&bounded, &[5, -1])?;
        assert_eq!(moved.min_vec(), vec![5, -1]);
        assert_eq!(moved.max_vec(), vec![7, 1]);

        let mut access = moved.random_access();
        access.set_position(&[6, 0]);
        assert_eq!(access.get(), ramp2(&[1, 1]));
        assert_eq!(access.position_vec(), vec![6, 0]);

        let shifted = offset(&bounded, &[5, -1])?;
        let mut access = shifted.random_access();
        access.set_position(&[-4, 2]);
        assert_eq!(access.get(), ramp2(&[1, 1]));
        Ok(())
    }

    #[test]
    fn translated_wrapper_shifts_and_unwraps() -> Result<(), ViewError> {
        let source = function(2, ramp2);
        let bounded = interval(&source, &[0, 0], &[2, 2])?;

        let mut access = Translated::new(bounded.random_access(), vec![-3, 4]);
        access.set_position(&[-2, 6]);
        assert_eq!(access.get(), ramp2(&[1, 2]));

        let inner = access.into_inner();
        assert_eq!(inner.position_vec(), vec![1, 2]);
        assert_eq!(inner.get(), ramp2(&[1, 2]));
        Ok(())
    }

    #[test]
    fn mismatched_transforms_are_rejected() {
        let source = function(2, ramp2);
        assert_eq!(
            translate(&source, &[1]).err(),
            Some(ViewError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(offset(&source, &[1, 2, 3]).is_err());
        assert!(interval(&source, &[0], &[1]).is_err());
        assert!(interval(&source, &[0, 3], &[1, 1]).is_err());
    }

    #[test]
    fn interval_cursor_visits_first_axis_fastest() -> Result<(), ViewError> {
        let source = function(2, ramp2);
        let view = interval(&source, &[1, 0], &[2, 1])?;
        let mut cursor = view.cursor();
        let mut values = Vec::new();
        while cursor.has_next() {
            values.push(cursor.next_item());
        }
        assert_eq!(values, vec![1, 2, 11, 12]);
        assert_eq!(view.size(), 4);

        let moved = translate(&view, &[10, 10])?;
        let mut cursor = moved.cursor();
        cursor.fwd();
        assert_eq!(cursor.position_vec(), vec![11, 10]);
        assert_eq!(cursor.get(), 1);
        Ok(())
    }

    #[test]
    fn jump_fwd_matches_repeated_fwd() -> Result<(), ViewError> {
        let source = function(3, |p: &[i64]| p[0] + 10 * p[1] + 100 * p[2]);
        let view = interval(&source, &[0, -1, 2], &[2, 1, 3])?;

        let mut stepped = view.cursor();
        let mut jumped = view.cursor();
        for steps in [1, 4, 2, 7] {
            for _ in 0..steps {
                stepped.fwd();
            }
            jumped.jump_fwd(steps);
            assert_eq!(stepped.position_vec(), jumped.position_vec());
            assert_eq!(stepped.get(), jumped.get());
        }
        Ok(())
    }

    #[test]
    fn extension_policies_answer_out_of_bounds_reads() -> Result<(), ViewError> {
        let source = function(2, ramp2);
        let bounded = interval(&source, &[0, 0], &[2, 2])?;

        let constant = extend(&bounded, OutOfBounds::Constant(-1))?;
        let mut access = constant.random_access();
        access.set_position(&[-1, 0]);
        assert_eq!(access.get(), -1);
        access.set_position(&[1, 1]);
        assert_eq!(access.get(), 11);
        access.move_coordinate(1, 5);
        assert_eq!(access.get(), -1);
        assert_eq!(access.position_vec(), vec![1, 6]);

        let mirror = extend(&bounded, OutOfBounds::Reflect101)?;
        let mut access = mirror.random_access();
        access.set_position(&[-1, 3]);
        assert_eq!(access.get(), ramp2(&[1, 1]));

        let periodic = extend(&bounded, OutOfBounds::Wrap)?;
        let mut access = periodic.random_access();
        access.set_position(&[3, -1]);
        assert_eq!(access.get(), ramp2(&[0, 2]));

        let empty = interval(&source, &[0, 0], &[2, -1])?;
        assert!(extend(&empty, OutOfBounds::Replicate).is_err());
        Ok(())
    }

    #[test]
    fn offset_over_interval_over_extension() -> Result<(), ViewError> {
        let source = function(2, ramp2);
        let bounded = interval(&source, &[0, 0], &[2, 2])?;
        let extended = extend(&bounded, OutOfBounds::Replicate)?;
        let window = interval(&extended, &[-1, -1], &[3, 3])?;
        let shifted = offset(&window, &[-1, -1])?;

        assert_eq!(shifted.min_vec(), vec![0, 0]);
        assert_eq!(shifted.max_vec(), vec![4, 4]);

        let mut access = shifted.random_access();
        access.set_position(&[0, 0]);
        assert_eq!(access.get(), ramp2(&[0, 0]));
        access.set_position(&[4, 4]);
        assert_eq!(access.get(), ramp2(&[2, 2]));
        access.set_position(&[2, 1]);
        assert_eq!(access.get(), ramp2(&[1, 0]));

        let mut total = 0;
        let mut cursor = shifted.cursor();
        while cursor.has_next() {
            total += cursor.next_item();
        }
        // border rows and columns repeat the edge values of the 3x3 source
        let expected: i64 = [0i64, 0, 1, 2, 2]
            .iter()
            .flat_map(|&y| [0i64, 0, 1, 2, 2].map(move |x| ramp2(&[x, y])))
            .sum();
        assert_eq!(total, expected);
        Ok(())
    }

    #[test]
    fn concatenated_halves_reproduce_the_source() -> Result<(), ViewError> {
        let source = function(4, |p: &[i64]| p[0] + 3 * p[1] + 12 * p[2] + 60 * p[3]);
        let whole = interval(&source, &[0, 0, 0, 0], &[2, 3, 4, 5])?;
        let divider = 3;
        let first = interval(&source, &[0, 0, 0, 0], &[2, 3, 4, divider - 1])?;
        let second = interval(&source, &[0, 0, 0, divider], &[2, 3, 4, 5])?;

        let joined = concatenate(3, &[&first, &second])?;
        assert!(intervals::equals(&joined, &whole));

        let mut expected = whole.cursor();
        let mut actual = joined.cursor();
        while expected.has_next() {
            assert!(actual.has_next());
            expected.fwd();
            actual.fwd();
            assert_eq!(actual.position_vec(), expected.position_vec());
            assert_eq!(actual.get(), expected.get());
        }
        assert!(!actual.has_next());

        let mut access = joined.random_access();
        access.set_position(&[1, 2, 3, 2]);
        assert_eq!(access.get(), source.eval(&[1, 2, 3, 2]));
        access.fwd_axis(3);
        assert_eq!(access.get(), source.eval(&[1, 2, 3, 3]));
        access.bck_axis(3);
        access.bck_axis(3);
        assert_eq!(access.get(), source.eval(&[1, 2, 3, 1]));
        Ok(())
    }

    #[test]
    fn concatenation_aligns_parts_at_their_minima() -> Result<(), ViewError> {
        let source = function(2, ramp2);
        let left = interval(&source, &[0, 0], &[1, 1])?;
        let right = interval(&source, &[5, 7], &[5, 8])?;
        let joined = concatenate(0, &[&left, &right])?;
        assert_eq!(joined.max_vec(), vec![2, 1]);

        let mut access = joined.random_access();
        access.set_position(&[2, 1]);
        assert_eq!(access.get(), ramp2(&[5, 8]));
        Ok(())
    }

    #[test]
    fn incompatible_concatenations_are_rejected() -> Result<(), ViewError> {
        let a = FinalInterval::new(vec![0, 0], vec![2, 2])?;
        let b = FinalInterval::new(vec![0, 0], vec![2, 3])?;
        assert_eq!(
            concatenate(0, &[&a, &b]).err(),
            Some(ViewError::IncompatibleConcatenation {
                axis: 0,
                index: 1,
                mismatched_axis: 1,
                expected: 3,
                actual: 4
            })
        );
        assert!(concatenate(1, &[&a, &b]).is_ok());
        assert_eq!(
            concatenate(2, &[&a]).err(),
            Some(ViewError::InvalidAxis {
                axis: 2,
                num_dimensions: 2
            })
        );
        let none: [&FinalInterval; 0] = [];
        assert_eq!(concatenate(0, &none).err(), Some(ViewError::EmptySources));
        Ok(())
    }

    #[test]
    fn flat_iterable_walks_source_bounds() -> Result<(), ViewError> {
        let source = function(1, |p: &[i64]| p[0] * p[0]);
        let bounded = interval(&source, &[-2], &[2])?;
        let flat = flat_iterable(&bounded);
        assert!(intervals::equals(&flat, &bounded));

        let mut cursor = flat.cursor();
        let mut values = Vec::new();
        while cursor.has_next() {
            values.push(cursor.next_item());
        }
        assert_eq!(values, vec![4, 1, 0, 1, 4]);
        Ok(())
    }
}
