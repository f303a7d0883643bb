//! Free functions over [`Interval`]s.

use crate::error::{check_dimensions, ViewError};
use crate::interval::{FinalInterval, Interval};
use crate::position::Localizable;

/// Returns true if `position` lies inside `interval`.
///
/// Only the first `interval.num_dimensions()` coordinates are inspected.
#[inline]
pub fn contains<I, L>(interval: &I, position: &L) -> bool
where
    I: Interval + ?Sized,
    L: Localizable + ?Sized,
{
    (0..interval.num_dimensions()).all(|d| {
        let p = position.coordinate(d);
        p >= interval.min(d) && p <= interval.max(d)
    })
}

/// Returns true if the coordinates in `position` lie inside `interval`.
#[inline]
pub fn contains_position<I: Interval + ?Sized>(interval: &I, position: &[i64]) -> bool {
    (0..interval.num_dimensions()).all(|d| position[d] >= interval.min(d) && position[d] <= interval.max(d))
}

/// Returns true if any axis of `interval` has zero extent.
pub fn is_empty<I: Interval + ?Sized>(interval: &I) -> bool {
    (0..interval.num_dimensions()).any(|d| interval.max(d) < interval.min(d))
}

/// Returns true if both intervals have the same dimensionality and bounds.
pub fn equals<A, B>(a: &A, b: &B) -> bool
where
    A: Interval + ?Sized,
    B: Interval + ?Sized,
{
    a.num_dimensions() == b.num_dimensions()
        && (0..a.num_dimensions()).all(|d| a.min(d) == b.min(d) && a.max(d) == b.max(d))
}

/// Computes the intersection of two intervals.
///
/// Disjoint inputs yield an interval that is empty on at least one axis,
/// encoded as `max = min - 1`.
///
/// # Errors
///
/// Returns [`ViewError::DimensionMismatch`] if the dimensionalities differ.
pub fn intersect<A, B>(a: &A, b: &B) -> Result<FinalInterval, ViewError>
where
    A: Interval + ?Sized,
    B: Interval + ?Sized,
{
    check_dimensions(a.num_dimensions(), b.num_dimensions())?;
    let n = a.num_dimensions();
    let min: Vec<i64> = (0..n).map(|d| a.min(d).max(b.min(d))).collect();
    let max = (0..n)
        .map(|d| a.max(d).min(b.max(d)).max(min[d] - 1))
        .collect();
    FinalInterval::new(min, max)
}

/// Shifts an interval by `delta`.
///
/// # Errors
///
/// Returns [`ViewError::DimensionMismatch`] if `delta` has the wrong length.
pub fn translate<I: Interval + ?Sized>(
    interval: &I,
    delta: &[i64],
) -> Result<FinalInterval, ViewError> {
    check_dimensions(interval.num_dimensions(), delta.len())?;
    let n = interval.num_dimensions();
    FinalInterval::new(
        (0..n).map(|d| interval.min(d) + delta[d]).collect(),
        (0..n).map(|d| interval.max(d) + delta[d]).collect(),
    )
}

/// Grows (or, for negative values, shrinks) an interval by `border` on both sides of each axis.
///
/// # Errors
///
/// Returns [`ViewError::DimensionMismatch`] if `border` has the wrong length and
/// [`ViewError::InvalidInterval`] if shrinking would invert an axis.
pub fn expand<I: Interval + ?Sized>(interval: &I, border: &[i64]) -> Result<FinalInterval, ViewError> {
    check_dimensions(interval.num_dimensions(), border.len())?;
    let n = interval.num_dimensions();
    FinalInterval::new(
        (0..n).map(|d| interval.min(d) - border[d]).collect(),
        (0..n).map(|d| interval.max(d) + border[d]).collect(),
    )
}

/// Returns the axis with the largest extent; ties resolve to the lowest axis.
pub fn longest_axis<I: Interval + ?Sized>(interval: &I) -> usize {
    let mut axis = 0;
    let mut longest = 0;
    for d in 0..interval.num_dimensions() {
        let length = interval.dimension(d);
        if length > longest {
            axis = d;
            longest = length;
        }
    }
    axis
}

/// Halves an interval along its longest axis.
///
/// The two halves are adjacent, do not overlap and together cover the input.
/// The first half receives the extra position when the extent is odd.
///
/// # Errors
///
/// Returns [`ViewError::InvalidInterval`] if the longest axis has fewer than
/// two positions, since it cannot be split.
pub fn split<I: Interval + ?Sized>(interval: &I) -> Result<(FinalInterval, FinalInterval), ViewError> {
    let axis = longest_axis(interval);
    let lo = interval.min(axis);
    let hi = interval.max(axis);
    if hi <= lo {
        return Err(ViewError::InvalidInterval {
            axis,
            min: lo,
            max: hi,
        });
    }
    let mid = lo + (hi - lo) / 2;

    let mut first_max = interval.max_vec();
    first_max[axis] = mid;
    let mut second_min = interval.min_vec();
    second_min[axis] = mid + 1;

    Ok((
        FinalInterval::new(interval.min_vec(), first_max)?,
        FinalInterval::new(second_min, interval.max_vec())?,
    ))
}
