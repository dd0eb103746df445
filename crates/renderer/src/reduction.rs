//! Reduction algebra: how glyph values fold into per-cell aggregates.
//!
//! A [`Reduction`] supplies three operations:
//!
//! - `identity()`: the value of a cell no glyph has touched.
//! - `combine(x, y, existing, value)`: fold one glyph value into a cell.
//! - `merge(left, right)`: join two already-reduced values for the same
//!   cell, used where the extents of two parallel subtasks overlap.
//!
//! The parallel engine is only correct if splitting a glyph set into two
//! sub-multisets, reducing each and merging per cell gives the same
//! result as reducing everything at once. Visitation order within a task
//! is not guaranteed either, so `combine` must accumulate commutatively.

use std::marker::PhantomData;

use aggregates::CategoryHistogram;
use num_traits::ToPrimitive;

/// Per-glyph combine plus the matching pairwise merge.
pub trait Reduction<V>: Sync {
    type Output: Clone + PartialEq + Send + Sync;

    fn identity(&self) -> Self::Output;

    fn combine(&self, x: i32, y: i32, existing: &Self::Output, incoming: &V) -> Self::Output;

    fn merge(&self, left: &Self::Output, right: &Self::Output) -> Self::Output;
}

/// Number of glyphs touching each cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct Count;

impl<V> Reduction<V> for Count {
    type Output = u64;

    fn identity(&self) -> u64 {
        0
    }

    #[inline]
    fn combine(&self, _x: i32, _y: i32, existing: &u64, _incoming: &V) -> u64 {
        existing + 1
    }

    fn merge(&self, left: &u64, right: &u64) -> u64 {
        left + right
    }
}

/// Sum of numeric glyph values per cell.
///
/// Floating-point addition only re-associates exactly for values that are
/// exactly representable sums (e.g. integers below 2^53); other inputs
/// may differ in the last bits between split layouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl<V: ToPrimitive> Reduction<V> for Sum {
    type Output = f64;

    fn identity(&self) -> f64 {
        0.0
    }

    #[inline]
    fn combine(&self, _x: i32, _y: i32, existing: &f64, incoming: &V) -> f64 {
        existing + incoming.to_f64().unwrap_or(0.0)
    }

    fn merge(&self, left: &f64, right: &f64) -> f64 {
        left + right
    }
}

/// Largest numeric glyph value per cell; untouched cells hold -inf.
#[derive(Debug, Clone, Copy, Default)]
pub struct Max;

impl<V: ToPrimitive> Reduction<V> for Max {
    type Output = f64;

    fn identity(&self) -> f64 {
        f64::NEG_INFINITY
    }

    #[inline]
    fn combine(&self, _x: i32, _y: i32, existing: &f64, incoming: &V) -> f64 {
        match incoming.to_f64() {
            Some(v) if v > *existing => v,
            _ => *existing,
        }
    }

    fn merge(&self, left: &f64, right: &f64) -> f64 {
        left.max(*right)
    }
}

/// Histogram of categorical glyph values per cell.
#[derive(Debug, Clone, Copy)]
pub struct CategoryCount<C> {
    sorted: bool,
    _category: PhantomData<fn() -> C>,
}

impl<C> CategoryCount<C> {
    /// `sorted` keeps each cell's histogram in descending count order.
    pub fn new(sorted: bool) -> Self {
        Self {
            sorted,
            _category: PhantomData,
        }
    }
}

impl<C> Default for CategoryCount<C> {
    fn default() -> Self {
        Self::new(false)
    }
}

impl<C> Reduction<C> for CategoryCount<C>
where
    C: PartialEq + Clone + Send + Sync,
{
    type Output = CategoryHistogram<C>;

    fn identity(&self) -> CategoryHistogram<C> {
        CategoryHistogram::new(self.sorted)
    }

    fn combine(
        &self,
        _x: i32,
        _y: i32,
        existing: &CategoryHistogram<C>,
        incoming: &C,
    ) -> CategoryHistogram<C> {
        let mut updated = existing.clone();
        updated.add(incoming.clone(), 1);
        updated
    }

    fn merge(
        &self,
        left: &CategoryHistogram<C>,
        right: &CategoryHistogram<C>,
    ) -> CategoryHistogram<C> {
        left.merge(right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold<V, R: Reduction<V>>(op: &R, values: &[V]) -> R::Output {
        values
            .iter()
            .fold(op.identity(), |acc, v| op.combine(0, 0, &acc, v))
    }

    fn assert_split_law<V, R>(op: &R, values: &[V])
    where
        R: Reduction<V>,
        R::Output: std::fmt::Debug,
    {
        let whole = fold(op, values);
        for split in 0..=values.len() {
            let (l, r) = values.split_at(split);
            assert_eq!(op.merge(&fold(op, l), &fold(op, r)), whole, "split at {}", split);
        }
    }

    #[test]
    fn test_zero_glyphs_yield_identity() {
        assert_eq!(fold::<u8, _>(&Count, &[]), 0);
        assert_eq!(fold::<f64, _>(&Max, &[]), f64::NEG_INFINITY);
        let op = CategoryCount::<char>::new(true);
        assert!(fold::<char, _>(&op, &[]).is_empty());
    }

    #[test]
    fn test_split_then_merge_matches_whole() {
        let values = [3i32, 1, 4, 1, 5, 9, 2, 6];
        assert_split_law(&Count, &values);
        assert_split_law(&Sum, &values);
        assert_split_law(&Max, &values);
    }

    #[test]
    fn test_category_split_then_merge() {
        let op = CategoryCount::new(false);
        let values = ['a', 'b', 'a', 'c', 'b', 'a'];
        assert_split_law(&op, &values);
        assert_eq!(fold(&op, &values).value(&'a'), 3);
    }
}
