//! Rollup: joining the grids of two sibling subtasks.
//!
//! The result covers the union of both extents. Cells only one side has
//! are copied unchanged; cells both sides cover are joined with the
//! reduction's `merge`. Allocation is avoided where the representation
//! allows it:
//!
//! - a side with an empty extent contributes nothing and is dropped;
//! - two uniform identity grids stay uniform over the union;
//! - a uniform identity side never needs copying, since merging with the
//!   identity is a no-op;
//! - a dense side that already spans the union absorbs the other in place.

use aggregates::{Aggregates, DenseGrid, Grid};
use ar_common::{ArResult, Rect};

/// Join `left` and `right` (in that order) into one grid.
pub fn rollup<A, F>(left: Grid<A>, right: Grid<A>, identity: &A, merge: F) -> ArResult<Grid<A>>
where
    A: Clone + PartialEq,
    F: Fn(&A, &A) -> A,
{
    if left.is_empty() {
        return Ok(right);
    }
    if right.is_empty() {
        return Ok(left);
    }

    let union = left.bounds().union(&right.bounds());
    let left_occupied = occupied(&left, identity);
    let right_occupied = occupied(&right, identity);

    if left_occupied.is_empty() && right_occupied.is_empty() {
        return Ok(Grid::uniform(union, identity.clone()));
    }

    match (left, right) {
        (Grid::Dense(mut target), right) if target.bounds() == union => {
            absorb(&mut target, &right, right_occupied, true, &merge)?;
            Ok(Grid::Dense(target))
        }
        (left, Grid::Dense(mut target)) if target.bounds() == union => {
            absorb(&mut target, &left, left_occupied, false, &merge)?;
            Ok(Grid::Dense(target))
        }
        (left, right) => {
            let mut target = DenseGrid::new(union, identity.clone());
            for (x, y) in left_occupied.cells() {
                target.set(x, y, left.get(x, y).clone())?;
            }
            for (x, y) in right_occupied.cells() {
                let value = if left_occupied.contains(x, y) {
                    merge(target.get(x, y), right.get(x, y))
                } else {
                    right.get(x, y).clone()
                };
                target.set(x, y, value)?;
            }
            Ok(Grid::Dense(target))
        }
    }
}

/// Extent whose cells may differ from the identity.
fn occupied<A: PartialEq>(grid: &Grid<A>, identity: &A) -> Rect {
    if grid.is_uniform_with(identity) {
        Rect::EMPTY
    } else {
        grid.bounds()
    }
}

/// Merge `source` cells over `region` into `target`, which already spans
/// them. `target_is_left` keeps the argument order of `merge` stable.
fn absorb<A, F>(
    target: &mut DenseGrid<A>,
    source: &Grid<A>,
    region: Rect,
    target_is_left: bool,
    merge: &F,
) -> ArResult<()>
where
    A: Clone,
    F: Fn(&A, &A) -> A,
{
    for (x, y) in region.cells() {
        let cell = target.get_mut(x, y)?;
        *cell = if target_is_left {
            merge(&*cell, source.get(x, y))
        } else {
            merge(source.get(x, y), &*cell)
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(a: &u32, b: &u32) -> u32 {
        a + b
    }

    fn filled(bounds: Rect, value: u32) -> Grid<u32> {
        Grid::Dense(DenseGrid::from_fn(bounds, 0, |_, _| value))
    }

    #[test]
    fn test_disjoint_grids_copy_cells() {
        let a = filled(Rect::new(0, 0, 2, 2), 1);
        let b = filled(Rect::new(4, 4, 6, 6), 2);
        let r = rollup(a, b, &0, add).unwrap();
        assert_eq!(r.bounds(), Rect::new(0, 0, 6, 6));
        assert_eq!(*r.get(1, 1), 1);
        assert_eq!(*r.get(5, 5), 2);
        assert_eq!(*r.get(3, 3), 0);
    }

    #[test]
    fn test_overlap_merges() {
        let a = filled(Rect::new(0, 0, 3, 3), 1);
        let b = filled(Rect::new(2, 2, 5, 5), 10);
        let r = rollup(a, b, &0, add).unwrap();
        assert_eq!(*r.get(0, 0), 1);
        assert_eq!(*r.get(2, 2), 11);
        assert_eq!(*r.get(4, 4), 10);
    }

    #[test]
    fn test_identity_uniforms_stay_uniform() {
        let a = Grid::uniform(Rect::new(0, 0, 100, 100), 0u32);
        let b = Grid::uniform(Rect::new(50, 50, 300, 300), 0u32);
        let r = rollup(a, b, &0, add).unwrap();
        assert!(r.is_uniform());
        assert_eq!(r.bounds(), Rect::new(0, 0, 300, 300));
    }

    #[test]
    fn test_empty_side_dropped() {
        let a = filled(Rect::new(0, 0, 2, 2), 3);
        let b = Grid::uniform(Rect::new(7, 7, 7, 7), 0);
        let r = rollup(a.clone(), b, &0, add).unwrap();
        assert_eq!(r, a);
    }

    #[test]
    fn test_dense_covering_union_absorbs_in_place() {
        let a = filled(Rect::new(0, 0, 4, 4), 1);
        let b = filled(Rect::new(1, 1, 2, 2), 5);
        let r = rollup(b, a, &0, add).unwrap();
        assert_eq!(r.bounds(), Rect::new(0, 0, 4, 4));
        assert_eq!(*r.get(1, 1), 6);
        assert_eq!(*r.get(3, 3), 1);
    }

    #[test]
    fn test_merge_argument_order_preserved() {
        let left = filled(Rect::new(0, 0, 1, 1), 1);
        let right = filled(Rect::new(0, 0, 2, 2), 2);
        // Non-commutative merge to observe order: left * 10 + right.
        let r = rollup(left, right, &0, |a: &u32, b: &u32| a * 10 + b).unwrap();
        assert_eq!(*r.get(0, 0), 12);
    }
}
