//! Fixed grids shared by contour and transfer tests.

use aggregates::{DenseGrid, Grid};
use ar_common::Rect;

/// Grid over `[0, width) × [0, height)` built from rows listed top to
/// bottom.
///
/// # Panics
///
/// If the rows are ragged.
pub fn grid_from_rows<T: Clone + Default>(rows: &[&[T]]) -> Grid<T> {
    let height = rows.len() as i32;
    let width = rows.first().map_or(0, |r| r.len()) as i32;
    assert!(
        rows.iter().all(|r| r.len() as i32 == width),
        "rows must have equal length"
    );
    Grid::Dense(DenseGrid::from_fn(
        Rect::with_size(width, height),
        T::default(),
        |x, y| rows[y as usize][x as usize].clone(),
    ))
}

/// 10×10 grid of zeros with a 7×7 block of 5s covering cells 1..=7.
pub fn block_grid() -> Grid<i32> {
    Grid::Dense(DenseGrid::from_fn(Rect::with_size(10, 10), 0, |x, y| {
        if (1..=7).contains(&x) && (1..=7).contains(&y) {
            5
        } else {
            0
        }
    }))
}

/// 4×4 grid of zeros with 5s at (1, 1) and (2, 2), so vertex (2, 2) is a
/// saddle.
pub fn saddle_grid() -> Grid<i32> {
    grid_from_rows(&[
        &[0, 0, 0, 0],
        &[0, 5, 0, 0],
        &[0, 0, 5, 0],
        &[0, 0, 0, 0],
    ])
}

/// Two separate high blocks, for multi-component contour tests.
pub fn twin_blocks_grid() -> Grid<i32> {
    Grid::Dense(DenseGrid::from_fn(Rect::with_size(12, 6), 0, |x, y| {
        let in_rows = (1..=4).contains(&y);
        if in_rows && ((1..=3).contains(&x) || (7..=10).contains(&x)) {
            8
        } else {
            0
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aggregates::Aggregates;

    #[test]
    fn test_block_grid_layout() {
        let grid = block_grid();
        assert_eq!(*grid.get(0, 0), 0);
        assert_eq!(*grid.get(1, 1), 5);
        assert_eq!(*grid.get(7, 7), 5);
        assert_eq!(*grid.get(8, 8), 0);
    }

    #[test]
    fn test_grid_from_rows_orientation() {
        let grid = saddle_grid();
        assert_eq!(grid.bounds(), Rect::with_size(4, 4));
        assert_eq!(*grid.get(1, 1), 5);
        assert_eq!(*grid.get(2, 2), 5);
        assert_eq!(*grid.get(2, 1), 0);
    }
}
