//! Transfer stage: deriving one grid from another.
//!
//! A [`Transfer`] computes each output cell from the whole input grid, so
//! it may look at any neighborhood it likes. The output always covers the
//! input's extent. Parallel execution splits that extent into bands of
//! whole rows and fills each band independently; every band reads only
//! from the input grid.

use aggregates::{Aggregates, DenseGrid, Grid};
use ar_common::Rect;
use num_traits::ToPrimitive;
use rayon::prelude::*;

/// A pure, context-aware function from an input grid to output cells.
pub trait Transfer<A>: Sync {
    type Output: Clone + Send + Sync;

    /// Default value of the output grid.
    fn empty(&self) -> Self::Output;

    /// Output value for cell `(x, y)`.
    fn at(&self, x: i32, y: i32, input: &Grid<A>) -> Self::Output;
}

/// Transfer every cell on the calling thread.
pub(crate) fn transfer_sequential<A, T>(input: &Grid<A>, transfer: &T) -> Grid<T::Output>
where
    T: Transfer<A>,
{
    let bounds = input.bounds();
    if bounds.is_empty() {
        return Grid::uniform(bounds, transfer.empty());
    }
    let mut output = DenseGrid::new(bounds, transfer.empty());
    fill_rows(input, transfer, bounds, 0, output.values_mut());
    Grid::Dense(output)
}

/// Transfer in parallel bands of roughly `task_size` cells.
pub(crate) fn transfer_parallel<A, T>(
    input: &Grid<A>,
    transfer: &T,
    task_size: usize,
) -> Grid<T::Output>
where
    A: Sync,
    T: Transfer<A>,
{
    let bounds = input.bounds();
    if bounds.is_empty() {
        return Grid::uniform(bounds, transfer.empty());
    }

    let width = bounds.width() as usize;
    let rows_per_tile = (task_size / width).max(1);
    let mut output = DenseGrid::new(bounds, transfer.empty());

    output
        .values_mut()
        .par_chunks_mut(rows_per_tile * width)
        .enumerate()
        .for_each(|(tile, cells)| {
            fill_rows(input, transfer, bounds, tile * rows_per_tile, cells);
        });

    Grid::Dense(output)
}

/// Fill `cells`, which hold whole rows of `bounds` starting at `first_row`.
fn fill_rows<A, T>(input: &Grid<A>, transfer: &T, bounds: Rect, first_row: usize, cells: &mut [T::Output])
where
    T: Transfer<A>,
{
    let width = bounds.width() as usize;
    for (i, cell) in cells.iter_mut().enumerate() {
        let x = bounds.low_x + (i % width) as i32;
        let y = bounds.low_y + (first_row + i / width) as i32;
        *cell = transfer.at(x, y, input);
    }
}

/// Threshold a numeric grid: `value >= threshold` becomes `true`.
///
/// Values with no numeric representation are below every threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoDivide {
    pub threshold: f64,
}

impl IsoDivide {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl<A: ToPrimitive> Transfer<A> for IsoDivide {
    type Output = bool;

    fn empty(&self) -> bool {
        false
    }

    #[inline]
    fn at(&self, x: i32, y: i32, input: &Grid<A>) -> bool {
        input
            .get(x, y)
            .to_f64()
            .map_or(false, |v| v >= self.threshold)
    }
}

/// Per-cell mapping through a closure.
pub struct CellMap<B, F> {
    empty: B,
    f: F,
}

impl<B, F> CellMap<B, F> {
    pub fn new(empty: B, f: F) -> Self {
        Self { empty, f }
    }
}

impl<A, B, F> Transfer<A> for CellMap<B, F>
where
    B: Clone + Send + Sync,
    F: Fn(&A) -> B + Sync,
{
    type Output = B;

    fn empty(&self) -> B {
        self.empty.clone()
    }

    #[inline]
    fn at(&self, x: i32, y: i32, input: &Grid<A>) -> B {
        (self.f)(input.get(x, y))
    }
}

/// Logarithm of each cell in a fixed base.
///
/// Non-positive and non-numeric cells map to `fallback`, which is also the
/// output default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Log {
    pub base: f64,
    pub fallback: f64,
}

impl Log {
    pub fn new(base: f64, fallback: f64) -> Self {
        Self { base, fallback }
    }

    pub fn base10() -> Self {
        Self::new(10.0, 0.0)
    }
}

impl<A: ToPrimitive> Transfer<A> for Log {
    type Output = f64;

    fn empty(&self) -> f64 {
        self.fallback
    }

    fn at(&self, x: i32, y: i32, input: &Grid<A>) -> f64 {
        match input.get(x, y).to_f64() {
            Some(v) if v > 0.0 => v.ln() / self.base.ln(),
            _ => self.fallback,
        }
    }
}
