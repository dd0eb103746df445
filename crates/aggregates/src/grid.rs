//! Dense and uniform aggregate grids.

use ar_common::{ArError, ArResult, Rect};
use num_traits::ToPrimitive;

/// Read access shared by every grid representation.
///
/// `get` never fails: cells outside `bounds()` (or never written) answer
/// the grid's default value.
pub trait Aggregates<A> {
    /// Declared extent of the grid.
    fn bounds(&self) -> Rect;

    fn get(&self, x: i32, y: i32) -> &A;

    /// Value reported for cells outside the extent.
    fn default_value(&self) -> &A;

    fn is_empty(&self) -> bool {
        self.bounds().is_empty()
    }
}

/// Grid with one stored value per cell, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseGrid<A> {
    bounds: Rect,
    default: A,
    values: Vec<A>,
}

impl<A: Clone> DenseGrid<A> {
    /// Grid over `bounds` with every cell set to `default`.
    pub fn new(bounds: Rect, default: A) -> Self {
        let values = vec![default.clone(); bounds.area()];
        Self {
            bounds,
            default,
            values,
        }
    }

    /// Grid whose cells are computed from their coordinates.
    pub fn from_fn<F>(bounds: Rect, default: A, mut f: F) -> Self
    where
        F: FnMut(i32, i32) -> A,
    {
        let values = bounds.cells().map(|(x, y)| f(x, y)).collect();
        Self {
            bounds,
            default,
            values,
        }
    }
}

impl<A> DenseGrid<A> {
    /// Wrap existing row-major storage. The length must match the extent.
    pub fn from_values(bounds: Rect, default: A, values: Vec<A>) -> ArResult<Self> {
        if values.len() != bounds.area() {
            return Err(ArError::invalid_parameter(
                "values",
                format!(
                    "expected {} cells for {}, got {}",
                    bounds.area(),
                    bounds,
                    values.len()
                ),
            ));
        }
        Ok(Self {
            bounds,
            default,
            values,
        })
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let row = (y - self.bounds.low_y) as usize;
        let col = (x - self.bounds.low_x) as usize;
        Some(row * self.bounds.width() as usize + col)
    }

    /// Write a cell. Writes outside the declared extent are rejected.
    pub fn set(&mut self, x: i32, y: i32, value: A) -> ArResult<()> {
        *self.get_mut(x, y)? = value;
        Ok(())
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> ArResult<&mut A> {
        match self.index(x, y) {
            Some(i) => Ok(&mut self.values[i]),
            None => Err(ArError::out_of_bounds(x, y, self.bounds)),
        }
    }

    /// Row-major cell storage.
    pub fn values(&self) -> &[A] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [A] {
        &mut self.values
    }

    pub fn into_values(self) -> Vec<A> {
        self.values
    }
}

impl<A> Aggregates<A> for DenseGrid<A> {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn get(&self, x: i32, y: i32) -> &A {
        match self.index(x, y) {
            Some(i) => &self.values[i],
            None => &self.default,
        }
    }

    fn default_value(&self) -> &A {
        &self.default
    }
}

/// Grid where every cell, in bounds or not, holds the same value.
///
/// Costs O(1) regardless of extent; used for regions no glyph reached.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformGrid<A> {
    bounds: Rect,
    value: A,
}

impl<A> UniformGrid<A> {
    pub fn new(bounds: Rect, value: A) -> Self {
        Self { bounds, value }
    }

    pub fn value(&self) -> &A {
        &self.value
    }
}

impl<A> Aggregates<A> for UniformGrid<A> {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn get(&self, _x: i32, _y: i32) -> &A {
        &self.value
    }

    fn default_value(&self) -> &A {
        &self.value
    }
}

/// An aggregate grid in either representation.
///
/// Callers read and write through this type and never need to know which
/// representation backs it; writing into a uniform grid materializes it.
#[derive(Debug, Clone, PartialEq)]
pub enum Grid<A> {
    Dense(DenseGrid<A>),
    Uniform(UniformGrid<A>),
}

impl<A: Clone> Grid<A> {
    pub fn dense(bounds: Rect, default: A) -> Self {
        Grid::Dense(DenseGrid::new(bounds, default))
    }

    pub fn uniform(bounds: Rect, value: A) -> Self {
        Grid::Uniform(UniformGrid::new(bounds, value))
    }

    /// Write a cell, converting a uniform grid to dense storage first.
    pub fn set(&mut self, x: i32, y: i32, value: A) -> ArResult<()> {
        match self {
            Grid::Dense(dense) => dense.set(x, y, value),
            Grid::Uniform(uniform) => {
                if !uniform.bounds.contains(x, y) {
                    return Err(ArError::out_of_bounds(x, y, uniform.bounds));
                }
                let mut dense = DenseGrid::new(uniform.bounds, uniform.value.clone());
                dense.set(x, y, value)?;
                *self = Grid::Dense(dense);
                Ok(())
            }
        }
    }

    /// Copy of the cells inside `region` as a new grid with extent `region`.
    /// Cells of `region` outside this grid take the default value.
    pub fn subset(&self, region: Rect) -> Grid<A> {
        match self {
            Grid::Uniform(uniform) => Grid::uniform(region, uniform.value.clone()),
            Grid::Dense(dense) => Grid::Dense(DenseGrid::from_fn(
                region,
                dense.default.clone(),
                |x, y| dense.get(x, y).clone(),
            )),
        }
    }

    /// Dense copy of this grid (no-op for dense grids).
    pub fn into_dense(self) -> DenseGrid<A> {
        match self {
            Grid::Dense(dense) => dense,
            Grid::Uniform(uniform) => DenseGrid::new(uniform.bounds, uniform.value),
        }
    }
}

impl<A> Grid<A> {
    pub fn is_uniform(&self) -> bool {
        matches!(self, Grid::Uniform(_))
    }

    /// True for a uniform grid holding `value`.
    pub fn is_uniform_with(&self, value: &A) -> bool
    where
        A: PartialEq,
    {
        matches!(self, Grid::Uniform(uniform) if uniform.value == *value)
    }

    /// Row-major iteration over `(x, y, value)` for every in-bounds cell.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, &A)> + '_ {
        self.bounds().cells().map(move |(x, y)| (x, y, self.get(x, y)))
    }
}

impl<A: ToPrimitive> Grid<A> {
    /// Minimum and maximum in-bounds value, skipping values with no finite
    /// numeric representation. `None` when no cell qualifies.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells()
            .filter_map(|(_, _, v)| v.to_f64())
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

impl<A> Aggregates<A> for Grid<A> {
    fn bounds(&self) -> Rect {
        match self {
            Grid::Dense(dense) => dense.bounds(),
            Grid::Uniform(uniform) => uniform.bounds(),
        }
    }

    fn get(&self, x: i32, y: i32) -> &A {
        match self {
            Grid::Dense(dense) => dense.get(x, y),
            Grid::Uniform(uniform) => uniform.get(x, y),
        }
    }

    fn default_value(&self) -> &A {
        match self {
            Grid::Dense(dense) => dense.default_value(),
            Grid::Uniform(uniform) => uniform.default_value(),
        }
    }
}

impl<A> From<DenseGrid<A>> for Grid<A> {
    fn from(dense: DenseGrid<A>) -> Self {
        Grid::Dense(dense)
    }
}

impl<A> From<UniformGrid<A>> for Grid<A> {
    fn from(uniform: UniformGrid<A>) -> Self {
        Grid::Uniform(uniform)
    }
}
