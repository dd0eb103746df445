//! Glyph-driven reduction over index ranges.
//!
//! A range at or below the task size is reduced locally into a grid
//! covering just the cells its glyphs touch. Larger ranges split at the
//! midpoint, reduce both halves with `rayon::join`, and roll the two grids
//! up. The recursion forms a balanced binary tree over the index range.

use aggregates::{DenseGrid, Grid};
use ar_common::{AffineTransform, ArError, ArResult, Glyph, Glyphset, Rect, Shape};
use tracing::trace;

use crate::progress::ProgressRecorder;
use crate::reduction::Reduction;
use crate::rollup::rollup;

/// Canvas rectangle `[0, width) × [0, height)`.
pub(crate) fn viewport(width: usize, height: usize) -> ArResult<Rect> {
    let w = i32::try_from(width)
        .map_err(|_| ArError::invalid_parameter("width", format!("{} exceeds i32", width)))?;
    let h = i32::try_from(height)
        .map_err(|_| ArError::invalid_parameter("height", format!("{} exceeds i32", height)))?;
    Ok(Rect::with_size(w, h))
}

/// One aggregation run: everything a task needs besides its index range.
pub(crate) struct AggregateTask<'a, G, R> {
    pub glyphs: &'a G,
    pub op: &'a R,
    pub view: &'a AffineTransform,
    pub viewport: Rect,
    pub task_size: usize,
    pub recorder: &'a ProgressRecorder,
}

impl<'a, G, R> AggregateTask<'a, G, R>
where
    G: Glyphset,
    R: Reduction<G::Value>,
{
    /// Reduce `low..high`, splitting while the range exceeds the task size.
    pub fn compute(&self, low: usize, high: usize) -> ArResult<Grid<R::Output>> {
        if high - low > self.task_size {
            self.split(low, high)
        } else {
            self.local(low, high)
        }
    }

    fn split(&self, low: usize, high: usize) -> ArResult<Grid<R::Output>> {
        let mid = low + (high - low) / 2;
        let (top, bottom) = rayon::join(|| self.compute(low, mid), || self.compute(mid, high));
        rollup(top?, bottom?, &self.op.identity(), |a, b| self.op.merge(a, b))
    }

    /// Cells touched by one glyph, clipped to the viewport.
    #[inline]
    fn cells_of(&self, glyph: &Glyph<G::Shape, G::Value>) -> Rect {
        Rect::enclosing(&self.view.apply_bounds(&glyph.shape.bounds())).intersection(&self.viewport)
    }

    /// Reduce `low..high` without splitting.
    pub fn local(&self, low: usize, high: usize) -> ArResult<Grid<R::Output>> {
        let identity = self.op.identity();

        // Extent is the union of per-glyph cell rectangles, so it does not
        // depend on how the range was split.
        let extent = self
            .glyphs
            .segment(low..high)
            .fold(Rect::EMPTY, |acc, g| acc.union(&self.cells_of(g)));

        if extent.is_empty() {
            self.recorder.update((high - low) as u64);
            return Ok(Grid::uniform(extent, identity));
        }

        let mut aggregates = DenseGrid::new(extent, identity);
        for glyph in self.glyphs.segment(low..high) {
            for (x, y) in self.cells_of(glyph).cells() {
                let cell = aggregates.get_mut(x, y)?;
                *cell = self.op.combine(x, y, &*cell, &glyph.value);
            }
        }

        self.recorder.update((high - low) as u64);
        trace!(low, high, extent = %extent, "Reduced leaf range");
        Ok(Grid::Dense(aggregates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduction::Count;
    use aggregates::Aggregates;
    use ar_common::{BoundingBox, GlyphList, Point};

    #[test]
    fn test_local_skips_offscreen_glyphs() {
        let glyphs: GlyphList<Point, ()> = vec![
            Glyph::new(Point::new(-5.0, -5.0), ()),
            Glyph::new(Point::new(50.0, 50.0), ()),
        ]
        .into_iter()
        .collect();
        let recorder = ProgressRecorder::counter();
        recorder.reset(2);
        let task = AggregateTask {
            glyphs: &glyphs,
            op: &Count,
            view: &AffineTransform::identity(),
            viewport: Rect::with_size(10, 10),
            task_size: 10,
            recorder: &recorder,
        };
        let grid = task.local(0, 2).unwrap();
        assert!(grid.is_empty());
        assert!(grid.is_uniform());
        assert_eq!(recorder.count(), Some(2));
    }

    #[test]
    fn test_local_box_covers_cells() {
        let glyphs: GlyphList<BoundingBox, ()> =
            vec![Glyph::new(BoundingBox::new(1.0, 1.0, 3.0, 2.0), ())]
                .into_iter()
                .collect();
        let recorder = ProgressRecorder::disabled();
        let task = AggregateTask {
            glyphs: &glyphs,
            op: &Count,
            view: &AffineTransform::identity(),
            viewport: Rect::with_size(10, 10),
            task_size: 10,
            recorder: &recorder,
        };
        let grid = task.local(0, 1).unwrap();
        assert_eq!(grid.bounds(), Rect::new(1, 1, 3, 2));
        assert_eq!(*grid.get(1, 1), 1);
        assert_eq!(*grid.get(2, 1), 1);
        assert_eq!(*grid.get(3, 1), 0);
    }
}
