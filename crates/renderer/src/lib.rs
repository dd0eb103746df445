//! Abstract rendering: glyphs to aggregate grids to derived grids.
//!
//! The pipeline has three stages:
//! - Aggregation: reduce every glyph into the cells it touches
//!   ([`Renderer::aggregate`], driven by a [`Reduction`])
//! - Transfer: derive a new grid from a finished one
//!   ([`Renderer::transfer`], driven by a [`Transfer`])
//! - Contouring: marching squares over a thresholded grid
//!   ([`contour::contours_at`] and friends)
//!
//! [`ParallelRenderer`] runs the first two stages as fork-join work on a
//! rayon pool; [`SerialRenderer`] is the single-threaded reference.

mod aggregate;
pub mod config;
pub mod contour;
pub mod parallel;
pub mod progress;
pub mod reduction;
pub mod rollup;
pub mod serial;
pub mod transfer;

use aggregates::Grid;
use ar_common::{AffineTransform, ArResult, Glyphset};

pub use config::{RenderConfig, DEFAULT_TASK_SIZE};
pub use contour::{
    contours, contours_at, contours_count, contours_spaced, CaseClassifier, Contour, ContourCase,
    ContourMode, ContourSet,
};
pub use parallel::ParallelRenderer;
pub use progress::{ProgressRecorder, PROGRESS_DISABLED};
pub use reduction::{CategoryCount, Count, Max, Reduction, Sum};
pub use serial::SerialRenderer;
pub use transfer::{CellMap, IsoDivide, Log, Transfer};

/// Aggregation and transfer entry points shared by every renderer.
pub trait Renderer: Sync {
    /// Reduce `glyphs` into a grid over the canvas `[0, width) × [0, height)`.
    ///
    /// `view` maps data space to pixel space. The returned grid covers the
    /// cells some glyph touched; every other cell reads as the identity.
    fn aggregate<G, R>(
        &self,
        glyphs: &G,
        op: &R,
        view: &AffineTransform,
        width: usize,
        height: usize,
    ) -> ArResult<Grid<R::Output>>
    where
        G: Glyphset,
        R: Reduction<G::Value>;

    /// Derive a grid over the same extent as `input`.
    fn transfer<A, T>(&self, input: &Grid<A>, transfer: &T) -> ArResult<Grid<T::Output>>
    where
        A: Sync,
        T: Transfer<A>;

    /// Fraction of the current aggregation completed, or
    /// [`PROGRESS_DISABLED`].
    fn progress(&self) -> f64;

    /// [`aggregate`](Renderer::aggregate) given the pixel-to-data transform
    /// a display holds instead of the view itself.
    fn aggregate_inverse<G, R>(
        &self,
        glyphs: &G,
        op: &R,
        inverse_view: &AffineTransform,
        width: usize,
        height: usize,
    ) -> ArResult<Grid<R::Output>>
    where
        G: Glyphset,
        R: Reduction<G::Value>,
    {
        let view = inverse_view.inverse()?;
        self.aggregate(glyphs, op, &view, width, height)
    }
}
