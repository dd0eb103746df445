//! Sequential reference renderer.

use std::panic::{self, AssertUnwindSafe};

use aggregates::Grid;
use ar_common::{AffineTransform, ArError, ArResult, Glyphset};

use crate::aggregate::{viewport, AggregateTask};
use crate::progress::ProgressRecorder;
use crate::reduction::Reduction;
use crate::transfer::{transfer_sequential, Transfer};
use crate::Renderer;

/// Renderer that reduces the whole glyph range in one pass on the calling
/// thread and transfers row by row.
///
/// Produces the same cells as [`ParallelRenderer`](crate::ParallelRenderer)
/// for any reduction obeying the merge law.
#[derive(Debug, Default)]
pub struct SerialRenderer {
    recorder: ProgressRecorder,
}

impl SerialRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(record_progress: bool) -> Self {
        Self {
            recorder: ProgressRecorder::new(record_progress),
        }
    }

    pub fn recorder(&self) -> &ProgressRecorder {
        &self.recorder
    }
}

impl Renderer for SerialRenderer {
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
        R: Reduction<G::Value>,
    {
        let len = glyphs.len();
        self.recorder.reset(len as u64);

        let task = AggregateTask {
            glyphs,
            op,
            view,
            viewport: viewport(width, height)?,
            task_size: len,
            recorder: &self.recorder,
        };
        panic::catch_unwind(AssertUnwindSafe(|| task.local(0, len))).map_err(ArError::from_panic)?
    }

    fn transfer<A, T>(&self, input: &Grid<A>, transfer: &T) -> ArResult<Grid<T::Output>>
    where
        A: Sync,
        T: Transfer<A>,
    {
        panic::catch_unwind(AssertUnwindSafe(|| transfer_sequential(input, transfer)))
            .map_err(ArError::from_panic)
    }

    fn progress(&self) -> f64 {
        self.recorder.percent()
    }
}
