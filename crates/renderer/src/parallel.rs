//! Fork-join renderer on a dedicated rayon pool.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use aggregates::{Aggregates, Grid};
use ar_common::{AffineTransform, ArError, ArResult, Glyphset};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::aggregate::{viewport, AggregateTask};
use crate::config::RenderConfig;
use crate::progress::ProgressRecorder;
use crate::reduction::Reduction;
use crate::transfer::{transfer_parallel, Transfer};
use crate::Renderer;

/// Renderer that splits glyph ranges and transfer tiles across a fixed
/// worker pool.
///
/// Each renderer owns its pool; dropping the renderer tears the pool down.
pub struct ParallelRenderer {
    pool: ThreadPool,
    task_size: usize,
    recorder: ProgressRecorder,
}

impl ParallelRenderer {
    /// Renderer with the default configuration.
    pub fn new() -> ArResult<Self> {
        Self::with_config(&RenderConfig::default())
    }

    pub fn with_config(config: &RenderConfig) -> ArResult<Self> {
        config.validate()?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("ar-worker-{}", i))
            .build()
            .map_err(|e| ArError::ConfigError(format!("failed to build thread pool: {}", e)))?;

        debug!(
            threads = pool.current_num_threads(),
            task_size = config.task_size,
            record_progress = config.record_progress,
            "Created parallel renderer"
        );

        Ok(Self {
            pool,
            task_size: config.task_size,
            recorder: ProgressRecorder::new(config.record_progress),
        })
    }

    pub fn task_size(&self) -> usize {
        self.task_size
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn recorder(&self) -> &ProgressRecorder {
        &self.recorder
    }

    /// Run `f` on the pool, turning a panic anywhere in it into
    /// [`ArError::TaskFailed`].
    fn run<T, F>(&self, f: F) -> ArResult<T>
    where
        T: Send,
        F: FnOnce() -> ArResult<T> + Send,
    {
        self.pool
            .install(|| panic::catch_unwind(AssertUnwindSafe(f)))
            .map_err(ArError::from_panic)?
    }
}

impl Renderer for ParallelRenderer {
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
        let start = Instant::now();
        let len = glyphs.len();
        self.recorder.reset(len as u64);

        let task = AggregateTask {
            glyphs,
            op,
            view,
            viewport: viewport(width, height)?,
            task_size: self.task_size,
            recorder: &self.recorder,
        };
        let grid = self.run(|| task.compute(0, len))?;

        debug!(
            glyphs = len,
            task_size = self.task_size,
            bounds = %grid.bounds(),
            uniform = grid.is_uniform(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Aggregated glyphs"
        );

        Ok(grid)
    }

    fn transfer<A, T>(&self, input: &Grid<A>, transfer: &T) -> ArResult<Grid<T::Output>>
    where
        A: Sync,
        T: Transfer<A>,
    {
        let start = Instant::now();
        let output = self.run(|| Ok(transfer_parallel(input, transfer, self.task_size)))?;

        debug!(
            bounds = %output.bounds(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Transferred grid"
        );

        Ok(output)
    }

    fn progress(&self) -> f64 {
        self.recorder.percent()
    }
}
