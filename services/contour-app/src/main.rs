//! Contour app.
//!
//! Aggregates a point set into a density grid, log-scales the counts and
//! traces iso-contours, then prints the result as JSON.

mod data;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use aggregates::Aggregates;
use anyhow::{Context, Result};
use ar_common::{AffineTransform, BoundingBox, Glyphset, Rect};
use clap::{Parser, ValueEnum};
use renderer::{
    contours, ContourMode, ContourSet, Count, Log, ParallelRenderer, RenderConfig, Renderer,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// One contour at --threshold
    Single,
    /// Contours every --step starting at --low
    Spaced,
    /// --levels evenly spaced contours across the value range
    Count,
}

#[derive(Parser, Debug)]
#[command(name = "contour-app")]
#[command(about = "Trace density contours of a point set")]
struct Args {
    /// Points file (`x,y` per line); synthetic clusters when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Synthetic point count
    #[arg(long, default_value = "1000000")]
    points: usize,

    /// Synthetic cluster count
    #[arg(long, default_value = "8")]
    clusters: usize,

    /// Synthetic data seed
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Canvas width in cells
    #[arg(long, default_value = "800")]
    width: usize,

    /// Canvas height in cells
    #[arg(long, default_value = "800")]
    height: usize,

    /// How contour levels are chosen
    #[arg(long, value_enum, default_value = "count")]
    mode: Mode,

    /// Number of levels for `count` mode, or a cap for `spaced` mode
    #[arg(long, default_value = "3")]
    levels: usize,

    /// Level for `single` mode
    #[arg(long, default_value = "2.0")]
    threshold: f64,

    /// First level for `spaced` mode
    #[arg(long, default_value = "0.0")]
    low: f64,

    /// Level spacing for `spaced` mode
    #[arg(long, default_value = "0.5")]
    step: f64,

    /// Leaf task size (overrides AR_TASK_SIZE)
    #[arg(long)]
    task_size: Option<usize>,

    /// Worker threads (overrides AR_THREADS)
    #[arg(long)]
    threads: Option<usize>,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn contour_mode(&self) -> ContourMode {
        match self.mode {
            Mode::Single => ContourMode::Single {
                threshold: self.threshold,
            },
            Mode::Spaced => ContourMode::Spaced {
                low: self.low,
                step: self.step,
                count: (self.levels > 0).then_some(self.levels),
            },
            Mode::Count => ContourMode::Count { n: self.levels },
        }
    }

    fn render_config(&self) -> RenderConfig {
        let mut config = RenderConfig::from_env().with_progress(true);
        if let Some(task_size) = self.task_size {
            config = config.with_task_size(task_size);
        }
        if let Some(threads) = self.threads {
            config = config.with_threads(threads);
        }
        config
    }
}

#[derive(Debug, Serialize)]
struct Report {
    glyphs: usize,
    data_bounds: BoundingBox,
    width: usize,
    height: usize,
    occupied: Rect,
    value_range: Option<(f64, f64)>,
    mode: ContourMode,
    elapsed_ms: u64,
    contours: Vec<ContourSet>,
}

fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = fmt().with_env_filter(filter).with_writer(io::stderr).with_target(true);
    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    let glyphs = match &args.input {
        Some(path) => data::load_points(path)?,
        None => data::synthetic_points(args.points, args.clusters, 1000.0, args.seed),
    };

    let config = args.render_config();
    let renderer = ParallelRenderer::with_config(&config).context("failed to create renderer")?;
    info!(
        threads = renderer.threads(),
        task_size = renderer.task_size(),
        "Starting contour run"
    );

    let start = Instant::now();
    let data_bounds = glyphs.bounds();
    let view = AffineTransform::zoom_fit(&data_bounds, args.width, args.height)
        .context("cannot fit data to the canvas")?;

    let counts = renderer.aggregate(&glyphs, &Count, &view, args.width, args.height)?;
    info!(
        occupied = %counts.bounds(),
        progress = renderer.progress(),
        "Aggregated points"
    );

    let magnitudes = renderer.transfer(&counts, &Log::base10())?;
    let value_range = magnitudes.value_range();

    let mode = args.contour_mode();
    let sets = contours(&renderer, &magnitudes, &mode)?;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    info!(
        levels = sets.len(),
        contours = sets.iter().map(|s| s.contours.len()).sum::<usize>(),
        elapsed_ms,
        "Traced contours"
    );

    let report = Report {
        glyphs: glyphs.len(),
        data_bounds,
        width: args.width,
        height: args.height,
        occupied: counts.bounds(),
        value_range,
        mode,
        elapsed_ms,
        contours: sets,
    };

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writer.flush()?;
            info!(path = %path.display(), "Wrote report");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}
