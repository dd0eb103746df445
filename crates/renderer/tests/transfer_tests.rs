//! Tests for the transfer stage.

use aggregates::{Aggregates, DenseGrid, Grid};
use ar_common::{AffineTransform, ArError, BoundingBox, Rect};
use renderer::{
    CellMap, Count, IsoDivide, Log, ParallelRenderer, RenderConfig, Renderer, SerialRenderer,
    Transfer,
};
use test_utils::{assert_approx_eq, assert_grids_eq, create_test_grid, random_points};

type Run = Box<dyn Fn(&Grid<i32>) -> Grid<bool>>;

fn renderers() -> Vec<(&'static str, Run)> {
    let parallel = ParallelRenderer::with_config(&RenderConfig::default().with_task_size(7)).unwrap();
    let serial = SerialRenderer::new();

    let mut runs: Vec<(&'static str, Run)> = Vec::new();
    runs.push((
        "parallel",
        Box::new(move |g: &Grid<i32>| parallel.transfer(g, &IsoDivide::new(3.0)).unwrap()),
    ));
    runs.push((
        "serial",
        Box::new(move |g: &Grid<i32>| serial.transfer(g, &IsoDivide::new(3.0)).unwrap()),
    ));
    runs
}

// ============================================================================
// Thresholding
// ============================================================================

#[test]
fn test_iso_divide_block() {
    let input = Grid::Dense(DenseGrid::from_fn(Rect::with_size(10, 10), 0, |x, y| {
        if (3..=6).contains(&x) && (3..=6).contains(&y) {
            5
        } else {
            0
        }
    }));

    for (name, run) in renderers() {
        let output = run(&input);
        assert_eq!(output.bounds(), input.bounds(), "{}", name);
        for (x, y) in input.bounds().cells() {
            assert_eq!(*output.get(x, y), *input.get(x, y) >= 3, "{} at ({}, {})", name, x, y);
        }
    }
}

#[test]
fn test_iso_divide_threshold_inclusive() {
    let input = Grid::Dense(DenseGrid::from_fn(Rect::with_size(3, 1), 0, |x, _| x + 2));
    let output = SerialRenderer::new().transfer(&input, &IsoDivide::new(3.0)).unwrap();
    assert!(!*output.get(0, 0));
    assert!(*output.get(1, 0));
    assert!(*output.get(2, 0));
}

#[test]
fn test_iso_divide_uniform_input() {
    let input = Grid::uniform(Rect::with_size(4, 4), 9i32);
    for (name, run) in renderers() {
        let output = run(&input);
        assert!(output.cells().all(|(_, _, v)| *v), "{}", name);
    }
}

// ============================================================================
// Context-aware transfers
// ============================================================================

/// Sum of the 3×3 neighborhood around each cell.
struct NeighborSum;

impl Transfer<f64> for NeighborSum {
    type Output = f64;

    fn empty(&self) -> f64 {
        0.0
    }

    fn at(&self, x: i32, y: i32, input: &Grid<f64>) -> f64 {
        let mut total = 0.0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                total += input.get(x + dx, y + dy);
            }
        }
        total
    }
}

#[test]
fn test_neighborhood_transfer_tile_invariant() {
    let input = create_test_grid(37, 23);
    let expected = SerialRenderer::new().transfer(&input, &NeighborSum).unwrap();

    for task_size in [1, 10, 37, 100, 10_000] {
        let renderer =
            ParallelRenderer::with_config(&RenderConfig::default().with_task_size(task_size)).unwrap();
        let output = renderer.transfer(&input, &NeighborSum).unwrap();
        assert_eq!(output.bounds(), expected.bounds());
        assert_grids_eq!(output, expected, input.bounds());
    }

    // Interior cell sees all nine neighbors; corner sees four.
    let center: f64 = (4..=6)
        .flat_map(|x| (4..=6).map(move |y| (x * 1000 + y) as f64))
        .sum();
    assert_approx_eq!(*expected.get(5, 5), center, 1e-9);
    assert_approx_eq!(*expected.get(0, 0), 0.0 + 1.0 + 1000.0 + 1001.0, 1e-9);
}

#[test]
fn test_offset_bounds_preserved() {
    let bounds = Rect::new(-5, 10, 7, 19);
    let input = Grid::Dense(DenseGrid::from_fn(bounds, 0.0, |x, y| (x * y) as f64));
    let output = ParallelRenderer::new()
        .unwrap()
        .transfer(&input, &CellMap::new(0.0, |v: &f64| v * 2.0))
        .unwrap();
    assert_eq!(output.bounds(), bounds);
    assert_eq!(*output.get(-5, 10), -100.0);
    assert_eq!(*output.get(6, 18), 216.0);
}

#[test]
fn test_empty_input_gives_empty_output() {
    let input: Grid<f64> = Grid::uniform(Rect::EMPTY, 0.0);
    let output = ParallelRenderer::new().unwrap().transfer(&input, &Log::base10()).unwrap();
    assert!(output.is_empty());
    assert!(output.is_uniform());
}

// ============================================================================
// Pipelines
// ============================================================================

#[test]
fn test_log_over_counts() {
    let glyphs = random_points(20_000, BoundingBox::new(0.0, 0.0, 1.0, 1.0), 1, 13);
    let renderer = ParallelRenderer::with_config(&RenderConfig::default().with_task_size(500)).unwrap();
    let view = AffineTransform::scale(16.0, 16.0);

    let counts = renderer.aggregate(&glyphs, &Count, &view, 16, 16).unwrap();
    let logged = renderer.transfer(&counts, &Log::base10()).unwrap();

    assert_eq!(logged.bounds(), counts.bounds());
    for (x, y, n) in counts.cells() {
        let expected = if *n > 0 { (*n as f64).log10() } else { 0.0 };
        assert_approx_eq!(*logged.get(x, y), expected, 1e-12);
    }
}

#[test]
fn test_log_fallback_for_non_positive() {
    let input = Grid::Dense(DenseGrid::from_fn(Rect::with_size(3, 1), 0i64, |x, _| {
        [-10, 0, 100][x as usize]
    }));
    let output = SerialRenderer::new().transfer(&input, &Log::new(10.0, -1.0)).unwrap();
    assert_eq!(*output.get(0, 0), -1.0);
    assert_eq!(*output.get(1, 0), -1.0);
    assert_approx_eq!(*output.get(2, 0), 2.0, 1e-12);
    assert_eq!(*output.get(50, 50), -1.0);
}

// ============================================================================
// Failure propagation
// ============================================================================

struct Fragile;

impl Transfer<f64> for Fragile {
    type Output = f64;

    fn empty(&self) -> f64 {
        0.0
    }

    fn at(&self, x: i32, y: i32, input: &Grid<f64>) -> f64 {
        if (x, y) == (3, 3) {
            panic!("transfer boom");
        }
        *input.get(x, y)
    }
}

#[test]
fn test_transfer_panic_becomes_task_failed() {
    let input = create_test_grid(8, 8);

    let err = ParallelRenderer::with_config(&RenderConfig::default().with_task_size(8))
        .unwrap()
        .transfer(&input, &Fragile)
        .unwrap_err();
    match err {
        ArError::TaskFailed(message) => assert!(message.contains("transfer boom")),
        other => panic!("unexpected error {:?}", other),
    }

    let err = SerialRenderer::new().transfer(&input, &Fragile).unwrap_err();
    assert!(matches!(err, ArError::TaskFailed(_)));
}
