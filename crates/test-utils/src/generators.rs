//! Seeded generators for synthetic glyph sets and numeric grids.
//!
//! Every generator takes an explicit seed so failures reproduce exactly.

use aggregates::{DenseGrid, Grid};
use ar_common::{BoundingBox, Glyph, GlyphList, Point, Rect};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic RNG for tests.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Points uniformly spread over `bounds`, each tagged with a category in
/// `0..categories`.
pub fn random_points(n: usize, bounds: BoundingBox, categories: u8, seed: u64) -> GlyphList<Point, u8> {
    let mut rng = rng(seed);
    (0..n)
        .map(|_| {
            let p = Point::new(
                rng.gen_range(bounds.min_x..=bounds.max_x),
                rng.gen_range(bounds.min_y..=bounds.max_y),
            );
            Glyph::new(p, rng.gen_range(0..categories.max(1)))
        })
        .collect()
}

/// Axis-aligned boxes inside `bounds` with sides up to `max_side`, valued
/// with small integers so floating-point sums stay exact.
pub fn random_boxes(n: usize, bounds: BoundingBox, max_side: f64, seed: u64) -> GlyphList<BoundingBox, i32> {
    let mut rng = rng(seed);
    (0..n)
        .map(|_| {
            let x = rng.gen_range(bounds.min_x..=bounds.max_x);
            let y = rng.gen_range(bounds.min_y..=bounds.max_y);
            let w = rng.gen_range(0.0..=max_side);
            let h = rng.gen_range(0.0..=max_side);
            Glyph::new(BoundingBox::new(x, y, x + w, y + h), rng.gen_range(-50..=50))
        })
        .collect()
}

/// Points scattered in gaussian-ish clusters; the value is the cluster
/// index. Approximates census-style data with dense hot spots.
pub fn clustered_points(n: usize, clusters: usize, extent: f64, seed: u64) -> GlyphList<Point, u8> {
    let mut rng = rng(seed);
    let clusters = clusters.clamp(1, u8::MAX as usize);
    let centers: Vec<(f64, f64, f64)> = (0..clusters)
        .map(|_| {
            (
                rng.gen_range(0.0..extent),
                rng.gen_range(0.0..extent),
                rng.gen_range(extent / 50.0..extent / 8.0),
            )
        })
        .collect();

    (0..n)
        .map(|i| {
            let c = i % clusters;
            let (cx, cy, spread) = centers[c];
            // Sum of uniforms approximates a normal distribution.
            let dx: f64 = (0..3).map(|_| rng.gen_range(-1.0..1.0)).sum::<f64>() * spread;
            let dy: f64 = (0..3).map(|_| rng.gen_range(-1.0..1.0)).sum::<f64>() * spread;
            Glyph::new(Point::new(cx + dx, cy + dy), c as u8)
        })
        .collect()
}

/// Creates a test grid with predictable values.
///
/// Each cell value is `x * 1000 + y`, which makes misplaced cells easy to
/// spot in failure output.
///
/// # Example
///
/// ```
/// use aggregates::Aggregates;
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(*grid.get(0, 0), 0.0);
/// assert_eq!(*grid.get(1, 0), 1000.0);
/// assert_eq!(*grid.get(0, 1), 1.0);
/// ```
pub fn create_test_grid(width: i32, height: i32) -> Grid<f64> {
    Grid::Dense(DenseGrid::from_fn(Rect::with_size(width, height), 0.0, |x, y| {
        (x * 1000 + y) as f64
    }))
}

/// A cone peaking at `peak` in the center and falling off linearly to 0 at
/// the corners. Its iso-lines are nested closed rings.
pub fn create_cone_grid(size: i32, peak: f64) -> Grid<f64> {
    let center = size as f64 / 2.0;
    let max_dist = (2.0 * center * center).sqrt().max(1.0);
    Grid::Dense(DenseGrid::from_fn(Rect::with_size(size, size), 0.0, |x, y| {
        let dx = x as f64 + 0.5 - center;
        let dy = y as f64 + 0.5 - center;
        peak * (1.0 - (dx * dx + dy * dy).sqrt() / max_dist)
    }))
}

/// Random 0/1 grid with roughly `density` of its cells set.
pub fn random_binary_grid(width: i32, height: i32, density: f64, seed: u64) -> Grid<u8> {
    let mut rng = rng(seed);
    Grid::Dense(DenseGrid::from_fn(Rect::with_size(width, height), 0, |_, _| {
        u8::from(rng.gen_bool(density.clamp(0.0, 1.0)))
    }))
}
