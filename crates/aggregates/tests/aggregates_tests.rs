//! Tests for grid containers and category histograms.

use aggregates::{Aggregates, CategoryHistogram, DenseGrid, Grid};
use ar_common::Rect;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_histogram(rng: &mut StdRng, sorted: bool) -> CategoryHistogram<u8> {
    let mut hist = CategoryHistogram::new(sorted);
    for _ in 0..rng.gen_range(0..12) {
        hist.add(rng.gen_range(0..5), rng.gen_range(1..4));
    }
    hist
}

// ============================================================================
// Dense and uniform grids
// ============================================================================

#[test]
fn test_uniform_and_dense_answer_alike() {
    let bounds = Rect::new(-3, 2, 9, 11);
    let uniform = Grid::uniform(bounds, 4u32);
    let dense = Grid::Dense(DenseGrid::new(bounds, 4u32));

    for (x, y) in bounds.grow(3).cells() {
        assert_eq!(uniform.get(x, y), dense.get(x, y), "cell ({}, {})", x, y);
    }
    assert_eq!(uniform.bounds(), dense.bounds());
    assert!(uniform.is_uniform_with(&4));
}

#[test]
fn test_out_of_bounds_reads_default() {
    let mut grid = Grid::dense(Rect::new(0, 0, 4, 4), 0i64);
    grid.set(1, 2, 7).unwrap();
    assert_eq!(*grid.get(1, 2), 7);
    assert_eq!(*grid.get(-1, 2), 0);
    assert_eq!(*grid.get(4, 0), 0);
    assert_eq!(*grid.get(i32::MAX, i32::MIN), 0);
}

#[test]
fn test_write_outside_bounds_fails() {
    let mut grid = Grid::dense(Rect::new(0, 0, 4, 4), 0i64);
    assert!(grid.set(4, 4, 1).is_err());
    assert!(grid.set(-1, 0, 1).is_err());
}

#[test]
fn test_write_to_uniform_converts_to_dense() {
    let mut grid = Grid::uniform(Rect::new(0, 0, 3, 3), 1u8);
    grid.set(2, 2, 9).unwrap();
    assert!(!grid.is_uniform());
    assert_eq!(*grid.get(2, 2), 9);
    assert_eq!(*grid.get(0, 0), 1);
}

#[test]
fn test_subset_reads_match_source() {
    let source = Grid::Dense(DenseGrid::from_fn(Rect::new(0, 0, 8, 6), 0, |x, y| x * 10 + y));
    let region = Rect::new(-2, 3, 5, 9);
    let subset = source.subset(region);

    assert_eq!(subset.bounds(), region);
    for (x, y) in region.cells() {
        assert_eq!(subset.get(x, y), source.get(x, y), "cell ({}, {})", x, y);
    }
}

#[test]
fn test_value_range() {
    let grid = Grid::Dense(DenseGrid::from_fn(Rect::new(0, 0, 5, 5), 0.0, |x, y| {
        (x - y) as f64
    }));
    assert_eq!(grid.value_range(), Some((-4.0, 4.0)));
    assert_eq!(Grid::uniform(Rect::EMPTY, 0.0).value_range(), None);
}

// ============================================================================
// Histogram merge laws
// ============================================================================

#[test]
fn test_histogram_merge_commutative() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let sorted = rng.gen_bool(0.5);
        let a = random_histogram(&mut rng, sorted);
        let b = random_histogram(&mut rng, sorted);
        assert_eq!(a.merge(&b), b.merge(&a));
    }
}

#[test]
fn test_histogram_merge_associative() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let sorted = rng.gen_bool(0.5);
        let a = random_histogram(&mut rng, sorted);
        let b = random_histogram(&mut rng, sorted);
        let c = random_histogram(&mut rng, sorted);
        assert_eq!(a.merge(&b).merge(&c), a.merge(&b.merge(&c)));
    }
}

#[test]
fn test_histogram_merge_identity_and_totals() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..100 {
        let a = random_histogram(&mut rng, true);
        let empty = CategoryHistogram::new(true);
        assert_eq!(a.merge(&empty), a);
        assert_eq!(empty.merge(&a), a);

        let b = random_histogram(&mut rng, true);
        let merged = a.merge(&b);
        assert_eq!(merged.total(), a.total() + b.total());
        for key in 0..5u8 {
            assert_eq!(merged.value(&key), a.value(&key) + b.value(&key));
        }
    }
}

#[test]
fn test_sorted_merge_keeps_descending_order() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..100 {
        let merged = random_histogram(&mut rng, true).merge(&random_histogram(&mut rng, true));
        let counts: Vec<u64> = merged.iter().map(|(_, n)| n).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{:?}", counts);
    }
}

#[test]
fn test_histogram_grid_cells() {
    let bounds = Rect::new(0, 0, 2, 2);
    let mut grid = Grid::dense(bounds, CategoryHistogram::new(false));
    let mut cell = grid.get(0, 0).clone();
    cell.add('a', 2);
    cell.add('b', 1);
    grid.set(0, 0, cell).unwrap();

    assert_eq!(grid.get(0, 0).value(&'a'), 2);
    assert!(grid.get(1, 1).is_empty());
    assert!(grid.get(5, 5).is_empty());
}
