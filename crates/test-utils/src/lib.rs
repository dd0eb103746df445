//! Shared test utilities for the abstract-rendering workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Seeded glyph generators (points, boxes, clusters)
//! - Synthetic numeric grids
//! - Fixed grids used by the contour tests
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{block_grid, random_points};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

#[doc(hidden)]
pub use aggregates::Aggregates as __Aggregates;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Assert two grids answer the same value for every cell of `region`.
///
/// Compares through `Aggregates::get`, so dense and uniform grids with the
/// same contents are equal.
///
/// ```ignore
/// assert_grids_eq!(parallel, serial, Rect::with_size(64, 64));
/// ```
#[macro_export]
macro_rules! assert_grids_eq {
    ($left:expr, $right:expr, $region:expr) => {{
        use $crate::__Aggregates as _;
        let left = &$left;
        let right = &$right;
        for (x, y) in $region.cells() {
            assert_eq!(
                left.get(x, y),
                right.get(x, y),
                "grids differ at cell ({}, {})",
                x,
                y
            );
        }
    }};
}
