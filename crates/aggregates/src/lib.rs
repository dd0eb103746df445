//! Aggregate containers.
//!
//! An aggregate grid holds one reduced value per integer cell over a
//! rectangular extent and answers a default value everywhere else.
//!
//! - [`DenseGrid`]: row-major backing storage sized to the extent.
//! - [`UniformGrid`]: a single value for every cell, no allocation.
//! - [`Grid`]: either of the above; what the engine passes around.
//!
//! [`CategoryHistogram`] is the per-cell element type used when reducing
//! categorical data.

pub mod grid;
pub mod histogram;

pub use grid::{Aggregates, DenseGrid, Grid, UniformGrid};
pub use histogram::CategoryHistogram;
