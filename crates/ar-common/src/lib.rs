//! Common types shared across the abstract-rendering workspace.
//!
//! Data-space geometry (`BoundingBox`, `Point`), the integer cell rectangle
//! (`Rect`) that aggregate grids are indexed by, the affine view transform,
//! and the glyph model consumed by the aggregation engine.

pub mod bbox;
pub mod error;
pub mod glyph;
pub mod transform;

pub use bbox::{BoundingBox, Point, Rect};
pub use error::{ArError, ArResult};
pub use glyph::{FilterGlyphs, FilterSegment, Glyph, GlyphList, Glyphset, Shape};
pub use transform::AffineTransform;
