//! The glyph model: shapes paired with values, and ordered glyph sets.
//!
//! The aggregation engine only ever reads glyphs. It asks a [`Glyphset`]
//! for its length and bounds, then walks contiguous index ranges through
//! [`Glyphset::segment`] while splitting work across threads.

use std::ops::Range;

use crate::{BoundingBox, Point};

/// Geometry a glyph can carry. Aggregation only needs the bounding box.
pub trait Shape {
    fn bounds(&self) -> BoundingBox;
}

impl Shape for BoundingBox {
    fn bounds(&self) -> BoundingBox {
        *self
    }
}

impl Shape for Point {
    fn bounds(&self) -> BoundingBox {
        BoundingBox::from_point(*self)
    }
}

/// Immutable pair of a shape and its associated value.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph<S, V> {
    pub shape: S,
    pub value: V,
}

impl<S, V> Glyph<S, V> {
    pub fn new(shape: S, value: V) -> Self {
        Self { shape, value }
    }
}

/// An ordered, possibly very large sequence of glyphs.
///
/// Segments of a range partition it exactly: concatenating
/// `segment(a..m)` and `segment(m..b)` yields `segment(a..b)` in order.
/// Ranges are clamped to `0..len()`.
pub trait Glyphset: Sync {
    type Shape: Shape;
    type Value;
    type Segment<'a>: Iterator<Item = &'a Glyph<Self::Shape, Self::Value>>
    where
        Self: 'a;

    /// Number of index positions in the set.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Box covering every glyph shape.
    fn bounds(&self) -> BoundingBox;

    /// Contiguous view over `range`, without copying storage.
    fn segment(&self, range: Range<usize>) -> Self::Segment<'_>;
}

fn clamp(range: Range<usize>, len: usize) -> Range<usize> {
    let end = range.end.min(len);
    range.start.min(end)..end
}

/// Glyph set backed by a vector, with bounds computed once up front.
#[derive(Debug, Clone)]
pub struct GlyphList<S, V> {
    glyphs: Vec<Glyph<S, V>>,
    bounds: BoundingBox,
}

impl<S: Shape, V> GlyphList<S, V> {
    pub fn new(glyphs: Vec<Glyph<S, V>>) -> Self {
        let bounds = glyphs
            .iter()
            .fold(BoundingBox::empty(), |acc, g| acc.union(&g.shape.bounds()));
        Self { glyphs, bounds }
    }

    pub fn glyphs(&self) -> &[Glyph<S, V>] {
        &self.glyphs
    }
}

impl<S: Shape, V> FromIterator<Glyph<S, V>> for GlyphList<S, V> {
    fn from_iter<I: IntoIterator<Item = Glyph<S, V>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<S, V> Glyphset for GlyphList<S, V>
where
    S: Shape + Sync,
    V: Sync,
{
    type Shape = S;
    type Value = V;
    type Segment<'a> = std::slice::Iter<'a, Glyph<S, V>> where Self: 'a;

    fn len(&self) -> usize {
        self.glyphs.len()
    }

    fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    fn segment(&self, range: Range<usize>) -> Self::Segment<'_> {
        self.glyphs[clamp(range, self.glyphs.len())].iter()
    }
}

/// Predicate-filtered view over another glyph set.
///
/// Index positions are those of the base set, so `len()` is the base
/// length and segments simply skip glyphs that fail the predicate.
pub struct FilterGlyphs<G, P> {
    base: G,
    predicate: P,
    tight_bounds: bool,
}

impl<G, P> FilterGlyphs<G, P>
where
    G: Glyphset,
    P: Fn(&Glyph<G::Shape, G::Value>) -> bool + Sync,
{
    /// Filter reporting the base set's bounds.
    pub fn new(base: G, predicate: P) -> Self {
        Self {
            base,
            predicate,
            tight_bounds: false,
        }
    }

    /// Filter whose `bounds()` covers only the glyphs that pass.
    pub fn with_tight_bounds(base: G, predicate: P) -> Self {
        Self {
            base,
            predicate,
            tight_bounds: true,
        }
    }

    pub fn base(&self) -> &G {
        &self.base
    }
}

impl<G, P> Glyphset for FilterGlyphs<G, P>
where
    G: Glyphset,
    P: Fn(&Glyph<G::Shape, G::Value>) -> bool + Sync,
{
    type Shape = G::Shape;
    type Value = G::Value;
    type Segment<'a> = FilterSegment<'a, G, P> where Self: 'a;

    fn len(&self) -> usize {
        self.base.len()
    }

    fn bounds(&self) -> BoundingBox {
        if self.tight_bounds {
            self.segment(0..self.len())
                .fold(BoundingBox::empty(), |acc, g| acc.union(&g.shape.bounds()))
        } else {
            self.base.bounds()
        }
    }

    fn segment(&self, range: Range<usize>) -> Self::Segment<'_> {
        FilterSegment {
            inner: self.base.segment(range),
            predicate: &self.predicate,
        }
    }
}

/// Segment iterator of a [`FilterGlyphs`].
pub struct FilterSegment<'a, G: Glyphset + 'a, P> {
    inner: G::Segment<'a>,
    predicate: &'a P,
}

impl<'a, G, P> Iterator for FilterSegment<'a, G, P>
where
    G: Glyphset + 'a,
    P: Fn(&Glyph<G::Shape, G::Value>) -> bool,
{
    type Item = &'a Glyph<G::Shape, G::Value>;

    fn next(&mut self) -> Option<Self::Item> {
        let predicate = self.predicate;
        self.inner.find(|g| predicate(*g))
    }
}
