//! Data-space bounding boxes and integer cell rectangles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in data space (or pixel space after a view transform).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned bounding box in continuous coordinates.
///
/// A box with `min > max` on either axis is empty; [`BoundingBox::empty`]
/// is the identity for [`BoundingBox::union`]. Zero-width boxes (points,
/// horizontal lines) are *not* empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The box covering nothing.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Degenerate box around a single point.
    pub fn from_point(p: Point) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    /// Smallest box covering every point, or `empty()` for no points.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Self {
        points
            .into_iter()
            .fold(Self::empty(), |acc, p| acc.union(&Self::from_point(p)))
    }

    pub fn is_empty(&self) -> bool {
        !(self.min_x <= self.max_x && self.min_y <= self.max_y)
    }

    /// Width in coordinate units (0 for empty boxes).
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    /// Height in coordinate units (0 for empty boxes).
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Smallest box covering both inputs.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Check if this bbox intersects another (touching edges count).
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Compute the intersection of two bounding boxes.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.intersects(other) {
            return None;
        }

        Some(BoundingBox {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        })
    }

    /// Check if a point is contained within this bbox (edges inclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

/// A half-open rectangle of integer cells: `[low_x, high_x) × [low_y, high_y)`.
///
/// This is the extent type of every aggregate grid. Rectangles with no
/// cells are empty regardless of where they sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub low_x: i32,
    pub low_y: i32,
    pub high_x: i32,
    pub high_y: i32,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        low_x: 0,
        low_y: 0,
        high_x: 0,
        high_y: 0,
    };

    pub fn new(low_x: i32, low_y: i32, high_x: i32, high_y: i32) -> Self {
        Self {
            low_x,
            low_y,
            high_x,
            high_y,
        }
    }

    /// Rectangle anchored at the origin: `[0, width) × [0, height)`.
    pub fn with_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Integer cells touched by a continuous box.
    ///
    /// Low edges are floored and high edges ceiled. Every axis spans at
    /// least one cell, so a point or a hairline still lands in the cell
    /// that contains it.
    pub fn enclosing(bbox: &BoundingBox) -> Rect {
        if bbox.is_empty() {
            return Rect::EMPTY;
        }
        let low_x = bbox.min_x.floor() as i32;
        let low_y = bbox.min_y.floor() as i32;
        let high_x = (bbox.max_x.ceil() as i32).max(low_x.saturating_add(1));
        let high_y = (bbox.max_y.ceil() as i32).max(low_y.saturating_add(1));
        Rect::new(low_x, low_y, high_x, high_y)
    }

    pub fn is_empty(&self) -> bool {
        self.high_x <= self.low_x || self.high_y <= self.low_y
    }

    pub fn width(&self) -> i32 {
        (self.high_x - self.low_x).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.high_y - self.low_y).max(0)
    }

    /// Number of cells.
    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width() as usize * self.height() as usize
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.low_x && x < self.high_x && y >= self.low_y && y < self.high_y
    }

    /// Every cell of `other` is a cell of `self`. Empty rectangles are
    /// contained everywhere.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.is_empty()
            || (other.low_x >= self.low_x
                && other.high_x <= self.high_x
                && other.low_y >= self.low_y
                && other.high_y <= self.high_y)
    }

    /// Smallest rectangle covering both inputs. Empty inputs are ignored.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect {
            low_x: self.low_x.min(other.low_x),
            low_y: self.low_y.min(other.low_y),
            high_x: self.high_x.max(other.high_x),
            high_y: self.high_y.max(other.high_y),
        }
    }

    /// Cells shared by both rectangles.
    ///
    /// A disjoint pair yields a zero-size rectangle pinned at the clamped
    /// low corner, so the result is always well-formed.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let low_x = self.low_x.max(other.low_x);
        let low_y = self.low_y.max(other.low_y);
        let high_x = self.high_x.min(other.high_x);
        let high_y = self.high_y.min(other.high_y);
        if high_x <= low_x || high_y <= low_y {
            Rect::new(low_x, low_y, low_x, low_y)
        } else {
            Rect::new(low_x, low_y, high_x, high_y)
        }
    }

    /// Rectangle enlarged by `cells` on every side. Empty stays empty.
    pub fn grow(&self, cells: i32) -> Rect {
        if self.is_empty() {
            return *self;
        }
        Rect::new(
            self.low_x.saturating_sub(cells),
            self.low_y.saturating_sub(cells),
            self.high_x.saturating_add(cells),
            self.high_y.saturating_add(cells),
        )
    }

    /// Row-major iteration over the cells of this rectangle.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let Rect {
            low_x,
            low_y,
            high_x,
            high_y,
        } = *self;
        let (high_x, high_y) = if self.is_empty() {
            (low_x, low_y)
        } else {
            (high_x, high_y)
        };
        (low_y..high_y).flat_map(move |y| (low_x..high_x).map(move |x| (x, y)))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) x [{}, {})",
            self.low_x, self.high_x, self.low_y, self.high_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enclosing_point_touches_one_cell() {
        let r = Rect::enclosing(&BoundingBox::from_point(Point::new(3.2, 4.0)));
        assert_eq!(r, Rect::new(3, 4, 4, 5));
        assert_eq!(r.area(), 1);
    }

    #[test]
    fn test_enclosing_floor_ceil() {
        let r = Rect::enclosing(&BoundingBox::new(0.5, 1.5, 2.5, 3.0));
        assert_eq!(r, Rect::new(0, 1, 3, 3));
    }

    #[test]
    fn test_disjoint_intersection_is_empty() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(5, 5, 7, 7);
        assert!(a.intersection(&b).is_empty());
        assert_eq!(a.intersection(&b).area(), 0);
    }

    #[test]
    fn test_grow() {
        assert_eq!(Rect::new(1, 2, 3, 4).grow(1), Rect::new(0, 1, 4, 5));
        assert!(Rect::EMPTY.grow(3).is_empty());
    }

    #[test]
    fn test_bbox_union_with_empty() {
        let a = BoundingBox::new(1.0, 1.0, 2.0, 2.0);
        assert_eq!(BoundingBox::empty().union(&a), a);
        assert_eq!(a.union(&BoundingBox::empty()), a);
        assert!(BoundingBox::empty().is_empty());
    }
}
