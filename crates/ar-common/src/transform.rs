//! Affine view transforms between data space and pixel space.

use serde::{Deserialize, Serialize};

use crate::{ArError, ArResult, BoundingBox, Point};

/// Determinants smaller than this are treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// A 2D affine transform.
///
/// ```text
/// x' = scale_x * x + shear_x * y + translate_x
/// y' = shear_y * x + scale_y * y + translate_y
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub scale_x: f64,
    pub shear_y: f64,
    pub shear_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub fn new(
        scale_x: f64,
        shear_y: f64,
        shear_x: f64,
        scale_y: f64,
        translate_x: f64,
        translate_y: f64,
    ) -> Self {
        Self {
            scale_x,
            shear_y,
            shear_x,
            scale_y,
            translate_x,
            translate_y,
        }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Transform that applies `self` first and then `next`.
    pub fn then(&self, next: &AffineTransform) -> AffineTransform {
        AffineTransform {
            scale_x: next.scale_x * self.scale_x + next.shear_x * self.shear_y,
            shear_x: next.scale_x * self.shear_x + next.shear_x * self.scale_y,
            translate_x: next.scale_x * self.translate_x
                + next.shear_x * self.translate_y
                + next.translate_x,
            shear_y: next.shear_y * self.scale_x + next.scale_y * self.shear_y,
            scale_y: next.shear_y * self.shear_x + next.scale_y * self.scale_y,
            translate_y: next.shear_y * self.translate_x
                + next.scale_y * self.translate_y
                + next.translate_y,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.scale_x * self.scale_y - self.shear_x * self.shear_y
    }

    /// Inverse transform, or `NonInvertibleTransform` for singular matrices.
    pub fn inverse(&self) -> ArResult<AffineTransform> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return Err(ArError::NonInvertibleTransform { determinant: det });
        }

        Ok(AffineTransform {
            scale_x: self.scale_y / det,
            shear_x: -self.shear_x / det,
            shear_y: -self.shear_y / det,
            scale_y: self.scale_x / det,
            translate_x: (self.shear_x * self.translate_y - self.scale_y * self.translate_x) / det,
            translate_y: (self.shear_y * self.translate_x - self.scale_x * self.translate_y) / det,
        })
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.scale_x * p.x + self.shear_x * p.y + self.translate_x,
            self.shear_y * p.x + self.scale_y * p.y + self.translate_y,
        )
    }

    /// Bounding box of the transformed box. All four corners are mapped so
    /// flips and rotations still produce an enclosing box.
    pub fn apply_bounds(&self, bbox: &BoundingBox) -> BoundingBox {
        if bbox.is_empty() {
            return BoundingBox::empty();
        }
        BoundingBox::from_points([
            self.apply(Point::new(bbox.min_x, bbox.min_y)),
            self.apply(Point::new(bbox.max_x, bbox.min_y)),
            self.apply(Point::new(bbox.min_x, bbox.max_y)),
            self.apply(Point::new(bbox.max_x, bbox.max_y)),
        ])
    }

    /// View transform that fits `bounds` onto a `width × height` canvas,
    /// preserving aspect ratio and centering the slack axis.
    pub fn zoom_fit(bounds: &BoundingBox, width: usize, height: usize) -> ArResult<AffineTransform> {
        if width == 0 || height == 0 {
            return Err(ArError::invalid_parameter(
                "canvas",
                format!("{}x{} has no pixels", width, height),
            ));
        }
        if bounds.is_empty() || (bounds.width() == 0.0 && bounds.height() == 0.0) {
            return Err(ArError::invalid_parameter(
                "bounds",
                "cannot fit an empty or single-point extent",
            ));
        }

        let ws = width as f64 / bounds.width();
        let hs = height as f64 / bounds.height();
        let scale = ws.min(hs);

        let x_margin = (width as f64 - bounds.width() * scale) / 2.0;
        let y_margin = (height as f64 - bounds.height() * scale) / 2.0;

        Ok(AffineTransform::translate(-bounds.min_x, -bounds.min_y)
            .then(&AffineTransform::scale(scale, scale))
            .then(&AffineTransform::translate(x_margin, y_margin)))
    }
}
