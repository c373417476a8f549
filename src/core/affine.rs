use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::geometry::{Path, Point, Rect};

/// 2D affine transform stored as a 2x3 matrix.
///
/// ```text
/// x' = scale_x * x + skew_x * y + trans_x
/// y' = skew_y  * x + scale_y * y + trans_y
/// ```
///
/// Composition follows "post" semantics: `a.then(b)` applies `a` first and
/// `b` second, which is how the chart pipeline chains its stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub scale_x: f64,
    pub skew_x: f64,
    pub trans_x: f64,
    pub skew_y: f64,
    pub scale_y: f64,
    pub trans_y: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        skew_x: 0.0,
        trans_x: 0.0,
        skew_y: 0.0,
        scale_y: 1.0,
        trans_y: 0.0,
    };

    #[must_use]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[must_use]
    pub const fn translation(dx: f64, dy: f64) -> Self {
        Self {
            trans_x: dx,
            trans_y: dy,
            ..Self::IDENTITY
        }
    }

    #[must_use]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self {
            scale_x: sx,
            scale_y: sy,
            ..Self::IDENTITY
        }
    }

    /// Scale around a fixed pivot point.
    #[must_use]
    pub fn scale_about(sx: f64, sy: f64, pivot_x: f64, pivot_y: f64) -> Self {
        Self {
            scale_x: sx,
            trans_x: pivot_x - sx * pivot_x,
            scale_y: sy,
            trans_y: pivot_y - sy * pivot_y,
            ..Self::IDENTITY
        }
    }

    /// Returns the transform that applies `self` and then `next`.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self {
            scale_x: next.scale_x * self.scale_x + next.skew_x * self.skew_y,
            skew_x: next.scale_x * self.skew_x + next.skew_x * self.scale_y,
            trans_x: next.scale_x * self.trans_x + next.skew_x * self.trans_y + next.trans_x,
            skew_y: next.skew_y * self.scale_x + next.scale_y * self.skew_y,
            scale_y: next.skew_y * self.skew_x + next.scale_y * self.scale_y,
            trans_y: next.skew_y * self.trans_x + next.scale_y * self.trans_y + next.trans_y,
        }
    }

    #[must_use]
    pub fn post_translate(self, dx: f64, dy: f64) -> Self {
        self.then(Self::translation(dx, dy))
    }

    #[must_use]
    pub fn post_scale(self, sx: f64, sy: f64, pivot_x: f64, pivot_y: f64) -> Self {
        self.then(Self::scale_about(sx, sy, pivot_x, pivot_y))
    }

    #[must_use]
    pub fn determinant(self) -> f64 {
        self.scale_x * self.scale_y - self.skew_x * self.skew_y
    }

    /// Inverts the transform.
    ///
    /// Returns `None` for singular matrices (zero or non-finite determinant),
    /// e.g. when a zoom collapses the whole data range onto one pixel.
    #[must_use]
    pub fn invert(self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }

        let inverse = Self {
            scale_x: self.scale_y / det,
            skew_x: -self.skew_x / det,
            trans_x: (self.skew_x * self.trans_y - self.scale_y * self.trans_x) / det,
            skew_y: -self.skew_y / det,
            scale_y: self.scale_x / det,
            trans_y: (self.skew_y * self.trans_x - self.scale_x * self.trans_y) / det,
        };
        inverse.is_finite().then_some(inverse)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        [
            self.scale_x,
            self.skew_x,
            self.trans_x,
            self.skew_y,
            self.scale_y,
            self.trans_y,
        ]
        .iter()
        .all(|value| value.is_finite())
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    #[must_use]
    pub fn map_point(self, point: Point) -> Point {
        Point::new(
            self.scale_x * point.x + self.skew_x * point.y + self.trans_x,
            self.skew_y * point.x + self.scale_y * point.y + self.trans_y,
        )
    }

    /// Maps a batch of points.
    pub fn map_points(self, points: &[Point]) -> Vec<Point> {
        #[cfg(feature = "parallel-projection")]
        {
            points.par_iter().map(|point| self.map_point(*point)).collect()
        }

        #[cfg(not(feature = "parallel-projection"))]
        {
            points.iter().map(|point| self.map_point(*point)).collect()
        }
    }

    /// Maps a rectangle and returns the axis-aligned bounds of its corners.
    #[must_use]
    pub fn map_rect(self, rect: Rect) -> Rect {
        let corners = rect.corners().map(|corner| self.map_point(corner));
        // Four corners are always present.
        Rect::bounding(&corners).unwrap_or_default()
    }

    #[must_use]
    pub fn map_path(self, path: &Path) -> Path {
        path.map_vertices(|vertex| self.map_point(vertex))
    }
}
