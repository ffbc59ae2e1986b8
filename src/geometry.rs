// src/geometry.rs - Points, bounding boxes and the aspect-preserving fit transform

use nalgebra::{Matrix3, Point2};
use serde::{Deserialize, Serialize};

/// A 2D coordinate in image or canvas space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Exchange the two coordinates
    pub fn swapped(self) -> Self {
        Self { x: self.y, y: self.x }
    }
}

/// Axis-aligned rectangle given by its minimum and maximum corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Build a rectangle from any two opposite corners
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new((self.min.x + self.max.x) / 2.0, (self.min.y + self.max.y) / 2.0)
    }

    /// The four corners, starting at `min` and going around the rectangle
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    /// Grow the rectangle by `fraction` of its size on every side
    pub fn padded(&self, fraction: f64) -> Self {
        let pad_x = self.width() * fraction;
        let pad_y = self.height() * fraction;
        Self {
            min: Point::new(self.min.x - pad_x, self.min.y - pad_y),
            max: Point::new(self.max.x + pad_x, self.max.y + pad_y),
        }
    }
}

/// Bounding box of a point set; `None` for an empty set
pub fn bounding_box(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let mut rect = Rect { min: *first, max: *first };

    for p in &points[1..] {
        rect.min.x = rect.min.x.min(p.x);
        rect.min.y = rect.min.y.min(p.y);
        rect.max.x = rect.max.x.max(p.x);
        rect.max.y = rect.max.y.max(p.y);
    }

    Some(rect)
}

/// Uniform scale followed by a translation.
///
/// Built by [`FitTransform::fit`] so that a source box lands centered inside a
/// destination rectangle with its aspect ratio preserved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTransform {
    matrix: Matrix3<f64>,
}

impl FitTransform {
    /// Fit `source` inside `dest`.
    ///
    /// `scale = min(dest_w / src_w, dest_h / src_h)` and, per axis,
    /// `offset = dest_origin + (dest_size - src_size * scale) / 2`.
    /// A zero-sized source side does not constrain the scale; a source that is
    /// a single point keeps scale 1 and is moved to the destination center.
    pub fn fit(source: &Rect, dest: &Rect) -> Self {
        let (src_w, src_h) = (source.width(), source.height());
        let (dst_w, dst_h) = (dest.width(), dest.height());

        let scale_x = if src_w > 0.0 { Some(dst_w / src_w) } else { None };
        let scale_y = if src_h > 0.0 { Some(dst_h / src_h) } else { None };

        let scale = match (scale_x, scale_y) {
            (Some(sx), Some(sy)) => sx.min(sy),
            (Some(s), None) | (None, Some(s)) => s,
            (None, None) => 1.0,
        };

        let offset_x = dest.min.x + (dst_w - src_w * scale) / 2.0;
        let offset_y = dest.min.y + (dst_h - src_h * scale) / 2.0;

        // x' = (x - src_min) * scale + offset
        let tx = offset_x - source.min.x * scale;
        let ty = offset_y - source.min.y * scale;

        Self {
            matrix: Matrix3::new(
                scale, 0.0, tx,
                0.0, scale, ty,
                0.0, 0.0, 1.0,
            ),
        }
    }

    /// Fit a point set's own bounding box into `dest`
    pub fn fit_points(points: &[Point], dest: &Rect) -> Option<Self> {
        bounding_box(points).map(|source| Self::fit(&source, dest))
    }

    pub fn scale(&self) -> f64 {
        self.matrix[(0, 0)]
    }

    pub fn apply(&self, p: Point) -> Point {
        let mapped = self.matrix.transform_point(&Point2::new(p.x, p.y));
        Point::new(mapped.x, mapped.y)
    }

    pub fn apply_all(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|&p| self.apply(p)).collect()
    }
}

/// Map `points` into `dest` preserving aspect ratio and centering the shape
pub fn fit_into(points: &[Point], dest: &Rect) -> Vec<Point> {
    match FitTransform::fit_points(points, dest) {
        Some(transform) => transform.apply_all(points),
        None => Vec::new(),
    }
}
