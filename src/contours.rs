// src/contours.rs - Edge detection and contour extraction

use image::{GrayImage, RgbImage};
use imageproc::contours::find_contours;
use imageproc::edges::canny;
use log::debug;

use crate::geometry::Point;
use crate::image_utils::to_grayscale;

/// An ordered sequence of border pixels
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Integer pixel coordinates for rasterisation
    pub fn pixels(&self) -> Vec<(i32, i32)> {
        self.points
            .iter()
            .map(|p| (p.x.round() as i32, p.y.round() as i32))
            .collect()
    }
}

/// Canny edge map of a grayscale image
pub fn detect_edges(gray: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(gray, low_threshold, high_threshold)
}

/// Every border in a binary edge map, outer and hole borders alike, with all
/// border pixels kept
pub fn trace_contours(edges: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(edges)
        .into_iter()
        .map(|c| Contour {
            points: c
                .points
                .into_iter()
                .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
                .collect(),
        })
        .collect()
}

/// Sort by point count, longest first, and keep at most `max_contours`.
///
/// Contours of equal length keep their tracing order.
pub fn select_longest(mut contours: Vec<Contour>, max_contours: usize) -> Vec<Contour> {
    contours.sort_by(|a, b| b.len().cmp(&a.len()));
    contours.truncate(max_contours);
    contours
}

/// Result of running edge detection and contour tracing on one image
pub struct ContourExtraction {
    pub edges: GrayImage,
    /// Number of contours before truncation
    pub found: usize,
    pub contours: Vec<Contour>,
}

/// Grayscale, edge map, contour tracing, then keep the longest contours
pub fn extract_contours(
    image: &RgbImage,
    low_threshold: f32,
    high_threshold: f32,
    max_contours: usize,
) -> ContourExtraction {
    let gray = to_grayscale(image);
    let edges = detect_edges(&gray, low_threshold, high_threshold);
    let all = trace_contours(&edges);
    let found = all.len();
    let contours = select_longest(all, max_contours);

    debug!(
        "Traced {} contours, kept {} (longest has {} points)",
        found,
        contours.len(),
        contours.first().map(Contour::len).unwrap_or(0)
    );

    ContourExtraction { edges, found, contours }
}
