// src/sampling.rs - Reduce each contour to a fixed number of representative points

use image::Rgb;
use serde::Serialize;

use crate::geometry::Point;

/// The representative points of one contour and the color it is drawn in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampledContour {
    pub color: [u8; 3],
    pub points: Vec<Point>,
}

impl SampledContour {
    pub fn rgb(&self) -> Rgb<u8> {
        Rgb(self.color)
    }
}

/// Evenly spaced indices over `0..len`, truncated toward zero.
///
/// Always returns `count` indices for a non-empty sequence; the first is 0 and
/// the last is `len - 1` when `count > 1`.
pub fn sample_indices(len: usize, count: usize) -> Vec<usize> {
    if len == 0 || count == 0 {
        return Vec::new();
    }

    if count == 1 {
        return vec![0];
    }

    let last = len - 1;
    (0..count).map(|i| i * last / (count - 1)).collect()
}

/// Pick `count` points from a contour.
///
/// A single-point contour is repeated `count` times.
pub fn sample_contour(points: &[Point], count: usize) -> Vec<Point> {
    if points.len() == 1 {
        return vec![points[0]; count];
    }

    sample_indices(points.len(), count)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// Flatten sampled contours into one point list, contour by contour
pub fn flatten_samples(samples: &[SampledContour]) -> Vec<Point> {
    samples.iter().flat_map(|s| s.points.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64, 2.0 * i as f64)).collect()
    }

    #[test]
    fn indices_span_whole_sequence() {
        assert_eq!(sample_indices(100, 5), vec![0, 24, 49, 74, 99]);
        assert_eq!(sample_indices(5, 5), vec![0, 1, 2, 3, 4]);
        assert_eq!(sample_indices(2, 5), vec![0, 0, 0, 0, 1]);
        assert_eq!(sample_indices(3, 5), vec![0, 0, 1, 1, 2]);
    }

    #[test]
    fn always_returns_requested_count() {
        for n in 1..60 {
            assert_eq!(sample_contour(&line(n), 5).len(), 5, "length {}", n);
        }
    }

    #[test]
    fn single_point_is_repeated() {
        let samples = sample_contour(&[Point::new(7.0, 3.0)], 5);
        assert_eq!(samples, vec![Point::new(7.0, 3.0); 5]);
    }

    #[test]
    fn samples_are_existing_points() {
        let contour = line(17);
        let samples = sample_contour(&contour, 5);
        assert_eq!(samples.first(), contour.first());
        assert_eq!(samples.last(), contour.last());
        assert!(samples.iter().all(|p| contour.contains(p)));
    }

    #[test]
    fn empty_contour_has_no_samples() {
        assert!(sample_contour(&[], 5).is_empty());
        assert!(sample_indices(10, 0).is_empty());
        assert_eq!(sample_indices(10, 1), vec![0]);
    }

    #[test]
    fn flatten_keeps_contour_order() {
        let samples = vec![
            SampledContour { color: [0, 0, 0], points: vec![Point::new(1.0, 1.0)] },
            SampledContour { color: [9, 9, 9], points: vec![Point::new(2.0, 2.0), Point::new(3.0, 3.0)] },
        ];
        let flat = flatten_samples(&samples);
        assert_eq!(flat, vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0), Point::new(3.0, 3.0)]);
    }
}
