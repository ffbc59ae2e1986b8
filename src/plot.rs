// src/plot.rs - Raster renderings: contour overlay and sampled-point scatter plot

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as PixelRect;

use crate::contours::Contour;
use crate::geometry::{bounding_box, FitTransform, Point, Rect};
use crate::image_utils::{blank_canvas, draw_marker, draw_polyline};
use crate::sampling::{flatten_samples, SampledContour};

const GRID_COLOR: Rgb<u8> = Rgb([224, 224, 224]);
const FRAME_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Fraction of the plot size kept free around the axes
const PLOT_MARGIN: f64 = 0.08;

/// Extra room around the data, relative to its extent
const DATA_PADDING: f64 = 0.05;

/// Target number of grid lines per axis
const TARGET_TICKS: f64 = 8.0;

/// Draw every contour as a closed outline on a white canvas of the given size
pub fn render_contours(
    contours: &[Contour],
    colors: &[[u8; 3]],
    width: u32,
    height: u32,
    thickness: u32,
) -> RgbImage {
    let mut canvas = blank_canvas(width, height);

    for (contour, color) in contours.iter().zip(colors) {
        draw_polyline(&mut canvas, &contour.pixels(), Rgb(*color), thickness, true);
    }

    canvas
}

/// Spacing of "nice" grid lines (1, 2 or 5 times a power of ten) for a range
pub fn nice_tick_step(range: f64) -> f64 {
    if !(range.is_finite() && range > 0.0) {
        return 1.0;
    }

    let raw = range / TARGET_TICKS;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;

    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}

/// Multiples of `step` inside `[min, max]`
pub fn tick_positions(min: f64, max: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || max < min {
        return Vec::new();
    }

    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Scatter plot of sampled points with equal axis scaling.
///
/// The y axis grows downward so the plot matches the image orientation.
pub fn render_scatter(samples: &[SampledContour], size: [u32; 2], marker_radius: u32) -> RgbImage {
    let [width, height] = size;
    let mut canvas = blank_canvas(width, height);

    let margin_x = width as f64 * PLOT_MARGIN;
    let margin_y = height as f64 * PLOT_MARGIN;
    let area = Rect::from_corners(
        Point::new(margin_x, margin_y),
        Point::new(width as f64 - margin_x, height as f64 - margin_y),
    );

    let all_points = flatten_samples(samples);
    let transform = bounding_box(&all_points).map(|bbox| {
        let mut data = bbox.padded(DATA_PADDING);
        // keep degenerate data (one point, a straight line) plottable
        if data.width() == 0.0 || data.height() == 0.0 {
            let half = (data.width().max(data.height()) / 2.0).max(1.0);
            let c = data.center();
            data = Rect::from_corners(
                Point::new(c.x - half, c.y - half),
                Point::new(c.x + half, c.y + half),
            );
        }
        FitTransform::fit(&data, &area)
    });

    if let Some(transform) = transform {
        draw_grid(&mut canvas, &transform, &area);

        for sample in samples {
            for p in &sample.points {
                let q = transform.apply(*p);
                draw_marker(
                    &mut canvas,
                    (q.x.round() as i32, q.y.round() as i32),
                    marker_radius,
                    sample.rgb(),
                );
            }
        }
    }

    let frame = PixelRect::at(area.min.x.round() as i32, area.min.y.round() as i32)
        .of_size(area.width().round().max(1.0) as u32, area.height().round().max(1.0) as u32);
    draw_hollow_rect_mut(&mut canvas, frame, FRAME_COLOR);

    canvas
}

/// Light grid lines at nice data-space spacing, clipped to the plot area
fn draw_grid(canvas: &mut RgbImage, transform: &FitTransform, area: &Rect) {
    let scale = transform.scale();
    if !(scale > 0.0) {
        return;
    }

    // invert the fit to find the data range visible in the plot area
    let origin = transform.apply(Point::new(0.0, 0.0));
    let to_data = |v: f64, o: f64| (v - o) / scale;
    let data_min = Point::new(to_data(area.min.x, origin.x), to_data(area.min.y, origin.y));
    let data_max = Point::new(to_data(area.max.x, origin.x), to_data(area.max.y, origin.y));

    let step = nice_tick_step((data_max.x - data_min.x).max(data_max.y - data_min.y));

    for x in tick_positions(data_min.x, data_max.x, step) {
        let px = transform.apply(Point::new(x, 0.0)).x as f32;
        draw_line_segment_mut(canvas, (px, area.min.y as f32), (px, area.max.y as f32), GRID_COLOR);
    }

    for y in tick_positions(data_min.y, data_max.y, step) {
        let py = transform.apply(Point::new(0.0, y)).y as f32;
        draw_line_segment_mut(canvas, (area.min.x as f32, py), (area.max.x as f32, py), GRID_COLOR);
    }
}
