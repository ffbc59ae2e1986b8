use bresenham::Bresenham;
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

/// Canvas background
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Convert an RGB image to single-channel luminance
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    image::imageops::grayscale(image)
}

/// Create a blank white canvas
pub fn blank_canvas(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

/// Check if a point is inside the image bounds
#[inline]
pub fn in_bounds(x: i32, y: i32, width: u32, height: u32) -> bool {
    x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height
}

/// Paint a `size` x `size` square roughly centered on (x, y), clipped to the canvas
pub fn stamp_square(canvas: &mut RgbImage, x: i32, y: i32, size: u32, color: Rgb<u8>) {
    let (width, height) = canvas.dimensions();
    let half = (size / 2) as i32;

    for dy in 0..size as i32 {
        for dx in 0..size as i32 {
            let px = x - half + dx;
            let py = y - half + dy;

            if in_bounds(px, py, width, height) {
                canvas.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

/// Trace a straight line between two pixels using Bresenham's algorithm.
///
/// The end point is included.
pub fn trace_straight_line(start: (i32, i32), end: (i32, i32)) -> Vec<(i32, i32)> {
    let mut line: Vec<(i32, i32)> = Bresenham::new(
        (start.0 as isize, start.1 as isize),
        (end.0 as isize, end.1 as isize),
    )
    .map(|(x, y)| (x as i32, y as i32))
    .collect();

    // Bresenham yields the half-open segment
    line.push(end);
    line
}

/// Draw a polyline with the given stroke thickness.
///
/// When `closed` is set the last vertex is joined back to the first.
pub fn draw_polyline(
    canvas: &mut RgbImage,
    vertices: &[(i32, i32)],
    color: Rgb<u8>,
    thickness: u32,
    closed: bool,
) {
    match vertices {
        [] => {}
        [single] => stamp_square(canvas, single.0, single.1, thickness, color),
        _ => {
            let mut segments: Vec<((i32, i32), (i32, i32))> =
                vertices.windows(2).map(|w| (w[0], w[1])).collect();
            if closed {
                segments.push((vertices[vertices.len() - 1], vertices[0]));
            }

            for (start, end) in segments {
                for (x, y) in trace_straight_line(start, end) {
                    stamp_square(canvas, x, y, thickness, color);
                }
            }
        }
    }
}

/// Draw a filled circular marker
pub fn draw_marker(canvas: &mut RgbImage, center: (i32, i32), radius: u32, color: Rgb<u8>) {
    draw_filled_circle_mut(canvas, center, radius as i32, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_includes_both_endpoints() {
        let line = trace_straight_line((0, 0), (4, 2));
        assert_eq!(line.first(), Some(&(0, 0)));
        assert_eq!(line.last(), Some(&(4, 2)));
        assert_eq!(line.len(), 5);
    }

    #[test]
    fn stamp_is_clipped_to_canvas() {
        let mut canvas = blank_canvas(4, 4);
        stamp_square(&mut canvas, 0, 0, 3, Rgb([0, 0, 0]));
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*canvas.get_pixel(1, 1), Rgb([0, 0, 0]));
        assert_eq!(*canvas.get_pixel(2, 2), WHITE);
    }

    #[test]
    fn closed_polyline_joins_last_to_first() {
        let red = Rgb([255, 0, 0]);
        let mut canvas = blank_canvas(10, 10);
        draw_polyline(&mut canvas, &[(1, 1), (8, 1), (8, 8)], red, 1, true);

        // the closing diagonal passes through (4, 4)
        assert_eq!(*canvas.get_pixel(4, 4), red);
        assert_eq!(*canvas.get_pixel(1, 8), WHITE);
    }

    #[test]
    fn grayscale_keeps_dimensions() {
        let gray = to_grayscale(&blank_canvas(7, 3));
        assert_eq!(gray.dimensions(), (7, 3));
        assert_eq!(gray.get_pixel(0, 0)[0], 255);
    }
}
