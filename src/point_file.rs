// src/point_file.rs - Reading comma-delimited x,y point lists

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::errors::{ContourPlotterError, Result};
use crate::geometry::Point;

/// Read `x,y` pairs, one per line, no header
pub fn read_points_file<P: AsRef<Path>>(path: P) -> Result<Vec<Point>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        ContourPlotterError::Config(format!("Failed to open point file '{}': {}", path.display(), e))
    })?;

    parse_points(file)
}

/// Parse `x,y` pairs from any reader.
///
/// Whitespace around values is ignored and blank lines are skipped; any other
/// field count is an error naming the 1-based line, blank lines included.
pub fn parse_points<R: Read>(input: R) -> Result<Vec<Point>> {
    let mut points = Vec::new();

    for (index, text) in BufReader::new(input).lines().enumerate() {
        let text = text?;
        let line = index + 1;
        let text = text.trim();

        if text.is_empty() {
            continue;
        }

        let fields: Vec<&str> = text.split(',').map(str::trim).collect();
        if fields.len() != 2 {
            return Err(ContourPlotterError::PointParse {
                line,
                message: format!("expected 2 values, found {}", fields.len()),
            });
        }

        let parse = |field: &str| {
            field.parse::<f64>().map_err(|e| ContourPlotterError::PointParse {
                line,
                message: format!("'{}': {}", field, e),
            })
        };

        points.push(Point::new(parse(fields[0])?, parse(fields[1])?));
    }

    Ok(points)
}
