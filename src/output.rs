use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use csv::WriterBuilder;
use serde::Serialize;

use crate::config::ExportFormat;
use crate::errors::Result;
use crate::geometry::Point;
use crate::sampling::SampledContour;

/// Paths of everything written for one image
#[derive(Debug, Clone, Serialize)]
pub struct OutputPaths {
    pub contours_image: PathBuf,
    pub points_plot: PathBuf,
    pub points_file: PathBuf,
    pub summary: Option<PathBuf>,
}

impl OutputPaths {
    /// `<stem>_contours.png`, `<stem>_points.png`, `<stem>_points.txt` and
    /// optionally `<stem>_summary.json` inside `output_dir`
    pub fn for_image<P: AsRef<Path>>(output_dir: P, filename: &str, with_summary: bool) -> Self {
        let dir = output_dir.as_ref();
        Self {
            contours_image: dir.join(format!("{}_contours.png", filename)),
            points_plot: dir.join(format!("{}_points.png", filename)),
            points_file: dir.join(format!("{}_points.txt", filename)),
            summary: with_summary.then(|| dir.join(format!("{}_summary.json", filename))),
        }
    }
}

/// Per-image record written next to the other outputs
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionSummary {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub contours_found: usize,
    pub contours_kept: usize,
    pub samples: Vec<SampledContour>,
    pub outputs: OutputPaths,
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write sampled points in the requested layout
pub fn write_samples<P: AsRef<Path>>(
    samples: &[SampledContour],
    path: P,
    format: ExportFormat,
) -> Result<()> {
    match format {
        ExportFormat::Points => {
            let points: Vec<Point> = samples.iter().flat_map(|s| s.points.iter().copied()).collect();
            write_points_file(&points, path)
        }
        ExportFormat::Rows => write_rows_file(samples, path),
    }
}

/// One `x,y` pair per line, no header
pub fn write_points_file<P: AsRef<Path>>(points: &[Point], path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    for p in points {
        writer.write_record(&[p.x.to_string(), p.y.to_string()])?;
    }

    writer.flush()?;

    Ok(())
}

/// One line per contour, one `[x y]` cell per sample, no header
pub fn write_rows_file<P: AsRef<Path>>(samples: &[SampledContour], path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    for sample in samples {
        let cells: Vec<String> = sample
            .points
            .iter()
            .map(|p| format!("[{} {}]", p.x, p.y))
            .collect();
        writer.write_record(&cells)?;
    }

    writer.flush()?;

    Ok(())
}

/// Pretty-printed JSON summary
pub fn write_summary<P: AsRef<Path>>(summary: &ExtractionSummary, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut file = fs::File::create(path)?;
    serde_json::to_writer_pretty(&mut file, summary)?;
    file.write_all(b"\n")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("contour_plotter_{}_{}", std::process::id(), name))
    }

    fn samples() -> Vec<SampledContour> {
        vec![
            SampledContour { color: [1, 2, 3], points: vec![Point::new(10.0, 20.0), Point::new(11.0, 21.0)] },
            SampledContour { color: [4, 5, 6], points: vec![Point::new(3.0, 4.0)] },
        ]
    }

    #[test]
    fn points_layout_has_one_pair_per_line() {
        let path = temp_path("points.txt");
        write_samples(&samples(), &path, ExportFormat::Points).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(text, "10,20\n11,21\n3,4\n");
    }

    #[test]
    fn rows_layout_has_one_contour_per_line() {
        let path = temp_path("rows.txt");
        write_samples(&samples(), &path, ExportFormat::Rows).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(text, "[10 20],[11 21]\n[3 4]\n");
    }

    #[test]
    fn output_names_use_image_stem() {
        let paths = OutputPaths::for_image("out", "creature", false);
        assert_eq!(paths.points_file, Path::new("out").join("creature_points.txt"));
        assert_eq!(paths.contours_image, Path::new("out").join("creature_contours.png"));
        assert!(paths.summary.is_none());
    }

    #[test]
    fn summary_is_valid_json() {
        let path = temp_path("summary.json");
        let summary = ExtractionSummary {
            source: PathBuf::from("creature.jpg"),
            width: 64,
            height: 48,
            contours_found: 3,
            contours_kept: 2,
            samples: samples(),
            outputs: OutputPaths::for_image("out", "creature", true),
        };
        write_summary(&summary, &path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(value["contours_kept"], 2);
        assert_eq!(value["samples"][0]["color"][2], 3);
        assert_eq!(value["samples"][1]["points"][0]["x"], 3.0);
    }
}
