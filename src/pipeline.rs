// src/pipeline.rs - Contour extraction for one image: edges, contours, samples, outputs

use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::ExtractConfig;
use crate::contours::extract_contours;
use crate::errors::{ContourPlotterError, Result};
use crate::image_io::{get_image_files_in_dir, load_image, save_image, InputImage};
use crate::output::{write_samples, write_summary, ExtractionSummary, OutputPaths};
use crate::palette::palette;
use crate::plot::{render_contours, render_scatter};
use crate::sampling::{sample_contour, SampledContour};

/// Process a single image and write its outputs into `config.output_dir`
pub fn process_image(
    input_image: InputImage,
    config: &ExtractConfig,
    debug: bool,
) -> Result<ExtractionSummary> {
    let InputImage { image, path, filename } = input_image;
    let (width, height) = image.dimensions();
    let output_dir = PathBuf::from(&config.output_dir);
    fs::create_dir_all(&output_dir)?;

    // Step 1: Edge map and contours, longest first
    let extraction = extract_contours(
        &image,
        config.canny_low_threshold,
        config.canny_high_threshold,
        config.max_contours,
    );

    if extraction.contours.is_empty() {
        warn!("No contours found in {}", path.display());
    }

    // Step 2: One color per kept contour
    let colors = palette(extraction.contours.len());

    // Step 3: Representative points
    let samples: Vec<SampledContour> = extraction
        .contours
        .iter()
        .zip(&colors)
        .map(|(contour, &color)| SampledContour {
            color,
            points: sample_contour(&contour.points, config.samples_per_contour),
        })
        .collect();

    // Step 4: Write images and the point export
    let outputs = OutputPaths::for_image(&output_dir, &filename, config.write_summary);

    let contour_canvas = render_contours(
        &extraction.contours,
        &colors,
        width,
        height,
        config.contour_thickness,
    );
    save_image(&contour_canvas, &outputs.contours_image)?;

    let scatter = render_scatter(&samples, config.plot_size, config.marker_radius);
    save_image(&scatter, &outputs.points_plot)?;

    write_samples(&samples, &outputs.points_file, config.export_format)?;

    if debug {
        let debug_dir = output_dir.join("debug");
        fs::create_dir_all(&debug_dir)?;
        extraction
            .edges
            .save_with_format(debug_dir.join(format!("{}_edges.png", filename)), image::ImageFormat::Png)?;

        debug!("Image {}: {}x{} pixels", filename, width, height);
        for (i, (contour, sample)) in extraction.contours.iter().zip(&samples).enumerate() {
            debug!("  contour {}: {} points, color {:?}", i, contour.len(), sample.color);
        }
    }

    let summary = ExtractionSummary {
        source: path,
        width,
        height,
        contours_found: extraction.found,
        contours_kept: extraction.contours.len(),
        samples,
        outputs,
    };

    if let Some(summary_path) = &summary.outputs.summary {
        write_summary(&summary, summary_path)?;
    }

    info!(
        "{}: kept {} of {} contours, wrote {}",
        filename,
        summary.contours_kept,
        summary.contours_found,
        summary.outputs.points_file.display()
    );

    Ok(summary)
}

/// Load and process one file
pub fn process_file<P: AsRef<Path>>(path: P, config: &ExtractConfig, debug: bool) -> Result<ExtractionSummary> {
    let path = path.as_ref();
    info!("Processing: {}", path.display());
    process_image(load_image(path)?, config, debug)
}

/// Process a single image file or every image below a directory.
///
/// In a directory run a failing image is logged and skipped; the error is only
/// returned when nothing could be processed.
pub fn process_input<P: AsRef<Path>>(
    input: P,
    config: &ExtractConfig,
    debug: bool,
) -> Result<Vec<ExtractionSummary>> {
    let input = input.as_ref();

    if input.is_file() {
        return Ok(vec![process_file(input, config, debug)?]);
    }

    if !input.is_dir() {
        return Err(ContourPlotterError::InvalidPath(input.to_path_buf()));
    }

    let files = get_image_files_in_dir(input)?;
    info!("Found {} images in {}", files.len(), input.display());

    let run = |path: &PathBuf| {
        process_file(path, config, debug).map_err(|e| {
            warn!("Skipping {}: {}", path.display(), e);
            e
        })
    };

    let results: Vec<Result<ExtractionSummary>> = if config.use_parallel {
        files.par_iter().map(run).collect()
    } else {
        files.iter().map(run).collect()
    };

    let mut summaries = Vec::new();
    let mut first_error = None;
    for result in results {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) if summaries.is_empty() => Err(e),
        _ => Ok(summaries),
    }
}
