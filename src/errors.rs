use thiserror::Error;
use std::io;
use std::path::PathBuf;

/// Custom error types for contour_plotter
#[derive(Error, Debug)]
pub enum ContourPlotterError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Point file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Summary serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid point on line {line}: {message}")]
    PointParse {
        line: usize,
        message: String,
    },

    #[error("Invalid input path: {0}")]
    InvalidPath(PathBuf),

    #[error("Failed to reach robot at {address}: {source}")]
    Connection {
        address: String,
        source: io::Error,
    },
}

/// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, ContourPlotterError>;
