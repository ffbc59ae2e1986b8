// src/lib.rs - Library interface for contour_plotter

pub mod command;
pub mod config;
pub mod contours;
pub mod errors;
pub mod geometry;
pub mod image_io;
pub mod image_utils;
pub mod output;
pub mod palette;
pub mod pipeline;
pub mod plot;
pub mod point_file;
pub mod robot;
pub mod sampling;

// Re-export commonly used types and functions
pub use errors::{ContourPlotterError, Result};
pub use config::{Config, ExportFormat, ExtractConfig, RobotConfig};
pub use pipeline::{process_file, process_image, process_input};
pub use image_io::{InputImage, load_image, save_image};

pub use geometry::{bounding_box, fit_into, FitTransform, Point, Rect};
pub use sampling::{sample_contour, sample_indices, SampledContour};
pub use contours::{extract_contours, Contour};
pub use output::{write_points_file, ExtractionSummary};
pub use point_file::{parse_points, read_points_file};

// Robot side
pub use command::{MotionType, PoseCommand};
pub use robot::{plan_drawing, plan_home, RobotClient, SendReport};
