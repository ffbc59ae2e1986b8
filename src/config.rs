// src/config.rs - TOML configuration for contour extraction and robot driving

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::{ContourPlotterError, Result};

/// Configuration for contour_plotter
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub extract: ExtractConfig,

    #[serde(default)]
    pub robot: RobotConfig,
}

/// Contour extraction settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExtractConfig {
    #[serde(default = "default_input_path")]
    pub input_path: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    // Canny hysteresis thresholds
    #[serde(default = "default_canny_low_threshold")]
    pub canny_low_threshold: f32,

    #[serde(default = "default_canny_high_threshold")]
    pub canny_high_threshold: f32,

    /// Number of longest contours kept after sorting
    #[serde(default = "default_max_contours")]
    pub max_contours: usize,

    #[serde(default = "default_samples_per_contour")]
    pub samples_per_contour: usize,

    /// Stroke width of the contour visualisation, in pixels
    #[serde(default = "default_contour_thickness")]
    pub contour_thickness: u32,

    #[serde(default = "default_marker_radius")]
    pub marker_radius: u32,

    #[serde(default = "default_plot_size")]
    pub plot_size: [u32; 2],

    #[serde(default)]
    pub export_format: ExportFormat,

    #[serde(default = "default_true")]
    pub write_summary: bool,

    #[serde(default = "default_true")]
    pub use_parallel: bool,
}

/// Layout of the sampled-point text export
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// One `x,y` pair per line
    #[default]
    Points,
    /// One line per contour, one `[x y]` cell per sample
    Rows,
}

/// Robot connection and drawing settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RobotConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Wall-clock wait after each command is written
    #[serde(default = "default_command_delay_ms")]
    pub command_delay_ms: u64,

    #[serde(default = "default_points_path")]
    pub points_path: String,

    /// Pen-down height of linear moves (meters)
    #[serde(default = "default_pen_z")]
    pub pen_z: f64,

    /// Tool orientation (rx, ry, rz) in radians
    #[serde(default = "default_orientation")]
    pub orientation: [f64; 3],

    /// Two opposite corners of the drawing area on the canvas
    #[serde(default = "default_bounds")]
    pub bounds: [[f64; 2]; 2],

    #[serde(default = "default_true")]
    pub fit_to_bounds: bool,

    #[serde(default)]
    pub swap_axes: bool,

    #[serde(default)]
    pub trace_bounding_box: bool,

    /// Insert a pen lift before every n-th point (0 disables)
    #[serde(default = "default_lift_every")]
    pub lift_every: usize,

    #[serde(default = "default_home_joints")]
    pub home_joints: [f64; 6],

    #[serde(default = "default_startup_joints")]
    pub startup_joints: Vec<[f64; 6]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
}

fn default_true() -> bool {
    true
}

fn default_input_path() -> String {
    "creature.jpg".to_string()
}

fn default_output_dir() -> String {
    "./output".to_string()
}

fn default_canny_low_threshold() -> f32 {
    50.0
}

fn default_canny_high_threshold() -> f32 {
    150.0
}

fn default_max_contours() -> usize {
    100
}

fn default_samples_per_contour() -> usize {
    5
}

fn default_contour_thickness() -> u32 {
    2
}

fn default_marker_radius() -> u32 {
    5 // 8pt marker at 100 dpi
}

fn default_plot_size() -> [u32; 2] {
    [1000, 1000]
}

fn default_host() -> String {
    "192.168.56.101".to_string()
}

fn default_port() -> u16 {
    30001 // primary client interface
}

fn default_command_delay_ms() -> u64 {
    7000
}

fn default_points_path() -> String {
    "points.txt".to_string()
}

fn default_pen_z() -> f64 {
    0.0265
}

fn default_orientation() -> [f64; 3] {
    [2.832, -1.291, -0.0221]
}

// x is vertical relative to the arm (decreasing x moves the pen up),
// decreasing y moves the pen left
fn default_bounds() -> [[f64; 2]; 2] {
    [[-0.156, 0.271], [-0.443, -0.295]]
}

fn default_lift_every() -> usize {
    5
}

fn default_home_joints() -> [f64; 6] {
    [0.0, -1.04, 1.04, -1.57, -1.57, 0.0]
}

fn default_startup_joints() -> Vec<[f64; 6]> {
    vec![
        [0.0, -1.57, 0.0, -1.57, 0.0, 0.0],
        [0.0, -1.04, 1.04, -1.57, -1.57, 0.0],
    ]
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_dir: default_output_dir(),
            canny_low_threshold: default_canny_low_threshold(),
            canny_high_threshold: default_canny_high_threshold(),
            max_contours: default_max_contours(),
            samples_per_contour: default_samples_per_contour(),
            contour_thickness: default_contour_thickness(),
            marker_radius: default_marker_radius(),
            plot_size: default_plot_size(),
            export_format: ExportFormat::default(),
            write_summary: true,
            use_parallel: true,
        }
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            command_delay_ms: default_command_delay_ms(),
            points_path: default_points_path(),
            pen_z: default_pen_z(),
            orientation: default_orientation(),
            bounds: default_bounds(),
            fit_to_bounds: true,
            swap_axes: false,
            trace_bounding_box: false,
            lift_every: default_lift_every(),
            home_joints: default_home_joints(),
            startup_joints: default_startup_joints(),
            acceleration: None,
            velocity: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ContourPlotterError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ContourPlotterError::Config(msg) => {
                ContourPlotterError::Config(format!("Failed to parse config file '{}': {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ContourPlotterError::Config(e.to_string()))
    }

    /// Load the file if it exists, otherwise fall back to the built-in defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.extract.validate()?;
        self.robot.validate()
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            ContourPlotterError::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content)?;

        Ok(())
    }
}

impl ExtractConfig {
    pub fn validate(&self) -> Result<()> {
        if self.canny_low_threshold < 0.0 || self.canny_high_threshold <= 0.0 {
            return Err(ContourPlotterError::Config(
                "canny thresholds must be positive".to_string(),
            ));
        }

        if self.canny_low_threshold > self.canny_high_threshold {
            return Err(ContourPlotterError::Config(
                "canny_low_threshold must be <= canny_high_threshold".to_string(),
            ));
        }

        if self.max_contours == 0 {
            return Err(ContourPlotterError::Config(
                "max_contours must be > 0".to_string(),
            ));
        }

        if self.samples_per_contour == 0 {
            return Err(ContourPlotterError::Config(
                "samples_per_contour must be > 0".to_string(),
            ));
        }

        if self.contour_thickness == 0 {
            return Err(ContourPlotterError::Config(
                "contour_thickness must be > 0".to_string(),
            ));
        }

        if self.plot_size[0] == 0 || self.plot_size[1] == 0 {
            return Err(ContourPlotterError::Config(
                "plot_size dimensions must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl RobotConfig {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ContourPlotterError::Config("host must not be empty".to_string()));
        }

        if self.port == 0 {
            return Err(ContourPlotterError::Config("port must be > 0".to_string()));
        }

        let [a, b] = self.bounds;
        if a[0] == b[0] || a[1] == b[1] {
            return Err(ContourPlotterError::Config(
                "bounds must span a non-empty rectangle".to_string(),
            ));
        }

        let all_finite = a.iter().chain(b.iter()).all(|v| v.is_finite())
            && self.pen_z.is_finite()
            && self.orientation.iter().all(|v| v.is_finite());
        if !all_finite {
            return Err(ContourPlotterError::Config(
                "bounds, pen_z and orientation must be finite".to_string(),
            ));
        }

        for value in [self.acceleration, self.velocity].into_iter().flatten() {
            if !(value.is_finite() && value > 0.0) {
                return Err(ContourPlotterError::Config(
                    "acceleration and velocity must be > 0.0".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Socket address string of the robot's command port
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config = Config::from_toml_str(
            r#"
            [extract]
            max_contours = 20

            [robot]
            host = "10.0.0.2"
            velocity = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.extract.max_contours, 20);
        assert_eq!(config.extract.samples_per_contour, 5);
        assert_eq!(config.robot.host, "10.0.0.2");
        assert_eq!(config.robot.port, 30001);
        assert_eq!(config.robot.velocity, Some(0.25));
        assert_eq!(config.robot.acceleration, None);
        assert_eq!(config.robot.address(), "10.0.0.2:30001");
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_canny_thresholds() {
        let mut config = Config::default();
        config.extract.canny_low_threshold = 200.0;
        assert!(matches!(config.validate(), Err(ContourPlotterError::Config(_))));
    }

    #[test]
    fn extract_section_validates_on_its_own() {
        let mut config = Config::default();
        config.robot.host = "  ".to_string();
        config.robot.bounds = [[0.0, 0.0], [0.0, 0.0]];

        assert!(config.extract.validate().is_ok());
        assert!(config.robot.validate().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_degenerate_bounds() {
        let mut config = Config::default();
        config.robot.bounds = [[0.1, 0.2], [0.1, 0.5]];
        assert!(config.validate().is_err());
    }

    #[test]
    fn export_format_parses_lowercase() {
        let config = Config::from_toml_str("[extract]\nexport_format = \"rows\"\n").unwrap();
        assert_eq!(config.extract.export_format, ExportFormat::Rows);
    }

    #[test]
    fn saved_config_loads_back() {
        let path = std::env::temp_dir().join(format!("contour_plotter_cfg_{}.toml", std::process::id()));
        let mut config = Config::default();
        config.robot.acceleration = Some(1.2);
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = Config::load_or_default("definitely/not/here.toml").unwrap();
        assert_eq!(config, Config::default());
    }
}
