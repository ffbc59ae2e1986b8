// src/command.rs - Robot motion commands and their script text

use std::fmt;

/// How the arm travels to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionType {
    /// `movej`: joint-space move, path chosen by the controller
    Joint,
    /// `movel`: straight-line move of the end effector
    Linear,
}

impl MotionType {
    pub fn suffix(self) -> char {
        match self {
            MotionType::Joint => 'j',
            MotionType::Linear => 'l',
        }
    }
}

/// One motion command: six target values plus how to interpret them.
///
/// With `is_pose` the target is a Cartesian pose `(x, y, z, rx, ry, rz)`
/// (meters and radians), otherwise six joint angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseCommand {
    pub target: [f64; 6],
    pub motion: MotionType,
    pub is_pose: bool,
    pub acceleration: Option<f64>,
    pub velocity: Option<f64>,
}

impl PoseCommand {
    /// Joint move to the given joint angles
    pub fn joint(joints: [f64; 6]) -> Self {
        Self {
            target: joints,
            motion: MotionType::Joint,
            is_pose: false,
            acceleration: None,
            velocity: None,
        }
    }

    /// Linear move to a Cartesian pose
    pub fn linear_pose(pose: [f64; 6]) -> Self {
        Self {
            target: pose,
            motion: MotionType::Linear,
            is_pose: true,
            acceleration: None,
            velocity: None,
        }
    }

    pub fn with_speed(mut self, acceleration: Option<f64>, velocity: Option<f64>) -> Self {
        self.acceleration = acceleration;
        self.velocity = velocity;
        self
    }

    /// The command line sent to the controller, newline included
    pub fn to_script(&self) -> String {
        format!("{}\n", self)
    }
}

/// Decimal places used when the shortest form would need an exponent
const FIXED_DECIMALS: usize = 9;

/// Plain decimal text with a decimal point (`0.0`, `-1.57`).
///
/// Shortest round-trip form where that is plain decimal; magnitudes that would
/// print with an exponent are written with at most nine decimal places, so a
/// fitted coordinate of `1e-17` goes out as `0.0`.
pub fn format_float(value: f64) -> String {
    let shortest = format!("{:?}", value);
    if !value.is_finite() || !shortest.contains('e') {
        return shortest;
    }

    let fixed = format!("{:.*}", FIXED_DECIMALS, value);
    let trimmed = fixed.trim_end_matches('0');
    let text = if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    };

    if text == "-0.0" {
        "0.0".to_string()
    } else {
        text
    }
}

impl fmt::Display for PoseCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.target.iter().map(|&v| format_float(v)).collect();

        write!(
            f,
            "move{}({}[{}]",
            self.motion.suffix(),
            if self.is_pose { "p" } else { "" },
            values.join(", ")
        )?;

        if let Some(a) = self.acceleration {
            write!(f, ", a={}", format_float(a))?;
        }
        if let Some(v) = self.velocity {
            write!(f, ", v={}", format_float(v))?;
        }

        write!(f, ")")
    }
}
