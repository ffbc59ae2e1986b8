// src/robot.rs - Streaming motion commands to the arm and planning a drawing

use std::io::Write;
use std::net::TcpStream;
use std::thread;
use std::time::Duration;
use log::{debug, error, info};

use crate::command::PoseCommand;
use crate::config::RobotConfig;
use crate::errors::{ContourPlotterError, Result};
use crate::geometry::{fit_into, Point, Rect};

/// Sends each command over its own TCP connection.
///
/// The controller never acknowledges a move, so after every write the client
/// waits a fixed delay that should cover the motion.
pub struct RobotClient {
    address: String,
    settle_delay: Duration,
}

/// Outcome counts of a command batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendReport {
    pub sent: usize,
    pub failed: usize,
}

impl RobotClient {
    pub fn new(address: impl Into<String>, settle_delay: Duration) -> Self {
        Self {
            address: address.into(),
            settle_delay,
        }
    }

    pub fn from_config(config: &RobotConfig) -> Self {
        Self::new(config.address(), Duration::from_millis(config.command_delay_ms))
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Connect, write the command line, close, then wait the settle delay
    pub fn send(&self, command: &PoseCommand) -> Result<()> {
        let script = command.to_script();
        debug!("Connecting to {}", self.address);

        {
            let mut stream = TcpStream::connect(self.address.as_str()).map_err(|source| {
                ContourPlotterError::Connection {
                    address: self.address.clone(),
                    source,
                }
            })?;

            info!("Sending {}", script.trim_end());
            stream.write_all(script.as_bytes())?;
            stream.flush()?;
        }

        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }

        Ok(())
    }

    /// Send every command in order; failures are logged and skipped
    pub fn send_all(&self, commands: &[PoseCommand]) -> SendReport {
        let mut report = SendReport::default();

        for (i, command) in commands.iter().enumerate() {
            match self.send(command) {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    error!("Command {} of {} failed: {}", i + 1, commands.len(), e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}

/// Linear pen-down move to a canvas point
fn pen_move(point: Point, config: &RobotConfig) -> PoseCommand {
    let [rx, ry, rz] = config.orientation;
    PoseCommand::linear_pose([point.x, point.y, config.pen_z, rx, ry, rz])
        .with_speed(config.acceleration, config.velocity)
}

fn home_move(config: &RobotConfig) -> PoseCommand {
    PoseCommand::joint(config.home_joints).with_speed(config.acceleration, config.velocity)
}

/// The drawing area on the canvas
pub fn drawing_area(config: &RobotConfig) -> Rect {
    let [a, b] = config.bounds;
    Rect::from_corners(Point::new(a[0], a[1]), Point::new(b[0], b[1]))
}

/// Startup joint moves that put the arm into its default configuration
pub fn plan_home(config: &RobotConfig) -> Vec<PoseCommand> {
    config
        .startup_joints
        .iter()
        .map(|&joints| PoseCommand::joint(joints).with_speed(config.acceleration, config.velocity))
        .collect()
}

/// Linear moves around the drawing area at pen height
pub fn plan_bounding_box(config: &RobotConfig) -> Vec<PoseCommand> {
    drawing_area(config)
        .corners()
        .iter()
        .map(|&corner| pen_move(corner, config))
        .collect()
}

/// Map source points into canvas coordinates as configured
pub fn to_canvas(points: &[Point], config: &RobotConfig) -> Vec<Point> {
    let points: Vec<Point> = if config.swap_axes {
        points.iter().map(|p| p.swapped()).collect()
    } else {
        points.to_vec()
    };

    if config.fit_to_bounds {
        fit_into(&points, &drawing_area(config))
    } else {
        points
    }
}

/// Full command sequence for drawing `points`.
///
/// Startup moves, an optional trace of the drawing area, then one linear move
/// per point with a home joint move ("pen lift") before every
/// `lift_every`-th point, and a final return home.
pub fn plan_drawing(points: &[Point], config: &RobotConfig) -> Vec<PoseCommand> {
    let mut commands = plan_home(config);

    if config.trace_bounding_box {
        commands.extend(plan_bounding_box(config));
    }

    for (i, point) in to_canvas(points, config).into_iter().enumerate() {
        if config.lift_every > 0 && i % config.lift_every == 0 {
            commands.push(home_move(config));
        }
        commands.push(pen_move(point, config));
    }

    commands.push(home_move(config));
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MotionType;
    use assert_approx_eq::assert_approx_eq;
    use std::io::Read;
    use std::net::TcpListener;
    use std::time::Instant;

    fn square(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new((i % 4) as f64 * 10.0, (i / 4) as f64 * 10.0)).collect()
    }

    #[test]
    fn pen_lifts_every_fifth_point() {
        let config = RobotConfig::default();
        let commands = plan_drawing(&square(12), &config);

        // 2 startup + 3 lifts + 12 points + final home
        assert_eq!(commands.len(), 2 + 3 + 12 + 1);

        let body = &commands[2..commands.len() - 1];
        let lift_positions: Vec<usize> = body
            .iter()
            .enumerate()
            .filter(|(_, c)| c.motion == MotionType::Joint)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(lift_positions, vec![0, 6, 12]);

        let last = commands.last().unwrap();
        assert_eq!(last.motion, MotionType::Joint);
        assert_eq!(last.target, config.home_joints);
    }

    #[test]
    fn lifts_can_be_disabled() {
        let config = RobotConfig { lift_every: 0, ..RobotConfig::default() };
        let commands = plan_drawing(&square(7), &config);
        assert_eq!(commands.len(), 2 + 7 + 1);
    }

    #[test]
    fn drawn_points_stay_inside_bounds() {
        let config = RobotConfig::default();
        let area = drawing_area(&config);
        let commands = plan_drawing(&square(16), &config);

        for cmd in commands.iter().filter(|c| c.motion == MotionType::Linear) {
            assert!(cmd.is_pose);
            assert!(cmd.target[0] >= area.min.x - 1e-12 && cmd.target[0] <= area.max.x + 1e-12);
            assert!(cmd.target[1] >= area.min.y - 1e-12 && cmd.target[1] <= area.max.y + 1e-12);
            assert_approx_eq!(cmd.target[2], config.pen_z);
            assert_approx_eq!(cmd.target[3], 2.832);
        }
    }

    #[test]
    fn unfitted_points_pass_through() {
        let config = RobotConfig { fit_to_bounds: false, swap_axes: true, ..RobotConfig::default() };
        let canvas = to_canvas(&[Point::new(0.1, -0.3)], &config);
        assert_eq!(canvas, vec![Point::new(-0.3, 0.1)]);
    }

    #[test]
    fn bounding_box_trace_visits_four_corners() {
        let config = RobotConfig { trace_bounding_box: true, ..RobotConfig::default() };
        let trace = plan_bounding_box(&config);
        assert_eq!(trace.len(), 4);
        assert_eq!(
            trace[0].to_script(),
            "movel(p[-0.443, -0.295, 0.0265, 2.832, -1.291, -0.0221])\n"
        );

        let commands = plan_drawing(&[], &config);
        assert_eq!(commands.len(), 2 + 4 + 1);
    }

    #[test]
    fn home_plan_uses_startup_joints() {
        let commands = plan_home(&RobotConfig::default());
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].to_script(), "movej([0.0, -1.57, 0.0, -1.57, 0.0, 0.0])\n");
        assert_eq!(commands[1].to_script(), "movej([0.0, -1.04, 1.04, -1.57, -1.57, 0.0])\n");
    }

    #[test]
    fn each_command_uses_its_own_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let server = thread::spawn(move || {
            let mut received = Vec::new();
            for _ in 0..2 {
                let (mut stream, _) = listener.accept().unwrap();
                let mut text = String::new();
                stream.read_to_string(&mut text).unwrap();
                received.push(text);
            }
            received
        });

        let client = RobotClient::new(address, Duration::ZERO);
        let commands = plan_home(&RobotConfig::default());
        let report = client.send_all(&commands);
        let received = server.join().unwrap();

        assert_eq!(report, SendReport { sent: 2, failed: 0 });
        assert_eq!(received[0], commands[0].to_script());
        assert_eq!(received[1], commands[1].to_script());
    }

    #[test]
    fn failures_are_counted_and_skipped() {
        // bind then drop to get a port with nothing listening
        let address = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().to_string()
        };

        let client = RobotClient::new(address, Duration::ZERO);
        let report = client.send_all(&plan_home(&RobotConfig::default()));
        assert_eq!(report, SendReport { sent: 0, failed: 2 });
    }

    #[test]
    fn waits_settle_delay_after_each_send() {
        let delay = Duration::from_millis(150);
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let server = thread::spawn(move || {
            for _ in 0..2 {
                let (mut stream, _) = listener.accept().unwrap();
                let mut text = String::new();
                stream.read_to_string(&mut text).unwrap();
            }
        });

        let client = RobotClient::new(address, delay);
        let started = Instant::now();
        let report = client.send_all(&plan_home(&RobotConfig::default()));
        let elapsed = started.elapsed();
        server.join().unwrap();

        assert_eq!(report, SendReport { sent: 2, failed: 0 });
        assert!(elapsed >= delay * 2, "returned after {:?}", elapsed);
    }

    #[test]
    fn failed_sends_do_not_wait() {
        let delay = Duration::from_millis(500);
        let address = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().to_string()
        };

        let client = RobotClient::new(address, delay);
        let started = Instant::now();
        let report = client.send_all(&plan_home(&RobotConfig::default()));
        let elapsed = started.elapsed();

        assert_eq!(report, SendReport { sent: 0, failed: 2 });
        assert!(elapsed < delay, "returned after {:?}", elapsed);
    }
}
