use std::path::PathBuf;
use std::time::Instant;
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::info;

use contour_plotter_lib::command::PoseCommand;
use contour_plotter_lib::config::Config;
use contour_plotter_lib::pipeline::process_input;
use contour_plotter_lib::point_file::read_points_file;
use contour_plotter_lib::robot::{plan_drawing, plan_home, RobotClient};

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about = "Contour Plotter - image contours to robot drawings")]
struct Args {
    /// Path to configuration file (defaults are used if it does not exist)
    #[clap(short, long, default_value = "config.toml", global = true)]
    config: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract contours from an image (or a directory of images) and sample points
    Extract {
        /// Path to input file or directory
        #[clap(short, long)]
        input: Option<String>,

        /// Path to output directory
        #[clap(short, long)]
        output: Option<String>,

        /// Save the edge map and log per-contour detail
        #[clap(short, long)]
        debug: bool,
    },

    /// Stream a point file to the robot as drawing moves
    Draw {
        /// Point file with one x,y pair per line
        #[clap(short, long)]
        points: Option<String>,

        #[clap(long)]
        host: Option<String>,

        #[clap(long)]
        port: Option<u16>,

        /// Wait after each command, in milliseconds
        #[clap(long)]
        delay_ms: Option<u64>,

        /// Send points as-is instead of fitting them into the drawing area
        #[clap(long)]
        no_fit: bool,

        /// Trace the drawing area before drawing
        #[clap(long)]
        bounding_box: bool,

        /// Print the commands instead of sending them
        #[clap(long)]
        dry_run: bool,
    },

    /// Put the robot into its default configuration
    Home {
        #[clap(long)]
        dry_run: bool,
    },

    /// Write the default configuration to a TOML file
    InitConfig {
        #[clap(default_value = "config.toml")]
        path: String,
    },
}

fn send_or_print(client: &RobotClient, commands: &[PoseCommand], dry_run: bool) {
    if dry_run {
        for command in commands {
            print!("{}", command.to_script());
        }
        return;
    }

    info!("Sending {} commands to {}", commands.len(), client.address());
    let report = client.send_all(commands);
    info!("Done: {} sent, {} failed", report.sent, report.failed);
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    Config::load_or_default(path).with_context(|| format!("loading configuration {}", path))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Command::InitConfig { path } => {
            Config::default()
                .save_to_file(&path)
                .with_context(|| format!("writing default configuration to {}", path))?;
            info!("Wrote default configuration to {}", path);
        }

        Command::Extract { input, output, debug } => {
            let mut config = load_config(&args.config)?;

            // Override config with command-line arguments
            if let Some(input) = input {
                config.extract.input_path = input;
            }
            if let Some(output) = output {
                config.extract.output_dir = output;
            }
            config.extract.validate()?;

            let start_time = Instant::now();
            let input_path = PathBuf::from(&config.extract.input_path);
            let summaries = process_input(&input_path, &config.extract, debug)
                .with_context(|| format!("extracting contours from {}", input_path.display()))?;

            if summaries.is_empty() {
                bail!("no images found in {}", input_path.display());
            }

            info!(
                "Processed {} image(s) in {:.2} seconds",
                summaries.len(),
                start_time.elapsed().as_secs_f64()
            );
        }

        Command::Draw { points, host, port, delay_ms, no_fit, bounding_box, dry_run } => {
            let mut config = load_config(&args.config)?;

            if let Some(points) = points {
                config.robot.points_path = points;
            }
            if let Some(host) = host {
                config.robot.host = host;
            }
            if let Some(port) = port {
                config.robot.port = port;
            }
            if let Some(delay_ms) = delay_ms {
                config.robot.command_delay_ms = delay_ms;
            }
            if no_fit {
                config.robot.fit_to_bounds = false;
            }
            if bounding_box {
                config.robot.trace_bounding_box = true;
            }
            config.validate()?;

            let points = read_points_file(&config.robot.points_path)
                .with_context(|| format!("reading points from {}", config.robot.points_path))?;
            info!("Loaded {} points from {}", points.len(), config.robot.points_path);

            let commands = plan_drawing(&points, &config.robot);
            send_or_print(&RobotClient::from_config(&config.robot), &commands, dry_run);
        }

        Command::Home { dry_run } => {
            let config = load_config(&args.config)?;
            config.robot.validate()?;
            info!("Putting robot into default configuration");
            let commands = plan_home(&config.robot);
            send_or_print(&RobotClient::from_config(&config.robot), &commands, dry_run);
        }
    }

    Ok(())
}
