//! Torus Terminal Demo - Rotating Wireframe Torus
//!
//! Controls:
//!   - Arrow Keys: Hold to rotate (left/right yaw, up/down pitch)
//!   - [ / ]: Decrease / increase rotation speed
//!   - Q/ESC: Quit

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use torus_core::{ProjectionSettings, SceneConfig, Speed, StopReason, StrokeColor, TorusParams};
use torus_terminal::{AppOptions, TerminalApp};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "torus-terminal", version, about = "Rotating wireframe torus in the terminal")]
struct Cli {
    /// Radius of the ring (R)
    #[arg(long, default_value_t = TorusParams::DEFAULT_MAJOR_RADIUS)]
    major_radius: f64,

    /// Radius of the tube (r)
    #[arg(long, default_value_t = TorusParams::DEFAULT_MINOR_RADIUS)]
    minor_radius: f64,

    /// Loops around the ring
    #[arg(long, default_value_t = TorusParams::DEFAULT_SEGMENTS)]
    segments: usize,

    /// Points per loop
    #[arg(long, default_value_t = TorusParams::DEFAULT_SLICES)]
    slices: usize,

    /// Perspective strength
    #[arg(long, default_value_t = ProjectionSettings::DEFAULT_FOV)]
    fov: f64,

    /// Distance added to z before the perspective divide
    #[arg(long, default_value_t = ProjectionSettings::DEFAULT_CAMERA_OFFSET)]
    camera_offset: f64,

    /// Canvas width in pixels, fitted to the terminal
    #[arg(long, default_value_t = ProjectionSettings::DEFAULT_WIDTH)]
    width: u32,

    /// Canvas height in pixels, fitted to the terminal
    #[arg(long, default_value_t = ProjectionSettings::DEFAULT_HEIGHT)]
    height: u32,

    /// Frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Initial rotation speed, 0.01 to 0.10
    #[arg(long, default_value_t = 0.05)]
    speed: f64,

    /// Wireframe colour, #RRGGBB or #RGB
    #[arg(long, default_value = "#00FFFF")]
    stroke: StrokeColor,

    /// How long a rotation key counts as held without repeats, on terminals
    /// that don't report key releases
    #[arg(long, default_value_t = 500)]
    hold_timeout_ms: u64,

    /// Hide the help text and speed readout
    #[arg(long)]
    no_hud: bool,

    /// Write logs to this file (the terminal is busy drawing)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            major_radius: self.major_radius,
            minor_radius: self.minor_radius,
            segments: self.segments,
            slices: self.slices,
            projection: ProjectionSettings {
                fov: self.fov,
                camera_offset: self.camera_offset,
                width: self.width,
                height: self.height,
            },
            stroke: self.stroke,
            initial_speed: Speed::from_value(self.speed),
            overlay: !self.no_hud,
        }
    }

    fn app_options(&self) -> AppOptions {
        AppOptions {
            fps: self.fps,
            hold_timeout: Duration::from_millis(self.hold_timeout_ms),
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let mut app = TerminalApp::new(&cli.scene_config(), cli.app_options())
        .context("Invalid torus configuration")?;

    let summary = app.run().context("Terminal I/O failed")?;
    if summary.reason == StopReason::SurfaceUnavailable {
        eprintln!(
            "Terminal became unavailable after {} frames; animation stopped.",
            summary.frames
        );
    }

    Ok(())
}
