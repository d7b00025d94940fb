//! The per-frame loop: integrate, clear, stroke every ring, wait for the next tick.

use tracing::{debug, error, info};

use crate::color::StrokeColor;
use crate::error::Result;
use crate::geometry::{TorusMesh, Vertex3};
use crate::motion::{Motion, Speed};
use crate::projection::Projector;
use crate::surface::Surface;
use crate::transform::{rotate_point, RotationAngles};

/// Host side of the loop: display ticks and the input register.
pub trait FramePacer {
    /// Block until the next display tick and return the motion to apply on it,
    /// read after any input that arrived since the previous tick.
    ///
    /// Returns `None` once the view is being torn down.
    fn next_frame(&mut self) -> Option<Motion>;

    /// Stop delivering ticks and input. Called exactly once, when the loop ends.
    fn detach(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    Stopped,
}

/// Why [`FrameScheduler::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The pacer reported teardown.
    Teardown,
    /// The surface could not be drawn to.
    SurfaceUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames drawn by this call.
    pub frames: u64,
    pub reason: StopReason,
}

/// Help text and speed readout drawn in the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub x: f64,
    pub y: f64,
    pub line_height: f64,
}

impl Overlay {
    pub fn lines(&self, speed: Speed) -> [String; 3] {
        [
            "Hold arrow keys to rotate the torus".to_string(),
            "Use [ and ] to decrease/increase rotation speed".to_string(),
            format!("Current speed: {:.2}", speed.value()),
        ]
    }

    fn draw<S: Surface + ?Sized>(&self, surface: &mut S, speed: Speed) {
        for (row, line) in self.lines(speed).iter().enumerate() {
            surface.fill_text(line, self.x, self.y + row as f64 * self.line_height);
        }
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            x: 16.0,
            y: 16.0,
            line_height: 20.0,
        }
    }
}

/// Owns the animation state and draws one frame per pacer tick.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    mesh: TorusMesh,
    projector: Projector,
    angles: RotationAngles,
    stroke: StrokeColor,
    overlay: Option<Overlay>,
    frames: u64,
    stopped: bool,
}

impl FrameScheduler {
    /// Fails if some rotation of `mesh` would come too close to the camera
    /// for `projector`.
    pub fn new(mesh: TorusMesh, projector: Projector, stroke: StrokeColor) -> Result<Self> {
        projector.check_extent(mesh.params().bounding_radius())?;
        Ok(Self {
            mesh,
            projector,
            angles: RotationAngles::zero(),
            stroke,
            overlay: None,
            frames: 0,
            stopped: false,
        })
    }

    pub fn with_overlay(mut self, overlay: Overlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn mesh(&self) -> &TorusMesh {
        &self.mesh
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Rotation used for the most recently drawn frame.
    pub fn angles(&self) -> RotationAngles {
        self.angles
    }

    /// Frames drawn since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Draw one frame with `motion`, integrating it first.
    ///
    /// A surface failure stops the scheduler for good; later calls are no-ops.
    pub fn step<S: Surface + ?Sized>(&mut self, motion: Motion, surface: &mut S) -> FrameOutcome {
        if self.stopped {
            return FrameOutcome::Stopped;
        }

        match self.draw_frame(motion, surface) {
            Ok(()) => {
                self.frames += 1;
                FrameOutcome::Drawn
            }
            Err(err) => {
                error!(%err, frames = self.frames, "Stopping animation");
                self.stopped = true;
                FrameOutcome::Stopped
            }
        }
    }

    /// Keep drawing until the pacer tears down or the surface goes away.
    pub fn run<P, S>(&mut self, pacer: &mut P, surface: &mut S) -> RunSummary
    where
        P: FramePacer + ?Sized,
        S: Surface + ?Sized,
    {
        info!(
            segments = self.mesh.segments(),
            slices = self.mesh.slices(),
            vertices = self.mesh.len(),
            "Starting frame loop"
        );

        let first_frame = self.frames;
        let reason = loop {
            if self.stopped {
                break StopReason::SurfaceUnavailable;
            }
            let Some(motion) = pacer.next_frame() else {
                break StopReason::Teardown;
            };
            self.step(motion, surface);
        };
        pacer.detach();

        let summary = RunSummary {
            frames: self.frames - first_frame,
            reason,
        };
        info!(frames = summary.frames, reason = ?summary.reason, "Frame loop stopped");
        summary
    }

    fn draw_frame<S: Surface + ?Sized>(&mut self, motion: Motion, surface: &mut S) -> Result<()> {
        let (width, height) = surface.dimensions()?;
        let settings = self.projector.settings();
        if (settings.width, settings.height) != (width, height) {
            debug!(width, height, "Surface resized");
            self.projector.resize(width, height)?;
        }

        // Render with the angles integrated for this frame, not the last one
        self.angles.integrate(&motion);

        surface.clear(width, height);
        surface.set_stroke_color(self.stroke);
        for ring in self.mesh.rings() {
            stroke_ring(surface, &self.projector, ring, &self.angles);
        }
        if let Some(overlay) = &self.overlay {
            overlay.draw(surface, motion.speed);
        }

        surface.present()
    }
}

/// One closed polyline through the projected ring; rings are never joined.
fn stroke_ring<S: Surface + ?Sized>(
    surface: &mut S,
    projector: &Projector,
    ring: &[Vertex3],
    angles: &RotationAngles,
) {
    let mut points = ring
        .iter()
        .map(|vertex| projector.project(&rotate_point(vertex, angles)));
    let Some(first) = points.next() else {
        return;
    };

    surface.begin_path();
    surface.move_to(first.x, first.y);
    for point in points {
        surface.line_to(point.x, point.y);
    }
    surface.close_path();
    surface.stroke();
}
