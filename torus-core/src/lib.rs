//! Torus Core Library - Wireframe torus geometry, rotation and projection
//!
//! This library holds the terminal-independent half of the renderer: the
//! procedural torus mesh, the accumulated rotation, the perspective divide,
//! and the frame loop that strokes each ring onto a [`Surface`].

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod motion;
pub mod projection;
pub mod scheduler;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use color::StrokeColor;
pub use config::SceneConfig;
pub use error::{Result, TorusError};
pub use geometry::{TorusMesh, TorusParams, Vertex3};
pub use motion::{AngularVelocity, Axis, Control, InputController, Motion, Sign, Speed};
pub use projection::{ProjectionSettings, Projector, ScreenPoint};
pub use scheduler::{FrameOutcome, FramePacer, FrameScheduler, Overlay, RunSummary, StopReason};
pub use surface::Surface;
pub use transform::{rotate_point, RotationAngles};
