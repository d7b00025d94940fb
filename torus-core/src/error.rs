//! Error types for torus configuration and rendering.

use thiserror::Error;

/// Errors raised while validating a scene or driving the drawing surface.
#[derive(Debug, Error)]
pub enum TorusError {
    /// A radius is not a positive finite number.
    #[error("invalid {name} radius: {value} (must be finite and > 0)")]
    InvalidRadius {
        /// Which radius was rejected ("major" or "minor").
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The tube is wider than the ring, so the surface folds through its own axis.
    #[error("minor radius {minor} exceeds major radius {major}")]
    SelfIntersecting {
        /// Major radius R.
        major: f64,
        /// Minor radius r.
        minor: f64,
    },

    /// Too few divisions to form a closed ring.
    #[error("invalid {name} count: {value} (need at least {min})")]
    TooFewDivisions {
        /// Which count was rejected ("segment" or "slice").
        name: &'static str,
        /// The rejected value.
        value: usize,
        /// Smallest accepted value.
        min: usize,
    },

    /// Field of view is not a positive finite number.
    #[error("invalid field of view: {0} (must be finite and > 0)")]
    InvalidFov(f64),

    /// Camera offset is not a positive finite number.
    #[error("invalid camera offset: {0} (must be finite and > 0)")]
    InvalidCameraOffset(f64),

    /// Some vertex could come within `MIN_DEPTH` of the perspective divide.
    #[error(
        "torus extent {extent} is too close to camera offset {offset}: \
         depth z + offset could fall below {min_depth}"
    )]
    DepthTooShallow {
        /// Bounding radius R + r.
        extent: f64,
        /// Camera offset added to z.
        offset: f64,
        /// Smallest permitted denominator.
        min_depth: f64,
    },

    /// Surface with a zero dimension.
    #[error("invalid surface size: {width}x{height}")]
    InvalidSurfaceSize {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// Stroke colour could not be parsed.
    #[error("invalid stroke colour {0:?}: expected #RRGGBB or #RGB")]
    InvalidColor(String),

    /// The drawing surface went away.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
}

/// Result type for torus operations.
pub type Result<T> = std::result::Result<T, TorusError>;
