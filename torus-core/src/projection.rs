//! Perspective projection onto the drawing surface
use nalgebra::Point2;

use crate::error::{Result, TorusError};
use crate::geometry::Vertex3;

/// Smallest allowed value of `z + camera_offset` for any vertex.
pub const MIN_DEPTH: f64 = 0.1;

/// A projected point in surface pixel space.
pub type ScreenPoint = Point2<f64>;

/// Projection constants and the surface size they are centred on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionSettings {
    /// Perspective strength: pixels per unit at depth 1
    pub fov: f64,
    /// Added to z before the divide
    pub camera_offset: f64,
    pub width: u32,
    pub height: u32,
}

impl ProjectionSettings {
    pub const DEFAULT_FOV: f64 = 200.0;
    pub const DEFAULT_CAMERA_OFFSET: f64 = 5.0;
    pub const DEFAULT_WIDTH: u32 = 800;
    pub const DEFAULT_HEIGHT: u32 = 600;
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            fov: Self::DEFAULT_FOV,
            camera_offset: Self::DEFAULT_CAMERA_OFFSET,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

/// Maps rotated vertices to screen coordinates.
///
/// Constructed against the bounding radius of the geometry it will see, so
/// the divide can never approach zero at render time.
#[derive(Debug, Clone)]
pub struct Projector {
    settings: ProjectionSettings,
}

impl Projector {
    /// Validate the settings for geometry no further than `bounding_radius`
    /// from the origin.
    pub fn new(settings: ProjectionSettings, bounding_radius: f64) -> Result<Self> {
        if !(settings.fov.is_finite() && settings.fov > 0.0) {
            return Err(TorusError::InvalidFov(settings.fov));
        }
        if !(settings.camera_offset.is_finite() && settings.camera_offset > 0.0) {
            return Err(TorusError::InvalidCameraOffset(settings.camera_offset));
        }
        check_size(settings.width, settings.height)?;

        let projector = Self { settings };
        projector.check_extent(bounding_radius)?;
        Ok(projector)
    }

    /// Reject geometry reaching further than `bounding_radius` from the
    /// origin if some rotation of it would bring a vertex within
    /// [`MIN_DEPTH`] of the camera.
    pub fn check_extent(&self, bounding_radius: f64) -> Result<()> {
        // Rotation keeps |z| <= bounding radius, so this is the worst-case depth
        let offset = self.settings.camera_offset;
        if !bounding_radius.is_finite() || offset - bounding_radius < MIN_DEPTH {
            return Err(TorusError::DepthTooShallow {
                extent: bounding_radius,
                offset,
                min_depth: MIN_DEPTH,
            });
        }
        Ok(())
    }

    pub fn settings(&self) -> &ProjectionSettings {
        &self.settings
    }

    /// Track a new surface size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        check_size(width, height)?;
        self.settings.width = width;
        self.settings.height = height;
        Ok(())
    }

    /// Screen position of the origin.
    pub fn center(&self) -> ScreenPoint {
        Point2::new(
            f64::from(self.settings.width) / 2.0,
            f64::from(self.settings.height) / 2.0,
        )
    }

    /// Project a 3D point to 2D screen space
    pub fn project(&self, point: &Vertex3) -> ScreenPoint {
        let scale = self.settings.fov / (point.z + self.settings.camera_offset);
        let center = self.center();
        Point2::new(point.x * scale + center.x, point.y * scale + center.y)
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self {
            settings: ProjectionSettings::default(),
        }
    }
}

fn check_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(TorusError::InvalidSurfaceSize { width, height });
    }
    Ok(())
}
