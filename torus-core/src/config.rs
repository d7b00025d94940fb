//! Scene configuration, validated as a whole before anything is drawn.

use tracing::info;

use crate::color::StrokeColor;
use crate::error::Result;
use crate::geometry::{TorusMesh, TorusParams};
use crate::motion::Speed;
use crate::projection::{ProjectionSettings, Projector};
use crate::scheduler::{FrameScheduler, Overlay};

/// Everything needed to build a [`FrameScheduler`].
///
/// `Default` is the reference scene: R = 1.5, r = 0.5, 64 x 64, FOV 200,
/// camera offset 5, 800 x 600, cyan stroke, speed 0.05, help overlay on.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub major_radius: f64,
    pub minor_radius: f64,
    pub segments: usize,
    pub slices: usize,
    pub projection: ProjectionSettings,
    pub stroke: StrokeColor,
    pub initial_speed: Speed,
    pub overlay: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            major_radius: TorusParams::DEFAULT_MAJOR_RADIUS,
            minor_radius: TorusParams::DEFAULT_MINOR_RADIUS,
            segments: TorusParams::DEFAULT_SEGMENTS,
            slices: TorusParams::DEFAULT_SLICES,
            projection: ProjectionSettings::default(),
            stroke: StrokeColor::default(),
            initial_speed: Speed::default(),
            overlay: true,
        }
    }
}

impl SceneConfig {
    pub fn torus_params(&self) -> Result<TorusParams> {
        TorusParams::new(
            self.major_radius,
            self.minor_radius,
            self.segments,
            self.slices,
        )
    }

    /// Check the torus against the projection and generate the mesh.
    pub fn build(&self) -> Result<FrameScheduler> {
        let params = self.torus_params()?;
        let projector = Projector::new(self.projection, params.bounding_radius())?;
        let mesh = TorusMesh::generate(&params);

        info!(
            major_radius = params.major_radius(),
            minor_radius = params.minor_radius(),
            vertices = mesh.len(),
            stroke = %self.stroke,
            "Scene configured"
        );

        let scheduler = FrameScheduler::new(mesh, projector, self.stroke)?;
        Ok(if self.overlay {
            scheduler.with_overlay(Overlay::default())
        } else {
            scheduler
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TorusError;

    #[test]
    fn test_reference_scene_builds() {
        let scheduler = SceneConfig::default().build().unwrap();
        assert_eq!(scheduler.mesh().len(), 64 * 64);
        assert_eq!(scheduler.projector().settings().fov, 200.0);
    }

    #[test]
    fn test_rejects_torus_reaching_camera() {
        let config = SceneConfig {
            major_radius: 4.0,
            minor_radius: 1.0,
            ..SceneConfig::default()
        };
        assert!(matches!(
            config.build(),
            Err(TorusError::DepthTooShallow { .. })
        ));
    }

    #[test]
    fn test_larger_offset_admits_larger_torus() {
        let mut config = SceneConfig {
            major_radius: 4.0,
            minor_radius: 1.0,
            ..SceneConfig::default()
        };
        config.projection.camera_offset = 8.0;
        assert!(config.build().is_ok());
    }
}
