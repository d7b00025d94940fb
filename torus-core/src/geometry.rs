//! Torus geometry: validated parameters and the wire-frame vertex grid.

use nalgebra::Point3;
use std::f64::consts::TAU;

use crate::error::{Result, TorusError};

/// A mesh vertex position in model space.
pub type Vertex3 = Point3<f64>;

/// Fewest segments or slices that still close into a ring.
pub const MIN_DIVISIONS: usize = 3;

/// Shape and resolution of the torus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusParams {
    major_radius: f64,
    minor_radius: f64,
    segments: usize,
    slices: usize,
}

impl TorusParams {
    /// Reference major radius R.
    pub const DEFAULT_MAJOR_RADIUS: f64 = 1.5;
    /// Reference minor radius r.
    pub const DEFAULT_MINOR_RADIUS: f64 = 0.5;
    /// Reference ring count around the major circle.
    pub const DEFAULT_SEGMENTS: usize = 64;
    /// Reference point count per ring.
    pub const DEFAULT_SLICES: usize = 64;

    pub fn new(
        major_radius: f64,
        minor_radius: f64,
        segments: usize,
        slices: usize,
    ) -> Result<Self> {
        check_radius("major", major_radius)?;
        check_radius("minor", minor_radius)?;
        if minor_radius > major_radius {
            return Err(TorusError::SelfIntersecting {
                major: major_radius,
                minor: minor_radius,
            });
        }
        check_divisions("segment", segments)?;
        check_divisions("slice", slices)?;

        Ok(Self {
            major_radius,
            minor_radius,
            segments,
            slices,
        })
    }

    pub fn major_radius(&self) -> f64 {
        self.major_radius
    }

    pub fn minor_radius(&self) -> f64 {
        self.minor_radius
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn slices(&self) -> usize {
        self.slices
    }

    /// Largest distance of any surface point from the origin (R + r).
    ///
    /// Rotation about the origin never moves a vertex further out than this.
    pub fn bounding_radius(&self) -> f64 {
        self.major_radius + self.minor_radius
    }
}

impl Default for TorusParams {
    fn default() -> Self {
        Self {
            major_radius: Self::DEFAULT_MAJOR_RADIUS,
            minor_radius: Self::DEFAULT_MINOR_RADIUS,
            segments: Self::DEFAULT_SEGMENTS,
            slices: Self::DEFAULT_SLICES,
        }
    }
}

fn check_radius(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TorusError::InvalidRadius { name, value })
    }
}

fn check_divisions(name: &'static str, value: usize) -> Result<()> {
    if value >= MIN_DIVISIONS {
        Ok(())
    } else {
        Err(TorusError::TooFewDivisions {
            name,
            value,
            min: MIN_DIVISIONS,
        })
    }
}

/// The torus as a grid of vertices, one ring of `slices` points per segment.
///
/// Stored segment-major: vertex `(i, j)` lives at `i * slices + j`.
#[derive(Debug, Clone)]
pub struct TorusMesh {
    params: TorusParams,
    vertices: Vec<Vertex3>,
}

impl TorusMesh {
    /// Sample the torus surface at `segments` x `slices` evenly spaced angles.
    pub fn generate(params: &TorusParams) -> Self {
        let (major, minor) = (params.major_radius, params.minor_radius);
        let mut vertices = Vec::with_capacity(params.segments * params.slices);

        for i in 0..params.segments {
            let theta = TAU * i as f64 / params.segments as f64;
            let (sin_theta, cos_theta) = theta.sin_cos();

            for j in 0..params.slices {
                let phi = TAU * j as f64 / params.slices as f64;
                let (sin_phi, cos_phi) = phi.sin_cos();

                // Distance from the z axis for this point of the tube
                let ring = major + minor * cos_phi;
                vertices.push(Point3::new(
                    ring * cos_theta,
                    ring * sin_theta,
                    minor * sin_phi,
                ));
            }
        }

        Self {
            params: *params,
            vertices,
        }
    }

    pub fn params(&self) -> &TorusParams {
        &self.params
    }

    pub fn segments(&self) -> usize {
        self.params.segments
    }

    pub fn slices(&self) -> usize {
        self.params.slices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex3] {
        &self.vertices
    }

    pub fn vertex(&self, segment: usize, slice: usize) -> Option<&Vertex3> {
        if segment >= self.segments() || slice >= self.slices() {
            return None;
        }
        self.vertices.get(segment * self.slices() + slice)
    }

    /// The closed loop of points for one segment.
    pub fn ring(&self, segment: usize) -> Option<&[Vertex3]> {
        let slices = self.slices();
        let start = segment.checked_mul(slices)?;
        self.vertices.get(start..start + slices)
    }

    /// Every segment loop, in segment order.
    pub fn rings(&self) -> std::slice::ChunksExact<'_, Vertex3> {
        self.vertices.chunks_exact(self.slices())
    }
}

impl Default for TorusMesh {
    fn default() -> Self {
        Self::generate(&TorusParams::default())
    }
}
