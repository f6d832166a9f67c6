//! Radial heightfield for headland-style hills.
//!
//! The footprint is an ellipse sampled on a polar grid. Height falls off
//! from the apex with `1 - frac^1.8`, is biased by the angle to a reference
//! direction so one side slopes gently and the other steeply, and a cliff is
//! cut near the rim on the shallow side.

use crate::SceneError;
use crate::core::color::linear_from_hex;
use crate::core::geometry::Vertex;
use crate::procgen::normals::{compute_vertex_normals, normalize_or};
use crate::scene::mesh::Mesh;
use nalgebra::{Point3, Vector3};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

const GRASS: u32 = 0x5a7342;
const ROCK: u32 = 0x73624c;
const FALLOFF_EXPONENT: f32 = 1.8;
const CLIFF_FRAC: f32 = 0.9;
const CLIFF_SLOPE_T: f32 = 0.2;

/// Inputs for [`build_radial_mesh`]. Angles are in degrees or radians as named.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialMeshParams {
    pub center: Point3<f32>,
    pub apex_height: f32,
    pub major_radius: f32,
    pub minor_radius: f32,
    pub angular_step_degrees: f32,
    pub radial_steps: usize,
    pub cliff_drop_height: f32,
    /// Direction (radians around Y, 0 = +X) the flat, cliffed side faces.
    pub slope_reference_direction: f32,
}

impl RadialMeshParams {
    /// The Marin headland north of the bridge.
    pub fn headland() -> Self {
        Self {
            center: Point3::new(900.0, 0.0, -250.0),
            apex_height: 150.0,
            major_radius: 500.0,
            minor_radius: 350.0,
            angular_step_degrees: 5.0,
            radial_steps: 60,
            cliff_drop_height: 35.0,
            slope_reference_direction: 0.0,
        }
    }

    /// Number of angular samples including the closing one at 360 degrees.
    pub fn angular_samples(&self) -> usize {
        (360.0 / self.angular_step_degrees).round().max(1.0) as usize + 1
    }

    fn validate(&self) -> Result<(), SceneError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.major_radius) || !positive(self.minor_radius) {
            return Err(SceneError::invalid(
                "radial mesh",
                format!(
                    "radii must be positive, got {} and {}",
                    self.major_radius, self.minor_radius
                ),
            ));
        }
        if !positive(self.angular_step_degrees) || self.angular_step_degrees > 360.0 {
            return Err(SceneError::invalid(
                "radial mesh",
                format!(
                    "angular step must be in (0, 360], got {}",
                    self.angular_step_degrees
                ),
            ));
        }
        if !self.apex_height.is_finite() || !self.cliff_drop_height.is_finite() {
            return Err(SceneError::invalid("radial mesh", "heights must be finite"));
        }
        let vertex_count = self
            .angular_samples()
            .checked_mul(self.radial_steps.saturating_add(1));
        if !vertex_count.is_some_and(|n| n <= u32::MAX as usize) {
            return Err(SceneError::invalid(
                "radial mesh",
                format!(
                    "grid of {} x {} samples does not fit 32-bit indices",
                    self.angular_samples(),
                    self.radial_steps.saturating_add(1)
                ),
            ));
        }
        Ok(())
    }
}

impl Default for RadialMeshParams {
    fn default() -> Self {
        Self::headland()
    }
}

/// Polar radius of an ellipse with semi-axes `a` (along X) and `b` (along Z).
#[inline]
pub fn ellipse_radius(a: f32, b: f32, theta: f32) -> f32 {
    let (sin, cos) = theta.sin_cos();
    (a * b) / ((b * cos).powi(2) + (a * sin).powi(2)).sqrt()
}

/// Angular distance from `theta` to `reference`, wrapped into [0, PI].
#[inline]
pub fn angular_distance(theta: f32, reference: f32) -> f32 {
    ((theta - reference + PI).rem_euclid(TAU) - PI).abs()
}

/// Slope blend in [0, 1]: 0 facing the reference direction, 1 from a
/// quarter turn away onward.
#[inline]
pub fn slope_t(theta: f32, reference: f32) -> f32 {
    (angular_distance(theta, reference) / FRAC_PI_2).clamp(0.0, 1.0)
}

/// Height of the sample `radial_step` steps out along angle `theta`.
pub fn radial_height(params: &RadialMeshParams, theta: f32, radial_step: usize) -> f32 {
    if params.radial_steps == 0 {
        return params.apex_height * (0.4 + 0.6 * slope_t(theta, params.slope_reference_direction));
    }
    let frac = radial_step as f32 / params.radial_steps as f32;
    let t = slope_t(theta, params.slope_reference_direction);
    let mut h = params.apex_height * (1.0 - frac.powf(FALLOFF_EXPONENT)) * (0.4 + 0.6 * t);
    if frac > CLIFF_FRAC && t < CLIFF_SLOPE_T {
        h = (h - params.cliff_drop_height).max(0.0);
    }
    h
}

/// Vertex index of a polar grid sample.
#[inline]
pub fn grid_index(angular_step: usize, radial_step: usize, radial_steps: usize) -> u32 {
    (radial_step + angular_step * (radial_steps + 1)) as u32
}

/// Builds the radial heightfield.
///
/// Vertex `(a, r)` lives at [`grid_index`]. The last angular sample sits at
/// exactly 360 degrees so the ring closes even when the step does not divide
/// a full turn. Triangles face +Y; the apex cells also carry one vertical
/// sliver each, since the apex height varies with angle. Normals are welded
/// across the 0/360 seam and shared by every apex sample.
pub fn build_radial_mesh(params: &RadialMeshParams) -> Result<Mesh, SceneError> {
    params.validate()?;

    let angular = params.angular_samples();
    let radial = params.radial_steps + 1;
    let grass = linear_from_hex(GRASS);
    let rock = linear_from_hex(ROCK);
    let last = angular - 1;

    let mut vertices = Vec::with_capacity(angular * radial);
    for a in 0..angular {
        let theta = if a == last {
            TAU
        } else {
            (a as f32 * params.angular_step_degrees).to_radians()
        };
        let (sin, cos) = theta.sin_cos();
        let rim = ellipse_radius(params.major_radius, params.minor_radius, theta);
        let slope = 0.4 + 0.6 * slope_t(theta, params.slope_reference_direction);
        let color = grass.lerp(&rock, 1.0 - slope);

        for r in 0..radial {
            let frac = if params.radial_steps == 0 {
                0.0
            } else {
                r as f32 / params.radial_steps as f32
            };
            let radius = rim * frac;
            let position = Point3::new(
                params.center.x + radius * cos,
                params.center.y + radial_height(params, theta, r),
                params.center.z + radius * sin,
            );
            vertices.push(Vertex::new(position, Vector3::y()).with_color(color));
        }
    }

    let mut indices = Vec::with_capacity((angular - 1) * params.radial_steps * 6);
    for a in 0..angular - 1 {
        for r in 0..params.radial_steps {
            let i0 = grid_index(a, r, params.radial_steps);
            let i1 = grid_index(a, r + 1, params.radial_steps);
            let i2 = grid_index(a + 1, r, params.radial_steps);
            let i3 = grid_index(a + 1, r + 1, params.radial_steps);
            indices.extend_from_slice(&[i0, i3, i1, i0, i2, i3]);
        }
    }

    let mut mesh = Mesh::new(vertices, indices);
    compute_vertex_normals(&mut mesh);
    weld_normals(&mut mesh, angular, params.radial_steps);
    Ok(mesh)
}

/// Makes coincident samples shade as one surface: the first and closing
/// columns share a normal per ring, and all apex samples share the mean
/// apex normal.
fn weld_normals(mesh: &mut Mesh, angular: usize, radial_steps: usize) {
    if angular < 2 || radial_steps == 0 {
        return;
    }
    let last = angular - 1;
    for r in 1..=radial_steps {
        let first = grid_index(0, r, radial_steps) as usize;
        let closing = grid_index(last, r, radial_steps) as usize;
        let n = normalize_or(
            mesh.vertices[first].normal + mesh.vertices[closing].normal,
            Vector3::y(),
        );
        mesh.vertices[first].normal = n;
        mesh.vertices[closing].normal = n;
    }

    let apex: Vec<usize> = (0..angular)
        .map(|a| grid_index(a, 0, radial_steps) as usize)
        .collect();
    let sum = apex
        .iter()
        .fold(Vector3::zeros(), |acc, &i| acc + mesh.vertices[i].normal);
    let n = normalize_or(sum, Vector3::y());
    for i in apex {
        mesh.vertices[i].normal = n;
    }
}
