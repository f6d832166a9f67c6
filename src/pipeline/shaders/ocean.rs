//! Stylized water.
//!
//! The vertex stage lifts a flat grid along its normal by a sum of three
//! travelling sines. The fragment stage mixes a base water color with a sky
//! reflection by a Fresnel term, then adds a sun glint off a hash-jittered
//! normal and intermittent screen-space sparkles. Colors here are display
//! values; [`OceanShader`] converts its output to linear for the framebuffer.

use crate::core::color::srgb_to_linear;
use crate::core::geometry::Vertex;
use crate::core::math::interpolation::{fract, smoothstep, step};
use crate::core::math::transform::{TransformFactory, transform_point};
use crate::core::pipeline::{BlendMode, Interpolatable, Shader};
use crate::procgen::normals::normalize_or;
use crate::scene::material::Material;
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector2, Vector3, Vector4};
use serde::Deserialize;
use std::ops::{Add, Mul};

/// One travelling sine: `sin(coord * frequency + t * speed) * amplitude`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WaveTerm {
    pub frequency: f32,
    pub speed: f32,
    pub amplitude: f32,
}

/// The three wave terms. The diagonal term runs over `x * frequency +
/// z * diagonal_z_frequency`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    pub along_x: WaveTerm,
    pub along_z: WaveTerm,
    pub diagonal: WaveTerm,
    pub diagonal_z_frequency: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            along_x: WaveTerm {
                frequency: 0.5,
                speed: 0.5,
                amplitude: 0.1,
            },
            along_z: WaveTerm {
                frequency: 0.3,
                speed: 0.3,
                amplitude: 0.15,
            },
            diagonal: WaveTerm {
                frequency: 0.2,
                speed: 0.2,
                amplitude: 0.08,
            },
            diagonal_z_frequency: 0.3,
        }
    }
}

/// Surface offset at model-space `(x, z)` and time `t`.
///
/// The three terms are averaged rather than summed, so the peak offset is a
/// third of the summed amplitudes.
pub fn wave_height(params: &WaveParams, x: f32, z: f32, t: f32) -> f32 {
    let a = &params.along_x;
    let b = &params.along_z;
    let c = &params.diagonal;
    let w1 = (x * a.frequency + t * a.speed).sin() * a.amplitude;
    let w2 = (z * b.frequency + t * b.speed).sin() * b.amplitude;
    let w3 = (x * c.frequency + z * params.diagonal_z_frequency + t * c.speed).sin() * c.amplitude;
    (w1 + w2 + w3) / 3.0
}

/// `position + normal * wave_height(position.xz)`.
pub fn displace(
    params: &WaveParams,
    position: &Point3<f32>,
    normal: &Vector3<f32>,
    t: f32,
) -> Point3<f32> {
    position + normal * wave_height(params, position.x, position.z, t)
}

/// GLSL-style one-liner hash of a 2D point into [0, 1).
#[inline]
pub fn hash2(st: Vector2<f32>) -> f32 {
    fract((st.x * 12.9898 + st.y * 78.233).sin() * 43_758.547)
}

/// `(1 - |n . v|)^3`: 0 looking straight at the surface, 1 at grazing angles.
pub fn fresnel(normal: &Vector3<f32>, view_dir: &Vector3<f32>) -> f32 {
    let n = normalize_or(*normal, Vector3::y());
    let v = normalize_or(*view_dir, Vector3::zeros());
    (1.0 - n.dot(&v).abs().min(1.0)).powi(3)
}

/// Jitters `normal` by a hash of its world XZ cell so neighbouring patches
/// glint differently.
pub fn perturbed_normal(normal: &Vector3<f32>, world_xz: Vector2<f32>) -> Vector3<f32> {
    let cell = (world_xz * 0.1 * 10.0).map(f32::floor) / 10.0;
    let noise = hash2(cell) * 0.1;
    normalize_or(normal + Vector3::new(noise, 0.0, noise * 0.5), Vector3::y())
}

/// Sun glint: reflect the incoming sun direction about `normal` and raise
/// its alignment with the viewer to the 64th power, doubled.
pub fn specular(sun_direction: &Vector3<f32>, normal: &Vector3<f32>, view_dir: &Vector3<f32>) -> f32 {
    let d = normalize_or(*sun_direction, Vector3::zeros());
    let n = normalize_or(*normal, Vector3::y());
    let v = normalize_or(*view_dir, Vector3::zeros());
    let r = d - n * (2.0 * d.dot(&n));
    v.dot(&r).max(0.0).powi(64) * 2.0
}

/// 1 on roughly a tenth of pixels, reshuffled as time passes; 0 elsewhere.
pub fn sparkle(frag_coord: Point2<f32>, time: f32) -> f32 {
    let st = frag_coord.coords * 0.01 + Vector2::repeat(time * 0.1);
    step(0.9, hash2(st))
}

/// Per-frame water state, set once before drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct OceanUniforms {
    pub time: f32,
    pub water_color: Vector3<f32>,
    /// Direction the sunlight travels.
    pub sun_direction: Vector3<f32>,
    pub sky_color: Vector3<f32>,
    pub horizon_color: Vector3<f32>,
    pub sun_color: Vector3<f32>,
    pub opacity: f32,
    pub waves: WaveParams,
}

impl Default for OceanUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            water_color: Vector3::new(0.1, 0.2, 0.4),
            sun_direction: Vector3::new(0.5, -0.5, -0.5).normalize(),
            sky_color: Vector3::new(0.5, 0.7, 1.0),
            horizon_color: Vector3::new(1.0, 0.6, 0.3),
            sun_color: Vector3::new(1.0, 0.8, 0.6),
            opacity: 0.85,
            waves: WaveParams::default(),
        }
    }
}

const SPARKLE_TINT: [f32; 3] = [1.0, 1.0, 0.9];

/// Display-space water color for one fragment.
pub fn shade_water(
    uniforms: &OceanUniforms,
    world_pos: &Point3<f32>,
    normal: &Vector3<f32>,
    view_dir: &Vector3<f32>,
    frag_coord: Point2<f32>,
) -> Vector3<f32> {
    let n = normalize_or(*normal, Vector3::y());
    let v = normalize_or(*view_dir, Vector3::zeros());

    let f = fresnel(&n, &v);
    let glint_normal = perturbed_normal(&n, Vector2::new(world_pos.x, world_pos.z));
    let spec = specular(&uniforms.sun_direction, &glint_normal, &v);

    let sky_t = smoothstep(0.0, 1.0, n.y * 0.5 + 0.5);
    let reflection = uniforms.horizon_color.lerp(&uniforms.sky_color, sky_t);

    let mut color = uniforms.water_color.lerp(&reflection, f * 0.8);
    color += uniforms.sun_color * (spec * 0.8);
    color += Vector3::from(SPARKLE_TINT) * (sparkle(frag_coord, uniforms.time) * 0.3);
    color
}

#[derive(Clone, Copy, Debug)]
pub struct OceanVarying {
    pub world_pos: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Add for OceanVarying {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            world_pos: Point3::from(self.world_pos.coords + other.world_pos.coords),
            normal: self.normal + other.normal,
        }
    }
}

impl Mul<f32> for OceanVarying {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            world_pos: Point3::from(self.world_pos.coords * scalar),
            normal: self.normal * scalar,
        }
    }
}

impl Interpolatable for OceanVarying {}

pub struct OceanShader {
    pub model_matrix: Matrix4<f32>,
    pub view_projection: Matrix4<f32>,
    pub normal_matrix: Matrix3<f32>,
    pub camera_pos: Point3<f32>,
    pub uniforms: OceanUniforms,
}

impl OceanShader {
    pub fn new(
        model: Matrix4<f32>,
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
        camera_pos: Point3<f32>,
        uniforms: OceanUniforms,
    ) -> Self {
        Self {
            model_matrix: model,
            view_projection: projection * view,
            normal_matrix: TransformFactory::normal_matrix(&model),
            camera_pos,
            uniforms,
        }
    }
}

impl Shader for OceanShader {
    type Varying = OceanVarying;

    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, Self::Varying) {
        let local = displace(
            &self.uniforms.waves,
            &vertex.position,
            &vertex.normal,
            self.uniforms.time,
        );
        let world_pos = transform_point(&self.model_matrix, &local);
        let clip_pos = self.view_projection * world_pos.to_homogeneous();
        let normal = normalize_or(self.normal_matrix * vertex.normal, Vector3::y());

        (clip_pos, OceanVarying { world_pos, normal })
    }

    fn fragment(
        &self,
        varying: Self::Varying,
        _material: Option<&Material>,
        frag_coord: Point2<f32>,
    ) -> Vector3<f32> {
        let view_dir = self.camera_pos - varying.world_pos;
        let color = shade_water(
            &self.uniforms,
            &varying.world_pos,
            &varying.normal,
            &view_dir,
            frag_coord,
        );
        srgb_to_linear(color)
    }

    fn blend_mode(&self) -> BlendMode {
        BlendMode::Alpha(self.uniforms.opacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_height_zero_at_origin_and_start() {
        assert_eq!(wave_height(&WaveParams::default(), 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_wave_height_is_bounded() {
        let p = WaveParams::default();
        let bound = (0.1 + 0.15 + 0.08) / 3.0 + 1e-6;
        for i in 0..200 {
            let f = i as f32 * 0.37;
            assert!(wave_height(&p, f, -f * 1.3, f * 0.1).abs() <= bound);
        }
    }

    #[test]
    fn test_displace_moves_along_normal() {
        let p = WaveParams::default();
        let pos = Point3::new(3.0, 0.0, 2.0);
        let moved = displace(&p, &pos, &Vector3::y(), 1.5);
        assert_eq!(moved.x, pos.x);
        assert_eq!(moved.z, pos.z);
        assert!((moved.y - wave_height(&p, 3.0, 2.0, 1.5)).abs() < 1e-7);
    }

    #[test]
    fn test_fresnel_extremes() {
        let n = Vector3::y();
        assert_eq!(fresnel(&n, &Vector3::y()), 0.0);
        assert_eq!(fresnel(&n, &-Vector3::y()), 0.0);
        let grazing = Vector3::new(1.0, 1e-4, 0.0);
        assert!(fresnel(&n, &grazing) > 0.999);
        // Monotone toward grazing.
        let steep = fresnel(&n, &Vector3::new(0.2, 1.0, 0.0));
        let shallow = fresnel(&n, &Vector3::new(1.0, 0.2, 0.0));
        assert!(steep < shallow);
    }

    #[test]
    fn test_specular_peaks_on_mirror_direction() {
        let down = -Vector3::y();
        assert!((specular(&down, &Vector3::y(), &Vector3::y()) - 2.0).abs() < 1e-5);
        assert_eq!(specular(&down, &Vector3::y(), &-Vector3::y()), 0.0);
    }

    #[test]
    fn test_sparkle_is_binary() {
        for i in 0..50 {
            let s = sparkle(Point2::new(i as f32 * 13.0, i as f32 * 7.0), i as f32 * 0.1);
            assert!(s == 0.0 || s == 1.0);
        }
    }

    #[test]
    fn test_hash_range() {
        for i in 0..100 {
            let h = hash2(Vector2::new(i as f32 * 0.31, -(i as f32) * 1.7));
            assert!((0.0..1.0).contains(&h));
        }
    }

    #[test]
    fn test_head_on_view_shows_water_color() {
        let u = OceanUniforms::default();
        let frag = Point2::new(10.0, 20.0);
        let c = shade_water(&u, &Point3::new(0.0, 0.0, 0.0), &Vector3::y(), &Vector3::y(), frag);
        let without_sparkle = c - Vector3::from(SPARKLE_TINT) * (sparkle(frag, u.time) * 0.3);
        assert!((without_sparkle - u.water_color).norm() < 1e-3);
    }

    #[test]
    fn test_degenerate_vectors_stay_finite() {
        let u = OceanUniforms::default();
        let c = shade_water(
            &u,
            &Point3::new(1.0, 0.0, 1.0),
            &Vector3::zeros(),
            &Vector3::zeros(),
            Point2::origin(),
        );
        assert!(c.iter().all(|x| x.is_finite()));
    }
}
