use crate::core::geometry::Vertex;
use crate::core::math::transform::{TransformFactory, transform_point};
use crate::core::pipeline::{BlendMode, Interpolatable, Shader};
use crate::procgen::normals::normalize_or;
use crate::scene::light::Light;
use crate::scene::material::Material;
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector3, Vector4};
use std::f32::consts::PI;
use std::ops::{Add, Mul};
use std::sync::Arc;

/// Data passed from Vertex Shader to Fragment Shader.
#[derive(Clone, Copy, Debug)]
pub struct LitVarying {
    pub world_pos: Point3<f32>,
    pub normal: Vector3<f32>,
    pub color: Vector3<f32>,
}

impl Add for LitVarying {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            world_pos: Point3::from(self.world_pos.coords + other.world_pos.coords),
            normal: self.normal + other.normal,
            color: self.color + other.color,
        }
    }
}

impl Mul<f32> for LitVarying {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            world_pos: Point3::from(self.world_pos.coords * scalar),
            normal: self.normal * scalar,
            color: self.color * scalar,
        }
    }
}

impl Interpolatable for LitVarying {}

/// Depth map rendered from the shadow-casting light.
#[derive(Debug, Clone)]
pub struct ShadowMap {
    pub depth: Arc<Vec<f32>>,
    pub size: usize,
    pub light_space_matrix: Matrix4<f32>,
    pub bias: f32,
    pub use_pcf: bool,
    pub pcf_kernel_size: i32,
}

impl ShadowMap {
    /// Fraction of light reaching `world_pos`: 1 lit, 0 fully occluded.
    fn visibility(&self, world_pos: &Point3<f32>, n_dot_l: f32) -> f32 {
        if self.size == 0 || self.depth.len() < self.size * self.size {
            return 1.0;
        }

        let light_space_pos = self.light_space_matrix * world_pos.to_homogeneous();
        if light_space_pos.w.abs() < 1e-6 {
            return 1.0;
        }
        let proj_coords = light_space_pos.xyz() / light_space_pos.w;

        let u = proj_coords.x * 0.5 + 0.5;
        let v = 1.0 - (proj_coords.y * 0.5 + 0.5);
        // Depth buffer stores [0, 1]
        let current_depth = proj_coords.z * 0.5 + 0.5;

        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) || current_depth > 1.0 {
            return 1.0;
        }

        let bias = self.bias.max(0.05 * (1.0 - n_dot_l));
        let max_index = (self.size - 1) as f32;
        let sample = |su: f32, sv: f32| -> f32 {
            let map_x = (su * max_index).clamp(0.0, max_index) as usize;
            let map_y = (sv * max_index).clamp(0.0, max_index) as usize;
            if current_depth - bias > self.depth[map_y * self.size + map_x] {
                0.0
            } else {
                1.0
            }
        };

        if !self.use_pcf {
            return sample(u, v);
        }

        let texel_size = 1.0 / self.size as f32;
        let k = self.pcf_kernel_size;
        let mut lit = 0.0;
        for x in -k..=k {
            for y in -k..=k {
                lit += sample(u + x as f32 * texel_size, v + y as f32 * texel_size);
            }
        }
        lit / ((k * 2 + 1).pow(2) as f32)
    }
}

/// Cook-Torrance shading for every opaque or translucent solid in the scene.
pub struct LitShader {
    pub model_matrix: Matrix4<f32>,
    pub view_projection: Matrix4<f32>,
    pub normal_matrix: Matrix3<f32>,

    pub camera_pos: Point3<f32>,
    pub lights: Vec<Light>,
    /// Index into `lights` of the light the shadow map was rendered from.
    pub shadow_light: Option<usize>,
    pub shadow_map: Option<ShadowMap>,

    /// Copied from the material so the rasterizer knows how to blend.
    pub opacity: f32,
    pub fallback_material: Material,
}

impl LitShader {
    pub fn new(
        model: Matrix4<f32>,
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
        camera_pos: Point3<f32>,
    ) -> Self {
        Self {
            model_matrix: model,
            view_projection: projection * view,
            normal_matrix: TransformFactory::normal_matrix(&model),
            camera_pos,
            lights: Vec::new(),
            shadow_light: None,
            shadow_map: None,
            opacity: 1.0,
            fallback_material: Material::default(),
        }
    }

    // Normal Distribution Function (GGX)
    fn distribution_ggx(n_dot_h: f32, roughness: f32) -> f32 {
        let a = roughness * roughness;
        let a2 = a * a;
        let denom = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
        a2 / (PI * denom * denom).max(0.0001)
    }

    // Geometry Function (Smith's Schlick-GGX)
    fn geometry_schlick_ggx(n_dot_v: f32, roughness: f32) -> f32 {
        let r = roughness + 1.0;
        let k = (r * r) / 8.0;
        n_dot_v / (n_dot_v * (1.0 - k) + k).max(0.0001)
    }

    fn geometry_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
        Self::geometry_schlick_ggx(n_dot_v, roughness) * Self::geometry_schlick_ggx(n_dot_l, roughness)
    }

    // Fresnel-Schlick
    fn fresnel_schlick(cos_theta: f32, f0: Vector3<f32>) -> Vector3<f32> {
        let val = (1.0 - cos_theta).clamp(0.0, 1.0).powi(5);
        f0 + (Vector3::new(1.0, 1.0, 1.0) - f0) * val
    }

    fn shadow_factor(&self, light_index: usize, world_pos: &Point3<f32>, n_dot_l: f32) -> f32 {
        match (&self.shadow_map, self.shadow_light) {
            (Some(map), Some(i)) if i == light_index => map.visibility(world_pos, n_dot_l),
            _ => 1.0,
        }
    }
}

impl Shader for LitShader {
    type Varying = LitVarying;

    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, Self::Varying) {
        let world_pos = transform_point(&self.model_matrix, &vertex.position);
        let normal = normalize_or(self.normal_matrix * vertex.normal, Vector3::y());
        let clip_pos = self.view_projection * world_pos.to_homogeneous();

        (
            clip_pos,
            LitVarying {
                world_pos,
                normal,
                color: vertex.color,
            },
        )
    }

    fn fragment(
        &self,
        varying: Self::Varying,
        material: Option<&Material>,
        _frag_coord: Point2<f32>,
    ) -> Vector3<f32> {
        let mat = material.unwrap_or(&self.fallback_material);

        let albedo = if mat.vertex_colors {
            mat.color.component_mul(&varying.color)
        } else {
            mat.color
        };
        let roughness = mat.roughness.clamp(0.04, 1.0);
        let metallic = mat.metalness;

        let v = normalize_or(self.camera_pos - varying.world_pos, Vector3::zeros());
        let mut n = normalize_or(varying.normal, Vector3::y());
        if mat.double_sided && n.dot(&v) < 0.0 {
            n = -n;
        }

        // 0.04 for dielectrics, albedo for metals
        let f0 = Vector3::new(0.04, 0.04, 0.04).lerp(&albedo, metallic);
        let n_dot_v = n.dot(&v).max(0.0);

        let mut lo = Vector3::zeros();
        let mut ambient = Vector3::zeros();

        for (i, light) in self.lights.iter().enumerate() {
            let Some(l) = light.direction_to_light(&varying.world_pos) else {
                ambient += light.ambient(&n);
                continue;
            };
            let n_dot_l = n.dot(&l).max(0.0);
            if n_dot_l <= 0.0 {
                continue;
            }
            let h = normalize_or(v + l, n);
            let n_dot_h = n.dot(&h).max(0.0);
            let h_dot_v = h.dot(&v).max(0.0);

            let shadow = self.shadow_factor(i, &varying.world_pos, n_dot_l);
            if shadow <= 0.0 {
                continue;
            }

            let d = Self::distribution_ggx(n_dot_h, roughness);
            let g = Self::geometry_smith(n_dot_v, n_dot_l, roughness);
            let f = Self::fresnel_schlick(h_dot_v, f0);

            let specular = f * d * g / (4.0 * n_dot_v * n_dot_l + 0.0001);
            // Metals absorb the refracted part.
            let k_d = (Vector3::new(1.0, 1.0, 1.0) - f) * (1.0 - metallic);
            let diffuse = k_d.component_mul(&albedo) / PI;

            let radiance = light.radiance(&varying.world_pos);
            lo += (diffuse + specular).component_mul(&radiance) * n_dot_l * shadow;
        }

        ambient.component_mul(&albedo) + lo + mat.emissive
    }

    fn blend_mode(&self) -> BlendMode {
        if self.opacity < 1.0 {
            BlendMode::Alpha(self.opacity)
        } else {
            BlendMode::Opaque
        }
    }
}
