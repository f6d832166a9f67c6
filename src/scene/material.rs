use crate::core::color::linear_from_hex;
use nalgebra::Vector3;

/// Surface parameters shared by every shading kind.
///
/// Colors are linear RGB. `roughness` and `metalness` follow the
/// metallic-roughness convention and drive the Cook-Torrance lobe of the
/// lit shader.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color. Multiplied with the vertex color when `vertex_colors` is set.
    pub color: Vector3<f32>,
    pub vertex_colors: bool,
    /// Roughness (0.0 = smooth, 1.0 = rough).
    pub roughness: f32,
    /// Metalness (0.0 = dielectric, 1.0 = metal).
    pub metalness: f32,
    /// Emissive color (light emitted by the surface).
    pub emissive: Vector3<f32>,
    /// 1.0 is opaque. Below that the surface is alpha-blended.
    pub opacity: f32,
    /// Shade with the face normal instead of interpolated vertex normals.
    pub flat_shading: bool,
    /// Disable back-face culling for this surface.
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vector3::new(1.0, 1.0, 1.0),
            vertex_colors: false,
            roughness: 0.5,
            metalness: 0.0,
            emissive: Vector3::zeros(),
            opacity: 1.0,
            flat_shading: false,
            double_sided: false,
        }
    }
}

impl Material {
    /// Standard lit material from a `0xRRGGBB` color.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            color: linear_from_hex(hex),
            ..Default::default()
        }
    }

    /// Material that takes its color from the mesh vertices.
    pub fn vertex_colored() -> Self {
        Self {
            vertex_colors: true,
            ..Default::default()
        }
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }

    pub fn with_emissive(mut self, emissive: Vector3<f32>) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn flat(mut self) -> Self {
        self.flat_shading = true;
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}
