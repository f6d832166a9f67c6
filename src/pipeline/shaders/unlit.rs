use crate::core::geometry::Vertex;
use crate::core::pipeline::{BlendMode, Shader};
use crate::scene::material::Material;
use nalgebra::{Matrix4, Point2, Vector3, Vector4};

/// Flat color, no lighting. Used for the sphere stars.
pub struct UnlitShader {
    /// Model-View-Projection matrix.
    pub mvp_matrix: Matrix4<f32>,
    pub opacity: f32,
}

impl UnlitShader {
    pub fn new(mvp_matrix: Matrix4<f32>, opacity: f32) -> Self {
        Self {
            mvp_matrix,
            opacity,
        }
    }
}

impl Shader for UnlitShader {
    /// Vertex color, used when the material asks for it.
    type Varying = Vector3<f32>;

    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, Self::Varying) {
        let clip_pos = self.mvp_matrix * vertex.position.to_homogeneous();
        (clip_pos, vertex.color)
    }

    fn fragment(
        &self,
        varying: Self::Varying,
        material: Option<&Material>,
        _frag_coord: Point2<f32>,
    ) -> Vector3<f32> {
        match material {
            Some(m) if m.vertex_colors => m.color.component_mul(&varying),
            Some(m) => m.color,
            None => varying,
        }
    }

    fn blend_mode(&self) -> BlendMode {
        if self.opacity < 1.0 {
            BlendMode::Alpha(self.opacity)
        } else {
            BlendMode::Opaque
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_color_wins() {
        let s = UnlitShader::new(Matrix4::identity(), 0.9);
        let mat = Material::from_hex(0xffffff);
        let c = s.fragment(Vector3::new(0.1, 0.2, 0.3), Some(&mat), Point2::origin());
        assert!((c - Vector3::new(1.0, 1.0, 1.0)).norm() < 1e-5);
        assert_eq!(s.blend_mode(), BlendMode::Alpha(0.9));
    }
}
