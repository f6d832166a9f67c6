use crate::core::geometry::Vertex;
use crate::core::pipeline::Interpolatable;
use crate::core::pipeline::Shader;
use crate::scene::material::Material;
use nalgebra::{Matrix4, Point2, Vector3, Vector4};
use std::ops::{Add, Mul};

#[derive(Clone, Copy, Debug)]
pub struct ShadowVarying; // Depth only

impl Add for ShadowVarying {
    type Output = Self;
    fn add(self, _other: Self) -> Self {
        Self
    }
}

impl Mul<f32> for ShadowVarying {
    type Output = Self;
    fn mul(self, _scalar: f32) -> Self {
        Self
    }
}

impl Interpolatable for ShadowVarying {}

pub struct ShadowShader {
    pub mvp_matrix: Matrix4<f32>,
}

impl ShadowShader {
    pub fn new(model: Matrix4<f32>, light_space: Matrix4<f32>) -> Self {
        Self {
            mvp_matrix: light_space * model,
        }
    }
}

impl Shader for ShadowShader {
    type Varying = ShadowVarying;

    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, Self::Varying) {
        let clip_pos = self.mvp_matrix * vertex.position.to_homogeneous();
        (clip_pos, ShadowVarying)
    }

    fn fragment(
        &self,
        _varying: Self::Varying,
        _material: Option<&Material>,
        _frag_coord: Point2<f32>,
    ) -> Vector3<f32> {
        // The rasterizer writes depth; color is discarded.
        Vector3::zeros()
    }
}
