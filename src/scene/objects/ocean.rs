use super::add_part;
use crate::pipeline::shaders::ocean::OceanUniforms;
use crate::scene::graph::{NodeId, Renderable, SceneGraph, Transform};
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use nalgebra::Vector3;

pub const OCEAN_SIZE: f32 = 200.0;
pub const OCEAN_SEGMENTS: usize = 50;
pub const OCEAN_LEVEL: f32 = -0.5;

/// The water plane. Its shading state lives in [`OceanUniforms`], which the
/// application context owns and this handle advances each frame.
#[derive(Debug, Clone)]
pub struct Ocean {
    pub node: NodeId,
}

impl Ocean {
    pub fn build(graph: &mut SceneGraph, parent: Option<NodeId>, uniforms: &OceanUniforms) -> Self {
        let mesh = Mesh::create_plane_grid(OCEAN_SIZE, OCEAN_SIZE, OCEAN_SEGMENTS, OCEAN_SEGMENTS);
        let material = Material {
            color: uniforms.water_color,
            opacity: uniforms.opacity,
            ..Default::default()
        }
        .double_sided();

        let node = add_part(
            graph,
            parent,
            "ocean",
            Renderable::ocean(mesh, material),
            Transform::from_position(Vector3::new(0.0, OCEAN_LEVEL, 0.0)),
        );
        Self { node }
    }

    pub fn update(&self, uniforms: &mut OceanUniforms, time: f32) {
        uniforms.time = time;
    }
}
