use super::add_part;
use crate::procgen::terrain::{RadialMeshParams, build_radial_mesh};
use crate::scene::graph::{NodeId, Renderable, SceneGraph, Transform};
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;

/// The radial headland hill, colored per vertex from grass to rock.
#[derive(Debug, Clone)]
pub struct Headland {
    pub node: NodeId,
    /// False when the builder rejected its parameters and a placeholder was
    /// drawn instead.
    pub built: bool,
}

impl Headland {
    pub fn build(graph: &mut SceneGraph, parent: Option<NodeId>, params: &RadialMeshParams) -> Self {
        let (mesh, built) = match build_radial_mesh(params) {
            Ok(mesh) => {
                log::debug!(
                    "Headland: {} vertices, {} triangles",
                    mesh.vertex_count(),
                    mesh.triangle_count()
                );
                (mesh, true)
            }
            Err(e) => {
                log::error!("Headland mesh failed, using placeholder: {}", e);
                (Mesh::create_placeholder(), false)
            }
        };

        let material = Material::vertex_colored().with_roughness(1.0);
        let node = add_part(
            graph,
            parent,
            "headland",
            Renderable::lit(mesh, material),
            Transform::default(),
        );
        Self { node, built }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headland_preset_builds() {
        let mut graph = SceneGraph::new();
        let h = Headland::build(&mut graph, None, &RadialMeshParams::headland());
        assert!(h.built);
        let r = graph.node(h.node).unwrap().renderable.as_ref().unwrap();
        assert_eq!(r.mesh.vertex_count(), 73 * 61);
    }

    #[test]
    fn test_bad_params_fall_back_to_placeholder() {
        let mut graph = SceneGraph::new();
        let params = RadialMeshParams {
            major_radius: -1.0,
            ..RadialMeshParams::headland()
        };
        let h = Headland::build(&mut graph, None, &params);
        assert!(!h.built);
        let r = graph.node(h.node).unwrap().renderable.as_ref().unwrap();
        let placeholder = Mesh::create_placeholder();
        assert_eq!(r.mesh.vertex_count(), placeholder.vertex_count());
        assert_eq!(r.mesh.triangle_count(), placeholder.triangle_count());
    }
}
