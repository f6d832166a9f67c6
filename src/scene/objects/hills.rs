use super::{Animated, add_group, add_part};
use crate::core::color::{hsl_to_rgb, srgb_to_linear};
use crate::core::math::transform::TransformFactory;
use crate::scene::graph::{NodeId, Renderable, SceneGraph, Transform};
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use nalgebra::Vector3;
use std::f32::consts::{PI, TAU};

/// Placement and HSL color of one rounded hill.
#[derive(Debug, Clone, Copy)]
struct HillSpec {
    id: &'static str,
    radius: f32,
    x: f32,
    z: f32,
    rotation: f32,
    hue: f32,
    saturation: f32,
    lightness: f32,
}

#[allow(clippy::too_many_arguments)]
const fn hill(
    id: &'static str,
    radius: f32,
    x: f32,
    z: f32,
    rotation: f32,
    hue: f32,
    saturation: f32,
    lightness: f32,
) -> HillSpec {
    HillSpec {
        id,
        radius,
        x,
        z,
        rotation,
        hue,
        saturation,
        lightness,
    }
}

static MAIN_HILLS: [HillSpec; 8] = [
    hill("hill_main_1", 3.84, -20.0, -18.0, 0.5, 0.28, 0.45, 0.42),
    hill("hill_main_2", 3.36, -8.0, -22.0, 1.2, 0.32, 0.38, 0.48),
    hill("hill_main_3", 4.2, 5.0, -25.0, 2.1, 0.25, 0.52, 0.35),
    hill("hill_main_4", 3.12, 18.0, -20.0, 0.8, 0.35, 0.42, 0.45),
    hill("hill_main_5", 3.72, 28.0, -28.0, 1.7, 0.29, 0.48, 0.38),
    hill("hill_main_6", 3.48, -12.0, -35.0, 0.3, 0.31, 0.44, 0.41),
    hill("hill_main_7", 3.96, 12.0, -32.0, 1.9, 0.27, 0.46, 0.44),
    hill("hill_main_8", 3.24, -25.0, -30.0, 1.4, 0.33, 0.41, 0.39),
];

static BACKGROUND_HILLS: [HillSpec; 6] = [
    hill("hill_bg_1", 2.16, -35.0, -45.0, 0.7, 0.32, 0.35, 0.28),
    hill("hill_bg_2", 1.8, -15.0, -48.0, 1.5, 0.28, 0.38, 0.25),
    hill("hill_bg_3", 2.52, 8.0, -42.0, 0.2, 0.34, 0.32, 0.30),
    hill("hill_bg_4", 2.04, 25.0, -46.0, 1.8, 0.30, 0.36, 0.27),
    hill("hill_bg_5", 2.28, 40.0, -50.0, 1.1, 0.29, 0.34, 0.29),
    hill("hill_bg_6", 1.92, -20.0, -52.0, 0.9, 0.33, 0.37, 0.26),
];

const MAIN_BASE_Y: f32 = -1.5;
const BACKGROUND_BASE_Y: f32 = -2.0;
const BOB_AMPLITUDE: f32 = 0.002;

/// Rolling green hills along the San Francisco shore.
#[derive(Debug, Clone)]
pub struct SfHills {
    pub group: NodeId,
    /// `(node, resting y)` in build order; the order sets each hill's phase.
    hills: Vec<(NodeId, f32)>,
}

impl SfHills {
    pub fn build(graph: &mut SceneGraph, parent: Option<NodeId>) -> Self {
        let group = add_group(graph, parent, "sf_hills", Transform::default());
        let mut hills = Vec::with_capacity(MAIN_HILLS.len() + BACKGROUND_HILLS.len());

        for spec in &MAIN_HILLS {
            let mesh = Mesh::create_sphere_cap(spec.radius, 16, 8, 0.0, TAU, 0.0, PI * 0.6)
                .transformed(&TransformFactory::scaling_nonuniform(&Vector3::new(1.0, 0.7, 1.0)));
            let transform = Transform::from_position(Vector3::new(spec.x, MAIN_BASE_Y, spec.z))
                .with_rotation(Vector3::new(0.05, spec.rotation, 0.02));
            let id = add_part(
                graph,
                Some(group),
                spec.id,
                Renderable::lit(mesh, hill_material(spec, 0.9)),
                transform,
            );
            hills.push((id, MAIN_BASE_Y));
        }

        for spec in &BACKGROUND_HILLS {
            let mesh = Mesh::create_sphere_cap(spec.radius, 12, 6, 0.0, TAU, 0.0, PI * 0.5)
                .transformed(&TransformFactory::scaling_nonuniform(&Vector3::new(1.2, 0.5, 1.2)));
            let transform =
                Transform::from_position(Vector3::new(spec.x, BACKGROUND_BASE_Y, spec.z))
                    .with_rotation(Vector3::new(0.0, spec.rotation, 0.0));
            let id = add_part(
                graph,
                Some(group),
                spec.id,
                Renderable::lit(mesh, hill_material(spec, 0.95)),
                transform,
            );
            hills.push((id, BACKGROUND_BASE_Y));
        }

        Self { group, hills }
    }

    pub fn hill_count(&self) -> usize {
        self.hills.len()
    }

    /// Every hill's node name, in build order.
    pub fn hill_ids() -> impl Iterator<Item = &'static str> {
        MAIN_HILLS.iter().chain(&BACKGROUND_HILLS).map(|h| h.id)
    }
}

impl Animated for SfHills {
    fn update(&self, graph: &mut SceneGraph, time: f32) {
        for (i, (id, base_y)) in self.hills.iter().enumerate() {
            if let Some(t) = graph.transform_mut(*id) {
                t.position.y = base_y + (time * 0.3 + i as f32).sin() * BOB_AMPLITUDE;
            }
        }
    }
}

fn hill_material(spec: &HillSpec, roughness: f32) -> Material {
    Material {
        color: srgb_to_linear(hsl_to_rgb(spec.hue, spec.saturation, spec.lightness)),
        roughness,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourteen_named_hills() {
        let mut graph = SceneGraph::new();
        let hills = SfHills::build(&mut graph, None);
        assert_eq!(hills.hill_count(), 14);
        for id in SfHills::hill_ids() {
            assert!(graph.find_by_name(id).is_some(), "missing {id}");
        }
        assert_eq!(graph.children(hills.group).len(), 14);
    }

    #[test]
    fn test_bob_stays_near_rest_and_is_repeatable() {
        let mut graph = SceneGraph::new();
        let hills = SfHills::build(&mut graph, None);
        let first = graph.find_by_name("hill_main_1").unwrap();
        let bg = graph.find_by_name("hill_bg_6").unwrap();

        hills.update(&mut graph, 7.0);
        let y = graph.node(first).unwrap().transform.position.y;
        hills.update(&mut graph, 7.0);
        assert_eq!(graph.node(first).unwrap().transform.position.y, y);

        assert!((y - MAIN_BASE_Y).abs() <= BOB_AMPLITUDE + 1e-6);
        let y_bg = graph.node(bg).unwrap().transform.position.y;
        assert!((y_bg - BACKGROUND_BASE_Y).abs() <= BOB_AMPLITUDE + 1e-6);
    }

    #[test]
    fn test_hill_domes_are_flattened() {
        let mut graph = SceneGraph::new();
        SfHills::build(&mut graph, None);
        let id = graph.find_by_name("hill_main_3").unwrap();
        let mesh = &graph.node(id).unwrap().renderable.as_ref().unwrap().mesh;
        let (min, max) = mesh.bounds().unwrap();
        assert!((max.y - 4.2 * 0.7).abs() < 1e-4);
        assert!((min.y - 4.2 * (PI * 0.6).cos() * 0.7).abs() < 1e-4);
        assert!(mesh.validate().is_ok());
    }
}
