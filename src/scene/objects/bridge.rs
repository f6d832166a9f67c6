use super::{Animated, add_group, add_part};
use crate::procgen::cable::{SagCurve, hanger_anchors, twin_cables};
use crate::procgen::tube::build_tube;
use crate::scene::graph::{NodeId, Renderable, SceneGraph, Transform};
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use nalgebra::Vector3;

const TOWER_X: f32 = 25.0;
const BRIDGE_Z: f32 = -10.0;
const CABLE_OFFSET: f32 = 1.5;
const CABLE_ANCHOR_Y: f32 = 25.0;
/// Drops the cable to y = 20 at mid-span.
const CABLE_SAG: f32 = 20.0;
const CABLE_SAMPLES: usize = 100;
const HANGER_DECK_Y: f32 = 8.5;
const HANGER_SPACING: f32 = 2.0;

const INTERNATIONAL_ORANGE: u32 = 0xc0392b;
const DECK_COLOR: u32 = 0x2c3e50;
const CABLE_COLOR: u32 = 0x34495e;

/// The suspension bridge: two towers, the deck with its barriers, the twin
/// main cables and the vertical hangers.
#[derive(Debug, Clone)]
pub struct Bridge {
    pub root: NodeId,
    pub near_cable: SagCurve,
    pub far_cable: SagCurve,
    pub hanger_count: usize,
}

impl Bridge {
    pub fn build(graph: &mut SceneGraph, parent: Option<NodeId>) -> Self {
        let root = add_group(
            graph,
            parent,
            "bridge",
            Transform::from_position(Vector3::new(0.0, -3.0, -40.0)).with_uniform_scale(0.4),
        );

        let tower_material = Material::from_hex(INTERNATIONAL_ORANGE)
            .with_roughness(0.6)
            .with_metalness(0.4);
        for (side, x) in [("west", -TOWER_X), ("east", TOWER_X)] {
            build_tower(graph, root, side, x, &tower_material);
        }

        build_deck(graph, root, &tower_material);

        let (near_cable, far_cable) = twin_cables(
            -TOWER_X,
            TOWER_X,
            CABLE_ANCHOR_Y,
            CABLE_ANCHOR_Y,
            CABLE_SAG,
            CABLE_SAMPLES,
            BRIDGE_Z,
            CABLE_OFFSET,
        );
        let hanger_count = build_cables(graph, root, &near_cable, &far_cable);

        log::debug!("Bridge built with {} hangers", hanger_count);

        Self {
            root,
            near_cable,
            far_cable,
            hanger_count,
        }
    }
}

impl Animated for Bridge {
    fn update(&self, graph: &mut SceneGraph, time: f32) {
        if let Some(t) = graph.transform_mut(self.root) {
            t.rotation.z = (time * 0.3).sin() * 0.01;
        }
    }
}

fn build_tower(graph: &mut SceneGraph, root: NodeId, side: &str, x: f32, material: &Material) {
    let tower = add_group(
        graph,
        Some(root),
        format!("bridge/tower_{side}"),
        Transform::from_position(Vector3::new(x, 0.0, BRIDGE_Z)),
    );

    add_part(
        graph,
        Some(tower),
        format!("bridge/tower_{side}/shaft"),
        Renderable::lit(Mesh::create_box(1.5, 25.0, 1.5), material.clone()),
        Transform::from_position(Vector3::new(0.0, 12.5, 0.0)),
    );

    let beam = Mesh::create_box(2.0, 0.3, 0.3);
    for i in 0..5 {
        add_part(
            graph,
            Some(tower),
            format!("bridge/tower_{side}/beam_{i}"),
            Renderable::lit(beam.clone(), material.clone()),
            Transform::from_position(Vector3::new(0.0, 5.0 + i as f32 * 4.0, 0.0)),
        );
    }

    add_part(
        graph,
        Some(tower),
        format!("bridge/tower_{side}/cap"),
        Renderable::lit(Mesh::create_box(2.0, 1.0, 2.0), material.clone()),
        Transform::from_position(Vector3::new(0.0, 26.0, 0.0)),
    );
}

fn build_deck(graph: &mut SceneGraph, root: NodeId, barrier_material: &Material) {
    let deck = add_group(
        graph,
        Some(root),
        "bridge/deck",
        Transform::from_position(Vector3::new(0.0, 0.0, BRIDGE_Z)),
    );

    let deck_material = Material::from_hex(DECK_COLOR)
        .with_roughness(0.8)
        .with_metalness(0.2);
    add_part(
        graph,
        Some(deck),
        "bridge/deck/roadway",
        Renderable::lit(Mesh::create_box(60.0, 0.8, 4.0), deck_material),
        Transform::from_position(Vector3::new(0.0, 8.0, 0.0)),
    );

    let barrier = Mesh::create_box(60.0, 1.0, 0.2);
    for (side, z) in [("north", 2.1), ("south", -2.1)] {
        add_part(
            graph,
            Some(deck),
            format!("bridge/deck/barrier_{side}"),
            Renderable::lit(barrier.clone(), barrier_material.clone()),
            Transform::from_position(Vector3::new(0.0, 9.0, z)),
        );
    }
}

/// Adds the main cables and their hangers. Returns the hanger count.
fn build_cables(
    graph: &mut SceneGraph,
    root: NodeId,
    near_cable: &SagCurve,
    far_cable: &SagCurve,
) -> usize {
    let cables = add_group(graph, Some(root), "bridge/cables", Transform::default());

    let cable_material = Material::from_hex(CABLE_COLOR)
        .with_roughness(0.3)
        .with_metalness(0.7);
    let hanger_material = Material::from_hex(DECK_COLOR)
        .with_roughness(0.4)
        .with_metalness(0.6);

    let mut hangers = 0;
    for (label, curve) in [("near", near_cable), ("far", far_cable)] {
        add_part(
            graph,
            Some(cables),
            format!("bridge/cables/main_{label}"),
            Renderable::lit(build_tube(&curve.points, 0.08, 8), cable_material.clone()),
            Transform::default(),
        );

        for (i, hanger) in hanger_anchors(curve, HANGER_DECK_Y, HANGER_SPACING)
            .iter()
            .enumerate()
        {
            add_part(
                graph,
                Some(cables),
                format!("bridge/cables/hanger_{label}_{i}"),
                Renderable::lit(
                    Mesh::create_cylinder(0.02, 0.02, hanger.length(), 6),
                    hanger_material.clone(),
                ),
                Transform::from_position(Vector3::new(hanger.x, hanger.mid_height(), hanger.z)),
            );
            hangers += 1;
        }
    }
    hangers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_layout() {
        let mut graph = SceneGraph::new();
        let bridge = Bridge::build(&mut graph, None);

        assert_eq!(bridge.hanger_count, 50);
        assert_eq!(bridge.near_cable.z, -8.5);
        assert_eq!(bridge.far_cable.z, -11.5);
        assert!((bridge.near_cable.height_at_x(0.0) - 20.0).abs() < 1e-4);

        assert!(graph.find_by_name("bridge/tower_west/shaft").is_some());
        assert!(graph.find_by_name("bridge/tower_east/beam_4").is_some());
        assert!(graph.find_by_name("bridge/deck/barrier_south").is_some());
        assert!(graph.find_by_name("bridge/cables/hanger_far_24").is_some());

        for (_, r) in graph.renderables() {
            assert!(r.mesh.validate().is_ok());
        }
    }

    #[test]
    fn test_bridge_sways() {
        let mut graph = SceneGraph::new();
        let bridge = Bridge::build(&mut graph, None);
        bridge.update(&mut graph, 0.0);
        assert_eq!(graph.node(bridge.root).map(|n| n.transform.rotation.z), Some(0.0));

        let t = std::f32::consts::PI / 0.6;
        bridge.update(&mut graph, t);
        let z = graph.node(bridge.root).map(|n| n.transform.rotation.z).unwrap();
        assert!((z - 0.01).abs() < 1e-6);
    }
}
