//! Faceted hill blocks flanking the bridge ends.
//!
//! Each block rises from just below the water to just above the deck: three
//! stacked boxes for the bulk, then a handful of tapered prisms scattered on
//! top to break up the silhouette.

use super::{Animated, add_group, add_part};
use crate::procgen::normals::flat_shaded;
use crate::scene::graph::{NodeId, Renderable, SceneGraph, Transform};
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use nalgebra::Vector3;
use std::f32::consts::PI;

const WATER_LEVEL: f32 = -0.5;
const DECK_LEVEL: f32 = 9.4;
const ABOVE_DECK: f32 = 1.0;
const BELOW_WATER: f32 = 1.0;

const FOREST: u32 = 0x4a7c59;
const FOREST_DARK: u32 = 0x2f5233;
const FOREST_BROWN: u32 = 0x5d7c47;
const FOREST_MID: u32 = 0x3d6b47;

const BLOCK_FOOTPRINT: (f32, f32) = (30.0, 15.0);
const LEFT_POSITION: [f32; 3] = [-42.65, 7.4, -77.0];
const RIGHT_POSITION: [f32; 3] = [42.65, 7.4, -77.0];

/// The two hill blocks at the bridge ends.
#[derive(Debug, Clone)]
pub struct AdjacentHills {
    pub group: NodeId,
    /// `(block, resting y rotation)`, left then right.
    blocks: Vec<(NodeId, f32)>,
}

impl AdjacentHills {
    pub fn build(graph: &mut SceneGraph, parent: Option<NodeId>) -> Self {
        let group = add_group(graph, parent, "adjacent_hills", Transform::default());

        let left = build_block(graph, group, "adjacent_hills/left", LEFT_POSITION.into(), false);
        let right = build_block(graph, group, "adjacent_hills/right", RIGHT_POSITION.into(), true);
        // Turned around so the two ends do not mirror each other.
        if let Some(t) = graph.transform_mut(right) {
            t.rotation.y = PI;
        }

        Self {
            group,
            blocks: vec![(left, 0.0), (right, PI)],
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.blocks.iter().map(|(id, _)| *id)
    }
}

impl Animated for AdjacentHills {
    fn update(&self, graph: &mut SceneGraph, time: f32) {
        for (i, (id, base)) in self.blocks.iter().enumerate() {
            if let Some(t) = graph.transform_mut(*id) {
                t.rotation.y = base + (time * 0.2 + i as f32).sin() * 0.02;
            }
        }
    }
}

struct Palette {
    main: Material,
    dark: Material,
    bridge: Material,
    mid: Material,
}

impl Palette {
    fn new() -> Self {
        let faceted = |hex| Material::from_hex(hex).with_roughness(1.0).flat();
        Self {
            main: faceted(FOREST),
            dark: faceted(FOREST_DARK),
            bridge: faceted(FOREST_BROWN),
            mid: faceted(FOREST_MID),
        }
    }
}

fn piece(
    graph: &mut SceneGraph,
    block: NodeId,
    name: String,
    mesh: Mesh,
    material: &Material,
    transform: Transform,
) {
    add_part(
        graph,
        Some(block),
        name,
        Renderable::lit(flat_shaded(&mesh), material.clone()),
        transform,
    );
}

fn build_block(
    graph: &mut SceneGraph,
    parent: NodeId,
    name: &str,
    position: Vector3<f32>,
    is_right: bool,
) -> NodeId {
    let block = add_group(graph, Some(parent), name, Transform::from_position(position));
    let palette = Palette::new();
    let (sx, sz) = BLOCK_FOOTPRINT;

    let bottom = WATER_LEVEL - BELOW_WATER;
    let height = (DECK_LEVEL + ABOVE_DECK) - bottom;
    // Block center relative to the group origin.
    let rel = bottom + height * 0.5 - position.y;

    let at = |x: f32, y: f32, z: f32| Transform::from_position(Vector3::new(x, y, z));

    piece(
        graph,
        block,
        format!("{name}/base"),
        Mesh::create_box(sx, height * 0.6, sz),
        &palette.main,
        at(0.0, rel - height * 0.2, 0.0),
    );

    let (mid_x, mid_lift, mid_z, mid_material) = if is_right {
        // Inner edge lines up with the deck end.
        (-(sx * 0.5 - sx * 0.35) + 0.2, 0.02, 0.05, &palette.bridge)
    } else {
        (sx * 0.15 + 0.2, 0.15, 0.15, &palette.dark)
    };
    piece(
        graph,
        block,
        format!("{name}/middle"),
        Mesh::create_box(sx * 0.7, height * 0.4, sz * 0.8),
        mid_material,
        at(mid_x, rel + height * 0.1 + mid_lift, mid_z),
    );

    piece(
        graph,
        block,
        format!("{name}/top"),
        Mesh::create_box(sx * 0.5, height * 0.3, sz * 0.6),
        &palette.main,
        at(-sx * 0.1, rel + height * 0.25 + 0.04, sz * 0.1 + 0.15),
    );

    piece(
        graph,
        block,
        format!("{name}/ridge"),
        Mesh::create_cylinder(sx * 0.12, sx * 0.28, height * 0.35, 6),
        &palette.dark,
        at(-sx * 0.25, rel + height * 0.1, sz * 0.15).with_rotation(Vector3::new(0.0, 0.0, PI * 0.1)),
    );

    piece(
        graph,
        block,
        format!("{name}/dome"),
        Mesh::create_cylinder(sx * 0.08, sx * 0.35, height * 0.2, 8),
        &palette.main,
        at(sx * 0.3, rel + height * 0.25, -sz * 0.1),
    );

    piece(
        graph,
        block,
        format!("{name}/cliff"),
        Mesh::create_cylinder(0.0, sx * 0.2, height * 0.3, 3),
        &palette.mid,
        at(sx * 0.05, rel + height * 0.35, sz * 0.25).with_rotation(Vector3::new(0.0, PI * 0.3, 0.0)),
    );

    piece(
        graph,
        block,
        format!("{name}/tower"),
        Mesh::create_cylinder(sx * 0.06, sx * 0.15, height * 0.25, 5),
        &palette.dark,
        at(-sx * 0.05, rel + height * 0.4, -sz * 0.2).with_rotation(Vector3::new(PI * 0.05, 0.0, 0.0)),
    );

    piece(
        graph,
        block,
        format!("{name}/knoll"),
        Mesh::create_cylinder(sx * 0.1, sx * 0.22, height * 0.18, 4),
        &palette.mid,
        at(sx * 0.2, rel + height * 0.45, sz * 0.05)
            .with_rotation(Vector3::new(0.0, PI * 0.125, 0.0))
            .with_scale(Vector3::new(1.2, 1.0, 0.8)),
    );

    for i in 0..3 {
        let f = i as f32;
        let material = if i % 2 == 1 { &palette.main } else { &palette.dark };
        piece(
            graph,
            block,
            format!("{name}/peak_{i}"),
            Mesh::create_cylinder(sx * 0.02, sx * (0.06 + f * 0.02), height * (0.08 + f * 0.02), 3 + i),
            material,
            at(sx * (-0.15 + f * 0.1), rel + height * (0.5 + f * 0.05), sz * (-0.05 + f * 0.05))
                .with_rotation(Vector3::new(0.0, PI * f * 0.2, 0.0)),
        );
    }

    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::transform_point;
    use nalgebra::Point3;

    #[test]
    fn test_blocks_span_water_to_deck() {
        let mut graph = SceneGraph::new();
        let hills = AdjacentHills::build(&mut graph, None);
        let left = hills.blocks().next().unwrap();
        let world = graph.world_transforms();

        let base = graph.find_by_name("adjacent_hills/left/base").unwrap();
        let mesh = &graph.node(base).unwrap().renderable.as_ref().unwrap().mesh;
        let (min, _) = mesh.bounds().unwrap();
        let bottom = transform_point(&world[base.index()], &Point3::new(0.0, min.y, 0.0));
        assert!((bottom.y - (WATER_LEVEL - BELOW_WATER)).abs() < 1e-4);

        assert_eq!(graph.children(left).len(), 11);
    }

    #[test]
    fn test_right_block_keeps_half_turn_while_swaying() {
        let mut graph = SceneGraph::new();
        let hills = AdjacentHills::build(&mut graph, None);
        let right = hills.blocks().nth(1).unwrap();
        hills.update(&mut graph, 3.0);
        let y = graph.node(right).unwrap().transform.rotation.y;
        assert!((y - PI).abs() <= 0.02 + 1e-6);
    }

    #[test]
    fn test_pieces_are_faceted() {
        let mut graph = SceneGraph::new();
        AdjacentHills::build(&mut graph, None);
        let id = graph.find_by_name("adjacent_hills/right/cliff").unwrap();
        let r = graph.node(id).unwrap().renderable.as_ref().unwrap();
        assert!(r.material.flat_shading);
        assert_eq!(r.mesh.vertex_count(), r.mesh.indices.len());
    }
}
