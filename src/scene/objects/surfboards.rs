use super::{Animated, add_group, add_part};
use crate::procgen::scatter::ring_point;
use crate::scene::graph::{NodeId, Renderable, SceneGraph, Transform};
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use nalgebra::{Point3, Vector3};
use rand::Rng;
use std::f32::consts::TAU;

/// Board and stripe colors.
const DESIGNS: [(u32, u32); 5] = [
    (0xff4136, 0xffffff),
    (0x0074d9, 0xffdc00),
    (0x2ecc40, 0x001f3f),
    (0xffdc00, 0xff4136),
    (0xb10dc9, 0x7fdbff),
];

const FIN_COLOR: u32 = 0x333333;
const FIN_OFFSETS: [[f32; 3]; 3] = [[0.0, 0.1, -0.2], [-0.15, 0.05, -0.1], [0.15, 0.05, -0.1]];
const BOB_AMPLITUDE: f32 = 0.2;
/// The drift speed is tuned per frame at 60 frames a second.
const FRAMES_PER_SECOND: f32 = 60.0;

#[derive(Debug, Clone, Copy)]
struct Drift {
    node: NodeId,
    rest_y: f32,
    rest_yaw: f32,
    phase: f32,
    speed: f32,
    spin: f32,
}

/// Surfboards bobbing on the swell around the bay.
#[derive(Debug, Clone)]
pub struct Surfboards {
    pub group: NodeId,
    boards: Vec<Drift>,
}

impl Surfboards {
    pub fn build<R: Rng + ?Sized>(
        graph: &mut SceneGraph,
        parent: Option<NodeId>,
        count: usize,
        rng: &mut R,
    ) -> Self {
        let group = add_group(graph, parent, "surfboards", Transform::default());

        let board_mesh = Mesh::create_box(2.0, 0.1, 0.6);
        let stripe_mesh = Mesh::create_box(1.6, 0.05, 0.1);
        let fin_mesh = Mesh::create_box(0.1, 0.2, 0.15);
        let fin_material = Material::from_hex(FIN_COLOR);

        let mut boards = Vec::with_capacity(count);
        for i in 0..count {
            let (body, stripe) = DESIGNS[rng.random_range(0..DESIGNS.len())];

            let mut position = ring_point(rng, Point3::new(0.0, 0.0, -20.0), 15.0, 25.0);
            position.y = 0.5 + rng.random::<f32>() * 0.3;
            let rest_yaw = rng.random::<f32>() * TAU;
            let rotation = Vector3::new(rng.random::<f32>() * 0.2, rest_yaw, rng.random::<f32>() * 0.2);
            let scale = 0.8 + rng.random::<f32>() * 0.4;

            let name = format!("surfboards/{i}");
            let node = add_group(
                graph,
                Some(group),
                name.clone(),
                Transform::from_position(position.coords)
                    .with_rotation(rotation)
                    .with_uniform_scale(scale),
            );

            add_part(
                graph,
                Some(node),
                format!("{name}/board"),
                Renderable::lit(
                    board_mesh.clone(),
                    Material::from_hex(body).with_roughness(0.3).with_metalness(0.1),
                ),
                Transform::default(),
            );
            add_part(
                graph,
                Some(node),
                format!("{name}/stripe"),
                Renderable::lit(stripe_mesh.clone(), Material::from_hex(stripe).with_roughness(0.3)),
                Transform::from_position(Vector3::new(0.0, 0.01, 0.0)),
            );
            for (f, offset) in FIN_OFFSETS.iter().enumerate() {
                add_part(
                    graph,
                    Some(node),
                    format!("{name}/fin_{f}"),
                    Renderable::lit(fin_mesh.clone(), fin_material.clone()),
                    Transform::from_position(Vector3::from(*offset)),
                );
            }

            boards.push(Drift {
                node,
                rest_y: position.y,
                rest_yaw,
                phase: rng.random::<f32>() * TAU,
                speed: 0.5 + rng.random::<f32>() * 0.5,
                spin: (rng.random::<f32>() - 0.5) * 0.01,
            });
        }

        Self { group, boards }
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

impl Animated for Surfboards {
    fn update(&self, graph: &mut SceneGraph, time: f32) {
        for board in &self.boards {
            if let Some(t) = graph.transform_mut(board.node) {
                t.position.y = board.rest_y + (time * board.speed + board.phase).sin() * BOB_AMPLITUDE;
                t.rotation.y = board.rest_yaw + board.spin * FRAMES_PER_SECOND * time;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_boards_float_in_the_ring() {
        let mut graph = SceneGraph::new();
        let boards = Surfboards::build(&mut graph, None, 12, &mut StdRng::seed_from_u64(42));
        assert_eq!(boards.len(), 12);
        for &id in graph.children(boards.group) {
            let node = graph.node(id).unwrap();
            let p = node.transform.position;
            let d = (p.x * p.x + (p.z + 20.0) * (p.z + 20.0)).sqrt();
            assert!((15.0 - 1e-3..40.0 + 1e-3).contains(&d));
            assert!((0.5..=0.8).contains(&p.y));
            assert_eq!(graph.children(id).len(), 5);
        }
    }

    #[test]
    fn test_bob_is_a_function_of_time() {
        let mut graph = SceneGraph::new();
        let boards = Surfboards::build(&mut graph, None, 3, &mut StdRng::seed_from_u64(3));
        let first = graph.children(boards.group)[0];

        boards.update(&mut graph, 4.0);
        let a = graph.node(first).unwrap().transform;
        boards.update(&mut graph, 9.0);
        boards.update(&mut graph, 4.0);
        let b = graph.node(first).unwrap().transform;
        assert_eq!(a, b);

        let rest = boards.boards[0].rest_y;
        assert!((a.position.y - rest).abs() <= BOB_AMPLITUDE + 1e-6);
    }
}
