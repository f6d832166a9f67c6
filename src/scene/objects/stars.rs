use super::{Animated, add_group, add_part};
use crate::procgen::scatter::sphere_shell;
use crate::scene::graph::{NodeId, Renderable, SceneGraph, Transform};
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use rand::Rng;

/// How many stars of each kind to scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarCounts {
    pub points: usize,
    pub bright: usize,
    pub spheres: usize,
}

impl Default for StarCounts {
    fn default() -> Self {
        Self {
            points: 1000,
            bright: 50,
            spheres: 20,
        }
    }
}

const POINT_SIZE: f32 = 3.5;
const BRIGHT_SIZE: f32 = 7.0;
const SPHERE_RADIUS: f32 = 0.44;
const SPHERE_OPACITY: f32 = 0.9;

/// Night sky: a shell of small point stars, a nearer shell of large ones and
/// a few solid spheres, all turning slowly together.
#[derive(Debug, Clone)]
pub struct Starfield {
    pub group: NodeId,
    pub points: NodeId,
    pub bright: NodeId,
    pub spheres: NodeId,
}

impl Starfield {
    pub fn build<R: Rng + ?Sized>(
        graph: &mut SceneGraph,
        parent: Option<NodeId>,
        counts: StarCounts,
        rng: &mut R,
    ) -> Self {
        let group = add_group(graph, parent, "starfield", Transform::default());
        let white = Material::from_hex(0xffffff);

        let positions = sphere_shell(rng, counts.points, 150.0, 100.0);
        let points = add_part(
            graph,
            Some(group),
            "starfield/points",
            Renderable::points(Mesh::from_points(&positions), white.clone(), POINT_SIZE),
            Transform::default(),
        );

        let positions = sphere_shell(rng, counts.bright, 120.0, 80.0);
        let bright = add_part(
            graph,
            Some(group),
            "starfield/bright",
            Renderable::points(Mesh::from_points(&positions), white.clone(), BRIGHT_SIZE),
            Transform::default(),
        );

        let spheres = add_group(graph, Some(group), "starfield/spheres", Transform::default());
        let sphere = Mesh::create_sphere(SPHERE_RADIUS, 8, 8);
        let sphere_material = white.with_opacity(SPHERE_OPACITY);
        for (i, p) in sphere_shell(rng, counts.spheres, 100.0, 60.0).iter().enumerate() {
            add_part(
                graph,
                Some(spheres),
                format!("starfield/spheres/{i}"),
                Renderable::unlit(sphere.clone(), sphere_material.clone()),
                Transform::from_position(p.coords),
            );
        }

        log::debug!(
            "Starfield: {} points, {} bright, {} spheres",
            counts.points,
            counts.bright,
            counts.spheres
        );

        Self {
            group,
            points,
            bright,
            spheres,
        }
    }
}

impl Animated for Starfield {
    fn update(&self, graph: &mut SceneGraph, time: f32) {
        if let Some(t) = graph.transform_mut(self.group) {
            t.rotation.y = time * 0.005;
        }
        if let Some(m) = graph.material_mut(self.points) {
            m.opacity = 0.7 + 0.3 * (time * 2.0).sin();
        }
        if let Some(m) = graph.material_mut(self.bright) {
            m.opacity = 0.8 + 0.2 * (time * 1.5).sin();
        }
    }
}
