//! Builders that populate the scene graph with the bay's objects.
//!
//! Each builder adds its nodes under a named group and returns a handle that
//! knows which nodes to move when the clock advances.

pub mod adjacent_hills;
pub mod bridge;
pub mod headland;
pub mod hills;
pub mod lighting;
pub mod ocean;
pub mod stars;
pub mod surfboards;

use crate::scene::graph::{NodeId, Renderable, SceneGraph, SceneNode, Transform};

pub use adjacent_hills::AdjacentHills;
pub use bridge::Bridge;
pub use headland::Headland;
pub use hills::SfHills;
pub use lighting::SunsetLighting;
pub use ocean::Ocean;
pub use stars::Starfield;
pub use surfboards::Surfboards;

/// Per-frame animation of graph nodes.
///
/// `update` is a pure function of `time`: calling it twice with the same
/// time leaves the graph unchanged.
pub trait Animated {
    fn update(&self, graph: &mut SceneGraph, time: f32);
}

/// Adds an empty group node.
pub(crate) fn add_group(
    graph: &mut SceneGraph,
    parent: Option<NodeId>,
    name: impl Into<String>,
    transform: Transform,
) -> NodeId {
    graph.add_node(parent, SceneNode::group(name).with_transform(transform))
}

/// Adds a drawable node.
pub(crate) fn add_part(
    graph: &mut SceneGraph,
    parent: Option<NodeId>,
    name: impl Into<String>,
    renderable: Renderable,
    transform: Transform,
) -> NodeId {
    graph.add_node(
        parent,
        SceneNode::with_renderable(name, renderable).with_transform(transform),
    )
}
