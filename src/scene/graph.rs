//! Retained scene tree.
//!
//! Nodes live in an arena owned by [`SceneGraph`] and refer to each other by
//! [`NodeId`]. Each node carries a local transform relative to its parent;
//! world matrices are resolved top-down when the frame is drawn.

use crate::core::math::transform::TransformFactory;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix4, Vector3};

/// Index of a node inside its [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Local position, Euler rotation (XYZ, radians) and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_uniform_scale(self, s: f32) -> Self {
        self.with_scale(Vector3::new(s, s, s))
    }

    /// `T * Rx * Ry * Rz * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        TransformFactory::trs(&self.position, &self.rotation, &self.scale)
    }
}

/// How the renderer draws a node's mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderKind {
    /// Lit by the scene lights, optionally shadowed.
    Lit,
    /// Flat material color, alpha-blended by the material opacity.
    Unlit,
    /// Displaced and shaded by the water model.
    Ocean,
    /// Vertices drawn as additive round sprites, `size` pixels across at a
    /// view depth of half the frame height.
    Points { size: f32 },
}

#[derive(Debug, Clone)]
pub struct Renderable {
    pub mesh: Mesh,
    pub material: Material,
    pub kind: RenderKind,
    pub cast_shadow: bool,
}

impl Renderable {
    pub fn lit(mesh: Mesh, material: Material) -> Self {
        Self {
            mesh,
            material,
            kind: RenderKind::Lit,
            cast_shadow: true,
        }
    }

    pub fn unlit(mesh: Mesh, material: Material) -> Self {
        Self {
            mesh,
            material,
            kind: RenderKind::Unlit,
            cast_shadow: false,
        }
    }

    pub fn points(mesh: Mesh, material: Material, size: f32) -> Self {
        Self {
            mesh,
            material,
            kind: RenderKind::Points { size },
            cast_shadow: false,
        }
    }

    pub fn ocean(mesh: Mesh, material: Material) -> Self {
        Self {
            mesh,
            material,
            kind: RenderKind::Ocean,
            cast_shadow: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub renderable: Option<Renderable>,
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    /// A grouping node with no geometry.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            renderable: None,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_renderable(name: impl Into<String>, renderable: Renderable) -> Self {
        Self {
            renderable: Some(renderable),
            ..Self::group(name)
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed scene tree. Nodes are never removed, so ids stay valid
/// for the life of the graph.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `node` under `parent`, or as a root when `parent` is `None`.
    /// An unknown parent id makes the node a root.
    pub fn add_node(&mut self, parent: Option<NodeId>, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = parent.filter(|p| p.0 < self.nodes.len());
        node.parent = parent;
        node.children.clear();
        self.nodes.push(node);
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.node_mut(id).map(|n| &mut n.transform)
    }

    pub fn material_mut(&mut self, id: NodeId) -> Option<&mut Material> {
        self.node_mut(id)
            .and_then(|n| n.renderable.as_mut())
            .map(|r| &mut r.material)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node with the given name, in insertion order.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// World matrix of every node, indexed by `NodeId::index`.
    pub fn world_transforms(&self) -> Vec<Matrix4<f32>> {
        let mut world = vec![Matrix4::identity(); self.nodes.len()];
        let mut stack: Vec<(NodeId, Matrix4<f32>)> = self
            .roots
            .iter()
            .map(|&r| (r, Matrix4::identity()))
            .collect();

        while let Some((id, parent_world)) = stack.pop() {
            let node = &self.nodes[id.0];
            let m = parent_world * node.transform.matrix();
            world[id.0] = m;
            stack.extend(node.children.iter().map(|&c| (c, m)));
        }
        world
    }

    /// Nodes with geometry whose whole ancestor chain is visible, paired
    /// with their world matrix.
    pub fn renderables(&self) -> Vec<(Matrix4<f32>, &Renderable)> {
        let world = self.world_transforms();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if !node.visible {
                continue;
            }
            if let Some(r) = &node.renderable {
                out.push((world[id.0], r));
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::transform_point;
    use nalgebra::Point3;
    use std::f32::consts::FRAC_PI_2;

    fn leaf(name: &str) -> SceneNode {
        SceneNode::with_renderable(
            name,
            Renderable::lit(Mesh::create_placeholder(), Material::default()),
        )
    }

    #[test]
    fn test_world_transform_composes_parent_first() {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(
            None,
            SceneNode::group("root").with_transform(
                Transform::from_position(Vector3::new(0.0, -3.0, -40.0)).with_uniform_scale(0.4),
            ),
        );
        let child = graph.add_node(
            Some(root),
            leaf("tower").with_transform(Transform::from_position(Vector3::new(25.0, 12.5, 0.0))),
        );

        let world = graph.world_transforms();
        let p = transform_point(&world[child.index()], &Point3::origin());
        assert!((p - Point3::new(10.0, 2.0, -40.0)).norm() < 1e-5);
    }

    #[test]
    fn test_rotation_applies_to_children() {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(
            None,
            SceneNode::group("spin")
                .with_transform(Transform::default().with_rotation(Vector3::new(0.0, FRAC_PI_2, 0.0))),
        );
        let child = graph.add_node(
            Some(root),
            leaf("arm").with_transform(Transform::from_position(Vector3::new(1.0, 0.0, 0.0))),
        );
        let p = transform_point(&graph.world_transforms()[child.index()], &Point3::origin());
        assert!((p - Point3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_hidden_subtree_is_skipped() {
        let mut graph = SceneGraph::new();
        let group = graph.add_node(None, SceneNode::group("hills"));
        graph.add_node(Some(group), leaf("a"));
        graph.add_node(None, leaf("b"));
        assert_eq!(graph.renderables().len(), 2);

        graph.node_mut(group).unwrap().visible = false;
        assert_eq!(graph.renderables().len(), 1);
    }

    #[test]
    fn test_find_by_name_and_children() {
        let mut graph = SceneGraph::new();
        let group = graph.add_node(None, SceneNode::group("bridge"));
        let deck = graph.add_node(Some(group), leaf("deck"));
        assert_eq!(graph.find_by_name("deck"), Some(deck));
        assert_eq!(graph.children(group), &[deck]);
        assert_eq!(graph.node(deck).unwrap().parent(), Some(group));
        assert!(graph.find_by_name("missing").is_none());
    }
}
