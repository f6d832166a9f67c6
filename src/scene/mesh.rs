use crate::SceneError;
use crate::core::geometry::Vertex;
use crate::core::math::transform::{TransformFactory, transform_point};
use nalgebra::{Matrix4, Point3, Vector3};

/// A collection of vertices and indices representing a 3D object.
///
/// Triangles are counter-clockwise when seen from the side their normal
/// points to. A mesh with no indices is a point cloud.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// List of vertices.
    pub vertices: Vec<Vertex>,
    /// List of indices defining triangles (3 indices per triangle).
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// A point cloud: every position becomes a vertex, no triangles.
    pub fn from_points(points: &[Point3<f32>]) -> Self {
        Self {
            vertices: points
                .iter()
                .map(|p| Vertex::new(*p, Vector3::y()))
                .collect(),
            indices: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Checks that the index list is whole triangles and every index
    /// addresses an existing vertex.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.indices.len() % 3 != 0 {
            return Err(SceneError::invalid(
                "mesh",
                format!("{} indices is not a multiple of 3", self.indices.len()),
            ));
        }
        let vertex_count = self.vertices.len();
        match self
            .indices
            .iter()
            .find(|&&i| i as usize >= vertex_count)
        {
            Some(&index) => Err(SceneError::IndexOutOfRange {
                index,
                vertex_count,
            }),
            None => Ok(()),
        }
    }

    /// Appends `other`, offsetting its indices past the current vertices.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Bakes a transform into positions and normals.
    pub fn transformed(mut self, matrix: &Matrix4<f32>) -> Self {
        let normal_matrix = TransformFactory::normal_matrix(matrix);
        for v in &mut self.vertices {
            v.position = transform_point(matrix, &v.position);
            let n = normal_matrix * v.normal;
            let len = n.norm();
            v.normal = if len > 1e-8 { n / len } else { Vector3::y() };
        }
        self
    }

    /// Paints every vertex with one color.
    pub fn with_color(mut self, color: Vector3<f32>) -> Self {
        for v in &mut self.vertices {
            v.color = color;
        }
        self
    }

    /// Axis-aligned bounds of the vertex positions, `None` when empty.
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (lo.inf(&v.position), hi.sup(&v.position))
        }))
    }

    /// Small flat triangle used when a builder rejects its input.
    pub fn create_placeholder() -> Self {
        let n = Vector3::new(0.0, 1.0, 0.0);
        let vertices = vec![
            Vertex::new(Point3::new(-0.5, 0.0, 0.5), n),
            Vertex::new(Point3::new(0.5, 0.0, 0.5), n),
            Vertex::new(Point3::new(0.0, 0.0, -0.5), n),
        ];
        Self::new(vertices, vec![0, 1, 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_catches_bad_index() {
        let mut mesh = Mesh::create_placeholder();
        assert!(mesh.validate().is_ok());
        mesh.indices.extend([0, 1, 7]);
        assert!(matches!(
            mesh.validate(),
            Err(SceneError::IndexOutOfRange { index: 7, vertex_count: 3 })
        ));
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = Mesh::create_placeholder();
        a.merge(&Mesh::create_placeholder());
        assert_eq!(a.vertex_count(), 6);
        assert_eq!(&a.indices[3..], &[3, 4, 5]);
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_transformed_moves_positions() {
        let m = Mesh::create_placeholder()
            .transformed(&TransformFactory::translation(&Vector3::new(0.0, 2.0, 0.0)));
        let (lo, hi) = m.bounds().unwrap();
        assert_eq!(lo.y, 2.0);
        assert_eq!(hi.y, 2.0);
        assert!((m.vertices[0].normal - Vector3::y()).norm() < 1e-6);
    }
}
