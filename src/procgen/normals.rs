use crate::core::geometry::Vertex;
use crate::scene::mesh::Mesh;
use nalgebra::Vector3;

/// Unit vector or `fallback` when `v` is too short to normalize.
#[inline]
pub fn normalize_or(v: Vector3<f32>, fallback: Vector3<f32>) -> Vector3<f32> {
    let len = v.norm();
    if len > 1e-8 && len.is_finite() {
        v / len
    } else {
        fallback
    }
}

/// Area-weighted smooth normals.
///
/// Each face adds its unnormalized cross product (twice its area) to its
/// three vertices. Vertices no face touches get +Y.
pub fn compute_vertex_normals(mesh: &mut Mesh) {
    let mut acc = vec![Vector3::zeros(); mesh.vertices.len()];

    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= acc.len() || b >= acc.len() || c >= acc.len() {
            continue;
        }
        let p0 = mesh.vertices[a].position;
        let p1 = mesh.vertices[b].position;
        let p2 = mesh.vertices[c].position;
        let face = (p1 - p0).cross(&(p2 - p0));
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }

    for (v, n) in mesh.vertices.iter_mut().zip(acc) {
        v.normal = normalize_or(n, Vector3::y());
    }
}

/// Unwelds every triangle so it carries its own face normal, for faceted
/// low-poly surfaces. Vertex colors are kept per corner.
pub fn flat_shaded(mesh: &Mesh) -> Mesh {
    let mut vertices = Vec::with_capacity(mesh.indices.len());
    let mut indices = Vec::with_capacity(mesh.indices.len());

    for tri in mesh.indices.chunks_exact(3) {
        let corners: Vec<&Vertex> = tri
            .iter()
            .filter_map(|&i| mesh.vertices.get(i as usize))
            .collect();
        if corners.len() != 3 {
            continue;
        }
        let face = (corners[1].position - corners[0].position)
            .cross(&(corners[2].position - corners[0].position));
        let normal = normalize_or(face, Vector3::y());

        for corner in corners {
            indices.push(vertices.len() as u32);
            vertices.push(Vertex {
                normal,
                ..*corner
            });
        }
    }

    Mesh::new(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn quad() -> Mesh {
        let n = Vector3::zeros();
        Mesh::new(
            vec![
                Vertex::new(Point3::new(0.0, 0.0, 0.0), n),
                Vertex::new(Point3::new(0.0, 0.0, 1.0), n),
                Vertex::new(Point3::new(1.0, 0.0, 1.0), n),
                Vertex::new(Point3::new(1.0, 0.0, 0.0), n),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_smooth_normals_face_up() {
        let mut mesh = quad();
        compute_vertex_normals(&mut mesh);
        for v in &mesh.vertices {
            assert!((v.normal - Vector3::y()).norm() < 1e-6);
        }
    }

    #[test]
    fn test_unreferenced_vertex_gets_fallback() {
        let mut mesh = quad();
        mesh.vertices
            .push(Vertex::new(Point3::new(5.0, 5.0, 5.0), Vector3::zeros()));
        compute_vertex_normals(&mut mesh);
        assert_eq!(mesh.vertices[4].normal, Vector3::y());
    }

    #[test]
    fn test_flat_shaded_unwelds() {
        let flat = flat_shaded(&quad());
        assert_eq!(flat.vertex_count(), 6);
        assert_eq!(flat.triangle_count(), 2);
        for tri in flat.indices.chunks(3) {
            let n0 = flat.vertices[tri[0] as usize].normal;
            assert_eq!(n0, flat.vertices[tri[1] as usize].normal);
            assert_eq!(n0, flat.vertices[tri[2] as usize].normal);
        }
    }

    #[test]
    fn test_normalize_or_guards_zero() {
        assert_eq!(normalize_or(Vector3::zeros(), Vector3::x()), Vector3::x());
        assert_eq!(
            normalize_or(Vector3::new(f32::NAN, 0.0, 0.0), Vector3::x()),
            Vector3::x()
        );
    }
}
