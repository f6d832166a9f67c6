use crate::core::geometry::Vertex;
use crate::procgen::normals::normalize_or;
use crate::scene::mesh::Mesh;
use nalgebra::{Point3, Vector3};
use std::f32::consts::TAU;

/// Unit tangents of a polyline from central differences.
fn tangents(points: &[Point3<f32>]) -> Vec<Vector3<f32>> {
    let n = points.len();
    (0..n)
        .map(|i| {
            let prev = points[i.saturating_sub(1)];
            let next = points[(i + 1).min(n - 1)];
            normalize_or(next - prev, Vector3::x())
        })
        .collect()
}

/// Any unit vector perpendicular to `t`.
fn perpendicular(t: &Vector3<f32>) -> Vector3<f32> {
    // Cross with the axis least aligned with t.
    let axis = if t.x.abs() <= t.y.abs() && t.x.abs() <= t.z.abs() {
        Vector3::x()
    } else if t.y.abs() <= t.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    normalize_or(t.cross(&axis), Vector3::y())
}

/// Sweeps a circle of `radius` along `points`.
///
/// Frames are carried by parallel transport so the tube does not twist.
/// Ends are left open. Fewer than two points yield an empty mesh.
pub fn build_tube(points: &[Point3<f32>], radius: f32, radial_segments: usize) -> Mesh {
    if points.len() < 2 {
        return Mesh::default();
    }
    let segments = radial_segments.max(3);
    let ring = segments + 1;
    let tangents = tangents(points);

    let mut normal = perpendicular(&tangents[0]);
    let mut vertices = Vec::with_capacity(points.len() * ring);

    for (i, (p, t)) in points.iter().zip(&tangents).enumerate() {
        if i > 0 {
            // Remove the component along the new tangent, keep the old roll.
            normal = normalize_or(normal - t * normal.dot(t), perpendicular(t));
        }
        let binormal = t.cross(&normal);

        for s in 0..=segments {
            let angle = s as f32 / segments as f32 * TAU;
            let (sin, cos) = angle.sin_cos();
            let dir = normal * cos + binormal * sin;
            vertices.push(Vertex::new(p + dir * radius, dir));
        }
    }

    let mut indices = Vec::with_capacity((points.len() - 1) * segments * 6);
    for i in 0..points.len() - 1 {
        for s in 0..segments {
            let a = (i * ring + s) as u32;
            let b = ((i + 1) * ring + s) as u32;
            let c = b + 1;
            let d = a + 1;
            indices.extend_from_slice(&[a, d, b, b, d, c]);
        }
    }

    Mesh::new(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procgen::cable::build_sag_curve;

    #[test]
    fn test_tube_counts() {
        let pts = build_sag_curve(-25.0, 25.0, 25.0, 25.0, 20.0, 100);
        let tube = build_tube(&pts, 0.08, 8);
        assert_eq!(tube.vertex_count(), 101 * 9);
        assert_eq!(tube.triangle_count(), 100 * 8 * 2);
        assert!(tube.validate().is_ok());
    }

    #[test]
    fn test_tube_surface_keeps_radius() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let tube = build_tube(&pts, 0.5, 6);
        for (i, p) in pts.iter().enumerate() {
            for v in &tube.vertices[i * 7..(i + 1) * 7] {
                assert!(((v.position - p).norm() - 0.5).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_tube_faces_outward() {
        let pts = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 4.0)];
        let tube = build_tube(&pts, 1.0, 8);
        for tri in tube.indices.chunks(3) {
            let p0 = tube.vertices[tri[0] as usize].position;
            let p1 = tube.vertices[tri[1] as usize].position;
            let p2 = tube.vertices[tri[2] as usize].position;
            let n = (p1 - p0).cross(&(p2 - p0));
            let radial = Vector3::new(p0.x + p1.x + p2.x, p0.y + p1.y + p2.y, 0.0);
            assert!(n.dot(&radial) > 0.0);
        }
    }

    #[test]
    fn test_degenerate_input() {
        assert!(build_tube(&[Point3::origin()], 1.0, 8).is_empty());
    }
}
