//! Parametric building blocks for the scene objects.
//!
//! All shapes are centered on the origin unless noted, wind counter-clockwise
//! seen from outside, and carry white vertex colors.

use crate::core::geometry::Vertex;
use crate::scene::mesh::Mesh;
use nalgebra::{Point3, Vector3};
use std::f32::consts::{PI, TAU};

impl Mesh {
    /// Axis-aligned box with 24 vertices so each face keeps a flat normal.
    pub fn create_box(width: f32, height: f32, depth: f32) -> Self {
        let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

        // (normal, u, v) with u x v = normal
        let faces = [
            (Vector3::x(), -Vector3::z(), Vector3::y()),
            (-Vector3::x(), Vector3::z(), Vector3::y()),
            (Vector3::y(), Vector3::x(), -Vector3::z()),
            (-Vector3::y(), Vector3::x(), Vector3::z()),
            (Vector3::z(), Vector3::x(), Vector3::y()),
            (-Vector3::z(), -Vector3::x(), Vector3::y()),
        ];
        let half = Vector3::new(hx, hy, hz);

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u, v) in faces {
            let center = normal.component_mul(&half);
            let u = u.component_mul(&half);
            let v = v.component_mul(&half);
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                vertices.push(Vertex::new(Point3::from(center + u * su + v * sv), normal));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(vertices, indices)
    }

    /// Capped frustum along Y. Equal radii give a cylinder, a zero radius a
    /// cone, and a small `radial_segments` a prism.
    pub fn create_cylinder(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: usize,
    ) -> Self {
        let segments = radial_segments.max(3);
        let half_h = height * 0.5;
        let slope = if height.abs() > 1e-8 {
            (radius_bottom - radius_top) / height
        } else {
            0.0
        };

        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        // Side: two rows, seam duplicated.
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            let normal = Vector3::new(sin, slope, cos).normalize();
            vertices.push(Vertex::new(
                Point3::new(radius_top * sin, half_h, radius_top * cos),
                normal,
            ));
            vertices.push(Vertex::new(
                Point3::new(radius_bottom * sin, -half_h, radius_bottom * cos),
                normal,
            ));
        }
        for i in 0..segments as u32 {
            let a = i * 2;
            let b = a + 1;
            let c = a + 3;
            let d = a + 2;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        for (radius, y, up) in [(radius_top, half_h, true), (radius_bottom, -half_h, false)] {
            if radius <= 0.0 {
                continue;
            }
            let normal = if up { Vector3::y() } else { -Vector3::y() };
            let center = vertices.len() as u32;
            vertices.push(Vertex::new(Point3::new(0.0, y, 0.0), normal));
            for i in 0..=segments {
                let theta = i as f32 / segments as f32 * TAU;
                let (sin, cos) = theta.sin_cos();
                vertices.push(Vertex::new(Point3::new(radius * sin, y, radius * cos), normal));
            }
            for i in 0..segments as u32 {
                let r0 = center + 1 + i;
                let r1 = r0 + 1;
                if up {
                    indices.extend_from_slice(&[center, r0, r1]);
                } else {
                    indices.extend_from_slice(&[center, r1, r0]);
                }
            }
        }

        Self::new(vertices, indices)
    }

    /// Partial UV sphere. `theta` is measured from +Y down, `phi` around Y.
    /// A full sphere is `(0, TAU, 0, PI)`; `theta_length < PI` leaves an
    /// open dome, the shape used for rolling hills.
    pub fn create_sphere_cap(
        radius: f32,
        width_segments: usize,
        height_segments: usize,
        phi_start: f32,
        phi_length: f32,
        theta_start: f32,
        theta_length: f32,
    ) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let theta_end = (theta_start + theta_length).min(PI);

        let mut vertices = Vec::with_capacity((ws + 1) * (hs + 1));
        let mut grid = Vec::with_capacity(hs + 1);

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            let theta = theta_start + v * theta_length;
            let mut row = Vec::with_capacity(ws + 1);
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let phi = phi_start + u * phi_length;
                let dir = Vector3::new(
                    -phi.cos() * theta.sin(),
                    theta.cos(),
                    phi.sin() * theta.sin(),
                );
                row.push(vertices.len() as u32);
                vertices.push(Vertex::new(Point3::from(dir * radius), dir));
            }
            grid.push(row);
        }

        let mut indices = Vec::new();
        for iy in 0..hs {
            for ix in 0..ws {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];
                // Skip the degenerate triangle at each pole.
                if iy != 0 || theta_start > 0.0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 || theta_end < PI {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self::new(vertices, indices)
    }

    pub fn create_sphere(radius: f32, width_segments: usize, height_segments: usize) -> Self {
        Self::create_sphere_cap(radius, width_segments, height_segments, 0.0, TAU, 0.0, PI)
    }

    /// Flat grid in the XZ plane facing +Y, `segments_x * segments_z` quads.
    pub fn create_plane_grid(width: f32, depth: f32, segments_x: usize, segments_z: usize) -> Self {
        let sx = segments_x.max(1);
        let sz = segments_z.max(1);
        let row = sx + 1;

        let mut vertices = Vec::with_capacity(row * (sz + 1));
        for iz in 0..=sz {
            let z = -depth * 0.5 + depth * iz as f32 / sz as f32;
            for ix in 0..=sx {
                let x = -width * 0.5 + width * ix as f32 / sx as f32;
                vertices.push(Vertex::new(Point3::new(x, 0.0, z), Vector3::y()));
            }
        }

        let mut indices = Vec::with_capacity(sx * sz * 6);
        for iz in 0..sz {
            for ix in 0..sx {
                let a = (iz * row + ix) as u32;
                let b = ((iz + 1) * row + ix) as u32;
                let c = b + 1;
                let d = a + 1;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self::new(vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every face normal must agree with the direction from the shape's
    /// center to the face.
    fn assert_outward(mesh: &Mesh) {
        for tri in mesh.indices.chunks(3) {
            let p0 = mesh.vertices[tri[0] as usize].position;
            let p1 = mesh.vertices[tri[1] as usize].position;
            let p2 = mesh.vertices[tri[2] as usize].position;
            let n = (p1 - p0).cross(&(p2 - p0));
            if n.norm() < 1e-9 {
                continue;
            }
            let centroid = (p0.coords + p1.coords + p2.coords) / 3.0;
            assert!(n.dot(&centroid) > 0.0, "inward face {:?}", tri);
        }
    }

    #[test]
    fn test_box_counts_and_winding() {
        let b = Mesh::create_box(2.0, 25.0, 2.0);
        assert_eq!(b.vertex_count(), 24);
        assert_eq!(b.triangle_count(), 12);
        assert!(b.validate().is_ok());
        assert_outward(&b);
        let (lo, hi) = b.bounds().unwrap();
        assert_eq!(lo, Point3::new(-1.0, -12.5, -1.0));
        assert_eq!(hi, Point3::new(1.0, 12.5, 1.0));
    }

    #[test]
    fn test_cylinder_and_prism() {
        let c = Mesh::create_cylinder(0.5, 0.5, 2.0, 8);
        assert!(c.validate().is_ok());
        assert_outward(&c);
        // side 8*2, two caps 8 each
        assert_eq!(c.triangle_count(), 32);

        let cone = Mesh::create_cylinder(0.0, 1.0, 1.0, 5);
        assert!(cone.validate().is_ok());
        assert_eq!(cone.triangle_count(), 5 * 2 + 5);
    }

    #[test]
    fn test_sphere_is_closed_and_outward() {
        let s = Mesh::create_sphere(1.0, 16, 8);
        assert!(s.validate().is_ok());
        assert_outward(&s);
        // Poles drop one triangle per column.
        assert_eq!(s.triangle_count(), 16 * 8 * 2 - 2 * 16);
        for v in &s.vertices {
            assert!(((v.position.coords.norm()) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_dome_stays_above_equator() {
        let dome = Mesh::create_sphere_cap(3.0, 16, 8, 0.0, TAU, 0.0, PI * 0.5);
        assert!(dome.validate().is_ok());
        assert!(dome.vertices.iter().all(|v| v.position.y >= -1e-5));
        assert_outward(&dome);
    }

    #[test]
    fn test_plane_grid_faces_up() {
        let p = Mesh::create_plane_grid(200.0, 200.0, 50, 50);
        assert_eq!(p.vertex_count(), 51 * 51);
        assert_eq!(p.triangle_count(), 50 * 50 * 2);
        assert!(p.validate().is_ok());
        for tri in p.indices.chunks(3) {
            let p0 = p.vertices[tri[0] as usize].position;
            let p1 = p.vertices[tri[1] as usize].position;
            let p2 = p.vertices[tri[2] as usize].position;
            assert!((p1 - p0).cross(&(p2 - p0)).y > 0.0);
        }
    }
}
