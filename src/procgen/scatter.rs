use nalgebra::{Point3, Vector3};
use rand::Rng;
use std::f32::consts::TAU;

/// Uniformly distributed unit vector (`phi = acos(2u - 1)` keeps the poles
/// from bunching).
pub fn unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f32> {
    let theta = rng.random::<f32>() * TAU;
    let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vector3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

/// `count` points in the spherical shell `[min_radius, min_radius + depth)`
/// around the origin.
pub fn sphere_shell<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    min_radius: f32,
    depth: f32,
) -> Vec<Point3<f32>> {
    (0..count)
        .map(|_| {
            let radius = min_radius + rng.random::<f32>() * depth;
            let dir = unit_sphere(rng);
            Point3::from(dir * radius)
        })
        .collect()
}

/// Point on the XZ ring `[min_distance, min_distance + depth)` around `center`.
pub fn ring_point<R: Rng + ?Sized>(
    rng: &mut R,
    center: Point3<f32>,
    min_distance: f32,
    depth: f32,
) -> Point3<f32> {
    let angle = rng.random::<f32>() * TAU;
    let distance = min_distance + rng.random::<f32>() * depth;
    Point3::new(
        center.x + angle.cos() * distance,
        center.y,
        center.z + angle.sin() * distance,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_shell_radii() {
        let mut rng = StdRng::seed_from_u64(42);
        let pts = sphere_shell(&mut rng, 500, 150.0, 100.0);
        assert_eq!(pts.len(), 500);
        for p in &pts {
            let r = p.coords.norm();
            assert!((150.0 - 1e-2..250.0 + 1e-2).contains(&r));
        }
    }

    #[test]
    fn test_same_seed_same_points() {
        let a = sphere_shell(&mut StdRng::seed_from_u64(7), 20, 1.0, 1.0);
        let b = sphere_shell(&mut StdRng::seed_from_u64(7), 20, 1.0, 1.0);
        let c = sphere_shell(&mut StdRng::seed_from_u64(8), 20, 1.0, 1.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_ring_point_distance() {
        let mut rng = StdRng::seed_from_u64(1);
        let center = Point3::new(0.0, 0.5, -20.0);
        for _ in 0..100 {
            let p = ring_point(&mut rng, center, 15.0, 25.0);
            let d = ((p.x - center.x).powi(2) + (p.z - center.z).powi(2)).sqrt();
            assert!((15.0 - 1e-3..40.0 + 1e-3).contains(&d));
            assert_eq!(p.y, 0.5);
        }
    }
}
