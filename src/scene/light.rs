use nalgebra::{Point3, Vector3};

/// Represents a light source in the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    /// A light source that is infinitely far away (e.g., Sun).
    /// Rays are parallel.
    Directional {
        /// Direction the light travels.
        direction: Vector3<f32>,
        color: Vector3<f32>,
        intensity: f32,
    },
    /// A light source at a specific position that radiates in all directions.
    Point {
        position: Point3<f32>,
        color: Vector3<f32>,
        intensity: f32,
        /// Distance at which the contribution reaches zero.
        range: f32,
    },
    /// Uniform light from every direction.
    Ambient { color: Vector3<f32>, intensity: f32 },
    /// Sky color from above blending to ground color from below.
    Hemisphere {
        sky: Vector3<f32>,
        ground: Vector3<f32>,
        intensity: f32,
    },
}

impl Light {
    /// Directional light shining from `position` toward the origin.
    pub fn directional_from(position: Point3<f32>, color: Vector3<f32>, intensity: f32) -> Self {
        let dir = -position.coords;
        let direction = if dir.norm_squared() > 1e-12 {
            dir.normalize()
        } else {
            -Vector3::y()
        };
        Self::Directional {
            direction,
            color,
            intensity,
        }
    }

    pub fn new_point(position: Point3<f32>, color: Vector3<f32>, intensity: f32, range: f32) -> Self {
        Self::Point {
            position,
            color,
            intensity,
            range,
        }
    }

    /// Calculates the direction vector FROM the surface point TO the light source.
    /// `None` for lights without a direction.
    pub fn direction_to_light(&self, surface_point: &Point3<f32>) -> Option<Vector3<f32>> {
        match self {
            Light::Directional { direction, .. } => Some(-direction),
            Light::Point { position, .. } => {
                let d = position - surface_point;
                let len = d.norm();
                (len > 1e-6).then(|| d / len)
            }
            Light::Ambient { .. } | Light::Hemisphere { .. } => None,
        }
    }

    /// Radiance arriving at the surface point from a directional source.
    /// Point lights fade smoothly to zero at their range.
    pub fn radiance(&self, surface_point: &Point3<f32>) -> Vector3<f32> {
        match self {
            Light::Directional {
                color, intensity, ..
            } => color * *intensity,
            Light::Point {
                position,
                color,
                intensity,
                range,
            } => {
                let distance = (position - surface_point).norm();
                let falloff = if *range > 0.0 {
                    (1.0 - distance / range).clamp(0.0, 1.0).powi(2)
                } else {
                    1.0
                };
                color * *intensity * falloff
            }
            Light::Ambient { .. } | Light::Hemisphere { .. } => Vector3::zeros(),
        }
    }

    /// Non-directional contribution for a surface facing `normal`.
    pub fn ambient(&self, normal: &Vector3<f32>) -> Vector3<f32> {
        match self {
            Light::Ambient { color, intensity } => color * *intensity,
            Light::Hemisphere {
                sky,
                ground,
                intensity,
            } => {
                let t = normal.y * 0.5 + 0.5;
                ground.lerp(sky, t) * *intensity
            }
            _ => Vector3::zeros(),
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Directional { intensity, .. }
            | Light::Point { intensity, .. }
            | Light::Ambient { intensity, .. }
            | Light::Hemisphere { intensity, .. } => *intensity,
        }
    }

    pub fn set_intensity(&mut self, value: f32) {
        match self {
            Light::Directional { intensity, .. }
            | Light::Point { intensity, .. }
            | Light::Ambient { intensity, .. }
            | Light::Hemisphere { intensity, .. } => *intensity = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_points_back_at_source() {
        let light = Light::directional_from(Point3::new(0.0, 10.0, 0.0), Vector3::x(), 1.0);
        let l = light.direction_to_light(&Point3::origin()).unwrap();
        assert!((l - Vector3::y()).norm() < 1e-6);
    }

    #[test]
    fn test_point_light_range() {
        let light = Light::new_point(Point3::origin(), Vector3::new(1.0, 1.0, 1.0), 2.0, 10.0);
        assert_eq!(light.radiance(&Point3::new(0.0, 0.0, 0.0)).x, 2.0);
        assert_eq!(light.radiance(&Point3::new(0.0, 12.0, 0.0)).x, 0.0);
        assert!((light.radiance(&Point3::new(5.0, 0.0, 0.0)).x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_hemisphere_blends_by_normal() {
        let light = Light::Hemisphere {
            sky: Vector3::new(1.0, 0.0, 0.0),
            ground: Vector3::new(0.0, 0.0, 1.0),
            intensity: 1.0,
        };
        assert_eq!(light.ambient(&Vector3::y()), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(light.ambient(&-Vector3::y()), Vector3::new(0.0, 0.0, 1.0));
        assert!(light.direction_to_light(&Point3::origin()).is_none());
    }
}
