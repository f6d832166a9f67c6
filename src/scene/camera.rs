use crate::core::math::transform::TransformFactory;
use crate::io::config::CameraConfig;
use nalgebra::{Matrix4, Point3, Vector3};

/// Perspective viewer of the bay. Matrices are cached and rebuilt by
/// [`Camera::update_matrices`] after any field changes.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov_y_rad: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,

    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new_perspective(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov_y_rad: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let mut cam = Self {
            position,
            target,
            up,
            fov_y_rad,
            aspect_ratio,
            near,
            far,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_matrices();
        cam
    }

    /// `fov` in the config is in degrees.
    pub fn from_config(config: &CameraConfig, aspect_ratio: f32) -> Self {
        Self::new_perspective(
            Point3::from(config.position),
            Point3::from(config.target),
            Vector3::from(config.up),
            config.fov.to_radians(),
            aspect_ratio,
            config.near,
            config.far,
        )
    }

    pub fn update_matrices(&mut self) {
        self.view_matrix = TransformFactory::view(&self.position, &self.target, &self.up);
        self.projection_matrix =
            TransformFactory::perspective(self.aspect_ratio, self.fov_y_rad, self.near, self.far);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix * self.view_matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_looks_down_negative_z() {
        let cam = Camera::from_config(&CameraConfig::default(), 16.0 / 9.0);
        assert_eq!(cam.position, Point3::new(0.0, 3.0, 8.0));
        assert!((cam.fov_y_rad - 75.0_f32.to_radians()).abs() < 1e-6);

        let ahead = cam.view_projection() * Point3::new(0.0, 3.0, -20.0).to_homogeneous();
        assert!(ahead.w > 0.0);
        assert!((ahead.x / ahead.w).abs() < 1e-5);
        assert!((ahead.y / ahead.w).abs() < 1e-5);

        let behind = cam.view_projection() * Point3::new(0.0, 3.0, 20.0).to_homogeneous();
        assert!(behind.w < 0.0);
    }

    #[test]
    fn test_update_after_move() {
        let mut cam = Camera::from_config(&CameraConfig::default(), 1.0);
        let before = cam.view_matrix();
        cam.position.y = 10.0;
        cam.update_matrices();
        assert_ne!(before, cam.view_matrix());
    }
}
