use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector3, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for creating various transformation matrices.
/// Manually implemented to ensure control over the coordinate system (Right-Handed).
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a rotation matrix around an arbitrary axis using Rodrigues' rotation formula.
    pub fn rotation(axis: &Vector3<f32>, angle_rad: f32) -> Matrix4<f32> {
        let axis_unit = axis.normalize();
        let x = axis_unit.x;
        let y = axis_unit.y;
        let z = axis_unit.z;
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        let t = 1.0 - c;

        Matrix4::new(
            t * x * x + c,     t * x * y - z * s, t * x * z + y * s, 0.0,
            t * x * y + z * s, t * y * y + c,     t * y * z - x * s, 0.0,
            t * x * z - y * s, t * y * z + x * s, t * z * z + c,     0.0,
            0.0,               0.0,               0.0,               1.0,
        )
    }

    /// Creates a rotation matrix around the X-axis.
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Y-axis.
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Z-axis.
    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Intrinsic X-then-Y-then-Z Euler rotation (`Rx * Ry * Rz`).
    pub fn rotation_euler_xyz(euler_rad: &Vector3<f32>) -> Matrix4<f32> {
        Self::rotation_x(euler_rad.x) * Self::rotation_y(euler_rad.y) * Self::rotation_z(euler_rad.z)
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a non-uniform scaling matrix.
    pub fn scaling_nonuniform(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Translation * Rotation(XYZ) * Scale, the usual local-to-parent matrix.
    pub fn trs(
        translation: &Vector3<f32>,
        euler_rad: &Vector3<f32>,
        scale: &Vector3<f32>,
    ) -> Matrix4<f32> {
        Self::translation(translation) * Self::rotation_euler_xyz(euler_rad) * Self::scaling_nonuniform(scale)
    }

    /// Creates a View matrix (Look-At, Right-Handed).
    /// Transforms world space coordinates to camera/view space.
    pub fn view(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
        // In RHS, camera looks down -Z
        let z_axis = (eye - target).normalize();
        let x_axis = up.cross(&z_axis).normalize();
        let y_axis = z_axis.cross(&x_axis);

        let rotation = Matrix4::new(
            x_axis.x, x_axis.y, x_axis.z, 0.0,
            y_axis.x, y_axis.y, y_axis.z, 0.0,
            z_axis.x, z_axis.y, z_axis.z, 0.0,
            0.0,      0.0,      0.0,      1.0,
        );

        let translation = Self::translation(&-eye.coords);

        rotation * translation
    }

    /// Creates a Perspective Projection matrix (Right-Handed).
    /// Maps view frustum to NDC [-1, 1].
    pub fn perspective(aspect_ratio: f32, fov_y_rad: f32, near: f32, far: f32) -> Matrix4<f32> {
        let f = 1.0 / (fov_y_rad / 2.0).tan();
        let nf = 1.0 / (near - far);

        Matrix4::new(
            f / aspect_ratio, 0.0, 0.0,                          0.0,
            0.0,              f,   0.0,                          0.0,
            0.0,              0.0, (far + near) * nf,            2.0 * far * near * nf,
            0.0,              0.0, -1.0,                         0.0,
        )
    }

    /// Creates an Orthographic Projection matrix (Right-Handed).
    pub fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Matrix4<f32> {
        let rl = 1.0 / (right - left);
        let tb = 1.0 / (top - bottom);
        let nf = 1.0 / (near - far);

        Matrix4::new(
            2.0 * rl,      0.0,           0.0,          -(right + left) * rl,
            0.0,           2.0 * tb,      0.0,          -(top + bottom) * tb,
            0.0,           0.0,           2.0 * nf,     (far + near) * nf,
            0.0,           0.0,           0.0,          1.0,
        )
    }

    /// Inverse-transpose of the upper 3x3, for carrying normals through
    /// non-uniform scale. Falls back to the plain 3x3 for singular matrices.
    pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix3<f32> {
        let model_3x3 = model.fixed_view::<3, 3>(0, 0).into_owned();
        model_3x3.try_inverse().unwrap_or(model_3x3).transpose()
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Applies an affine 4x4 matrix to a point.
#[inline]
pub fn transform_point(matrix: &Matrix4<f32>, point: &Point3<f32>) -> Point3<f32> {
    let h = matrix * point.to_homogeneous();
    Point3::new(h.x, h.y, h.z)
}

/// Performs perspective division: Clip Space -> NDC.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Point3<f32> {
    let w = clip.w;
    if w.abs() > 1e-6 {
        Point3::new(clip.x / w, clip.y / w, clip.z / w)
    } else {
        Point3::origin()
    }
}

/// Converts NDC coordinates to Screen coordinates (Viewport Transform).
/// Note: Y-axis is flipped (NDC +Y is up, Screen +Y is down).
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new(
        (ndc_x + 1.0) * 0.5 * width,
        (1.0 - (ndc_y + 1.0) * 0.5) * height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_trs_order() {
        // Scale first, then rotate, then translate.
        let m = TransformFactory::trs(
            &Vector3::new(10.0, 0.0, 0.0),
            &Vector3::new(0.0, FRAC_PI_2, 0.0),
            &Vector3::new(2.0, 2.0, 2.0),
        );
        let p = transform_point(&m, &Point3::new(1.0, 0.0, 0.0));
        // (1,0,0) * 2 = (2,0,0); rotate 90 deg about Y -> (0,0,-2); + (10,0,0)
        assert!((p - Point3::new(10.0, 0.0, -2.0)).norm() < 1e-5);
    }

    #[test]
    fn test_view_moves_eye_to_origin() {
        let eye = Point3::new(0.0, 3.0, 8.0);
        let view = TransformFactory::view(&eye, &Point3::new(0.0, 3.0, 0.0), &Vector3::y());
        let p = transform_point(&view, &eye);
        assert!(p.coords.norm() < 1e-5);
        // A point in front of the camera lands on -Z
        let ahead = transform_point(&view, &Point3::new(0.0, 3.0, 0.0));
        assert!(ahead.z < 0.0);
    }

    #[test]
    fn test_normal_matrix_undoes_nonuniform_scale() {
        let m = TransformFactory::scaling_nonuniform(&Vector3::new(1.0, 0.5, 1.0));
        let n = TransformFactory::normal_matrix(&m) * Vector3::new(0.0, 1.0, 0.0);
        assert!((n.normalize() - Vector3::y()).norm() < 1e-6);
    }

    #[test]
    fn test_ndc_to_screen_flips_y() {
        let top_left = ndc_to_screen(-1.0, 1.0, 100.0, 50.0);
        assert_eq!(top_left, Point2::new(0.0, 0.0));
        let bottom_right = ndc_to_screen(1.0, -1.0, 100.0, 50.0);
        assert_eq!(bottom_right, Point2::new(100.0, 50.0));
    }
}
