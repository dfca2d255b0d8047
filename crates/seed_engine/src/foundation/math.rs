//! Math utilities and types
//!
//! Linear algebra comes from `nalgebra`; this module only names the concrete
//! `f32` types the engine works with and adds the few helpers the orientation
//! core needs on top of them.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    UnitQuaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Positions of the rotation block inside a 4x4 matrix, as `(row, column)`.
///
/// `Mnm` is the element at row `n`, column `m` (both 1-based), so `M13` is
/// the top entry of the third column.
pub mod element {
    /// Row 1, column 1
    pub const M11: (usize, usize) = (0, 0);
    /// Row 1, column 2
    pub const M12: (usize, usize) = (0, 1);
    /// Row 1, column 3
    pub const M13: (usize, usize) = (0, 2);
    /// Row 2, column 1
    pub const M21: (usize, usize) = (1, 0);
    /// Row 2, column 2
    pub const M22: (usize, usize) = (1, 1);
    /// Row 2, column 3
    pub const M23: (usize, usize) = (1, 2);
    /// Row 3, column 1
    pub const M31: (usize, usize) = (2, 0);
    /// Row 3, column 2
    pub const M32: (usize, usize) = (2, 1);
    /// Row 3, column 3
    pub const M33: (usize, usize) = (2, 2);
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a right-handed perspective projection looking down -Z,
    /// mapping depth to the [-1, 1] clip range
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a pure rotation matrix from a unit quaternion; the translation
    /// column is zero and the bottom row is (0, 0, 0, 1)
    fn make_rotation_from_quaternion(q: &Quat) -> Mat4;

    /// Copy of the upper-left 3x3 rotation block
    fn rotation_block(&self) -> Mat3;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let tan_half_fovy = (fov_y * 0.5).tan();
        let depth = far - near;

        let mut result = Mat4::zeros();

        // P = [1/(a*t)  0     0             0          ]
        //     [0        1/t   0             0          ]
        //     [0        0     -(f+n)/(f-n)  -2fn/(f-n) ]
        //     [0        0     -1            0          ]
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = -(far + near) / depth;
        result[(2, 3)] = -2.0 * far * near / depth;
        result[(3, 2)] = -1.0;

        result
    }

    fn make_rotation_from_quaternion(q: &Quat) -> Mat4 {
        q.to_homogeneous()
    }

    fn rotation_block(&self) -> Mat3 {
        self.fixed_view::<3, 3>(0, 0).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_element_positions_follow_rows_and_columns() {
        // Rotating +X by 90 degrees about Z yields +Y, so the first column
        // reads (0, 1, 0) and M21 is the 1.
        let m = Mat4::rotation_z(constants::HALF_PI);
        assert_relative_eq!(m[element::M21], 1.0, epsilon = 1e-6);
        assert_relative_eq!(m[element::M12], -1.0, epsilon = 1e-6);
        assert_relative_eq!(m[element::M33], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_quaternion_matrix_has_no_translation() {
        let q = Quat::from_axis_angle(&Vec3::y_axis(), 0.7);
        let m = Mat4::make_rotation_from_quaternion(&q);
        assert_eq!(m[(0, 3)], 0.0);
        assert_eq!(m[(1, 3)], 0.0);
        assert_eq!(m[(2, 3)], 0.0);
        assert_eq!(m[(3, 3)], 1.0);
        assert_relative_eq!(m.rotation_block(), *q.to_rotation_matrix().matrix(), epsilon = 1e-6);
    }

    #[test]
    fn test_perspective_maps_near_and_far_planes() {
        let near = 0.5;
        let far = 50.0;
        let p = Mat4::perspective(utils::deg_to_rad(60.0), 1.5, near, far);

        let clip_near = p * Vec4::new(0.0, 0.0, -near, 1.0);
        let clip_far = p * Vec4::new(0.0, 0.0, -far, 1.0);
        assert_relative_eq!(clip_near.z / clip_near.w, -1.0, epsilon = 1e-5);
        assert_relative_eq!(clip_far.z / clip_far.w, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(utils::clamp(1.5, -1.0, 1.0), 1.0);
        assert_eq!(utils::clamp(-1.5, -1.0, 1.0), -1.0);
        assert_eq!(utils::clamp(0.25, -1.0, 1.0), 0.25);
    }
}
