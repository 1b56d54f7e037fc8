//! Fixed projection and view matrices for the demo camera.

use cgmath::{perspective, Deg, EuclideanSpace, Matrix4, Point3, SquareMatrix, Vector3};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Projection and view matrices, set once when the scene is built
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub projection: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub position: Vector3<f32>,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            projection: Matrix4::identity(),
            view: Matrix4::identity(),
            position: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

impl CameraState {
    /// Perspective projection in wgpu clip space (depth in `[0, 1]`)
    pub fn perspective(znear: f32, zfar: f32, aspect: f32, fovy: Deg<f32>) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(fovy, aspect, znear, zfar)
    }

    /// Right-handed view matrix looking from `from` towards `at`, Y up
    pub fn view_matrix(from: Vector3<f32>, at: Vector3<f32>) -> Matrix4<f32> {
        Matrix4::look_at_rh(Point3::from_vec(from), Point3::from_vec(at), Vector3::unit_y())
    }

    /// Builds a camera at `from` looking at `at`
    pub fn looking_at(
        from: Vector3<f32>,
        at: Vector3<f32>,
        aspect: f32,
        fovy: Deg<f32>,
        znear: f32,
        zfar: f32,
    ) -> Self {
        Self {
            projection: Self::perspective(znear, zfar, aspect, fovy),
            view: Self::view_matrix(from, at),
            position: from,
        }
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::Vector4;

    #[test]
    fn test_target_projects_to_screen_centre() {
        let camera = CameraState::looking_at(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -10.0),
            1.33,
            Deg(45.0),
            1.0,
            100.0,
        );
        let clip = camera.view_projection() * Vector4::new(0.0, 0.0, -10.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0, "depth {} outside [0, 1]", ndc.z);
    }
}
