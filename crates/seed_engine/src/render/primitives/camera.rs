//! # Camera
//!
//! A camera is a scene object plus the three matrices the renderer reads
//! from it: the view matrix (inverse of the world matrix), the projection
//! matrix and the projection inverse.
//!
//! ## Design Principles
//! - **Composition**: the scene-graph part lives in an owned [`SceneObject`]
//!   (an [`Object3`] by default); the camera adds only its own matrices
//! - **Consistent view matrix**: `matrix_world_inverse` is rewritten on every
//!   world update and is never edited on its own
//! - **Deep copies**: copying a camera never shares matrices with the source
//!
//! ## Coordinate System
//! Right-handed, Y-up, looking down the local -Z axis.

use crate::core::config::CameraConfig;
use crate::foundation::math::{element::*, utils, Mat4, Mat4Ext, Vec3};
use crate::scene::{Object3, SceneObject};

/// Camera composed over a scene object
#[derive(Debug)]
pub struct Camera<O = Object3> {
    object: O,
    matrix_world_inverse: Mat4,
    projection_matrix: Mat4,
    projection_matrix_inverse: Mat4,
}

impl<O: SceneObject + Default> Camera<O> {
    /// Create a camera at the origin with identity matrices
    pub fn new() -> Self {
        Self::from_object(O::default())
    }
}

impl<O: SceneObject + Default> Default for Camera<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera<Object3> {
    /// Create a perspective camera from configuration
    ///
    /// # Example
    /// ```rust
    /// use seed_engine::core::config::CameraConfig;
    /// use seed_engine::render::Camera;
    ///
    /// let camera = Camera::from_config(&CameraConfig::default());
    /// assert_eq!(camera.projection_matrix()[(3, 2)], -1.0);
    /// ```
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::new();
        camera.set_perspective(config.fov_degrees, config.aspect, config.near, config.far);
        camera
    }
}

impl<O: SceneObject> Camera<O> {
    /// Wrap an existing scene object; matrices start as identity
    pub fn from_object(object: O) -> Self {
        Self {
            object,
            matrix_world_inverse: Mat4::identity(),
            projection_matrix: Mat4::identity(),
            projection_matrix_inverse: Mat4::identity(),
        }
    }

    /// The underlying scene object
    pub fn object(&self) -> &O {
        &self.object
    }

    /// Mutable access to the underlying scene object.
    ///
    /// Local transform edits take effect on the next
    /// [`Camera::update_matrix_world`].
    pub fn object_mut(&mut self) -> &mut O {
        &mut self.object
    }

    /// Current world matrix of the underlying object
    pub fn matrix_world(&self) -> &Mat4 {
        self.object.matrix_world()
    }

    /// View matrix: inverse of the world matrix as of the last update
    pub fn matrix_world_inverse(&self) -> &Mat4 {
        &self.matrix_world_inverse
    }

    /// Projection matrix
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Inverse of the projection matrix
    pub fn projection_matrix_inverse(&self) -> &Mat4 {
        &self.projection_matrix_inverse
    }

    /// Replace the projection matrix and refresh its inverse
    pub fn set_projection_matrix(&mut self, projection: Mat4) {
        self.projection_matrix = projection;
        self.projection_matrix_inverse = projection.try_inverse().unwrap_or_else(|| {
            log::warn!("Projection matrix is singular; using identity as its inverse");
            Mat4::identity()
        });
    }

    /// Use a perspective projection
    ///
    /// # Arguments
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn set_perspective(&mut self, fov_degrees: f32, aspect: f32, near: f32, far: f32) {
        log::debug!(
            "Camera perspective: fov {:.1} deg, aspect {:.3}, near {}, far {}",
            fov_degrees, aspect, near, far
        );
        let projection = Mat4::perspective(utils::deg_to_rad(fov_degrees), aspect, near, far);
        self.set_projection_matrix(projection);
    }

    /// Update the object hierarchy, then recompute the view matrix.
    ///
    /// Uses the parent world matrix from the last
    /// [`Camera::update_matrix_world_from`] (none for a root camera). The
    /// view matrix is recomputed even when the hierarchy update had nothing
    /// to do. A singular world matrix (e.g. a zero scale) has no inverse; the
    /// view matrix then falls back to identity.
    pub fn update_matrix_world(&mut self, force: bool) {
        self.object.update_matrix_world(force);
        self.refresh_matrix_world_inverse(force);
    }

    /// Like [`Camera::update_matrix_world`], for a camera mounted under a
    /// parent whose world matrix is `parent_world`
    pub fn update_matrix_world_from(&mut self, parent_world: Option<&Mat4>, force: bool) {
        self.object.update_matrix_world_from(parent_world, force);
        self.refresh_matrix_world_inverse(force);
    }

    fn refresh_matrix_world_inverse(&mut self, force: bool) {
        self.matrix_world_inverse = match self.object.matrix_world().try_inverse() {
            Some(inverse) => inverse,
            None => {
                log::warn!("Camera world matrix is singular; view matrix reset to identity");
                Mat4::identity()
            }
        };
        log::trace!("Camera view matrix updated (force = {})", force);
    }

    /// Write the world-space viewing direction into `target` and return it.
    ///
    /// Forces a world update first, keeping the current parent. The direction is the negated third
    /// column of the world matrix, normalized.
    pub fn world_direction<'a>(&mut self, target: &'a mut Vec3) -> &'a mut Vec3 {
        self.update_matrix_world(true);
        let e = self.object.matrix_world();

        *target = Vec3::new(-e[M13], -e[M23], -e[M33]);
        if target.try_normalize_mut(f32::EPSILON).is_none() {
            log::trace!("Camera world matrix has a degenerate Z axis");
        }
        target
    }

    /// Copy the scene-object state (children only if `recursive`) and
    /// deep-copy the three camera matrices
    pub fn copy_from(&mut self, source: &Camera<O>, recursive: bool) {
        self.object.copy_from(&source.object, recursive);

        self.matrix_world_inverse = source.matrix_world_inverse;
        self.projection_matrix = source.projection_matrix;
        self.projection_matrix_inverse = source.projection_matrix_inverse;
    }
}

impl<O: SceneObject + Default> Clone for Camera<O> {
    fn clone(&self) -> Self {
        let mut camera = Self::new();
        camera.copy_from(self, true);
        camera
    }
}

impl<O: SceneObject> SceneObject for Camera<O> {
    fn matrix_world(&self) -> &Mat4 {
        self.object.matrix_world()
    }

    fn update_matrix_world_from(&mut self, parent_world: Option<&Mat4>, force: bool) {
        Camera::update_matrix_world_from(self, parent_world, force);
    }

    fn update_matrix_world(&mut self, force: bool) {
        Camera::update_matrix_world(self, force);
    }

    fn copy_from(&mut self, source: &Self, recursive: bool) {
        Camera::copy_from(self, source, recursive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Observable;
    use crate::foundation::euler::{Euler, EulerOrder};
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn assert_inverse_consistent(camera: &Camera) {
        let product = camera.matrix_world_inverse() * camera.matrix_world();
        assert_relative_eq!(product, Mat4::identity(), epsilon = 1e-4);
    }

    #[test]
    fn test_new_camera_has_identity_matrices() {
        let camera: Camera = Camera::new();
        assert_eq!(*camera.matrix_world_inverse(), Mat4::identity());
        assert_eq!(*camera.projection_matrix(), Mat4::identity());
        assert_eq!(*camera.projection_matrix_inverse(), Mat4::identity());
    }

    #[test]
    fn test_inverse_tracks_local_edits() {
        let mut camera: Camera = Camera::new();

        let edits: [fn(&mut Object3); 4] = [
            |o| o.set_position(Vec3::new(3.0, -2.0, 7.5)),
            |o| o.rotation_mut().set(0.4, -1.1, 0.25, EulerOrder::YXZ),
            |o| o.set_scale(Vec3::new(2.0, 0.5, 1.5)),
            |o| o.rotation_mut().reorder(EulerOrder::ZYX),
        ];

        for edit in edits {
            edit(camera.object_mut());
            camera.update_matrix_world(true);
            assert_inverse_consistent(&camera);
        }
    }

    #[test]
    fn test_inverse_refreshed_without_force() {
        let mut camera: Camera = Camera::new();
        camera.object_mut().set_position(Vec3::new(0.0, 0.0, 10.0));
        camera.update_matrix_world(false);

        assert_relative_eq!(camera.matrix_world_inverse()[(2, 3)], -10.0, epsilon = EPSILON);
        assert_inverse_consistent(&camera);
    }

    #[test]
    fn test_inverse_with_children() {
        let mut rig = Object3::new();
        rig.set_position(Vec3::new(5.0, 0.0, 0.0));
        rig.rotation_mut().set_z(0.7);

        let mut camera: Camera = Camera::from_object(rig);
        camera.object_mut().add_child(Object3::new());
        camera.update_matrix_world(true);

        assert_inverse_consistent(&camera);
    }

    #[test]
    fn test_camera_under_a_parent() {
        let mut parent = Object3::new();
        parent.set_position(Vec3::new(0.0, 0.0, 4.0));
        parent.rotation_mut().set_y(HALF_PI);
        parent.update_matrix_world(false);

        let mut camera: Camera = Camera::new();
        camera.object_mut().set_position(Vec3::new(0.0, 1.0, 0.0));
        camera.update_matrix_world_from(Some(parent.matrix_world()), false);

        let expected = parent.matrix_world() * camera.object().matrix();
        assert_relative_eq!(*camera.matrix_world(), expected, epsilon = EPSILON);
        assert_relative_eq!(camera.matrix_world()[(1, 3)], 1.0, epsilon = EPSILON);
        assert_relative_eq!(camera.matrix_world()[(2, 3)], 4.0, epsilon = EPSILON);
        assert_inverse_consistent(&camera);

        // The parent's quarter turn about Y points the view along -X, and
        // the forced update inside world_direction keeps the parent
        let mut direction = Vec3::zeros();
        camera.world_direction(&mut direction);
        assert_relative_eq!(direction, Vec3::new(-1.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(*camera.matrix_world(), expected, epsilon = EPSILON);

        // Unmounting makes it a root again
        camera.update_matrix_world_from(None, false);
        assert_relative_eq!(*camera.matrix_world(), *camera.object().matrix(), epsilon = EPSILON);
        assert_inverse_consistent(&camera);
    }

    #[test]
    fn test_clone_keeps_pending_child_rotation() {
        let mut camera: Camera = Camera::new();
        camera.object_mut().add_child(Object3::new());
        camera.update_matrix_world(false);
        camera.object_mut().children_mut()[0].rotation_mut().set_y(HALF_PI);

        let mut copy = camera.clone();
        copy.update_matrix_world(false);
        camera.update_matrix_world(false);

        let original = *camera.object().children()[0].matrix_world();
        assert_relative_eq!(original, Mat4::rotation_y(HALF_PI), epsilon = EPSILON);
        assert_relative_eq!(*copy.object().children()[0].matrix_world(), original, epsilon = EPSILON);
    }

    #[test]
    fn test_singular_world_falls_back_to_identity() {
        let mut camera: Camera = Camera::new();
        camera.object_mut().set_scale(Vec3::new(0.0, 1.0, 1.0));
        camera.update_matrix_world(true);

        assert_eq!(*camera.matrix_world_inverse(), Mat4::identity());
    }

    #[test]
    fn test_default_world_direction_is_minus_z() {
        let mut camera: Camera = Camera::new();
        let mut direction = Vec3::zeros();
        camera.world_direction(&mut direction);

        assert_relative_eq!(direction, Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_world_direction_follows_rotation_and_ignores_scale() {
        let mut camera: Camera = Camera::new();
        camera.object_mut().rotation_mut().set_y(HALF_PI);
        camera.object_mut().set_scale(Vec3::new(3.0, 3.0, 3.0));

        let mut direction = Vec3::zeros();
        let returned = *camera.world_direction(&mut direction);

        assert_relative_eq!(returned, Vec3::new(-1.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(direction.norm(), 1.0, epsilon = EPSILON);
        assert_inverse_consistent(&camera);
    }

    #[test]
    fn test_world_direction_after_matrix_decomposition() {
        // Orientation decoded from a look rotation drives the direction
        let look = Mat4::rotation_x(-0.5) * Mat4::rotation_y(0.3);
        let mut euler = Euler::default();
        euler.set_from_rotation_matrix_and_order(&look, EulerOrder::XYZ, false);

        let mut camera: Camera = Camera::new();
        camera.object_mut().set_rotation_from_euler(&euler);

        let mut direction = Vec3::zeros();
        camera.world_direction(&mut direction);

        let expected = -Vec3::new(look[M13], look[M23], look[M33]).normalize();
        assert_relative_eq!(direction, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_perspective_projection_inverse() {
        let mut camera: Camera = Camera::new();
        camera.set_perspective(60.0, 16.0 / 9.0, 0.1, 100.0);

        let product = camera.projection_matrix() * camera.projection_matrix_inverse();
        assert_relative_eq!(product, Mat4::identity(), epsilon = 1e-4);
    }

    #[test]
    fn test_from_config_uses_perspective() {
        let config = CameraConfig::default();
        let camera = Camera::from_config(&config);
        let expected = Mat4::perspective(
            utils::deg_to_rad(config.fov_degrees),
            config.aspect,
            config.near,
            config.far,
        );
        assert_relative_eq!(*camera.projection_matrix(), expected, epsilon = EPSILON);
    }

    #[test]
    fn test_copy_is_deep() {
        let mut source: Camera = Camera::new();
        source.object_mut().set_position(Vec3::new(1.0, 2.0, 3.0));
        source.object_mut().add_child(Object3::new().with_name("rig"));
        source.set_perspective(45.0, 1.0, 0.5, 20.0);
        source.update_matrix_world(true);

        let mut target: Camera = Camera::new();
        target.copy_from(&source, false);
        assert_eq!(target.matrix_world_inverse(), source.matrix_world_inverse());
        assert_eq!(target.projection_matrix(), source.projection_matrix());
        assert_eq!(target.projection_matrix_inverse(), source.projection_matrix_inverse());
        assert!(target.object().children().is_empty());

        source.set_perspective(90.0, 2.0, 1.0, 10.0);
        source.object_mut().set_position(Vec3::zeros());
        source.update_matrix_world(true);
        assert_ne!(target.projection_matrix(), source.projection_matrix());
        assert_ne!(target.matrix_world_inverse(), source.matrix_world_inverse());
    }

    #[test]
    fn test_clone_is_recursive_and_detached() {
        let mut source: Camera = Camera::new();
        source.object_mut().add_child(Object3::new().with_name("rig"));
        let hits = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = std::rc::Rc::clone(&hits);
        source
            .object_mut()
            .rotation_mut()
            .on_change(move |_: &Euler| counter.set(counter.get() + 1));

        let mut copy = source.clone();
        assert_eq!(copy.object().children().len(), 1);

        copy.object_mut().rotation_mut().set_x(1.0);
        assert_eq!(hits.get(), 0);
        assert_eq!(copy.object_mut().rotation_mut().change_emitter().listener_count(), 0);
    }

    #[test]
    fn test_camera_as_scene_object() {
        fn refresh<S: SceneObject>(object: &mut S) -> Mat4 {
            object.update_matrix_world(true);
            *object.matrix_world()
        }

        let mut camera: Camera = Camera::new();
        camera.object_mut().set_position(Vec3::new(0.0, 1.0, 0.0));
        let world = refresh(&mut camera);

        assert_relative_eq!(world[(1, 3)], 1.0, epsilon = EPSILON);
        assert_inverse_consistent(&camera);
    }
}
