//! Base scene object
//!
//! [`Object3`] holds a local transform (position, orientation, scale), the
//! local matrix built from it and the world matrix accumulated through its
//! parent chain. Children are owned by value; a world update walks down the
//! tree and hands each child its parent's world matrix. Objects that are not
//! owned by their parent (a camera, for example) receive the parent's world
//! matrix through [`SceneObject::update_matrix_world_from`].
//!
//! Orientation is stored twice, as an [`Euler`] and as a quaternion, and the
//! two are kept in step:
//! - Edits made through the Euler raise its dirty flag; the next
//!   [`Object3::update_matrix`] pushes them into the quaternion.
//! - Edits made through [`Object3::set_quaternion`] rewrite the Euler
//!   silently, so its listeners do not see a change that did not come from
//!   them.

use crate::events::Observable;
use crate::foundation::euler::Euler;
use crate::foundation::math::{Mat4, Quat, Vec3};

/// Capabilities a camera (or any other composed object) needs from its
/// scene-graph base
pub trait SceneObject {
    /// Cumulative local-to-world transform as of the last update
    fn matrix_world(&self) -> &Mat4;

    /// Refresh the world matrix of this object and everything below it,
    /// given the parent's world matrix (`None` for a root).
    ///
    /// Work is skipped when nothing changed, unless `force` is set. The
    /// parent matrix is remembered for later [`SceneObject::update_matrix_world`]
    /// calls.
    fn update_matrix_world_from(&mut self, parent_world: Option<&Mat4>, force: bool);

    /// Refresh against the parent matrix seen by the last
    /// [`SceneObject::update_matrix_world_from`]
    fn update_matrix_world(&mut self, force: bool);

    /// Take over `source`'s state; children are cloned only if `recursive`
    fn copy_from(&mut self, source: &Self, recursive: bool)
    where
        Self: Sized;
}

/// A node of the scene graph
#[derive(Debug)]
pub struct Object3 {
    name: String,
    position: Vec3,
    rotation: Euler,
    quaternion: Quat,
    scale: Vec3,

    matrix: Mat4,
    matrix_world: Mat4,
    parent_world: Option<Mat4>,

    /// Rebuild the local matrix from position/orientation/scale on update
    pub matrix_auto_update: bool,
    local_needs_update: bool,
    matrix_world_needs_update: bool,

    children: Vec<Object3>,
}

impl Object3 {
    /// Create an object at the origin with identity orientation and scale
    pub fn new() -> Self {
        Self {
            name: String::new(),
            position: Vec3::zeros(),
            rotation: Euler::default(),
            quaternion: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            matrix: Mat4::identity(),
            matrix_world: Mat4::identity(),
            parent_world: None,
            matrix_auto_update: true,
            local_needs_update: false,
            matrix_world_needs_update: false,
            children: Vec::new(),
        }
    }

    /// Builder pattern: set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Object name, empty by default
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local position
    pub fn position(&self) -> &Vec3 {
        &self.position
    }

    /// Move the object in its parent's space
    pub fn set_position(&mut self, position: Vec3) {
        if self.position != position {
            self.position = position;
            self.local_needs_update = true;
        }
    }

    /// Local scale
    pub fn scale(&self) -> &Vec3 {
        &self.scale
    }

    /// Set the local scale factors
    pub fn set_scale(&mut self, scale: Vec3) {
        if self.scale != scale {
            self.scale = scale;
            self.local_needs_update = true;
        }
    }

    /// Local orientation as Euler angles
    pub fn rotation(&self) -> &Euler {
        &self.rotation
    }

    /// Mutable access to the Euler orientation.
    ///
    /// Changes are picked up through the Euler's dirty flag on the next
    /// update; listeners subscribed here see every edit.
    pub fn rotation_mut(&mut self) -> &mut Euler {
        &mut self.rotation
    }

    /// Replace the orientation with the given Euler angles and order
    pub fn set_rotation_from_euler(&mut self, euler: &Euler) {
        self.rotation.copy_from(euler);
    }

    /// Local orientation as a quaternion.
    ///
    /// Takes `&mut self` because Euler edits made through
    /// [`Object3::rotation_mut`] are only recorded in the Euler's dirty flag;
    /// reading the quaternion consumes that flag and folds the edit in, so
    /// the result never lags behind [`Object3::rotation`].
    pub fn quaternion(&mut self) -> &Quat {
        self.sync_quaternion();
        &self.quaternion
    }

    /// Set the orientation from a quaternion, rewriting the Euler angles in
    /// their current order without notifying the Euler's listeners
    pub fn set_quaternion(&mut self, quaternion: Quat) {
        let order = self.rotation.order();
        self.rotation.set_from_quaternion(&quaternion, order, false);
        // A pending Euler edit is superseded by this quaternion.
        self.rotation.change_emitter().take_dirty();
        self.quaternion = quaternion;
        self.local_needs_update = true;
    }

    /// Local transform as of the last update
    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// Request a world-matrix refresh on the next update even if the local
    /// transform is unchanged
    pub fn mark_world_dirty(&mut self) {
        self.matrix_world_needs_update = true;
    }

    /// Attach a child; its world matrix is refreshed on the next update
    pub fn add_child(&mut self, mut child: Object3) {
        child.matrix_world_needs_update = true;
        self.children.push(child);
    }

    /// Owned children, in insertion order
    pub fn children(&self) -> &[Object3] {
        &self.children
    }

    /// Mutable access to the children
    pub fn children_mut(&mut self) -> &mut [Object3] {
        &mut self.children
    }

    /// Detach and return the child at `index`, if any. The detached object
    /// becomes a root.
    pub fn remove_child(&mut self, index: usize) -> Option<Object3> {
        (index < self.children.len()).then(|| {
            let mut child = self.children.remove(index);
            child.parent_world = None;
            child.matrix_world_needs_update = true;
            child
        })
    }

    /// Rebuild the local matrix if the local transform changed
    pub fn update_matrix(&mut self) {
        self.sync_quaternion();
        if !self.local_needs_update {
            return;
        }

        self.matrix = Mat4::new_translation(&self.position)
            * self.quaternion.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale);
        self.local_needs_update = false;
        self.matrix_world_needs_update = true;
    }

    fn sync_quaternion(&mut self) {
        if self.rotation.change_emitter().take_dirty() {
            self.quaternion = self.rotation.to_quaternion();
            self.local_needs_update = true;
        }
    }
}

impl Default for Object3 {
    fn default() -> Self {
        Self::new()
    }
}

/// The copy is a root. An Euler edit still pending on the source is folded
/// into the copy's quaternion, since the cloned Euler starts clean.
impl Clone for Object3 {
    fn clone(&self) -> Self {
        let pending = self.rotation.is_dirty();

        Self {
            name: self.name.clone(),
            position: self.position,
            rotation: self.rotation.clone(),
            quaternion: if pending {
                self.rotation.to_quaternion()
            } else {
                self.quaternion
            },
            scale: self.scale,
            matrix: self.matrix,
            matrix_world: self.matrix_world,
            parent_world: None,
            matrix_auto_update: self.matrix_auto_update,
            local_needs_update: self.local_needs_update || pending,
            matrix_world_needs_update: self.matrix_world_needs_update,
            children: self.children.clone(),
        }
    }
}

impl SceneObject for Object3 {
    fn matrix_world(&self) -> &Mat4 {
        &self.matrix_world
    }

    fn update_matrix_world_from(&mut self, parent_world: Option<&Mat4>, force: bool) {
        if self.matrix_auto_update {
            self.update_matrix();
        }

        let mut force = force;
        if self.parent_world.as_ref() != parent_world {
            self.parent_world = parent_world.copied();
            force = true;
        }

        if self.matrix_world_needs_update || force {
            self.matrix_world = match parent_world {
                Some(parent) => parent * self.matrix,
                None => self.matrix,
            };
            self.matrix_world_needs_update = false;
            force = true;
        }

        let world = self.matrix_world;
        for child in &mut self.children {
            child.update_matrix_world_from(Some(&world), force);
        }
    }

    fn update_matrix_world(&mut self, force: bool) {
        let parent_world = self.parent_world;
        self.update_matrix_world_from(parent_world.as_ref(), force);
    }

    fn copy_from(&mut self, source: &Self, recursive: bool) {
        self.name.clone_from(&source.name);
        self.position = source.position;
        // Keep this object's Euler listeners; they observe the new angles.
        self.rotation.copy_from(&source.rotation);
        self.quaternion = source.quaternion;
        self.scale = source.scale;
        self.matrix = source.matrix;
        self.matrix_world = source.matrix_world;
        self.matrix_auto_update = source.matrix_auto_update;
        self.local_needs_update = true;
        self.matrix_world_needs_update = source.matrix_world_needs_update;

        if recursive {
            self.children = source.children.clone();
        }
    }
}
