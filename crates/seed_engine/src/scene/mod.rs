//! Scene objects
//!
//! An [`Object3`] owns its local transform and its children. World matrices
//! are composed top-down by `update_matrix_world_from`.

mod object3;

pub use object3::{Object3, SceneObject};
