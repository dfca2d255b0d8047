//! # Seed Engine
//!
//! The orientation core of a scene graph: Euler angles that stay in sync
//! with rotation matrices and quaternions, objects that compose transforms
//! through a parent chain, and a camera that keeps its view matrix current.
//!
//! ## Features
//!
//! - **Euler Angles**: Six rotation orders, gimbal-lock aware decomposition
//! - **Change Notification**: Listeners fire when a rotation is edited
//! - **Scene Objects**: Local and world matrices with dirty tracking
//! - **Camera**: World inverse, projection and viewing direction
//! - **Configuration**: TOML and RON settings files
//!
//! ## Quick Start
//!
//! ```rust
//! use seed_engine::prelude::*;
//!
//! let mut camera = Camera::from_config(&CameraConfig::default());
//! camera.object_mut().rotation_mut().set_y(std::f32::consts::FRAC_PI_2);
//! camera.update_matrix_world(false);
//!
//! let mut direction = Vec3::zeros();
//! camera.world_direction(&mut direction);
//! assert!((direction.x + 1.0).abs() < 1e-5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod events;
pub mod foundation;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{ApplicationConfig, CameraConfig, Config, ConfigError, EngineConfig},
        events::{ChangeEmitter, ListenerId, Observable},
        foundation::{
            euler::{Euler, EulerError, EulerOrder},
            math::{Mat4, Mat4Ext, Quat, Vec3},
        },
        render::{Camera, RenderState},
        scene::{Object3, SceneObject},
    };
}
