//! # Core Engine Module
//!
//! Shared settings types used by the camera and by applications.

pub mod config;

pub use config::{ApplicationConfig, CameraConfig, Config, ConfigError, ConfigFormat, EngineConfig};
