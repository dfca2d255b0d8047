//! # Engine configuration
//!
//! Settings for the orientation core and the applications built on it. All
//! sections carry `#[serde(default)]`, so a file only needs the keys it
//! changes.
//!
//! ```toml
//! [engine]
//! log_level = "debug"
//!
//! [camera]
//! fov_degrees = 60.0
//! aspect = 1.7777778
//! ```

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError, ConfigFormat};

/// # Engine Configuration
///
/// Logging and debug behavior shared by everything in the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log filter passed to `env_logger` (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
    /// Whether to enable debug features
    pub debug_mode: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable debug mode
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Camera Configuration
///
/// Perspective parameters used by `Camera::from_config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Distance to near clipping plane
    pub near: f32,
    /// Distance to far clipping plane
    pub far: f32,
}

impl CameraConfig {
    /// Set field of view in degrees
    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov_degrees = fov_degrees;
        self
    }

    /// Set aspect ratio
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Set clipping plane distances
    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Validate the projection parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera fov must be in (0, 180) degrees, got {}",
                self.fov_degrees
            )));
        }
        if self.aspect <= 0.0 {
            return Err(ConfigError::Invalid(format!("camera aspect must be positive, got {}", self.aspect)));
        }
        if self.near <= 0.0 {
            return Err(ConfigError::Invalid(format!("camera near plane must be positive, got {}", self.near)));
        }
        if self.far <= self.near {
            return Err(ConfigError::Invalid(format!(
                "camera far plane ({}) must lie beyond the near plane ({})",
                self.far, self.near
            )));
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration applications load at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Default camera configuration
    pub camera: CameraConfig,
}

impl Config for ApplicationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let text = r#"
            [engine]
            log_level = "trace"

            [camera]
            fov_degrees = 70.0
        "#;

        let config = ApplicationConfig::from_str_as(text, ConfigFormat::Toml).unwrap();
        assert_eq!(config.engine.log_level, "trace");
        assert_eq!(config.camera.fov_degrees, 70.0);
        assert_eq!(config.camera.near, CameraConfig::default().near);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = ApplicationConfig {
            engine: EngineConfig::new().with_log_level("warn").with_debug(false),
            camera: CameraConfig::default().with_fov(30.0).with_clip_planes(1.0, 10.0),
        };

        let text = config.to_string_as(ConfigFormat::Ron).unwrap();
        let parsed = ApplicationConfig::from_str_as(&text, ConfigFormat::Ron).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_camera_is_rejected() {
        let text = "[camera]\nnear = 5.0\nfar = 1.0\n";
        let err = ApplicationConfig::from_str_as(text, ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        assert!(CameraConfig::default().with_fov(180.0).validate().is_err());
        assert!(CameraConfig::default().with_aspect(0.0).validate().is_err());
        assert!(CameraConfig::default().validate().is_ok());
    }

    #[test]
    fn test_malformed_text_is_a_parse_error() {
        let err = ApplicationConfig::from_str_as("[camera\n", ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_format_from_extension() {
        use std::path::Path;

        assert_eq!(ConfigFormat::from_path(Path::new("a/b.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("scene.ron")).unwrap(), ConfigFormat::Ron);
        assert!(matches!(
            ConfigFormat::from_path(Path::new("settings.json")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ApplicationConfig::load_from_file("definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
