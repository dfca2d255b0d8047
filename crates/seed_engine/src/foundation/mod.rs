//! Foundation module - Core utilities and types
//!
//! - Math types and matrix helpers
//! - Euler angles and rotation orders
//! - Logging setup

pub mod euler;
pub mod logging;
pub mod math;
