//! # Rendering System
//!
//! API-independent pieces of the renderer: the camera and the buffer state
//! a backend applies before drawing.

pub mod primitives;
pub mod state;

pub use primitives::Camera;
pub use state::{ColorBuffer, ColorMask, CompareFunc, DepthBuffer, RenderState, StencilBuffer, StencilOp};
