//! Rendering module
//!
//! `scene` turns session state into draw commands; `sdf_pipeline` draws them
//! with WebGPU using signed distance fields in the fragment shader.

pub mod scene;
pub mod sdf_pipeline;

pub use scene::{DrawCmd, Flake, Scene, Snowfall};
pub use sdf_pipeline::SdfRenderState;
