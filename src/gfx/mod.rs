//! # Graphics Module
//!
//! Scene graph, animation clock, lighting and the wgpu renderer behind them.
//!
//! ## Architecture Overview
//!
//! - **Scene Management** ([`scene`]) - Object hierarchy, meshes and the per-frame driver
//! - **Rendering** ([`rendering`]) - Effect shader set, backend traits and the wgpu engine
//! - **Resources** ([`resources`]) - Uniform buffers, bind groups and textures
//! - **Geometry** ([`geometry`]) - Procedural cube and lines, OBJ loading
//!
//! The scene only talks to the GPU through the traits in [`rendering::backend`], so
//! everything above the engine runs in tests without a device.

pub mod animation;
pub mod camera;
pub mod geometry;
pub mod lighting;
pub mod rendering;
pub mod resources;
pub mod scene;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use rendering::render_engine::RenderEngine;
pub use scene::Scene;
