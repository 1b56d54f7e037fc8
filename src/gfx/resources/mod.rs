// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, uniform buffers and bind groups for rendering.

pub mod draw_bindings;
pub mod global_bindings;
pub mod texture_resource;

// Re-export main types
pub use draw_bindings::{ObjectBindings, TextureBindings};
pub use global_bindings::{GlobalBindings, GlobalUBOContent};
pub use texture_resource::TextureResource;
