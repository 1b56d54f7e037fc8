// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! The GPU-free seams ([`backend`], [`shader_set`]) and their wgpu implementations.

pub mod backend;
pub mod pipeline_manager;
pub mod render_engine;
pub mod shader_set;

// Re-export main types
pub use backend::{DrawCall, FrameGlobals, RenderBackend, RenderState, ResourceProvider};
pub use pipeline_manager::{ShaderProgram, WgpuShaderCompiler};
pub use render_engine::RenderEngine;
pub use shader_set::{
    CompiledProgram, Effect, ShaderCompiler, ShaderLoadReport, ShaderProgramDesc, ShaderSet,
};
