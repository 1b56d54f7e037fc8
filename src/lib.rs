// src/lib.rs
//! LaserCube
//!
//! An interactive scene demonstrator built on wgpu and winit. A textured cube and two
//! laser lines live in a small transform hierarchy; key presses swap the shader program
//! driving the cube and start a shared animation clock that the shaders read.

pub mod app;
pub mod config;
pub mod demo;
pub mod error;
pub mod gfx;
pub mod input;
pub mod timer;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::LaserCubeApp;
pub use config::DemoConfig;
pub use error::GfxError;
