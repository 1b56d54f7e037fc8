//! Seams between the scene and whatever draws it
//!
//! The scene drives a frame through [`RenderBackend`] and builds its resources through
//! [`ResourceProvider`]. The wgpu [`RenderEngine`](super::RenderEngine) implements both;
//! tests use recording doubles.

use std::path::Path;

use cgmath::{Matrix4, Vector3};

use crate::{
    error::GfxError,
    gfx::{
        geometry::MeshData,
        lighting::Light,
        scene::{MeshId, TextureId, TextureSlots, Topology},
    },
};

/// Fixed-function state applied for a whole frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub depth_test: bool,
    pub clear_colour: [f64; 4],
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            depth_test: true,
            clear_colour: [0.2, 0.2, 0.2, 1.0],
        }
    }
}

/// Per-frame values shared by every draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGlobals {
    pub projection: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub camera_position: Vector3<f32>,
    /// Animation progress in `[0, 1]`
    pub progress: f32,
    pub lights: [Light; 2],
    pub depth_test: bool,
}

/// Everything needed to draw one object
#[derive(Debug)]
pub struct DrawCall<'a, P> {
    pub program: &'a P,
    pub mesh: MeshId,
    pub topology: Topology,
    pub textures: &'a TextureSlots,
    pub model: Matrix4<f32>,
}

/// Executes the clear, draw and present phases of a frame
pub trait RenderBackend {
    type Program;

    /// Resets the colour and depth buffers for a new frame
    fn clear(&mut self, state: &RenderState);

    /// Uploads camera, lighting and animation values used by the following draws
    fn set_frame_globals(&mut self, globals: &FrameGlobals);

    fn draw(&mut self, call: &DrawCall<'_, Self::Program>);

    /// Shows the finished frame
    fn present(&mut self);
}

/// Uploads geometry and textures, handing back handles the scene can store
pub trait ResourceProvider {
    fn upload_mesh(&mut self, mesh: &MeshData) -> MeshId;

    fn load_texture(&mut self, path: &Path) -> Result<TextureId, GfxError>;
}
