//! WGPU-based rendering engine
//!
//! Owns the surface, device and every GPU resource the scene refers to by handle. It
//! implements [`RenderBackend`] by recording draws into a list during the frame and
//! encoding them into a single render pass on [`present`](RenderBackend::present).

use std::{path::Path, sync::Arc};

use anyhow::Context;
use wgpu::{util::DeviceExt, TextureFormat};

use super::{
    backend::{DrawCall, FrameGlobals, RenderBackend, RenderState, ResourceProvider},
    pipeline_manager::{ShaderProgram, WgpuShaderCompiler},
};
use crate::{
    error::GfxError,
    gfx::{
        geometry::MeshData,
        resources::{
            draw_bindings::{texture_set_key, TextureSetKey},
            GlobalBindings, ObjectBindings, TextureBindings, TextureResource,
        },
        scene::{MeshId, TextureId},
    },
};

/// Vertex and index buffers of one uploaded mesh
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// A draw recorded during the frame, encoded on present
struct PendingDraw {
    pipeline: wgpu::RenderPipeline,
    mesh: MeshId,
    object_slot: usize,
    textures: TextureSetKey,
}

/// Surface texture acquired by `clear` for the current frame
struct FrameTarget {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    clear_colour: wgpu::Color,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    global_bindings: GlobalBindings,
    object_bindings: ObjectBindings,
    texture_bindings: TextureBindings,
    meshes: Vec<GpuMesh>,
    frame: Option<FrameTarget>,
    depth_test: bool,
    pending: Vec<PendingDraw>,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to request adapter")?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request a device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .context("Surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_bindings = GlobalBindings::new(&device);
        let object_bindings = ObjectBindings::new(&device);
        let texture_bindings = TextureBindings::new(&device, &queue);

        Ok(RenderEngine {
            surface,
            device: Arc::new(device),
            queue: Arc::new(queue),
            config,
            depth_texture,
            format,
            global_bindings,
            object_bindings,
            texture_bindings,
            meshes: Vec::new(),
            frame: None,
            depth_test: true,
            pending: Vec::new(),
        })
    }

    /// A compiler producing programs compatible with this engine's bind groups and surface
    pub fn shader_compiler(&self, shader_dir: impl Into<std::path::PathBuf>) -> WgpuShaderCompiler {
        WgpuShaderCompiler::new(
            (*self.device).clone(),
            shader_dir,
            &[
                self.global_bindings.bind_group_layout(),
                self.object_bindings.bind_group_layout(),
                self.texture_bindings.bind_group_layout(),
            ],
            self.format,
        )
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    fn acquire_frame(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(texture) => Some(texture),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                None
            }
            Err(e) => {
                log::warn!("Skipping frame: {e}");
                None
            }
        }
    }
}

impl RenderBackend for RenderEngine {
    type Program = ShaderProgram;

    fn clear(&mut self, state: &RenderState) {
        self.pending.clear();
        self.depth_test = state.depth_test;
        let [r, g, b, a] = state.clear_colour;
        self.frame = self.acquire_frame().map(|surface_texture| {
            let view = surface_texture
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            FrameTarget {
                surface_texture,
                view,
                clear_colour: wgpu::Color { r, g, b, a },
            }
        });
    }

    fn set_frame_globals(&mut self, globals: &FrameGlobals) {
        self.depth_test = globals.depth_test;
        self.global_bindings.update(&self.queue, globals);
    }

    fn draw(&mut self, call: &DrawCall<'_, ShaderProgram>) {
        if self.frame.is_none() {
            return;
        }
        let Some(pipeline) = call.program.pipeline(call.topology, self.depth_test) else {
            log::trace!("Program '{}' has no pipeline for {:?}", call.program.label(), call.topology);
            return;
        };
        if call.mesh.0 as usize >= self.meshes.len() {
            log::trace!("Skipping draw of unknown mesh {:?}", call.mesh);
            return;
        }

        let object_slot = self.pending.len();
        self.object_bindings
            .write(&self.device, &self.queue, object_slot, call.model);
        let textures = texture_set_key(call.textures);
        self.texture_bindings.prepare(&self.device, textures);

        self.pending.push(PendingDraw {
            pipeline: pipeline.clone(),
            mesh: call.mesh,
            object_slot,
            textures,
        });
    }

    fn present(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let Some(frame) = self.frame.take() else {
            return;
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(frame.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for draw in &pending {
                let mesh = &self.meshes[draw.mesh.0 as usize];
                let (Some(object), Some(textures)) = (
                    self.object_bindings.bind_group(draw.object_slot),
                    self.texture_bindings.bind_group(&draw.textures),
                ) else {
                    continue;
                };
                render_pass.set_pipeline(&draw.pipeline);
                render_pass.set_bind_group(1, object, &[]);
                render_pass.set_bind_group(2, textures, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.surface_texture.present();
    }
}

impl ResourceProvider for RenderEngine {
    fn upload_mesh(&mut self, mesh: &MeshData) -> MeshId {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        self.meshes.push(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        });
        MeshId(self.meshes.len() as u32 - 1)
    }

    fn load_texture(&mut self, path: &Path) -> Result<TextureId, GfxError> {
        let texture = TextureResource::from_file(&self.device, &self.queue, path)?;
        Ok(self.texture_bindings.insert(texture))
    }
}
