//! Shader program compilation for wgpu
//!
//! Each program is assembled from named WGSL stage files: the shared `common.wgsl`
//! prelude followed by the vertex, geometry, tessellation and fragment stages in
//! pipeline order. wgpu has no geometry or tessellation stages, so those files provide
//! helper functions (such as `deform`) that the vertex stage calls.
//!
//! One render pipeline is built per primitive topology and depth-test setting, so a
//! program can draw any mesh under any render state without further compilation.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use wgpu::*;

use super::shader_set::{CompiledProgram, ShaderCompiler, ShaderProgramDesc};
use crate::{
    error::GfxError,
    gfx::{
        resources::texture_resource::TextureResource,
        scene::{vertex::Vertex3D, Topology},
    },
};

/// Shared prelude prepended to every program
pub const COMMON_STAGE: &str = "common";

/// Built-in program used whenever a requested program fails to build
const DEFAULT_SHADER: &str = include_str!("default.wgsl");

const TOPOLOGIES: [PrimitiveTopology; 2] =
    [PrimitiveTopology::TriangleList, PrimitiveTopology::LineList];

/// Maps a mesh topology tag to the primitive assembly mode wgpu supports
pub fn primitive_topology(topology: Topology) -> PrimitiveTopology {
    match topology {
        Topology::Triangles | Topology::Patches => PrimitiveTopology::TriangleList,
        Topology::Lines => PrimitiveTopology::LineList,
    }
}

/// Concatenates the prelude and every stage of `desc`, read from `shader_dir`
pub fn assemble_program_source(
    shader_dir: &Path,
    desc: &ShaderProgramDesc,
) -> Result<String, GfxError> {
    let mut source = String::new();
    for stage in std::iter::once(COMMON_STAGE).chain(desc.stage_names()) {
        let path = shader_dir.join(format!("{stage}.wgsl"));
        let text = std::fs::read_to_string(&path)
            .map_err(|source| GfxError::ShaderSource { path, source })?;
        source.push_str(&format!("// ---- {stage} ----\n"));
        source.push_str(&text);
        source.push('\n');
    }
    Ok(source)
}

/// A compiled program: one pipeline per topology and depth-test combination
#[derive(Clone, Debug)]
pub struct ShaderProgram {
    label: String,
    pipelines: HashMap<(PrimitiveTopology, bool), RenderPipeline>,
}

impl ShaderProgram {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pipeline(&self, topology: Topology, depth_test: bool) -> Option<&RenderPipeline> {
        self.pipelines.get(&(primitive_topology(topology), depth_test))
    }
}

/// Builds [`ShaderProgram`]s from stage files on disk, falling back to the built-in
/// program when a file is missing or the assembled module fails validation
pub struct WgpuShaderCompiler {
    device: Device,
    shader_dir: PathBuf,
    pipeline_layout: PipelineLayout,
    color_format: TextureFormat,
    default_program: ShaderProgram,
}

impl WgpuShaderCompiler {
    /// # Arguments
    /// * `device` - Device the pipelines are created on
    /// * `shader_dir` - Directory holding the `<stage>.wgsl` files
    /// * `bind_group_layouts` - Globals, object and texture layouts, in slot order
    /// * `color_format` - Surface format the pipelines render into
    pub fn new(
        device: Device,
        shader_dir: impl Into<PathBuf>,
        bind_group_layouts: &[&BindGroupLayout],
        color_format: TextureFormat,
    ) -> Self {
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Effect Pipeline Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });
        let default_program = Self::build_program(
            &device,
            &pipeline_layout,
            color_format,
            "default",
            DEFAULT_SHADER,
        );

        Self {
            device,
            shader_dir: shader_dir.into(),
            pipeline_layout,
            color_format,
            default_program,
        }
    }

    /// Assembles, validates and builds `desc`
    pub fn try_compile(&self, desc: &ShaderProgramDesc) -> Result<ShaderProgram, GfxError> {
        let source = assemble_program_source(&self.shader_dir, desc)?;

        self.device.push_error_scope(ErrorFilter::Validation);
        let program = Self::build_program(
            &self.device,
            &self.pipeline_layout,
            self.color_format,
            &desc.label,
            &source,
        );
        match pollster::block_on(self.device.pop_error_scope()) {
            None => Ok(program),
            Some(error) => Err(GfxError::ShaderValidation {
                label: desc.label.clone(),
                message: error.to_string(),
            }),
        }
    }

    fn build_program(
        device: &Device,
        layout: &PipelineLayout,
        color_format: TextureFormat,
        label: &str,
        source: &str,
    ) -> ShaderProgram {
        let module = device.create_shader_module(ShaderModuleDescriptor {
            label: Some(label),
            source: ShaderSource::Wgsl(source.into()),
        });

        let mut pipelines = HashMap::new();
        for topology in TOPOLOGIES {
            for depth_test in [true, false] {
                let pipeline = Self::create_pipeline(
                    device,
                    layout,
                    &module,
                    color_format,
                    &format!("{label} {topology:?} depth={depth_test}"),
                    topology,
                    depth_test,
                );
                pipelines.insert((topology, depth_test), pipeline);
            }
        }

        ShaderProgram {
            label: label.to_string(),
            pipelines,
        }
    }

    fn create_pipeline(
        device: &Device,
        layout: &PipelineLayout,
        module: &ShaderModule,
        color_format: TextureFormat,
        label: &str,
        topology: PrimitiveTopology,
        depth_test: bool,
    ) -> RenderPipeline {
        // Depth testing off means every fragment passes and nothing is written
        let depth_stencil = DepthStencilState {
            format: TextureResource::DEPTH_FORMAT,
            depth_write_enabled: depth_test,
            depth_compare: if depth_test {
                CompareFunction::Less
            } else {
                CompareFunction::Always
            },
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        };

        device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: VertexState {
                module,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc()],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: color_format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None, // faded and split meshes show their inside faces
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(depth_stencil),
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

impl ShaderCompiler for WgpuShaderCompiler {
    type Program = ShaderProgram;

    fn compile(&mut self, desc: &ShaderProgramDesc) -> CompiledProgram<ShaderProgram> {
        match self.try_compile(desc) {
            Ok(program) => {
                log::debug!("Compiled shader program '{}'", desc.label);
                CompiledProgram {
                    program,
                    used_fallback: false,
                }
            }
            Err(e) => {
                log::warn!("{e}");
                CompiledProgram {
                    program: self.default_program.clone(),
                    used_fallback: true,
                }
            }
        }
    }
}
