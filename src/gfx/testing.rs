//! Test doubles for the collaborator traits plus matrix assertions.

use std::{
    cell::Cell,
    collections::HashSet,
    path::{Path, PathBuf},
    rc::Rc,
};

use cgmath::Matrix4;

use crate::{
    error::GfxError,
    gfx::{
        geometry::MeshData,
        rendering::{
            backend::{DrawCall, FrameGlobals, RenderBackend, RenderState, ResourceProvider},
            shader_set::{CompiledProgram, ShaderCompiler, ShaderProgramDesc},
        },
        scene::{MeshId, TextureId, Topology},
    },
};

/// Element-wise comparison with a small absolute tolerance
#[track_caller]
pub fn assert_matrix_eq(actual: Matrix4<f32>, expected: Matrix4<f32>) {
    let a: &[[f32; 4]; 4] = actual.as_ref();
    let e: &[[f32; 4]; 4] = expected.as_ref();
    for col in 0..4 {
        for row in 0..4 {
            assert!(
                approx::abs_diff_eq!(a[col][row], e[col][row], epsilon = 1e-4),
                "matrices differ at column {col}, row {row}:\n{actual:?}\n!=\n{expected:?}"
            );
        }
    }
}

#[derive(Debug, Default)]
struct LiveCounter {
    live: Cell<usize>,
    peak: Cell<usize>,
}

#[derive(Debug)]
struct LiveToken(Rc<LiveCounter>);

impl LiveToken {
    fn new(counter: &Rc<LiveCounter>) -> Self {
        let live = counter.live.get() + 1;
        counter.live.set(live);
        counter.peak.set(counter.peak.get().max(live));
        Self(counter.clone())
    }
}

impl Drop for LiveToken {
    fn drop(&mut self) {
        self.0.live.set(self.0.live.get() - 1);
    }
}

/// Program handed out by [`StubCompiler`]; equality compares labels only
#[derive(Debug)]
pub struct StubProgram {
    pub label: String,
    _token: Option<LiveToken>,
}

impl StubProgram {
    pub fn default_program() -> Self {
        Self {
            label: "default".to_string(),
            _token: None,
        }
    }
}

impl PartialEq for StubProgram {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

/// Compiles every program unless one of its stages is listed as failing
#[derive(Debug, Default)]
pub struct StubCompiler {
    failing: HashSet<String>,
    counter: Rc<LiveCounter>,
    pub compiled: Vec<String>,
}

impl StubCompiler {
    pub fn failing(stages: &[&str]) -> Self {
        Self {
            failing: stages.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Programs created by this compiler that have not been dropped yet
    pub fn live_programs(&self) -> usize {
        self.counter.live.get()
    }

    pub fn peak_live_programs(&self) -> usize {
        self.counter.peak.get()
    }
}

impl ShaderCompiler for StubCompiler {
    type Program = StubProgram;

    fn compile(&mut self, desc: &ShaderProgramDesc) -> CompiledProgram<StubProgram> {
        self.compiled.push(desc.label.clone());
        let used_fallback = desc.stage_names().any(|stage| self.failing.contains(stage));
        let label = if used_fallback {
            "default".to_string()
        } else {
            desc.label.clone()
        };
        CompiledProgram {
            program: StubProgram {
                label,
                _token: Some(LiveToken::new(&self.counter)),
            },
            used_fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    Clear(RenderState),
    Globals(FrameGlobals),
    Draw {
        mesh: MeshId,
        program: String,
        topology: Topology,
        model: Matrix4<f32>,
    },
    Present,
}

/// Records every call in order
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub events: Vec<BackendEvent>,
}

impl RecordingBackend {
    pub fn draw_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, BackendEvent::Draw { .. }))
            .count()
    }

    pub fn last_globals(&self) -> Option<&FrameGlobals> {
        self.events.iter().rev().find_map(|e| match e {
            BackendEvent::Globals(globals) => Some(globals),
            _ => None,
        })
    }
}

impl RenderBackend for RecordingBackend {
    type Program = StubProgram;

    fn clear(&mut self, state: &RenderState) {
        self.events.push(BackendEvent::Clear(*state));
    }

    fn set_frame_globals(&mut self, globals: &FrameGlobals) {
        self.events.push(BackendEvent::Globals(*globals));
    }

    fn draw(&mut self, call: &DrawCall<'_, StubProgram>) {
        self.events.push(BackendEvent::Draw {
            mesh: call.mesh,
            program: call.program.label.clone(),
            topology: call.topology,
            model: call.model,
        });
    }

    fn present(&mut self) {
        self.events.push(BackendEvent::Present);
    }
}

/// Hands out sequential ids; textures listed as missing fail to load
#[derive(Debug, Default)]
pub struct StubResources {
    pub meshes: Vec<MeshData>,
    pub textures: Vec<PathBuf>,
    pub missing: HashSet<PathBuf>,
}

impl ResourceProvider for StubResources {
    fn upload_mesh(&mut self, mesh: &MeshData) -> MeshId {
        self.meshes.push(mesh.clone());
        MeshId(self.meshes.len() as u32 - 1)
    }

    fn load_texture(&mut self, path: &Path) -> Result<TextureId, GfxError> {
        if self.missing.contains(path) {
            return Err(GfxError::TextureLoad {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "missing",
                )),
            });
        }
        self.textures.push(path.to_path_buf());
        Ok(TextureId(self.textures.len() as u32 - 1))
    }
}
