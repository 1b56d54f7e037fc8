//! # Shader Set
//!
//! A fixed registry holding one compiled program per [`Effect`]. Objects refer to
//! programs by `Effect`, never by pointer, so a reload can release and rebuild every
//! entry without leaving any object holding a dangling handle.
//!
//! Compilation is delegated to a [`ShaderCompiler`]. A compiler that cannot build the
//! requested program hands back its default program instead and flags the substitution;
//! the set records the flag and keeps going, so every slot is populated after a load.

use std::fmt;

/// Visual effect identity; each maps to one entry of the [`ShaderSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Effect {
    /// Textured, unlit
    Basic,
    /// Shrinks the mesh to nothing as the animation progresses
    Shrink,
    /// Cross-fades texture slot 0 into texture slot 1
    TextureFade,
    /// Fades the object to fully transparent
    AlphaFade,
    /// Splits the mesh into smaller pieces that drift apart
    Split,
    /// Displaces patches by the heightmap in texture slot 2
    Heightmap,
    /// Per-fragment lighting from both light slots
    Lighting,
    /// Heightmap displacement with per-fragment lighting
    LitHeightmap,
    /// Vertex colour only, used for the lasers
    Flat,
}

impl Effect {
    /// Every effect, in registry order
    pub const ALL: [Effect; 9] = [
        Effect::Basic,
        Effect::Shrink,
        Effect::TextureFade,
        Effect::AlphaFade,
        Effect::Split,
        Effect::Heightmap,
        Effect::Lighting,
        Effect::LitHeightmap,
        Effect::Flat,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Effect::Basic => "basic",
            Effect::Shrink => "shrink",
            Effect::TextureFade => "texture-fade",
            Effect::AlphaFade => "alpha-fade",
            Effect::Split => "split",
            Effect::Heightmap => "heightmap",
            Effect::Lighting => "lighting",
            Effect::LitHeightmap => "lit-heightmap",
            Effect::Flat => "flat",
        }
    }

    /// The stage files this effect's program is built from
    pub fn program_desc(self) -> ShaderProgramDesc {
        let desc = ShaderProgramDesc::new(self.name());
        match self {
            Effect::Basic => desc.stages("basic_vertex", "basic_fragment"),
            Effect::Shrink => desc.stages("shrink_vertex", "basic_fragment"),
            Effect::TextureFade => desc.stages("basic_vertex", "texfade_fragment"),
            Effect::AlphaFade => desc.stages("basic_vertex", "fade_fragment"),
            Effect::Split => desc
                .stages("nomvp_vertex", "basic_fragment")
                .with_geometry("split_geometry"),
            Effect::Heightmap => desc
                .stages("nomvp_vertex", "basic_fragment")
                .with_tessellation("detail_tcs", "detail_tes"),
            Effect::Lighting => desc.stages("lighting_vertex", "lighting_fragment"),
            Effect::LitHeightmap => desc
                .stages("nomvp_vertex", "lighting_fragment")
                .with_tessellation("detail_tcs", "detail_tes"),
            Effect::Flat => desc.stages("basic_vertex", "notex_fragment"),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named stage sources making up one shader program. Optional stages may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShaderProgramDesc {
    pub label: String,
    pub vertex: String,
    pub fragment: String,
    pub geometry: Option<String>,
    pub tess_control: Option<String>,
    pub tess_eval: Option<String>,
}

impl ShaderProgramDesc {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Default::default()
        }
    }

    /// Sets the vertex and fragment stages (builder pattern)
    pub fn stages(mut self, vertex: &str, fragment: &str) -> Self {
        self.vertex = vertex.to_string();
        self.fragment = fragment.to_string();
        self
    }

    /// Sets the geometry stage (builder pattern)
    pub fn with_geometry(mut self, geometry: &str) -> Self {
        self.geometry = Some(geometry.to_string());
        self
    }

    /// Sets both tessellation stages (builder pattern)
    pub fn with_tessellation(mut self, control: &str, evaluation: &str) -> Self {
        self.tess_control = Some(control.to_string());
        self.tess_eval = Some(evaluation.to_string());
        self
    }

    /// Stage names in pipeline order: vertex, geometry, tessellation control and
    /// evaluation, fragment
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.vertex.as_str())
            .chain(self.geometry.as_deref())
            .chain(self.tess_control.as_deref())
            .chain(self.tess_eval.as_deref())
            .chain(std::iter::once(self.fragment.as_str()))
    }
}

/// Result of compiling one program
#[derive(Debug)]
pub struct CompiledProgram<P> {
    pub program: P,
    /// True when compilation failed and `program` is the compiler's default program
    pub used_fallback: bool,
}

/// Builds shader programs from stage descriptions
pub trait ShaderCompiler {
    type Program;

    /// Compiles `desc`, substituting a default program on failure. Never fails outright.
    fn compile(&mut self, desc: &ShaderProgramDesc) -> CompiledProgram<Self::Program>;
}

struct ShaderEntry<P> {
    program: P,
    used_fallback: bool,
}

/// Aggregate outcome of one [`ShaderSet::load`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderLoadReport {
    pub compiled: usize,
    pub fell_back: Vec<Effect>,
}

impl ShaderLoadReport {
    pub fn all_compiled(&self) -> bool {
        self.fell_back.is_empty()
    }
}

/// One program per [`Effect`], rebuilt as a whole on every load
pub struct ShaderSet<P> {
    entries: Vec<ShaderEntry<P>>,
}

impl<P> Default for ShaderSet<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ShaderSet<P> {
    /// Creates an empty set; call [`load`](Self::load) before rendering
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Releases every entry, then compiles every effect's program
    ///
    /// Failed entries hold the compiler's default program. Reports failures once per
    /// load through the log and in the returned report.
    pub fn load<C>(&mut self, compiler: &mut C) -> ShaderLoadReport
    where
        C: ShaderCompiler<Program = P>,
    {
        self.unload();

        let mut fell_back = Vec::new();
        for effect in Effect::ALL {
            let compiled = compiler.compile(&effect.program_desc());
            if compiled.used_fallback {
                log::warn!("Shader {} ({}) failed to load or compile", effect.index(), effect);
                fell_back.push(effect);
            }
            self.entries.push(ShaderEntry {
                program: compiled.program,
                used_fallback: compiled.used_fallback,
            });
        }

        let report = ShaderLoadReport {
            compiled: Effect::COUNT - fell_back.len(),
            fell_back,
        };
        if report.all_compiled() {
            log::info!("All {} shader programs loaded and compiled", Effect::COUNT);
        } else {
            log::warn!(
                "{} of {} shader programs fell back to the default program",
                report.fell_back.len(),
                Effect::COUNT
            );
        }
        report
    }

    /// Drops every compiled program
    pub fn unload(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("Releasing {} shader programs", self.entries.len());
        }
        self.entries.clear();
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.len() == Effect::COUNT
    }

    pub fn program(&self, effect: Effect) -> Option<&P> {
        self.entries.get(effect.index()).map(|entry| &entry.program)
    }

    /// Whether `effect` is currently served by the default program. False when unloaded.
    pub fn is_using_fallback(&self, effect: Effect) -> bool {
        self.entries
            .get(effect.index())
            .is_some_and(|entry| entry.used_fallback)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
