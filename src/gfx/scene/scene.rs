//! # Scene Orchestrator
//!
//! Owns the object hierarchy and every piece of shared state a frame reads: mesh
//! topology tags, the shader set, camera, lighting, animation clock and render state.
//!
//! A frame runs in a fixed order through a [`RenderBackend`]:
//!
//! 1. [`update`](Scene::update) advances the clock and recomputes world transforms
//! 2. [`clear`](Scene::clear) resets the colour and depth buffers
//! 3. [`render`](Scene::render) uploads the frame globals, then draws objects pre-order
//! 4. [`present`](Scene::present) shows the frame

use cgmath::{Matrix4, SquareMatrix};

use super::{
    mesh::{MeshId, MeshRegistry, Topology},
    node::Transformable,
    object::{ObjectId, RenderObject},
};
use crate::gfx::{
    animation::AnimationClock,
    camera::CameraState,
    lighting::LightingState,
    rendering::{
        backend::{DrawCall, FrameGlobals, RenderBackend, RenderState},
        shader_set::{ShaderCompiler, ShaderLoadReport, ShaderSet},
    },
};

/// Main scene containing objects, shaders, camera, lighting and the animation clock
pub struct Scene<P> {
    objects: Vec<RenderObject>,
    meshes: MeshRegistry,
    shaders: ShaderSet<P>,
    pub camera: CameraState,
    pub lighting: LightingState,
    pub clock: AnimationClock,
    pub render_state: RenderState,
    next_id: u32,
}

impl<P> Scene<P> {
    /// Creates an empty scene. Shaders must be loaded before anything is drawn.
    pub fn new(camera: CameraState, clock: AnimationClock) -> Self {
        Self {
            objects: Vec::new(),
            meshes: MeshRegistry::new(),
            shaders: ShaderSet::new(),
            camera,
            lighting: LightingState::new(),
            clock,
            render_state: RenderState::default(),
            next_id: 0,
        }
    }

    /// Records the topology a mesh is drawn with
    pub fn register_mesh(&mut self, mesh: MeshId, topology: Topology) {
        self.meshes.register(mesh, topology);
    }

    pub fn topology(&self, mesh: MeshId) -> Topology {
        self.meshes.topology(mesh)
    }

    pub fn set_topology(&mut self, mesh: MeshId, topology: Topology) {
        self.meshes.set_topology(mesh, topology);
    }

    /// Adds a top-level object, assigning ids to it and any children it already owns
    pub fn add_object(&mut self, mut object: RenderObject) -> ObjectId {
        object.assign_ids(&mut self.next_id);
        let id = object.id.unwrap_or(ObjectId(self.next_id));
        log::debug!("Added object '{}' as {:?}", object.name, id);
        self.objects.push(object);
        id
    }

    /// Attaches `object` below `parent`. Returns `None`, dropping `object`, when
    /// `parent` is not in the scene.
    pub fn add_child(&mut self, parent: ObjectId, mut object: RenderObject) -> Option<ObjectId> {
        let parent = self.objects.iter_mut().find_map(|root| root.find_mut(parent))?;
        object.assign_ids(&mut self.next_id);
        let id = object.id?;
        log::debug!("Added object '{}' as {:?} below '{}'", object.name, id, parent.name);
        parent.add_child(object);
        Some(id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&RenderObject> {
        self.objects.iter().find_map(|root| root.find(id))
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut RenderObject> {
        self.objects.iter_mut().find_map(|root| root.find_mut(id))
    }

    /// Top-level objects in insertion order
    pub fn objects(&self) -> &[RenderObject] {
        &self.objects
    }

    /// Compiles every shader program
    pub fn load_shaders<C>(&mut self, compiler: &mut C) -> ShaderLoadReport
    where
        C: ShaderCompiler<Program = P>,
    {
        self.shaders.load(compiler)
    }

    /// Releases every shader program and compiles them all again
    pub fn reload_shaders<C>(&mut self, compiler: &mut C) -> ShaderLoadReport
    where
        C: ShaderCompiler<Program = P>,
    {
        log::info!("Reloading shader programs");
        self.shaders.load(compiler)
    }

    pub fn shaders(&self) -> &ShaderSet<P> {
        &self.shaders
    }

    /// Advances the animation clock and recomputes every world transform
    pub fn update(&mut self, elapsed_ms: f32) {
        self.clock.advance(elapsed_ms);
        for object in &mut self.objects {
            object.node_mut().compute_world_transform(Matrix4::identity());
        }
    }

    pub fn clear<B: RenderBackend<Program = P>>(&self, backend: &mut B) {
        backend.clear(&self.render_state);
    }

    /// Values every draw of this frame shares
    pub fn frame_globals(&self) -> FrameGlobals {
        FrameGlobals {
            projection: self.camera.projection,
            view: self.camera.view,
            camera_position: self.camera.position,
            progress: self.clock.progress(),
            lights: *self.lighting.lights(),
            depth_test: self.render_state.depth_test,
        }
    }

    /// Uploads the frame globals and draws every object parent-first.
    /// Returns the number of draws issued.
    pub fn render<B: RenderBackend<Program = P>>(&self, backend: &mut B) -> usize {
        backend.set_frame_globals(&self.frame_globals());

        let mut draws = 0;
        for root in &self.objects {
            root.visit(&mut |object| {
                let Some(program) = self.shaders.program(object.effect) else {
                    log::trace!("Skipping '{}': no program for {}", object.name, object.effect);
                    return;
                };
                backend.draw(&DrawCall {
                    program,
                    mesh: object.mesh,
                    topology: self.meshes.topology(object.mesh),
                    textures: &object.textures,
                    model: object.world_transform(),
                });
                draws += 1;
            });
        }
        draws
    }

    pub fn present<B: RenderBackend<Program = P>>(&self, backend: &mut B) {
        backend.present();
    }

    /// Runs one whole frame: update, clear, render, present
    pub fn frame<B: RenderBackend<Program = P>>(&mut self, elapsed_ms: f32, backend: &mut B) {
        self.update(elapsed_ms);
        self.clear(backend);
        let draws = self.render(backend);
        self.present(backend);
        log::trace!("Frame drew {} objects", draws);
    }
}
