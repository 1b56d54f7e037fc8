//! # LaserCube Demo
//!
//! Builds the demo scene (a textured cube carrying a moving laser, plus a static laser
//! beside it) and applies the per-frame logic that runs between input and update:
//! the depth-test schedule used by the alpha fade, and the cube's spin.

pub mod actions;

use anyhow::Context;
use cgmath::{Deg, InnerSpace, Matrix4, Vector3};

use crate::{
    config::DemoConfig,
    gfx::{
        animation::AnimationClock,
        camera::CameraState,
        geometry::{generate_cube, generate_line, load_obj, MeshData},
        lighting::LightSlot,
        rendering::{Effect, RenderBackend, ResourceProvider, ShaderCompiler},
        scene::{MeshId, ObjectId, RenderObject, Scene, Topology},
    },
    input::Keyboard,
};

/// Where the lasers wait while hidden
pub const PARKED_POSITION: Vector3<f32> = Vector3::new(0.0, 1000.0, 0.0);

/// Cube starting position, in front of the camera
pub const CUBE_POSITION: Vector3<f32> = Vector3::new(0.0, 0.0, -10.0);

pub fn parked_transform() -> Matrix4<f32> {
    Matrix4::from_translation(PARKED_POSITION)
}

/// One-shot request to turn depth testing off once the animation passes a threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeSchedule {
    armed: bool,
    threshold: f32,
}

impl FadeSchedule {
    pub fn new(threshold: f32) -> Self {
        Self {
            armed: false,
            threshold,
        }
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Fires at most once per arming, when `progress` passes the threshold. Returns
    /// true when it switched depth testing off.
    ///
    /// Disarms at the threshold even when depth testing is already off.
    pub fn poll(&mut self, progress: f32, depth_test: &mut bool) -> bool {
        if !self.armed || progress <= self.threshold {
            return false;
        }
        self.armed = false;
        if *depth_test {
            *depth_test = false;
            true
        } else {
            false
        }
    }
}

/// The demo scene plus the handles the key bindings act on
pub struct Demo<P> {
    pub scene: Scene<P>,
    pub cube: ObjectId,
    pub static_laser: ObjectId,
    pub moving_laser: ObjectId,
    pub cube_mesh: MeshId,
    /// Whether the cube spins each frame
    pub rotate: bool,
    pub fade: FadeSchedule,
    rotation_speed: f32,
    zoom_step: f32,
}

impl<P> Demo<P> {
    /// Uploads the demo's meshes and textures, builds the scene and compiles every
    /// shader program
    ///
    /// Textures that fail to load leave their slot unbound. A cube mesh file that is
    /// missing or unreadable is replaced by the procedural cube.
    pub fn new<R, C>(config: &DemoConfig, resources: &mut R, compiler: &mut C) -> anyhow::Result<Self>
    where
        R: ResourceProvider,
        C: ShaderCompiler<Program = P>,
    {
        let camera = CameraState::looking_at(
            Vector3::new(0.0, 0.0, 0.0),
            CUBE_POSITION,
            1.33,
            Deg(45.0),
            1.0,
            100.0,
        );
        let mut scene = Scene::new(camera, AnimationClock::new(config.animation_rate));
        scene.render_state.clear_colour = config.clear_colour;

        let cube_data = Self::cube_mesh_data(config);
        let cube_mesh = resources.upload_mesh(&cube_data);
        scene.register_mesh(cube_mesh, cube_data.topology);

        let mut cube = RenderObject::new("cube", cube_mesh, Effect::Basic)
            .with_local_transform(Matrix4::from_translation(CUBE_POSITION));
        let texture_paths = [
            &config.cube_texture,
            &config.cube_destroyed_texture,
            &config.cube_heightmap,
        ];
        for (slot, path) in texture_paths.into_iter().enumerate() {
            match resources.load_texture(path) {
                Ok(texture) => cube.set_texture(slot as u32, texture),
                Err(e) => log::warn!("{e}; texture slot {slot} left unbound"),
            }
        }

        let static_laser_mesh = Self::upload_line(
            &mut scene,
            resources,
            generate_line(Vector3::new(-2.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -10.0)),
        );
        let moving_laser_mesh = Self::upload_line(
            &mut scene,
            resources,
            generate_line(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 10.0)),
        );

        let cube = scene.add_object(cube);
        let moving_laser = scene
            .add_child(
                cube,
                RenderObject::new("moving laser", moving_laser_mesh, Effect::Flat)
                    .with_local_transform(parked_transform()),
            )
            .context("cube missing from the scene")?;
        let static_laser = scene.add_object(
            RenderObject::new("static laser", static_laser_mesh, Effect::Flat)
                .with_local_transform(parked_transform()),
        );

        scene.lighting.set_light(
            LightSlot::Primary,
            Vector3::new(5.0, 10.0, 10.0),
            1000.0,
            Vector3::new(1.0, 1.0, 1.0),
        );
        scene.lighting.disable(LightSlot::Secondary);

        scene.load_shaders(compiler);

        Ok(Self {
            scene,
            cube,
            static_laser,
            moving_laser,
            cube_mesh,
            rotate: true,
            fade: FadeSchedule::new(config.fade_depth_threshold),
            rotation_speed: config.rotation_speed,
            zoom_step: config.zoom_step,
        })
    }

    fn cube_mesh_data(config: &DemoConfig) -> MeshData {
        let Some(path) = &config.cube_mesh else {
            return generate_cube();
        };
        match load_obj(path) {
            Ok(mesh) => mesh,
            Err(e) => {
                log::warn!("{e}; using the procedural cube");
                generate_cube()
            }
        }
    }

    fn upload_line<R: ResourceProvider>(
        scene: &mut Scene<P>,
        resources: &mut R,
        line: MeshData,
    ) -> MeshId {
        let mesh = resources.upload_mesh(&line);
        scene.register_mesh(mesh, Topology::Lines);
        mesh
    }

    pub fn cube_effect(&self) -> Option<Effect> {
        self.scene.object(self.cube).map(|cube| cube.effect)
    }

    pub fn set_cube_effect(&mut self, effect: Effect) {
        if let Some(cube) = self.scene.object_mut(self.cube) {
            cube.set_effect(effect);
        }
    }

    /// Switches the cube to `effect` and runs the animation from the start
    pub fn start_effect(&mut self, effect: Effect) {
        log::debug!("Starting {effect} effect");
        self.set_cube_effect(effect);
        self.scene.clock.restart();
    }

    /// Moves the cube along the view axis by `steps` zoom steps
    pub fn zoom(&mut self, steps: f32) {
        let offset = Matrix4::from_translation(Vector3::new(0.0, 0.0, steps * self.zoom_step));
        if let Some(cube) = self.scene.object_mut(self.cube) {
            let local = cube.local_transform();
            cube.set_local_transform(offset * local);
        }
    }

    pub fn set_local_transform(&mut self, object: ObjectId, local: Matrix4<f32>) {
        if let Some(object) = self.scene.object_mut(object) {
            object.set_local_transform(local);
        }
    }

    /// Back to the starting look: lasers hidden, red light off, plain cube, clock stopped.
    /// The cube keeps its position and orientation.
    pub fn reset(&mut self) {
        log::info!("Resetting scene");
        self.scene.lighting.disable(LightSlot::Secondary);
        self.set_local_transform(self.static_laser, parked_transform());
        self.set_local_transform(self.moving_laser, parked_transform());
        self.scene.set_topology(self.cube_mesh, Topology::Triangles);
        self.scene.render_state.depth_test = true;
        self.fade.disarm();
        self.scene.clock.stop();
        self.set_cube_effect(Effect::Basic);
    }

    /// Runs between input handling and the scene update. Returns true on the frame the
    /// fade schedule switches depth testing off.
    pub fn before_update(&mut self, elapsed_ms: f32) -> bool {
        let fired = self.fade.poll(
            self.scene.clock.progress(),
            &mut self.scene.render_state.depth_test,
        );
        if fired {
            log::debug!("Depth test disabled part way through the fade");
        }

        if self.rotate {
            let axis = Vector3::new(0.0, 1.0, 1.0).normalize();
            let spin = Matrix4::from_axis_angle(axis, Deg(self.rotation_speed * elapsed_ms));
            if let Some(cube) = self.scene.object_mut(self.cube) {
                let local = cube.local_transform();
                cube.set_local_transform(local * spin);
            }
        }
        fired
    }

    /// One full frame: key bindings, fade schedule and spin, then the scene's
    /// update, clear, render and present
    pub fn frame<C, B>(&mut self, elapsed_ms: f32, keyboard: &Keyboard, compiler: &mut C, backend: &mut B)
    where
        C: ShaderCompiler<Program = P>,
        B: RenderBackend<Program = P>,
    {
        actions::dispatch(
            &actions::bindings(),
            keyboard,
            &mut actions::ActionContext {
                demo: self,
                compiler,
                modifier: keyboard.modifier(),
            },
        );
        self.before_update(elapsed_ms);
        self.scene.frame(elapsed_ms, backend);
    }
}
