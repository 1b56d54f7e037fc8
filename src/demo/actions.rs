//! Key bindings
//!
//! A fixed table mapping each demo key to a description and an action. Each frame,
//! every binding whose key was triggered runs once, in table order.

use cgmath::{Matrix4, SquareMatrix, Vector3};

use super::Demo;
use crate::{
    gfx::{lighting::LightSlot, rendering::{Effect, ShaderCompiler}, scene::Topology},
    input::{Key, Keyboard},
};

/// What an action may touch
pub struct ActionContext<'a, C: ShaderCompiler> {
    pub demo: &'a mut Demo<C::Program>,
    pub compiler: &'a mut C,
    /// Shift held while the key was pressed
    pub modifier: bool,
}

pub struct KeyBinding<C: ShaderCompiler> {
    pub key: Key,
    pub description: &'static str,
    /// Description of the Shift variant, if the binding has one
    pub shift_description: Option<&'static str>,
    pub action: fn(&mut ActionContext<'_, C>),
}

/// Every binding in dispatch order
pub fn bindings<C: ShaderCompiler>() -> Vec<KeyBinding<C>> {
    vec![
        KeyBinding {
            key: Key::P,
            description: "Pause animation",
            shift_description: Some("Pause rotation"),
            action: |ctx| {
                if ctx.modifier {
                    ctx.demo.rotate = !ctx.demo.rotate;
                } else {
                    ctx.demo.scene.clock.toggle_pause();
                }
            },
        },
        KeyBinding {
            key: Key::Num0,
            description: "Reload and compile shaders",
            shift_description: None,
            action: |ctx| {
                ctx.demo.scene.reload_shaders(&mut *ctx.compiler);
                ctx.demo.set_cube_effect(Effect::Basic);
            },
        },
        KeyBinding {
            key: Key::R,
            description: "Reset scene (reset before changing demo mode)",
            shift_description: None,
            action: |ctx| ctx.demo.reset(),
        },
        KeyBinding {
            key: Key::Plus,
            description: "Zoom in",
            shift_description: None,
            action: |ctx| ctx.demo.zoom(1.0),
        },
        KeyBinding {
            key: Key::Minus,
            description: "Zoom out",
            shift_description: None,
            action: |ctx| ctx.demo.zoom(-1.0),
        },
        KeyBinding {
            key: Key::S,
            description: "Shrink the cube until it disappears",
            shift_description: None,
            action: |ctx| ctx.demo.start_effect(Effect::Shrink),
        },
        KeyBinding {
            key: Key::D,
            description: "Fade from the normal texture to a destroyed texture",
            shift_description: None,
            action: |ctx| ctx.demo.start_effect(Effect::TextureFade),
        },
        KeyBinding {
            key: Key::F,
            description: "Fade the cube to transparent",
            shift_description: None,
            action: |ctx| {
                ctx.demo.fade.arm();
                ctx.demo.start_effect(Effect::AlphaFade);
            },
        },
        KeyBinding {
            key: Key::A,
            description: "Split the cube into several smaller pieces",
            shift_description: None,
            action: |ctx| ctx.demo.start_effect(Effect::Split),
        },
        KeyBinding {
            key: Key::H,
            description: "Add heightmap",
            shift_description: Some("Add heightmap with lighting"),
            action: |ctx| {
                let cube_mesh = ctx.demo.cube_mesh;
                ctx.demo.scene.set_topology(cube_mesh, Topology::Patches);
                ctx.demo.set_cube_effect(if ctx.modifier {
                    Effect::LitHeightmap
                } else {
                    Effect::Heightmap
                });
            },
        },
        KeyBinding {
            key: Key::L,
            description: "Static laser with lighting",
            shift_description: Some("Moving laser with lighting"),
            action: |ctx| {
                ctx.demo.set_cube_effect(Effect::Lighting);
                if ctx.modifier {
                    let laser = ctx.demo.moving_laser;
                    ctx.demo.set_local_transform(laser, Matrix4::identity());
                } else {
                    let laser = ctx.demo.static_laser;
                    ctx.demo.set_local_transform(laser, Matrix4::identity());
                    ctx.demo.scene.lighting.set_light(
                        LightSlot::Secondary,
                        Vector3::new(-2.0, 0.0, 10.0),
                        50.0,
                        Vector3::new(1.0, 0.0, 0.0),
                    );
                }
            },
        },
    ]
}

/// Runs the action of every binding whose key was triggered this frame
pub fn dispatch<C: ShaderCompiler>(
    bindings: &[KeyBinding<C>],
    keyboard: &Keyboard,
    ctx: &mut ActionContext<'_, C>,
) {
    for binding in bindings {
        if keyboard.is_triggered(binding.key) {
            log::debug!("Key '{}' triggered", binding.key.label());
            (binding.action)(ctx);
        }
    }
}

/// The key-binding listing shown at startup
pub fn help_lines<C: ShaderCompiler>(bindings: &[KeyBinding<C>]) -> Vec<String> {
    let mut lines = vec!["Key bindings:".to_string()];
    for binding in bindings {
        lines.push(format!("{} - {}", binding.key.label(), binding.description));
        if let Some(shift) = binding.shift_description {
            lines.push(format!("{} - {}", binding.key.label().to_uppercase(), shift));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::DemoConfig,
        gfx::{
            animation::ClockState,
            lighting::Light,
            testing::{assert_matrix_eq, RecordingBackend, StubCompiler, StubResources},
        },
    };
    use winit::{
        event::ElementState,
        keyboard::{KeyCode, ModifiersState},
    };

    struct Harness {
        demo: Demo<crate::gfx::testing::StubProgram>,
        compiler: StubCompiler,
        keyboard: Keyboard,
        backend: RecordingBackend,
    }

    impl Harness {
        fn new() -> Self {
            let mut compiler = StubCompiler::default();
            let demo = Demo::new(
                &DemoConfig::default(),
                &mut StubResources::default(),
                &mut compiler,
            )
            .unwrap();
            Self {
                demo,
                compiler,
                keyboard: Keyboard::new(),
                backend: RecordingBackend::default(),
            }
        }

        /// Presses `code` (with Shift if asked), runs one frame, then releases
        fn press(&mut self, code: KeyCode, shift: bool, elapsed_ms: f32) {
            if shift {
                self.keyboard.handle_modifiers(ModifiersState::SHIFT);
            }
            self.keyboard.handle_key(code, ElementState::Pressed, false, false);
            self.frame(elapsed_ms);
            self.keyboard.handle_key(code, ElementState::Released, false, false);
            if shift {
                self.keyboard.handle_modifiers(ModifiersState::empty());
            }
        }

        fn frame(&mut self, elapsed_ms: f32) {
            self.demo
                .frame(elapsed_ms, &self.keyboard, &mut self.compiler, &mut self.backend);
            self.keyboard.end_frame();
        }

        fn local(&self, id: crate::gfx::scene::ObjectId) -> Matrix4<f32> {
            self.demo.scene.object(id).unwrap().local_transform()
        }
    }

    #[test]
    fn test_fade_disables_depth_test_exactly_once() {
        let mut h = Harness::new();
        h.press(KeyCode::KeyF, false, 0.0);

        assert_eq!(h.demo.cube_effect(), Some(Effect::AlphaFade));
        assert_eq!(h.demo.scene.clock.state(), ClockState::Running);
        assert!(h.demo.fade.is_armed());

        let mut fired = 0;
        for _ in 0..40 {
            if h.demo.before_update(16.0) {
                fired += 1;
            }
            h.demo.scene.update(16.0);
        }
        assert_eq!(fired, 1);
        assert!(!h.demo.scene.render_state.depth_test);
        assert!(h.demo.scene.clock.progress() > 0.25);
    }

    #[test]
    fn test_fade_depth_switch_reaches_the_renderer() {
        let mut h = Harness::new();
        h.press(KeyCode::KeyF, false, 0.0);
        h.frame(200.0);
        assert!(h.backend.last_globals().unwrap().depth_test);
        h.frame(100.0); // progress 0.3 is seen on the following frame
        h.frame(16.0);
        assert!(!h.backend.last_globals().unwrap().depth_test);
    }

    #[test]
    fn test_refade_restarts_and_rearms() {
        let mut h = Harness::new();
        h.press(KeyCode::KeyF, false, 0.0);
        h.frame(300.0);
        h.press(KeyCode::KeyF, false, 0.0);

        assert_eq!(h.demo.scene.clock.progress(), 0.0);
        assert!(h.demo.fade.is_armed());
    }

    #[test]
    fn test_reset_restores_starting_state() {
        let mut h = Harness::new();
        h.press(KeyCode::KeyF, false, 400.0);
        h.frame(400.0);
        h.press(KeyCode::KeyH, true, 0.0);
        h.press(KeyCode::KeyL, false, 0.0);
        h.press(KeyCode::KeyL, true, 0.0);

        h.press(KeyCode::KeyR, false, 0.0);

        let demo = &h.demo;
        assert_eq!(demo.cube_effect(), Some(Effect::Basic));
        assert_eq!(demo.scene.clock.state(), ClockState::Stopped);
        assert_eq!(demo.scene.clock.progress(), 0.0);
        assert!(demo.scene.render_state.depth_test);
        assert!(!demo.fade.is_armed());
        assert_eq!(demo.scene.topology(demo.cube_mesh), Topology::Triangles);
        assert_eq!(*demo.scene.lighting.light(LightSlot::Secondary), Light::off());
        assert_matrix_eq(h.local(demo.static_laser), super::super::parked_transform());
        assert_matrix_eq(h.local(demo.moving_laser), super::super::parked_transform());
    }

    #[test]
    fn test_static_laser_brings_red_light() {
        let mut h = Harness::new();
        h.press(KeyCode::KeyL, false, 0.0);

        assert_eq!(h.demo.cube_effect(), Some(Effect::Lighting));
        assert_matrix_eq(h.local(h.demo.static_laser), Matrix4::identity());
        assert_matrix_eq(h.local(h.demo.moving_laser), super::super::parked_transform());
        let red = h.demo.scene.lighting.light(LightSlot::Secondary);
        assert_eq!(red.radius, 50.0);
        assert_eq!(red.colour, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_moving_laser_with_shift() {
        let mut h = Harness::new();
        h.press(KeyCode::KeyL, true, 0.0);

        assert_matrix_eq(h.local(h.demo.moving_laser), Matrix4::identity());
        assert_matrix_eq(h.local(h.demo.static_laser), super::super::parked_transform());
        assert!(h.demo.scene.lighting.light(LightSlot::Secondary).is_off());
    }

    #[test]
    fn test_heightmap_switches_topology() {
        let mut h = Harness::new();
        h.press(KeyCode::KeyH, false, 0.0);
        assert_eq!(h.demo.cube_effect(), Some(Effect::Heightmap));
        assert_eq!(h.demo.scene.topology(h.demo.cube_mesh), Topology::Patches);

        h.press(KeyCode::KeyH, true, 0.0);
        assert_eq!(h.demo.cube_effect(), Some(Effect::LitHeightmap));
    }

    #[test]
    fn test_reload_rebuilds_every_program_and_resets_effect() {
        let mut h = Harness::new();
        h.press(KeyCode::KeyS, false, 0.0);
        let compiled_before = h.compiler.compiled.len();

        h.press(KeyCode::Digit0, false, 0.0);

        assert_eq!(h.compiler.compiled.len(), compiled_before + Effect::COUNT);
        assert_eq!(h.demo.cube_effect(), Some(Effect::Basic));
        assert!(h.demo.scene.shaders().is_loaded());
    }

    #[test]
    fn test_zoom_premultiplies_translation() {
        let mut h = Harness::new();
        h.demo.rotate = false;
        let before = h.local(h.demo.cube);

        h.press(KeyCode::Equal, false, 0.0);
        let zoomed_in = h.local(h.demo.cube);
        assert_matrix_eq(
            zoomed_in,
            Matrix4::from_translation(Vector3::new(0.0, 0.0, 0.5)) * before,
        );

        h.press(KeyCode::Minus, false, 0.0);
        assert_matrix_eq(h.local(h.demo.cube), before);
    }

    #[test]
    fn test_pause_and_rotation_toggles() {
        let mut h = Harness::new();
        h.press(KeyCode::KeyS, false, 0.0);
        h.press(KeyCode::KeyP, false, 0.0);
        assert_eq!(h.demo.scene.clock.state(), ClockState::Paused);
        h.press(KeyCode::KeyP, false, 0.0);
        assert_eq!(h.demo.scene.clock.state(), ClockState::Running);

        h.press(KeyCode::KeyP, true, 0.0);
        assert!(!h.demo.rotate);
        assert!(h.demo.scene.clock.is_running());
    }

    #[test]
    fn test_stuck_shift_cleared_on_focus_loss() {
        let mut h = Harness::new();
        h.press(KeyCode::KeyS, false, 0.0);
        h.keyboard.handle_modifiers(ModifiersState::SHIFT);
        h.keyboard.release_all();

        h.press(KeyCode::KeyP, false, 0.0);
        assert_eq!(h.demo.scene.clock.state(), ClockState::Paused);
        assert!(h.demo.rotate);
    }

    #[test]
    fn test_untriggered_keys_do_nothing() {
        let mut h = Harness::new();
        h.keyboard.handle_key(KeyCode::KeyQ, ElementState::Pressed, false, false);
        h.frame(16.0);
        assert_eq!(h.demo.cube_effect(), Some(Effect::Basic));
        assert_eq!(h.demo.scene.clock.state(), ClockState::Stopped);
        assert_eq!(h.backend.draw_count(), 3);
    }

    #[test]
    fn test_help_lists_shift_variants() {
        let lines = help_lines(&bindings::<StubCompiler>());
        assert_eq!(lines[0], "Key bindings:");
        assert!(lines.contains(&"p - Pause animation".to_string()));
        assert!(lines.contains(&"P - Pause rotation".to_string()));
        assert!(lines.contains(&"H - Add heightmap with lighting".to_string()));
        assert!(lines.contains(&"0 - Reload and compile shaders".to_string()));
    }
}
