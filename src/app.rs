use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::DemoConfig,
    demo::Demo,
    gfx::rendering::{RenderEngine, ShaderProgram, WgpuShaderCompiler},
    input::{Key, Keyboard},
    timer::FrameTimer,
};

pub struct LaserCubeApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

/// Everything that needs a live GPU device, created once the window exists
struct GpuState {
    render_engine: RenderEngine,
    compiler: WgpuShaderCompiler,
    demo: Demo<ShaderProgram>,
}

struct AppState {
    config: DemoConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    keyboard: Keyboard,
    timer: FrameTimer,
    /// Set when start-up fails; returned from `run`
    error: Option<anyhow::Error>,
}

impl LaserCubeApp {
    /// Create a new application; the window and GPU state are built when the event loop resumes
    pub fn new(config: DemoConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                gpu: None,
                keyboard: Keyboard::new(),
                timer: FrameTimer::new(),
                error: None,
            },
        })
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("Event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("Failed to run event loop")?;

        match self.app_state.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(self.config.window_title.clone())
                    .with_inner_size(LogicalSize::new(
                        self.config.window_width,
                        self.config.window_height,
                    )),
            )
            .context("Failed to create window")?;
        let window_handle = Arc::new(window);
        self.window = Some(window_handle.clone());

        let (width, height) = window_handle.inner_size().into();
        let mut render_engine =
            pollster::block_on(async move { RenderEngine::new(window_handle, width, height).await })?;

        let mut compiler = render_engine.shader_compiler(self.config.shader_dir.clone());
        let demo = Demo::new(&self.config, &mut render_engine, &mut compiler)?;

        self.gpu = Some(GpuState {
            render_engine,
            compiler,
            demo,
        });
        self.timer = FrameTimer::new();
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            log::error!("Start-up failed: {e:#}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event,
                is_synthetic,
                ..
            } => {
                self.keyboard.handle_key_event(&event, is_synthetic);
                if self.keyboard.is_triggered(Key::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.keyboard.handle_modifiers(modifiers.state());
            }
            WindowEvent::Focused(false) => {
                self.keyboard.release_all();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                gpu.render_engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let elapsed_ms = self.timer.elapsed_ms();
                gpu.demo.frame(
                    elapsed_ms,
                    &self.keyboard,
                    &mut gpu.compiler,
                    &mut gpu.render_engine,
                );
                self.keyboard.end_frame();
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
