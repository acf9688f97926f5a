//! Demo application: drives the vkr engine with a winit event loop.

mod demo;

use std::path::Path;

use anyhow::{Context, Result};
use glam::{Vec3, Vec4};
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use vkr_core::Timer;
use vkr_platform::{InputState, KeyCode, Window};
use vkr_render::{Engine, EngineConfig, GpuSceneData, NoOverlay};
use vkr_rhi::instance::Instance;
use vkr_rhi::pipeline::PolygonMode;

const WINDOW_TITLE: &str = "vkr demo";
const INITIAL_WIDTH: u32 = 1280;
const INITIAL_HEIGHT: u32 = 720;

struct App {
    window: Option<Window>,
    engine: Option<Engine>,
    overlay: NoOverlay,
    input: InputState,
    timer: Timer,
    camera_target: Vec3,
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            engine: None,
            overlay: NoOverlay,
            input: InputState::new(),
            timer: Timer::new(),
            camera_target: Vec3::ZERO,
            fatal: None,
        }
    }

    fn init_engine(window: &Window) -> Result<Engine> {
        let instance =
            Instance::new(cfg!(debug_assertions)).context("instance creation failed")?;
        let surface = window.create_surface(instance.entry(), instance.handle())?;

        let mut engine = Engine::new(
            instance,
            surface,
            EngineConfig {
                width: window.width(),
                height: window.height(),
                ..Default::default()
            },
        )?;

        let shader_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
        engine
            .create_material(
                demo::DEMO_MATERIAL,
                &shader_dir.join("tri_mesh.vert.spv"),
                &shader_dir.join("default_lit.frag.spv"),
                PolygonMode::Fill,
            )
            .context("material creation failed; run shaders/compile.sh first")?;

        engine.load_content(&mut demo::DemoScene::new())?;
        engine.scene_mut().camera.set_aspect(window.aspect_ratio());

        Ok(engine)
    }

    fn update_and_draw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let delta = self.timer.delta_secs();

        // WASD nudges the point the camera looks at
        const NUDGE: f32 = 6.0;
        let mut shift = Vec3::ZERO;
        if self.input.is_key_pressed(KeyCode::KeyW) {
            shift.z -= 1.0;
        }
        if self.input.is_key_pressed(KeyCode::KeyS) {
            shift.z += 1.0;
        }
        if self.input.is_key_pressed(KeyCode::KeyA) {
            shift.x -= 1.0;
        }
        if self.input.is_key_pressed(KeyCode::KeyD) {
            shift.x += 1.0;
        }
        self.camera_target += shift * NUDGE * delta;

        // Slow orbit around the target
        let t = self.timer.elapsed_secs() * 0.3;
        let camera = &mut engine.scene_mut().camera;
        camera.target = self.camera_target;
        camera.position = self.camera_target + Vec3::new(12.0 * t.cos(), 7.0, 12.0 * t.sin());

        // Ambient pulses with the frame number
        let pulse = ((engine.frame_number() as f32 / 120.0).sin() + 1.0) * 0.5;
        engine.set_scene_data(GpuSceneData {
            ambient_color: Vec4::new(0.05 + 0.1 * pulse, 0.05, 0.1 - 0.05 * pulse, 1.0),
            ..GpuSceneData::default()
        });

        if let Err(e) = engine.draw(&mut self.overlay) {
            error!("Frame failed: {}", e);
            self.fatal = Some(e.into());
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match Window::new(event_loop, INITIAL_WIDTH, INITIAL_HEIGHT, WINDOW_TITLE) {
            Ok(window) => window,
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match Self::init_engine(&window) {
            Ok(engine) => {
                info!("Initialization complete, entering main loop");
                self.engine = Some(engine);
                self.window = Some(window);
            }
            Err(e) => {
                error!("Failed to initialize engine: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.process_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(window) = self.window.as_mut() {
                    window.resize(size.width, size.height);
                }
                if let Some(engine) = self.engine.as_mut() {
                    engine.request_resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                if self.input.is_key_just_pressed(KeyCode::Escape) {
                    event_loop.exit();
                    return;
                }
                self.update_and_draw(event_loop);
                self.input.begin_frame();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    vkr_core::init_logging();
    info!("Starting {}", WINDOW_TITLE);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    match app.fatal {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
