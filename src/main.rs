use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use cyclorama::demo::{DemoDescriptor, DemoKind};
use cyclorama::engine::DemoEngine;
use cyclorama::gpu::render_context::RenderContext;
use cyclorama::options::Options;
use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{
    ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowId};

/// Winit application shell: owns the window and forwards input to the
/// engine.
struct DemoApp {
    kind: DemoKind,
    options: Options,
    window: Option<Arc<Window>>,
    engine: Option<DemoEngine>,
    last_frame: Instant,
    last_cursor: Option<Vec2>,
    frames: u32,
}

/// Frames between window-title FPS refreshes.
const TITLE_REFRESH_FRAMES: u32 = 120;

impl DemoApp {
    fn new(kind: DemoKind, options: Options) -> Self {
        Self {
            kind,
            options,
            window: None,
            engine: None,
            last_frame: Instant::now(),
            last_cursor: None,
            frames: 0,
        }
    }

    fn toggle_fullscreen(&self) {
        if let Some(window) = &self.window {
            if window.fullscreen().is_some() {
                window.set_fullscreen(None);
            } else {
                window.set_fullscreen(Some(Fullscreen::Borderless(None)));
            }
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::Space => {
                if let Some(engine) = &mut self.engine {
                    engine.toggle_pause();
                }
            }
            KeyCode::KeyF => self.toggle_fullscreen(),
            KeyCode::KeyR => {
                if let Some(engine) = &mut self.engine {
                    engine.randomize_geometry();
                }
            }
            KeyCode::Escape => event_loop.exit(),
            _ => {}
        }
    }

    fn handle_cursor(&mut self, position: Vec2) {
        if let Some(engine) = &mut self.engine {
            if engine.camera_controller.mouse_pressed {
                if let Some(last) = self.last_cursor {
                    let delta = position - last;
                    if engine.camera_controller.shift_pressed {
                        engine.camera_controller.pan(delta);
                    } else {
                        engine.camera_controller.rotate(delta);
                    }
                }
            }
        }
        self.last_cursor = Some(position);
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt_ms = now.duration_since(self.last_frame).as_secs_f64() * 1000.0;
        self.last_frame = now;

        let Some(engine) = &mut self.engine else {
            return;
        };
        match engine.render(dt_ms) {
            Ok(()) => {
                self.frames += 1;
                if self.frames % TITLE_REFRESH_FRAMES == 0 {
                    if let Some(window) = &self.window {
                        window.set_title(&format!(
                            "cyclorama - {} ({:.0} fps)",
                            engine.kind().name(),
                            engine.fps(),
                        ));
                    }
                }
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let width = engine.context.config.width;
                let height = engine.context.config.height;
                engine.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory, stopping");
            }
            Err(e) => log::warn!("frame skipped: {e}"),
        }
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(format!("cyclorama - {}", self.kind.name()))
            .with_inner_size(PhysicalSize::new(1280, 720));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let context = match pollster::block_on(RenderContext::new(
            window.clone(),
            (size.width.max(1), size.height.max(1)),
        )) {
            Ok(context) => context,
            Err(e) => {
                log::error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let descriptor = DemoDescriptor::preset(self.kind);
        match DemoEngine::new(context, descriptor, &self.options) {
            Ok(engine) => {
                log::info!("running demo '{}'", self.kind.name());
                self.engine = Some(engine);
                self.window = Some(window);
                self.last_frame = Instant::now();
            }
            Err(e) => {
                log::error!("engine initialization failed: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key),
            WindowEvent::ModifiersChanged(modifiers) => {
                if let Some(engine) = &mut self.engine {
                    engine.camera_controller.shift_pressed =
                        modifiers.state().shift_key();
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                if let Some(engine) = &mut self.engine {
                    engine.camera_controller.mouse_pressed =
                        state == ElementState::Pressed;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor(Vec2::new(
                    position.x as f32,
                    position.y as f32,
                ));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(engine) = &mut self.engine {
                    let amount = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => {
                            pos.y as f32 * 0.01
                        }
                    };
                    engine.camera_controller.zoom(amount);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let kind = match args.next() {
        Some(name) => match DemoKind::parse(&name) {
            Ok(kind) => kind,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => DemoKind::Cascade,
    };
    let options = match args.next() {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("failed to load options from '{path}': {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Options::default(),
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("event loop creation failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DemoApp::new(kind, options);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("event loop error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
