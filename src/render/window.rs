//! Window lifecycle and the frame driver loop.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::core::error::Error;
use crate::core::input::InputState;
use crate::core::time::FrameTimer;
use crate::render::context::GpuContext;
use crate::scene::{Diorama, DioramaConfig};

struct App {
    config: DioramaConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    diorama: Option<Diorama>,
    input: InputState,
    timer: FrameTimer,
}

impl App {
    fn new(config: DioramaConfig) -> Self {
        Self {
            config,
            window: None,
            gpu: None,
            diorama: None,
            input: InputState::new(),
            timer: FrameTimer::new(),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Error> {
        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| Error::Window(e.to_string()))?,
        );

        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;
        let diorama = Diorama::new(&gpu, self.config.clone())?;

        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.diorama = Some(diorama);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Startup failed: {e}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.process_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { .. } => {
                if self.input.is_key_pressed(winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let (Some(gpu), Some(diorama)) = (&mut self.gpu, &mut self.diorama) {
                        gpu.resize(size.width, size.height);
                        diorama.resize(gpu, size.width, size.height);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.timer.tick();
                let dt = self.timer.delta_secs();

                if let (Some(gpu), Some(diorama)) = (&self.gpu, &mut self.diorama) {
                    diorama.update(&self.input, dt);
                    if let Err(e) = diorama.render(gpu) {
                        log::warn!("Frame skipped: {e}");
                    }
                }

                if self.timer.frame_count() % 30 == 0 {
                    if let Some(window) = &self.window {
                        window.set_title(&format!(
                            "{} - {:.0} FPS | drag=orbit, scroll=zoom, B=bloom, right-drag=lift fish",
                            self.config.window.title,
                            self.timer.fps()
                        ));
                    }
                }

                self.input.end_frame();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Create the event loop and run the diorama until the window closes.
pub fn run(config: DioramaConfig) -> Result<(), Error> {
    let event_loop = EventLoop::new().map_err(|e| Error::Window(e.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| Error::Window(e.to_string()))?;
    Ok(())
}
