use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_input_event;
use crate::input::InputState;
use crate::time::{FrameClock, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "easel".to_string(),
            initial_size: LogicalSize::new(1000.0, 500.0),
            resizable: true,
        }
    }
}

impl RuntimeConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.initial_size = LogicalSize::new(width, height);
        self
    }
}

/// Entry point for the runtime.
///
/// Runs a single window until the app returns `AppControl::Exit` or the
/// window is closed. Must be called on the main thread.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    exit_requested: bool,
    /// First fatal error; returned from `Runtime::run`.
    error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            exit_requested: false,
            error: None,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            input_state: InputState::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init))
                    .context("GPU initialization failed for window")
            },
        }
        .try_build()
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
            }
            Err(e) => {
                log::error!("failed to create window: {e:#}");
                self.error = Some(e);
                self.request_exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous redraw; the app paces itself inside `on_frame`.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, window) = (&mut self.app, &mut self.window);

        let Some(entry) = window.as_mut() else {
            return;
        };

        let mut control = AppControl::Continue;

        entry.with_mut(|fields| {
            if let Some(ev) = translate_input_event(fields.window, fields.input_state, &event) {
                fields.input_state.apply_event(&ev);
                if app.on_input(&ev) == AppControl::Exit {
                    control = AppControl::Exit;
                }
            }

            if app.on_window_event(&event) == AppControl::Exit {
                control = AppControl::Exit;
            }
        });

        if control == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested");
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => {
                entry.with_mut(|fields| {
                    let ft: FrameTime = fields.clock.tick();
                    let mut ctx = FrameCtx {
                        window: WindowCtx { window: fields.window },
                        gpu: fields.gpu,
                        input: fields.input_state,
                        time: ft,
                    };
                    control = app.on_frame(&mut ctx);
                });

                if control == AppControl::Exit {
                    self.request_exit(event_loop);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Drop the GPU surface before the window it borrows from goes away.
        self.window = None;
        log::debug!("runtime exiting");
    }
}
