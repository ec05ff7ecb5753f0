use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use easel_engine::core::{App as EngineApp, AppControl, FrameCtx};
use easel_engine::device::GpuInit;
use easel_engine::input::InputEvent;
use easel_engine::paint::Color;
use easel_engine::render::SceneRenderer;
use easel_engine::text::FontSystem;
use easel_engine::window::{Runtime, RuntimeConfig};
use winit::event::WindowEvent;

use crate::audio::{AudioSink, LogAudio};
use crate::config::GraphicsConfig;
use crate::coordinator::{Frame, FrameCoordinator, Lifecycle};

use super::Host;

/// Longest a redraw waits for the next frame before input is polled again.
const FRAME_WAIT: Duration = Duration::from_millis(10);

/// Host that shows frames in a native window.
///
/// Must run on the main thread on platforms that require it (macOS).
pub struct WindowHost<A = LogAudio> {
    runtime: RuntimeConfig,
    gpu: GpuInit,
    font: Option<PathBuf>,
    audio: A,
}

impl WindowHost {
    pub fn from_config(config: &GraphicsConfig) -> Self {
        let runtime = RuntimeConfig::default()
            .with_title(config.title.clone())
            .with_size(f64::from(config.width), f64::from(config.height));

        Self {
            runtime,
            // Colors and image bytes are written to the surface unconverted.
            gpu: GpuInit {
                prefer_srgb: false,
                ..GpuInit::default()
            },
            font: config.font.clone(),
            audio: LogAudio,
        }
    }
}

impl<A: AudioSink> WindowHost<A> {
    pub fn with_gpu_init(mut self, gpu: GpuInit) -> Self {
        self.gpu = gpu;
        self
    }

    pub fn with_audio<B: AudioSink>(self, audio: B) -> WindowHost<B> {
        WindowHost {
            runtime: self.runtime,
            gpu: self.gpu,
            font: self.font,
            audio,
        }
    }
}

impl<A: AudioSink + 'static> Host for WindowHost<A> {
    fn run(self, coord: Arc<FrameCoordinator>) -> anyhow::Result<()> {
        let fonts = load_fonts(self.font.as_deref());
        let app = EaselApp {
            coord,
            renderer: SceneRenderer::new(fonts),
            current: None,
            audio: self.audio,
        };
        Runtime::run(self.runtime, self.gpu, app)
    }
}

fn load_fonts(path: Option<&Path>) -> FontSystem {
    let mut fonts = FontSystem::new();

    if let Some(path) = path {
        match fonts.load_font_file(path) {
            Ok(_) => return fonts,
            Err(e) => log::warn!("{e}; falling back to a system font"),
        }
    }
    if let Err(e) = fonts.load_system_default() {
        log::warn!("{e}; text will not be drawn");
    }
    fonts
}

/// Engine-side state for one window.
///
/// Keeps the last frame so redraws without a new frame repaint it.
struct EaselApp<A> {
    coord: Arc<FrameCoordinator>,
    renderer: SceneRenderer,
    current: Option<Frame>,
    audio: A,
}

impl<A: AudioSink> EngineApp for EaselApp<A> {
    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        self.coord.push_input(event);
        AppControl::Continue
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if let WindowEvent::CloseRequested = event {
            self.coord.request_close();
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let size = ctx.window.logical_size();
        self.coord.set_size(size.width.round() as u32, size.height.round() as u32);
        log::trace!("redraw {} (dt {:.4}s)", ctx.time.frame_index, ctx.time.dt);

        if let Some(frame) = self.coord.wait_frame(FRAME_WAIT) {
            if let Some(old) = self.current.replace(frame) {
                self.coord.recycle(old.scene);
            }
        }

        for command in self.coord.drain_audio() {
            self.audio.dispatch(&command);
        }

        if self.coord.lifecycle() != Lifecycle::Running {
            return AppControl::Exit;
        }

        let Some(frame) = &self.current else {
            return ctx.render(Color::BLACK, |_, _| {});
        };
        let renderer = &mut self.renderer;
        let control = ctx.render(frame.background, |rctx, target| {
            renderer.render(rctx, target, &frame.scene);
        });
        if control == AppControl::Exit {
            self.coord.request_close();
        }
        control
    }
}
