//! easel: an animation-loop drawing library on top of `easel-engine`.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use easel::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     easel::run(GraphicsConfig::new("bounce"), |g| {
//!         let mut x = 0.0;
//!         while g.draw(0) {
//!             g.clear();
//!             g.ellipse(x, 100.0, 40.0, 40.0, Color::WHITE, Color::RED);
//!             x = (x + 2.0) % g.width() as f32;
//!         }
//!     })
//! }
//! ```
//!
//! The callback runs on its own thread. [`Graphics::draw`] hands each finished
//! frame to the window and waits until it has been taken; it returns `false`
//! once the window is closing.

pub mod assets;
pub mod audio;
pub mod config;
pub mod coordinator;
pub mod event;
pub mod graphics;
pub mod host;

use std::any::Any;
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context, Result};

pub use assets::{AssetError, Image, Sound};
pub use config::GraphicsConfig;
pub use coordinator::{Frame, FrameCoordinator, Lifecycle};
pub use event::{Event, EventKind};
pub use graphics::Graphics;
pub use host::{FrameSink, HeadlessHost, Host, WindowHost};

pub use easel_engine::coords::Vec2;
pub use easel_engine::input::{Key, Modifiers};
pub use easel_engine::logging::LoggingConfig;
pub use easel_engine::paint::Color;

/// Everything a drawing program usually needs.
pub mod prelude {
    pub use crate::{Color, Event, EventKind, Graphics, GraphicsConfig, Image, Key, Sound, Vec2};
}

/// Opens a window and runs `main` against it.
///
/// Returns once the window is closed and `main` has returned. Must be called
/// from the main thread.
pub fn run<F>(config: GraphicsConfig, main: F) -> Result<()>
where
    F: FnOnce(&mut Graphics) + Send,
{
    let host = WindowHost::from_config(&config);
    run_with(config, host, main)
}

/// Runs `main` on a thread named `easel-main` while `host` runs on the
/// calling thread.
///
/// Returns the host's error if it failed, or an error if `main` panicked.
pub fn run_with<H, F>(config: GraphicsConfig, host: H, main: F) -> Result<()>
where
    H: Host,
    F: FnOnce(&mut Graphics) + Send,
{
    easel_engine::logging::init_logging(config.logging.clone());
    log::info!("opening \"{}\" ({}×{})", config.title, config.width, config.height);

    let coord = Arc::new(FrameCoordinator::new(config.width, config.height));
    let mut graphics = Graphics::new(Arc::clone(&coord), &config);

    thread::scope(|scope| {
        let worker_coord = &*coord;
        let worker = thread::Builder::new()
            .name("easel-main".to_string())
            .spawn_scoped(scope, move || {
                let _guard = MainGuard(worker_coord);
                main(&mut graphics);
            })
            .context("failed to spawn the drawing thread")?;

        let hosted = host.run(Arc::clone(&coord));
        if let Err(e) = &hosted {
            log::error!("host loop failed: {e:#}");
            coord.request_close();
        }
        coord.finish_close();

        let joined = worker.join();
        hosted?;
        joined.map_err(|payload| anyhow!("drawing callback panicked: {}", panic_message(&*payload)))
    })
}

/// Reports the end of the drawing callback, including by panic.
struct MainGuard<'a>(&'a FrameCoordinator);

impl Drop for MainGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            log::error!("drawing callback panicked; closing");
            self.0.request_close();
        }
        self.0.main_finished();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
