use std::sync::Arc;
use std::time::Duration;

use crate::audio::{AudioSink, LogAudio};
use crate::coordinator::{FrameCoordinator, Lifecycle};

use super::{FrameSink, Host};

/// Host without a window. Each frame goes to a [`FrameSink`].
///
/// Ends as soon as close is requested (by the callback returning with
/// close-on-exit, by the frame limit, or through
/// [`FrameCoordinator::request_close`]), or once the callback has returned
/// and its last frame was taken.
pub struct HeadlessHost<S, A = LogAudio> {
    sink: S,
    audio: A,
    max_frames: Option<u64>,
    budget: Duration,
    size: Option<(u32, u32)>,
}

impl<S: FrameSink> HeadlessHost<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            audio: LogAudio,
            max_frames: None,
            budget: Duration::from_millis(50),
            size: None,
        }
    }
}

impl<S: FrameSink, A: AudioSink> HeadlessHost<S, A> {
    /// Requests close after this many frames.
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Longest single wait for a frame before lifecycle is re-checked.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Size reported to the callback, overriding the configured one.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    pub fn with_audio<B: AudioSink>(self, audio: B) -> HeadlessHost<S, B> {
        HeadlessHost {
            sink: self.sink,
            audio,
            max_frames: self.max_frames,
            budget: self.budget,
            size: self.size,
        }
    }
}

impl<S: FrameSink, A: AudioSink> Host for HeadlessHost<S, A> {
    fn run(mut self, coord: Arc<FrameCoordinator>) -> anyhow::Result<()> {
        if let Some((w, h)) = self.size {
            coord.set_size(w, h);
        }
        log::debug!("headless host started");

        let mut frames = 0u64;
        loop {
            let frame = coord.wait_frame(self.budget);

            for command in coord.drain_audio() {
                self.audio.dispatch(&command);
            }

            if let Some(frame) = frame {
                frames += 1;
                let consumed = self.sink.consume(&frame);
                coord.recycle(frame.scene);
                consumed?;

                if self.max_frames.is_some_and(|max| frames >= max) && coord.request_close() {
                    log::debug!("frame limit of {frames} reached");
                }
                continue;
            }

            let finished = match coord.lifecycle() {
                Lifecycle::Running => coord.is_main_finished() && !coord.has_pending_frame(),
                Lifecycle::ClosePending | Lifecycle::Closed => true,
            };
            if finished {
                break;
            }
        }

        log::debug!("headless host done after {frames} frames");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use anyhow::bail;
    use easel_engine::coords::Vec2;
    use easel_engine::paint::Color;
    use easel_engine::scene::{EllipseCmd, Primitive};

    use super::*;
    use crate::assets::Sound;
    use crate::coordinator::Frame;
    use crate::{run_with, GraphicsConfig};

    fn fast_config() -> GraphicsConfig {
        GraphicsConfig::new("test").with_min_frame_time(Duration::ZERO)
    }

    #[test]
    fn single_ellipse_frame_reaches_sink() {
        let mut frames = Vec::new();
        let sink = |frame: &Frame| -> anyhow::Result<()> {
            frames.push(frame.clone());
            Ok(())
        };

        run_with(fast_config().with_close_on_exit(true), HeadlessHost::new(sink), |g| {
            g.clear();
            g.ellipse(10.0, 10.0, 5.0, 5.0, Color::WHITE, Color::TRANSPARENT);
            g.draw(0);
        })
        .unwrap();

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].background, Color::BLACK);
        assert_eq!(
            frames[0].scene.items(),
            &[Primitive::Ellipse(EllipseCmd {
                origin: Vec2::new(10.0, 10.0),
                size: Vec2::new(5.0, 5.0),
                stroke: Color::WHITE,
                fill: Color::TRANSPARENT,
            })]
        );
    }

    #[test]
    fn frames_accumulate_until_clear() {
        let mut seen = Vec::new();
        let sink = |frame: &Frame| -> anyhow::Result<()> {
            seen.push((frame.seq, frame.scene.len()));
            Ok(())
        };

        run_with(fast_config(), HeadlessHost::new(sink), |g| {
            g.clear();
            g.ellipse(10.0, 10.0, 5.0, 5.0, Color::WHITE, Color::TRANSPARENT);
            assert!(g.draw(0));
            g.point(1.0, 1.0, Color::RED);
            assert!(g.draw(0));
            assert!(g.draw(0));
            g.clear();
            g.line(0.0, 0.0, 4.0, 4.0, Color::WHITE);
            assert!(g.draw(0));
        })
        .unwrap();

        assert_eq!(seen, vec![(1, 1), (2, 2), (3, 2), (4, 1)]);
    }

    #[test]
    fn frame_limit_closes_and_ends_draw_loop() {
        let mut frames = 0;
        let mut draws_after_close = 0;
        let sink = |_: &Frame| -> anyhow::Result<()> {
            frames += 1;
            Ok(())
        };

        run_with(fast_config(), HeadlessHost::new(sink).with_max_frames(3), |g| {
            while g.draw(0) {
                g.line(0.0, 0.0, 1.0, 1.0, Color::WHITE);
            }
            if !g.draw(0) {
                draws_after_close += 1;
            }
            assert!(g.is_closed());
        })
        .unwrap();

        assert_eq!(frames, 3);
        assert_eq!(draws_after_close, 1);
    }

    #[test]
    fn sink_error_is_returned_and_releases_callback() {
        let sink = |frame: &Frame| -> anyhow::Result<()> {
            if frame.seq == 2 {
                bail!("disk full");
            }
            Ok(())
        };

        let err = run_with(fast_config(), HeadlessHost::new(sink), |g| while g.draw(0) {}).unwrap_err();
        assert!(format!("{err:#}").contains("disk full"));
    }

    #[test]
    fn callback_panic_is_reported() {
        let sink = |_: &Frame| -> anyhow::Result<()> { Ok(()) };
        let err = run_with(fast_config(), HeadlessHost::new(sink), |g| {
            g.draw(0);
            panic!("boom");
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("boom"));
    }

    #[test]
    fn wait_until_closed_returns_when_host_ends() {
        let sink = |_: &Frame| -> anyhow::Result<()> { Ok(()) };
        run_with(fast_config(), HeadlessHost::new(sink).with_max_frames(1), |g| {
            g.draw(0);
            g.wait_until_closed();
            assert!(g.is_closed());
        })
        .unwrap();
    }

    #[test]
    fn headless_size_is_visible_to_callback() {
        let mut size = (0, 0);
        let sink = |_: &Frame| -> anyhow::Result<()> { Ok(()) };
        run_with(fast_config(), HeadlessHost::new(sink).with_size(320, 200), |g| {
            g.draw(0);
            size = (g.width(), g.height());
        })
        .unwrap();
        assert_eq!(size, (320, 200));
    }

    struct Recorder<'a>(&'a mut Vec<PathBuf>);

    impl AudioSink for Recorder<'_> {
        fn play(&mut self, sound: &Sound) {
            if let Some(path) = sound.path() {
                self.0.push(path.to_path_buf());
            }
        }

        fn music(&mut self, path: &Path) {
            self.0.push(path.to_path_buf());
        }
    }

    #[test]
    fn queued_audio_reaches_host_sink() {
        let mut heard = Vec::new();
        let sink = |_: &Frame| -> anyhow::Result<()> { Ok(()) };
        let host = HeadlessHost::new(sink).with_audio(Recorder(&mut heard));

        run_with(fast_config(), host, |g| {
            g.music("theme.ogg");
            g.draw(0);
        })
        .unwrap();

        assert_eq!(heard, vec![PathBuf::from("theme.ogg")]);
    }
}
