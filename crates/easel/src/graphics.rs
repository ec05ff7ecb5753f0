use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use easel_engine::coords::Vec2;
use easel_engine::input::Key;
use easel_engine::paint::Color;
use easel_engine::scene::{ArcKind, SceneBuffer};
use easel_engine::time::FramePacer;

use crate::assets::{Image, Sound};
use crate::audio::AudioCommand;
use crate::config::GraphicsConfig;
use crate::coordinator::FrameCoordinator;
use crate::event::Event;

/// Drawing handle passed to the callback.
///
/// Drawing calls record into a scene buffer owned by this handle; nothing is
/// shown until [`Graphics::draw`] hands a copy of it to the host. The buffer
/// keeps growing across `draw` calls until [`Graphics::clear`] empties it. Coordinates
/// are logical pixels with the origin at the top-left and +y pointing down.
///
/// Once the window starts closing, drawing calls do nothing and `draw`
/// returns `false` immediately.
pub struct Graphics {
    coord: Arc<FrameCoordinator>,
    scene: SceneBuffer,
    /// Recycled buffer the next published copy is written into.
    outgoing: SceneBuffer,
    background: Color,
    pacer: FramePacer,
    mouse: Vec2,
    rng: StdRng,
}

impl Graphics {
    pub(crate) fn new(coord: Arc<FrameCoordinator>, config: &GraphicsConfig) -> Self {
        coord.set_close_on_exit(config.close_on_exit);
        Self {
            coord,
            scene: SceneBuffer::new(),
            outgoing: SceneBuffer::new(),
            background: Color::BLACK,
            pacer: FramePacer::new(config.min_frame_time),
            mouse: Vec2::zero(),
            rng: StdRng::from_entropy(),
        }
    }

    #[inline]
    fn open(&self) -> bool {
        !self.coord.is_closing()
    }

    // ── frame ──────────────────────────────────────────────────────────────

    /// Discards everything drawn since the last `clear`. Until then every
    /// `draw` shows all primitives recorded so far.
    pub fn clear(&mut self) {
        self.scene.clear();
    }

    /// Shows the current frame.
    ///
    /// Blocks until the host has taken the frame and the minimum frame time
    /// plus `delay_ms` has passed. Recorded primitives stay in place, so the
    /// next frame builds on this one unless [`Graphics::clear`] is called.
    /// Returns `false` once the window is closing; the loop should then end.
    pub fn draw(&mut self, delay_ms: u64) -> bool {
        let now = Instant::now();
        let not_before = self.pacer.deadline(now, Duration::from_millis(delay_ms));

        let mut published = std::mem::take(&mut self.outgoing);
        published.copy_from(&self.scene);
        let out = self.coord.submit_frame(published, self.background, not_before);

        self.pacer.mark(Instant::now());
        self.outgoing = out.buffer;
        if let Some(p) = out.pointer {
            self.mouse = p;
        }
        out.open
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Close the window as soon as the callback returns.
    pub fn set_close_on_exit(&mut self, close: bool) {
        self.coord.set_close_on_exit(close);
    }

    /// True once the window has started closing.
    pub fn is_closed(&self) -> bool {
        self.coord.is_closing()
    }

    /// Blocks until the window is closed and the host loop has ended.
    pub fn wait_until_closed(&self) {
        self.coord.wait_until_closed();
    }

    pub fn width(&self) -> u32 {
        self.coord.size().0
    }

    pub fn height(&self) -> u32 {
        self.coord.size().1
    }

    /// Milliseconds since the window was opened.
    pub fn time(&self) -> u64 {
        self.coord.elapsed_ms()
    }

    // ── shapes ─────────────────────────────────────────────────────────────

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) {
        if self.open() {
            self.scene.push_line(Vec2::new(x1, y1), Vec2::new(x2, y2), color);
        }
    }

    /// Ellipse inscribed in the box with top-left `(x, y)` and size `w`×`h`.
    pub fn ellipse(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, fill: Color) {
        if self.open() {
            self.scene.push_ellipse(Vec2::new(x, y), Vec2::new(w, h), color, fill);
        }
    }

    /// Open arc of the ellipse in the given box. `start` and `sweep` are
    /// radians, counter-clockwise from the +x axis. Open arcs are never
    /// filled; use [`Graphics::chord`] or [`Graphics::pie`] for a filled one.
    #[allow(clippy::too_many_arguments)]
    pub fn arc(&mut self, x: f32, y: f32, w: f32, h: f32, start: f32, sweep: f32, color: Color) {
        self.push_arc(ArcKind::Arc, x, y, w, h, start, sweep, color, Color::TRANSPARENT);
    }

    /// Arc closed by a straight segment between its ends.
    #[allow(clippy::too_many_arguments)]
    pub fn chord(&mut self, x: f32, y: f32, w: f32, h: f32, start: f32, sweep: f32, color: Color, fill: Color) {
        self.push_arc(ArcKind::Chord, x, y, w, h, start, sweep, color, fill);
    }

    /// Wedge from the ellipse center.
    #[allow(clippy::too_many_arguments)]
    pub fn pie(&mut self, x: f32, y: f32, w: f32, h: f32, start: f32, sweep: f32, color: Color, fill: Color) {
        self.push_arc(ArcKind::Pie, x, y, w, h, start, sweep, color, fill);
    }

    #[allow(clippy::too_many_arguments)]
    fn push_arc(
        &mut self,
        kind: ArcKind,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        start: f32,
        sweep: f32,
        color: Color,
        fill: Color,
    ) {
        if self.open() {
            self.scene
                .push_arc(kind, Vec2::new(x, y), Vec2::new(w, h), start, sweep, color, fill);
        }
    }

    /// Closed outline through `points`; concave outlines fill correctly.
    pub fn polygon(&mut self, points: &[Vec2], color: Color, fill: Color) {
        if self.open() {
            self.scene.push_polygon(points.to_vec(), color, fill);
        }
    }

    pub fn polyline(&mut self, points: &[Vec2], color: Color) {
        if self.open() {
            self.scene.push_polyline(points.to_vec(), color);
        }
    }

    /// Text with its top-left at `(x, y)`; `size` is the pixel height.
    pub fn text(&mut self, x: f32, y: f32, size: f32, text: &str, color: Color) {
        if self.open() {
            self.scene.push_text(Vec2::new(x, y), size, text, color);
        }
    }

    pub fn point(&mut self, x: f32, y: f32, color: Color) {
        if self.open() {
            self.scene.push_point(Vec2::new(x, y), color);
        }
    }

    pub fn points(&mut self, points: &[Vec2], color: Color) {
        if self.open() {
            self.scene.push_points(points.to_vec(), color);
        }
    }

    /// Unscaled image with its top-left at `(x, y)`. Invalid images are skipped.
    pub fn image(&mut self, x: f32, y: f32, image: &Image) {
        if !self.open() {
            return;
        }
        if let Some(data) = image.data() {
            self.scene.push_image(Vec2::new(x, y), Arc::clone(data));
        }
    }

    // ── input ──────────────────────────────────────────────────────────────

    /// Input events since the previous call, oldest first.
    pub fn events(&mut self) -> Vec<Event> {
        self.coord.take_events()
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        key.code().is_some_and(|c| self.coord.key_down(c))
    }

    /// Same as [`Graphics::is_key_pressed`] for a character; letters match
    /// either case.
    pub fn is_char_pressed(&self, c: char) -> bool {
        Key::char_code(c).is_some_and(|code| self.coord.key_down(code))
    }

    /// Whether `key` was down before its most recent press or release.
    pub fn was_key_pressed(&self, key: Key) -> bool {
        key.code().is_some_and(|c| self.coord.key_was_down(c))
    }

    /// Pointer position as of the last `draw` return.
    pub fn mouse_pos(&self) -> Vec2 {
        self.mouse
    }

    // ── sound ──────────────────────────────────────────────────────────────

    pub fn create_sound(&self, path: impl AsRef<Path>) -> Sound {
        Sound::load(path)
    }

    pub fn play(&mut self, sound: &Sound) {
        if self.open() && sound.is_valid() {
            self.coord.queue_audio(AudioCommand::Play(sound.clone()));
        }
    }

    /// Background music from a file path.
    pub fn music(&mut self, path: impl AsRef<Path>) {
        if self.open() {
            self.coord.queue_audio(AudioCommand::Music(path.as_ref().to_path_buf()));
        }
    }

    // ── randomness ─────────────────────────────────────────────────────────

    /// Uniform integer in `min..=max`. Bounds may come in either order.
    pub fn random_int(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.rng.gen_range(lo..=hi)
    }

    /// Uniform float in `min..max`; `min` when the range is empty.
    pub fn random_double(&mut self, min: f64, max: f64) -> f64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        if !(lo < hi) || !(hi - lo).is_finite() {
            return min;
        }
        self.rng.gen_range(lo..hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_engine::input::{InputEvent, KeyState, Modifiers};
    use easel_engine::scene::{EllipseCmd, Primitive};

    fn graphics() -> (Arc<FrameCoordinator>, Graphics) {
        let coord = Arc::new(FrameCoordinator::new(640, 480));
        let g = Graphics::new(Arc::clone(&coord), &GraphicsConfig::default());
        (coord, g)
    }

    #[test]
    fn calls_record_in_order_and_clear_discards() {
        let (_, mut g) = graphics();
        g.line(0.0, 0.0, 5.0, 5.0, Color::WHITE);
        g.clear();
        g.ellipse(10.0, 10.0, 5.0, 5.0, Color::WHITE, Color::TRANSPARENT);
        g.point(1.0, 1.0, Color::RED);

        assert_eq!(g.scene.len(), 2);
        assert_eq!(
            g.scene.items()[0],
            Primitive::Ellipse(EllipseCmd {
                origin: Vec2::new(10.0, 10.0),
                size: Vec2::new(5.0, 5.0),
                stroke: Color::WHITE,
                fill: Color::TRANSPARENT,
            })
        );
    }

    #[test]
    fn drawing_after_close_is_noop_and_draw_returns_false() {
        let (coord, mut g) = graphics();
        g.point(1.0, 1.0, Color::WHITE);
        coord.request_close();

        g.line(0.0, 0.0, 1.0, 1.0, Color::WHITE);
        g.pie(0.0, 0.0, 10.0, 10.0, 0.0, 1.0, Color::WHITE, Color::RED);
        g.music("theme.ogg");
        assert_eq!(g.scene.len(), 1);
        assert!(g.is_closed());

        let started = Instant::now();
        assert!(!g.draw(1000));
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(g.scene.len(), 1);
        assert!(coord.drain_audio().is_empty());
    }

    #[test]
    fn draw_keeps_recorded_primitives_until_clear() {
        let coord = Arc::new(FrameCoordinator::new(640, 480));
        let config = GraphicsConfig::default().with_min_frame_time(Duration::ZERO);
        let mut g = Graphics::new(Arc::clone(&coord), &config);
        let host = std::thread::spawn(move || {
            let mut lengths = Vec::new();
            while lengths.len() < 3 {
                if let Some(frame) = coord.wait_frame(Duration::from_millis(20)) {
                    lengths.push(frame.scene.len());
                    coord.recycle(frame.scene);
                }
            }
            lengths
        });

        g.ellipse(10.0, 10.0, 5.0, 5.0, Color::WHITE, Color::TRANSPARENT);
        assert!(g.draw(0));
        g.point(1.0, 1.0, Color::RED);
        assert!(g.draw(0));
        g.clear();
        g.point(2.0, 2.0, Color::RED);
        assert!(g.draw(0));

        assert_eq!(host.join().unwrap(), vec![1, 2, 1]);
    }

    #[test]
    fn invalid_assets_are_skipped() {
        let (coord, mut g) = graphics();
        g.image(0.0, 0.0, &Image::default());
        g.play(&Sound::default());
        assert!(g.scene.is_empty());
        assert!(coord.drain_audio().is_empty());
    }

    #[test]
    fn key_queries_follow_coordinator_state() {
        let (coord, g) = graphics();
        coord.push_input(&InputEvent::Key {
            key: Key::Q,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        });
        assert!(g.is_key_pressed(Key::Q));
        assert!(g.is_char_pressed('q'));
        assert!(!g.was_key_pressed(Key::Q));
        assert!(!g.is_key_pressed(Key::Unknown(3)));
    }

    #[test]
    fn random_int_is_inclusive_and_order_insensitive() {
        let (_, mut g) = graphics();
        let mut seen = [false; 3];
        for _ in 0..200 {
            let v = g.random_int(3, 1);
            assert!((1..=3).contains(&v));
            seen[(v - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(g.random_int(7, 7), 7);
    }

    #[test]
    fn random_double_stays_in_range() {
        let (_, mut g) = graphics();
        for _ in 0..100 {
            let v = g.random_double(-1.0, 1.0);
            assert!((-1.0..1.0).contains(&v));
        }
        assert_eq!(g.random_double(2.5, 2.5), 2.5);
        assert!(g.random_double(f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn size_reads_coordinator() {
        let (coord, g) = graphics();
        assert_eq!((g.width(), g.height()), (640, 480));
        coord.set_size(800, 600);
        assert_eq!((g.width(), g.height()), (800, 600));
    }
}
