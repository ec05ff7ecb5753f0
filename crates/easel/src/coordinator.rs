//! Frame handoff between the drawing thread and the host loop.
//!
//! One mutex guards everything both sides touch: the published frame, the
//! recycled scene buffers, the event queue, key/pointer state, window size,
//! queued audio and the lifecycle. One condition variable is notified on
//! every change the other side may be waiting for (frame published, frame
//! consumed, close requested, close finished).
//!
//! The lock is never held while user code or rendering runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use easel_engine::coords::Vec2;
use easel_engine::input::{InputEvent, InputState};
use easel_engine::paint::Color;
use easel_engine::scene::SceneBuffer;

use crate::audio::AudioCommand;
use crate::event::Event;

/// Scene buffers kept around for reuse. Two is enough for the swap.
const MAX_SPARE_BUFFERS: usize = 2;

/// Window lifecycle as seen by both threads.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Lifecycle {
    Running,
    /// Close was requested; the host is tearing down.
    ClosePending,
    /// The host loop has ended.
    Closed,
}

/// A finished scene handed from the drawing thread to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Publication counter, starting at 1.
    pub seq: u64,
    pub scene: SceneBuffer,
    pub background: Color,
}

/// What the drawing thread gets back from [`FrameCoordinator::submit_frame`].
#[derive(Debug)]
pub(crate) struct Submitted {
    /// `false` once close has been requested.
    pub open: bool,
    /// An empty buffer for the next published copy of the scene.
    pub buffer: SceneBuffer,
    pub pointer: Option<Vec2>,
}

struct Shared {
    lifecycle: Lifecycle,

    published: Option<Frame>,
    next_seq: u64,
    consumed_seq: u64,
    spare: Vec<SceneBuffer>,

    events: Vec<Event>,
    input: InputState,
    size: (u32, u32),
    audio: Vec<AudioCommand>,

    close_on_exit: bool,
    main_finished: bool,
}

/// Shared state between the drawing thread and the host loop.
pub struct FrameCoordinator {
    shared: Mutex<Shared>,
    changed: Condvar,
    /// Mirrors `lifecycle != Running` so drawing calls can check it lock-free.
    closing: AtomicBool,
    start: Instant,
}

impl FrameCoordinator {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            shared: Mutex::new(Shared {
                lifecycle: Lifecycle::Running,
                published: None,
                next_seq: 1,
                consumed_seq: 0,
                spare: Vec::with_capacity(MAX_SPARE_BUFFERS),
                events: Vec::new(),
                input: InputState::default(),
                size: (width, height),
                audio: Vec::new(),
                close_on_exit: false,
                main_finished: false,
            }),
            changed: Condvar::new(),
            closing: AtomicBool::new(false),
            start: Instant::now(),
        }
    }

    // The lock is never held across user code, so a poisoned mutex still
    // holds consistent state.
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, Shared>) -> MutexGuard<'a, Shared> {
        self.changed.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }

    fn wait_timeout<'a>(&self, guard: MutexGuard<'a, Shared>, timeout: Duration) -> MutexGuard<'a, Shared> {
        match self.changed.wait_timeout(guard, timeout) {
            Ok((guard, _)) => guard,
            Err(poisoned) => poisoned.into_inner().0,
        }
    }

    /// Milliseconds since the coordinator was created.
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    // ── lifecycle ──────────────────────────────────────────────────────────

    pub fn lifecycle(&self) -> Lifecycle {
        self.lock().lifecycle
    }

    /// True from the moment close is requested. Lock-free.
    #[inline]
    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::Acquire)
    }

    fn begin_close(&self, s: &mut Shared, why: &str) -> bool {
        if s.lifecycle != Lifecycle::Running {
            return false;
        }
        s.lifecycle = Lifecycle::ClosePending;
        self.closing.store(true, Ordering::Release);
        self.changed.notify_all();
        log::info!("close requested ({why})");
        true
    }

    /// Running → ClosePending. Returns `false` if close was already underway.
    pub fn request_close(&self) -> bool {
        let mut s = self.lock();
        self.begin_close(&mut s, "host")
    }

    /// Any state → Closed. Called once the host loop has ended.
    pub fn finish_close(&self) {
        let mut s = self.lock();
        if s.lifecycle == Lifecycle::Closed {
            return;
        }
        s.lifecycle = Lifecycle::Closed;
        self.closing.store(true, Ordering::Release);
        self.changed.notify_all();
        log::debug!("closed");
    }

    /// Blocks until the lifecycle reaches `Closed`.
    pub fn wait_until_closed(&self) {
        let mut s = self.lock();
        while s.lifecycle != Lifecycle::Closed {
            s = self.wait(s);
        }
    }

    pub fn set_close_on_exit(&self, close: bool) {
        self.lock().close_on_exit = close;
    }

    /// Records that the drawing callback returned. With close-on-exit set,
    /// this also requests close.
    pub fn main_finished(&self) {
        let mut s = self.lock();
        s.main_finished = true;
        if s.close_on_exit {
            self.begin_close(&mut s, "drawing callback returned");
        }
        self.changed.notify_all();
        log::debug!("drawing callback finished");
    }

    pub fn is_main_finished(&self) -> bool {
        self.lock().main_finished
    }

    // ── drawing side ───────────────────────────────────────────────────────

    /// Publishes `scene` and blocks until the host has taken it and
    /// `not_before` has passed.
    ///
    /// Returns without publishing or blocking once close has been requested.
    /// Close arriving during either wait ends the wait early.
    pub(crate) fn submit_frame(&self, mut scene: SceneBuffer, background: Color, not_before: Instant) -> Submitted {
        let mut s = self.lock();

        if s.lifecycle != Lifecycle::Running {
            scene.clear();
            return Submitted {
                open: false,
                buffer: scene,
                pointer: s.input.pointer_pos,
            };
        }

        let seq = s.next_seq;
        s.next_seq += 1;
        if let Some(stale) = s.published.replace(Frame { seq, scene, background }) {
            recycle_into(&mut s.spare, stale.scene);
        }
        log::trace!("frame {seq} published");
        self.changed.notify_all();

        while s.lifecycle == Lifecycle::Running && s.consumed_seq < seq {
            s = self.wait(s);
        }

        loop {
            if s.lifecycle != Lifecycle::Running {
                break;
            }
            let now = Instant::now();
            if now >= not_before {
                break;
            }
            s = self.wait_timeout(s, not_before - now);
        }

        let open = s.lifecycle == Lifecycle::Running;
        if !open && s.published.as_ref().is_some_and(|f| f.seq == seq) {
            // Close arrived before the host took this frame; it is never shown.
            if let Some(unshown) = s.published.take() {
                recycle_into(&mut s.spare, unshown.scene);
            }
        }

        let buffer = s.spare.pop().unwrap_or_default();
        Submitted {
            open,
            buffer,
            pointer: s.input.pointer_pos,
        }
    }

    /// Removes and returns the events queued since the previous call.
    pub fn take_events(&self) -> Vec<Event> {
        std::mem::take(&mut self.lock().events)
    }

    /// Current press state of a key-table code.
    pub fn key_down(&self, code: u16) -> bool {
        self.lock().input.keys.is_pressed(code)
    }

    /// Press state of a code before its most recent key event.
    pub fn key_was_down(&self, code: u16) -> bool {
        self.lock().input.keys.was_pressed(code)
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.lock().input.pointer_pos
    }

    pub fn queue_audio(&self, command: AudioCommand) {
        self.lock().audio.push(command);
    }

    // ── host side ──────────────────────────────────────────────────────────

    /// Waits at most `budget` for a published frame and takes it.
    ///
    /// Taking a frame marks it consumed and wakes the drawing thread. Returns
    /// `None` without waiting once close has been requested or the callback
    /// has returned with nothing pending.
    pub fn wait_frame(&self, budget: Duration) -> Option<Frame> {
        let deadline = Instant::now() + budget;
        let mut s = self.lock();

        while s.published.is_none() && s.lifecycle == Lifecycle::Running && !s.main_finished {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            s = self.wait_timeout(s, deadline - now);
        }
        if s.lifecycle != Lifecycle::Running {
            return None;
        }

        let frame = s.published.take()?;
        s.consumed_seq = frame.seq;
        self.changed.notify_all();
        log::trace!("frame {} consumed", frame.seq);
        Some(frame)
    }

    /// True while a published frame has not been taken.
    pub fn has_pending_frame(&self) -> bool {
        self.lock().published.is_some()
    }

    /// Returns a consumed scene buffer so its allocation can be reused.
    pub fn recycle(&self, scene: SceneBuffer) {
        recycle_into(&mut self.lock().spare, scene);
    }

    /// Folds an input event into key/pointer state and queues it for
    /// [`crate::Graphics::events`] when it is one of the reported kinds.
    ///
    /// Losing focus first releases every held key through queued
    /// [`crate::EventKind::KeyRelease`] events.
    pub fn push_input(&self, event: &InputEvent) {
        let time_ms = self.elapsed_ms();
        let mut s = self.lock();
        if let InputEvent::Focused(false) = event {
            for release in s.input.held_key_releases() {
                fold_input(&mut s, &release, time_ms);
            }
        }
        fold_input(&mut s, event, time_ms);
    }

    /// Records the drawable size in logical pixels.
    pub fn set_size(&self, width: u32, height: u32) {
        let mut s = self.lock();
        if s.size != (width, height) {
            log::debug!("drawable size {width}×{height}");
            s.size = (width, height);
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.lock().size
    }

    pub fn drain_audio(&self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.lock().audio)
    }
}

fn fold_input(s: &mut Shared, event: &InputEvent, time_ms: u64) {
    s.input.apply_event(event);
    if let Some(ev) = Event::from_input(event, s.input.pointer_pos, time_ms) {
        s.events.push(ev);
    }
}

fn recycle_into(spare: &mut Vec<SceneBuffer>, mut scene: SceneBuffer) {
    if spare.len() < MAX_SPARE_BUFFERS {
        scene.clear();
        spare.push(scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    use easel_engine::input::{Key, KeyState, Modifiers, PointerMoveEvent};

    use crate::event::EventKind;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), repeat: false }
    }

    fn one_point_scene() -> SceneBuffer {
        let mut scene = SceneBuffer::new();
        scene.push_point(Vec2::new(1.0, 2.0), Color::WHITE);
        scene
    }

    #[test]
    fn submit_after_close_returns_immediately() {
        let c = FrameCoordinator::new(100, 100);
        assert!(c.request_close());
        assert!(!c.request_close());

        let started = Instant::now();
        let out = c.submit_frame(one_point_scene(), Color::BLACK, started + Duration::from_secs(5));
        assert!(!out.open);
        assert!(out.buffer.is_empty());
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(!c.has_pending_frame());
    }

    #[test]
    fn host_receives_published_frame_and_releases_drawer() {
        let c = Arc::new(FrameCoordinator::new(100, 100));
        let drawer = {
            let c = Arc::clone(&c);
            thread::spawn(move || c.submit_frame(one_point_scene(), Color::RED, Instant::now()))
        };

        let frame = c.wait_frame(Duration::from_secs(5)).expect("frame published");
        assert_eq!(frame.seq, 1);
        assert_eq!(frame.scene, one_point_scene());
        assert_eq!(frame.background, Color::RED);
        c.recycle(frame.scene);

        let out = drawer.join().unwrap();
        assert!(out.open);
        assert!(out.buffer.is_empty());
    }

    #[test]
    fn close_wakes_blocked_drawer() {
        let c = Arc::new(FrameCoordinator::new(100, 100));
        let drawer = {
            let c = Arc::clone(&c);
            thread::spawn(move || c.submit_frame(one_point_scene(), Color::BLACK, Instant::now()))
        };

        // Wait until the frame is published, then close without consuming it.
        while !c.has_pending_frame() {
            thread::yield_now();
        }
        c.request_close();

        let out = drawer.join().unwrap();
        assert!(!out.open);
        assert!(c.is_closing());
        assert_eq!(c.lifecycle(), Lifecycle::ClosePending);
        assert!(!c.has_pending_frame());
        assert!(c.wait_frame(Duration::from_secs(5)).is_none());
    }

    #[test]
    fn wait_frame_times_out_without_publisher() {
        let c = FrameCoordinator::new(100, 100);
        let started = Instant::now();
        assert!(c.wait_frame(Duration::from_millis(20)).is_none());
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn events_are_drained_once_in_order() {
        let c = FrameCoordinator::new(100, 100);
        c.push_input(&InputEvent::PointerMoved(PointerMoveEvent { x: 5.0, y: 6.0 }));
        c.push_input(&key(Key::A, KeyState::Pressed));
        c.push_input(&InputEvent::Focused(true));
        c.push_input(&key(Key::A, KeyState::Released));

        let kinds: Vec<_> = c.take_events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [EventKind::MouseMove, EventKind::KeyPress, EventKind::KeyRelease]);
        assert!(c.take_events().is_empty());

        c.push_input(&key(Key::B, KeyState::Pressed));
        let again = c.take_events();
        assert_eq!(again.len(), 1);
        assert_eq!(again[0].arg, 'B' as i32);
        assert_eq!((again[0].x, again[0].y), (5, 6));
    }

    #[test]
    fn key_state_tracks_latest_event_per_code() {
        let c = FrameCoordinator::new(100, 100);
        c.push_input(&key(Key::Left, KeyState::Pressed));
        c.push_input(&key(Key::Z, KeyState::Pressed));
        c.push_input(&key(Key::Left, KeyState::Released));

        assert!(!c.key_down(17));
        assert!(c.key_was_down(17));
        assert!(c.key_down('Z' as u16));
        assert!(!c.key_was_down('Z' as u16));
    }

    #[test]
    fn focus_loss_queues_releases_for_held_keys() {
        let c = FrameCoordinator::new(100, 100);
        c.push_input(&key(Key::Up, KeyState::Pressed));
        c.push_input(&key(Key::Space, KeyState::Pressed));
        c.take_events();

        c.push_input(&InputEvent::Focused(false));
        let events = c.take_events();
        let released: Vec<_> = events.iter().map(|e| (e.kind, e.arg)).collect();
        assert_eq!(released, [(EventKind::KeyRelease, 19), (EventKind::KeyRelease, 32)]);
        assert!(!c.key_down(19) && !c.key_down(32));
        assert!(c.key_was_down(19));

        c.push_input(&InputEvent::Focused(false));
        assert!(c.take_events().is_empty());
    }

    #[test]
    fn close_on_exit_closes_when_callback_returns() {
        let c = FrameCoordinator::new(100, 100);
        c.set_close_on_exit(true);
        c.main_finished();
        assert!(c.is_main_finished());
        assert_eq!(c.lifecycle(), Lifecycle::ClosePending);

        let keep_open = FrameCoordinator::new(100, 100);
        keep_open.main_finished();
        assert_eq!(keep_open.lifecycle(), Lifecycle::Running);
    }

    #[test]
    fn wait_until_closed_returns_after_finish() {
        let c = Arc::new(FrameCoordinator::new(100, 100));
        let waiter = {
            let c = Arc::clone(&c);
            thread::spawn(move || c.wait_until_closed())
        };
        c.request_close();
        c.finish_close();
        waiter.join().unwrap();
        assert_eq!(c.lifecycle(), Lifecycle::Closed);
    }

    #[test]
    fn audio_queue_drains() {
        let c = FrameCoordinator::new(100, 100);
        c.queue_audio(AudioCommand::Music("a.ogg".into()));
        assert_eq!(c.drain_audio().len(), 1);
        assert!(c.drain_audio().is_empty());
    }

    #[test]
    fn spare_buffers_are_bounded() {
        let c = FrameCoordinator::new(100, 100);
        for _ in 0..5 {
            c.recycle(one_point_scene());
        }
        assert_eq!(c.lock().spare.len(), MAX_SPARE_BUFFERS);
        assert!(c.lock().spare.iter().all(SceneBuffer::is_empty));
    }
}
