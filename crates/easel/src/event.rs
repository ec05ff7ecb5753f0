use easel_engine::coords::Vec2;
use easel_engine::input::{InputEvent, Key, KeyState, Modifiers, MouseButtonState};

/// Kind of input occurrence reported by [`crate::Graphics::events`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    MousePress,
    MouseRelease,
    MouseMove,
    KeyPress,
    KeyRelease,
}

/// One timestamped input occurrence.
///
/// `arg` is the key-table code for key events (0 when the key has no code)
/// and the button number for mouse presses and releases (1 left, 2 right,
/// 3 middle). Mouse moves carry 0.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    /// Pointer position in logical pixels when the event arrived.
    pub x: i32,
    pub y: i32,
    pub mods: Modifiers,
    pub arg: i32,
    /// Key for key events.
    pub key: Option<Key>,
    /// Milliseconds since the coordinator started.
    pub time_ms: u64,
}

impl Event {
    /// Converts an engine input event. Events that are not one of the five
    /// reported kinds (focus, modifier-only changes, pointer leaving) map to
    /// `None`.
    pub(crate) fn from_input(ev: &InputEvent, pointer: Option<Vec2>, time_ms: u64) -> Option<Self> {
        let at = pointer.unwrap_or_default();
        let (x, y) = (at.x.round() as i32, at.y.round() as i32);

        let event = match ev {
            InputEvent::PointerMoved(m) => Event {
                kind: EventKind::MouseMove,
                x: m.x.round() as i32,
                y: m.y.round() as i32,
                mods: Modifiers::default(),
                arg: 0,
                key: None,
                time_ms,
            },

            InputEvent::PointerButton(b) => Event {
                kind: match b.state {
                    MouseButtonState::Pressed => EventKind::MousePress,
                    MouseButtonState::Released => EventKind::MouseRelease,
                },
                x: b.x.round() as i32,
                y: b.y.round() as i32,
                mods: b.modifiers,
                arg: b.button.number() as i32,
                key: None,
                time_ms,
            },

            InputEvent::Key { key, state, modifiers, .. } => Event {
                kind: match state {
                    KeyState::Pressed => EventKind::KeyPress,
                    KeyState::Released => EventKind::KeyRelease,
                },
                x,
                y,
                mods: *modifiers,
                arg: key.code().map_or(0, i32::from),
                key: Some(*key),
                time_ms,
            },

            InputEvent::ModifiersChanged(_) | InputEvent::PointerLeft | InputEvent::Focused(_) => {
                return None;
            }
        };
        Some(event)
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_engine::input::{MouseButton, PointerButtonEvent, PointerMoveEvent};

    #[test]
    fn key_event_carries_table_code_and_pointer() {
        let ev = InputEvent::Key {
            key: Key::Left,
            state: KeyState::Pressed,
            modifiers: Modifiers { shift: true, ..Default::default() },
            repeat: false,
        };
        let e = Event::from_input(&ev, Some(Vec2::new(3.4, 7.6)), 12).unwrap();
        assert_eq!(e.kind, EventKind::KeyPress);
        assert_eq!(e.arg, 17);
        assert_eq!((e.x, e.y), (3, 8));
        assert_eq!(e.mods.bits(), 1);
        assert_eq!(e.time_ms, 12);
    }

    #[test]
    fn untracked_key_still_reported() {
        let ev = InputEvent::Key {
            key: Key::Unknown(99),
            state: KeyState::Released,
            modifiers: Modifiers::default(),
            repeat: false,
        };
        let e = Event::from_input(&ev, None, 0).unwrap();
        assert_eq!(e.kind, EventKind::KeyRelease);
        assert_eq!(e.arg, 0);
        assert_eq!(e.key, Some(Key::Unknown(99)));
    }

    #[test]
    fn mouse_button_uses_its_own_position() {
        let ev = InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Right,
            state: MouseButtonState::Released,
            x: 40.0,
            y: 50.0,
            modifiers: Modifiers::default(),
        });
        let e = Event::from_input(&ev, Some(Vec2::new(1.0, 1.0)), 0).unwrap();
        assert_eq!(e.kind, EventKind::MouseRelease);
        assert_eq!(e.arg, 2);
        assert_eq!(e.pos(), Vec2::new(40.0, 50.0));
    }

    #[test]
    fn move_and_non_reported_events() {
        let mv = InputEvent::PointerMoved(PointerMoveEvent { x: 5.0, y: 6.0 });
        assert_eq!(Event::from_input(&mv, None, 0).map(|e| e.kind), Some(EventKind::MouseMove));
        assert!(Event::from_input(&InputEvent::Focused(false), None, 0).is_none());
        assert!(Event::from_input(&InputEvent::PointerLeft, None, 0).is_none());
    }
}
