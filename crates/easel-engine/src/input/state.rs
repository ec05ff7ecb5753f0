use crate::coords::Vec2;

use super::keys::KeyTable;
use super::types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    PointerButtonEvent,
    PointerMoveEvent,
};

/// Current input state for a window.
///
/// Holds the key table, modifier state and pointer position. Events are
/// folded in through [`InputState::apply_event`].
#[derive(Debug, Default, Clone)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels; `None` once the pointer leaves.
    pub pointer_pos: Option<Vec2>,

    /// Press state per key code.
    pub keys: KeyTable,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some(Vec2::new(*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;
                if let Some(code) = key.code() {
                    self.keys.set(code, *state == KeyState::Pressed);
                }
            }

            InputEvent::PointerButton(PointerButtonEvent { x, y, modifiers, .. }) => {
                self.pointer_pos = Some(Vec2::new(*x, *y));
                self.modifiers = *modifiers;
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        key.code().is_some_and(|c| self.keys.is_pressed(c))
    }

    /// Release events for every held key, ascending by code.
    ///
    /// The platform sends no releases for keys let go while the window is
    /// unfocused; feeding these in on focus loss keeps keys from sticking.
    pub fn held_key_releases(&self) -> Vec<InputEvent> {
        self.keys
            .held()
            .filter_map(Key::from_code)
            .map(|key| InputEvent::Key {
                key,
                state: KeyState::Released,
                modifiers: self.modifiers,
                repeat: false,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), repeat: false }
    }

    #[test]
    fn key_events_update_table() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::Left, KeyState::Pressed));
        assert!(s.key_down(Key::Left));
        s.apply_event(&key(Key::Left, KeyState::Released));
        assert!(!s.key_down(Key::Left));
    }

    #[test]
    fn held_keys_produce_release_events() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::Space, KeyState::Pressed));
        s.apply_event(&key(Key::Left, KeyState::Pressed));
        s.apply_event(&InputEvent::Focused(false));
        assert!(s.key_down(Key::Space));

        let releases = s.held_key_releases();
        assert_eq!(releases, vec![key(Key::Left, KeyState::Released), key(Key::Space, KeyState::Released)]);
        for ev in &releases {
            s.apply_event(ev);
        }
        assert!(!s.key_down(Key::Space) && !s.key_down(Key::Left));
    }

    #[test]
    fn pointer_tracks_moves_and_leave() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 4.0, y: 9.0 }));
        assert_eq!(s.pointer_pos, Some(Vec2::new(4.0, 9.0)));
        s.apply_event(&InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, None);
    }
}
