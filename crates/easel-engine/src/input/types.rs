use std::fmt;

/// Keyboard key identifier.
///
/// The runtime maps platform keycodes into these variants where possible.
/// Unsupported keys arrive as `Key::Unknown(u32)` carrying the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    // Common control keys
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    Left,
    Right,
    Up,
    Down,

    // Modifiers as keys
    Shift,
    Ctrl,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Function keys
    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

const CONTROL_KEYS: [Key; 19] = [
    Key::Escape, Key::Enter, Key::Tab, Key::Backspace, Key::Space,
    Key::Insert, Key::Delete, Key::Home, Key::End, Key::PageUp, Key::PageDown,
    Key::Left, Key::Right, Key::Up, Key::Down,
    Key::Shift, Key::Ctrl, Key::Alt, Key::Meta,
];

const LETTERS: [Key; 26] = [
    Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
    Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
    Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
];

const DIGITS: [Key; 10] = [
    Key::Digit0, Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4,
    Key::Digit5, Key::Digit6, Key::Digit7, Key::Digit8, Key::Digit9,
];

const FUNCTION_KEYS: [Key; 12] = [
    Key::F1, Key::F2, Key::F3, Key::F4, Key::F5, Key::F6,
    Key::F7, Key::F8, Key::F9, Key::F10, Key::F11, Key::F12,
];

impl Key {
    /// Key-table code for this key.
    ///
    /// Printable keys use their uppercase ASCII code so `'a'` and `Key::A`
    /// address the same slot. Arrows are 17..=20 and Shift/Ctrl/Alt are
    /// 29..=31. `Unknown` keys have no code and are not tracked.
    pub fn code(self) -> Option<u16> {
        let code = match self {
            Key::Backspace => 8,
            Key::Tab => 9,
            Key::Enter => 13,
            Key::Escape => 27,
            Key::Space => 32,
            Key::Delete => 127,

            Key::Left => 17,
            Key::Right => 18,
            Key::Up => 19,
            Key::Down => 20,
            Key::Insert => 21,
            Key::Home => 22,
            Key::End => 23,
            Key::PageUp => 24,
            Key::PageDown => 25,
            Key::Meta => 28,
            Key::Shift => 29,
            Key::Ctrl => 30,
            Key::Alt => 31,

            Key::Unknown(_) => return None,

            other => {
                if let Some(i) = LETTERS.iter().position(|k| *k == other) {
                    b'A' as u16 + i as u16
                } else if let Some(i) = DIGITS.iter().position(|k| *k == other) {
                    b'0' as u16 + i as u16
                } else if let Some(i) = FUNCTION_KEYS.iter().position(|k| *k == other) {
                    112 + i as u16
                } else {
                    return None;
                }
            }
        };
        Some(code)
    }

    /// Key-table code for a character, matching [`Key::code`] for letters,
    /// digits and the space/enter/tab controls.
    pub fn char_code(c: char) -> Option<u16> {
        if c.is_ascii() {
            Some(c.to_ascii_uppercase() as u16)
        } else {
            None
        }
    }

    /// Key whose [`Key::code`] is `code`, if any.
    pub fn from_code(code: u16) -> Option<Key> {
        CONTROL_KEYS
            .iter()
            .chain(&LETTERS)
            .chain(&DIGITS)
            .chain(&FUNCTION_KEYS)
            .copied()
            .find(|k| k.code() == Some(code))
    }

    /// Letter key for an ASCII letter (either case).
    pub fn from_letter(c: char) -> Option<Key> {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Some(LETTERS[(upper as u8 - b'A') as usize])
        } else {
            None
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl MouseButton {
    /// Button number: 1 left, 2 right, 3 middle, 4 back, 5 forward.
    pub fn number(self) -> u32 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Right => 2,
            MouseButton::Middle => 3,
            MouseButton::Back => 4,
            MouseButton::Forward => 5,
            MouseButton::Other(v) => v as u32,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Modifier keys state.
///
/// Stored as booleans rather than bitflags to keep it explicit and stable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }

    /// Packed flags: shift = 1, alt = 2, ctrl = 4, meta = 8.
    pub fn bits(&self) -> u8 {
        (self.shift as u8) | (self.alt as u8) << 1 | (self.ctrl as u8) << 2 | (self.meta as u8) << 3
    }
}

/// Pointer move event in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

/// Pointer button event.
///
/// Coordinates are included so a consumer does not need a separate
/// "current pointer position" to interpret the click.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub x: f32,
    pub y: f32,
    pub modifiers: Modifiers,
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    PointerMoved(PointerMoveEvent),
    PointerButton(PointerButtonEvent),

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_modifiers_use_fixed_codes() {
        assert_eq!(Key::Left.code(), Some(17));
        assert_eq!(Key::Down.code(), Some(20));
        assert_eq!(Key::Shift.code(), Some(29));
        assert_eq!(Key::Alt.code(), Some(31));
    }

    #[test]
    fn letters_share_slot_with_chars() {
        assert_eq!(Key::A.code(), Key::char_code('a'));
        assert_eq!(Key::Z.code(), Key::char_code('Z'));
        assert_eq!(Key::Digit7.code(), Key::char_code('7'));
        assert_eq!(Key::Space.code(), Key::char_code(' '));
    }

    #[test]
    fn unknown_keys_have_no_code() {
        assert_eq!(Key::Unknown(4242).code(), None);
        assert_eq!(Key::from_code(17), Some(Key::Left));
        assert_eq!(Key::from_code(b'Q' as u16), Some(Key::Q));
        assert_eq!(Key::from_code(200), None);
        assert_eq!(Key::char_code('é'), None);
    }

    #[test]
    fn from_letter_round_trips() {
        assert_eq!(Key::from_letter('q'), Some(Key::Q));
        assert_eq!(Key::from_letter('1'), None);
    }

    #[test]
    fn modifier_bits() {
        let m = Modifiers { shift: true, ctrl: true, ..Default::default() };
        assert_eq!(m.bits(), 0b101);
        assert!(m.any());
    }
}
