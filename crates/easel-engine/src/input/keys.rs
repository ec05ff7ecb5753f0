/// Number of key codes tracked by [`KeyTable`].
pub const KEY_TABLE_SIZE: usize = 256;

/// Current and previous press state per key code.
///
/// Each key event for a code copies the current state into the previous slot
/// and then records the new one, so `was_pressed` answers "what was this key
/// before its most recent event". Codes outside the table are ignored.
#[derive(Clone)]
pub struct KeyTable {
    pressed: [bool; KEY_TABLE_SIZE],
    was_pressed: [bool; KEY_TABLE_SIZE],
}

impl KeyTable {
    pub fn new() -> Self {
        Self {
            pressed: [false; KEY_TABLE_SIZE],
            was_pressed: [false; KEY_TABLE_SIZE],
        }
    }

    /// Records a press or release. Returns `false` if `code` is out of range.
    pub fn set(&mut self, code: u16, down: bool) -> bool {
        let i = code as usize;
        if i >= KEY_TABLE_SIZE {
            return false;
        }
        self.was_pressed[i] = self.pressed[i];
        self.pressed[i] = down;
        true
    }

    pub fn is_pressed(&self, code: u16) -> bool {
        self.pressed.get(code as usize).copied().unwrap_or(false)
    }

    pub fn was_pressed(&self, code: u16) -> bool {
        self.was_pressed.get(code as usize).copied().unwrap_or(false)
    }

    /// Codes currently held, ascending.
    pub fn held(&self) -> impl Iterator<Item = u16> + '_ {
        self.pressed
            .iter()
            .enumerate()
            .filter(|(_, down)| **down)
            .map(|(i, _)| i as u16)
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyTable")
            .field("held", &self.held().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflects_most_recent_event_per_code() {
        let mut t = KeyTable::new();
        t.set(65, true);
        t.set(66, true);
        t.set(65, false);
        assert!(!t.is_pressed(65));
        assert!(t.is_pressed(66));
        assert!(t.was_pressed(65));
        assert!(!t.was_pressed(66));
    }

    #[test]
    fn out_of_range_codes_are_ignored() {
        let mut t = KeyTable::new();
        assert!(!t.set(300, true));
        assert!(!t.is_pressed(300));
        assert_eq!(t.held().count(), 0);
    }
}
