//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code translates platform events into `InputEvent`s
//! (see `platform::winit`).

mod keys;
mod state;
mod types;

pub(crate) mod platform;

pub use keys::{KeyTable, KEY_TABLE_SIZE};
pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
};
