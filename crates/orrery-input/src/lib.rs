//! Input surface for the orrery viewer: frame-coherent mouse tracking for the
//! orbit camera and a serializable hotkey-to-action map.

pub mod actions;
pub mod mouse;

pub use actions::{Action, KeyBinding, KeyMap};
pub use mouse::MouseState;
