//! Frame-coherent mouse state tracker.
//!
//! [`MouseState`] accumulates winit mouse events during a frame and exposes a
//! query API for drag deltas, button state, the scroll wheel, and the shift
//! modifier that turns a drag into a pan.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Per-button press/release tracking for a single frame.
#[derive(Debug, Clone, Copy, Default)]
struct ButtonFrame {
    pressed: bool,
    just_pressed: bool,
    just_released: bool,
}

/// Maps a [`MouseButton`] to an index 0..4.
fn button_index(button: MouseButton) -> usize {
    match button {
        MouseButton::Left => 0,
        MouseButton::Right => 1,
        MouseButton::Middle => 2,
        _ => 3,
    }
}

/// Frame-coherent mouse state.
///
/// # Usage
///
/// 1. Forward winit events via the `on_*` methods during event collection.
/// 2. Query state with the public accessors.
/// 3. Call [`clear_transients`](Self::clear_transients) at end of frame.
#[derive(Debug, Clone)]
pub struct MouseState {
    position: Vec2,
    delta: Vec2,
    buttons: [ButtonFrame; 4],
    scroll: f32,
    shift_held: bool,
}

impl Default for MouseState {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            delta: Vec2::ZERO,
            buttons: [ButtonFrame::default(); 4],
            scroll: 0.0,
            shift_held: false,
        }
    }

    // ── Event handlers ──────────────────────────────────────────────

    /// Process a `CursorMoved` event.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        self.delta += new_pos - self.position;
        self.position = new_pos;
    }

    /// Process a `MouseInput` event.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        let idx = button_index(button);
        match state {
            ElementState::Pressed => {
                self.buttons[idx].pressed = true;
                self.buttons[idx].just_pressed = true;
            }
            ElementState::Released => {
                self.buttons[idx].pressed = false;
                self.buttons[idx].just_released = true;
            }
        }
    }

    /// Process a `MouseWheel` event.
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        match delta {
            MouseScrollDelta::LineDelta(_x, y) => {
                // One line ≈ 40 pixels of wheel travel.
                self.scroll += y * 40.0;
            }
            MouseScrollDelta::PixelDelta(pos) => {
                self.scroll += pos.y as f32;
            }
        }
    }

    /// Track the shift modifier from `ModifiersChanged` events.
    pub fn on_modifiers(&mut self, shift_held: bool) {
        self.shift_held = shift_held;
    }

    /// Clears per-frame transients: delta, scroll, just_pressed, just_released.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll = 0.0;
        for b in &mut self.buttons {
            b.just_pressed = false;
            b.just_released = false;
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Current cursor position in window-logical coordinates.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Movement delta accumulated since the last frame clear.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Whether a mouse button is currently held.
    #[must_use]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button_index(button)].pressed
    }

    /// Whether a mouse button was pressed this frame.
    #[must_use]
    pub fn just_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button_index(button)].just_pressed
    }

    /// Whether a mouse button was released this frame.
    #[must_use]
    pub fn just_button_released(&self, button: MouseButton) -> bool {
        self.buttons[button_index(button)].just_released
    }

    /// This frame's drag delta, or `None` when neither drag button is down.
    ///
    /// Left and middle both drag. The boolean is true when the drag should
    /// pan instead of orbit.
    #[must_use]
    pub fn drag(&self) -> Option<(Vec2, bool)> {
        if self.is_button_pressed(MouseButton::Left)
            || self.is_button_pressed(MouseButton::Middle)
        {
            Some((self.delta, self.shift_held))
        } else {
            None
        }
    }

    /// Scroll wheel travel accumulated this frame, in pixels
    /// (positive = scroll up).
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Whether shift is currently held.
    #[must_use]
    pub fn is_shift_held(&self) -> bool {
        self.shift_held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_updates_on_move() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(100.0, 200.0);
        assert_eq!(ms.position(), Vec2::new(100.0, 200.0));
    }

    #[test]
    fn test_delta_is_difference_between_frames() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(100.0, 200.0);
        ms.clear_transients();
        ms.on_cursor_moved(110.0, 195.0);
        let d = ms.delta();
        assert!((d.x - 10.0).abs() < f32::EPSILON);
        assert!((d.y - (-5.0)).abs() < f32::EPSILON);
    }

    #[test]
    fn test_button_press_and_release_tracked() {
        let mut ms = MouseState::new();
        ms.on_button(MouseButton::Left, ElementState::Pressed);
        assert!(ms.is_button_pressed(MouseButton::Left));
        assert!(ms.just_button_pressed(MouseButton::Left));

        ms.on_button(MouseButton::Left, ElementState::Released);
        assert!(!ms.is_button_pressed(MouseButton::Left));
        assert!(ms.just_button_released(MouseButton::Left));
    }

    #[test]
    fn test_drag_requires_a_drag_button() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(10.0, 0.0);
        assert!(ms.drag().is_none());

        ms.on_button(MouseButton::Left, ElementState::Pressed);
        ms.clear_transients();
        ms.on_cursor_moved(14.0, 3.0);
        let (d, pan) = ms.drag().unwrap();
        assert_eq!(d, Vec2::new(4.0, 3.0));
        assert!(!pan);
    }

    #[test]
    fn test_middle_button_drag_orbits_like_left() {
        let mut ms = MouseState::new();
        ms.on_button(MouseButton::Middle, ElementState::Pressed);
        ms.clear_transients();
        ms.on_cursor_moved(100.0, 0.0);
        let (d, pan) = ms.drag().unwrap();
        assert_eq!(d, Vec2::new(100.0, 0.0));
        assert!(!pan);
    }

    #[test]
    fn test_right_button_does_not_drag() {
        let mut ms = MouseState::new();
        ms.on_button(MouseButton::Right, ElementState::Pressed);
        ms.on_cursor_moved(5.0, 5.0);
        assert!(ms.drag().is_none());
    }

    #[test]
    fn test_shift_drag_is_a_pan() {
        let mut ms = MouseState::new();
        ms.on_modifiers(true);
        ms.on_button(MouseButton::Left, ElementState::Pressed);
        ms.on_cursor_moved(5.0, 5.0);
        let (_, pan) = ms.drag().unwrap();
        assert!(pan);
    }

    #[test]
    fn test_scroll_accumulates_within_frame() {
        let mut ms = MouseState::new();
        ms.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        ms.on_scroll(MouseScrollDelta::PixelDelta((0.0, 20.0).into()));
        assert!((ms.scroll() - 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_transients_reset_after_clear() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(50.0, 50.0);
        ms.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        ms.clear_transients();
        assert_eq!(ms.delta(), Vec2::ZERO);
        assert!(ms.scroll().abs() < f32::EPSILON);
    }
}
