use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{InputEvent, MouseButton};

/// Per-frame input deltas.
///
/// `InputState` holds what is currently true (held buttons, pointer position);
/// `InputFrame` holds what happened since the last frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    pub buttons_pressed: HashSet<MouseButton>,

    pub buttons_released: HashSet<MouseButton>,

    /// Accumulated wheel delta in logical pixels (positive y = wheel rolled away
    /// from the user).
    pub scroll_delta: Vec2,

    /// Whether any touch contact was reported this frame.
    pub touched: bool,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.scroll_delta = Vec2::ZERO;
        self.touched = false;
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }
}
