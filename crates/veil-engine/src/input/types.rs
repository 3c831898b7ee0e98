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

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Scroll delta as reported by the platform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    /// Discrete wheel notches.
    Line { x: f32, y: f32 },
    /// Precise delta in logical pixels (touchpads).
    Pixel { x: f32, y: f32 },
}

impl MouseWheelDelta {
    /// Logical pixels scrolled per wheel notch.
    pub const LINE_HEIGHT: f32 = 48.0;

    /// Converts to a logical pixel delta.
    pub fn to_pixels(self) -> (f32, f32) {
        match self {
            MouseWheelDelta::Line { x, y } => (x * Self::LINE_HEIGHT, y * Self::LINE_HEIGHT),
            MouseWheelDelta::Pixel { x, y } => (x, y),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Pointer moved to a new logical position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

/// Pointer button press or release at the tracked pointer position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub x: f32,
    pub y: f32,
}

/// Platform-agnostic input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Focused(bool),
    PointerMoved(PointerMoveEvent),
    /// Pointer left the window.
    PointerLeft,
    PointerButton(PointerButtonEvent),
    MouseWheel { delta: MouseWheelDelta },
    /// A touch contact. Its presence is what tells the layout layer it is
    /// running on a touch device.
    Touch { phase: TouchPhase, x: f32, y: f32 },
}
