//! Input subsystem.
//!
//! The public API is platform-agnostic. `platform::winit` translates window
//! events into `InputEvent`s; the runtime applies them to `InputState` and
//! records per-frame deltas in `InputFrame`.

mod frame;
mod state;
mod types;

pub mod platform;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    InputEvent, MouseButton, MouseButtonState, MouseWheelDelta, PointerButtonEvent,
    PointerMoveEvent, TouchPhase,
};
