//! Frame timing.
//!
//! One `FrameClock` per window; call `tick()` once per presented frame. Tiles
//! consume the resulting `FrameTime` to advance animations and the `u_time`
//! uniform.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
