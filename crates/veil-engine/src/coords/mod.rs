//! Coordinate and geometry types shared by the engine and the slideshow layer.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! World space used by the camera is centered on the viewport with +Y up; the
//! conversion lives next to the code that needs it (tile bounds tracking).

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
