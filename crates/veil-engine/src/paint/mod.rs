//! Colour model shared by the host and the GPU layer.

pub mod color;

pub use color::Color;
