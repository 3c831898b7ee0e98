//! Veil engine crate.
//!
//! Platform and GPU runtime pieces for the slideshow layer: window loop,
//! device/surface management, input translation, frame timing, the
//! pixel-aligned camera and the reveal renderer.

pub mod camera;
pub mod coords;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;
