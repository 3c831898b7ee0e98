//! GPU rendering.
//!
//! Renderers consume `scene` draw streams and own their GPU resources
//! (pipelines, buffers, textures), created lazily on first use.

mod common;
mod ctx;
pub mod reveal;

pub use ctx::{RenderCtx, RenderTarget};
pub use reveal::RevealRenderer;
