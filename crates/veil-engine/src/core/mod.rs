//! Core engine-facing contracts.
//!
//! The interface between the runtime (platform loop) and the layer above it.
//! Runtime internals stay behind `FrameCtx`.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
pub(crate) use ctx::logical_viewport;
