//! Draw stream types.
//!
//! The slideshow layer records one `QuadDraw` per ready tile each frame; the
//! reveal renderer consumes the list. Nothing here touches the GPU.

mod list;
mod quad;

pub use list::QuadList;
pub use quad::{MeshId, QuadDraw, RevealParams, TextureData, MAX_TEXTURE_DIMENSION};
