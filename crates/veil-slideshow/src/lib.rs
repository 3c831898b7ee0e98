//! Veil slideshow: images rendered as GPU quads that stay pixel-aligned with
//! their layout and reveal a second image under the pointer.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use veil_slideshow::Application;
//!
//! Application::new()
//!     .title("Gallery")
//!     .assets("assets")
//!     .tile("1.jpg", "1-hover.jpg")
//!     .run()?;
//! ```
//!
//! Lower layers are usable on their own: [`tile::Tile`] only needs a
//! [`gallery::TileElement`], an [`texture::ImageLoader`] and a frame time.

pub mod app;
pub mod bounds;
pub mod config;
pub mod gallery;
pub mod host;
pub mod texture;
pub mod tile;
pub mod tween;
pub mod uniforms;

pub use app::Application;
pub use config::{SlideshowConfig, TileSources};
pub use host::Slideshow;

/// Common imports for embedding the slideshow.
pub mod prelude {
    pub use crate::app::Application;
    pub use crate::bounds::{compute_bounds, BoundsTracker, TileBounds};
    pub use crate::config::{SlideshowConfig, TileSources};
    pub use crate::gallery::{Backdrop, Gallery, LayoutMode, PageStyle, TileElement};
    pub use crate::host::Slideshow;
    pub use crate::texture::{ImageLoader, LoadError, TextureSet, ThreadedImageLoader};
    pub use crate::tile::{Tile, TileState};

    pub use veil_engine::coords::{Rect, Vec2, Viewport};
    pub use veil_engine::paint::Color;
}
