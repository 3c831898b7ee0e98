//! Texture loading for tiles.
//!
//! A [`TextureSet`] requests every source of a tile through an
//! [`ImageLoader`] and reports a single completion once all of them arrived.
//! Loaders may complete from any thread; results travel over a channel that
//! the owning tile drains on the frame thread.

mod error;
mod loader;
mod set;

pub use error::LoadError;
pub use loader::{decode_bytes, decode_bytes_within, decode_file, ImageLoader, LoadResult, LoadTicket, ThreadedImageLoader};
pub use set::{LoadedImage, TextureSet};

#[cfg(test)]
pub(crate) use loader::ManualLoader;
