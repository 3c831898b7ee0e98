use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Why a tile's textures did not become available.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("failed to read {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("failed to decode {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    #[error("textures not loaded after {0:?}")]
    TimedOut(Duration),

    #[error("image loader dropped {pending} outstanding request(s)")]
    Disconnected { pending: usize },
}
