use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Result};
use winit::dpi::LogicalSize;

use veil_engine::coords::Viewport;
use veil_engine::device::GpuInit;
use veil_engine::paint::Color;
use veil_engine::window::{Runtime, RuntimeConfig};

use crate::config::{SlideshowConfig, TileSources};
use crate::host::Slideshow;
use crate::texture::ThreadedImageLoader;

struct TileEntry {
    image: PathBuf,
    hover: PathBuf,
    mask: Option<PathBuf>,
}

/// Slideshow application builder.
///
/// Configure the window, the tiles and their tuning, then start the event
/// loop with [`run`](Application::run).
///
/// ```rust,ignore
/// Application::new()
///     .title("Gallery")
///     .assets("assets")
///     .tile("1.jpg", "1-hover.jpg")
///     .tile("2.jpg", "2-hover.jpg")
///     .run()?;
/// ```
pub struct Application {
    title: String,
    width: f64,
    height: f64,
    assets: PathBuf,
    config: SlideshowConfig,
    gpu: GpuInit,
    tiles: Vec<TileEntry>,
}

impl Application {
    pub fn new() -> Self {
        Self {
            title: "veil".to_string(),
            width: 1280.0,
            height: 720.0,
            assets: PathBuf::from("."),
            config: SlideshowConfig::default(),
            gpu: GpuInit::default(),
            tiles: Vec::new(),
        }
    }

    /// Set the window title.
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Directory relative image paths are resolved against.
    pub fn assets(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets = dir.into();
        self
    }

    /// Replace the whole tuning block.
    pub fn config(mut self, config: SlideshowConfig) -> Self {
        self.config = config;
        self
    }

    pub fn gpu(mut self, gpu: GpuInit) -> Self {
        self.gpu = gpu;
        self
    }

    /// Add a tile using the default mask.
    pub fn tile(mut self, image: impl Into<PathBuf>, hover: impl Into<PathBuf>) -> Self {
        self.tiles.push(TileEntry { image: image.into(), hover: hover.into(), mask: None });
        self
    }

    /// Add a tile with its own reveal mask.
    pub fn tile_with_mask(
        mut self,
        image: impl Into<PathBuf>,
        hover: impl Into<PathBuf>,
        mask: impl Into<PathBuf>,
    ) -> Self {
        self.tiles.push(TileEntry {
            image: image.into(),
            hover: hover.into(),
            mask: Some(mask.into()),
        });
        self
    }

    /// Default mask for tiles added with [`tile`](Application::tile).
    pub fn mask(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.mask = path.into();
        self
    }

    pub fn hover_duration(mut self, seconds: f32) -> Self {
        self.config.hover_duration = seconds;
        self
    }

    pub fn touch_mode(mut self, on: bool) -> Self {
        self.config.touch_mode = on;
        self
    }

    pub fn load_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.load_timeout = timeout;
        self
    }

    pub fn palette(mut self, palette: [Color; 5]) -> Self {
        self.config.palette = palette;
        self
    }

    /// Tile sources as they will be requested.
    pub fn sources(&self) -> Vec<TileSources> {
        self.tiles
            .iter()
            .map(|t| {
                let mask = t.mask.clone().unwrap_or_else(|| self.config.mask.clone());
                TileSources::new(t.image.clone(), t.hover.clone(), mask)
            })
            .collect()
    }

    /// Opens the window and runs until it is closed.
    pub fn run(self) -> Result<()> {
        ensure!(!self.tiles.is_empty(), "no tiles configured");

        let sources = self.sources();
        let loader = ThreadedImageLoader::new(self.assets).max_dimension(self.gpu.max_texture_dimension);
        let viewport = Viewport::new(self.width as f32, self.height as f32);
        let slideshow = Slideshow::new(self.config, &sources, &loader, viewport);

        let config = RuntimeConfig {
            title: self.title,
            initial_size: LogicalSize::new(self.width, self.height),
            ..RuntimeConfig::default()
        };
        Runtime::run(config, self.gpu, slideshow)
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_fall_back_to_the_default_mask() {
        let app = Application::new()
            .mask("veil.png")
            .tile("1.jpg", "1h.jpg")
            .tile_with_mask("2.jpg", "2h.jpg", "star.png");

        let sources = app.sources();
        assert_eq!(sources[0], TileSources::new("1.jpg", "1h.jpg", "veil.png"));
        assert_eq!(sources[1].mask, PathBuf::from("star.png"));
    }

    #[test]
    fn running_without_tiles_is_an_error() {
        let err = Application::new().run().unwrap_err();
        assert!(err.to_string().contains("no tiles"));
    }
}
