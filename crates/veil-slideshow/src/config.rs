use std::path::PathBuf;
use std::time::Duration;

use veil_engine::paint::Color;

/// Image sources for one tile, in texture-slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSources {
    /// Primary image (`u_map`).
    pub image: PathBuf,
    /// Image revealed under the pointer (`u_hovermap`).
    pub hover: PathBuf,
    /// Reveal mask (`u_shape`).
    pub mask: PathBuf,
}

impl TileSources {
    pub fn new(image: impl Into<PathBuf>, hover: impl Into<PathBuf>, mask: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            hover: hover.into(),
            mask: mask.into(),
        }
    }

    /// `[image, hover, mask]`.
    pub fn to_vec(&self) -> Vec<PathBuf> {
        vec![self.image.clone(), self.hover.clone(), self.mask.clone()]
    }
}

/// Tuning for tiles, layout and page style.
///
/// Durations are in seconds.
#[derive(Debug, Clone)]
pub struct SlideshowConfig {
    /// Hover progress transition, both directions.
    pub hover_duration: f32,
    /// Subtracted from both mesh dimensions when tracking layout.
    pub scale_inset: f32,
    /// Smoothing of mesh scale toward the element size.
    pub scale_duration: f32,
    /// Smoothing of `u_mouse` toward the cursor.
    pub mouse_duration: f32,

    /// Mask used by tiles that do not name their own.
    pub mask: PathBuf,

    /// Viewports narrower than this are treated as mobile.
    pub mobile_breakpoint: f32,
    /// Force mobile (touch) mode regardless of viewport width.
    pub touch_mode: bool,

    /// Give up on a tile's textures after this long. `None` waits forever.
    pub load_timeout: Option<Duration>,

    /// Page background per slot `1..=5`.
    pub palette: [Color; 5],

    /// Tile height as a fraction of the viewport height.
    pub tile_height: f32,
    /// Tile width / height.
    pub tile_aspect: f32,
    /// Horizontal gap between tiles, in logical pixels.
    pub tile_gap: f32,
    /// Time constant of the gallery scroll smoothing.
    pub scroll_smoothing: f32,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            hover_duration: 0.8,
            scale_inset: 0.0,
            scale_duration: 0.3,
            mouse_duration: 0.5,
            mask: PathBuf::from("shape.png"),
            mobile_breakpoint: 768.0,
            touch_mode: false,
            load_timeout: None,
            palette: [
                Color::from_srgb_u8(0x1b, 0x1b, 0x1f, 0xff),
                Color::from_srgb_u8(0x2b, 0x2a, 0x33, 0xff),
                Color::from_srgb_u8(0x33, 0x30, 0x2a, 0xff),
                Color::from_srgb_u8(0x23, 0x30, 0x2d, 0xff),
                Color::from_srgb_u8(0x33, 0x24, 0x28, 0xff),
            ],
            tile_height: 0.6,
            tile_aspect: 0.75,
            tile_gap: 80.0,
            scroll_smoothing: 0.12,
        }
    }
}
