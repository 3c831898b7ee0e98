//! Layout collaborators of the tiles: element rectangles, the mobile flag and
//! the page background.

use std::cell::Cell;

use veil_engine::coords::{Rect, Vec2, Viewport};
use veil_engine::paint::Color;

use crate::config::SlideshowConfig;

// ── Contracts ─────────────────────────────────────────────────────────────

/// The laid-out element a tile mirrors.
pub trait TileElement {
    /// On-screen rectangle in logical pixels, top-left origin.
    fn bounding_rect(&self) -> Rect;

    /// Called once when the tile's textures are ready.
    fn mark_loaded(&mut self);
}

/// Page-level styling a tile can touch.
pub trait PageStyle {
    /// Selects background colour `slot` (`1..=5`).
    fn set_background_slot(&mut self, slot: u8);
}

// ── LayoutMode ────────────────────────────────────────────────────────────

/// Shared mobile/touch flag.
///
/// Mobile when touch mode is forced, when the viewport is narrower than the
/// breakpoint, or once any touch input has been seen.
#[derive(Debug)]
pub struct LayoutMode {
    forced_touch: bool,
    breakpoint: f32,
    narrow: Cell<bool>,
    touched: Cell<bool>,
}

impl LayoutMode {
    pub fn new(breakpoint: f32, forced_touch: bool) -> Self {
        Self {
            forced_touch,
            breakpoint,
            narrow: Cell::new(false),
            touched: Cell::new(false),
        }
    }

    pub fn from_config(config: &SlideshowConfig) -> Self {
        Self::new(config.mobile_breakpoint, config.touch_mode)
    }

    pub fn is_mobile(&self) -> bool {
        self.forced_touch || self.narrow.get() || self.touched.get()
    }

    pub fn update_viewport(&self, viewport: Viewport) {
        let narrow = viewport.width < self.breakpoint;
        if narrow != self.narrow.get() {
            log::debug!("layout is now {}", if narrow { "narrow" } else { "wide" });
            self.narrow.set(narrow);
        }
    }

    pub fn note_touch(&self) {
        if !self.touched.replace(true) {
            log::info!("touch input detected, switching to mobile layout");
        }
    }
}

// ── Gallery ───────────────────────────────────────────────────────────────

/// One element of the gallery strip.
#[derive(Debug, Clone, Default)]
pub struct GalleryItem {
    rect: Rect,
    loaded: bool,
}

impl GalleryItem {
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

impl TileElement for GalleryItem {
    fn bounding_rect(&self) -> Rect {
        self.rect
    }

    fn mark_loaded(&mut self) {
        self.loaded = true;
    }
}

/// Horizontally scrolling strip of equally sized items.
///
/// At scroll 0 the first item is centered in the viewport; scrolling by one
/// stride centers the next one.
#[derive(Debug, Clone)]
pub struct Gallery {
    items: Vec<GalleryItem>,
    viewport: Viewport,
    scroll: f32,
    scroll_target: f32,

    height_fraction: f32,
    aspect: f32,
    gap: f32,
    smoothing: f32,
}

impl Gallery {
    pub fn new(count: usize, config: &SlideshowConfig, viewport: Viewport) -> Self {
        let mut gallery = Self {
            items: vec![GalleryItem::default(); count],
            viewport,
            scroll: 0.0,
            scroll_target: 0.0,
            height_fraction: config.tile_height.clamp(0.05, 1.0),
            aspect: config.tile_aspect.max(0.05),
            gap: config.tile_gap.max(0.0),
            smoothing: config.scroll_smoothing.max(0.0),
        };
        gallery.layout();
        gallery
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&GalleryItem> {
        self.items.get(index)
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut GalleryItem> {
        self.items.get_mut(index)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    pub fn scroll_target(&self) -> f32 {
        self.scroll_target
    }

    /// Size of every item for the current viewport.
    pub fn item_size(&self) -> Vec2 {
        let h = self.viewport.height * self.height_fraction;
        Vec2::new(h * self.aspect, h)
    }

    fn stride(&self) -> f32 {
        self.item_size().x + self.gap
    }

    fn max_scroll(&self) -> f32 {
        self.items.len().saturating_sub(1) as f32 * self.stride()
    }

    /// Re-lays out for a new viewport, keeping the same item in view.
    pub fn resize(&mut self, viewport: Viewport) {
        let old_stride = self.stride();
        self.viewport = viewport;
        let new_stride = self.stride();

        if old_stride > 0.0 {
            let k = new_stride / old_stride;
            self.scroll *= k;
            self.scroll_target *= k;
        }
        self.clamp_scroll();
        self.layout();
    }

    /// Moves the scroll target; the strip follows smoothly in `update`.
    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_target += delta;
        self.clamp_scroll();
    }

    /// Advances scroll smoothing by `dt` seconds. Returns whether items moved.
    pub fn update(&mut self, dt: f32) -> bool {
        let diff = self.scroll_target - self.scroll;
        if diff == 0.0 {
            return false;
        }

        if self.smoothing <= 0.0 || diff.abs() < 0.01 {
            self.scroll = self.scroll_target;
        } else {
            self.scroll += diff * (1.0 - (-dt.max(0.0) / self.smoothing).exp());
        }

        self.layout();
        true
    }

    /// Index of the item under `p`.
    pub fn hit_test(&self, p: Vec2) -> Option<usize> {
        self.items.iter().position(|item| item.rect.contains(p))
    }

    fn clamp_scroll(&mut self) {
        let max = self.max_scroll();
        self.scroll_target = self.scroll_target.clamp(0.0, max);
        self.scroll = self.scroll.clamp(0.0, max);
    }

    fn layout(&mut self) {
        let size = self.item_size();
        let stride = self.stride();
        let x0 = (self.viewport.width - size.x) / 2.0 - self.scroll;
        let y = (self.viewport.height - size.y) / 2.0;

        for (i, item) in self.items.iter_mut().enumerate() {
            item.rect = Rect::new(x0 + i as f32 * stride, y, size.x, size.y);
        }
    }
}

// ── Backdrop ──────────────────────────────────────────────────────────────

/// Page background: a palette slot selected by tiles, faded toward on
/// every frame.
#[derive(Debug, Clone)]
pub struct Backdrop {
    palette: [Color; 5],
    slot: u8,
    current: Color,
    fade: f32,
}

impl Backdrop {
    /// `fade` is the time constant of the colour transition, in seconds.
    pub fn new(palette: [Color; 5], fade: f32) -> Self {
        Self {
            palette,
            slot: 1,
            current: palette[0],
            fade: fade.max(0.0),
        }
    }

    pub fn slot(&self) -> u8 {
        self.slot
    }

    pub fn color(&self) -> Color {
        self.current
    }

    pub fn target(&self) -> Color {
        self.palette[self.slot as usize - 1]
    }

    pub fn update(&mut self, dt: f32) {
        let target = self.target();
        if self.fade <= 0.0 {
            self.current = target;
        } else {
            self.current = self.current.lerp(target, 1.0 - (-dt.max(0.0) / self.fade).exp());
        }
    }
}

impl PageStyle for Backdrop {
    fn set_background_slot(&mut self, slot: u8) {
        let slot = slot.clamp(1, 5);
        if slot != self.slot {
            log::debug!("background slot {} -> {}", self.slot, slot);
            self.slot = slot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery(n: usize, viewport: Viewport) -> Gallery {
        let config = SlideshowConfig {
            tile_height: 0.5,
            tile_aspect: 1.0,
            tile_gap: 100.0,
            scroll_smoothing: 0.0,
            ..SlideshowConfig::default()
        };
        Gallery::new(n, &config, viewport)
    }

    #[test]
    fn first_item_starts_centered() {
        let g = gallery(3, Viewport::new(1920.0, 1080.0));
        let first = g.item(0).map(|i| i.rect()).unwrap_or_default();
        assert_eq!(first, Rect::new(690.0, 270.0, 540.0, 540.0));
        assert_eq!(first.center(), Vec2::new(960.0, 540.0));

        let second = g.item(1).map(|i| i.rect()).unwrap_or_default();
        assert_eq!(second.left(), 690.0 + 640.0);
    }

    #[test]
    fn scroll_is_clamped_to_the_strip() {
        let mut g = gallery(3, Viewport::new(1920.0, 1080.0));
        g.scroll_by(-50.0);
        assert_eq!(g.scroll_target(), 0.0);
        g.scroll_by(10_000.0);
        assert_eq!(g.scroll_target(), 2.0 * 640.0);
        assert!(g.update(0.016));
        assert_eq!(g.item(2).map(|i| i.rect().center().x), Some(960.0));
    }

    #[test]
    fn smoothing_approaches_target() {
        let config = SlideshowConfig {
            scroll_smoothing: 0.1,
            ..SlideshowConfig::default()
        };
        let mut g = Gallery::new(4, &config, Viewport::new(1280.0, 720.0));
        g.scroll_by(300.0);
        g.update(0.05);
        assert!(g.scroll() > 0.0 && g.scroll() < 300.0);
        for _ in 0..200 {
            g.update(0.05);
        }
        assert_eq!(g.scroll(), 300.0);
        assert!(!g.update(0.05));
    }

    #[test]
    fn resize_keeps_item_in_view() {
        let mut g = gallery(3, Viewport::new(1920.0, 1080.0));
        g.scroll_by(640.0);
        g.update(0.0);
        g.resize(Viewport::new(1280.0, 720.0));
        let center = g.item(1).map(|i| i.rect().center()).unwrap_or_default();
        assert!((center.x - 640.0).abs() < 1e-3);
        assert!((center.y - 360.0).abs() < 1e-3);
    }

    #[test]
    fn hit_test_finds_items() {
        let g = gallery(2, Viewport::new(1920.0, 1080.0));
        assert_eq!(g.hit_test(Vec2::new(960.0, 540.0)), Some(0));
        assert_eq!(g.hit_test(Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn layout_mode_flags() {
        let mode = LayoutMode::new(768.0, false);
        mode.update_viewport(Viewport::new(1024.0, 768.0));
        assert!(!mode.is_mobile());
        mode.update_viewport(Viewport::new(600.0, 800.0));
        assert!(mode.is_mobile());
        mode.update_viewport(Viewport::new(1024.0, 768.0));
        assert!(!mode.is_mobile());
        mode.note_touch();
        assert!(mode.is_mobile());

        assert!(LayoutMode::new(768.0, true).is_mobile());
    }

    #[test]
    fn backdrop_clamps_slots_and_fades() {
        let config = SlideshowConfig::default();
        let mut b = Backdrop::new(config.palette, 0.2);
        b.set_background_slot(9);
        assert_eq!(b.slot(), 5);
        b.set_background_slot(0);
        assert_eq!(b.slot(), 1);

        b.set_background_slot(3);
        b.update(0.05);
        assert_ne!(b.color(), b.target());
        for _ in 0..100 {
            b.update(0.05);
        }
        assert!((b.color().r - b.target().r).abs() < 1e-4);
    }
}
