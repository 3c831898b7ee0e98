use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::coords::Vec2;

/// Process-unique identity of a mesh. The renderer caches GPU resources
/// (uniform buffer, textures, bind group) per id.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MeshId(u64);

impl MeshId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Largest texture side every wgpu device accepts with default limits.
pub const MAX_TEXTURE_DIMENSION: u32 = 8192;

/// Decoded RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        debug_assert_eq!(rgba.len(), (width * height * 4) as usize);
        Self { width, height, rgba }
    }

    /// Single-colour texture, mostly useful for tests and placeholders.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let rgba = rgba
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self { width, height, rgba }
    }

    /// True when both sides are non-zero and at most `max_side`.
    pub fn fits(&self, max_side: u32) -> bool {
        self.width > 0 && self.height > 0 && self.width <= max_side && self.height <= max_side
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 { 1.0 } else { self.width as f32 / self.height as f32 }
    }
}

/// Numeric shader inputs of the reveal material.
///
/// Field names follow the shader contract: `u_ratio`, `u_hoverratio`,
/// `u_mouse`, `u_res`, `u_progressHover`, `u_progressClick`, `u_time`,
/// `u_alpha`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RevealParams {
    pub ratio: Vec2,
    pub hover_ratio: Vec2,
    pub mouse: Vec2,
    pub res: Vec2,
    pub progress_hover: f32,
    pub progress_click: f32,
    pub time: f32,
    pub alpha: f32,
}

/// One textured quad for this frame.
///
/// The quad is a unit plane centered on its origin; `scale` is its size in
/// world units and `position` its center (viewport-centered, +Y up).
#[derive(Debug, Clone)]
pub struct QuadDraw {
    pub mesh: MeshId,
    pub position: Vec2,
    pub scale: Vec2,
    pub params: RevealParams,
    /// `[u_map, u_hovermap, u_shape]`.
    pub textures: [Rc<TextureData>; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_ids_are_unique() {
        let a = MeshId::next();
        let b = MeshId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn solid_texture_fills_every_pixel() {
        let t = TextureData::solid(2, 3, [1, 2, 3, 4]);
        assert_eq!(t.rgba.len(), 24);
        assert!(t.rgba.chunks(4).all(|px| px == [1, 2, 3, 4]));
        assert!((t.aspect() - 2.0 / 3.0).abs() < 1e-6);
    }
}
