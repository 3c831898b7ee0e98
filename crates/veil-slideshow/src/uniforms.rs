//! Shader-visible state of one tile.

use std::rc::Rc;

use veil_engine::coords::{Vec2, Viewport};
use veil_engine::scene::{RevealParams, TextureData};

/// Optional type tag carried next to a uniform value.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    Texture,
}

/// A single mutable uniform cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform<T> {
    pub value: T,
    pub kind: Option<UniformKind>,
}

impl<T> Uniform<T> {
    pub fn new(value: T) -> Self {
        Self { value, kind: None }
    }

    pub fn tagged(value: T, kind: UniformKind) -> Self {
        Self { value, kind: Some(kind) }
    }
}

/// Name-keyed view of a uniform value.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Texture(Rc<TextureData>),
    Float(f32),
    Vec2(Vec2),
}

/// Uniforms of the reveal material. The set of names is fixed.
#[derive(Debug, Clone)]
pub struct UniformState {
    pub u_alpha: Uniform<f32>,
    pub u_map: Uniform<Rc<TextureData>>,
    pub u_ratio: Uniform<Vec2>,
    pub u_hovermap: Uniform<Rc<TextureData>>,
    pub u_hoverratio: Uniform<Vec2>,
    pub u_shape: Uniform<Rc<TextureData>>,
    /// Smoothed pointer position in logical pixels.
    pub u_mouse: Uniform<Vec2>,
    pub u_progress_hover: Uniform<f32>,
    pub u_progress_click: Uniform<f32>,
    /// Seconds spent hovering.
    pub u_time: Uniform<f32>,
    pub u_res: Uniform<Vec2>,
}

impl UniformState {
    pub const NAMES: [&'static str; 11] = [
        "u_alpha",
        "u_map",
        "u_ratio",
        "u_hovermap",
        "u_hoverratio",
        "u_shape",
        "u_mouse",
        "u_progressHover",
        "u_progressClick",
        "u_time",
        "u_res",
    ];

    /// `textures` is `[primary, hover, mask]`; `size` is the tile's current
    /// world size and drives the cover ratios.
    pub fn new(textures: [Rc<TextureData>; 3], size: Vec2, mouse: Vec2, viewport: Viewport) -> Self {
        let [map, hover, shape] = textures;
        Self {
            u_alpha: Uniform::new(1.0),
            u_ratio: Uniform::new(cover_ratio(size, &map)),
            u_map: Uniform::tagged(map, UniformKind::Texture),
            u_hoverratio: Uniform::new(cover_ratio(size, &hover)),
            u_hovermap: Uniform::tagged(hover, UniformKind::Texture),
            u_shape: Uniform::new(shape),
            u_mouse: Uniform::new(mouse),
            u_progress_hover: Uniform::new(0.0),
            u_progress_click: Uniform::new(0.0),
            u_time: Uniform::new(0.0),
            u_res: Uniform::new(viewport.size()),
        }
    }

    /// Recomputes both cover ratios for a new tile size.
    pub fn update_ratios(&mut self, size: Vec2) {
        self.u_ratio.value = cover_ratio(size, &self.u_map.value);
        self.u_hoverratio.value = cover_ratio(size, &self.u_hovermap.value);
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        let value = match name {
            "u_alpha" => UniformValue::Float(self.u_alpha.value),
            "u_map" => UniformValue::Texture(self.u_map.value.clone()),
            "u_ratio" => UniformValue::Vec2(self.u_ratio.value),
            "u_hovermap" => UniformValue::Texture(self.u_hovermap.value.clone()),
            "u_hoverratio" => UniformValue::Vec2(self.u_hoverratio.value),
            "u_shape" => UniformValue::Texture(self.u_shape.value.clone()),
            "u_mouse" => UniformValue::Vec2(self.u_mouse.value),
            "u_progressHover" => UniformValue::Float(self.u_progress_hover.value),
            "u_progressClick" => UniformValue::Float(self.u_progress_click.value),
            "u_time" => UniformValue::Float(self.u_time.value),
            "u_res" => UniformValue::Vec2(self.u_res.value),
            _ => return None,
        };
        Some(value)
    }

    pub fn kind(&self, name: &str) -> Option<UniformKind> {
        match name {
            "u_map" => self.u_map.kind,
            "u_hovermap" => self.u_hovermap.kind,
            "u_shape" => self.u_shape.kind,
            _ => None,
        }
    }

    /// `[u_map, u_hovermap, u_shape]`.
    pub fn textures(&self) -> [Rc<TextureData>; 3] {
        [
            self.u_map.value.clone(),
            self.u_hovermap.value.clone(),
            self.u_shape.value.clone(),
        ]
    }

    pub fn to_params(&self) -> RevealParams {
        RevealParams {
            ratio: self.u_ratio.value,
            hover_ratio: self.u_hoverratio.value,
            mouse: self.u_mouse.value,
            res: self.u_res.value,
            progress_hover: self.u_progress_hover.value,
            progress_click: self.u_progress_click.value,
            time: self.u_time.value,
            alpha: self.u_alpha.value,
        }
    }
}

/// Cover-fit UV scale of `texture` inside a quad of `size`.
///
/// One axis is always 1; the other shrinks so the texture fills the quad
/// without distortion.
pub fn cover_ratio(size: Vec2, texture: &TextureData) -> Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 || texture.width == 0 || texture.height == 0 {
        return Vec2::splat(1.0);
    }
    let (tw, th) = (texture.width as f32, texture.height as f32);
    Vec2::new(
        ((size.x / size.y) / (tw / th)).min(1.0),
        ((size.y / size.x) / (th / tw)).min(1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textures() -> [Rc<TextureData>; 3] {
        [
            Rc::new(TextureData::solid(400, 200, [0; 4])),
            Rc::new(TextureData::solid(100, 100, [0; 4])),
            Rc::new(TextureData::solid(8, 8, [0; 4])),
        ]
    }

    #[test]
    fn cover_ratio_shrinks_one_axis() {
        let tex = TextureData::solid(400, 200, [0; 4]);
        // Square quad, wide texture: crop horizontally.
        let r = cover_ratio(Vec2::new(100.0, 100.0), &tex);
        assert!((r.x - 0.5).abs() < 1e-6);
        assert_eq!(r.y, 1.0);

        // Matching aspect: no crop.
        assert_eq!(cover_ratio(Vec2::new(200.0, 100.0), &tex), Vec2::splat(1.0));
    }

    #[test]
    fn cover_ratio_handles_degenerate_sizes() {
        let tex = TextureData::solid(4, 4, [0; 4]);
        assert_eq!(cover_ratio(Vec2::ZERO, &tex), Vec2::splat(1.0));
    }

    #[test]
    fn initial_values() {
        let u = UniformState::new(textures(), Vec2::new(100.0, 100.0), Vec2::new(3.0, 4.0), Viewport::new(1920.0, 1080.0));
        assert_eq!(u.u_alpha.value, 1.0);
        assert_eq!(u.u_progress_hover.value, 0.0);
        assert_eq!(u.u_progress_click.value, 0.0);
        assert_eq!(u.u_time.value, 0.0);
        assert_eq!(u.u_res.value, Vec2::new(1920.0, 1080.0));
        assert_eq!(u.u_mouse.value, Vec2::new(3.0, 4.0));
        assert_eq!(u.u_hoverratio.value, Vec2::splat(1.0));
    }

    #[test]
    fn every_name_resolves() {
        let u = UniformState::new(textures(), Vec2::new(10.0, 10.0), Vec2::ZERO, Viewport::new(800.0, 600.0));
        for name in UniformState::NAMES {
            assert!(u.get(name).is_some(), "{name}");
        }
        assert!(u.get("u_nope").is_none());
        assert_eq!(u.get("u_progressHover"), Some(UniformValue::Float(0.0)));
        assert_eq!(u.kind("u_map"), Some(UniformKind::Texture));
        assert_eq!(u.kind("u_shape"), None);
    }

    #[test]
    fn ratios_follow_resize() {
        let mut u = UniformState::new(textures(), Vec2::new(200.0, 100.0), Vec2::ZERO, Viewport::new(800.0, 600.0));
        assert_eq!(u.u_ratio.value, Vec2::splat(1.0));
        u.update_ratios(Vec2::new(100.0, 100.0));
        assert!((u.u_ratio.value.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn params_mirror_uniforms() {
        let mut u = UniformState::new(textures(), Vec2::new(10.0, 10.0), Vec2::ZERO, Viewport::new(800.0, 600.0));
        u.u_progress_hover.value = 0.25;
        u.u_time.value = 2.0;
        let p = u.to_params();
        assert_eq!(p.progress_hover, 0.25);
        assert_eq!(p.time, 2.0);
        assert_eq!(p.res, Vec2::new(800.0, 600.0));
    }
}
