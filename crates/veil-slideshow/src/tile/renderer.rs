use std::rc::Rc;

use veil_engine::coords::{Vec2, Viewport};
use veil_engine::scene::QuadList;
use veil_engine::time::FrameTime;

use crate::bounds::{BoundsTracker, TileBounds};
use crate::config::{SlideshowConfig, TileSources};
use crate::gallery::{LayoutMode, PageStyle, TileElement};
use crate::texture::{ImageLoader, LoadError, LoadedImage, TextureSet};
use crate::tween::{Easing, Interpolator, Tween, TweenStep, Tweener};
use crate::uniforms::UniformState;

use super::mesh::Mesh;
use super::state::{InteractionState, TileEvent, TileState};

/// Values a tile animates.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TileField {
    HoverProgress,
    MouseX,
    MouseY,
    ScaleX,
    ScaleY,
}

/// Completion signals a tile listens for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TileSignal {
    HoverSettled,
}

#[derive(Debug, Copy, Clone)]
struct Timing {
    hover: f32,
    inset: f32,
    scale: f32,
    mouse: f32,
}

/// One slideshow tile.
///
/// Created in `Loading`; the mesh appears on the first `update` after every
/// texture arrived and never before. Event handlers only start animations;
/// the values land in the uniforms as the tile's interpolator advances.
pub struct Tile {
    index: usize,
    timing: Timing,
    mode: Rc<LayoutMode>,

    state: TileState,
    textures: Option<TextureSet>,
    bounds: BoundsTracker,
    viewport: Viewport,
    /// Smoothed pointer; mirrored into `u_mouse` once the mesh exists.
    mouse: Vec2,
    mesh: Option<Mesh>,
    scale_target: Option<Vec2>,

    tweens: Box<dyn Interpolator<TileField, TileSignal>>,
}

impl Tile {
    /// Starts loading `sources` through `loader`. `index` is the element's
    /// position among its siblings.
    pub fn new(
        index: usize,
        sources: &TileSources,
        loader: &dyn ImageLoader,
        mode: Rc<LayoutMode>,
        config: &SlideshowConfig,
    ) -> Self {
        Self::with_interpolator(index, sources, loader, mode, config, Box::new(Tweener::new()))
    }

    pub fn with_interpolator(
        index: usize,
        sources: &TileSources,
        loader: &dyn ImageLoader,
        mode: Rc<LayoutMode>,
        config: &SlideshowConfig,
        tweens: Box<dyn Interpolator<TileField, TileSignal>>,
    ) -> Self {
        log::debug!("tile {index}: loading {}", sources.image.display());
        let textures = TextureSet::load(&sources.to_vec(), loader).with_timeout(config.load_timeout);

        Self {
            index,
            timing: Timing {
                hover: config.hover_duration,
                inset: config.scale_inset,
                scale: config.scale_duration,
                mouse: config.mouse_duration,
            },
            mode,
            state: TileState::Loading,
            textures: Some(textures),
            bounds: BoundsTracker::new(),
            viewport: Viewport::new(0.0, 0.0),
            mouse: Vec2::ZERO,
            mesh: None,
            scale_target: None,
            tweens,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> &TileState {
        &self.state
    }

    pub fn interaction(&self) -> InteractionState {
        InteractionState::new(&self.state, self.mouse)
    }

    pub fn bounds(&self) -> TileBounds {
        self.bounds.bounds()
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn uniforms(&self) -> Option<&UniformState> {
        self.mesh.as_ref().map(|m| &m.uniforms)
    }

    /// Page background slot selected on hover.
    pub fn background_slot(&self) -> u8 {
        (self.index + 1).clamp(1, 5) as u8
    }

    // ── Frame ─────────────────────────────────────────────────────────────

    /// Per-frame step: finishes loading, tracks layout, advances the hover
    /// clock and every running animation.
    pub fn update(&mut self, time: FrameTime, element: &mut dyn TileElement, viewport: Viewport) {
        self.viewport = viewport;

        if let Some(set) = self.textures.as_mut() {
            if let Some(outcome) = set.poll(time.now) {
                self.textures = None;
                match outcome {
                    Ok(images) => self.init_mesh(images, element),
                    Err(err) => self.fail(err),
                }
            }
        }

        if self.mesh.is_some() {
            self.track_layout(element);

            if self.state.is_hovering() {
                if let Some(mesh) = self.mesh.as_mut() {
                    mesh.uniforms.u_time.value += time.dt;
                }
            }
        }

        let step = self.tweens.advance(time.dt);
        self.apply(step);
    }

    /// Appends this tile's quad, if it has one.
    pub fn draw(&self, list: &mut QuadList) {
        if let Some(mesh) = self.mesh.as_ref() {
            list.push(mesh.to_draw());
        }
    }

    // ── Events ────────────────────────────────────────────────────────────

    pub fn on_resize(&mut self, element: &dyn TileElement, viewport: Viewport) {
        self.viewport = viewport;
        let frozen = self.state.is_frozen();

        if !frozen {
            self.bounds.refresh(element.bounding_rect(), viewport);
        }

        let Some(mesh) = self.mesh.as_mut() else { return };
        mesh.uniforms.u_res.value = viewport.size();
        if frozen {
            return;
        }

        mesh.uniforms.update_ratios(self.bounds.size());

        let scale = self.bounds.size() - self.timing.inset;
        self.tweens.cancel(TileField::ScaleX);
        self.tweens.cancel(TileField::ScaleY);
        mesh.scale = scale;
        mesh.position = self.bounds.offset();
        self.scale_target = Some(scale);
    }

    /// Window-level pointer position in logical pixels.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if self.state.is_frozen() || self.mode.is_mobile() {
            return;
        }

        let d = self.timing.mouse;
        self.tweens.animate(Tween::new(TileField::MouseX, self.mouse.x, x).duration(d).easing(Easing::QuadOut));
        self.tweens.animate(Tween::new(TileField::MouseY, self.mouse.y, y).duration(d).easing(Easing::QuadOut));
    }

    pub fn on_pointer_enter(&mut self, page: &mut dyn PageStyle) {
        if self.state.is_frozen() || self.mode.is_mobile() {
            return;
        }

        page.set_background_slot(self.background_slot());

        if self.mesh.is_none() || !self.transition(TileEvent::PointerEnter) {
            return;
        }

        let from = self.hover_progress();
        self.tweens.animate(
            Tween::new(TileField::HoverProgress, from, 1.0)
                .duration(self.timing.hover)
                .easing(Easing::CubicInOut),
        );
    }

    pub fn on_pointer_leave(&mut self) {
        if self.mesh.is_none() || self.state.is_frozen() || self.mode.is_mobile() {
            return;
        }

        let from = self.hover_progress();
        self.tweens.animate(
            Tween::new(TileField::HoverProgress, from, 0.0)
                .duration(self.timing.hover)
                .easing(Easing::CubicInOut)
                .on_complete(TileSignal::HoverSettled),
        );
    }

    pub fn on_click(&mut self) {
        if self.mode.is_mobile() || self.mesh.is_none() {
            return;
        }
        self.transition(TileEvent::Click);
    }

    /// Zoom request from outside the tile.
    pub fn zoom(&mut self) {
        self.transition(TileEvent::Zoom);
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn transition(&mut self, event: TileEvent) -> bool {
        match self.state.on(&event) {
            Some(next) => {
                if next != self.state {
                    log::debug!("tile {}: {} -> {}", self.index, self.state.name(), next.name());
                }
                self.state = next;
                true
            }
            None => {
                log::debug!("tile {}: ignoring {:?} while {}", self.index, event, self.state.name());
                false
            }
        }
    }

    fn init_mesh(&mut self, images: Vec<LoadedImage>, element: &mut dyn TileElement) {
        let count = images.len();
        let mut textures = images.into_iter().map(|image| Rc::new(image.data));
        let (Some(map), Some(hover), Some(shape)) = (textures.next(), textures.next(), textures.next()) else {
            self.fail(LoadError::Disconnected { pending: 3usize.saturating_sub(count) });
            return;
        };

        self.bounds.refresh(element.bounding_rect(), self.viewport);
        let uniforms = UniformState::new([map, hover, shape], self.bounds.size(), self.mouse, self.viewport);
        self.mesh = Some(Mesh::new(self.bounds.bounds(), uniforms));

        self.transition(TileEvent::Loaded);
        element.mark_loaded();
    }

    fn fail(&mut self, err: LoadError) {
        log::warn!("tile {}: textures unavailable: {err}", self.index);
        self.transition(TileEvent::LoadFailed(err));
    }

    /// Follows the element: position snaps, scale eases toward the size.
    fn track_layout(&mut self, element: &dyn TileElement) {
        if self.state.is_frozen() {
            return;
        }
        let Some(mesh) = self.mesh.as_mut() else { return };

        self.bounds.refresh(element.bounding_rect(), self.viewport);
        mesh.position = self.bounds.offset();

        let target = self.bounds.size() - self.timing.inset;
        if self.scale_target == Some(target) {
            return;
        }
        self.scale_target = Some(target);

        if mesh.scale == target {
            return;
        }
        let d = self.timing.scale;
        self.tweens.animate(Tween::new(TileField::ScaleX, mesh.scale.x, target.x).duration(d).easing(Easing::QuadOut));
        self.tweens.animate(Tween::new(TileField::ScaleY, mesh.scale.y, target.y).duration(d).easing(Easing::QuadOut));
    }

    fn hover_progress(&self) -> f32 {
        self.uniforms().map_or(0.0, |u| u.u_progress_hover.value)
    }

    fn apply(&mut self, step: TweenStep<TileField, TileSignal>) {
        for (field, value) in step.values {
            match field {
                TileField::MouseX => self.mouse.x = value,
                TileField::MouseY => self.mouse.y = value,
                _ => {}
            }

            let Some(mesh) = self.mesh.as_mut() else { continue };
            match field {
                TileField::HoverProgress => mesh.uniforms.u_progress_hover.value = value,
                TileField::ScaleX => mesh.scale.x = value,
                TileField::ScaleY => mesh.scale.y = value,
                TileField::MouseX | TileField::MouseY => mesh.uniforms.u_mouse.value = self.mouse,
            }
        }

        for signal in step.completed {
            match signal {
                TileSignal::HoverSettled => {
                    self.transition(TileEvent::HoverSettled);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use veil_engine::coords::Rect;
    use veil_engine::scene::TextureData;

    use crate::texture::ManualLoader;

    #[derive(Default)]
    struct Element {
        rect: Rect,
        loaded: bool,
    }

    impl TileElement for Element {
        fn bounding_rect(&self) -> Rect {
            self.rect
        }

        fn mark_loaded(&mut self) {
            self.loaded = true;
        }
    }

    #[derive(Default)]
    struct Page {
        slots: Vec<u8>,
    }

    impl PageStyle for Page {
        fn set_background_slot(&mut self, slot: u8) {
            self.slots.push(slot);
        }
    }

    const FULL_HD: Viewport = Viewport { width: 1920.0, height: 1080.0 };
    const HD: Viewport = Viewport { width: 1280.0, height: 720.0 };

    fn sources() -> TileSources {
        TileSources::new("a.jpg", "a-hover.jpg", "shape.jpg")
    }

    struct Rig {
        tile: Tile,
        loader: ManualLoader,
        element: Element,
        frame: u64,
        now: Instant,
    }

    impl Rig {
        fn new(index: usize, mobile: bool) -> Self {
            let loader = ManualLoader::new();
            let mode = Rc::new(LayoutMode::new(768.0, mobile));
            let tile = Tile::new(index, &sources(), &loader, mode, &SlideshowConfig::default());
            Self {
                tile,
                loader,
                element: Element { rect: Rect::new(860.0, 490.0, 200.0, 100.0), loaded: false },
                frame: 0,
                now: Instant::now(),
            }
        }

        fn ready(index: usize, mobile: bool) -> Self {
            let mut rig = Self::new(index, mobile);
            rig.loader.complete_all((400, 200));
            rig.step(0.016, FULL_HD);
            assert!(rig.tile.mesh().is_some());
            rig
        }

        fn step(&mut self, dt: f32, viewport: Viewport) {
            self.frame += 1;
            let t = FrameTime::manual(dt, self.now, self.frame);
            self.tile.update(t, &mut self.element, viewport);
        }

        fn progress(&self) -> f32 {
            self.tile.uniforms().map_or(-1.0, |u| u.u_progress_hover.value)
        }
    }

    #[test]
    fn no_mesh_before_every_texture_arrived() {
        let mut rig = Rig::new(0, false);
        rig.step(0.016, FULL_HD);
        assert!(rig.tile.mesh().is_none());

        rig.loader.complete("shape.jpg", Ok(TextureData::solid(8, 8, [255; 4])));
        rig.loader.complete("a.jpg", Ok(TextureData::solid(400, 200, [255; 4])));
        rig.step(0.016, FULL_HD);
        assert!(rig.tile.mesh().is_none());
        assert_eq!(rig.tile.state(), &TileState::Loading);
        assert!(!rig.element.loaded);

        let mut quads = QuadList::new();
        rig.tile.draw(&mut quads);
        assert!(quads.is_empty());

        rig.loader.complete("a-hover.jpg", Ok(TextureData::solid(100, 100, [255; 4])));
        rig.step(0.016, FULL_HD);
        assert_eq!(rig.tile.state(), &TileState::Idle);
        assert!(rig.element.loaded);

        let mesh = rig.tile.mesh().map(|m| (m.scale, m.position));
        assert_eq!(mesh, Some((Vec2::new(200.0, 100.0), Vec2::ZERO)));

        // Primary is 2:1 like the element; hover is square and gets cropped.
        let u = rig.tile.uniforms().map(|u| (u.u_ratio.value, u.u_hoverratio.value));
        assert_eq!(u, Some((Vec2::splat(1.0), Vec2::new(1.0, 0.5))));

        rig.tile.draw(&mut quads);
        assert_eq!(quads.len(), 1);
    }

    #[test]
    fn failed_load_never_draws() {
        let mut rig = Rig::new(0, false);
        rig.loader.complete("a.jpg", Err(LoadError::Io { path: "a.jpg".into(), message: "gone".into() }));
        rig.step(0.016, FULL_HD);
        assert!(matches!(rig.tile.state(), TileState::Failed(LoadError::Io { .. })));

        rig.loader.complete_all((4, 4));
        rig.step(0.016, FULL_HD);
        assert!(rig.tile.mesh().is_none());
    }

    #[test]
    fn hover_reaches_one_and_returns_to_zero() {
        let mut rig = Rig::ready(2, false);
        let mut page = Page::default();

        rig.tile.on_pointer_enter(&mut page);
        assert_eq!(page.slots, vec![3]);
        assert_eq!(rig.tile.state(), &TileState::Hovering);

        for _ in 0..4 {
            rig.step(0.25, FULL_HD);
        }
        assert_eq!(rig.progress(), 1.0);

        rig.tile.on_pointer_leave();
        rig.step(0.25, FULL_HD);
        assert!(rig.progress() > 0.0 && rig.progress() < 1.0);
        assert_eq!(rig.tile.state(), &TileState::Hovering);

        for _ in 0..3 {
            rig.step(0.25, FULL_HD);
        }
        assert_eq!(rig.progress(), 0.0);
        assert_eq!(rig.tile.state(), &TileState::Idle);
    }

    #[test]
    fn reentering_supersedes_the_leave() {
        let mut rig = Rig::ready(0, false);
        let mut page = Page::default();

        rig.tile.on_pointer_enter(&mut page);
        rig.step(1.0, FULL_HD);
        rig.tile.on_pointer_leave();
        rig.step(0.25, FULL_HD);
        rig.tile.on_pointer_enter(&mut page);
        for _ in 0..8 {
            rig.step(0.25, FULL_HD);
        }

        assert_eq!(rig.tile.state(), &TileState::Hovering);
        assert_eq!(rig.progress(), 1.0);
    }

    #[test]
    fn mobile_blocks_hover() {
        let mut rig = Rig::ready(0, true);
        let mut page = Page::default();

        rig.tile.on_pointer_enter(&mut page);
        for _ in 0..4 {
            rig.step(0.25, FULL_HD);
        }
        assert_eq!(rig.progress(), 0.0);
        assert_eq!(rig.tile.state(), &TileState::Idle);
        assert!(page.slots.is_empty());

        rig.tile.on_pointer_leave();
        rig.tile.on_click();
        assert_eq!(rig.tile.state(), &TileState::Idle);
    }

    #[test]
    fn background_slot_is_set_while_loading() {
        let mut rig = Rig::new(9, false);
        let mut page = Page::default();
        rig.tile.on_pointer_enter(&mut page);
        assert_eq!(page.slots, vec![5]);
        assert_eq!(rig.tile.state(), &TileState::Loading);
    }

    #[test]
    fn time_only_runs_while_hovering() {
        let mut rig = Rig::ready(0, false);
        rig.step(0.5, FULL_HD);
        assert_eq!(rig.tile.uniforms().map(|u| u.u_time.value), Some(0.0));

        rig.tile.on_pointer_enter(&mut Page::default());
        rig.step(0.5, FULL_HD);
        rig.step(0.25, FULL_HD);
        assert_eq!(rig.tile.uniforms().map(|u| u.u_time.value), Some(0.75));
    }

    #[test]
    fn pointer_is_smoothed_into_u_mouse() {
        let mut rig = Rig::ready(0, false);
        rig.tile.on_pointer_move(300.0, 200.0);
        rig.step(0.25, FULL_HD);
        let mid = rig.tile.uniforms().map_or(Vec2::ZERO, |u| u.u_mouse.value);
        assert!(mid.x > 0.0 && mid.x < 300.0);

        rig.step(0.25, FULL_HD);
        assert_eq!(rig.tile.uniforms().map(|u| u.u_mouse.value), Some(Vec2::new(300.0, 200.0)));
        assert_eq!(rig.tile.interaction().pointer, Vec2::new(300.0, 200.0));
    }

    #[test]
    fn resize_updates_scale_and_resolution() {
        let mut rig = Rig::ready(0, false);
        rig.element.rect = Rect::new(540.0, 310.0, 200.0, 100.0);

        rig.tile.on_resize(&rig.element, HD);

        let mesh = rig.tile.mesh().map(|m| (m.scale, m.position));
        assert_eq!(mesh, Some((Vec2::new(200.0, 100.0), Vec2::ZERO)));
        assert_eq!(rig.tile.uniforms().map(|u| u.u_res.value), Some(Vec2::new(1280.0, 720.0)));

        rig.element.rect = Rect::new(440.0, 260.0, 400.0, 200.0);
        rig.tile.on_resize(&rig.element, HD);
        assert_eq!(rig.tile.mesh().map(|m| m.scale), Some(Vec2::new(400.0, 200.0)));
    }

    #[test]
    fn click_freezes_layout_but_not_resolution() {
        let mut rig = Rig::ready(0, false);
        rig.tile.on_click();
        assert_eq!(rig.tile.state(), &TileState::Clicked { hovering: false });

        rig.element.rect = Rect::new(0.0, 0.0, 640.0, 360.0);
        rig.tile.on_resize(&rig.element, HD);
        rig.step(0.5, HD);

        let mesh = rig.tile.mesh().map(|m| (m.scale, m.position));
        assert_eq!(mesh, Some((Vec2::new(200.0, 100.0), Vec2::ZERO)));
        assert_eq!(rig.tile.uniforms().map(|u| u.u_res.value), Some(Vec2::new(1280.0, 720.0)));

        rig.tile.on_pointer_move(50.0, 50.0);
        rig.tile.on_pointer_enter(&mut Page::default());
        rig.step(1.0, HD);
        assert_eq!(rig.tile.interaction().pointer, Vec2::ZERO);
        assert_eq!(rig.progress(), 0.0);
    }

    #[test]
    fn layout_changes_ease_the_scale() {
        let mut rig = Rig::ready(0, false);
        rig.element.rect = Rect::new(810.0, 465.0, 300.0, 150.0);

        rig.step(0.1, FULL_HD);
        let scale = rig.tile.mesh().map_or(Vec2::ZERO, |m| m.scale);
        assert!(scale.x > 200.0 && scale.x < 300.0);
        assert_eq!(rig.tile.mesh().map(|m| m.position), Some(Vec2::ZERO));

        for _ in 0..4 {
            rig.step(0.1, FULL_HD);
        }
        assert_eq!(rig.tile.mesh().map(|m| m.scale), Some(Vec2::new(300.0, 150.0)));
    }

    #[test]
    fn zoom_is_terminal() {
        let mut rig = Rig::ready(0, false);
        rig.tile.zoom();
        assert!(rig.tile.interaction().is_zoomed);
        rig.tile.on_click();
        assert_eq!(rig.tile.state(), &TileState::Zoomed { hovering: false });
    }
}
