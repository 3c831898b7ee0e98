//! Scene host: camera, tiles, gallery layout and the per-frame draw.

use std::rc::Rc;

use winit::window::WindowId;

use veil_engine::camera::PerspectiveCamera;
use veil_engine::coords::{Vec2, Viewport};
use veil_engine::core::{App, AppControl, FrameCtx};
use veil_engine::input::{InputEvent, InputFrame, MouseButton, MouseButtonState};
use veil_engine::render::RevealRenderer;
use veil_engine::scene::QuadList;
use veil_engine::time::FrameTime;
use veil_engine::window::CursorIcon;

use crate::config::{SlideshowConfig, TileSources};
use crate::gallery::{Backdrop, Gallery, LayoutMode};
use crate::texture::ImageLoader;
use crate::tile::Tile;

/// Background fade time constant, seconds.
const BACKDROP_FADE: f32 = 0.25;

/// Owns every tile and drives them from window events and the frame clock.
pub struct Slideshow {
    mode: Rc<LayoutMode>,
    camera: PerspectiveCamera,
    renderer: RevealRenderer,
    backdrop: Backdrop,
    gallery: Gallery,
    tiles: Vec<Tile>,
    quads: QuadList,

    viewport: Viewport,
    pointer: Option<Vec2>,
    hovered: Option<usize>,
}

impl Slideshow {
    /// Creates one tile per entry of `sources`; loading starts immediately.
    pub fn new(
        config: SlideshowConfig,
        sources: &[TileSources],
        loader: &dyn ImageLoader,
        viewport: Viewport,
    ) -> Self {
        let mode = Rc::new(LayoutMode::from_config(&config));
        mode.update_viewport(viewport);

        let tiles = sources
            .iter()
            .enumerate()
            .map(|(i, s)| Tile::new(i, s, loader, mode.clone(), &config))
            .collect();

        log::info!("slideshow with {} tile(s)", sources.len());

        Self {
            camera: PerspectiveCamera::new(viewport),
            renderer: RevealRenderer::new(),
            backdrop: Backdrop::new(config.palette, BACKDROP_FADE),
            gallery: Gallery::new(sources.len(), &config, viewport),
            tiles,
            quads: QuadList::new(),
            mode,
            viewport,
            pointer: None,
            hovered: None,
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile_mut(&mut self, index: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(index)
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    pub fn layout_mode(&self) -> &LayoutMode {
        &self.mode
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Draw list built by the last `update`.
    pub fn quads(&self) -> &QuadList {
        &self.quads
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    // ── Signals ───────────────────────────────────────────────────────────

    pub fn resize(&mut self, viewport: Viewport) {
        if !viewport.is_valid() {
            return;
        }

        self.viewport = viewport;
        self.camera.resize(viewport);
        self.mode.update_viewport(viewport);
        self.gallery.resize(viewport);

        for (i, tile) in self.tiles.iter_mut().enumerate() {
            if let Some(element) = self.gallery.item(i) {
                tile.on_resize(element, viewport);
            }
        }

        if let Some(p) = self.pointer {
            self.update_hover(p);
        }
    }

    pub fn pointer_moved(&mut self, p: Vec2) {
        self.pointer = Some(p);
        for tile in &mut self.tiles {
            tile.on_pointer_move(p.x, p.y);
        }
        self.update_hover(p);
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
        if let Some(prev) = self.hovered.take() {
            if let Some(tile) = self.tiles.get_mut(prev) {
                tile.on_pointer_leave();
            }
        }
    }

    pub fn click(&mut self, p: Vec2) {
        if let Some(tile) = self.gallery.hit_test(p).and_then(|i| self.tiles.get_mut(i)) {
            tile.on_click();
        }
    }

    /// Wheel input; positive `delta` moves toward later tiles.
    pub fn scroll(&mut self, delta: f32) {
        self.gallery.scroll_by(delta);
    }

    fn update_hover(&mut self, p: Vec2) {
        let hit = self.gallery.hit_test(p);
        if hit == self.hovered {
            return;
        }

        if let Some(tile) = self.hovered.and_then(|i| self.tiles.get_mut(i)) {
            tile.on_pointer_leave();
        }
        if let Some(tile) = hit.and_then(|i| self.tiles.get_mut(i)) {
            tile.on_pointer_enter(&mut self.backdrop);
        }
        self.hovered = hit;
    }

    fn handle_input(&mut self, frame: &InputFrame) {
        for ev in &frame.events {
            match ev {
                InputEvent::PointerMoved(m) => self.pointer_moved(Vec2::new(m.x, m.y)),
                InputEvent::PointerLeft => self.pointer_left(),
                InputEvent::PointerButton(b)
                    if b.button == MouseButton::Left && b.state == MouseButtonState::Pressed =>
                {
                    self.click(Vec2::new(b.x, b.y));
                }
                InputEvent::Touch { .. } => self.mode.note_touch(),
                _ => {}
            }
        }

        let d = frame.scroll_delta;
        let delta = if d.x.abs() > d.y.abs() { d.x } else { d.y };
        if delta != 0.0 {
            self.scroll(-delta);
        }
    }

    // ── Frame ─────────────────────────────────────────────────────────────

    /// Advances layout and tiles by one frame and rebuilds the draw list.
    pub fn update(&mut self, time: FrameTime) {
        self.backdrop.update(time.dt);

        if self.gallery.update(time.dt) {
            if let Some(p) = self.pointer {
                self.update_hover(p);
            }
        }

        let viewport = self.viewport;
        for (i, tile) in self.tiles.iter_mut().enumerate() {
            if let Some(element) = self.gallery.item_mut(i) {
                tile.update(time, element, viewport);
            }
        }

        self.quads.clear();
        for tile in &self.tiles {
            tile.draw(&mut self.quads);
        }
    }

    fn cursor(&self) -> CursorIcon {
        let clickable = self
            .hovered
            .and_then(|i| self.tiles.get(i))
            .is_some_and(|t| t.state().is_ready() && !t.state().is_frozen() && !self.mode.is_mobile());
        if clickable { CursorIcon::Pointer } else { CursorIcon::Default }
    }
}

impl App for Slideshow {
    fn on_resize(&mut self, _window_id: WindowId, viewport: Viewport) -> AppControl {
        self.resize(viewport);
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.handle_input(ctx.input_frame);
        self.update(ctx.time);
        ctx.window.set_cursor(self.cursor());

        let renderer = &mut self.renderer;
        let camera = &self.camera;
        let quads = &self.quads;
        ctx.render(self.backdrop.color(), |rctx, target| {
            renderer.render(rctx, target, camera, quads);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use crate::texture::ManualLoader;
    use crate::tile::TileState;

    struct Rig {
        show: Slideshow,
        loader: ManualLoader,
        frame: u64,
    }

    impl Rig {
        fn new(tiles: usize, viewport: Viewport) -> Self {
            let loader = ManualLoader::new();
            let sources: Vec<TileSources> = (0..tiles)
                .map(|i| TileSources::new(format!("{i}.jpg"), format!("{i}-hover.jpg"), "shape.jpg"))
                .collect();
            let config = SlideshowConfig {
                scroll_smoothing: 0.0,
                ..SlideshowConfig::default()
            };
            let show = Slideshow::new(config, &sources, &loader, viewport);
            Self { show, loader, frame: 0 }
        }

        fn step(&mut self, dt: f32) {
            self.frame += 1;
            self.show.update(FrameTime::manual(dt, Instant::now(), self.frame));
        }

        fn center_of(&self, i: usize) -> Vec2 {
            self.show.gallery().item(i).map(|it| it.rect().center()).unwrap_or_default()
        }
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn only_loaded_tiles_are_drawn() {
        let mut rig = Rig::new(2, Viewport::new(1920.0, 1080.0));
        rig.step(0.016);
        assert!(rig.show.quads().is_empty());

        for name in ["0.jpg", "0-hover.jpg", "shape.jpg"] {
            rig.loader.complete(name, Ok(veil_engine::scene::TextureData::solid(4, 4, [255; 4])));
        }
        rig.step(0.016);
        assert_eq!(rig.show.quads().len(), 1);
        assert!(rig.show.gallery().item(0).is_some_and(|i| i.is_loaded()));
        assert!(rig.show.gallery().item(1).is_some_and(|i| !i.is_loaded()));
    }

    #[test]
    fn resize_scenario() {
        let mut rig = Rig::new(1, Viewport::new(1920.0, 1080.0));
        rig.loader.complete_all((400, 300));
        rig.step(0.016);

        rig.show.resize(Viewport::new(1280.0, 720.0));

        assert!((rig.show.camera().aspect() - 1280.0 / 720.0).abs() < 1e-6);
        let tile = &rig.show.tiles()[0];
        let expected = rig.show.gallery().item_size();
        let mesh = tile.mesh().unwrap();
        assert!(close(mesh.scale, expected), "scale = {:?}", mesh.scale);
        assert!(close(mesh.position, Vec2::ZERO), "position = {:?}", mesh.position);
        assert_eq!(tile.uniforms().map(|u| u.u_res.value), Some(Vec2::new(1280.0, 720.0)));
    }

    #[test]
    fn pointer_drives_enter_and_leave() {
        let mut rig = Rig::new(2, Viewport::new(1920.0, 1080.0));
        rig.loader.complete_all((4, 4));
        rig.step(0.016);

        let c = rig.center_of(0);
        rig.show.pointer_moved(c);
        assert_eq!(rig.show.hovered(), Some(0));
        assert_eq!(rig.show.tiles()[0].state(), &TileState::Hovering);

        rig.show.pointer_moved(Vec2::new(5.0, 5.0));
        assert_eq!(rig.show.hovered(), None);
        for _ in 0..4 {
            rig.step(0.25);
        }
        assert_eq!(rig.show.tiles()[0].state(), &TileState::Idle);
    }

    #[test]
    fn scrolling_moves_hover_to_the_next_tile() {
        let mut rig = Rig::new(2, Viewport::new(1920.0, 1080.0));
        rig.loader.complete_all((4, 4));
        rig.step(0.016);

        let center = rig.center_of(0);
        rig.show.pointer_moved(center);

        let stride = rig.center_of(1).x - center.x;
        rig.show.scroll(stride);
        rig.step(0.016);

        assert_eq!(rig.show.hovered(), Some(1));
        assert_eq!(rig.show.backdrop().slot(), 2);
        assert_eq!(rig.show.tiles()[1].state(), &TileState::Hovering);
    }

    #[test]
    fn click_hits_the_tile_under_the_pointer() {
        let mut rig = Rig::new(2, Viewport::new(1920.0, 1080.0));
        rig.loader.complete_all((4, 4));
        rig.step(0.016);

        rig.show.click(Vec2::new(1.0, 1.0));
        assert_eq!(rig.show.tiles()[0].state(), &TileState::Idle);

        let c = rig.center_of(0);
        rig.show.click(c);
        assert_eq!(rig.show.tiles()[0].state(), &TileState::Clicked { hovering: false });
    }

    #[test]
    fn narrow_viewport_turns_on_mobile() {
        let mut rig = Rig::new(1, Viewport::new(1920.0, 1080.0));
        rig.loader.complete_all((4, 4));
        rig.step(0.016);

        rig.show.resize(Viewport::new(600.0, 900.0));
        assert!(rig.show.layout_mode().is_mobile());

        let c = rig.center_of(0);
        rig.show.pointer_moved(c);
        assert_eq!(rig.show.tiles()[0].state(), &TileState::Idle);
    }
}
