//! Pixel-aligned perspective camera.
//!
//! The camera sits on the +Z axis at a fixed virtual distance and its vertical
//! field of view is derived from the viewport height, so one world unit equals
//! one logical pixel on the z = 0 plane. Quads placed at z = 0 with pixel sizes
//! therefore line up exactly with the layout they mirror.

use glam::{Mat4, Vec3};

use crate::coords::Viewport;

/// Default virtual distance between the camera and the z = 0 plane.
pub const DEFAULT_PERSPECTIVE: f32 = 800.0;

#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    distance: f32,
    near: f32,
    far: f32,
    viewport: Viewport,
    fov_y: f32,
    aspect: f32,
}

impl PerspectiveCamera {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_distance(viewport, DEFAULT_PERSPECTIVE)
    }

    pub fn with_distance(viewport: Viewport, distance: f32) -> Self {
        let mut camera = Self {
            distance,
            near: 1.0,
            far: 10_000.0,
            viewport,
            fov_y: 0.0,
            aspect: 1.0,
        };
        camera.resize(viewport);
        camera
    }

    /// Re-derives aspect and field of view for a new viewport.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.aspect = viewport.aspect();
        let half_height = if viewport.is_valid() { viewport.height * 0.5 } else { 0.5 };
        self.fov_y = 2.0 * (half_height / self.distance).atan();
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Vertical field of view in radians.
    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, self.distance), Vec3::ZERO, Vec3::Y)
    }

    /// wgpu-convention projection (depth in `[0, 1]`).
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}
