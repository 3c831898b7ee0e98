use veil_engine::coords::Vec2;
use veil_engine::scene::{MeshId, QuadDraw};

use crate::bounds::TileBounds;
use crate::uniforms::UniformState;

/// A tile's quad: unit plane scaled to the element size and centered on its
/// world offset, with the reveal material's uniforms.
#[derive(Debug, Clone)]
pub struct Mesh {
    id: MeshId,
    pub position: Vec2,
    pub scale: Vec2,
    pub uniforms: UniformState,
}

impl Mesh {
    pub fn new(bounds: TileBounds, uniforms: UniformState) -> Self {
        Self {
            id: MeshId::next(),
            position: bounds.offset,
            scale: bounds.size,
            uniforms,
        }
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn to_draw(&self) -> QuadDraw {
        QuadDraw {
            mesh: self.id,
            position: self.position,
            scale: self.scale,
            params: self.uniforms.to_params(),
            textures: self.uniforms.textures(),
        }
    }
}
