//! Per-tile renderer: texture loading, layout tracking, the hover/click state
//! machine and the quad it contributes to each frame.

mod mesh;
mod renderer;
mod state;

pub use mesh::Mesh;
pub use renderer::{Tile, TileField, TileSignal};
pub use state::{InteractionState, TileEvent, TileState};
