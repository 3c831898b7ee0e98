use veil_engine::coords::Vec2;

use crate::texture::LoadError;

/// Lifecycle of a tile.
///
/// `Idle` and `Hovering` are the interactive ready states. `Clicked` and
/// `Zoomed` are terminal; they remember whether the pointer was still over
/// the tile so the hover clock keeps running.
#[derive(Debug, Clone, PartialEq)]
pub enum TileState {
    Loading,
    Failed(LoadError),
    Idle,
    Hovering,
    Clicked { hovering: bool },
    Zoomed { hovering: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TileEvent {
    Loaded,
    LoadFailed(LoadError),
    PointerEnter,
    /// The hover-out transition finished.
    HoverSettled,
    Click,
    Zoom,
}

impl TileState {
    /// Next state for `event`, or `None` if the edge does not exist.
    pub fn on(&self, event: &TileEvent) -> Option<TileState> {
        use TileState::*;

        let next = match (self, event) {
            (Loading, TileEvent::Loaded) => Idle,
            (Loading, TileEvent::LoadFailed(err)) => Failed(err.clone()),

            (Idle | Hovering, TileEvent::PointerEnter) => Hovering,
            (Hovering, TileEvent::HoverSettled) => Idle,

            (Idle, TileEvent::Click) => Clicked { hovering: false },
            (Hovering, TileEvent::Click) => Clicked { hovering: true },
            (Idle, TileEvent::Zoom) => Zoomed { hovering: false },
            (Hovering, TileEvent::Zoom) => Zoomed { hovering: true },

            // A hover-out started before the freeze still lands.
            (Clicked { hovering: true }, TileEvent::HoverSettled) => Clicked { hovering: false },
            (Zoomed { hovering: true }, TileEvent::HoverSettled) => Zoomed { hovering: false },

            _ => return None,
        };
        Some(next)
    }

    /// Textures are loaded and the mesh exists.
    pub fn is_ready(&self) -> bool {
        matches!(
            self,
            TileState::Idle | TileState::Hovering | TileState::Clicked { .. } | TileState::Zoomed { .. }
        )
    }

    pub fn is_hovering(&self) -> bool {
        matches!(
            self,
            TileState::Hovering
                | TileState::Clicked { hovering: true }
                | TileState::Zoomed { hovering: true }
        )
    }

    pub fn has_clicked(&self) -> bool {
        matches!(self, TileState::Clicked { .. })
    }

    pub fn is_zoomed(&self) -> bool {
        matches!(self, TileState::Zoomed { .. })
    }

    /// Layout tracking and pointer-driven animation are off.
    pub fn is_frozen(&self) -> bool {
        self.has_clicked() || self.is_zoomed()
    }

    pub fn name(&self) -> &'static str {
        match self {
            TileState::Loading => "loading",
            TileState::Failed(_) => "failed",
            TileState::Idle => "idle",
            TileState::Hovering => "hovering",
            TileState::Clicked { .. } => "clicked",
            TileState::Zoomed { .. } => "zoomed",
        }
    }
}

/// Flat view of the interaction flags.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InteractionState {
    pub is_hovering: bool,
    pub has_clicked: bool,
    pub is_zoomed: bool,
    /// Smoothed pointer position, logical pixels.
    pub pointer: Vec2,
}

impl InteractionState {
    pub fn new(state: &TileState, pointer: Vec2) -> Self {
        Self {
            is_hovering: state.is_hovering(),
            has_clicked: state.has_clicked(),
            is_zoomed: state.is_zoomed(),
            pointer,
        }
    }
}
