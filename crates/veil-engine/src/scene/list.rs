use super::QuadDraw;

/// Quads recorded for one frame, drawn in insertion order.
///
/// `clear()` keeps the allocation so steady-state frames do not allocate.
#[derive(Debug, Default)]
pub struct QuadList {
    items: Vec<QuadDraw>,
}

impl QuadList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn push(&mut self, quad: QuadDraw) {
        self.items.push(quad);
    }

    #[inline]
    pub fn items(&self) -> &[QuadDraw] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
