use super::ZIndex;

/// Paint-order key for draw items.
///
/// Field order matters: the derived `Ord` compares `z` first and falls back to
/// `order` (insertion index), which keeps items on the same layer stable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(z: ZIndex, order: u32) -> Self {
        Self { z, order }
    }
}
