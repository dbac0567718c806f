/// Render layer — controls draw order for entities.
///
/// Layers are drawn back-to-front: Background first, Ui last. An entity's
/// layer is fixed at construction. Within a layer, entities keep their
/// spawn order unless a paint order refines it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum RenderLayer {
    Background = 0,
    Plants = 1,
    Eggs = 2,
    #[default]
    Fish = 3,
    Tackle = 4,
    Ui = 5,
}

impl RenderLayer {
    /// Total number of render layers.
    pub const COUNT: usize = 6;

    /// Convert from a u8 value to a RenderLayer.
    /// Returns None if the value is out of range.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Background),
            1 => Some(Self::Plants),
            2 => Some(Self::Eggs),
            3 => Some(Self::Fish),
            4 => Some(Self::Tackle),
            5 => Some(Self::Ui),
            _ => None,
        }
    }

    /// Convert to u8 for manifest serialization.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
