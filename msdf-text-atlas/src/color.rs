use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Set of distance-field channels an edge contributes to.
    ///
    /// Coloring only ever assigns two-channel colors (cyan, magenta, yellow)
    /// or white; a primary color appears only transiently while switching.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct EdgeColor: u8 {
        const RED = 0b001;
        const GREEN = 0b010;
        const BLUE = 0b100;
        const YELLOW = Self::RED.bits() | Self::GREEN.bits();
        const MAGENTA = Self::RED.bits() | Self::BLUE.bits();
        const CYAN = Self::GREEN.bits() | Self::BLUE.bits();
        const WHITE = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits();
    }
}

impl EdgeColor {
    /// Colors used to start a contour, indexed by seed
    pub const STARTS: [EdgeColor; 3] = [EdgeColor::CYAN, EdgeColor::MAGENTA, EdgeColor::YELLOW];

    pub const BLACK: EdgeColor = EdgeColor::empty();

    /// True for exactly one channel
    pub fn is_primary(self) -> bool {
        self.bits().count_ones() == 1
    }
}

impl Default for EdgeColor {
    fn default() -> Self {
        EdgeColor::WHITE
    }
}
