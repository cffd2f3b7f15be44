/// Map layer, in draw order.
///
/// The composition root stacks layers back-to-front exactly as
/// [`MapLayer::DRAW_ORDER`] lists them; nothing else decides overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum MapLayer {
    Background = 0,
    /// Culled star and carrier chunks.
    Chunks = 1,
    Territories = 2,
    /// Route overlay for the selected or edited carrier.
    Waypoints = 3,
    Orbital = 4,
    /// Galaxy center crosshair and selection markers.
    Markers = 5,
    WormHoles = 6,
    Highlights = 7,
    Paths = 8,
    RulerPoints = 9,
    PlayerNames = 10,
    Tooltip = 11,
}

impl MapLayer {
    pub const COUNT: usize = 12;

    pub const DRAW_ORDER: [MapLayer; MapLayer::COUNT] = [
        MapLayer::Background,
        MapLayer::Chunks,
        MapLayer::Territories,
        MapLayer::Waypoints,
        MapLayer::Orbital,
        MapLayer::Markers,
        MapLayer::WormHoles,
        MapLayer::Highlights,
        MapLayer::Paths,
        MapLayer::RulerPoints,
        MapLayer::PlayerNames,
        MapLayer::Tooltip,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::DRAW_ORDER.get(value as usize).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_order_is_sorted_and_complete() {
        for pair in MapLayer::DRAW_ORDER.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(MapLayer::DRAW_ORDER.len(), MapLayer::COUNT);
    }

    #[test]
    fn tooltip_is_on_top_and_background_at_bottom() {
        assert_eq!(MapLayer::DRAW_ORDER[0], MapLayer::Background);
        assert_eq!(MapLayer::DRAW_ORDER[MapLayer::COUNT - 1], MapLayer::Tooltip);
        assert!(MapLayer::Chunks < MapLayer::Waypoints);
    }

    #[test]
    fn from_u8_matches_as_u8() {
        for layer in MapLayer::DRAW_ORDER {
            assert_eq!(MapLayer::from_u8(layer.as_u8()), Some(layer));
        }
        assert!(MapLayer::from_u8(MapLayer::COUNT as u8).is_none());
    }
}
