pub mod traits;

pub use traits::{
    BackgroundLayer, HighlightLayer, MapLayers, MarkerLayer, NullLayer, OrbitalLayer,
    OverlayLayer, PathLayer, PlayerNamesLayer, RulerLayer, SpatialCulling, TooltipLayer,
    WaypointLayer,
};
