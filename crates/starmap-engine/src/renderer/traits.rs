//! Contracts for the overlay layers and spatial structures the engine drives.
//!
//! Drawing itself happens behind these traits (in the host's renderer); the
//! engine only decides when each layer sets up, draws, clears and re-zooms.
//! Every hook has a no-op default so a host implements only what it draws.

use glam::Vec2;

use crate::api::config::UserMapSettings;
use crate::api::types::{CarrierData, GalaxySnapshot, ObjectRef, StarData};
use crate::core::viewport::{Bounds, ViewportData};
use crate::input::queue::ProxySink;

/// Common lifecycle of a map sub-layer.
pub trait OverlayLayer {
    /// Rebuild from a new snapshot.
    fn setup(&mut self, _galaxy: &GalaxySnapshot, _settings: &UserMapSettings) {}
    fn draw(&mut self) {}
    fn clear(&mut self) {}
    /// Level-of-detail hook.
    fn refresh_zoom(&mut self, _zoom_percent: f32) {}
    /// Release drawing resources.
    fn destroy(&mut self) {}
}

/// Route overlay and waypoint placement.
/// Reports `WaypointCreated` / `WaypointOutOfRange` through its sink.
pub trait WaypointLayer: OverlayLayer {
    fn attach(&mut self, _sink: ProxySink) {}
    fn detach(&mut self) {}
    /// Draw `carrier`'s route. Editable routes accept placement clicks.
    fn draw_carrier(&mut self, _carrier: &CarrierData, _editable: bool) {}
    fn on_star_clicked(&mut self, _star: &StarData) {}
    fn on_carrier_clicked(&mut self, _carrier: &CarrierData) {}
}

/// Distance ruler. Reports point created/removed/cleared through its sink.
pub trait RulerLayer: OverlayLayer {
    fn attach(&mut self, _sink: ProxySink) {}
    fn detach(&mut self) {}
    fn on_star_clicked(&mut self, _star: &StarData) {}
    fn on_carrier_clicked(&mut self, _carrier: &CarrierData) {}
    fn remove_last_point(&mut self) {}
}

/// Orbit paths for the selected object when orbital mechanics are on.
pub trait OrbitalLayer: OverlayLayer {
    fn draw_star(&mut self, _star: &StarData) {}
    fn draw_carrier(&mut self, _carrier: &CarrierData) {}
}

pub trait TooltipLayer: OverlayLayer {
    fn draw_star_tooltip(&mut self, _star: &StarData) {}
    fn draw_carrier_tooltip(&mut self, _carrier: &CarrierData) {}
}

pub trait HighlightLayer: OverlayLayer {
    fn highlight_location(&mut self, _location: Vec2, _opacity: f32) {}
}

pub trait PlayerNamesLayer: OverlayLayer {
    fn on_tick(&mut self, _zoom_percent: f32, _zoom_changing: bool) {}
}

pub trait BackgroundLayer: OverlayLayer {
    fn on_tick(&mut self, _dt: f32, _viewport: &ViewportData) {}
}

/// Carrier path renderer.
pub trait PathLayer {
    fn update(&mut self, _galaxy: &GalaxySnapshot, _settings: &UserMapSettings) {}
    fn on_tick(&mut self, _zoom_percent: f32, _bounds: &Bounds, _zoom_changing: bool) {}
}

/// Transient markers: the click "selected" circle and the galaxy center.
pub trait MarkerLayer {
    fn draw_selected_circle(&mut self, _location: Vec2) {}
    /// Draw the galaxy center crosshair, or remove it when `None`.
    fn draw_galaxy_center(&mut self, _location: Option<Vec2>) {}
}

/// Spatial partition that culls off-screen objects.
pub trait SpatialCulling {
    /// Re-partition after a snapshot reload.
    fn update(&mut self, _galaxy: &GalaxySnapshot) {}
    fn on_tick(&mut self, position_changing: bool, zoom_changing: bool, zoom_percent: f32, bounds: &Bounds);
    fn remove_object(&mut self, _object: &ObjectRef) {}
}

/// Layer that draws nothing. Stands in for anything the host does not render.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLayer;

impl OverlayLayer for NullLayer {}
impl WaypointLayer for NullLayer {}
impl RulerLayer for NullLayer {}
impl OrbitalLayer for NullLayer {}
impl TooltipLayer for NullLayer {}
impl HighlightLayer for NullLayer {}
impl PlayerNamesLayer for NullLayer {}
impl BackgroundLayer for NullLayer {}
impl PathLayer for NullLayer {}
impl MarkerLayer for NullLayer {}

impl SpatialCulling for NullLayer {
    fn on_tick(&mut self, _position_changing: bool, _zoom_changing: bool, _zoom_percent: f32, _bounds: &Bounds) {}
}

/// Every sub-layer the engine coordinates, one slot per `MapLayer`.
pub struct MapLayers {
    pub background: Box<dyn BackgroundLayer>,
    pub culling: Box<dyn SpatialCulling>,
    pub territories: Box<dyn OverlayLayer>,
    pub waypoints: Box<dyn WaypointLayer>,
    pub orbital: Box<dyn OrbitalLayer>,
    pub markers: Box<dyn MarkerLayer>,
    pub worm_holes: Box<dyn OverlayLayer>,
    pub highlights: Box<dyn HighlightLayer>,
    pub paths: Box<dyn PathLayer>,
    pub ruler: Box<dyn RulerLayer>,
    pub player_names: Box<dyn PlayerNamesLayer>,
    pub tooltip: Box<dyn TooltipLayer>,
}

impl Default for MapLayers {
    fn default() -> Self {
        Self {
            background: Box::new(NullLayer),
            culling: Box::new(NullLayer),
            territories: Box::new(NullLayer),
            waypoints: Box::new(NullLayer),
            orbital: Box::new(NullLayer),
            markers: Box::new(NullLayer),
            worm_holes: Box::new(NullLayer),
            highlights: Box::new(NullLayer),
            paths: Box::new(NullLayer),
            ruler: Box::new(NullLayer),
            player_names: Box::new(NullLayer),
            tooltip: Box::new(NullLayer),
        }
    }
}
