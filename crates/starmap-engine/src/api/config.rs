use serde::{Deserialize, Serialize};

/// Max screen distance (pixels) between pointer-down and click for a tap.
pub const DRAG_THRESHOLD_PX: f32 = 8.0;
/// World-unit radius searched for overlapping objects on click.
pub const MULTI_SELECT_RADIUS: f32 = 10.0;
/// Minimum zoom percentage delta that counts as a zoom change.
pub const ZOOM_HYSTERESIS: f32 = 1.0 / 128.0;

/// Engine tuning. Defaults match the behavior the game UI expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapConfig {
    /// Pointer travel (screen pixels) above which a click is treated as a drag.
    pub drag_threshold_px: f32,
    /// Radius (world units) for proximity multi-select.
    pub multi_select_radius: f32,
    /// Zoom percentage delta below which zoom is considered unchanged.
    pub zoom_hysteresis: f32,
    /// Frame cap used when the user has not chosen one.
    pub default_fps_limit: u32,
    /// Draw the transient "selected" circle on clicks.
    pub selection_marker: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: DRAG_THRESHOLD_PX,
            multi_select_radius: MULTI_SELECT_RADIUS,
            zoom_hysteresis: ZOOM_HYSTERESIS,
            default_fps_limit: 60,
            selection_marker: true,
        }
    }
}

impl MapConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Per-user map preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserMapSettings {
    /// Frames per second cap. None falls back to `MapConfig::default_fps_limit`.
    pub fps_limit: Option<u32>,
    /// When set, pre-click interception only happens while the modifier key
    /// is held; plain clicks go straight through. When unset every click is
    /// intercepted.
    pub pre_click_requires_modifier: bool,
    /// Draw the galaxy center crosshair even without orbital mechanics.
    pub galaxy_center_always_visible: bool,
}

impl Default for UserMapSettings {
    fn default() -> Self {
        Self {
            fps_limit: None,
            pre_click_requires_modifier: true,
            galaxy_center_always_visible: false,
        }
    }
}

impl UserMapSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether a click should go through the pre-click notification first.
    pub fn intercepts_click(&self, modifier_held: bool) -> bool {
        !self.pre_click_requires_modifier || modifier_held
    }

    pub fn effective_fps_limit(&self, config: &MapConfig) -> u32 {
        self.fps_limit.unwrap_or(config.default_fps_limit)
    }
}
