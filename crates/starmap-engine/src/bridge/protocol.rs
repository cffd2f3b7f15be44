//! Name-keyed messages exchanged between the map engine and the application.
//!
//! JSON shape: `{ "name": "<eventName>", "payload": { ... } }`. Payload-free
//! events omit `payload`. Names must stay in sync with the UI's event bus.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{
    CarrierData, CarrierId, ObjectRef, PlayerData, PlayerId, RulerPoint, StarData, StarId,
    TempWaypoint,
};
use crate::core::mode::Mode;
use crate::systems::multi_select::CloseObject;

fn full_opacity() -> f32 {
    1.0
}

/// The default action a pre-click notification is holding back.
/// The listener sends it back in [`MapCommand::ProceedClick`] to let it run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DeferredClick {
    #[serde(rename_all = "camelCase")]
    Star { star: StarId, try_multi_select: bool },
    StarRight { star: StarId },
}

/// Inbound commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "payload", rename_all = "camelCase")]
pub enum MapCommand {
    PanToLocation { location: Vec2 },
    PanToObject { object: ObjectRef },
    PanToUser,
    PanToPlayer { player: PlayerId },
    ClearHighlightedLocations,
    HighlightLocation {
        location: Vec2,
        #[serde(default = "full_opacity")]
        opacity: f32,
    },
    ClickStar { star: StarId },
    ClickCarrier { carrier: CarrierId },
    RemoveLastRulerPoint,
    ShowIgnoreBulkUpgrade,
    HideIgnoreBulkUpgrade,
    UnselectAllCarriers,
    UnselectAllStars,
    ResetMode,
    SetMode { mode: Mode },
    UpdateWaypoints,
    ProceedClick { click: DeferredClick },
}

impl MapCommand {
    /// Every command name the engine listens for.
    pub const NAMES: [&'static str; 17] = [
        "panToLocation",
        "panToObject",
        "panToUser",
        "panToPlayer",
        "clearHighlightedLocations",
        "highlightLocation",
        "clickStar",
        "clickCarrier",
        "removeLastRulerPoint",
        "showIgnoreBulkUpgrade",
        "hideIgnoreBulkUpgrade",
        "unselectAllCarriers",
        "unselectAllStars",
        "resetMode",
        "setMode",
        "updateWaypoints",
        "proceedClick",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MapCommand::PanToLocation { .. } => "panToLocation",
            MapCommand::PanToObject { .. } => "panToObject",
            MapCommand::PanToUser => "panToUser",
            MapCommand::PanToPlayer { .. } => "panToPlayer",
            MapCommand::ClearHighlightedLocations => "clearHighlightedLocations",
            MapCommand::HighlightLocation { .. } => "highlightLocation",
            MapCommand::ClickStar { .. } => "clickStar",
            MapCommand::ClickCarrier { .. } => "clickCarrier",
            MapCommand::RemoveLastRulerPoint => "removeLastRulerPoint",
            MapCommand::ShowIgnoreBulkUpgrade => "showIgnoreBulkUpgrade",
            MapCommand::HideIgnoreBulkUpgrade => "hideIgnoreBulkUpgrade",
            MapCommand::UnselectAllCarriers => "unselectAllCarriers",
            MapCommand::UnselectAllStars => "unselectAllStars",
            MapCommand::ResetMode => "resetMode",
            MapCommand::SetMode { .. } => "setMode",
            MapCommand::UpdateWaypoints => "updateWaypoints",
            MapCommand::ProceedClick { .. } => "proceedClick",
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Outbound notifications reporting what the user did on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "payload", rename_all = "camelCase")]
pub enum MapNotification {
    StarClicked { star: StarData },
    #[serde(rename_all = "camelCase")]
    PreStarClicked {
        star: StarData,
        owning_player: Option<PlayerData>,
        proceed: DeferredClick,
    },
    StarRightClicked { star: StarData },
    #[serde(rename_all = "camelCase")]
    PreStarRightClicked {
        star: StarData,
        owning_player: Option<PlayerData>,
        proceed: DeferredClick,
    },
    CarrierClicked { carrier: CarrierData },
    CarrierRightClicked { carrier: CarrierData },
    WaypointCreated { waypoint: TempWaypoint },
    WaypointOutOfRange,
    #[serde(rename_all = "camelCase")]
    RulerPointCreated { ruler_point: RulerPoint },
    #[serde(rename_all = "camelCase")]
    RulerPointRemoved { ruler_point: RulerPoint },
    RulerPointsCleared,
    /// Several objects overlap the click; the UI shows a pick list.
    ObjectsClicked { objects: Vec<CloseObject> },
}

impl MapNotification {
    pub fn name(&self) -> &'static str {
        match self {
            MapNotification::StarClicked { .. } => "starClicked",
            MapNotification::PreStarClicked { .. } => "preStarClicked",
            MapNotification::StarRightClicked { .. } => "starRightClicked",
            MapNotification::PreStarRightClicked { .. } => "preStarRightClicked",
            MapNotification::CarrierClicked { .. } => "carrierClicked",
            MapNotification::CarrierRightClicked { .. } => "carrierRightClicked",
            MapNotification::WaypointCreated { .. } => "waypointCreated",
            MapNotification::WaypointOutOfRange => "waypointOutOfRange",
            MapNotification::RulerPointCreated { .. } => "rulerPointCreated",
            MapNotification::RulerPointRemoved { .. } => "rulerPointRemoved",
            MapNotification::RulerPointsCleared => "rulerPointsCleared",
            MapNotification::ObjectsClicked { .. } => "objectsClicked",
        }
    }
}
