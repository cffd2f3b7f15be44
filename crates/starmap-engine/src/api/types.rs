use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Stable identifier of a star, as issued by the game server.
    StarId
);
string_id!(
    /// Stable identifier of a carrier.
    CarrierId
);
string_id!(
    /// Stable identifier of a player.
    PlayerId
);

/// Kind of selectable map object.
///
/// The declaration order is the disambiguation order: stars rank before carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Star,
    Carrier,
}

/// Reference to a star or carrier by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum ObjectRef {
    Star(StarId),
    Carrier(CarrierId),
}

impl ObjectRef {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectRef::Star(_) => ObjectKind::Star,
            ObjectRef::Carrier(_) => ObjectKind::Carrier,
        }
    }
}

/// Authoritative star data from a galaxy snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarData {
    pub id: StarId,
    pub name: String,
    pub location: Vec2,
    #[serde(default)]
    pub owned_by_player_id: Option<PlayerId>,
    #[serde(default)]
    pub worm_hole_to_star_id: Option<StarId>,
}

impl StarData {
    pub fn new(id: impl Into<StarId>, name: impl Into<String>, location: Vec2) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            owned_by_player_id: None,
            worm_hole_to_star_id: None,
        }
    }

    pub fn with_owner(mut self, player: impl Into<PlayerId>) -> Self {
        self.owned_by_player_id = Some(player.into());
        self
    }

    pub fn with_worm_hole_to(mut self, star: impl Into<StarId>) -> Self {
        self.worm_hole_to_star_id = Some(star.into());
        self
    }
}

/// Authoritative carrier data from a galaxy snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierData {
    pub id: CarrierId,
    pub name: String,
    pub location: Vec2,
    #[serde(default)]
    pub owned_by_player_id: Option<PlayerId>,
    /// Star the carrier is currently in orbit of, if any.
    #[serde(default)]
    pub orbiting: Option<StarId>,
}

impl CarrierData {
    pub fn new(id: impl Into<CarrierId>, name: impl Into<String>, location: Vec2) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            owned_by_player_id: None,
            orbiting: None,
        }
    }

    pub fn with_owner(mut self, player: impl Into<PlayerId>) -> Self {
        self.owned_by_player_id = Some(player.into());
        self
    }

    pub fn orbiting(mut self, star: impl Into<StarId>) -> Self {
        self.orbiting = Some(star.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerData {
    pub id: PlayerId,
    pub alias: String,
}

/// Game-level switches that change which map layers exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalaxySettings {
    #[serde(default)]
    pub orbital_mechanics: bool,
    #[serde(default)]
    pub random_worm_holes: bool,
}

/// A star or carrier with its full data, as reported to listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum MapObject {
    Star(StarData),
    Carrier(CarrierData),
}

impl MapObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            MapObject::Star(_) => ObjectKind::Star,
            MapObject::Carrier(_) => ObjectKind::Carrier,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MapObject::Star(s) => &s.name,
            MapObject::Carrier(c) => &c.name,
        }
    }

    pub fn location(&self) -> Vec2 {
        match self {
            MapObject::Star(s) => s.location,
            MapObject::Carrier(c) => c.location,
        }
    }
}

/// A waypoint the user placed while editing a carrier route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempWaypoint {
    pub carrier: CarrierId,
    pub source: Option<StarId>,
    pub destination: StarId,
}

/// A point on the measuring ruler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulerPoint {
    pub object: ObjectRef,
    pub location: Vec2,
}

/// The world as the map sees it: everything the current player can scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalaxySnapshot {
    #[serde(default)]
    pub stars: Vec<StarData>,
    #[serde(default)]
    pub carriers: Vec<CarrierData>,
    #[serde(default)]
    pub players: Vec<PlayerData>,
    /// The player controlled by the viewing user, if they are in the game.
    #[serde(default)]
    pub user_player_id: Option<PlayerId>,
    #[serde(default)]
    pub galaxy_center: Option<Vec2>,
    #[serde(default)]
    pub settings: GalaxySettings,
}

impl GalaxySnapshot {
    /// Parse a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn star(&self, id: &StarId) -> Option<&StarData> {
        self.stars.iter().find(|s| &s.id == id)
    }

    pub fn carrier(&self, id: &CarrierId) -> Option<&CarrierData> {
        self.carriers.iter().find(|c| &c.id == id)
    }

    pub fn player(&self, id: &PlayerId) -> Option<&PlayerData> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn user_player(&self) -> Option<&PlayerData> {
        self.user_player_id.as_ref().and_then(|id| self.player(id))
    }

    pub fn star_owner(&self, star: &StarData) -> Option<&PlayerData> {
        star.owned_by_player_id.as_ref().and_then(|id| self.player(id))
    }

    /// Mean location of every star the player owns. None if they own nothing.
    pub fn player_empire_center(&self, player: &PlayerId) -> Option<Vec2> {
        let (sum, count) = self
            .stars
            .iter()
            .filter(|s| s.owned_by_player_id.as_ref() == Some(player))
            .fold((Vec2::ZERO, 0u32), |(sum, n), s| (sum + s.location, n + 1));

        (count > 0).then(|| sum / count as f32)
    }

    /// Center of the bounding box around all stars (origin for an empty galaxy).
    pub fn bounds_center(&self) -> Vec2 {
        let mut iter = self.stars.iter().map(|s| s.location);
        let Some(first) = iter.next() else {
            return Vec2::ZERO;
        };
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        (min + max) / 2.0
    }

    pub fn orbital_map_enabled(&self) -> bool {
        self.galaxy_center.is_some() && self.settings.orbital_mechanics
    }

    pub fn worm_holes_enabled(&self) -> bool {
        self.settings.random_worm_holes
            || self.stars.iter().any(|s| s.worm_hole_to_star_id.is_some())
    }
}
