use serde::{Deserialize, Serialize};

use crate::api::types::CarrierId;

/// The exclusive interaction context that decides where clicks go.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Mode {
    /// Normal galaxy view: clicks select objects.
    #[default]
    Galaxy,
    /// Distance measuring: clicks add ruler points.
    Ruler,
    /// Route editing for one carrier: clicks place waypoints.
    Waypoints { carrier: CarrierId },
}

/// Payload-free discriminant of [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Galaxy,
    Ruler,
    Waypoints,
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Galaxy => ModeKind::Galaxy,
            Mode::Ruler => ModeKind::Ruler,
            Mode::Waypoints { .. } => ModeKind::Waypoints,
        }
    }

    pub fn waypoints(carrier: impl Into<CarrierId>) -> Self {
        Mode::Waypoints { carrier: carrier.into() }
    }

    /// The carrier whose route is being edited, in waypoints mode.
    pub fn waypoint_carrier(&self) -> Option<&CarrierId> {
        match self {
            Mode::Waypoints { carrier } => Some(carrier),
            _ => None,
        }
    }
}

/// Side effects of switching from one mode to another, beyond the
/// unconditional clearing of selections and overlays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeTransition {
    /// Carrier to draw an editable route for. Carriers lose interactivity.
    pub enter_waypoints: Option<CarrierId>,
    /// Waypoints mode was left; carriers regain interactivity.
    pub leave_waypoints: bool,
    /// Ruler points should be drawn.
    pub enter_ruler: bool,
}

impl ModeTransition {
    pub fn between(from: &Mode, to: &Mode) -> Self {
        let was_waypoints = from.kind() == ModeKind::Waypoints;
        Self {
            enter_waypoints: to.waypoint_carrier().cloned(),
            leave_waypoints: was_waypoints && to.kind() != ModeKind::Waypoints,
            enter_ruler: to.kind() == ModeKind::Ruler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_galaxy() {
        assert_eq!(Mode::default(), Mode::Galaxy);
    }

    #[test]
    fn entering_waypoints_names_the_carrier() {
        let t = ModeTransition::between(&Mode::Galaxy, &Mode::waypoints("c1"));
        assert_eq!(t.enter_waypoints, Some(CarrierId::from("c1")));
        assert!(!t.leave_waypoints);
        assert!(!t.enter_ruler);
    }

    #[test]
    fn leaving_waypoints_restores_interactivity() {
        let t = ModeTransition::between(&Mode::waypoints("c1"), &Mode::Ruler);
        assert!(t.leave_waypoints);
        assert!(t.enter_ruler);
        assert_eq!(t.enter_waypoints, None);
    }

    #[test]
    fn waypoints_to_waypoints_keeps_carriers_locked() {
        let t = ModeTransition::between(&Mode::waypoints("c1"), &Mode::waypoints("c2"));
        assert!(!t.leave_waypoints);
        assert_eq!(t.enter_waypoints, Some(CarrierId::from("c2")));
    }

    #[test]
    fn same_mode_transition_is_not_short_circuited() {
        let t = ModeTransition::between(&Mode::Ruler, &Mode::Ruler);
        assert!(t.enter_ruler);
    }

    #[test]
    fn mode_json_is_tagged() {
        let mode: Mode = serde_json::from_str(r#"{ "mode": "waypoints", "carrier": "c9" }"#).unwrap();
        assert_eq!(mode, Mode::waypoints("c9"));
        let galaxy: Mode = serde_json::from_str(r#"{ "mode": "galaxy" }"#).unwrap();
        assert_eq!(galaxy, Mode::Galaxy);
    }
}
