use log::debug;

use crate::api::error::MapError;
use crate::api::map::MapEngine;
use crate::bridge::protocol::MapCommand;
use crate::components::proxy::ProxyFactory;

impl<F: ProxyFactory> MapEngine<F> {
    /// Apply one application command.
    pub fn execute(&mut self, command: MapCommand) -> Result<(), MapError> {
        if self.is_destroyed() {
            return Err(MapError::Destroyed);
        }
        debug!("Executing {}", command.name());

        match command {
            MapCommand::PanToLocation { location } => self.pan_to_location(location),
            MapCommand::PanToObject { object } => self.pan_to_object(&object)?,
            MapCommand::PanToUser => self.pan_to_user(),
            MapCommand::PanToPlayer { player } => self.pan_to_player(&player),
            MapCommand::ClearHighlightedLocations => self.layers.highlights.clear(),
            MapCommand::HighlightLocation { location, opacity } => {
                self.layers.highlights.highlight_location(location, opacity)
            }
            MapCommand::ClickStar { star } => self.click_star(&star)?,
            MapCommand::ClickCarrier { carrier } => self.click_carrier(&carrier)?,
            MapCommand::RemoveLastRulerPoint => self.layers.ruler.remove_last_point(),
            MapCommand::ShowIgnoreBulkUpgrade => self.show_ignore_bulk_upgrade(),
            MapCommand::HideIgnoreBulkUpgrade => self.hide_ignore_bulk_upgrade(),
            MapCommand::UnselectAllCarriers => self.unselect_all_carriers(),
            MapCommand::UnselectAllStars => self.unselect_all_stars(),
            MapCommand::ResetMode => self.reset_mode(),
            MapCommand::SetMode { mode } => self.set_mode(mode)?,
            MapCommand::UpdateWaypoints => self.draw_waypoints(),
            MapCommand::ProceedClick { click } => self.proceed_click(click)?,
        }
        Ok(())
    }
}
