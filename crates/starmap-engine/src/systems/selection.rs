//! Click routing and selection state.
//!
//! At most one star and at most one carrier are selected, never both. Every
//! path that selects something goes through `set_star_selected` or
//! `set_carrier_selected`, which clear the rest first.

use glam::Vec2;
use log::{debug, warn};

use crate::api::error::MapError;
use crate::api::map::MapEngine;
use crate::api::types::{CarrierId, MapObject, StarData, StarId};
use crate::bridge::protocol::{DeferredClick, MapNotification};
use crate::components::proxy::{MapObjectProxy, ProxyFactory, StarProxy};
use crate::core::mode::ModeKind;
use crate::input::gesture::PointerInfo;
use crate::input::queue::{CarrierClick, MapInput, StarClick};
use crate::systems::multi_select::find_close_objects;

impl<F: ProxyFactory> MapEngine<F> {
    /// Dispatch one collaborator event.
    pub(crate) fn handle_input(&mut self, event: MapInput) {
        let result = match event {
            MapInput::PointerDown { x, y } => {
                self.pointer_down(Vec2::new(x, y));
                Ok(())
            }
            MapInput::StarClicked(click) => self.on_star_clicked(click),
            MapInput::StarDefaultClicked(click) => self.on_star_default_clicked(click),
            MapInput::StarRightClicked { star, pointer } => {
                self.on_star_right_clicked(&star, pointer)
            }
            MapInput::CarrierClicked(click) => self.on_carrier_clicked(click),
            MapInput::CarrierRightClicked { carrier, pointer } => {
                self.on_carrier_right_clicked(&carrier, pointer)
            }
            MapInput::StarMouseOver(star) => self.on_star_mouse_over(&star),
            MapInput::StarMouseOut(star) => self.on_star_mouse_out(&star),
            MapInput::CarrierMouseOver(carrier) => self.on_carrier_mouse_over(&carrier),
            MapInput::CarrierMouseOut(carrier) => self.on_carrier_mouse_out(&carrier),
            MapInput::WaypointCreated(waypoint) => {
                self.channel.notify(MapNotification::WaypointCreated { waypoint });
                Ok(())
            }
            MapInput::WaypointOutOfRange => {
                self.channel.notify(MapNotification::WaypointOutOfRange);
                Ok(())
            }
            MapInput::RulerPointCreated(ruler_point) => {
                self.channel
                    .notify(MapNotification::RulerPointCreated { ruler_point });
                Ok(())
            }
            MapInput::RulerPointRemoved(ruler_point) => {
                self.channel
                    .notify(MapNotification::RulerPointRemoved { ruler_point });
                Ok(())
            }
            MapInput::RulerPointsCleared => {
                self.channel.notify(MapNotification::RulerPointsCleared);
                Ok(())
            }
        };

        if let Err(err) = result {
            warn!("Dropped map input: {err}");
        }
    }

    fn is_drag(&self, pointer: Option<&PointerInfo>) -> bool {
        pointer.is_some_and(|p| self.gesture.is_drag(p.screen, self.config.drag_threshold_px))
    }

    fn intercepts(&self, pointer: Option<&PointerInfo>) -> bool {
        let modifier = pointer.is_some_and(|p| p.modifier);
        self.settings.intercepts_click(modifier)
    }

    // ---- Stars ----

    /// Left click on a star. Drags are ignored; otherwise the click is either
    /// held back behind a pre-click notification or applied right away.
    pub fn on_star_clicked(&mut self, click: StarClick) -> Result<(), MapError> {
        if self.is_drag(click.pointer.as_ref()) {
            debug!("Star {} click was a drag", click.star);
            return Ok(());
        }

        let star = self.star_data(&click.star)?;
        if self.intercepts(click.pointer.as_ref()) {
            let owning_player = self.galaxy.star_owner(&star).cloned();
            self.channel.notify(MapNotification::PreStarClicked {
                star,
                owning_player,
                proceed: DeferredClick::Star {
                    star: click.star,
                    try_multi_select: click.try_multi_select,
                },
            });
            return Ok(());
        }

        self.select_star(&click.star, click.try_multi_select)
    }

    /// Left click that bypasses pre-click interception.
    pub fn on_star_default_clicked(&mut self, click: StarClick) -> Result<(), MapError> {
        if self.is_drag(click.pointer.as_ref()) {
            return Ok(());
        }
        self.select_star(&click.star, click.try_multi_select)
    }

    pub fn on_star_right_clicked(
        &mut self,
        id: &StarId,
        pointer: Option<PointerInfo>,
    ) -> Result<(), MapError> {
        if self.is_drag(pointer.as_ref()) {
            debug!("Star {id} right click was a drag");
            return Ok(());
        }

        let star = self.star_data(id)?;
        if self.intercepts(pointer.as_ref()) {
            let owning_player = self.galaxy.star_owner(&star).cloned();
            self.channel.notify(MapNotification::PreStarRightClicked {
                star,
                owning_player,
                proceed: DeferredClick::StarRight { star: id.clone() },
            });
            return Ok(());
        }

        self.right_click_star(star);
        Ok(())
    }

    fn right_click_star(&mut self, star: StarData) {
        if self.mode.kind() == ModeKind::Galaxy {
            self.channel
                .notify(MapNotification::StarRightClicked { star });
        }
    }

    /// Run a click a pre-click listener chose to let through.
    pub fn proceed_click(&mut self, click: DeferredClick) -> Result<(), MapError> {
        match click {
            DeferredClick::Star {
                star,
                try_multi_select,
            } => self.select_star(&star, try_multi_select),
            DeferredClick::StarRight { star } => {
                let data = self.star_data(&star)?;
                self.right_click_star(data);
                Ok(())
            }
        }
    }

    /// The default star click action, routed by mode.
    pub fn select_star(&mut self, id: &StarId, try_multi_select: bool) -> Result<(), MapError> {
        let star = self.star_data(id)?;

        match self.mode.kind() {
            ModeKind::Galaxy => {
                self.unselect_all_carriers();
                self.unselect_all_stars_except(id);

                if !try_multi_select || !self.try_multi_select(star.location) {
                    self.toggle_star(id);
                    self.channel
                        .notify(MapNotification::StarClicked { star: star.clone() });
                }
            }
            ModeKind::Waypoints => self.layers.waypoints.on_star_clicked(&star),
            ModeKind::Ruler => self.layers.ruler.on_star_clicked(&star),
        }

        self.draw_selection_marker(star.location);
        Ok(())
    }

    /// Synthesized click (no pointer, no multi-select) that always leaves the
    /// star selected.
    pub fn click_star(&mut self, id: &StarId) -> Result<(), MapError> {
        if !self.stars.contains(id) {
            return Err(MapError::UnknownStar(id.clone()));
        }
        self.on_star_clicked(StarClick {
            star: id.clone(),
            pointer: None,
            try_multi_select: false,
        })?;
        self.set_star_selected(id, true);
        Ok(())
    }

    // ---- Carriers ----

    /// Left click on a carrier. Carrier clicks are never intercepted.
    pub fn on_carrier_clicked(&mut self, click: CarrierClick) -> Result<(), MapError> {
        if self.is_drag(click.pointer.as_ref()) {
            debug!("Carrier {} click was a drag", click.carrier);
            return Ok(());
        }

        let carrier = self.carrier_data(&click.carrier)?;
        match self.mode.kind() {
            ModeKind::Galaxy => {
                self.unselect_all_stars();
                self.unselect_all_carriers_except(&click.carrier);

                if self.toggle_carrier(&click.carrier) {
                    self.layers.waypoints.draw_carrier(&carrier, false);
                } else {
                    self.layers.waypoints.clear();
                }

                if !click.try_multi_select || !self.try_multi_select(carrier.location) {
                    self.channel.notify(MapNotification::CarrierClicked {
                        carrier: carrier.clone(),
                    });
                } else {
                    // The pick list wins; undo the tentative selection.
                    self.set_carrier_selected(&click.carrier, false);
                    self.layers.waypoints.clear();
                }
            }
            ModeKind::Waypoints => self.layers.waypoints.on_carrier_clicked(&carrier),
            ModeKind::Ruler => self.layers.ruler.on_carrier_clicked(&carrier),
        }

        self.draw_selection_marker(carrier.location);
        Ok(())
    }

    pub fn on_carrier_right_clicked(
        &mut self,
        id: &CarrierId,
        pointer: Option<PointerInfo>,
    ) -> Result<(), MapError> {
        if self.is_drag(pointer.as_ref()) {
            return Ok(());
        }
        let carrier = self.carrier_data(id)?;
        if self.mode.kind() == ModeKind::Galaxy {
            self.channel
                .notify(MapNotification::CarrierRightClicked { carrier });
        }
        Ok(())
    }

    /// Synthesized carrier click that always leaves the carrier selected.
    pub fn click_carrier(&mut self, id: &CarrierId) -> Result<(), MapError> {
        if !self.carriers.contains(id) {
            return Err(MapError::UnknownCarrier(id.clone()));
        }
        self.on_carrier_clicked(CarrierClick {
            carrier: id.clone(),
            pointer: None,
            try_multi_select: false,
        })?;
        self.set_carrier_selected(id, true);
        Ok(())
    }

    // ---- Multi-select ----

    /// Look for overlapping objects around `location`. With more than one
    /// hit, selects the nearest-ranked star (if any), publishes the ranked
    /// list and returns true. Returns false when the click is unambiguous.
    pub fn try_multi_select(&mut self, location: Vec2) -> bool {
        let objects = find_close_objects(
            location,
            self.config.multi_select_radius,
            self.stars.iter().map(|e| &e.data),
            self.carriers.iter().map(|e| &e.data),
        );
        if objects.len() <= 1 {
            return false;
        }

        let first_star = objects.iter().find_map(|o| match &o.object {
            MapObject::Star(star) => Some(star.id.clone()),
            MapObject::Carrier(_) => None,
        });
        if let Some(star) = first_star {
            self.set_star_selected(&star, true);
        }

        debug!("{} objects near {location}", objects.len());
        self.channel
            .notify(MapNotification::ObjectsClicked { objects });
        true
    }

    // ---- Selection state ----

    /// Selecting a star clears every carrier and every other star first.
    pub(crate) fn set_star_selected(&mut self, id: &StarId, selected: bool) {
        if selected {
            self.unselect_all_carriers();
            self.unselect_all_stars_except(id);
        }

        let orbital = self.galaxy.orbital_map_enabled();
        let Some(entry) = self.stars.get_mut(id) else {
            return;
        };
        if entry.selected == selected {
            return;
        }

        entry.selected = selected;
        if selected {
            entry.proxy.select();
            if orbital {
                self.layers.orbital.draw_star(&entry.data);
            }
        } else {
            entry.proxy.unselect();
            if orbital {
                self.layers.orbital.clear();
            }
        }
    }

    /// Selecting a carrier clears every star and every other carrier first.
    pub(crate) fn set_carrier_selected(&mut self, id: &CarrierId, selected: bool) {
        if selected {
            self.unselect_all_stars();
            self.unselect_all_carriers_except(id);
        }

        let orbital = self.galaxy.orbital_map_enabled();
        let Some(entry) = self.carriers.get_mut(id) else {
            return;
        };
        if entry.selected == selected {
            return;
        }

        entry.selected = selected;
        if selected {
            entry.proxy.select();
            if orbital {
                self.layers.orbital.draw_carrier(&entry.data);
            }
        } else {
            entry.proxy.unselect();
            if orbital {
                self.layers.orbital.clear();
            }
        }
    }

    /// Flip a star's selection. Returns the new state.
    fn toggle_star(&mut self, id: &StarId) -> bool {
        let selected = !self.is_star_selected(id);
        self.set_star_selected(id, selected);
        selected
    }

    fn toggle_carrier(&mut self, id: &CarrierId) -> bool {
        let selected = !self.is_carrier_selected(id);
        self.set_carrier_selected(id, selected);
        selected
    }

    pub fn unselect_all_stars(&mut self) {
        for id in self.stars.selected_ids() {
            self.set_star_selected(&id, false);
        }
    }

    fn unselect_all_stars_except(&mut self, keep: &StarId) {
        for id in self.stars.selected_ids() {
            if &id != keep {
                self.set_star_selected(&id, false);
            }
        }
    }

    /// Unselects every carrier. The route overlay goes with the selection.
    pub fn unselect_all_carriers(&mut self) {
        let selected = self.carriers.selected_ids();
        if selected.is_empty() {
            return;
        }
        for id in selected {
            self.set_carrier_selected(&id, false);
        }
        self.layers.waypoints.clear();
    }

    fn unselect_all_carriers_except(&mut self, keep: &CarrierId) {
        let others: Vec<CarrierId> = self
            .carriers
            .selected_ids()
            .into_iter()
            .filter(|id| id != keep)
            .collect();
        if others.is_empty() {
            return;
        }
        for id in others {
            self.set_carrier_selected(&id, false);
        }
        self.layers.waypoints.clear();
    }

    // ---- Hover ----

    fn on_star_mouse_over(&mut self, id: &StarId) -> Result<(), MapError> {
        let entry = self
            .stars
            .get(id)
            .ok_or_else(|| MapError::UnknownStar(id.clone()))?;
        self.layers.tooltip.draw_star_tooltip(&entry.data);
        Ok(())
    }

    fn on_star_mouse_out(&mut self, _id: &StarId) -> Result<(), MapError> {
        self.layers.tooltip.clear();
        Ok(())
    }

    /// Hovering a carrier also highlights the star it orbits.
    fn on_carrier_mouse_over(&mut self, id: &CarrierId) -> Result<(), MapError> {
        let entry = self
            .carriers
            .get(id)
            .ok_or_else(|| MapError::UnknownCarrier(id.clone()))?;

        if let Some(star) = entry.data.orbiting.as_ref().and_then(|s| self.stars.get_mut(s)) {
            star.proxy.on_mouse_over();
        }
        self.layers.tooltip.draw_carrier_tooltip(&entry.data);
        Ok(())
    }

    fn on_carrier_mouse_out(&mut self, id: &CarrierId) -> Result<(), MapError> {
        let orbiting = self.carriers.get(id).and_then(|e| e.data.orbiting.clone());
        if let Some(star) = orbiting.and_then(|s| self.stars.get_mut(&s)) {
            star.proxy.on_mouse_out();
        }
        self.layers.tooltip.clear();
        Ok(())
    }
}
