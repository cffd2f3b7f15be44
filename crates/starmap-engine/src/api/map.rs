use glam::Vec2;
use log::{debug, info, warn};

use crate::api::config::{MapConfig, UserMapSettings};
use crate::api::error::MapError;
use crate::api::types::{
    CarrierData, CarrierId, GalaxySnapshot, ObjectRef, PlayerId, StarData, StarId,
};
use crate::bridge::channel::{MapChannel, Subscription};
use crate::bridge::protocol::MapCommand;
use crate::components::proxy::{CarrierProxy, MapObjectProxy, ProxyFactory, StarProxy};
use crate::core::mode::{Mode, ModeTransition};
use crate::core::registry::ProxyRegistry;
use crate::core::viewport::{TickFrame, Viewport, ZoomTracker};
use crate::input::gesture::PointerGesture;
use crate::input::queue::ProxySink;
use crate::renderer::traits::MapLayers;

/// Everything the engine needs at construction, besides its collaborators.
#[derive(Debug, Clone)]
pub struct MapSetup {
    pub galaxy: GalaxySnapshot,
    pub settings: UserMapSettings,
    pub config: MapConfig,
    pub viewport: Viewport,
}

impl MapSetup {
    pub fn new(galaxy: GalaxySnapshot) -> Self {
        Self {
            galaxy,
            settings: UserMapSettings::default(),
            config: MapConfig::default(),
            viewport: Viewport::new(1280.0, 720.0),
        }
    }

    pub fn with_settings(mut self, settings: UserMapSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_config(mut self, config: MapConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }
}

/// The map orchestrator.
///
/// Owns one proxy per visible star and carrier, the sub-layers, the
/// interaction mode and the viewport. Input from proxies and layers arrives
/// through the shared [`ProxySink`]; application commands arrive through the
/// [`MapChannel`]. Call [`MapEngine::pump`] then [`MapEngine::on_tick`] once
/// per frame.
pub struct MapEngine<F: ProxyFactory> {
    pub(crate) config: MapConfig,
    pub(crate) settings: UserMapSettings,
    pub(crate) galaxy: GalaxySnapshot,
    pub(crate) factory: F,
    pub(crate) stars: ProxyRegistry<F::Star>,
    pub(crate) carriers: ProxyRegistry<F::Carrier>,
    pub(crate) layers: MapLayers,
    pub(crate) mode: Mode,
    pub(crate) viewport: Viewport,
    pub(crate) zoom: ZoomTracker,
    pub(crate) gesture: PointerGesture,
    pub(crate) sink: ProxySink,
    pub(crate) channel: MapChannel,
    subscription: Subscription,
    worm_holes: bool,
    destroyed: bool,
}

impl<F: ProxyFactory> MapEngine<F> {
    /// Build proxies for every object in the snapshot, set up the sub-layers
    /// and start listening for application commands.
    pub fn new(factory: F, layers: MapLayers, channel: MapChannel, setup: MapSetup) -> Self {
        let MapSetup {
            galaxy,
            settings,
            config,
            viewport,
        } = setup;

        let subscription = channel.subscribe(&MapCommand::NAMES);
        let zoom = ZoomTracker::new(config.zoom_hysteresis);
        let worm_holes = galaxy.worm_holes_enabled();

        let mut engine = Self {
            config,
            settings,
            galaxy,
            factory,
            stars: ProxyRegistry::new(),
            carriers: ProxyRegistry::new(),
            layers,
            mode: Mode::Galaxy,
            viewport,
            zoom,
            gesture: PointerGesture::new(),
            sink: ProxySink::new(),
            channel,
            subscription,
            worm_holes,
            destroyed: false,
        };

        engine.reconcile_proxies();
        engine.setup_layers();

        info!(
            "Map ready: {} stars, {} carriers",
            engine.stars.len(),
            engine.carriers.len()
        );
        engine
    }

    fn setup_layers(&mut self) {
        let galaxy = &self.galaxy;
        let settings = &self.settings;
        let layers = &mut self.layers;

        layers.culling.update(galaxy);
        layers.paths.update(galaxy, settings);

        layers.waypoints.setup(galaxy, settings);
        layers.waypoints.attach(self.sink.clone());
        layers.ruler.setup(galaxy, settings);
        layers.ruler.attach(self.sink.clone());

        layers.territories.setup(galaxy, settings);
        layers.territories.draw();
        layers.player_names.setup(galaxy, settings);
        layers.player_names.draw();
        layers.background.setup(galaxy, settings);
        layers.background.draw();

        if self.worm_holes {
            layers.worm_holes.setup(galaxy, settings);
            layers.worm_holes.draw();
        }
        if galaxy.orbital_map_enabled() {
            layers.orbital.setup(galaxy, settings);
        }
        layers.tooltip.setup(galaxy, settings);
    }

    /// Remove proxies for vanished objects, update survivors and create the
    /// rest. Vanished objects are also dropped from the culling index.
    fn reconcile_proxies(&mut self) {
        let Self {
            galaxy,
            factory,
            stars,
            carriers,
            layers,
            sink,
            mode,
            ..
        } = self;

        let star_report = stars.reconcile(&galaxy.stars, |data| factory.create_star(data), sink);
        for object in &star_report.removed_objects {
            layers.culling.remove_object(object);
        }

        let carrier_report =
            carriers.reconcile(&galaxy.carriers, |data| factory.create_carrier(data), sink);
        for object in &carrier_report.removed_objects {
            layers.culling.remove_object(object);
        }

        // New carriers join the current mode's interactivity.
        if mode.waypoint_carrier().is_some() {
            for id in &carrier_report.added {
                if let Some(entry) = carriers.get_mut(id) {
                    entry.interactive = false;
                    entry.proxy.disable_interactivity();
                }
            }
        }

        debug!(
            "Reconciled stars (+{} ~{} -{}) carriers (+{} ~{} -{})",
            star_report.added.len(),
            star_report.updated.len(),
            star_report.removed.len(),
            carrier_report.added.len(),
            carrier_report.updated.len(),
            carrier_report.removed.len()
        );
    }

    // ---- Accessors ----

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn settings(&self) -> &UserMapSettings {
        &self.settings
    }

    pub fn galaxy(&self) -> &GalaxySnapshot {
        &self.galaxy
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable viewport for the host's pan/zoom gestures. Changes are picked
    /// up on the next tick.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn zoom_percent(&self) -> f32 {
        self.zoom.zoom_percent()
    }

    pub fn channel(&self) -> &MapChannel {
        &self.channel
    }

    /// Queue handed to proxies and layers so they can report user input.
    pub fn sink(&self) -> &ProxySink {
        &self.sink
    }

    pub fn stars(&self) -> &ProxyRegistry<F::Star> {
        &self.stars
    }

    pub fn carriers(&self) -> &ProxyRegistry<F::Carrier> {
        &self.carriers
    }

    pub fn selected_stars(&self) -> Vec<StarId> {
        self.stars.selected_ids()
    }

    pub fn selected_carriers(&self) -> Vec<CarrierId> {
        self.carriers.selected_ids()
    }

    pub fn is_star_selected(&self, id: &StarId) -> bool {
        self.stars.get(id).is_some_and(|e| e.selected)
    }

    pub fn is_carrier_selected(&self, id: &CarrierId) -> bool {
        self.carriers.get(id).is_some_and(|e| e.selected)
    }

    /// None for an unknown carrier.
    pub fn is_carrier_interactive(&self, id: &CarrierId) -> Option<bool> {
        self.carriers.get(id).map(|e| e.interactive)
    }

    pub fn worm_holes_enabled(&self) -> bool {
        self.worm_holes
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub(crate) fn star_data(&self, id: &StarId) -> Result<StarData, MapError> {
        self.stars
            .get(id)
            .map(|e| e.data.clone())
            .ok_or_else(|| MapError::UnknownStar(id.clone()))
    }

    pub(crate) fn carrier_data(&self, id: &CarrierId) -> Result<CarrierData, MapError> {
        self.carriers
            .get(id)
            .map(|e| e.data.clone())
            .ok_or_else(|| MapError::UnknownCarrier(id.clone()))
    }

    // ---- Lifecycle ----

    /// Release everything the engine holds. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.destroyed {
            debug!("Map already destroyed");
            return;
        }
        self.destroyed = true;

        self.subscription.unsubscribe();
        self.layers.waypoints.detach();
        self.layers.ruler.detach();

        let stars = self.stars.destroy_all();
        let carriers = self.carriers.destroy_all();

        let layers = &mut self.layers;
        layers.background.destroy();
        layers.territories.destroy();
        layers.waypoints.destroy();
        layers.orbital.destroy();
        layers.worm_holes.destroy();
        layers.highlights.destroy();
        layers.ruler.destroy();
        layers.player_names.destroy();
        layers.tooltip.destroy();

        info!("Map destroyed ({stars} stars, {carriers} carriers)");
    }

    /// Full redraw of the map for the current mode.
    pub fn draw(&mut self) {
        if self.destroyed {
            return;
        }

        self.draw_galaxy_center();

        if self.mode.waypoint_carrier().is_some() {
            self.draw_waypoints();
        } else {
            self.draw_proxies();
            self.layers.waypoints.clear();
        }

        if self.mode == Mode::Ruler {
            self.layers.ruler.draw();
        } else {
            self.layers.ruler.clear();
        }

        self.refresh_zoom();
    }

    fn draw_proxies(&mut self) {
        let zoom = self.zoom.zoom_percent();
        for entry in self.stars.iter_mut() {
            entry.proxy.draw();
            entry.proxy.on_zoom_changing(zoom);
        }
        for entry in self.carriers.iter_mut() {
            entry.proxy.draw();
            entry.proxy.on_zoom_changing(zoom);
        }
    }

    /// Apply a fresh snapshot: reconcile proxies and rebuild the layers that
    /// depend on the galaxy state. Mode and selection are kept.
    pub fn reload(&mut self, galaxy: GalaxySnapshot, settings: UserMapSettings) {
        if self.destroyed {
            warn!("Ignoring reload on a destroyed map");
            return;
        }

        self.galaxy = galaxy;
        self.settings = settings;
        self.layers.paths.update(&self.galaxy, &self.settings);
        self.draw_galaxy_center();

        self.reconcile_proxies();
        self.draw_proxies();

        let galaxy = &self.galaxy;
        let settings = &self.settings;
        let layers = &mut self.layers;

        layers.territories.setup(galaxy, settings);
        layers.territories.draw();

        if galaxy.worm_holes_enabled() {
            self.worm_holes = true;
        }
        if self.worm_holes {
            layers.worm_holes.setup(galaxy, settings);
            layers.worm_holes.draw();
        }

        layers.player_names.setup(galaxy, settings);
        layers.player_names.draw();
        layers.background.setup(galaxy, settings);
        layers.background.draw();
        layers.waypoints.setup(galaxy, settings);
        layers.tooltip.setup(galaxy, settings);
        layers.culling.update(galaxy);

        self.refresh_zoom();
    }

    // ---- Frame ----

    /// Per-frame update. Culling always sees the movement flags; proxies and
    /// zoom-aware layers only hear about zoom when it actually changed.
    pub fn on_tick(&mut self, dt: f32) -> Option<TickFrame> {
        if self.destroyed {
            return None;
        }

        let frame = self.zoom.tick(&self.viewport);
        let layers = &mut self.layers;

        layers.background.on_tick(dt, &self.viewport.data());
        layers.culling.on_tick(
            frame.position_changing,
            frame.zoom_changing,
            frame.zoom_percent,
            &frame.bounds,
        );
        layers
            .paths
            .on_tick(frame.zoom_percent, &frame.bounds, frame.zoom_changing);
        layers
            .player_names
            .on_tick(frame.zoom_percent, frame.zoom_changing);

        if frame.zoom_changing {
            for entry in self.stars.iter_mut() {
                entry.proxy.on_zoom_changing(frame.zoom_percent);
            }
            for entry in self.carriers.iter_mut() {
                entry.proxy.on_zoom_changing(frame.zoom_percent);
            }
            self.refresh_layer_zoom(frame.zoom_percent);
        }

        Some(frame)
    }

    /// Recompute zoom from the viewport and push it to proxies and layers.
    pub fn refresh_zoom(&mut self) -> f32 {
        let zoom = self.zoom.refresh(&self.viewport);
        for entry in self.stars.iter_mut() {
            entry.proxy.refresh_zoom(zoom);
        }
        for entry in self.carriers.iter_mut() {
            entry.proxy.refresh_zoom(zoom);
        }
        self.refresh_layer_zoom(zoom);
        zoom
    }

    fn refresh_layer_zoom(&mut self, zoom: f32) {
        let layers = &mut self.layers;
        layers.territories.refresh_zoom(zoom);
        layers.player_names.refresh_zoom(zoom);
        layers.background.refresh_zoom(zoom);
        layers.worm_holes.refresh_zoom(zoom);
    }

    // ---- Mode ----

    /// Switch interaction mode. Entering waypoints mode requires a known
    /// carrier.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), MapError> {
        if self.destroyed {
            return Err(MapError::Destroyed);
        }
        if let Some(carrier) = mode.waypoint_carrier() {
            if !self.carriers.contains(carrier) {
                return Err(MapError::UnknownCarrier(carrier.clone()));
            }
        }
        self.apply_mode(mode);
        Ok(())
    }

    /// Back to galaxy mode.
    pub fn reset_mode(&mut self) {
        if self.destroyed {
            return;
        }
        self.apply_mode(Mode::Galaxy);
    }

    fn apply_mode(&mut self, mode: Mode) {
        let transition = ModeTransition::between(&self.mode, &mode);
        debug!("Mode {:?} -> {:?}", self.mode.kind(), mode.kind());
        self.mode = mode;

        self.unselect_all_carriers();
        self.unselect_all_stars();
        self.layers.waypoints.clear();
        self.layers.ruler.clear();

        if let Some(carrier) = &transition.enter_waypoints {
            self.set_carriers_interactive(false);
            if let Some(entry) = self.carriers.get(carrier) {
                self.layers.waypoints.draw_carrier(&entry.data, true);
            }
        }
        if transition.leave_waypoints {
            self.set_carriers_interactive(true);
        }
        if transition.enter_ruler {
            self.layers.ruler.draw();
        }
    }

    fn set_carriers_interactive(&mut self, interactive: bool) {
        for entry in self.carriers.iter_mut() {
            entry.interactive = interactive;
            if interactive {
                entry.proxy.enable_interactivity();
            } else {
                entry.proxy.disable_interactivity();
            }
        }
    }

    // ---- Overlays ----

    /// Redraw the route being edited (waypoints mode) and every carrier's
    /// own waypoint indicator.
    pub fn draw_waypoints(&mut self) {
        if let Some(carrier) = self.mode.waypoint_carrier() {
            if let Some(entry) = self.carriers.get(carrier) {
                self.layers.waypoints.draw_carrier(&entry.data, true);
            }
        }
        for entry in self.carriers.iter_mut() {
            entry.proxy.draw_carrier_waypoints();
        }
    }

    pub(crate) fn draw_galaxy_center(&mut self) {
        let visible =
            self.galaxy.orbital_map_enabled() || self.settings.galaxy_center_always_visible;
        let center = self.galaxy.galaxy_center.filter(|_| visible);
        self.layers.markers.draw_galaxy_center(center);
    }

    pub(crate) fn draw_selection_marker(&mut self, location: Vec2) {
        if self.config.selection_marker {
            self.layers.markers.draw_selected_circle(location);
        }
    }

    pub fn show_ignore_bulk_upgrade(&mut self) {
        for entry in self.stars.iter_mut() {
            entry.proxy.show_ignore_bulk_upgrade();
        }
    }

    pub fn hide_ignore_bulk_upgrade(&mut self) {
        for entry in self.stars.iter_mut() {
            entry.proxy.hide_ignore_bulk_upgrade();
        }
    }

    // ---- Camera ----

    pub fn pan_to_location(&mut self, location: Vec2) {
        self.viewport.move_center(location);
        self.refresh_zoom();
    }

    pub fn pan_to_object(&mut self, object: &ObjectRef) -> Result<(), MapError> {
        let location = match object {
            ObjectRef::Star(id) => self.star_data(id)?.location,
            ObjectRef::Carrier(id) => self.carrier_data(id)?.location,
        };
        self.pan_to_location(location);
        Ok(())
    }

    /// Center on the mean position of a player's stars. Players with no stars
    /// leave the camera where it is.
    pub fn pan_to_player(&mut self, player: &PlayerId) {
        match self.galaxy.player_empire_center(player) {
            Some(center) => self.pan_to_location(center),
            None => debug!("Player {player} owns no stars, not panning"),
        }
    }

    /// Center on the user's empire, or the middle of the galaxy for spectators.
    pub fn pan_to_user(&mut self) {
        match self.galaxy.user_player().map(|p| p.id.clone()) {
            Some(player) => self.pan_to_player(&player),
            None => {
                let center = self.galaxy.bounds_center();
                self.pan_to_location(center);
            }
        }
    }

    // ---- Event pumping ----

    /// Record where the pointer went down, for drag detection.
    pub fn pointer_down(&mut self, screen: Vec2) {
        self.gesture.pointer_down(screen);
    }

    /// Handle every queued collaborator event. Returns how many were handled.
    pub fn process_input(&mut self) -> usize {
        if self.destroyed {
            return 0;
        }
        let mut handled = 0;
        while let Some(event) = self.sink.pop() {
            self.handle_input(event);
            handled += 1;
        }
        handled
    }

    /// Execute every queued application command. Failures are logged.
    pub fn process_commands(&mut self) -> usize {
        if self.destroyed {
            return 0;
        }
        let mut handled = 0;
        while let Some(command) = self.channel.next_command() {
            let name = command.name();
            if let Err(err) = self.execute(command) {
                warn!("Command {name} failed: {err}");
            }
            handled += 1;
        }
        handled
    }

    /// Drain input and commands until both queues are quiet. Handlers may
    /// queue more work, so this loops a bounded number of rounds.
    pub fn pump(&mut self) -> usize {
        const MAX_ROUNDS: usize = 16;

        let mut total = 0;
        for _ in 0..MAX_ROUNDS {
            let handled = self.process_input() + self.process_commands();
            if handled == 0 {
                return total;
            }
            total += handled;
        }
        warn!("Map events still pending after {MAX_ROUNDS} rounds");
        total
    }
}

impl<F: ProxyFactory> Drop for MapEngine<F> {
    fn drop(&mut self) {
        self.destroy();
    }
}
