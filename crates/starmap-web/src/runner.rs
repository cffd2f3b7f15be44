use glam::Vec2;
use starmap_engine::{
    CarrierClick, CarrierId, FrameLimiter, GalaxySnapshot, MapChannel, MapConfig, MapEngine,
    MapError, MapInput, MapLayers, MapSetup, PointerInfo, ProxyFactory, StarClick, StarId,
    UserMapSettings, Viewport,
};

/// What a concrete map front end supplies: the proxy factory and the
/// sub-layers drawn on the host's canvas.
pub trait MapHost {
    type Factory: ProxyFactory;

    fn factory(&mut self) -> Self::Factory;
    fn layers(&mut self) -> MapLayers;
}

/// Generic map runner that wires the engine to the browser frame loop.
///
/// Each front end creates a `thread_local!` MapRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct MapRunner<F: ProxyFactory> {
    engine: MapEngine<F>,
    /// Application side of the event channel.
    channel: MapChannel,
    limiter: FrameLimiter,
}

impl<F: ProxyFactory> MapRunner<F> {
    pub fn new(factory: F, layers: MapLayers, setup: MapSetup) -> Self {
        let channel = MapChannel::new();
        let limiter = FrameLimiter::new(setup.settings.effective_fps_limit(&setup.config));
        let engine = MapEngine::new(factory, layers, channel.clone(), setup);

        Self {
            engine,
            channel,
            limiter,
        }
    }

    /// Build a runner from the JSON blobs the page hands over. Empty config
    /// or settings strings mean defaults.
    pub fn from_json(
        factory: F,
        layers: MapLayers,
        galaxy_json: &str,
        settings_json: &str,
        config_json: &str,
        screen_width: f32,
        screen_height: f32,
    ) -> Result<Self, MapError> {
        let galaxy = GalaxySnapshot::from_json(galaxy_json)?;
        let settings = parse_or_default(settings_json, UserMapSettings::from_json)?;
        let config = parse_or_default(config_json, MapConfig::from_json)?;

        let setup = MapSetup::new(galaxy)
            .with_settings(settings)
            .with_config(config)
            .with_viewport(Viewport::new(screen_width, screen_height));
        Ok(Self::new(factory, layers, setup))
    }

    /// Run one frame if the frame cap allows it: drain queued input and
    /// commands, then tick. Returns whether the frame ran.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(elapsed) = self.limiter.admit(dt) else {
            return false;
        };
        self.engine.pump();
        self.engine.on_tick(elapsed);
        true
    }

    // ---- Input ----

    pub fn push_input(&mut self, event: MapInput) {
        self.engine.sink().emit(event);
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.push_input(MapInput::pointer_down(Vec2::new(x, y)));
    }

    pub fn star_clicked(&mut self, star: &str, x: f32, y: f32, modifier: bool, try_multi_select: bool) {
        self.push_input(MapInput::StarClicked(StarClick {
            star: StarId::from(star),
            pointer: Some(pointer(x, y, modifier)),
            try_multi_select,
        }));
    }

    pub fn star_right_clicked(&mut self, star: &str, x: f32, y: f32, modifier: bool) {
        self.push_input(MapInput::StarRightClicked {
            star: StarId::from(star),
            pointer: Some(pointer(x, y, modifier)),
        });
    }

    pub fn carrier_clicked(&mut self, carrier: &str, x: f32, y: f32, try_multi_select: bool) {
        self.push_input(MapInput::CarrierClicked(CarrierClick {
            carrier: CarrierId::from(carrier),
            pointer: Some(pointer(x, y, false)),
            try_multi_select,
        }));
    }

    pub fn carrier_right_clicked(&mut self, carrier: &str, x: f32, y: f32) {
        self.push_input(MapInput::CarrierRightClicked {
            carrier: CarrierId::from(carrier),
            pointer: Some(pointer(x, y, false)),
        });
    }

    // ---- Channel ----

    /// Queue an application command. Returns false if nothing listens for it.
    pub fn send_command_json(&mut self, json: &str) -> Result<bool, MapError> {
        Ok(self.channel.send_json(json)?)
    }

    /// Notifications raised since the last call, as a JSON array.
    pub fn drain_notifications_json(&mut self) -> Result<String, MapError> {
        Ok(self.channel.drain_notifications_json()?)
    }

    // ---- Lifecycle ----

    pub fn reload_json(&mut self, galaxy_json: &str, settings_json: &str) -> Result<(), MapError> {
        let galaxy = GalaxySnapshot::from_json(galaxy_json)?;
        let settings = parse_or_default(settings_json, UserMapSettings::from_json)?;
        self.limiter
            .set_fps_limit(settings.effective_fps_limit(self.engine.config()));
        self.engine.reload(galaxy, settings);
        Ok(())
    }

    pub fn draw(&mut self) {
        self.engine.draw();
    }

    pub fn resize(&mut self, screen_width: f32, screen_height: f32) {
        self.engine.viewport_mut().resize(screen_width, screen_height);
    }

    /// Set the visible world rectangle, as the host's viewport plugin reports it.
    pub fn set_view(&mut self, center_x: f32, center_y: f32, world_width: f32, world_height: f32) {
        let viewport = self.engine.viewport_mut();
        viewport.move_center(Vec2::new(center_x, center_y));
        viewport.set_visible_size(world_width, world_height);
    }

    pub fn zoom_percent(&self) -> f32 {
        self.engine.zoom_percent()
    }

    pub fn destroy(&mut self) {
        self.engine.destroy();
    }

    pub fn engine(&self) -> &MapEngine<F> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut MapEngine<F> {
        &mut self.engine
    }
}

fn pointer(x: f32, y: f32, modifier: bool) -> PointerInfo {
    let info = PointerInfo::at(x, y);
    if modifier {
        info.with_modifier()
    } else {
        info
    }
}

fn parse_or_default<T: Default>(
    json: &str,
    parse: impl FnOnce(&str) -> Result<T, serde_json::Error>,
) -> Result<T, serde_json::Error> {
    if json.trim().is_empty() {
        Ok(T::default())
    } else {
        parse(json)
    }
}
