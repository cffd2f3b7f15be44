//! Recording proxies and layers shared by the engine integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use starmap_engine::renderer::{
    BackgroundLayer, HighlightLayer, MarkerLayer, OrbitalLayer, OverlayLayer, PathLayer,
    PlayerNamesLayer, RulerLayer, SpatialCulling, TooltipLayer, WaypointLayer,
};
use starmap_engine::{
    Bounds, CarrierData, CarrierProxy, GalaxySettings, GalaxySnapshot, ListenerId, MapChannel,
    MapEngine, MapLayers, MapNotification, MapObjectProxy, MapSetup, ObjectRef, PlayerData,
    ProxyEventKind, ProxyFactory, ProxySink, StarData, StarProxy, UserMapSettings, ViewportData,
};

/// Everything the mocks saw, in call order.
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<String>,
    active: HashMap<String, Vec<ListenerId>>,
    unlistened: HashMap<String, usize>,
    destroyed: HashMap<String, usize>,
    next_listener: u32,
}

impl Recorder {
    fn push(&mut self, call: String) {
        self.calls.push(call);
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| c.as_str() == call).count()
    }

    pub fn saw(&self, call: &str) -> bool {
        self.count(call) > 0
    }

    pub fn active_listeners(&self, key: &str) -> usize {
        self.active.get(key).map_or(0, Vec::len)
    }

    pub fn unlisten_count(&self, key: &str) -> usize {
        self.unlistened.get(key).copied().unwrap_or(0)
    }

    pub fn destroy_count(&self, key: &str) -> usize {
        self.destroyed.get(key).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

pub type Shared = Rc<RefCell<Recorder>>;

pub fn recorder() -> Shared {
    Rc::new(RefCell::new(Recorder::default()))
}

// ---- Proxies ----

pub struct MockProxy {
    key: String,
    rec: Shared,
}

impl MockProxy {
    fn new(key: String, rec: &Shared) -> Self {
        rec.borrow_mut().push(format!("{key} create"));
        Self {
            key,
            rec: rec.clone(),
        }
    }

    fn log(&self, what: &str) {
        self.rec.borrow_mut().push(format!("{} {what}", self.key));
    }

    fn listen_impl(&mut self) -> ListenerId {
        let mut rec = self.rec.borrow_mut();
        rec.next_listener += 1;
        let id = ListenerId(rec.next_listener);
        rec.active.entry(self.key.clone()).or_default().push(id);
        id
    }

    fn unlisten_impl(&mut self, listener: ListenerId) {
        let mut rec = self.rec.borrow_mut();
        if let Some(ids) = rec.active.get_mut(&self.key) {
            ids.retain(|id| *id != listener);
        }
        *rec.unlistened.entry(self.key.clone()).or_default() += 1;
    }

    fn destroy_impl(&mut self) {
        *self
            .rec
            .borrow_mut()
            .destroyed
            .entry(self.key.clone())
            .or_default() += 1;
    }
}

pub struct MockStar(MockProxy);
pub struct MockCarrier(MockProxy);

impl MapObjectProxy for MockStar {
    type Data = StarData;

    fn update(&mut self, _data: &StarData) {
        self.0.log("update");
    }
    fn draw(&mut self) {
        self.0.log("draw");
    }
    fn on_zoom_changing(&mut self, _zoom_percent: f32) {
        self.0.log("zoom");
    }
    fn select(&mut self) {
        self.0.log("select");
    }
    fn unselect(&mut self) {
        self.0.log("unselect");
    }
    fn listen(&mut self, _kind: ProxyEventKind, _sink: ProxySink) -> ListenerId {
        self.0.listen_impl()
    }
    fn unlisten(&mut self, listener: ListenerId) {
        self.0.unlisten_impl(listener);
    }
    fn destroy(&mut self) {
        self.0.destroy_impl();
    }
}

impl StarProxy for MockStar {
    fn on_mouse_over(&mut self) {
        self.0.log("hover");
    }
    fn on_mouse_out(&mut self) {
        self.0.log("unhover");
    }
    fn show_ignore_bulk_upgrade(&mut self) {
        self.0.log("show_ignore");
    }
    fn hide_ignore_bulk_upgrade(&mut self) {
        self.0.log("hide_ignore");
    }
}

impl MapObjectProxy for MockCarrier {
    type Data = CarrierData;

    fn update(&mut self, _data: &CarrierData) {
        self.0.log("update");
    }
    fn draw(&mut self) {
        self.0.log("draw");
    }
    fn on_zoom_changing(&mut self, _zoom_percent: f32) {
        self.0.log("zoom");
    }
    fn select(&mut self) {
        self.0.log("select");
    }
    fn unselect(&mut self) {
        self.0.log("unselect");
    }
    fn listen(&mut self, _kind: ProxyEventKind, _sink: ProxySink) -> ListenerId {
        self.0.listen_impl()
    }
    fn unlisten(&mut self, listener: ListenerId) {
        self.0.unlisten_impl(listener);
    }
    fn destroy(&mut self) {
        self.0.destroy_impl();
    }
}

impl CarrierProxy for MockCarrier {
    fn enable_interactivity(&mut self) {
        self.0.log("enable");
    }
    fn disable_interactivity(&mut self) {
        self.0.log("disable");
    }
    fn draw_carrier_waypoints(&mut self) {
        self.0.log("draw_waypoints");
    }
}

pub struct MockFactory {
    rec: Shared,
}

impl MockFactory {
    pub fn new(rec: &Shared) -> Self {
        Self { rec: rec.clone() }
    }
}

impl ProxyFactory for MockFactory {
    type Star = MockStar;
    type Carrier = MockCarrier;

    fn create_star(&mut self, data: &StarData) -> MockStar {
        MockStar(MockProxy::new(format!("star:{}", data.id), &self.rec))
    }

    fn create_carrier(&mut self, data: &CarrierData) -> MockCarrier {
        MockCarrier(MockProxy::new(format!("carrier:{}", data.id), &self.rec))
    }
}

// ---- Layers ----

/// One recording layer, named after the `MapLayers` slot it fills.
pub struct MockLayer {
    name: &'static str,
    rec: Shared,
}

impl MockLayer {
    fn boxed(name: &'static str, rec: &Shared) -> Box<Self> {
        Box::new(Self {
            name,
            rec: rec.clone(),
        })
    }

    fn log(&self, what: impl std::fmt::Display) {
        self.rec.borrow_mut().push(format!("{} {what}", self.name));
    }
}

impl OverlayLayer for MockLayer {
    fn setup(&mut self, _galaxy: &GalaxySnapshot, _settings: &UserMapSettings) {
        self.log("setup");
    }
    fn draw(&mut self) {
        self.log("draw");
    }
    fn clear(&mut self) {
        self.log("clear");
    }
    fn refresh_zoom(&mut self, _zoom_percent: f32) {
        self.log("zoom");
    }
    fn destroy(&mut self) {
        self.log("destroy");
    }
}

impl WaypointLayer for MockLayer {
    fn attach(&mut self, _sink: ProxySink) {
        self.log("attach");
    }
    fn detach(&mut self) {
        self.log("detach");
    }
    fn draw_carrier(&mut self, carrier: &CarrierData, editable: bool) {
        let how = if editable { "editable" } else { "readonly" };
        self.log(format!("draw_carrier {} {how}", carrier.id));
    }
    fn on_star_clicked(&mut self, star: &StarData) {
        self.log(format!("star {}", star.id));
    }
    fn on_carrier_clicked(&mut self, carrier: &CarrierData) {
        self.log(format!("carrier {}", carrier.id));
    }
}

impl RulerLayer for MockLayer {
    fn attach(&mut self, _sink: ProxySink) {
        self.log("attach");
    }
    fn detach(&mut self) {
        self.log("detach");
    }
    fn on_star_clicked(&mut self, star: &StarData) {
        self.log(format!("star {}", star.id));
    }
    fn on_carrier_clicked(&mut self, carrier: &CarrierData) {
        self.log(format!("carrier {}", carrier.id));
    }
    fn remove_last_point(&mut self) {
        self.log("remove_last");
    }
}

impl OrbitalLayer for MockLayer {
    fn draw_star(&mut self, star: &StarData) {
        self.log(format!("star {}", star.id));
    }
    fn draw_carrier(&mut self, carrier: &CarrierData) {
        self.log(format!("carrier {}", carrier.id));
    }
}

impl TooltipLayer for MockLayer {
    fn draw_star_tooltip(&mut self, star: &StarData) {
        self.log(format!("star {}", star.id));
    }
    fn draw_carrier_tooltip(&mut self, carrier: &CarrierData) {
        self.log(format!("carrier {}", carrier.id));
    }
}

impl HighlightLayer for MockLayer {
    fn highlight_location(&mut self, location: Vec2, opacity: f32) {
        self.log(format!("highlight {} {} {opacity}", location.x, location.y));
    }
}

impl PlayerNamesLayer for MockLayer {
    fn on_tick(&mut self, _zoom_percent: f32, zoom_changing: bool) {
        self.log(format!("tick zoom_changing={zoom_changing}"));
    }
}

impl BackgroundLayer for MockLayer {
    fn on_tick(&mut self, _dt: f32, _viewport: &ViewportData) {
        self.log("tick");
    }
}

impl PathLayer for MockLayer {
    fn update(&mut self, _galaxy: &GalaxySnapshot, _settings: &UserMapSettings) {
        self.log("update");
    }
    fn on_tick(&mut self, _zoom_percent: f32, _bounds: &Bounds, zoom_changing: bool) {
        self.log(format!("tick zoom_changing={zoom_changing}"));
    }
}

impl MarkerLayer for MockLayer {
    fn draw_selected_circle(&mut self, location: Vec2) {
        self.log(format!("selected {} {}", location.x, location.y));
    }
    fn draw_galaxy_center(&mut self, location: Option<Vec2>) {
        match location {
            Some(center) => self.log(format!("center {} {}", center.x, center.y)),
            None => self.log("center none"),
        }
    }
}

impl SpatialCulling for MockLayer {
    fn update(&mut self, _galaxy: &GalaxySnapshot) {
        self.log("update");
    }
    fn on_tick(&mut self, position_changing: bool, zoom_changing: bool, _zoom: f32, _bounds: &Bounds) {
        self.log(format!("tick position={position_changing} zoom={zoom_changing}"));
    }
    fn remove_object(&mut self, object: &ObjectRef) {
        match object {
            ObjectRef::Star(id) => self.log(format!("remove star {id}")),
            ObjectRef::Carrier(id) => self.log(format!("remove carrier {id}")),
        }
    }
}

pub fn recording_layers(rec: &Shared) -> MapLayers {
    MapLayers {
        background: MockLayer::boxed("background", rec),
        culling: MockLayer::boxed("culling", rec),
        territories: MockLayer::boxed("territories", rec),
        waypoints: MockLayer::boxed("waypoints", rec),
        orbital: MockLayer::boxed("orbital", rec),
        markers: MockLayer::boxed("markers", rec),
        worm_holes: MockLayer::boxed("worm_holes", rec),
        highlights: MockLayer::boxed("highlights", rec),
        paths: MockLayer::boxed("paths", rec),
        ruler: MockLayer::boxed("ruler", rec),
        player_names: MockLayer::boxed("player_names", rec),
        tooltip: MockLayer::boxed("tooltip", rec),
    }
}

// ---- Fixtures ----

/// s1, s2 and c1 crowd the origin; s3 and c2 share a spot; s4 and c3 are
/// alone. p1 owns s1 and s3 and is the viewing player.
pub fn galaxy() -> GalaxySnapshot {
    GalaxySnapshot {
        stars: vec![
            StarData::new("s1", "Alpha", Vec2::new(0.0, 0.0)).with_owner("p1"),
            StarData::new("s2", "Beta", Vec2::new(5.0, 0.0)),
            StarData::new("s3", "Gamma", Vec2::new(200.0, 0.0)).with_owner("p1"),
            StarData::new("s4", "Delta", Vec2::new(400.0, 400.0)),
        ],
        carriers: vec![
            CarrierData::new("c1", "Ark", Vec2::new(3.0, 0.0)).orbiting("s1"),
            CarrierData::new("c2", "Bow", Vec2::new(200.0, 0.0))
                .with_owner("p1")
                .orbiting("s3"),
            CarrierData::new("c3", "Cog", Vec2::new(600.0, 600.0)),
        ],
        players: vec![PlayerData {
            id: "p1".into(),
            alias: "Alice".into(),
        }],
        user_player_id: Some("p1".into()),
        galaxy_center: Some(Vec2::new(300.0, 300.0)),
        settings: GalaxySettings::default(),
    }
}

pub struct Harness {
    pub engine: MapEngine<MockFactory>,
    /// Application end of the channel.
    pub app: MapChannel,
    pub rec: Shared,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_setup(MapSetup::new(galaxy()))
    }

    pub fn with_setup(setup: MapSetup) -> Self {
        let rec = recorder();
        let app = MapChannel::new();
        let engine = MapEngine::new(
            MockFactory::new(&rec),
            recording_layers(&rec),
            app.clone(),
            setup,
        );
        rec.borrow_mut().clear();
        Self { engine, app, rec }
    }

    pub fn notifications(&self) -> Vec<MapNotification> {
        self.app.drain_notifications()
    }

    pub fn notification_names(&self) -> Vec<&'static str> {
        self.notifications().iter().map(|n| n.name()).collect()
    }

    pub fn saw(&self, call: &str) -> bool {
        self.rec.borrow().saw(call)
    }

    pub fn count(&self, call: &str) -> usize {
        self.rec.borrow().count(call)
    }

    pub fn clear_calls(&self) {
        self.rec.borrow_mut().clear();
    }
}
