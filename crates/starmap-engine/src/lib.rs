pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::{MapConfig, UserMapSettings, DRAG_THRESHOLD_PX, MULTI_SELECT_RADIUS, ZOOM_HYSTERESIS};
pub use api::error::MapError;
pub use api::map::{MapEngine, MapSetup};
pub use api::types::{
    CarrierData, CarrierId, GalaxySettings, GalaxySnapshot, MapObject, ObjectKind, ObjectRef,
    PlayerData, PlayerId, RulerPoint, StarData, StarId, TempWaypoint,
};
pub use bridge::channel::{MapChannel, Subscription};
pub use bridge::protocol::{DeferredClick, MapCommand, MapNotification};
pub use components::layer::MapLayer;
pub use components::proxy::{
    CarrierProxy, ListenerId, MapObjectData, MapObjectProxy, ProxyEventKind, ProxyFactory,
    StarProxy,
};
pub use core::mode::{Mode, ModeKind, ModeTransition};
pub use core::registry::{ProxyEntry, ProxyRegistry, Reconciliation};
pub use core::time::FrameLimiter;
pub use core::viewport::{Bounds, TickFrame, Viewport, ViewportData, ZoomTracker};
pub use input::gesture::{PointerGesture, PointerInfo};
pub use input::queue::{CarrierClick, InputQueue, MapInput, ProxySink, StarClick};
pub use renderer::traits::MapLayers;
pub use systems::multi_select::{find_close_objects, CloseObject};
