//! Contracts for the per-entity visual proxies the engine coordinates.
//!
//! Proxies own their drawing resources. The engine owns selection and
//! interactivity state and tells the proxy what to show.

use std::fmt;
use std::hash::Hash;

use crate::api::types::{CarrierData, CarrierId, ObjectRef, StarData, StarId};
use crate::input::queue::ProxySink;

/// Handle for one listener a proxy registered. Returned by `listen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// Event kinds a proxy can report through its sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyEventKind {
    Clicked,
    DefaultClicked,
    RightClicked,
    MouseOver,
    MouseOut,
}

/// Snapshot data the registry can key and refer to.
pub trait MapObjectData: Clone {
    type Id: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display;

    /// The events the engine subscribes to for this kind of object.
    const EVENT_KINDS: &'static [ProxyEventKind];

    fn id(&self) -> &Self::Id;
    fn object_ref(&self) -> ObjectRef;
}

impl MapObjectData for StarData {
    type Id = StarId;

    const EVENT_KINDS: &'static [ProxyEventKind] = &[
        ProxyEventKind::Clicked,
        ProxyEventKind::DefaultClicked,
        ProxyEventKind::RightClicked,
        ProxyEventKind::MouseOver,
        ProxyEventKind::MouseOut,
    ];

    fn id(&self) -> &StarId {
        &self.id
    }

    fn object_ref(&self) -> ObjectRef {
        ObjectRef::Star(self.id.clone())
    }
}

impl MapObjectData for CarrierData {
    type Id = CarrierId;

    const EVENT_KINDS: &'static [ProxyEventKind] = &[
        ProxyEventKind::Clicked,
        ProxyEventKind::RightClicked,
        ProxyEventKind::MouseOver,
        ProxyEventKind::MouseOut,
    ];

    fn id(&self) -> &CarrierId {
        &self.id
    }

    fn object_ref(&self) -> ObjectRef {
        ObjectRef::Carrier(self.id.clone())
    }
}

/// The engine's handle to one renderable star or carrier.
pub trait MapObjectProxy {
    type Data: MapObjectData;

    /// Apply fresh snapshot data in place.
    fn update(&mut self, data: &Self::Data);
    fn draw(&mut self);
    /// Level-of-detail hook, called after draws and when zoom moves.
    fn on_zoom_changing(&mut self, zoom_percent: f32);
    fn refresh_zoom(&mut self, zoom_percent: f32) {
        self.on_zoom_changing(zoom_percent);
    }
    fn select(&mut self);
    fn unselect(&mut self);
    /// Start reporting `kind` events into `sink`.
    fn listen(&mut self, kind: ProxyEventKind, sink: ProxySink) -> ListenerId;
    fn unlisten(&mut self, listener: ListenerId);
    /// Release drawing resources. Called once, after all listeners are gone.
    fn destroy(&mut self);
}

pub trait StarProxy: MapObjectProxy<Data = StarData> {
    /// Hover forwarded from a carrier orbiting this star.
    fn on_mouse_over(&mut self) {}
    fn on_mouse_out(&mut self) {}
    fn show_ignore_bulk_upgrade(&mut self) {}
    fn hide_ignore_bulk_upgrade(&mut self) {}
}

pub trait CarrierProxy: MapObjectProxy<Data = CarrierData> {
    fn enable_interactivity(&mut self);
    fn disable_interactivity(&mut self);
    /// Draw the carrier's own route overlay.
    fn draw_carrier_waypoints(&mut self) {}
}

/// Creates proxies for entities that appear in a snapshot.
pub trait ProxyFactory {
    type Star: StarProxy;
    type Carrier: CarrierProxy;

    fn create_star(&mut self, data: &StarData) -> Self::Star;
    fn create_carrier(&mut self, data: &CarrierData) -> Self::Carrier;
}
