use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec2;

use crate::api::types::{CarrierId, RulerPoint, StarId, TempWaypoint};
use crate::input::gesture::PointerInfo;

/// A left click on a star, as reported by its proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct StarClick {
    pub star: StarId,
    /// Absent for synthesized clicks.
    pub pointer: Option<PointerInfo>,
    /// Whether to look for overlapping objects before selecting.
    pub try_multi_select: bool,
}

/// A left click on a carrier, as reported by its proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct CarrierClick {
    pub carrier: CarrierId,
    pub pointer: Option<PointerInfo>,
    pub try_multi_select: bool,
}

/// Everything collaborators and the host report to the engine.
/// Proxies and overlay layers push these through a [`ProxySink`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapInput {
    /// Pointer pressed anywhere on the viewport, in screen coordinates.
    PointerDown { x: f32, y: f32 },
    StarClicked(StarClick),
    /// Click that skips pre-click interception.
    StarDefaultClicked(StarClick),
    StarRightClicked { star: StarId, pointer: Option<PointerInfo> },
    CarrierClicked(CarrierClick),
    CarrierRightClicked { carrier: CarrierId, pointer: Option<PointerInfo> },
    StarMouseOver(StarId),
    StarMouseOut(StarId),
    CarrierMouseOver(CarrierId),
    CarrierMouseOut(CarrierId),
    WaypointCreated(TempWaypoint),
    WaypointOutOfRange,
    RulerPointCreated(RulerPoint),
    RulerPointRemoved(RulerPoint),
    RulerPointsCleared,
}

impl MapInput {
    pub fn pointer_down(screen: Vec2) -> Self {
        MapInput::PointerDown { x: screen.x, y: screen.y }
    }
}

/// FIFO of pending inputs. Drained by the engine each pump.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<MapInput>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: VecDeque::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: MapInput) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<MapInput> {
        self.events.pop_front()
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&mut self) -> Vec<MapInput> {
        self.events.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

/// Cloneable handle collaborators use to report input to the engine.
///
/// Single-threaded: the queue is only borrowed for the duration of a push or
/// pop, so a collaborator may emit while the engine is calling into it.
#[derive(Debug, Clone, Default)]
pub struct ProxySink {
    queue: Rc<RefCell<InputQueue>>,
}

impl ProxySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: MapInput) {
        self.queue.borrow_mut().push(event);
    }

    pub fn pop(&self) -> Option<MapInput> {
        self.queue.borrow_mut().pop()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }
}
