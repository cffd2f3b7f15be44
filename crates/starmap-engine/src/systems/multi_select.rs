//! Proximity search used to disambiguate clicks on overlapping objects.

use std::cmp::Ordering;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{CarrierData, MapObject, ObjectKind, StarData};

/// A map object within the multi-select radius of a click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseObject {
    pub object: MapObject,
    pub distance: f32,
}

impl CloseObject {
    pub fn kind(&self) -> ObjectKind {
        self.object.kind()
    }
}

/// Disambiguation order: stars before carriers, then nearest first.
/// Exact distance ties fall back to the object name.
pub fn compare_close_objects(a: &CloseObject, b: &CloseObject) -> Ordering {
    a.kind().cmp(&b.kind()).then_with(|| {
        if a.distance == b.distance {
            a.object.name().cmp(b.object.name())
        } else {
            a.distance.total_cmp(&b.distance)
        }
    })
}

/// Every star and carrier within `radius` of `location`, in disambiguation order.
pub fn find_close_objects<'a>(
    location: Vec2,
    radius: f32,
    stars: impl IntoIterator<Item = &'a StarData>,
    carriers: impl IntoIterator<Item = &'a CarrierData>,
) -> Vec<CloseObject> {
    let close_stars = stars.into_iter().map(|s| CloseObject {
        distance: location.distance(s.location),
        object: MapObject::Star(s.clone()),
    });
    let close_carriers = carriers.into_iter().map(|c| CloseObject {
        distance: location.distance(c.location),
        object: MapObject::Carrier(c.clone()),
    });

    let mut objects: Vec<CloseObject> = close_stars
        .chain(close_carriers)
        .filter(|o| o.distance <= radius)
        .collect();
    objects.sort_by(compare_close_objects);
    objects
}
