use std::fmt;

use crate::api::types::{CarrierId, StarId};

/// Caller-contract violations and decode failures surfaced by the engine.
#[derive(Debug)]
pub enum MapError {
    /// A star id that is not in the proxy registry.
    UnknownStar(StarId),
    /// A carrier id that is not in the proxy registry.
    UnknownCarrier(CarrierId),
    /// The engine has already been torn down.
    Destroyed,
    /// A JSON payload could not be decoded.
    Decode(serde_json::Error),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::UnknownStar(id) => write!(f, "unknown star: {id}"),
            MapError::UnknownCarrier(id) => write!(f, "unknown carrier: {id}"),
            MapError::Destroyed => write!(f, "map engine has been destroyed"),
            MapError::Decode(err) => write!(f, "decode error: {err}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::Decode(err)
    }
}
