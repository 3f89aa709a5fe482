//! Catalogue loading errors.

use crate::domain::{InvalidRouteNumber, InvalidServiceType, InvalidZone};

/// Errors that can occur when building or loading a catalogue.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    /// Dataset file could not be read
    #[error("failed to read catalogue {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Dataset is not valid JSON or has the wrong shape
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    RouteNumber(#[from] InvalidRouteNumber),

    #[error(transparent)]
    ServiceType(#[from] InvalidServiceType),

    #[error(transparent)]
    Zone(#[from] InvalidZone),

    /// Route has fewer than two key stops
    #[error("route {0} must have at least two key stops")]
    TooFewStops(String),

    /// Two routes share a number
    #[error("duplicate route number: {0}")]
    DuplicateRoute(String),

    /// Two stops share a name
    #[error("duplicate stop name: {0}")]
    DuplicateStop(String),
}
