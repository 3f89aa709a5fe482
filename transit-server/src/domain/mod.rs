//! Domain types for the transit query engine.
//!
//! These types describe the static catalogue: routes, stops and areas.
//! Identifiers and labels with a closed set of values are validated at
//! construction time.

mod area;
mod route;
mod route_number;
mod stop;

pub use area::Area;
pub use route::{
    DEFAULT_FREQUENCY_MINS, FareSchedule, Frequency, InvalidServiceType, Route, ServiceType,
};
pub use route_number::{InvalidRouteNumber, RouteNumber};
pub use stop::{Coordinates, InvalidZone, Stop, Zone};
