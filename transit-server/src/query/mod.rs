//! Query facade.
//!
//! The single entry point for callers. Requests are validated and
//! normalized here, dispatched to the search index, route matcher or
//! live-timing synthesizer, and failures are reported as [`QueryError`].

mod error;
mod info;
mod request;
mod service;

pub use error::{EntityKind, QueryError};
pub use info::{
    ANNOUNCEMENTS, AccessibilityInfo, FARE_OFFERS, FLEET_SIZE, FareEstimate, ROUTE_CONCESSIONS,
    ServiceStatus, SpecialServices,
};
pub use request::{LiveTimingsResult, NearbyStop, QueryRequest, QueryResponse};
pub use service::QueryService;
