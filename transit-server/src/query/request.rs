//! Request and response shapes of the query facade.

use std::sync::Arc;

use serde::Deserialize;

use crate::catalogue::MatchedBy;
use crate::domain::{Route, Stop};
use crate::live::LiveBoard;
use crate::matcher::RouteMatch;
use crate::search::SearchResults;

use super::info::{AccessibilityInfo, FareEstimate, ServiceStatus};

/// A query from a UI, voice dispatcher or HTTP client.
///
/// Fields are optional so that absent parameters can be reported as
/// [`super::QueryError::MissingParameter`] rather than rejected by the
/// transport.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryRequest {
    Search {
        query: Option<String>,
    },
    RoutesBetween {
        from: Option<String>,
        to: Option<String>,
    },
    LiveTimings {
        stop: Option<String>,
    },
    FareEstimate {
        from: Option<String>,
        to: Option<String>,
    },
    RouteDetails {
        route: Option<String>,
    },
    Accessibility {
        route: Option<String>,
    },
    StopsNear {
        area: Option<String>,
    },
    AllAreas,
    Status,
}

/// Live arrivals for the requested stop or area.
#[derive(Debug, Clone)]
pub struct LiveTimingsResult {
    /// The label as the caller wrote it.
    pub stop: String,
    pub board: Arc<LiveBoard>,
}

/// A stop near a requested area, and whether it matched by name or zone.
#[derive(Debug, Clone)]
pub struct NearbyStop {
    pub stop: Stop,
    pub matched_by: MatchedBy,
}

/// Successful answer to a [`QueryRequest`].
#[derive(Debug, Clone)]
pub enum QueryResponse {
    Search(Arc<SearchResults>),
    RoutesBetween(Arc<Vec<RouteMatch>>),
    LiveTimings(LiveTimingsResult),
    FareEstimate(FareEstimate),
    RouteDetails(Route),
    Accessibility(AccessibilityInfo),
    StopsNear(Vec<NearbyStop>),
    AllAreas(Vec<String>),
    Status(Arc<ServiceStatus>),
}
