//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::catalogue::MatchedBy;
use crate::domain::{FareSchedule, Route};
use crate::geo::{Fare, format_fare};
use crate::live::Timing;
use crate::matcher::RouteMatch;
use crate::query::{
    AccessibilityInfo, FareEstimate, LiveTimingsResult, NearbyStop, QueryResponse, ServiceStatus,
};
use crate::search::SearchResults;

/// Request for free-text search.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub q: Option<String>,
}

/// Request for routes between two places.
#[derive(Debug, Deserialize)]
pub struct RoutesBetweenRequest {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Request for live arrivals at a stop or area.
#[derive(Debug, Deserialize)]
pub struct LiveTimingsRequest {
    pub stop: Option<String>,
}

/// Request for a fare estimate between two stops.
#[derive(Debug, Deserialize)]
pub struct FareRequest {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Request for stops near an area or zone.
#[derive(Debug, Deserialize)]
pub struct StopsNearRequest {
    pub area: Option<String>,
}

/// Published route fares.
#[derive(Debug, Serialize)]
pub struct FareScheduleResult {
    pub ordinary: u32,
    pub deluxe: u32,
}

/// A route.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub route_number: String,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub fare: FareScheduleResult,
    pub frequency: String,
    pub operating_hours: String,
    pub key_stops: Vec<String>,
    pub accessibility: Vec<String>,
    pub distance: Option<String>,
}

/// Response for search.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub routes: Vec<RouteResult>,
    pub areas: Vec<String>,
    pub stops: Vec<String>,
}

/// A route serving both ends of a trip.
#[derive(Debug, Serialize)]
pub struct RouteMatchResult {
    #[serde(flatten)]
    pub route: RouteResult,
    pub from_stop: String,
    pub to_stop: String,
    /// "forward" or "reverse"
    pub direction: &'static str,
    /// Rough travel time in minutes
    pub estimated_time: u32,
}

/// Response for routes between two places.
#[derive(Debug, Serialize)]
pub struct RoutesBetweenResponse {
    pub routes: Vec<RouteMatchResult>,
}

/// An upcoming arrival.
#[derive(Debug, Serialize)]
pub struct TimingResult {
    pub route_number: String,
    pub route_name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    /// Clock time, e.g. "02:35 PM"
    pub next_arrival: String,
    pub minutes_away: u32,
    pub next_bus: String,
    pub frequency: String,
    pub accessibility: Vec<String>,
    pub fare: FareScheduleResult,
}

/// Response for live arrivals.
#[derive(Debug, Serialize)]
pub struct LiveTimingsResponse {
    pub bus_stop: String,
    pub last_updated: String,
    pub timings: Vec<TimingResult>,
}

/// Fares across bus classes.
#[derive(Debug, Serialize)]
pub struct FareResult {
    pub ordinary: u32,
    pub deluxe: u32,
    pub ac: u32,
    /// Ordinary fare for display, e.g. "₹12"
    pub display: String,
}

/// Response for a fare estimate.
#[derive(Debug, Serialize)]
pub struct FareEstimateResponse {
    pub from: String,
    pub to: String,
    /// Kilometres, two decimals
    pub distance: f64,
    pub fare: FareResult,
    pub special_offers: BTreeMap<&'static str, &'static str>,
}

/// Response for route accessibility.
#[derive(Debug, Serialize)]
pub struct AccessibilityResponse {
    pub wheelchair_accessible: bool,
    pub low_floor: bool,
    pub ac_available: bool,
    pub digital_payment: bool,
    pub special_concessions: BTreeMap<&'static str, &'static str>,
}

/// A stop with its position.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub zone: &'static str,
    pub facilities: Vec<String>,
    /// "name" or "zone"
    pub matched_by: &'static str,
}

/// Response for stops near an area.
#[derive(Debug, Serialize)]
pub struct StopsNearResponse {
    pub stops: Vec<StopResult>,
}

/// Response listing every known place.
#[derive(Debug, Serialize)]
pub struct AreasResponse {
    pub areas: Vec<String>,
}

/// Services offered free or at a concession.
#[derive(Debug, Serialize)]
pub struct SpecialServicesResult {
    pub women_free: bool,
    pub disabled_free: bool,
    pub transgender_free: bool,
    pub digital_payment: bool,
}

/// Response for operator status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub operational: bool,
    pub total_routes: usize,
    pub total_buses: u32,
    pub service_areas: usize,
    pub announcements: Vec<&'static str>,
    pub special_services: SpecialServicesResult,
}

/// Response for `POST /api/query`.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum QueryResponseDto {
    Search(SearchResponse),
    RoutesBetween(RoutesBetweenResponse),
    LiveTimings(LiveTimingsResponse),
    FareEstimate(FareEstimateResponse),
    RouteDetails(RouteResult),
    Accessibility(AccessibilityResponse),
    StopsNear(StopsNearResponse),
    AllAreas(AreasResponse),
    Status(StatusResponse),
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl From<&FareSchedule> for FareScheduleResult {
    fn from(fare: &FareSchedule) -> Self {
        Self {
            ordinary: fare.ordinary,
            deluxe: fare.deluxe,
        }
    }
}

impl RouteResult {
    /// Create from a domain Route.
    pub fn from_route(route: &Route) -> Self {
        Self {
            route_number: route.number.to_string(),
            name: route.name.clone(),
            service_type: route.service_type.to_string(),
            fare: (&route.fare).into(),
            frequency: route.frequency.to_string(),
            operating_hours: route.operating_hours.clone(),
            key_stops: route.key_stops.clone(),
            accessibility: route.accessibility.clone(),
            distance: route.distance.clone(),
        }
    }
}

impl SearchResponse {
    pub fn from_results(results: &SearchResults) -> Self {
        Self {
            routes: results.routes.iter().map(RouteResult::from_route).collect(),
            areas: results.areas.clone(),
            stops: results.stops.clone(),
        }
    }
}

impl RouteMatchResult {
    pub fn from_match(m: &RouteMatch) -> Self {
        Self {
            route: RouteResult::from_route(&m.route),
            from_stop: m.from_stop.clone(),
            to_stop: m.to_stop.clone(),
            direction: m.direction.as_str(),
            estimated_time: m.estimated_mins,
        }
    }
}

impl RoutesBetweenResponse {
    pub fn from_matches(matches: &[RouteMatch]) -> Self {
        Self {
            routes: matches.iter().map(RouteMatchResult::from_match).collect(),
        }
    }
}

impl TimingResult {
    pub fn from_timing(timing: &Timing) -> Self {
        Self {
            route_number: timing.route_number.to_string(),
            route_name: timing.route_name.clone(),
            service_type: timing.service_type.to_string(),
            next_arrival: format_clock(&timing.next_arrival),
            minutes_away: timing.minutes_away,
            next_bus: format_clock(&timing.next_bus),
            frequency: timing.frequency.to_string(),
            accessibility: timing.accessibility.clone(),
            fare: (&timing.fare).into(),
        }
    }
}

impl LiveTimingsResponse {
    pub fn from_result(result: &LiveTimingsResult) -> Self {
        Self {
            bus_stop: result.stop.clone(),
            last_updated: result.board.last_updated.format("%I:%M:%S %p").to_string(),
            timings: result
                .board
                .timings
                .iter()
                .map(TimingResult::from_timing)
                .collect(),
        }
    }
}

impl From<&Fare> for FareResult {
    fn from(fare: &Fare) -> Self {
        Self {
            ordinary: fare.ordinary,
            deluxe: fare.deluxe,
            ac: fare.ac,
            display: format_fare(fare.ordinary),
        }
    }
}

impl FareEstimateResponse {
    pub fn from_estimate(estimate: &FareEstimate) -> Self {
        Self {
            from: estimate.from.clone(),
            to: estimate.to.clone(),
            distance: estimate.distance_km,
            fare: (&estimate.fare).into(),
            special_offers: estimate.special_offers.iter().copied().collect(),
        }
    }
}

impl AccessibilityResponse {
    pub fn from_info(info: &AccessibilityInfo) -> Self {
        Self {
            wheelchair_accessible: info.wheelchair_accessible,
            low_floor: info.low_floor,
            ac_available: info.ac_available,
            digital_payment: info.digital_payment,
            special_concessions: info.concessions.iter().copied().collect(),
        }
    }
}

impl StopResult {
    pub fn from_nearby(nearby: &NearbyStop) -> Self {
        Self {
            name: nearby.stop.name.clone(),
            lat: nearby.stop.position.lat,
            lng: nearby.stop.position.lng,
            zone: nearby.stop.zone.as_str(),
            facilities: nearby.stop.facilities.clone(),
            matched_by: match nearby.matched_by {
                MatchedBy::Name => "name",
                MatchedBy::Zone => "zone",
            },
        }
    }
}

impl StatusResponse {
    pub fn from_status(status: &ServiceStatus) -> Self {
        Self {
            timestamp: status.generated_at.to_rfc3339(),
            operational: status.operational,
            total_routes: status.total_routes,
            total_buses: status.total_buses,
            service_areas: status.service_areas,
            announcements: status.announcements.to_vec(),
            special_services: SpecialServicesResult {
                women_free: status.special_services.women_free,
                disabled_free: status.special_services.disabled_free,
                transgender_free: status.special_services.transgender_free,
                digital_payment: status.special_services.digital_payment,
            },
        }
    }
}

impl QueryResponseDto {
    pub fn from_response(response: &QueryResponse) -> Self {
        match response {
            QueryResponse::Search(r) => Self::Search(SearchResponse::from_results(r)),
            QueryResponse::RoutesBetween(m) => {
                Self::RoutesBetween(RoutesBetweenResponse::from_matches(m))
            }
            QueryResponse::LiveTimings(r) => Self::LiveTimings(LiveTimingsResponse::from_result(r)),
            QueryResponse::FareEstimate(e) => {
                Self::FareEstimate(FareEstimateResponse::from_estimate(e))
            }
            QueryResponse::RouteDetails(r) => Self::RouteDetails(RouteResult::from_route(r)),
            QueryResponse::Accessibility(a) => {
                Self::Accessibility(AccessibilityResponse::from_info(a))
            }
            QueryResponse::StopsNear(s) => Self::StopsNear(StopsNearResponse {
                stops: s.iter().map(StopResult::from_nearby).collect(),
            }),
            QueryResponse::AllAreas(a) => Self::AllAreas(AreasResponse { areas: a.clone() }),
            QueryResponse::Status(s) => Self::Status(StatusResponse::from_status(s)),
        }
    }
}

/// Format a clock time as "hh:mm AM".
fn format_clock(time: &NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::Catalogue;
    use crate::domain::{FareSchedule, Frequency, RouteNumber, ServiceType};
    use crate::matcher::match_route;

    fn route_23a() -> Route {
        let catalogue = Catalogue::chennai().unwrap();
        catalogue
            .route(&RouteNumber::parse("23A").unwrap())
            .unwrap()
            .clone()
    }

    #[test]
    fn route_result_from_route() {
        let result = RouteResult::from_route(&route_23a());
        assert_eq!(result.route_number, "23A");
        assert_eq!(result.service_type, "Ordinary");
        assert_eq!(result.fare.ordinary, 14);
        assert_eq!(result.key_stops.len(), 5);
        assert_eq!(result.distance.as_deref(), Some("22 km"));
    }

    #[test]
    fn route_result_serializes_type_field() {
        let json = serde_json::to_value(RouteResult::from_route(&route_23a())).unwrap();
        assert_eq!(json["type"], "Ordinary");
        assert_eq!(json["route_number"], "23A");
    }

    #[test]
    fn route_match_is_flattened() {
        let m = match_route(&route_23a(), "t.nagar", "broadway").unwrap();
        let json = serde_json::to_value(RouteMatchResult::from_match(&m)).unwrap();
        assert_eq!(json["route_number"], "23A");
        assert_eq!(json["direction"], "reverse");
        assert_eq!(json["estimated_time"], 31);
        assert_eq!(json["from_stop"], "T.Nagar");
    }

    #[test]
    fn timing_clock_format() {
        let timing = Timing {
            route_number: RouteNumber::parse("42").unwrap(),
            route_name: "Koyambedu - Central - Beach".into(),
            service_type: ServiceType::Ordinary,
            next_arrival: NaiveTime::from_hms_opt(14, 5, 0).unwrap(),
            minutes_away: 4,
            next_bus: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            frequency: Frequency::new("5-8 minutes"),
            accessibility: vec!["Standard".into()],
            fare: FareSchedule {
                ordinary: 10,
                deluxe: 15,
            },
        };

        let result = TimingResult::from_timing(&timing);
        assert_eq!(result.next_arrival, "02:05 PM");
        assert_eq!(result.next_bus, "09:30 AM");
        assert_eq!(result.minutes_away, 4);
    }

    #[test]
    fn fare_result_display() {
        let fare = Fare {
            ordinary: 12,
            deluxe: 17,
            ac: 22,
        };
        let result = FareResult::from(&fare);
        assert_eq!(result.display, "₹12");
    }
}
