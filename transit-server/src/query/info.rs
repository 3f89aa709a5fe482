//! Fixed service information: fares between stops, accessibility and the
//! operator status snapshot.

use chrono::{DateTime, Utc};

use crate::domain::Route;
use crate::geo::Fare;

/// Approximate MTC fleet size.
pub const FLEET_SIZE: u32 = 3800;

/// Concessions that apply to fares between stops.
pub const FARE_OFFERS: [(&str, &str); 3] = [
    ("women", "Free in ordinary buses"),
    ("disabled", "Free with attender"),
    ("transgender", "Free"),
];

/// Concessions listed with a route's accessibility information.
pub const ROUTE_CONCESSIONS: [(&str, &str); 4] = [
    ("women", "Free travel in ordinary buses"),
    ("disabled", "Free travel with attender"),
    ("transgender", "Free travel"),
    ("students", "Concession available with ID"),
];

pub const ANNOUNCEMENTS: [&str; 5] = [
    "Free travel for all women in ordinary city buses",
    "Free travel for physically challenged persons with attender",
    "Digital payment accepted - UPI, cards",
    "Low floor buses available on major routes",
    "Customer care: 9445030516",
];

/// Distance and fares between two catalogue stops.
#[derive(Debug, Clone, PartialEq)]
pub struct FareEstimate {
    /// Canonical stop names.
    pub from: String,
    pub to: String,
    /// Great-circle distance rounded to two decimals.
    pub distance_km: f64,
    pub fare: Fare,
    pub special_offers: &'static [(&'static str, &'static str)],
}

/// Accessibility features of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibilityInfo {
    pub wheelchair_accessible: bool,
    pub low_floor: bool,
    pub ac_available: bool,
    pub digital_payment: bool,
    pub concessions: &'static [(&'static str, &'static str)],
}

impl AccessibilityInfo {
    pub fn for_route(route: &Route) -> Self {
        Self {
            wheelchair_accessible: route.has_tag("Wheelchair Accessible"),
            low_floor: route.has_tag("Low Floor"),
            ac_available: route.has_tag("AC Available") || route.has_tag("AC"),
            digital_payment: true,
            concessions: &ROUTE_CONCESSIONS,
        }
    }
}

/// Services offered free or at a concession.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialServices {
    pub women_free: bool,
    pub disabled_free: bool,
    pub transgender_free: bool,
    pub digital_payment: bool,
}

/// Operator status snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceStatus {
    pub generated_at: DateTime<Utc>,
    pub operational: bool,
    pub total_routes: usize,
    pub total_buses: u32,
    /// Number of area groupings served.
    pub service_areas: usize,
    pub announcements: &'static [&'static str],
    pub special_services: SpecialServices,
}

impl ServiceStatus {
    pub fn new(generated_at: DateTime<Utc>, total_routes: usize, service_areas: usize) -> Self {
        Self {
            generated_at,
            operational: true,
            total_routes,
            total_buses: FLEET_SIZE,
            service_areas,
            announcements: &ANNOUNCEMENTS,
            special_services: SpecialServices {
                women_free: true,
                disabled_free: true,
                transgender_free: true,
                digital_payment: true,
            },
        }
    }
}
