//! Finding routes that serve both ends of a trip.
//!
//! Routes are stored as ordered key-stop lists, not as a network graph, so a
//! trip is only matched when a single route passes both endpoints.

use std::sync::Arc;

use tracing::debug;

use crate::cache::BoundedCache;
use crate::catalogue::Catalogue;
use crate::domain::Route;

/// Minutes added per key stop travelled.
pub const MINS_PER_KEY_STOP: u32 = 8;

/// Fixed minutes added to every estimate.
pub const BASE_TRIP_MINS: u32 = 15;

/// Direction of travel along a route's key-stop list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Origin comes before destination in key-stop order.
    Forward,
    Reverse,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }
}

/// A route serving both the requested origin and destination.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    pub route: Route,
    /// Key stop matched for the origin, as written in the catalogue.
    pub from_stop: String,
    pub to_stop: String,
    pub direction: Direction,
    /// Rough travel time; not a timetable figure.
    pub estimated_mins: u32,
}

/// Travel-time heuristic between two key-stop positions.
pub fn estimate_mins(from_index: usize, to_index: usize) -> u32 {
    let hops = u32::try_from(from_index.abs_diff(to_index)).unwrap_or(u32::MAX);
    hops.saturating_mul(MINS_PER_KEY_STOP)
        .saturating_add(BASE_TRIP_MINS)
}

/// Match a single route against lowercased origin and destination labels.
///
/// When a label matches several key stops the lowest index is used, so a
/// query for "central" on a route through "Central" and "Central Station"
/// always resolves to whichever comes first.
pub fn match_route(route: &Route, from: &str, to: &str) -> Option<RouteMatch> {
    let from_index = route.first_stop_containing(from)?;
    let to_index = route.first_stop_containing(to)?;

    let direction = if from_index < to_index {
        Direction::Forward
    } else {
        Direction::Reverse
    };

    Some(RouteMatch {
        route: route.clone(),
        from_stop: route.key_stops[from_index].clone(),
        to_stop: route.key_stops[to_index].clone(),
        direction,
        estimated_mins: estimate_mins(from_index, to_index),
    })
}

/// Route-between lookups with a bounded result cache keyed by the
/// lowercased (from, to) pair.
#[derive(Debug)]
pub struct RouteMatcher {
    catalogue: Arc<Catalogue>,
    cache: BoundedCache<(String, String), Arc<Vec<RouteMatch>>>,
}

impl RouteMatcher {
    pub fn new(catalogue: Arc<Catalogue>, cache_capacity: usize) -> Self {
        Self {
            catalogue,
            cache: BoundedCache::new(cache_capacity),
        }
    }

    /// Routes whose key stops contain both `from` and `to`, ignoring case.
    ///
    /// Returns an empty list when no single route serves both.
    pub fn routes_between(&self, from: &str, to: &str) -> Arc<Vec<RouteMatch>> {
        let key = (from.to_lowercase(), to.to_lowercase());

        if let Some(hit) = self.cache.get(&key) {
            debug!(from = %key.0, to = %key.1, "route-between cache hit");
            return hit;
        }

        let matches: Vec<RouteMatch> = self
            .catalogue
            .routes()
            .iter()
            .filter_map(|route| match_route(route, &key.0, &key.1))
            .collect();

        debug!(from = %key.0, to = %key.1, matches = matches.len(), "route-between computed");

        let matches = Arc::new(matches);
        self.cache.insert(key, matches.clone());
        matches
    }

    /// Number of cached (from, to) pairs.
    pub fn cached_pairs(&self) -> usize {
        self.cache.len()
    }
}
