//! The query service: single entry point over the catalogue and caches.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use rand::rngs::StdRng;
use tracing::debug;

use crate::cache::{CacheConfig, TtlCache};
use crate::catalogue::Catalogue;
use crate::domain::{Route, RouteNumber};
use crate::geo::{distance_km, fare_for, round_km};
use crate::live::LiveTimings;
use crate::matcher::{RouteMatch, RouteMatcher};
use crate::search::{SearchIndex, SearchResults};

use super::error::QueryError;
use super::info::{AccessibilityInfo, FARE_OFFERS, FareEstimate, ServiceStatus};
use super::request::{LiveTimingsResult, NearbyStop, QueryRequest, QueryResponse};

/// Answers transit queries against one catalogue.
///
/// Owns every cache, so two services never share cached results. Create
/// one at startup and share it behind an `Arc`.
#[derive(Debug)]
pub struct QueryService {
    catalogue: Arc<Catalogue>,
    search: SearchIndex,
    matcher: RouteMatcher,
    live: LiveTimings,
    status: TtlCache<(), Arc<ServiceStatus>>,
}

impl QueryService {
    /// Create a service whose live timings are seeded from the OS.
    pub fn new(catalogue: Catalogue, config: &CacheConfig) -> Self {
        let catalogue = Arc::new(catalogue);
        let live = LiveTimings::new(catalogue.clone(), config.live_ttl);
        Self::assemble(catalogue, config, live)
    }

    /// Create a service with an explicit random source for live timings.
    pub fn with_rng(catalogue: Catalogue, config: &CacheConfig, rng: StdRng) -> Self {
        let catalogue = Arc::new(catalogue);
        let live = LiveTimings::with_rng(catalogue.clone(), config.live_ttl, rng);
        Self::assemble(catalogue, config, live)
    }

    fn assemble(catalogue: Arc<Catalogue>, config: &CacheConfig, live: LiveTimings) -> Self {
        Self {
            search: SearchIndex::new(catalogue.clone(), config.search_capacity),
            matcher: RouteMatcher::new(catalogue.clone(), config.route_between_capacity),
            live,
            status: TtlCache::new(config.status_ttl),
            catalogue,
        }
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Dispatch a request using the current local time.
    pub fn handle(&self, request: QueryRequest) -> Result<QueryResponse, QueryError> {
        self.handle_at(request, Local::now())
    }

    /// Dispatch a request as if received at `now`.
    pub fn handle_at(
        &self,
        request: QueryRequest,
        now: DateTime<Local>,
    ) -> Result<QueryResponse, QueryError> {
        debug!(?request, "query");

        let response = match &request {
            QueryRequest::Search { query } => QueryResponse::Search(self.search(field(query))),
            QueryRequest::RoutesBetween { from, to } => {
                QueryResponse::RoutesBetween(self.routes_between(field(from), field(to))?)
            }
            QueryRequest::LiveTimings { stop } => {
                QueryResponse::LiveTimings(self.live_timings(field(stop), now)?)
            }
            QueryRequest::FareEstimate { from, to } => {
                QueryResponse::FareEstimate(self.fare_estimate(field(from), field(to))?)
            }
            QueryRequest::RouteDetails { route } => {
                QueryResponse::RouteDetails(self.route(field(route))?.clone())
            }
            QueryRequest::Accessibility { route } => {
                QueryResponse::Accessibility(self.accessibility(field(route))?)
            }
            QueryRequest::StopsNear { area } => {
                QueryResponse::StopsNear(self.stops_near(field(area))?)
            }
            QueryRequest::AllAreas => QueryResponse::AllAreas(self.all_areas()),
            QueryRequest::Status => QueryResponse::Status(self.status(now)),
        };

        Ok(response)
    }

    /// Free-text search. Blank or one-character queries match nothing.
    pub fn search(&self, query: &str) -> Arc<SearchResults> {
        self.search.search(query.trim())
    }

    /// Routes serving both `from` and `to`. Both are required.
    pub fn routes_between(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Arc<Vec<RouteMatch>>, QueryError> {
        let from = required(from, "from")?;
        let to = required(to, "to")?;
        Ok(self.matcher.routes_between(from, to))
    }

    /// Synthesized arrivals at a stop or area.
    pub fn live_timings(
        &self,
        stop: &str,
        now: DateTime<Local>,
    ) -> Result<LiveTimingsResult, QueryError> {
        let label = required(stop, "stop")?;
        let board = self.live.board(label, now.naive_local());
        Ok(LiveTimingsResult {
            stop: label.to_string(),
            board,
        })
    }

    /// Distance and fares between two named stops.
    pub fn fare_estimate(&self, from: &str, to: &str) -> Result<FareEstimate, QueryError> {
        let from = required(from, "from")?;
        let to = required(to, "to")?;

        let from_stop = self
            .catalogue
            .stop_ignore_case(from)
            .ok_or_else(|| QueryError::stop_not_found(from))?;
        let to_stop = self
            .catalogue
            .stop_ignore_case(to)
            .ok_or_else(|| QueryError::stop_not_found(to))?;

        let distance = distance_km(from_stop.position, to_stop.position);

        Ok(FareEstimate {
            from: from_stop.name.clone(),
            to: to_stop.name.clone(),
            distance_km: round_km(distance),
            fare: fare_for(distance),
            special_offers: &FARE_OFFERS,
        })
    }

    /// Look up a route by number, e.g. `"23a"` or `"23A"`.
    pub fn route(&self, number: &str) -> Result<&Route, QueryError> {
        let raw = required(number, "route")?;
        RouteNumber::parse_normalized(raw)
            .ok()
            .and_then(|n| self.catalogue.route(&n))
            .ok_or_else(|| QueryError::route_not_found(raw))
    }

    /// Accessibility features of a route.
    pub fn accessibility(&self, number: &str) -> Result<AccessibilityInfo, QueryError> {
        self.route(number).map(AccessibilityInfo::for_route)
    }

    /// Stops whose name or zone contains `area`.
    pub fn stops_near(&self, area: &str) -> Result<Vec<NearbyStop>, QueryError> {
        let area = required(area, "area")?;
        Ok(self
            .catalogue
            .stops_matching_label(area)
            .into_iter()
            .map(|m| NearbyStop {
                stop: m.stop.clone(),
                matched_by: m.matched_by,
            })
            .collect())
    }

    /// Every known place name, sorted.
    pub fn all_areas(&self) -> Vec<String> {
        self.catalogue.all_areas().to_vec()
    }

    /// Operator status, regenerated once per TTL window.
    pub fn status(&self, now: DateTime<Local>) -> Arc<ServiceStatus> {
        self.status.get_or_insert_with((), now.naive_local(), || {
            Arc::new(ServiceStatus::new(
                now.with_timezone(&Utc),
                self.catalogue.routes().len(),
                self.catalogue.area_groups().len(),
            ))
        })
    }
}

/// An optional request field, with absence read as blank.
fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

/// Trim a required parameter, rejecting blank values.
fn required<'a>(value: &'a str, name: &'static str) -> Result<&'a str, QueryError> {
    let value = value.trim();
    if value.is_empty() {
        Err(QueryError::MissingParameter(name))
    } else {
        Ok(value)
    }
}
