//! The static transit catalogue.
//!
//! Routes, stops and area groupings are loaded once at startup and never
//! mutated afterwards, so the catalogue can be shared between threads
//! without locking. A route may name a key stop that has no coordinates;
//! that is tolerated here and only affects geographic lookups.

mod error;
mod loader;

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::OnceLock;

use tracing::{debug, info};

use crate::domain::{Area, Route, RouteNumber, Stop};

pub use error::CatalogueError;
pub use loader::{Dataset, parse_dataset, read_dataset};

/// The bundled Chennai MTC dataset.
const CHENNAI_MTC: &str = include_str!("../../data/chennai_mtc.json");

/// How a stop matched a label query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedBy {
    Name,
    Zone,
}

/// A stop returned by [`Catalogue::stops_matching_label`].
#[derive(Debug, Clone, Copy)]
pub struct StopMatch<'a> {
    pub stop: &'a Stop,
    pub matched_by: MatchedBy,
}

/// Immutable in-memory snapshot of routes, stops and areas.
#[derive(Debug)]
pub struct Catalogue {
    routes: Vec<Route>,
    route_index: HashMap<RouteNumber, usize>,
    stops: Vec<Stop>,
    stop_index: HashMap<String, usize>,
    areas: Vec<Area>,
    /// Sorted, de-duplicated union of all area places. Built on first use.
    all_areas: OnceLock<Vec<String>>,
}

impl Catalogue {
    /// Build a catalogue, rejecting duplicate route numbers and stop names.
    pub fn new(
        routes: Vec<Route>,
        stops: Vec<Stop>,
        areas: Vec<Area>,
    ) -> Result<Self, CatalogueError> {
        let mut route_index = HashMap::with_capacity(routes.len());
        for (i, route) in routes.iter().enumerate() {
            if route.key_stops.len() < 2 {
                return Err(CatalogueError::TooFewStops(route.number.to_string()));
            }
            if route_index.insert(route.number.clone(), i).is_some() {
                return Err(CatalogueError::DuplicateRoute(route.number.to_string()));
            }
        }

        let mut stop_index = HashMap::with_capacity(stops.len());
        for (i, stop) in stops.iter().enumerate() {
            if stop_index.insert(stop.name.clone(), i).is_some() {
                return Err(CatalogueError::DuplicateStop(stop.name.clone()));
            }
        }

        let catalogue = Self {
            routes,
            route_index,
            stops,
            stop_index,
            areas,
            all_areas: OnceLock::new(),
        };

        let unresolved = catalogue.unresolved_key_stops();
        if !unresolved.is_empty() {
            debug!(
                count = unresolved.len(),
                labels = ?unresolved,
                "key stops without coordinates"
            );
        }

        Ok(catalogue)
    }

    /// Build a catalogue from a parsed dataset.
    pub fn from_dataset(dataset: Dataset) -> Result<Self, CatalogueError> {
        Self::new(dataset.routes, dataset.stops, dataset.areas)
    }

    /// Load a catalogue from a JSON dataset file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogueError> {
        let catalogue = Self::from_dataset(read_dataset(path)?)?;
        info!(
            path = %path.display(),
            routes = catalogue.routes.len(),
            stops = catalogue.stops.len(),
            "loaded catalogue"
        );
        Ok(catalogue)
    }

    /// The bundled Chennai MTC catalogue.
    pub fn chennai() -> Result<Self, CatalogueError> {
        Self::from_dataset(parse_dataset(CHENNAI_MTC)?)
    }

    /// Look up a route by number. Absence is a normal outcome.
    pub fn route(&self, number: &RouteNumber) -> Option<&Route> {
        self.route_index.get(number).map(|&i| &self.routes[i])
    }

    /// All routes in dataset order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Look up a stop by its exact, case-sensitive name.
    pub fn stop(&self, name: &str) -> Option<&Stop> {
        self.stop_index.get(name).map(|&i| &self.stops[i])
    }

    /// Look up a stop by name ignoring case and surrounding whitespace.
    ///
    /// An exact match wins over a case-insensitive one.
    pub fn stop_ignore_case(&self, name: &str) -> Option<&Stop> {
        let name = name.trim();
        self.stop(name).or_else(|| {
            self.stops
                .iter()
                .find(|s| s.name.to_lowercase() == name.to_lowercase())
        })
    }

    /// All stops in dataset order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Area groupings in dataset order.
    pub fn area_groups(&self) -> &[Area] {
        &self.areas
    }

    /// Every place named by any area, de-duplicated and sorted.
    ///
    /// Computed once and reused for the lifetime of the catalogue.
    pub fn all_areas(&self) -> &[String] {
        self.all_areas.get_or_init(|| {
            self.areas
                .iter()
                .flat_map(|a| a.places.iter().cloned())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        })
    }

    /// Stops whose name or zone contains `label`, ignoring case.
    ///
    /// A stop matching on both is reported as matched by name.
    pub fn stops_matching_label(&self, label: &str) -> Vec<StopMatch<'_>> {
        let needle = label.to_lowercase();

        self.stops
            .iter()
            .filter_map(|stop| {
                let matched_by = if stop.name.to_lowercase().contains(&needle) {
                    MatchedBy::Name
                } else if stop.zone.as_str().to_lowercase().contains(&needle) {
                    MatchedBy::Zone
                } else {
                    return None;
                };
                Some(StopMatch { stop, matched_by })
            })
            .collect()
    }

    /// Key-stop labels that have no stop entry, in first-seen order.
    pub fn unresolved_key_stops(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.routes
            .iter()
            .flat_map(|r| r.key_stops.iter())
            .filter(|label| !self.stop_index.contains_key(label.as_str()))
            .filter(|label| seen.insert(label.as_str()))
            .map(String::as_str)
            .collect()
    }
}
