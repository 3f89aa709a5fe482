//! Free-text search across routes, areas and stops.

use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::cache::BoundedCache;
use crate::catalogue::Catalogue;
use crate::domain::Route;

/// Queries shorter than this (in characters) return nothing.
pub const MIN_QUERY_LEN: usize = 2;

/// Result budget per category.
pub const MAX_ROUTE_RESULTS: usize = 10;
pub const MAX_AREA_RESULTS: usize = 5;
pub const MAX_STOP_RESULTS: usize = 5;

/// Matches for one query, each category already capped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub routes: Vec<Route>,
    pub areas: Vec<String>,
    pub stops: Vec<String>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.areas.is_empty() && self.stops.is_empty()
    }
}

/// Substring search over the catalogue with a bounded result cache.
#[derive(Debug)]
pub struct SearchIndex {
    catalogue: Arc<Catalogue>,
    /// Lowercased "name key-stops number" text per route, in catalogue order.
    route_text: OnceLock<Vec<String>>,
    cache: BoundedCache<String, Arc<SearchResults>>,
}

impl SearchIndex {
    pub fn new(catalogue: Arc<Catalogue>, cache_capacity: usize) -> Self {
        Self {
            catalogue,
            route_text: OnceLock::new(),
            cache: BoundedCache::new(cache_capacity),
        }
    }

    /// Search routes, areas and stops for `query`.
    ///
    /// Matching is a case-insensitive substring test. Results for a query are
    /// cached and replayed as-is on later calls.
    pub fn search(&self, query: &str) -> Arc<SearchResults> {
        if query.chars().count() < MIN_QUERY_LEN {
            return Arc::new(SearchResults::default());
        }
        let query = query.to_lowercase();

        if let Some(hit) = self.cache.get(&query) {
            debug!(%query, "search cache hit");
            return hit;
        }

        self.cache
            .get_or_insert_with(query.clone(), || Arc::new(self.compute(&query)))
    }

    fn compute(&self, query: &str) -> SearchResults {
        let routes = self
            .route_text()
            .iter()
            .zip(self.catalogue.routes())
            .filter(|(text, _)| text.contains(query))
            .map(|(_, route)| route.clone())
            .take(MAX_ROUTE_RESULTS)
            .collect();

        let areas = self
            .catalogue
            .all_areas()
            .iter()
            .filter(|area| area.to_lowercase().contains(query))
            .take(MAX_AREA_RESULTS)
            .cloned()
            .collect();

        let stops = self
            .catalogue
            .stops()
            .iter()
            .filter(|stop| stop.name.to_lowercase().contains(query))
            .take(MAX_STOP_RESULTS)
            .map(|stop| stop.name.clone())
            .collect();

        let results = SearchResults {
            routes,
            areas,
            stops,
        };
        debug!(
            %query,
            routes = results.routes.len(),
            areas = results.areas.len(),
            stops = results.stops.len(),
            "search computed"
        );
        results
    }

    fn route_text(&self) -> &[String] {
        self.route_text.get_or_init(|| {
            self.catalogue
                .routes()
                .iter()
                .map(|r| {
                    format!("{} {} {}", r.name, r.key_stops.join(" "), r.number).to_lowercase()
                })
                .collect()
        })
    }

    /// Number of cached queries.
    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FareSchedule, Frequency, RouteNumber, ServiceType};

    fn index() -> SearchIndex {
        SearchIndex::new(Arc::new(Catalogue::chennai().unwrap()), 50)
    }

    fn numbers(results: &SearchResults) -> Vec<&str> {
        results.routes.iter().map(|r| r.number.as_str()).collect()
    }

    #[test]
    fn short_queries_return_nothing() {
        let index = index();
        assert!(index.search("").is_empty());
        assert!(index.search("a").is_empty());
        assert_eq!(index.cached_queries(), 0);
    }

    #[test]
    fn length_counted_before_lowercasing() {
        // "İ" lowercases to two chars
        let index = index();
        assert!(index.search("İ").is_empty());
        assert_eq!(index.cached_queries(), 0);
    }

    #[test]
    fn finds_route_by_number() {
        let results = index().search("23A");
        assert!(numbers(&results).contains(&"23A"));
    }

    #[test]
    fn finds_routes_by_key_stop() {
        let results = index().search("velachery");
        assert_eq!(numbers(&results), ["70"]);
        assert_eq!(results.areas, ["Velachery"]);
        assert_eq!(results.stops, ["Velachery"]);
    }

    #[test]
    fn query_is_case_insensitive() {
        let index = index();
        assert_eq!(*index.search("ADYAR"), *index.search("adyar"));
    }

    #[test]
    fn categories_are_capped() {
        let results = index().search("broadway");
        // Every route but 70 and 100 passes through Broadway
        assert_eq!(results.routes.len(), 8);

        let results = index().search("an");
        assert!(results.routes.len() <= MAX_ROUTE_RESULTS);
        assert_eq!(results.areas.len(), MAX_AREA_RESULTS);
        assert!(results.stops.len() <= MAX_STOP_RESULTS);
    }

    #[test]
    fn route_cap_applies_to_large_catalogues() {
        let routes = (0..15)
            .map(|i| Route {
                number: RouteNumber::parse(&i.to_string()).unwrap(),
                name: format!("Depot - Stop {i}"),
                service_type: ServiceType::Ordinary,
                fare: FareSchedule {
                    ordinary: 10,
                    deluxe: 15,
                },
                frequency: Frequency::new("10 minutes"),
                operating_hours: String::new(),
                key_stops: vec!["Depot".into(), format!("Stop {i}")],
                accessibility: Vec::new(),
                distance: None,
            })
            .collect();
        let catalogue = Catalogue::new(routes, Vec::new(), Vec::new()).unwrap();
        let index = SearchIndex::new(Arc::new(catalogue), 50);

        let results = index.search("depot");
        assert_eq!(results.routes.len(), MAX_ROUTE_RESULTS);
        assert_eq!(results.routes[0].number.as_str(), "0");
    }

    #[test]
    fn no_matches_is_empty_not_error() {
        assert!(index().search("zzzz").is_empty());
    }

    #[test]
    fn repeated_query_is_served_from_cache() {
        let index = index();
        let first = index.search("guindy");
        let second = index.search("Guindy");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(index.cached_queries(), 1);
    }

    #[test]
    fn cache_is_bounded() {
        let index = SearchIndex::new(Arc::new(Catalogue::chennai().unwrap()), 3);
        for q in ["broadway", "adyar", "guindy", "egmore", "tambaram"] {
            index.search(q);
        }
        assert_eq!(index.cached_queries(), 3);
    }
}
