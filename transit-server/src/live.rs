//! Synthesized real-time arrivals.
//!
//! There is no upstream feed: arrivals are generated from the catalogue
//! with a little randomness so the board looks live. A generated board is
//! replayed unchanged for the TTL window, which keeps repeated lookups of
//! the same stop stable.
//!
//! Generation ([`synthesize`]) is a pure function of its inputs and the
//! random source; [`LiveTimings`] adds the cache and owns the source.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, NaiveTime};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::cache::TtlCache;
use crate::catalogue::Catalogue;
use crate::domain::{FareSchedule, Frequency, Route, RouteNumber, ServiceType};

/// Spacing between successive routes at the same stop, in minutes.
pub const ROUTE_SPACING_MINS: u32 = 3;

/// Random delay added to each arrival is drawn from `0..MAX_JITTER_MINS`.
pub const MAX_JITTER_MINS: u32 = 8;

/// One upcoming departure at a stop.
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    pub route_number: RouteNumber,
    pub route_name: String,
    pub service_type: ServiceType,
    pub next_arrival: NaiveTime,
    pub minutes_away: u32,
    /// The bus after next, one headway later.
    pub next_bus: NaiveTime,
    pub frequency: Frequency,
    pub accessibility: Vec<String>,
    pub fare: FareSchedule,
}

/// Arrivals at a stop, soonest first.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveBoard {
    pub last_updated: NaiveTime,
    pub timings: Vec<Timing>,
}

/// Routes with a key stop containing `label`, ignoring case.
pub fn routes_serving<'a>(catalogue: &'a Catalogue, label: &str) -> Vec<&'a Route> {
    let needle = label.to_lowercase();
    catalogue
        .routes()
        .iter()
        .filter(|route| route.first_stop_containing(&needle).is_some())
        .collect()
}

/// Generate a board for the given routes as seen at `now`.
///
/// The i-th route arrives `i * 3 + jitter` minutes from now, with jitter
/// drawn from `rng`. The following bus comes one minimum headway later.
pub fn synthesize<R: Rng>(routes: &[&Route], now: NaiveDateTime, rng: &mut R) -> LiveBoard {
    let mut timings: Vec<Timing> = routes
        .iter()
        .enumerate()
        .map(|(i, route)| {
            let spacing = u32::try_from(i)
                .unwrap_or(u32::MAX)
                .saturating_mul(ROUTE_SPACING_MINS);
            let minutes_away = spacing.saturating_add(rng.random_range(0..MAX_JITTER_MINS));
            let headway = route.frequency.lower_bound_mins();

            Timing {
                route_number: route.number.clone(),
                route_name: route.name.clone(),
                service_type: route.service_type,
                next_arrival: clock_after(now, minutes_away),
                minutes_away,
                next_bus: clock_after(now, minutes_away.saturating_add(headway)),
                frequency: route.frequency.clone(),
                accessibility: route.accessibility.clone(),
                fare: route.fare,
            }
        })
        .collect();

    timings.sort_by_key(|t| t.minutes_away);

    LiveBoard {
        last_updated: now.time(),
        timings,
    }
}

fn clock_after(now: NaiveDateTime, minutes: u32) -> NaiveTime {
    (now + chrono::Duration::minutes(i64::from(minutes))).time()
}

/// Normalized cache key for a stop or area label.
fn board_key(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Live-timing boards with TTL replay.
///
/// Boards are keyed by the trimmed, lowercased label, so "Central" and
/// "central" share one board.
pub struct LiveTimings {
    catalogue: Arc<Catalogue>,
    cache: TtlCache<String, Arc<LiveBoard>>,
    rng: Mutex<StdRng>,
}

impl LiveTimings {
    /// Create a synthesizer seeded from the operating system.
    pub fn new(catalogue: Arc<Catalogue>, ttl: Duration) -> Self {
        Self::with_rng(catalogue, ttl, StdRng::from_os_rng())
    }

    /// Create a synthesizer with an explicit random source.
    pub fn with_rng(catalogue: Arc<Catalogue>, ttl: Duration, rng: StdRng) -> Self {
        Self {
            catalogue,
            cache: TtlCache::new(ttl),
            rng: Mutex::new(rng),
        }
    }

    /// The board for `label` at `now`, replaying a cached board if one was
    /// generated less than one TTL before `now`.
    pub fn board(&self, label: &str, now: NaiveDateTime) -> Arc<LiveBoard> {
        let key = board_key(label);

        if let Some(hit) = self.cache.get(&key, now) {
            debug!(stop = %key, "live timing cache hit");
            return hit;
        }

        self.cache.get_or_insert_with(key.clone(), now, || {
            let routes = routes_serving(&self.catalogue, &key);
            let board = synthesize(&routes, now, &mut *self.rng.lock());
            debug!(stop = %key, timings = board.timings.len(), "synthesized live timings");
            Arc::new(board)
        })
    }
}

impl std::fmt::Debug for LiveTimings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveTimings")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn catalogue() -> Arc<Catalogue> {
        Arc::new(Catalogue::chennai().unwrap())
    }

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn routes_serving_matches_substrings() {
        let catalogue = catalogue();
        let numbers: Vec<_> = routes_serving(&catalogue, "T.NAGAR")
            .iter()
            .map(|r| r.number.as_str())
            .collect();
        assert_eq!(numbers, ["23A", "70", "100"]);
    }

    #[test]
    fn delays_follow_route_spacing() {
        let catalogue = catalogue();
        let routes = routes_serving(&catalogue, "Broadway");
        let board = synthesize(&routes, at(10, 0), &mut seeded(1));

        assert_eq!(board.timings.len(), routes.len());
        assert_eq!(board.last_updated, NaiveTime::from_hms_opt(10, 0, 0).unwrap());

        for timing in &board.timings {
            let i = routes
                .iter()
                .position(|r| r.number == timing.route_number)
                .unwrap() as u32;
            let base = i * ROUTE_SPACING_MINS;
            assert!(timing.minutes_away >= base);
            assert!(timing.minutes_away < base + MAX_JITTER_MINS);
        }
    }

    #[test]
    fn timings_sorted_soonest_first() {
        let catalogue = catalogue();
        let routes = routes_serving(&catalogue, "Broadway");
        for seed in 0..20 {
            let board = synthesize(&routes, at(8, 30), &mut seeded(seed));
            assert!(
                board
                    .timings
                    .windows(2)
                    .all(|w| w[0].minutes_away <= w[1].minutes_away)
            );
        }
    }

    #[test]
    fn clock_times_follow_delay_and_headway() {
        let catalogue = catalogue();
        let routes = routes_serving(&catalogue, "Besant Nagar");
        let board = synthesize(&routes, at(10, 0), &mut seeded(7));

        let timing = &board.timings[0];
        assert_eq!(timing.route_number.as_str(), "100");
        let expected_arrival = at(10, 0) + chrono::Duration::minutes(timing.minutes_away as i64);
        assert_eq!(timing.next_arrival, expected_arrival.time());
        // Route 100 runs every 12-18 minutes
        let expected_next = expected_arrival + chrono::Duration::minutes(12);
        assert_eq!(timing.next_bus, expected_next.time());
    }

    #[test]
    fn clock_wraps_past_midnight() {
        let catalogue = catalogue();
        let routes = routes_serving(&catalogue, "Besant Nagar");
        let board = synthesize(&routes, at(23, 58), &mut seeded(3));
        assert!(board.timings[0].next_bus < NaiveTime::from_hms_opt(1, 0, 0).unwrap());
    }

    #[test]
    fn same_seed_same_board() {
        let catalogue = catalogue();
        let routes = routes_serving(&catalogue, "Guindy");
        let a = synthesize(&routes, at(9, 0), &mut seeded(42));
        let b = synthesize(&routes, at(9, 0), &mut seeded(42));
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_stop_gives_empty_board() {
        let live = LiveTimings::with_rng(catalogue(), Duration::from_secs(600), seeded(0));
        assert!(live.board("Nowhere", at(10, 0)).timings.is_empty());
    }

    #[test]
    fn board_replayed_within_ttl() {
        let live = LiveTimings::with_rng(catalogue(), Duration::from_secs(600), seeded(9));
        let first = live.board("Broadway", at(10, 0));
        let second = live.board("Broadway", at(10, 5));
        assert_eq!(first.timings, second.timings);
        assert_eq!(second.last_updated, first.last_updated);
    }

    #[test]
    fn labels_differing_in_case_share_a_board() {
        let live = LiveTimings::with_rng(catalogue(), Duration::from_secs(600), seeded(9));
        let upper = live.board("Central", at(10, 0));
        let lower = live.board(" central ", at(10, 1));
        assert!(Arc::ptr_eq(&upper, &lower));
    }

    #[test]
    fn board_regenerated_after_ttl() {
        let live = LiveTimings::with_rng(catalogue(), Duration::from_secs(600), seeded(9));
        let first = live.board("Broadway", at(10, 0));
        let second = live.board("Broadway", at(10, 11));
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.last_updated, NaiveTime::from_hms_opt(10, 11, 0).unwrap());
    }

    #[test]
    fn board_never_replayed_hours_later() {
        let live = LiveTimings::with_rng(catalogue(), Duration::from_secs(600), seeded(9));
        live.board("Broadway", at(10, 0));
        let later = live.board("Broadway", at(13, 0));
        assert_eq!(later.last_updated, NaiveTime::from_hms_opt(13, 0, 0).unwrap());
        assert!(
            later
                .timings
                .iter()
                .all(|t| t.next_arrival >= NaiveTime::from_hms_opt(13, 0, 0).unwrap())
        );
    }
}
