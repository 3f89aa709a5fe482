//! Distance and fare calculation between stops.
//!
//! Everything here is a pure function and safe to call from any thread.

use ::geo::{HaversineDistance, Point};

use crate::domain::Coordinates;

/// Mean Earth radius used for stop distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Mean Earth radius `geo` measures haversine distances with, in metres.
const GEO_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A distance-based fare tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FareTier {
    /// The tier applies to distances strictly greater than this bound.
    pub above_km: u32,
    /// Ordinary fare in rupees.
    pub ordinary: u32,
}

/// Fare tiers in ascending distance order. The first tier is the minimum
/// fare and also covers zero-length and unmeasurable trips.
pub const FARE_TIERS: [FareTier; 5] = [
    FareTier {
        above_km: 0,
        ordinary: 8,
    },
    FareTier {
        above_km: 5,
        ordinary: 12,
    },
    FareTier {
        above_km: 10,
        ordinary: 15,
    },
    FareTier {
        above_km: 20,
        ordinary: 20,
    },
    FareTier {
        above_km: 30,
        ordinary: 25,
    },
];

/// Deluxe and AC fares as multiples of the ordinary fare, in tenths.
const DELUXE_TENTHS: u32 = 14;
const AC_TENTHS: u32 = 18;

/// Fares for one trip across the three bus classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fare {
    pub ordinary: u32,
    pub deluxe: u32,
    pub ac: u32,
}

/// Great-circle distance between two positions in kilometres, on a sphere
/// of radius [`EARTH_RADIUS_KM`].
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let metres = point(a).haversine_distance(&point(b));
    metres / GEO_EARTH_RADIUS_M * EARTH_RADIUS_KM
}

fn point(c: Coordinates) -> Point {
    Point::new(c.lng, c.lat)
}

/// The fare tier for a trip of the given length.
pub fn fare_tier(distance_km: f64) -> FareTier {
    FARE_TIERS
        .iter()
        .rev()
        .find(|tier| distance_km > f64::from(tier.above_km))
        .copied()
        .unwrap_or(FARE_TIERS[0])
}

/// Fares for a trip of the given length.
///
/// Deluxe is the ordinary fare times 1.4 and AC times 1.8, each rounded
/// half up to whole rupees.
pub fn fare_for(distance_km: f64) -> Fare {
    let ordinary = fare_tier(distance_km).ordinary;
    Fare {
        ordinary,
        deluxe: scale_tenths(ordinary, DELUXE_TENTHS),
        ac: scale_tenths(ordinary, AC_TENTHS),
    }
}

/// `amount * tenths / 10`, rounded half up.
fn scale_tenths(amount: u32, tenths: u32) -> u32 {
    (amount * tenths + 5) / 10
}

/// Round a distance to two decimal places for display.
pub fn round_km(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}

/// Render a fare for display, e.g. `₹15`.
pub fn format_fare(amount: u32) -> String {
    format!("₹{amount}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROADWAY: Coordinates = Coordinates::new(13.0878, 80.2785);
    const ADYAR: Coordinates = Coordinates::new(13.0067, 80.2568);
    const TAMBARAM: Coordinates = Coordinates::new(12.9249, 80.1000);

    #[test]
    fn distance_broadway_to_adyar() {
        let d = distance_km(BROADWAY, ADYAR);
        assert!((d - 9.33).abs() < 0.05, "got {d}");
    }

    #[test]
    fn quarter_meridian_uses_mean_radius() {
        let equator = Coordinates::new(0.0, 0.0);
        let pole = Coordinates::new(90.0, 0.0);
        let expected = EARTH_RADIUS_KM * std::f64::consts::FRAC_PI_2;
        assert!((distance_km(equator, pole) - expected).abs() < 1e-6);
    }

    #[test]
    fn distance_is_zero_for_same_point() {
        assert_eq!(distance_km(TAMBARAM, TAMBARAM), 0.0);
    }

    #[test]
    fn tier_boundaries_are_exclusive() {
        assert_eq!(fare_for(0.0).ordinary, 8);
        assert_eq!(fare_for(5.0).ordinary, 8);
        assert_eq!(fare_for(5.01).ordinary, 12);
        assert_eq!(fare_for(10.0).ordinary, 12);
        assert_eq!(fare_for(10.5).ordinary, 15);
        assert_eq!(fare_for(20.0).ordinary, 15);
        assert_eq!(fare_for(25.0).ordinary, 20);
        assert_eq!(fare_for(30.0).ordinary, 20);
        assert_eq!(fare_for(30.1).ordinary, 25);
        assert_eq!(fare_for(500.0).ordinary, 25);
    }

    #[test]
    fn unmeasurable_distance_gets_minimum_fare() {
        assert_eq!(fare_for(f64::NAN).ordinary, 8);
        assert_eq!(fare_for(-3.0).ordinary, 8);
    }

    #[test]
    fn class_multipliers() {
        assert_eq!(
            fare_for(1.0),
            Fare {
                ordinary: 8,
                deluxe: 11,
                ac: 14
            }
        );
        assert_eq!(
            fare_for(7.0),
            Fare {
                ordinary: 12,
                deluxe: 17,
                ac: 22
            }
        );
        assert_eq!(
            fare_for(40.0),
            Fare {
                ordinary: 25,
                deluxe: 35,
                ac: 45
            }
        );
    }

    #[test]
    fn multipliers_match_float_rounding_for_every_tier() {
        for tier in FARE_TIERS {
            let fare = fare_for(f64::from(tier.above_km) + 0.5);
            assert_eq!(fare.ordinary, tier.ordinary);
            assert_eq!(fare.deluxe, (f64::from(tier.ordinary) * 1.4).round() as u32);
            assert_eq!(fare.ac, (f64::from(tier.ordinary) * 1.8).round() as u32);
        }
    }

    #[test]
    fn tiers_are_ascending() {
        assert!(
            FARE_TIERS
                .windows(2)
                .all(|w| w[0].above_km < w[1].above_km && w[0].ordinary < w[1].ordinary)
        );
    }

    #[test]
    fn rounding_and_formatting() {
        assert_eq!(round_km(9.33456), 9.33);
        assert_eq!(round_km(0.0), 0.0);
        assert_eq!(format_fare(15), "₹15");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn chennai_point() -> impl Strategy<Value = Coordinates> {
        (12.5f64..13.5, 79.8f64..80.6).prop_map(|(lat, lng)| Coordinates::new(lat, lng))
    }

    proptest! {
        /// Distance is symmetric
        #[test]
        fn distance_symmetric(a in chennai_point(), b in chennai_point()) {
            let ab = distance_km(a, b);
            let ba = distance_km(b, a);
            prop_assert!((ab - ba).abs() < 1e-9);
        }

        /// Distance from a point to itself is zero
        #[test]
        fn distance_identity(a in chennai_point()) {
            prop_assert_eq!(distance_km(a, a), 0.0);
        }

        /// Distance is never negative
        #[test]
        fn distance_non_negative(a in chennai_point(), b in chennai_point()) {
            prop_assert!(distance_km(a, b) >= 0.0);
        }

        /// Fares never decrease as distance grows
        #[test]
        fn fare_monotonic(d1 in 0.0f64..100.0, d2 in 0.0f64..100.0) {
            let (lo, hi) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
            let (f_lo, f_hi) = (fare_for(lo), fare_for(hi));
            prop_assert!(f_lo.ordinary <= f_hi.ordinary);
            prop_assert!(f_lo.deluxe <= f_hi.deluxe);
            prop_assert!(f_lo.ac <= f_hi.ac);
        }

        /// Deluxe fare is the rounded 1.4x multiple of the ordinary fare
        #[test]
        fn deluxe_multiplier(d in 0.0f64..100.0) {
            let fare = fare_for(d);
            prop_assert_eq!(fare.deluxe, (f64::from(fare.ordinary) * 1.4).round() as u32);
        }
    }
}
