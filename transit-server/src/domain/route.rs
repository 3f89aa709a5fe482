//! Bus routes.

use std::fmt;

use super::RouteNumber;

/// Frequency used when a frequency string carries no leading number.
pub const DEFAULT_FREQUENCY_MINS: u32 = 10;

/// Error returned when parsing an unknown service type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown service type: {0}")]
pub struct InvalidServiceType(pub String);

/// Class of service run on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceType {
    Ordinary,
    Express,
    Deluxe,
}

impl ServiceType {
    /// Parse a service type label, ignoring case.
    pub fn parse(s: &str) -> Result<Self, InvalidServiceType> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ordinary" => Ok(ServiceType::Ordinary),
            "express" => Ok(ServiceType::Express),
            "deluxe" => Ok(ServiceType::Deluxe),
            _ => Err(InvalidServiceType(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Ordinary => "Ordinary",
            ServiceType::Express => "Express",
            ServiceType::Deluxe => "Deluxe",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Published fares for a route, in whole rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FareSchedule {
    pub ordinary: u32,
    pub deluxe: u32,
}

/// Display-only headway such as `"10-15 minutes"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequency(String);

impl Frequency {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first integer in the text, i.e. the shortest advertised headway.
    ///
    /// Falls back to [`DEFAULT_FREQUENCY_MINS`] when the text does not start
    /// with a number.
    pub fn lower_bound_mins(&self) -> u32 {
        let text = self.0.trim_start();
        let digits_end = text
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len());

        text[..digits_end]
            .parse()
            .unwrap_or(DEFAULT_FREQUENCY_MINS)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bus route as an ordered list of key stops.
///
/// Key stops are display labels. They usually name a [`super::Stop`] in the
/// catalogue, but a route may reference a label with no coordinates; such a
/// label still takes part in text matching.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub number: RouteNumber,
    pub name: String,
    pub service_type: ServiceType,
    pub fare: FareSchedule,
    pub frequency: Frequency,
    pub operating_hours: String,
    /// At least two entries; the first and last are the termini.
    pub key_stops: Vec<String>,
    pub accessibility: Vec<String>,
    /// Advertised end-to-end length, e.g. `"25 km"`.
    pub distance: Option<String>,
}

impl Route {
    /// Whether the route carries the given accessibility tag (case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.accessibility.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Index of the first key stop whose lowercased label contains `needle`.
    ///
    /// `needle` must already be lowercase.
    pub fn first_stop_containing(&self, needle: &str) -> Option<usize> {
        self.key_stops
            .iter()
            .position(|stop| stop.to_lowercase().contains(needle))
    }
}
