//! Bus stops and their geographic zones.

use std::fmt;

/// Error returned when parsing an unknown zone label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown zone: {0}")]
pub struct InvalidZone(pub String);

/// Geographic zone a stop belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Central,
    North,
    South,
    East,
    West,
}

impl Zone {
    /// Parse a zone label, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidZone> {
        match s.trim().to_ascii_lowercase().as_str() {
            "central" => Ok(Zone::Central),
            "north" => Ok(Zone::North),
            "south" => Ok(Zone::South),
            "east" => Ok(Zone::East),
            "west" => Ok(Zone::West),
            _ => Err(InvalidZone(s.to_string())),
        }
    }

    /// Display label, e.g. `"Central"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Central => "Central",
            Zone::North => "North",
            Zone::South => "South",
            Zone::East => "East",
            Zone::West => "West",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A bus stop with a known position.
///
/// The name is the stop's identity and is matched case-sensitively by
/// exact lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub name: String,
    pub position: Coordinates,
    pub zone: Zone,
    /// Free-form facility tags such as "Shelter" or "Metro Connection".
    pub facilities: Vec<String>,
}

impl Stop {
    pub fn new(
        name: impl Into<String>,
        position: Coordinates,
        zone: Zone,
        facilities: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            zone,
            facilities,
        }
    }
}
