//! Route number type.

use std::fmt;

/// Error returned when parsing an invalid route number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route number: {reason}")]
pub struct InvalidRouteNumber {
    reason: &'static str,
}

/// Maximum length of a route number ("570S", "M70", "23A", ...).
const MAX_LEN: usize = 6;

/// A bus route number such as `1`, `23A` or `27D`.
///
/// Route numbers are 1 to 6 ASCII digits or uppercase letters. They are not
/// numeric: `23A` and `23` are different routes, and ordering is textual.
///
/// # Examples
///
/// ```
/// use transit_server::domain::RouteNumber;
///
/// let route = RouteNumber::parse("23A").unwrap();
/// assert_eq!(route.as_str(), "23A");
///
/// // Lowercase is rejected by `parse` but accepted by `parse_normalized`
/// assert!(RouteNumber::parse("23a").is_err());
/// assert_eq!(RouteNumber::parse_normalized(" 23a ").unwrap(), route);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteNumber(String);

impl RouteNumber {
    /// Parse a route number in canonical form.
    pub fn parse(s: &str) -> Result<Self, InvalidRouteNumber> {
        if s.is_empty() {
            return Err(InvalidRouteNumber {
                reason: "must not be empty",
            });
        }

        if s.len() > MAX_LEN {
            return Err(InvalidRouteNumber {
                reason: "must be at most 6 characters",
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
        {
            return Err(InvalidRouteNumber {
                reason: "must be ASCII digits or uppercase letters",
            });
        }

        Ok(RouteNumber(s.to_string()))
    }

    /// Parse user input: surrounding whitespace is trimmed and letters are
    /// uppercased before validation.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidRouteNumber> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the route number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RouteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteNumber({})", self.0)
    }
}

impl fmt::Display for RouteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
