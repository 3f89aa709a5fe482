//! Errors reported to callers of the query facade.

use std::fmt;

/// Kind of catalogue entity a lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Route,
    Stop,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Route => "route",
            EntityKind::Stop => "bus stop",
        })
    }
}

/// A query the engine could not answer.
///
/// An empty result is not an error: searches and route lookups with no
/// matches succeed with empty lists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Unknown route number or stop name
    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },

    /// A required request field was absent or blank
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),
}

impl QueryError {
    pub(crate) fn route_not_found(name: impl Into<String>) -> Self {
        QueryError::NotFound {
            kind: EntityKind::Route,
            name: name.into(),
        }
    }

    pub(crate) fn stop_not_found(name: impl Into<String>) -> Self {
        QueryError::NotFound {
            kind: EntityKind::Stop,
            name: name.into(),
        }
    }
}
