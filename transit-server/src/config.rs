//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;

/// Default listen address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

pub const ENV_ADDR: &str = "TRANSIT_ADDR";
pub const ENV_CATALOGUE: &str = "TRANSIT_CATALOGUE";
pub const ENV_SEARCH_CAPACITY: &str = "TRANSIT_SEARCH_CACHE_CAPACITY";
pub const ENV_ROUTE_CAPACITY: &str = "TRANSIT_ROUTE_CACHE_CAPACITY";
pub const ENV_LIVE_TTL_SECS: &str = "TRANSIT_LIVE_TTL_SECS";

/// A configuration variable held a value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {var}: {value:?}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub addr: SocketAddr,

    /// JSON dataset to load instead of the bundled catalogue.
    pub catalogue_path: Option<PathBuf>,

    pub cache: CacheConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            catalogue_path: None,
            cache: CacheConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`; unset variables keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = parse_var(&lookup, ENV_ADDR)? {
            config.addr = addr;
        }

        config.catalogue_path = lookup(ENV_CATALOGUE)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        if let Some(capacity) = parse_var(&lookup, ENV_SEARCH_CAPACITY)? {
            config.cache.search_capacity = capacity;
        }

        if let Some(capacity) = parse_var(&lookup, ENV_ROUTE_CAPACITY)? {
            config.cache.route_between_capacity = capacity;
        }

        if let Some(secs) = parse_var(&lookup, ENV_LIVE_TTL_SECS)? {
            config.cache.live_ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError { var, value }),
    }
}
