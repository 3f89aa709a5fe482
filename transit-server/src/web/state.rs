//! Application state for the web layer.

use std::sync::Arc;

use crate::query::QueryService;

/// Shared application state.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Query engine, including its caches
    pub service: Arc<QueryService>,
}

impl AppState {
    pub fn new(service: QueryService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
