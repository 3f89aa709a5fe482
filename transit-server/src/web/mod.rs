//! HTTP adapter for the query facade.
//!
//! Exposes each query as a JSON endpoint, plus `POST /api/query` for
//! callers that already speak [`crate::query::QueryRequest`].

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
