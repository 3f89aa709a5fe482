//! Transit query engine.
//!
//! Answers questions about a fixed bus network: free-text search over
//! routes, areas and stops, "which routes connect A to B", fares between
//! stops, and a synthesized live arrival board per stop.

pub mod cache;
pub mod catalogue;
pub mod config;
pub mod domain;
pub mod geo;
pub mod live;
pub mod matcher;
pub mod query;
pub mod search;
pub mod web;
