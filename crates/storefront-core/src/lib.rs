//! Cross-cutting service plumbing: configuration loading, the JSON error
//! envelope for plain HTTP routes, health probes, middleware, tracing setup
//! and sea-orm query helpers.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod tracing;
