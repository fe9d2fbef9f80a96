//! GraphQL contract checker for the storefront API.

pub mod config;
pub mod contract;
pub mod reporter;
pub mod runner;
pub mod vars;

#[cfg(feature = "embedded")]
pub mod embedded;
