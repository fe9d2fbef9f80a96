//! Test utilities for the storefront service.
//!
//! Provides per-test database scopes with record fixtures, force login, and a
//! GraphQL client whose responses carry contract assertions. Use from
//! integration tests only, never from production code.

pub mod auth;
pub mod client;
pub mod fixture;

pub use client::{Envelope, GraphQLClient};
pub use fixture::{FixtureError, Fixtures, TestScope};
