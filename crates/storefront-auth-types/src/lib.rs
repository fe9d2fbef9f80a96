//! Auth types shared across the storefront workspace.
//!
//! Provides JWT issue/validation, the bearer-token extractor and password hashing.

pub mod identity;
pub mod password;
pub mod token;
