//! Domain types shared across the storefront workspace.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; `infra/` converts to and from these.

pub mod account;
pub mod catalog;
pub mod id;
pub mod money;
pub mod pagination;
