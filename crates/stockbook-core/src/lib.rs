//! Store traits and repository logic for stockbook.
//!
//! This crate defines the "ports" (store traits) that the infrastructure
//! layer implements, plus the repository layer the transport consumes. It
//! depends only on `stockbook-types` -- never on `stockbook-infra` or any
//! database/IO crate.

pub mod repository;
pub mod store;
