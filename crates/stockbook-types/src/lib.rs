//! Shared domain types for stockbook.
//!
//! This crate contains the core domain types used across the service:
//! Instrument, Annotation, their field sets, and the store error taxonomy.
//! Zero infrastructure dependencies -- only serde, chrono, rust_decimal,
//! thiserror.

pub mod annotation;
pub mod config;
pub mod error;
pub mod instrument;
