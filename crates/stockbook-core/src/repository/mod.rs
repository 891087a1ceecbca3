//! Repository layer: the query/mutation surface consumed by the transport.
//!
//! Repositories own filter and replacement semantics and delegate
//! persistence to the store traits. They never validate request shapes --
//! that happens at the transport boundary before a repository is reached.

pub mod annotation;
pub mod instrument;
