//! HTTP request handlers for the REST API.

pub mod annotation;
pub mod instrument;
