//! Cross-service plumbing shared by Credence services.
//!
//! Provides env-based config loading, health handlers, the request-id layer,
//! tracing setup, and serde helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
