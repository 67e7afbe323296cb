//! Auth types shared across Credence services.
//!
//! Provides the JWT token codec, cookie builders, and the
//! `AuthenticatedPrincipal` extractor.

pub mod cookie;
pub mod principal;
pub mod token;
