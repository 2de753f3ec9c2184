//! `ZenBook` - client for the `ZenBook` massage booking API.
//!
//! This crate provides bearer-token authentication, booking, therapist, staff
//! and profile routes on top of a request dispatcher that fails over across
//! several candidate API base URLs.

// Re-export public modules for use in integration tests and as a library
pub mod api;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod format;
pub mod navigation;
pub mod types;

pub use api::{ApiClient, EndpointList, Payload, RequestDescriptor};
pub use error::{Error, Result};
