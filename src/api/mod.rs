//! Booking API integration.
//!
//! Provides the request dispatcher with multi-endpoint failover and thin
//! route wrappers for authentication, customers, therapists, staff and
//! profiles.

/// Request dispatcher
pub mod client;
/// Candidate base URLs
pub mod endpoints;
/// Response body classification
pub mod payload;
/// Request descriptors
pub mod request;

mod auth;
mod customer;
mod profile;
mod staff;
mod therapist;

// Re-export key components
pub use auth::AuthApi;
pub use client::ApiClient;
pub use customer::CustomerApi;
pub use endpoints::EndpointList;
pub use payload::Payload;
pub use profile::ProfileApi;
pub use request::{FormPayload, FormValue, Method, RequestBody, RequestDescriptor};
pub use staff::{StaffApi, StaffOverview};
pub use therapist::TherapistApi;
