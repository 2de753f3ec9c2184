use serde_json::json;

use crate::api::client::ApiClient;
use crate::api::payload::Payload;
use crate::api::request::RequestDescriptor;
use crate::error::Result;
use crate::types::{BookingId, BookingStatus};

/// Therapist dashboard, booking responses and availability.
#[derive(Debug, Clone, Copy)]
pub struct TherapistApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TherapistApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /therapist/dashboard`, optionally filtered by status
    pub async fn dashboard(&self, status: Option<BookingStatus>) -> Result<Payload> {
        let request = RequestDescriptor::get("/therapist/dashboard").query_opt("status", status.map(BookingStatus::as_str));
        self.client.send(&request).await
    }

    /// `GET /therapist/bookings`, optionally filtered by status
    pub async fn bookings(&self, status: Option<BookingStatus>) -> Result<Payload> {
        let request = RequestDescriptor::get("/therapist/bookings").query_opt("status", status.map(BookingStatus::as_str));
        self.client.send(&request).await
    }

    /// `POST /therapist/bookings/{id}/accept`
    pub async fn accept_booking(&self, id: &BookingId) -> Result<Payload> {
        self.client.post(&format!("/therapist/bookings/{id}/accept"), &json!({})).await
    }

    /// `POST /therapist/bookings/{id}/decline`
    pub async fn decline_booking(&self, id: &BookingId) -> Result<Payload> {
        self.client.post(&format!("/therapist/bookings/{id}/decline"), &json!({})).await
    }

    /// `POST /therapist/bookings/{id}/update-status`
    pub async fn update_booking_status(&self, id: &BookingId, status: BookingStatus) -> Result<Payload> {
        self.client
            .post(&format!("/therapist/bookings/{id}/update-status"), &json!({ "status": status }))
            .await
    }

    /// `POST /therapist/toggle-availability`
    pub async fn toggle_availability(&self) -> Result<Payload> {
        self.client.post("/therapist/toggle-availability", &json!({})).await
    }

    /// `GET /therapist/customers`
    pub async fn customers(&self) -> Result<Payload> {
        self.client.get("/therapist/customers", &[]).await
    }
}
