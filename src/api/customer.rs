use serde::Serialize;

use crate::api::client::ApiClient;
use crate::api::payload::Payload;
use crate::api::request::RequestDescriptor;
use crate::error::Result;
use crate::types::{BookingId, BookingStatus};

/// Customer dashboard and booking routes.
#[derive(Debug, Clone, Copy)]
pub struct CustomerApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CustomerApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /customer/dashboard`, optionally filtered by status
    pub async fn dashboard(&self, status: Option<BookingStatus>) -> Result<Payload> {
        let request = RequestDescriptor::get("/customer/dashboard").query_opt("status", status.map(BookingStatus::as_str));
        self.client.send(&request).await
    }

    /// `GET /customer/available-therapists`
    pub async fn available_therapists(&self) -> Result<Payload> {
        self.client.get("/customer/available-therapists", &[]).await
    }

    /// `GET /customer/bookings`, optionally filtered by status
    pub async fn bookings(&self, status: Option<BookingStatus>) -> Result<Payload> {
        let request = RequestDescriptor::get("/customer/bookings").query_opt("status", status.map(BookingStatus::as_str));
        self.client.send(&request).await
    }

    /// `GET /customer/bookings/{id}`
    pub async fn booking(&self, id: &BookingId) -> Result<Payload> {
        self.client.get(&format!("/customer/bookings/{id}"), &[]).await
    }

    /// `POST /customer/bookings`
    pub async fn create_booking<T: Serialize + ?Sized>(&self, booking: &T) -> Result<Payload> {
        self.client.post("/customer/bookings", booking).await
    }

    /// `PUT /customer/bookings/{id}`
    pub async fn update_booking<T: Serialize + ?Sized>(&self, id: &BookingId, booking: &T) -> Result<Payload> {
        self.client.put(&format!("/customer/bookings/{id}"), booking).await
    }

    /// `DELETE /customer/bookings/{id}`
    pub async fn delete_booking(&self, id: &BookingId) -> Result<Payload> {
        self.client.delete(&format!("/customer/bookings/{id}")).await
    }
}
