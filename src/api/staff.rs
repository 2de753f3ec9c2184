use serde::Serialize;

use crate::api::client::ApiClient;
use crate::api::payload::Payload;
use crate::api::request::RequestDescriptor;
use crate::error::Result;
use crate::types::{BookingId, BookingStatus, TherapistId, UserId};

/// Staff back-office routes.
#[derive(Debug, Clone, Copy)]
pub struct StaffApi<'a> {
    client: &'a ApiClient,
}

/// Everything the staff dashboard page shows, fetched in one go.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffOverview {
    /// `GET /staff/dashboard`
    pub dashboard: Payload,
    /// `GET /staff/users`
    pub users: Payload,
    /// `GET /staff/therapists`
    pub therapists: Payload,
    /// `GET /staff/bookings`
    pub bookings: Payload,
}

impl<'a> StaffApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /staff/dashboard`
    pub async fn dashboard(&self) -> Result<Payload> {
        self.client.get("/staff/dashboard", &[]).await
    }

    /// `GET /staff/users`
    pub async fn users(&self) -> Result<Payload> {
        self.client.get("/staff/users", &[]).await
    }

    /// `GET /staff/therapists`
    pub async fn therapists(&self) -> Result<Payload> {
        self.client.get("/staff/therapists", &[]).await
    }

    /// `GET /staff/therapists/{id}`
    pub async fn therapist(&self, id: &TherapistId) -> Result<Payload> {
        self.client.get(&format!("/staff/therapists/{id}"), &[]).await
    }

    /// `POST /staff/therapists`
    pub async fn create_therapist<T: Serialize + ?Sized>(&self, therapist: &T) -> Result<Payload> {
        self.client.post("/staff/therapists", therapist).await
    }

    /// `PUT /staff/therapists/{id}`
    pub async fn update_therapist<T: Serialize + ?Sized>(&self, id: &TherapistId, therapist: &T) -> Result<Payload> {
        self.client.put(&format!("/staff/therapists/{id}"), therapist).await
    }

    /// `GET /staff/bookings`, optionally filtered by status
    pub async fn bookings(&self, status: Option<BookingStatus>) -> Result<Payload> {
        let request = RequestDescriptor::get("/staff/bookings").query_opt("status", status.map(BookingStatus::as_str));
        self.client.send(&request).await
    }

    /// `DELETE /staff/users/{id}`
    pub async fn delete_user(&self, id: &UserId) -> Result<Payload> {
        self.client.delete(&format!("/staff/users/{id}")).await
    }

    /// `DELETE /staff/therapists/{id}`
    pub async fn delete_therapist(&self, id: &TherapistId) -> Result<Payload> {
        self.client.delete(&format!("/staff/therapists/{id}")).await
    }

    /// `DELETE /staff/bookings/{id}`
    pub async fn delete_booking(&self, id: &BookingId) -> Result<Payload> {
        self.client.delete(&format!("/staff/bookings/{id}")).await
    }

    /// Fetch dashboard, users, therapists and bookings concurrently.
    ///
    /// The dashboard is required. A failing list is logged and left empty,
    /// except for an expired session, which aborts the whole overview.
    pub async fn overview(&self) -> Result<StaffOverview> {
        let (dashboard, users, therapists, bookings) =
            futures::join!(self.dashboard(), self.users(), self.therapists(), self.bookings(None));

        Ok(StaffOverview {
            dashboard: dashboard?,
            users: or_empty("users", users)?,
            therapists: or_empty("therapists", therapists)?,
            bookings: or_empty("bookings", bookings)?,
        })
    }
}

/// Degrade a failed list fetch to an empty payload, unless the session expired.
fn or_empty(name: &str, result: Result<Payload>) -> Result<Payload> {
    match result {
        Ok(payload) => Ok(payload),
        Err(e) if e.is_session_expired() => Err(e),
        Err(e) => {
            tracing::warn!("Failed to fetch staff {name}: {e}");
            Ok(Payload::Empty)
        }
    }
}
