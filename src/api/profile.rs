use serde::Serialize;

use crate::api::client::ApiClient;
use crate::api::payload::Payload;
use crate::api::request::FormPayload;
use crate::error::Result;

/// Profile view and edit routes.
#[derive(Debug, Clone, Copy)]
pub struct ProfileApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProfileApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /profile`
    pub async fn get(&self) -> Result<Payload> {
        self.client.get("/profile", &[]).await
    }

    /// `PUT /profile`
    pub async fn update<T: Serialize + ?Sized>(&self, profile: &T) -> Result<Payload> {
        self.client.put("/profile", profile).await
    }

    /// `POST /profile` as multipart, for uploading a new image
    pub async fn update_with_image(&self, form: FormPayload) -> Result<Payload> {
        tracing::debug!("Uploading profile form with {} fields", form.fields().len());
        self.client.post_form("/profile", form).await
    }

    /// `DELETE /profile/image`
    pub async fn delete_image(&self) -> Result<Payload> {
        self.client.delete("/profile/image").await
    }
}
