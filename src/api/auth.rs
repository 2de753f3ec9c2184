use serde::Serialize;
use serde_json::{json, Value};

use crate::api::client::ApiClient;
use crate::api::payload::Payload;
use crate::api::request::RequestDescriptor;
use crate::error::{Error, Result};
use crate::navigation::{self, Access, RequiredRole};
use crate::types::User;

/// Login, registration, OTP verification and session routes.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /login`. Stores the returned token.
    pub async fn login(&self, email: &str, password: &str) -> Result<Payload> {
        let payload = self
            .client
            .post("/login", &json!({ "email": email, "password": password }))
            .await?;

        if let Some(token) = payload.get("token").and_then(Value::as_str) {
            self.client.credentials().set_token(token)?;
            tracing::info!("Logged in as {email}");
        }
        Ok(payload)
    }

    /// `POST /register`
    pub async fn register<T: Serialize + ?Sized>(&self, user: &T) -> Result<Payload> {
        self.client.post("/register", user).await
    }

    /// `POST /verify-otp`
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<Payload> {
        self.client
            .post("/verify-otp", &json!({ "email": email, "otp": otp }))
            .await
    }

    /// `POST /resend-otp`
    pub async fn resend_otp(&self, email: &str) -> Result<Payload> {
        self.client.post("/resend-otp", &json!({ "email": email })).await
    }

    /// `POST /logout`. The local token is dropped even if the call fails.
    pub async fn logout(&self) -> Result<()> {
        let request = RequestDescriptor::post("/logout").json_value(json!({}));
        if let Err(e) = self.client.send(&request).await {
            tracing::warn!("Logout request failed: {e}");
        }
        self.client.credentials().clear()
    }

    /// `GET /me`
    pub async fn me(&self) -> Result<Payload> {
        self.client.get("/me", &[]).await
    }

    /// `GET /me`, decoded into a [`User`]
    pub async fn current_user(&self) -> Result<User> {
        let payload = self.me().await?;
        let user = payload
            .get("user")
            .cloned()
            .ok_or_else(|| Error::api("Response from /me has no user"))?;
        serde_json::from_value(user).map_err(|e| Error::api(format!("Unexpected user shape: {e}")))
    }

    /// Gate a page on authentication and, optionally, a role.
    ///
    /// Without a token, or when `/me` fails, the token is cleared and the login
    /// page is returned. A user with the wrong role is sent to their own
    /// dashboard.
    pub async fn require_role(&self, required: Option<RequiredRole>, current_path: &str) -> Result<Access> {
        if !self.client.credentials().is_authenticated() {
            return Ok(Access::Redirect(navigation::login_page(current_path)));
        }

        let user = match self.current_user().await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Auth check failed: {e}");
                self.client.credentials().clear()?;
                return Ok(Access::Redirect(navigation::login_page(current_path)));
            }
        };

        Ok(navigation::check_access(user, required, current_path))
    }
}
