use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Serialize;
use std::sync::{Arc, RwLock};

use crate::api::endpoints::EndpointList;
use crate::api::payload::{status_line, Payload};
use crate::api::request::{FormPayload, RequestBody, RequestDescriptor};
use crate::api::{AuthApi, CustomerApi, ProfileApi, StaffApi, TherapistApi};
use crate::config::Config;
use crate::constants::dispatch::{RETRYABLE_STATUSES, UNREACHABLE};
use crate::credentials::CredentialStore;
use crate::error::{Error, Result};

/// Client for the booking API.
///
/// Each request walks the configured endpoints in order and stops at the first
/// one that gives a definitive answer. Clones share the credential store and
/// the last-used endpoint hint.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoints: EndpointList,
    credentials: Arc<dyn CredentialStore>,
    last_endpoint: Arc<RwLock<Option<String>>>,
}

/// What one endpoint attempt produced.
enum Attempt {
    /// Definitive response from this endpoint.
    Done(Response),
    /// Retryable status; try the next endpoint, but keep this answer in case none responds.
    Next(Response),
    /// No response at all (connection, DNS, TLS).
    Unreachable(String),
}

impl ApiClient {
    /// Create a client over `endpoints`, reading the token from `credentials`
    pub fn new(endpoints: EndpointList, credentials: Arc<dyn CredentialStore>) -> Self {
        // No timeout: callers wrap requests themselves when they need one
        let client = Client::builder().build().unwrap_or_default();
        Self::with_http_client(client, endpoints, credentials)
    }

    /// Create a client from config
    pub fn from_config(config: &Config, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let endpoints = EndpointList::new(&config.api_base_urls)?;
        Ok(Self::new(endpoints, credentials))
    }

    /// Create a client around a preconfigured `reqwest::Client`
    pub fn with_http_client(client: Client, endpoints: EndpointList, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            client,
            endpoints,
            credentials,
            last_endpoint: Arc::new(RwLock::new(None)),
        }
    }

    /// Candidate endpoints in preference order
    pub const fn endpoints(&self) -> &EndpointList {
        &self.endpoints
    }

    /// The credential store this client reads and clears
    pub fn credentials(&self) -> &dyn CredentialStore {
        self.credentials.as_ref()
    }

    /// Endpoint that produced the most recent outcome. Advisory only.
    pub fn last_endpoint(&self) -> Option<String> {
        self.last_endpoint.read().ok().and_then(|hint| hint.clone())
    }

    /// Authentication routes
    pub const fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Customer routes
    pub const fn customer(&self) -> CustomerApi<'_> {
        CustomerApi::new(self)
    }

    /// Therapist routes
    pub const fn therapist(&self) -> TherapistApi<'_> {
        TherapistApi::new(self)
    }

    /// Staff routes
    pub const fn staff(&self) -> StaffApi<'_> {
        StaffApi::new(self)
    }

    /// Profile routes
    pub const fn profile(&self) -> ProfileApi<'_> {
        ProfileApi::new(self)
    }

    /// GET `path` with query parameters
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Payload> {
        let request = query
            .iter()
            .fold(RequestDescriptor::get(path), |req, (k, v)| req.query(*k, *v));
        self.send(&request).await
    }

    /// POST a JSON body to `path`
    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Payload> {
        self.send(&RequestDescriptor::post(path).json(body)?).await
    }

    /// PUT a JSON body to `path`
    pub async fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Payload> {
        self.send(&RequestDescriptor::put(path).json(body)?).await
    }

    /// DELETE `path`
    pub async fn delete(&self, path: &str) -> Result<Payload> {
        self.send(&RequestDescriptor::delete(path)).await
    }

    /// POST a multipart form to `path`, e.g. a file upload
    pub async fn post_form(&self, path: &str, form: FormPayload) -> Result<Payload> {
        self.send(&RequestDescriptor::post(path).form(form)).await
    }

    /// Send one logical request, failing over across endpoints.
    ///
    /// Transport failures and endpoint-specific statuses move on to the next
    /// endpoint; anything else is the answer. If no later endpoint responds, the
    /// last endpoint-specific answer is used. A 401 clears the stored token and
    /// yields [`Error::SessionExpired`].
    pub async fn send(&self, request: &RequestDescriptor) -> Result<Payload> {
        let headers = self.headers_for(request)?;
        let total = self.endpoints.len();
        let mut last_transport_error: Option<String> = None;
        let mut outcome: Option<(&str, Response)> = None;
        let mut fallback: Option<(&str, Response)> = None;

        for (idx, base_url) in self.endpoints.iter().enumerate() {
            let has_next = idx + 1 < total;
            match self.attempt(base_url, request, &headers, has_next).await? {
                Attempt::Done(response) => {
                    outcome = Some((base_url, response));
                    break;
                }
                Attempt::Next(response) => fallback = Some((base_url, response)),
                Attempt::Unreachable(detail) => {
                    tracing::warn!("{} {}{} unreachable: {detail}", request.method, base_url, request.path);
                    last_transport_error = Some(detail);
                }
            }
        }

        // A retryable answer still beats a network error when later endpoints were unreachable
        let Some((base_url, response)) = outcome.or(fallback) else {
            let detail = last_transport_error.unwrap_or_else(|| UNREACHABLE.to_string());
            tracing::error!("{} {} failed on all {total} endpoints: {detail}", request.method, request.path);
            return Err(Error::network(detail));
        };

        self.remember_endpoint(base_url);
        self.finish(request, response).await
    }

    /// Issue the request against one endpoint and classify the result.
    async fn attempt(
        &self,
        base_url: &str,
        request: &RequestDescriptor,
        headers: &HeaderMap,
        has_next: bool,
    ) -> Result<Attempt> {
        let url = format!("{base_url}{}", request.path);
        tracing::debug!("{} {url}", request.method);

        let mut builder = self
            .client
            .request(request.method.to_reqwest(), &url)
            .headers(headers.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match &request.body {
            RequestBody::None => builder,
            RequestBody::Json(value) => builder.body(value.to_string()),
            RequestBody::Form(form) => builder.multipart(form.to_multipart()?),
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Ok(Attempt::Unreachable(e.to_string())),
        };
        let status = response.status().as_u16();

        if has_next && RETRYABLE_STATUSES.contains(&status) {
            tracing::warn!("{} {url} returned {status}; trying next endpoint", request.method);
            return Ok(Attempt::Next(response));
        }
        Ok(Attempt::Done(response))
    }

    /// Turn the chosen response into a payload or error. Reads the body once.
    async fn finish(&self, request: &RequestDescriptor, response: Response) -> Result<Payload> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            if let Err(e) = self.credentials.clear() {
                tracing::warn!("Failed to clear stored credential: {e}");
            }
            tracing::info!("{} {} rejected the token; session expired", request.method, request.path);
            return Err(Error::SessionExpired);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let payload = match response.text().await {
            Ok(text) => Payload::parse(&content_type, text),
            Err(e) => {
                tracing::warn!("Failed to read response body for {}: {e}", request.path);
                Payload::Text(status_line(status))
            }
        };

        if status.is_success() {
            return Ok(payload);
        }

        let message = payload.error_message(&status_line(status));
        tracing::debug!("{} {} returned {status}: {message}", request.method, request.path);
        Err(Error::api_status(message, status.as_u16()))
    }

    /// Default headers, then overrides, then the bearer token.
    fn headers_for(&self, request: &RequestDescriptor) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if !request.body.is_form() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        for (name, value) in &request.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| Error::Request(format!("invalid header name {name:?}: {e}")))?;
            if request.body.is_form() && name == CONTENT_TYPE {
                // reqwest supplies the multipart boundary
                continue;
            }
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| Error::Request(format!("invalid value for header {name}: {e}")))?;
            headers.insert(name, value);
        }

        if let Some(token) = self.credentials.token().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::try_from(format!("Bearer {token}"))
                .map_err(|e| Error::Request(format!("stored token is not a valid header value: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    fn remember_endpoint(&self, base_url: &str) {
        let Ok(mut hint) = self.last_endpoint.write() else {
            return;
        };
        if hint.as_deref() != Some(base_url) {
            if hint.is_some() || base_url != self.endpoints.primary() {
                tracing::info!("Using API base URL {base_url}");
            }
            *hint = Some(base_url.to_string());
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoints", &self.endpoints)
            .field("last_endpoint", &self.last_endpoint())
            .finish_non_exhaustive()
    }
}
