//! Integration tests for the request dispatcher against mock backends.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zenbook::api::{ApiClient, EndpointList, FormPayload, Payload, RequestDescriptor};
use zenbook::credentials::{CredentialStore, MemoryCredentialStore};
use zenbook::navigation::{Access, RequiredRole};
use zenbook::Error;

const RETRYABLE: [u16; 6] = [404, 405, 500, 502, 503, 504];

fn client_for(urls: &[String], store: &Arc<MemoryCredentialStore>) -> ApiClient {
    let credentials: Arc<dyn CredentialStore> = store.clone();
    ApiClient::new(EndpointList::new(urls).unwrap(), credentials)
}

fn anonymous(urls: &[String]) -> ApiClient {
    client_for(urls, &Arc::new(MemoryCredentialStore::new()))
}

/// A local address nothing listens on.
fn closed_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

async fn base(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

#[tokio::test]
async fn first_endpoint_success_skips_fallbacks() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"id": 1}})))
        .expect(1)
        .mount(&primary)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&fallback)
        .await;

    let client = anonymous(&[base(&primary).await, base(&fallback).await]);
    let payload = client.get("/me", &[]).await.unwrap();

    assert_eq!(payload, Payload::Json(json!({"user": {"id": 1}})));
    assert_eq!(client.last_endpoint(), Some(base(&primary).await));
}

#[tokio::test]
async fn retryable_status_fails_over_to_next_endpoint() {
    for status in RETRYABLE {
        let primary = MockServer::start().await;
        let fallback = MockServer::start().await;

        Mock::given(path("/api/staff/dashboard"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&primary)
            .await;
        Mock::given(path("/api/staff/dashboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&fallback)
            .await;

        let client = anonymous(&[base(&primary).await, base(&fallback).await]);
        let payload = client.staff().dashboard().await.unwrap();

        assert_eq!(payload, Payload::Json(json!({"ok": true})), "status {status}");
        assert_eq!(client.last_endpoint(), Some(base(&fallback).await), "status {status}");
    }
}

#[tokio::test]
async fn retryable_status_on_only_endpoint_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(path("/api/profile"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous(&[base(&server).await]);
    let err = client.profile().get().await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
}

#[tokio::test]
async fn retryable_status_on_last_endpoint_is_surfaced() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;
    for server in [&primary, &fallback] {
        Mock::given(path("/api/me"))
            .respond_with(ResponseTemplate::new(500).set_body_string("plain text error"))
            .expect(1)
            .mount(server)
            .await;
    }

    let client = anonymous(&[base(&primary).await, base(&fallback).await]);
    let err = client.auth().me().await.unwrap_err();

    assert_eq!(err.to_string(), "plain text error");
    assert_eq!(err.status(), Some(500));
    assert_eq!(client.last_endpoint(), Some(base(&fallback).await));
}

#[tokio::test]
async fn non_retryable_error_stops_iteration() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(path("/api/register"))
        .respond_with(ResponseTemplate::new(422).set_body_raw(
            r#"{"message":"bad input","errors":{"email":["Invalid email"]}}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&primary)
        .await;
    Mock::given(path("/api/register"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&fallback)
        .await;

    let client = anonymous(&[base(&primary).await, base(&fallback).await]);
    let err = client
        .auth()
        .register(&json!({"email": "nope"}))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid email");
    assert!(matches!(err, Error::Api { status: Some(422), .. }));
}

#[tokio::test]
async fn unauthorized_clears_credential_and_does_not_fail_over() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(path("/api/customer/bookings"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthenticated."})))
        .expect(1)
        .mount(&primary)
        .await;
    Mock::given(path("/api/customer/bookings"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&fallback)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_token("stale"));
    let client = client_for(&[base(&primary).await, base(&fallback).await], &store);
    let err = client.customer().bookings(None).await.unwrap_err();

    assert!(err.is_session_expired());
    assert_eq!(err.to_string(), "Session expired. Please login again.");
    assert!(store.token().is_none());
}

#[tokio::test]
async fn transport_failure_falls_over() {
    let live = MockServer::start().await;
    Mock::given(path("/api/therapist/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&live)
        .await;

    let client = anonymous(&[closed_endpoint(), base(&live).await]);
    let payload = client.therapist().customers().await.unwrap();

    assert_eq!(payload, Payload::Json(json!([])));
    assert_eq!(client.last_endpoint(), Some(base(&live).await));
}

#[tokio::test]
async fn all_endpoints_unreachable_is_network_error() {
    let client = anonymous(&[closed_endpoint(), closed_endpoint()]);
    let err = client.auth().me().await.unwrap_err();

    let Error::Network { detail } = &err else {
        panic!("expected network error, got {err:?}");
    };
    assert!(!detail.is_empty());
    assert!(err.to_string().starts_with("Network error"));
    assert_eq!(client.last_endpoint(), None);
}

#[tokio::test]
async fn retryable_answer_kept_when_later_endpoints_unreachable() {
    let primary = MockServer::start().await;
    Mock::given(path("/api/customer/bookings/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Booking not found"})))
        .expect(1)
        .mount(&primary)
        .await;

    let client = anonymous(&[base(&primary).await, closed_endpoint()]);
    let err = client
        .customer()
        .booking(&zenbook::types::BookingId::from(9))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Booking not found");
    assert_eq!(err.status(), Some(404));
    assert_eq!(client.last_endpoint(), Some(base(&primary).await));
}

#[tokio::test]
async fn latest_retryable_answer_wins_over_earlier_one() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    Mock::given(path("/api/me"))
        .respond_with(ResponseTemplate::new(503).set_body_string("first down"))
        .expect(1)
        .mount(&first)
        .await;
    Mock::given(path("/api/me"))
        .respond_with(ResponseTemplate::new(502).set_body_string("second down"))
        .expect(1)
        .mount(&second)
        .await;

    let client = anonymous(&[base(&first).await, base(&second).await, closed_endpoint()]);
    let err = client.auth().me().await.unwrap_err();

    assert_eq!(err.to_string(), "second down");
    assert_eq!(err.status(), Some(502));
    assert_eq!(client.last_endpoint(), Some(base(&second).await));
}

#[tokio::test]
async fn post_form_sends_multipart_text_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous(&[base(&server).await]);
    let payload = client
        .post_form("/profile", FormPayload::new().text("name", "Ana"))
        .await
        .unwrap();

    assert_eq!(payload.get("ok"), Some(&json!(true)));
    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"), "{content_type}");
    assert!(String::from_utf8_lossy(&requests[0].body).contains("Ana"));
}

#[tokio::test]
async fn json_body_is_sent_compactly_in_given_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/echo"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .and(body_string(r#"{"b":2,"a":1}"#))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"created": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous(&[base(&server).await]);
    let payload = client.post("/echo", &json!({"b": 2, "a": 1})).await.unwrap();

    assert_eq!(payload.get("created"), Some(&json!(true)));
}

#[tokio::test]
async fn identical_requests_are_not_deduplicated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/therapist/toggle-availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"available": true})))
        .expect(2)
        .mount(&server)
        .await;

    let client = anonymous(&[base(&server).await]);
    let first = client.therapist().toggle_availability().await.unwrap();
    let second = client.therapist().toggle_availability().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn bearer_token_attached_when_present() {
    let server = MockServer::start().await;
    Mock::given(path("/api/me"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": 3, "name": "Sam", "email": "sam@example.com", "role": "staff"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_token("secret-token"));
    let client = client_for(&[base(&server).await], &store);
    let user = client.auth().current_user().await.unwrap();

    assert_eq!(user.name, "Sam");
    assert!(user.role.is_admin());
}

#[tokio::test]
async fn no_authorization_header_without_token() {
    let server = MockServer::start().await;
    Mock::given(path("/api/customer/available-therapists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = anonymous(&[base(&server).await]);
    client.customer().available_therapists().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn status_filter_becomes_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/therapist/bookings"))
        .and(query_param("status", "in_progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bookings": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous(&[base(&server).await]);
    client
        .therapist()
        .bookings(Some(zenbook::types::BookingStatus::InProgress))
        .await
        .unwrap();
}

#[tokio::test]
async fn header_override_replaces_default() {
    let server = MockServer::start().await;
    Mock::given(path("/api/export"))
        .and(header("accept", "text/csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("id,name\n1,Ana\n"))
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous(&[base(&server).await]);
    let request = RequestDescriptor::get("/export").header("Accept", "text/csv");
    let payload = client.send(&request).await.unwrap();

    assert_eq!(payload, Payload::Text("id,name\n1,Ana\n".into()));
}

#[tokio::test]
async fn malformed_json_success_falls_back_to_text() {
    let server = MockServer::start().await;
    Mock::given(path("/api/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
        .mount(&server)
        .await;

    let client = anonymous(&[base(&server).await]);
    let payload = client.profile().get().await.unwrap();

    assert_eq!(payload, Payload::Text("{not json".into()));
}

#[tokio::test]
async fn empty_success_body_is_empty_payload() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/staff/bookings/12"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = anonymous(&[base(&server).await]);
    let payload = client
        .staff()
        .delete_booking(&zenbook::types::BookingId::from(12))
        .await
        .unwrap();

    assert_eq!(payload, Payload::Empty);
}

#[tokio::test]
async fn image_upload_is_multipart_and_fails_over() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(path("/api/profile"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&primary)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"profile_image": "p/a.png"}})))
        .expect(1)
        .mount(&fallback)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_token("tok"));
    let client = client_for(&[base(&primary).await, base(&fallback).await], &store);
    let form = FormPayload::new()
        .text("name", "Ana")
        .file("profile_image", "a.png", Some("image/png"), vec![0x89, 0x50, 0x4e, 0x47]);
    client.profile().update_with_image(form).await.unwrap();

    let requests = fallback.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"), "{content_type}");
    assert_eq!(
        requests[0].headers.get("authorization").unwrap().to_str().unwrap(),
        "Bearer tok"
    );
}

#[tokio::test]
async fn login_stores_token_and_logout_always_clears() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_string(r#"{"email":"ana@example.com","password":"pw"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "fresh-token",
            "user": {"id": 1, "role": "customer"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let client = client_for(&[base(&server).await], &store);

    client.auth().login("ana@example.com", "pw").await.unwrap();
    assert_eq!(store.token().as_deref(), Some("fresh-token"));

    client.auth().logout().await.unwrap();
    assert!(store.token().is_none());
}

#[tokio::test]
async fn require_role_redirects() {
    let server = MockServer::start().await;
    Mock::given(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": 5, "name": "Kai", "role": "cleaner"}
        })))
        .mount(&server)
        .await;

    let here = "/site/views/staff/dashboard.html";

    let anonymous_client = anonymous(&[base(&server).await]);
    assert_eq!(
        anonymous_client.auth().require_role(Some(RequiredRole::Admin), here).await.unwrap(),
        Access::Redirect("/site/views/auth/login.html".into())
    );

    let store = Arc::new(MemoryCredentialStore::with_token("tok"));
    let client = client_for(&[base(&server).await], &store);
    assert_eq!(
        client.auth().require_role(Some(RequiredRole::Admin), here).await.unwrap(),
        Access::Redirect("/site/views/therapist/dashboard.html".into())
    );
    assert!(matches!(
        client.auth().require_role(Some(RequiredRole::Therapist), here).await.unwrap(),
        Access::Granted(user) if user.name == "Kai"
    ));
}

#[tokio::test]
async fn staff_overview_tolerates_failing_list() {
    let server = MockServer::start().await;
    Mock::given(path("/api/staff/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"stats": {}})))
        .mount(&server)
        .await;
    Mock::given(path("/api/staff/users"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "Forbidden"})))
        .mount(&server)
        .await;
    Mock::given(path("/api/staff/therapists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .mount(&server)
        .await;
    Mock::given(path("/api/staff/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = anonymous(&[base(&server).await]);
    let overview = client.staff().overview().await.unwrap();

    assert_eq!(overview.users, Payload::Empty);
    assert_eq!(overview.therapists, Payload::Json(json!([{"id": 1}])));
}
