#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use roomctl_api::models::CreateRoomRequest;
use roomctl_api::{ApiClient, ApiPaths, CredentialProvider, Error, StatisticsQuery};

// ── Helpers ─────────────────────────────────────────────────────────

/// Fixed token plus a counter of unauthorized callbacks.
#[derive(Default)]
struct TestCredentials {
    token: Option<&'static str>,
    unauthorized: AtomicUsize,
}

impl CredentialProvider for TestCredentials {
    fn bearer_token(&self) -> Option<SecretString> {
        self.token.map(SecretString::from)
    }

    fn on_unauthorized(&self) {
        self.unauthorized.fetch_add(1, Ordering::SeqCst);
    }
}

async fn setup_with(token: Option<&'static str>, paths: ApiPaths) -> (MockServer, ApiClient, Arc<TestCredentials>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let credentials = Arc::new(TestCredentials {
        token,
        ..TestCredentials::default()
    });
    let client = ApiClient::with_client(reqwest::Client::new(), base_url, paths, credentials.clone());
    (server, client, credentials)
}

async fn setup() -> (MockServer, ApiClient, Arc<TestCredentials>) {
    setup_with(Some("tok-123"), ApiPaths::default()).await
}

// ── Credentials ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_attached() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/rooms"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Lab1", "devices": [] }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rooms = client.list_rooms().await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].name, "Lab1");
}

#[tokio::test]
async fn test_no_header_without_token() {
    let (server, client, _) = setup_with(None, ApiPaths::default()).await;

    Mock::given(method("GET"))
        .and(path("/api/admin/devices"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(client.list_devices().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unauthorized_from_any_endpoint_fires_hook() {
    let (server, client, credentials) = setup().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "Not authenticated" })))
        .mount(&server)
        .await;

    assert!(matches!(client.list_rooms().await, Err(Error::Unauthenticated)));
    assert!(matches!(client.delete_device("AA:BB:CC:DD:EE:FF").await, Err(Error::Unauthenticated)));
    assert!(matches!(client.ban_user("bob").await, Err(Error::Unauthenticated)));
    assert!(matches!(client.export_config(None).await, Err(Error::Unauthenticated)));
    assert!(matches!(
        client.login("alice", &SecretString::from("pw")).await,
        Err(Error::Unauthenticated)
    ));

    assert_eq!(credentials.unauthorized.load(Ordering::SeqCst), 5);
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_detail_surfaced() {
    let (server, client, credentials) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/rooms"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "detail": "Room name already taken" })))
        .mount(&server)
        .await;

    let result = client
        .create_room(&CreateRoomRequest {
            name: "Lab1".into(),
            device_macs: vec![],
        })
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Api { status: 400, .. }), "got: {err:?}");
    assert_eq!(err.detail(), Some("Room name already taken"));
    assert_eq!(credentials.unauthorized.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let result = client.list_users().await;
    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body.contains("proxy")),
        "expected Deserialization error, got: {result:?}"
    );
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_posts_password_grant_form() {
    let (server, client, _) = setup_with(None, ApiPaths::default()).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("client_secret="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = client.login("alice", &SecretString::from("s3cret")).await.unwrap();
    assert_eq!(token.access_token, "abc");
    assert_eq!(token.token_type.as_deref(), Some("bearer"));
}

#[tokio::test]
async fn test_me() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "username": "alice", "role": "admin" })))
        .mount(&server)
        .await;

    let me = client.me().await.unwrap();
    assert_eq!(me.username, "alice");
    assert_eq!(me.role, "admin");
}

// ── Config blobs ────────────────────────────────────────────────────

#[tokio::test]
async fn test_export_uses_content_disposition() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/config/export"))
        .and(query_param("device_id", "4"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=\"esp_4.json\"")
                .set_body_bytes(b"{\"interval\": 30}".to_vec()),
        )
        .mount(&server)
        .await;

    let export = client.export_config(Some(4)).await.unwrap();
    assert_eq!(export.filename, "esp_4.json");
    assert_eq!(&export.data[..], b"{\"interval\": 30}");
}

#[tokio::test]
async fn test_export_never_returns_a_path() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/config/export"))
        .and(query_param("device_id", "4"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "content-disposition",
                    "attachment; filename=\"../../../home/op/.bashrc\"",
                )
                .set_body_bytes(b"{}".to_vec()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/config/export"))
        .and(query_param("device_id", "5"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename*=UTF-8''..%2F..")
                .set_body_bytes(b"{}".to_vec()),
        )
        .mount(&server)
        .await;

    let stripped = client.export_config(Some(4)).await.unwrap();
    assert_eq!(stripped.filename, ".bashrc");

    let refused = client.export_config(Some(5)).await.unwrap();
    assert!(
        refused.filename.starts_with("config_device_5_"),
        "{}",
        refused.filename
    );
}

#[tokio::test]
async fn test_export_synthesizes_filename() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/config/export"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"[]".to_vec()))
        .mount(&server)
        .await;

    let export = client.export_config(None).await.unwrap();
    assert!(export.filename.starts_with("config_all_"), "{}", export.filename);
    assert!(export.filename.ends_with("Z.json"), "{}", export.filename);
}

#[tokio::test]
async fn test_import_sends_multipart_file() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/config/import"))
        .and(query_param("device_id", "9"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"esp.json\""))
        .and(body_string_contains("{\"interval\": 10}"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Config imported" })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client
        .import_config("esp.json", bytes::Bytes::from_static(b"{\"interval\": 10}"), Some(9))
        .await
        .unwrap();
    assert_eq!(ack.message.as_deref(), Some("Config imported"));
}

#[tokio::test]
async fn test_update_config_parameter() {
    let (server, client, _) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/admin/config/12"))
        .and(query_param("key", "interval"))
        .and(query_param("value", "60"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client.update_config_parameter(12, "interval", "60").await.unwrap();
    assert_eq!(ack.message, None);
}

// ── Users / roles ───────────────────────────────────────────────────

#[tokio::test]
async fn test_role_routes_follow_configured_prefix() {
    let paths = ApiPaths {
        roles: "/api/roles".into(),
        ..ApiPaths::default()
    };
    let (server, client, _) = setup_with(Some("tok-123"), paths).await;

    Mock::given(method("GET"))
        .and(path("/api/roles/change_role/bob"))
        .and(query_param("role", "admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/roles/unban/bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    client.change_role("bob", "admin").await.unwrap();
    client.unban_user("bob").await.unwrap();
}

#[tokio::test]
async fn test_list_users() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "username": "alice", "role": "admin", "is_banned": false },
            { "id": 2, "username": "bob", "role": "manager" }
        ])))
        .mount(&server)
        .await;

    let users = client.list_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert!(!users[1].is_banned);
}

// ── Statistics / measurements ───────────────────────────────────────

#[tokio::test]
async fn test_statistics_query_params() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/analytics/statistics"))
        .and(query_param("timeFrom", "2024-05-01T00:00:00Z"))
        .and(query_param("timeTo", "2024-05-08T00:00:00Z"))
        .and(query_param("device_id", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "device_id": 3, "avg_co2": 612.5, "median_co2": 600.0, "co2_deviation": 20.1 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let reports = client
        .statistics(&StatisticsQuery {
            time_from: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            time_to: Utc.with_ymd_and_hms(2024, 5, 8, 0, 0, 0).unwrap(),
            device_id: Some(3),
        })
        .await
        .unwrap();
    assert_eq!(reports[0].avg_co2, Some(612.5));
    assert_eq!(reports[0].avg_temperature, None);
}

#[tokio::test]
async fn test_export_measurements() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/measurements/export"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "device_id": 2, "timestamp": "2024-05-01T12:00:00",
              "temperature": 21.5, "humidity": 40.0, "co2": 550.0 }
        ])))
        .mount(&server)
        .await;

    let rows = client.export_measurements().await.unwrap();
    assert_eq!(rows[0].device_id, 2);
    assert_eq!(rows[0].timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_device_mac_in_path() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/devices/AA:BB:CC:DD:EE:FF"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "mac_address": "AA:BB:CC:DD:EE:FF", "room_id": 1
        })))
        .mount(&server)
        .await;

    let device = client.get_device("AA:BB:CC:DD:EE:FF").await.unwrap();
    assert_eq!(device.room_id, Some(1));
}
