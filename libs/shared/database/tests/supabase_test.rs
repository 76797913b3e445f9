use assert_matches::assert_matches;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reqwest::Method;
use shared_config::AppConfig;
use shared_database::{SupabaseClient, SupabaseError};

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        supabase_url: server.uri(),
        supabase_anon_key: "test-anon-key".to_string(),
        supabase_jwt_secret: "secret".to_string(),
        reports_bucket: "reports".to_string(),
        signed_url_expires_in: 60,
        report_download_dir: std::env::temp_dir(),
        port: 0,
    }
}

#[tokio::test]
async fn test_request_sends_api_key_and_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(header("apikey", "test-anon-key"))
        .and(header("Authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = SupabaseClient::new(&config_for(&server));
    let rows: Vec<Value> = client
        .request(Method::GET, "/rest/v1/appointments", Some("user-token"), None)
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_error_statuses_are_classified() {
    let server = MockServer::start().await;

    Mock::given(path("/unauthorized"))
        .respond_with(ResponseTemplate::new(401).set_body_string("JWT expired"))
        .mount(&server)
        .await;
    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = SupabaseClient::new(&config_for(&server));

    let err = client.request::<Value>(Method::GET, "/unauthorized", None, None).await.unwrap_err();
    assert_matches!(err, SupabaseError::Unauthorized(msg) if msg == "JWT expired");

    let err = client.request::<Value>(Method::GET, "/missing", None, None).await.unwrap_err();
    assert_matches!(err, SupabaseError::NotFound(_));

    let err = client.request::<Value>(Method::GET, "/broken", None, None).await.unwrap_err();
    assert_matches!(err, SupabaseError::Api { status: 500, .. });
}

#[tokio::test]
async fn test_create_signed_url_returns_absolute_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/sign/reports/p-1/lab.pdf"))
        .and(body_json(json!({ "expiresIn": 120 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "signedURL": "/object/sign/reports/p-1/lab.pdf?token=abc"
        })))
        .mount(&server)
        .await;

    let client = SupabaseClient::new(&config_for(&server));
    let url = client
        .create_signed_url("reports", "p-1/lab.pdf", 120, "user-token")
        .await
        .unwrap();

    assert_eq!(
        url,
        format!("{}/storage/v1/object/sign/reports/p-1/lab.pdf?token=abc", server.uri())
    );
}

#[tokio::test]
async fn test_download_to_file_streams_body() {
    let server = MockServer::start().await;
    let pdf = b"%PDF-1.4 test body".to_vec();

    Mock::given(method("GET"))
        .and(path("/files/lab.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(pdf.clone()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("lab.pdf");

    let client = SupabaseClient::new(&config_for(&server));
    let written = client
        .download_to_file(&format!("{}/files/lab.pdf", server.uri()), &destination)
        .await
        .unwrap();

    assert_eq!(written, pdf.len() as u64);
    assert_eq!(std::fs::read(&destination).unwrap(), pdf);
}

#[tokio::test]
async fn test_download_failure_leaves_no_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/expired.pdf"))
        .respond_with(ResponseTemplate::new(400).set_body_string("signature expired"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("expired.pdf");

    let client = SupabaseClient::new(&config_for(&server));
    let err = client
        .download_to_file(&format!("{}/files/expired.pdf", server.uri()), &destination)
        .await
        .unwrap_err();

    assert_matches!(err, SupabaseError::Api { status: 400, .. });
    assert!(!destination.exists());
}
