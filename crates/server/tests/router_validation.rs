//! Router-level tests for paths that must fail before (or without) touching
//! a real database. Uses a mock connection, so they run anywhere.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, ServerState};
use service::registration::{RegistrationService, SeaOrmRegistrationRepository};
use service::storage::UploadStore;

const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const BOUNDARY: &str = "test-boundary-7d1a";

struct TestApp {
    app: Router,
    uploads: Arc<UploadStore>,
}

async fn test_app(db: DatabaseConnection) -> TestApp {
    let uploads = Arc::new(
        UploadStore::new(format!("target/test-data/{}/uploads", Uuid::new_v4()))
            .await
            .expect("scratch upload store"),
    );
    let repo = Arc::new(SeaOrmRegistrationRepository { db: db.clone() });
    let registrations = Arc::new(RegistrationService::new(
        repo,
        Arc::clone(&uploads),
        MAX_UPLOAD_BYTES,
    ));
    let state = ServerState {
        db,
        registrations,
        uploads: Arc::clone(&uploads),
        max_upload_bytes: MAX_UPLOAD_BYTES,
        whatsapp_group_link: "https://chat.whatsapp.com/test-group".into(),
    };
    TestApp {
        app: routes::build_router(CorsLayer::very_permissive(), state),
        uploads,
    }
}

fn mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn artifact_count(uploads: &UploadStore) -> usize {
    std::fs::read_dir(uploads.root())
        .map(|entries| entries.count())
        .unwrap_or(0)
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn multipart_request(email: Option<&str>, file: Option<(&str, &str, Vec<u8>)>) -> Request<Body> {
    let mut body = Vec::new();
    if let Some(email) = email {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"email\"\r\n\r\n{email}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"screenshot\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn register_missing_fields_echoes_received_payload() {
    let t = test_app(mock_db()).await;

    let res = t
        .app
        .oneshot(json_request(
            "/api/registrations",
            serde_json::json!({"name": "Asha"}),
        ))
        .await
        .expect("response");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = body_json(res).await;
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["received"]["name"], "Asha");
    let details: Vec<String> = body["details"]
        .as_array()
        .expect("details array")
        .iter()
        .map(|v| v.as_str().unwrap_or_default().to_string())
        .collect();
    assert!(details.contains(&"email is required".to_string()));
    assert!(details.contains(&"schoolOrCollegeName is required".to_string()));
}

#[tokio::test]
async fn register_rejects_malformed_email_and_phone() {
    let t = test_app(mock_db()).await;

    let payload = serde_json::json!({
        "name": "Asha",
        "email": "not-an-email",
        "phone": "9876543210",
        "qualification": "BSc",
        "schoolOrCollegeName": "ABC College",
    });
    let res = t
        .app
        .clone()
        .oneshot(json_request("/api/registrations", payload))
        .await
        .expect("response");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let payload = serde_json::json!({
        "name": "Asha",
        "email": "asha@x.com",
        "phone": "12345",
        "qualification": "BSc",
        "schoolOrCollegeName": "ABC College",
    });
    let res = t
        .app
        .oneshot(json_request("/api/registrations", payload))
        .await
        .expect("response");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let t = test_app(mock_db()).await;
    let res = t
        .app
        .oneshot(multipart_request(Some("asha@x.com"), None))
        .await
        .expect("response");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(artifact_count(&t.uploads), 0);
}

#[tokio::test]
async fn upload_wrong_content_type_writes_nothing() {
    let t = test_app(mock_db()).await;
    let res = t
        .app
        .oneshot(multipart_request(
            Some("asha@x.com"),
            Some(("invoice.pdf", "application/pdf", vec![0u8; 256])),
        ))
        .await
        .expect("response");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = body_json(res).await;
    assert_eq!(body["error"], "Only .jpg, .jpeg, and .png files are allowed");
    assert_eq!(artifact_count(&t.uploads), 0);
}

#[tokio::test]
async fn upload_oversized_artifact_returns_413_before_any_write() {
    let t = test_app(mock_db()).await;
    let res = t
        .app
        .oneshot(multipart_request(
            Some("asha@x.com"),
            Some(("big.png", "image/png", vec![0u8; MAX_UPLOAD_BYTES + 1])),
        ))
        .await
        .expect("response");
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(artifact_count(&t.uploads), 0);
}

#[tokio::test]
async fn upload_for_unknown_email_cleans_up_artifact() {
    // One find-by-email query, returning no rows
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<models::registration::Model>::new()])
        .into_connection();
    let t = test_app(db).await;

    let res = t
        .app
        .oneshot(multipart_request(
            Some("ghost@x.com"),
            Some(("payment.png", "image/png", vec![0u8; 1024])),
        ))
        .await
        .expect("response");
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = body_json(res).await;
    assert_eq!(body["error"], "User not found");
    // The accepted artifact was compensatingly deleted
    assert_eq!(artifact_count(&t.uploads), 0);
}

#[tokio::test]
async fn upload_with_malformed_email_is_rejected() {
    let t = test_app(mock_db()).await;
    let res = t
        .app
        .oneshot(multipart_request(
            Some("not an email"),
            Some(("payment.png", "image/png", vec![0u8; 64])),
        ))
        .await
        .expect("response");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(artifact_count(&t.uploads), 0);
}
