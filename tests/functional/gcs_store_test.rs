//! Functional tests for the Cloud Storage client against a mock server

use tryon_gateway::credentials::TokenSource;
use tryon_gateway::storage::gcs::GcsStore;
use tryon_gateway::storage::ObjectStore;
use tryon_gateway::AppError;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OBJECT_PATH: &str = "/storage/v1/b/assets/o/generated_images%2Fa.png";

fn store(server: &MockServer) -> GcsStore {
    GcsStore::new(&server.uri(), TokenSource::Static("test-token".to_string())).unwrap()
}

#[tokio::test]
async fn test_put_uploads_media() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/storage/v1/b/assets/o"))
        .and(query_param("uploadType", "media"))
        .and(query_param("name", "generated_images/a.png"))
        .and(header("content-type", "image/png"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    store(&server)
        .put("assets", "generated_images/a.png", b"png".to_vec(), "image/png")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].body, b"png");
}

#[tokio::test]
async fn test_put_failure_is_storage_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let result = store(&server)
        .put("assets", "generated_images/a.png", vec![1], "image/png")
        .await;
    assert!(matches!(result, Err(AppError::Storage(m)) if m.contains("forbidden")));
}

#[tokio::test]
async fn test_exists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OBJECT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let store = store(&server);
    assert!(store.exists("assets", "generated_images/a.png").await.unwrap());
    // anything without a mock answers 404
    assert!(!store.exists("assets", "generated_images/b.png").await.unwrap());
}

#[tokio::test]
async fn test_get_downloads_media() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OBJECT_PATH))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png-bytes".to_vec()))
        .mount(&server)
        .await;

    let bytes = store(&server)
        .get("assets", "generated_images/a.png")
        .await
        .unwrap();
    assert_eq!(bytes, b"png-bytes");
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let server = MockServer::start().await;

    let result = store(&server).get("assets", "generated_images/a.png").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_get_server_error_is_storage_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = store(&server).get("assets", "generated_images/a.png").await;
    assert!(matches!(result, Err(AppError::Storage(_))));
}
