//! Functional tests for GET /download_image

#[path = "../common/mod.rs"]
mod common;

use axum::{
    body::Body,
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        Request, StatusCode,
    },
};
use common::{body_json, tryon_form, StubBackend, TestApp, PNG_BYTES};
use serde_json::json;
use tower::ServiceExt;
use tryon_gateway::storage::ObjectStore;

fn download(locator: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/download_image?image_url={}", locator))
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_download_png() {
    let app = TestApp::new(StubBackend::returning(1));
    app.store
        .put("assets", "generated_images/a.png", PNG_BYTES.to_vec(), "image/png")
        .await
        .unwrap();

    let response = app
        .router()
        .oneshot(download("gs://assets/generated_images/a.png"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/png");
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"generated_image.png\""
    );
    assert_eq!(body_bytes(response).await, PNG_BYTES);
    assert_eq!(app.scratch_entries(), 0);
}

#[tokio::test]
async fn test_download_jpeg_and_unknown_types() {
    let app = TestApp::new(StubBackend::returning(1));
    app.store
        .put("assets", "photo.JPEG", vec![1], "image/jpeg")
        .await
        .unwrap();
    app.store
        .put("assets", "blob.xyz", vec![2], "application/octet-stream")
        .await
        .unwrap();

    let response = app
        .router()
        .oneshot(download("gs://assets/photo.JPEG"))
        .await
        .unwrap();
    assert_eq!(response.headers()[CONTENT_TYPE], "image/jpeg");

    let response = app
        .router()
        .oneshot(download("gs://assets/blob.xyz"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/octet-stream");
}

#[tokio::test]
async fn test_missing_asset_is_not_found() {
    let app = TestApp::new(StubBackend::returning(1));

    let response = app
        .router()
        .oneshot(download("gs://assets/generated_images/missing.png"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "not_found_error");
}

#[tokio::test]
async fn test_locator_without_scheme_is_client_error() {
    let app = TestApp::new(StubBackend::returning(1));

    let response = app
        .router()
        .oneshot(download("assets/generated_images/a.png"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generated_image_can_be_downloaded() {
    let app = TestApp::new(StubBackend::returning(1));
    let (content_type, body) = tryon_form(&json!({ "user_input": {} }).to_string(), None);

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/generate_tryon")
                .header(CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let locator = body_json(response).await["human_model_image_url"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app.router().oneshot(download(&locator)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/png");
    assert_eq!(body_bytes(response).await, PNG_BYTES);
}
