//! Functional tests for POST /generate_tryon

#[path = "../common/mod.rs"]
mod common;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
};
use common::{body_json, tryon_form, StubBackend, TestApp, PNG_BYTES};
use serde_json::json;
use tower::ServiceExt;
use tryon_gateway::storage::StorageLocator;

fn tryon_request(user_request: &str, image: Option<(&str, &[u8])>) -> Request<Body> {
    let (content_type, body) = tryon_form(user_request, image);
    Request::builder()
        .method("POST")
        .uri("/generate_tryon")
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_generates_model_without_reference() {
    let app = TestApp::new(StubBackend::returning(1));
    let user_request = json!({ "user_input": { "gender": "female", "style": "minimalist" } });

    let response = app
        .router()
        .oneshot(tryon_request(&user_request.to_string(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let url = body["human_model_image_url"].as_str().unwrap();
    assert!(body.get("generated_image_url").is_none());

    let locator = StorageLocator::parse(url).unwrap();
    assert_eq!(locator.bucket(), "assets");
    assert!(app.store.object("assets", locator.path()).is_some());

    let calls = app.backend.generate_calls.lock();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].prompt.contains("female"));
    assert!(calls[0].prompt.contains("minimalist"));
    assert!(app.backend.edit_calls.lock().is_empty());
}

#[tokio::test]
async fn test_edits_reference_image() {
    let app = TestApp::new(StubBackend::returning(1));
    let user_request = json!({ "user_input": { "top": { "color": "blue", "type": "shirt" } } });
    let photo: &[u8] = b"reference-photo-bytes";

    let response = app
        .router()
        .oneshot(tryon_request(&user_request.to_string(), Some(("me.jpg", photo))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let url = body["generated_image_url"].as_str().unwrap();
    assert!(url.starts_with("gs://assets/generated_images/"));
    assert!(body.get("human_model_image_url").is_none());

    let calls = app.backend.edit_calls.lock();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].prompt.contains("blue shirt"));
    assert!(!calls[0].prompt.contains("high-fashion image of"));
    assert!(!calls[0].prompt.contains("build"));
    assert_eq!(calls[0].reference.image, photo);
    assert!(app.backend.generate_calls.lock().is_empty());

    // staged upload is removed once the request completes
    assert_eq!(app.scratch_entries(), 0);
}

#[tokio::test]
async fn test_demographics_with_reference_rejected() {
    let app = TestApp::new(StubBackend::returning(1));
    let user_request = json!({ "user_input": { "gender": "female", "top": { "type": "dress" } } });

    let response = app
        .router()
        .oneshot(tryon_request(&user_request.to_string(), Some(("me.png", PNG_BYTES))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "invalid_request_error");
    assert!(body["error"]["message"].as_str().unwrap().contains("gender"));

    assert!(app.backend.edit_calls.lock().is_empty());
    assert!(app.backend.generate_calls.lock().is_empty());
    assert_eq!(app.scratch_entries(), 0);
}

#[tokio::test]
async fn test_zero_images_is_server_error() {
    let app = TestApp::new(StubBackend::returning(0));
    let user_request = json!({ "user_input": {} });

    let response = app
        .router()
        .oneshot(tryon_request(&user_request.to_string(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "generation_error");
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_backend_message_reported_and_scratch_cleaned() {
    let app = TestApp::new(StubBackend::failing("model overloaded"));
    let user_request = json!({ "user_input": { "bottom": { "color": "black" } } });

    let response = app
        .router()
        .oneshot(tryon_request(&user_request.to_string(), Some(("me.png", PNG_BYTES))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("model overloaded"));
    assert_eq!(app.scratch_entries(), 0);
}

#[tokio::test]
async fn test_malformed_user_request_is_client_error() {
    let app = TestApp::new(StubBackend::returning(1));

    let response = app
        .router()
        .oneshot(tryon_request("{not json", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.backend.generate_calls.lock().is_empty());
}

#[tokio::test]
async fn test_missing_user_input_key_is_client_error() {
    let app = TestApp::new(StubBackend::returning(1));

    let response = app
        .router()
        .oneshot(tryon_request(r#"{"gender": "male"}"#, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_file_part_counts_as_absent() {
    let app = TestApp::new(StubBackend::returning(1));
    let user_request = json!({ "user_input": { "gender": "male" } });

    let response = app
        .router()
        .oneshot(tryon_request(&user_request.to_string(), Some(("", &[][..]))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["human_model_image_url"].is_string());
    assert_eq!(app.backend.generate_calls.lock().len(), 1);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new(StubBackend::returning(1));

    let response = app
        .router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}
