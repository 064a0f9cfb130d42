mod common;

use backend::{
    routes::notes::MAX_UPLOAD_BODY_BYTES,
    test_utils::{FakeCipher, StaticSecretResolver},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::*;

use http::StatusCode;
use serde_json::json;

// Happy path tests

#[tokio::test]
async fn test_upload_note_happy_path() {
    let context = TestContext::new();

    let response = context
        .send_post_request(
            "/upload",
            create_save_request("hello", Some("uploads/note-1")),
        )
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(response.headers()["access-control-allow-credentials"], "true");

    let body = parse_response_body(response).await;
    assert_eq!(body, json!({ "message": "Note saved successfully!" }));

    let text = context
        .store
        .object(TEST_BUCKET, "uploads/note-1/note.txt")
        .await
        .expect("text object missing");
    assert_eq!(text.content_type, "application/octet-stream");
    assert_ne!(text.body, b"hello");
    assert_eq!(FakeCipher::key_id_of(&text.body).as_deref(), Some(TEST_KEY_ID));

    let image = context
        .store
        .object(TEST_BUCKET, "uploads/note-1/image.jpg")
        .await
        .expect("image object missing");
    assert_eq!(image.content_type, "image/jpeg");
    assert_eq!(image.body, ONE_PIXEL_JPEG);
}

#[tokio::test]
async fn test_upload_note_without_folder_uses_clock() {
    let context = TestContext::new();

    let response = context
        .send_post_request("/upload", create_save_request("hello", None))
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        context.store.keys(TEST_BUCKET).await,
        [
            format!("uploads/note-{TEST_EPOCH_MILLIS}/image.jpg"),
            format!("uploads/note-{TEST_EPOCH_MILLIS}/note.txt"),
        ]
    );
}

#[tokio::test]
async fn test_upload_notes_in_same_millisecond_collide() {
    let context = TestContext::new();

    for text in ["first", "second"] {
        let response = context
            .send_post_request("/upload", create_save_request(text, None))
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Both writes landed on the same prefix
    assert_eq!(context.store.keys(TEST_BUCKET).await.len(), 2);

    context.clock.set(TEST_EPOCH_MILLIS + 1);
    let response = context
        .send_post_request("/upload", create_save_request("third", None))
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(context.store.keys(TEST_BUCKET).await.len(), 4);
}

#[tokio::test]
async fn test_upload_note_with_multi_megabyte_image() {
    let context = TestContext::new();

    let image: Vec<u8> = (0..3 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    let payload = json!({
        "text": "hello",
        "image": STANDARD.encode(&image),
        "folderName": "uploads/note-big"
    });

    let response = context
        .send_post_request("/upload", payload)
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        context.store.keys(TEST_BUCKET).await,
        ["uploads/note-big/image.jpg", "uploads/note-big/note.txt"]
    );
    let stored = context
        .store
        .object(TEST_BUCKET, "uploads/note-big/image.jpg")
        .await
        .expect("image object missing");
    assert_eq!(stored.body, image);
}

// Validation error tests

#[tokio::test]
async fn test_upload_note_body_over_limit() {
    let context = TestContext::new();

    let image = vec![0u8; MAX_UPLOAD_BODY_BYTES];
    let payload = json!({ "text": "hello", "image": STANDARD.encode(&image) });

    let response = context
        .send_post_request("/upload", payload)
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let body = parse_response_body(response).await;
    assert_eq!(
        body["message"],
        format!("Request body exceeds {MAX_UPLOAD_BODY_BYTES} bytes")
    );
    assert!(context.store.keys(TEST_BUCKET).await.is_empty());
}

#[tokio::test]
async fn test_upload_note_missing_text() {
    let context = TestContext::new();

    let payload = json!({
        "image": one_pixel_jpeg_base64(),
        "folderName": "uploads/note-1"
    });

    let response = context
        .send_post_request("/upload", payload)
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "The text or image data is missing.");
    assert!(context.store.keys(TEST_BUCKET).await.is_empty());
}

#[tokio::test]
async fn test_upload_note_missing_image() {
    let context = TestContext::new();

    let payload = json!({ "text": "hello", "folderName": "uploads/note-1" });

    let response = context
        .send_post_request("/upload", payload)
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(context.store.keys(TEST_BUCKET).await.is_empty());
}

#[tokio::test]
async fn test_upload_note_empty_body() {
    let context = TestContext::new();

    let response = context
        .send_raw_post_request("/upload", "")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(
        body["message"],
        "No body provided or body not in JSON format"
    );
}

#[tokio::test]
async fn test_upload_note_malformed_json() {
    let context = TestContext::new();

    for body in ["{\"text\": \"hello\"", "not json", "[]", "null"] {
        let response = context
            .send_raw_post_request("/upload", body)
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
    assert!(context.store.keys(TEST_BUCKET).await.is_empty());
}

#[tokio::test]
async fn test_upload_note_invalid_base64_image() {
    let context = TestContext::new();

    let payload = json!({ "text": "hello", "image": "***" });

    let response = context
        .send_post_request("/upload", payload)
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(context.store.keys(TEST_BUCKET).await.is_empty());
}

#[tokio::test]
async fn test_upload_note_text_over_kms_limit() {
    let context = TestContext::new();

    let text = "x".repeat(4097);
    let response = context
        .send_post_request("/upload", create_save_request(&text, None))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(context.store.keys(TEST_BUCKET).await.is_empty());
}

// Server error tests

#[tokio::test]
async fn test_upload_note_secrets_unavailable() {
    let context = TestContext::without_secrets();

    let response = context
        .send_post_request("/upload", create_save_request("hello", None))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = parse_response_body(response).await;
    assert_eq!(body, json!({ "message": "Error retrieving secrets" }));
}

#[tokio::test]
async fn test_upload_note_encrypt_failure() {
    let context = TestContext::with_parts(
        StaticSecretResolver::new(TEST_BUCKET, TEST_KEY_ID),
        FakeCipher::failing_encrypt(),
    );

    let response = context
        .send_post_request("/upload", create_save_request("hello", None))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Failed to save note");
    assert!(body["error"].as_str().unwrap().contains("NotFoundException"));
    assert!(context.store.keys(TEST_BUCKET).await.is_empty());
}

#[tokio::test]
async fn test_upload_note_image_write_failure_keeps_text() {
    let context = TestContext::new();
    context.store.fail_puts_ending_with(".jpg").await;

    let response = context
        .send_post_request(
            "/upload",
            create_save_request("hello", Some("uploads/note-1")),
        )
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Failed to save note");
    assert!(body["error"].is_string());

    // No rollback: the text object written before the failure remains
    assert_eq!(
        context.store.keys(TEST_BUCKET).await,
        ["uploads/note-1/note.txt"]
    );

    let notes = context.fetch_notes().await;
    assert_eq!(notes[0]["noteId"], "note-1");
    assert_eq!(notes[0]["imageKeys"], json!([]));
    assert_eq!(notes[0]["text"], "hello");
}

#[tokio::test]
async fn test_upload_preflight() {
    let context = TestContext::new();

    let request = axum::http::Request::builder()
        .uri("/upload")
        .method("OPTIONS")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(context.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert!(response.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .contains("POST"));
}
