use axum::body::Body;
use axum::http::{HeaderValue, Request};
use http_body_util::BodyExt;
use parcel_axum::{MultipartConfig, UploadApp, UploadState};
use parcel_core::ParcelConfig;
use serde_json::{json, Value};
use tower::ServiceExt;
use tracing_test::traced_test;

const BOUNDARY: &str = "----parcel-test-boundary";

fn app() -> axum::Router {
    UploadApp::new(&ParcelConfig::with_defaults()).into_router()
}

fn text_part(name: &str, value: &str) -> String {
    format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
}

fn file_part(name: &str, filename: &str, content_type: &str, data: &str) -> String {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n{data}\r\n"
    )
}

fn multipart_request(parts: &[String]) -> Request<Body> {
    let body = format!("{}--{BOUNDARY}--\r\n", parts.concat());
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn images_are_summarized_in_order() {
    let res = app()
        .oneshot(multipart_request(&[
            file_part("file0", "photo.png", "image/png", "12345"),
            file_part("file1", "image_1.jpg", "image/jpeg", "123"),
            text_part("totalFiles", "2"),
            text_part("uploadTime", "2024-01-31T12:00:00.000Z"),
        ]))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    assert!(res.headers().get("x-request-id").is_some());
    assert_eq!(
        json_body(res).await,
        json!({
            "success": true,
            "message": "Files uploaded successfully",
            "uploadTime": "2024-01-31T12:00:00.000Z",
            "totalFiles": 2,
            "files": [
                {"name": "photo.png", "type": "image/png", "size": 5},
                {"name": "image_1.jpg", "type": "image/jpeg", "size": 3},
            ],
        })
    );
}

#[tokio::test]
async fn declared_total_wins_over_decoded_count() {
    let res = app()
        .oneshot(multipart_request(&[
            file_part("file0", "a.png", "image/png", "a"),
            file_part("file1", "b.png", "image/png", "b"),
            text_part("totalFiles", "3"),
        ]))
        .await
        .unwrap();

    let body = json_body(res).await;
    assert_eq!(body["totalFiles"], 3);
    assert_eq!(body["files"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn non_numeric_total_falls_back_to_decoded_count() {
    let res = app()
        .oneshot(multipart_request(&[
            file_part("file0", "a.png", "image/png", "a"),
            text_part("totalFiles", "lots"),
        ]))
        .await
        .unwrap();

    let body = json_body(res).await;
    assert_eq!(body["totalFiles"], 1);
    assert!(body.get("uploadTime").is_none());
    assert!(body.get("source").is_none());
}

#[tokio::test]
async fn blob_source_is_echoed() {
    let res = app()
        .oneshot(multipart_request(&[
            file_part(
                "generatedFile",
                "generated-file.txt",
                "text/plain",
                "This is a sample text content created as a blob",
            ),
            text_part("source", "blob"),
        ]))
        .await
        .unwrap();

    let body = json_body(res).await;
    assert_eq!(body["source"], "blob");
    assert_eq!(body["totalFiles"], 1);
    assert_eq!(
        body["files"],
        json!([{"name": "generated-file.txt", "type": "text/plain", "size": 47}])
    );
}

#[tokio::test]
async fn json_valued_source_is_echoed_verbatim() {
    let res = app()
        .oneshot(multipart_request(&[
            file_part("file0", "photo.png", "image/png", "12345"),
            text_part("uploadTime", "2024-01-31T12:00:00.000Z"),
            text_part("source", r#"{"kind":"camera"}"#),
        ]))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    let body = json_body(res).await;
    assert_eq!(body["source"], r#"{"kind":"camera"}"#);
    assert_eq!(body["uploadTime"], "2024-01-31T12:00:00.000Z");
    assert_eq!(body["totalFiles"], 1);
}

#[tokio::test]
async fn bare_data_uri_blob_is_counted() {
    let res = app()
        .oneshot(multipart_request(&[
            text_part(
                "generatedFile",
                "data:text/plain;base64,VGhpcyBpcyBhIHNhbXBsZSB0ZXh0IGNvbnRlbnQgY3JlYXRlZCBhcyBhIGJsb2I=",
            ),
            text_part("source", "blob"),
        ]))
        .await
        .unwrap();

    let body = json_body(res).await;
    assert_eq!(body["totalFiles"], 1);
    assert_eq!(body["files"], json!([{"name": "unknown", "type": "text/plain", "size": 47}]));
}

#[tokio::test]
#[traced_test]
async fn missing_boundary_is_a_500_without_files() {
    let res = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header("content-type", "multipart/form-data")
                .body(Body::from("not really multipart"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 500);
    let body = json_body(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Upload failed");
    assert!(!body["error"].as_str().unwrap().is_empty());
    assert!(body.get("files").is_none());
    assert!(logs_contain("Upload error"));
}

#[tokio::test]
async fn size_limit_from_state_is_enforced() {
    let state = UploadState::new(MultipartConfig::new().max_total_size(8));
    let app = UploadApp::with_state(ParcelConfig::new().snapshot(), state).into_router();

    let res = app
        .oneshot(multipart_request(&[file_part("file0", "big.png", "image/png", "0123456789")]))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 500);
    let body = json_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("maximum total size"));
}

#[tokio::test]
async fn decoding_twice_is_byte_identical() {
    let parts = [
        file_part("file0", "a.png", "image/png", "abc"),
        text_part("totalFiles", "1"),
        text_part("uploadTime", "2024-01-31T12:00:00.000Z"),
    ];

    let first = app().oneshot(multipart_request(&parts)).await.unwrap();
    let second = app().oneshot(multipart_request(&parts)).await.unwrap();

    let first = first.into_body().collect().await.unwrap().to_bytes();
    let second = second.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(first, second);
}

#[tokio::test]
async fn request_id_is_preserved_when_provided() {
    let provided = HeaderValue::from_static("req-test-123");
    let mut req = multipart_request(&[text_part("totalFiles", "0")]);
    req.headers_mut().insert("x-request-id", provided.clone());

    let res = app().oneshot(req).await.unwrap();
    assert_eq!(res.headers().get("x-request-id").unwrap(), &provided);
}

#[tokio::test]
async fn health_answers_ok() {
    let res = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
}
