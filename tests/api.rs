use std::sync::Arc;

use aarogyam::api::{router, AppState};
use aarogyam::types::AppConfig;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOUNDARY: &str = "aarogyam-test-boundary";

/// Router with default configuration: no API keys, so nothing reaches the network.
fn app() -> Router {
    app_with(AppConfig::default())
}

fn app_with(config: AppConfig) -> Router {
    let state = AppState::from_config(config).expect("state should build");
    router(Arc::new(state))
}

fn multipart_body(files: &[(&str, &str, &str, &[u8])]) -> Body {
    let mut body = Vec::new();
    for (field, file_name, content_type, data) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

fn multipart_request(uri: &str, files: &[(&str, &str, &str, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(multipart_body(files))
        .unwrap()
}

fn json_request(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_disabled_analysis() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["analysis_enabled"], false);
    assert_eq!(body["hospital_lookup_enabled"], false);
}

#[tokio::test]
async fn health_treats_blank_geocoding_key_as_disabled() {
    let config = AppConfig {
        opencage_api_key: Some(String::new()),
        ..AppConfig::default()
    };
    let response = app_with(config)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["hospital_lookup_enabled"], false);

    let config = AppConfig {
        opencage_api_key: Some("oc-key".to_string()),
        ..AppConfig::default()
    };
    let response = app_with(config)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(json_body(response).await["hospital_lookup_enabled"], true);
}

#[tokio::test]
async fn languages_lists_all_ten() {
    let response = app()
        .oneshot(Request::builder().uri("/languages").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = json_body(response).await;
    let languages = body.as_array().unwrap();
    assert_eq!(languages.len(), 10);
    assert_eq!(languages[0], json!({ "name": "English", "code": "en" }));
    assert_eq!(languages[3], json!({ "name": "Tamil", "code": "ta" }));
}

#[tokio::test]
async fn image_and_report_together_are_rejected() {
    let request = multipart_request(
        "/analyze",
        &[
            ("image", "xray.png", "image/png", &b"\x89PNG"[..]),
            ("report", "labs.pdf", "application/pdf", &b"%PDF-1.4"[..]),
        ],
    );

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(
        body["error"],
        "Please upload either a medical image or a health report, not both."
    );
}

#[tokio::test]
async fn empty_analyze_request_is_rejected() {
    let response = app().oneshot(multipart_request("/analyze", &[])).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unsupported_image_type_is_rejected() {
    let request = multipart_request("/analyze", &[("image", "scan.gif", "image/gif", &b"GIF89a"[..])]);
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analysis_without_api_key_is_unavailable() {
    let request = multipart_request("/analyze", &[("image", "xray.jpg", "image/jpeg", &b"\xff\xd8\xff"[..])]);
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn translate_rejects_unknown_language() {
    let request = json_request("/translate", json!({ "text": "Anemia", "language": "Klingon" }));
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Unsupported language: Klingon");
}

#[tokio::test]
async fn speech_rejects_blank_text() {
    let request = json_request("/speech", json!({ "text": "   " }));
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn transcription_without_endpoint_is_unavailable() {
    let request = multipart_request("/transcribe", &[("audio", "note.wav", "audio/wav", &b"RIFF"[..])]);
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn failing_generation_service_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(500).set_body_string("quota exhausted"))
        .expect(1)
        .mount(&server)
        .await;

    let config = AppConfig {
        gemini_api_key: Some("test-key".to_string()),
        gemini_base_url: server.uri(),
        ..AppConfig::default()
    };
    let request = multipart_request("/analyze", &[("image", "xray.png", "image/png", &b"\x89PNG"[..])]);
    let response = app_with(config).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn translate_sends_target_code_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate_a/single"))
        .and(query_param("sl", "auto"))
        .and(query_param("tl", "ta"))
        .and(query_param("dt", "t"))
        .and(body_string_contains("q=Anemia"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[["இரத்த சோகை", "Anemia"]], null, "en"])))
        .expect(1)
        .mount(&server)
        .await;

    let config = AppConfig {
        translate_url: format!("{}/translate_a/single", server.uri()),
        ..AppConfig::default()
    };
    let request = json_request("/translate", json!({ "text": "Anemia", "language": "Tamil" }));
    let response = app_with(config).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["code"], "ta");
    assert_eq!(body["chunks"], 1);
    assert_eq!(body["text"], "இரத்த சோகை");
}
