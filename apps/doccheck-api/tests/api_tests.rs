//! Integration tests for the doccheck API.
//!
//! Drives the full boundary in-process: multipart request in, JSON
//! verdicts out.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use doccheck_api::app;
use doccheck_api::state::{AppState, Config};

const BOUNDARY: &str = "doccheck-test-boundary";

const AGREEMENT: &[u8] = b"SERVICE AGREEMENT\n\
    This agreement is effective as of January 5, 2024.\n\
    The monthly fee is $1,200.00, due on the first business day.\n\
    Signed by Jane Doe, Director of Operations.";

const THREE_RULES: &str = r#"["Document must mention a date","includes a signature block","must not contain an email address"]"#;

fn test_config() -> Config {
    Config {
        port: 0,
        max_document_bytes: 1024 * 1024,
        rule_timeout: Duration::from_secs(5),
        request_timeout: Duration::from_secs(10),
    }
}

fn test_app() -> axum::Router {
    app(Arc::new(AppState::new(test_config())))
}

fn multipart_request(document: Option<&[u8]>, rules_json: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();
    if let Some(doc) = document {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"pdf\"; filename=\"doc.txt\"\r\n\
                 Content-Type: text/plain\r\n\r\n",
                BOUNDARY
            )
            .as_bytes(),
        );
        body.extend_from_slice(doc);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(rules) = rules_json {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"rules\"\r\n\r\n{}\r\n",
                BOUNDARY, rules
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/check")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_check_returns_three_ordered_results() {
    let response = test_app()
        .oneshot(multipart_request(Some(AGREEMENT), Some(THREE_RULES)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    // Results echo the rules in input order
    assert_eq!(results[0]["rule"], "Document must mention a date");
    assert_eq!(results[1]["rule"], "includes a signature block");
    assert_eq!(results[2]["rule"], "must not contain an email address");

    let document_text = std::str::from_utf8(AGREEMENT).unwrap();
    for result in results {
        let status = result["status"].as_str().unwrap();
        assert!(status == "pass" || status == "fail");

        let confidence = result["confidence"].as_u64().unwrap();
        assert!(confidence <= 100);

        assert!(!result["reasoning"].as_str().unwrap().is_empty());

        if let Some(evidence) = result.get("evidence").and_then(|e| e.as_str()) {
            assert!(
                document_text.contains(evidence),
                "fabricated evidence: {}",
                evidence
            );
        }
    }
}

#[tokio::test]
async fn test_negative_rule_that_holds_passes_without_evidence() {
    let response = test_app()
        .oneshot(multipart_request(Some(AGREEMENT), Some(THREE_RULES)))
        .await
        .unwrap();
    let json = json_body(response).await;
    let no_email = &json["results"][2];

    assert_eq!(no_email["status"], "pass");
    assert!(no_email.get("evidence").is_none());
}

#[tokio::test]
async fn test_wrong_rule_count_is_rejected() {
    let response = test_app()
        .oneshot(multipart_request(Some(AGREEMENT), Some(r#"["only","two"]"#)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("3"));
    assert!(json.get("results").is_none());
}

#[tokio::test]
async fn test_blank_rule_is_rejected() {
    let response = test_app()
        .oneshot(multipart_request(
            Some(AGREEMENT),
            Some(r#"["mentions a date","   ","no profanity"]"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_document_is_rejected() {
    let response = test_app()
        .oneshot(multipart_request(None, Some(THREE_RULES)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("document"));
}

#[tokio::test]
async fn test_missing_rules_is_rejected() {
    let response = test_app()
        .oneshot(multipart_request(Some(AGREEMENT), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_undecodable_rules_field_is_rejected() {
    let response = test_app()
        .oneshot(multipart_request(Some(AGREEMENT), Some("not json at all")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_document_is_unreadable() {
    let response = test_app()
        .oneshot(multipart_request(Some(b""), Some(THREE_RULES)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = json_body(response).await;
    assert!(json.get("results").is_none());
}

#[tokio::test]
async fn test_corrupt_pdf_is_unreadable() {
    let response = test_app()
        .oneshot(multipart_request(
            Some(b"%PDF-1.4 this is not a real pdf body"),
            Some(THREE_RULES),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_oversize_document_is_rejected() {
    let state = Arc::new(AppState::new(Config {
        max_document_bytes: 64,
        ..test_config()
    }));
    let response = app(state)
        .oneshot(multipart_request(Some(&[b'a'; 256]), Some(THREE_RULES)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_shape_is_idempotent_across_submissions() {
    for _ in 0..3 {
        let response = test_app()
            .oneshot(multipart_request(Some(AGREEMENT), Some(THREE_RULES)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["rule"], "Document must mention a date");
        assert_eq!(results[2]["rule"], "must not contain an email address");
    }
}
