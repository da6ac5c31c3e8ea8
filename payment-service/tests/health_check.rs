mod common;

use common::TestApp;
use reqwest::{Client, StatusCode};

#[tokio::test]
async fn live_reports_ok() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(app.api_url("/service/live"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body,
        serde_json::json!({ "Code": 200, "Status": true, "Message": "Service is OK!" })
    );
}

#[tokio::test]
async fn ready_reports_ready() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(app.api_url("/service/ready"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["Message"], "Service is Ready!");
    assert!(body.get("ReferenceNo").is_none());
}

#[tokio::test]
async fn echo_returns_the_word() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(app.api_url("/service/echo"))
        .json(&serde_json::json!({ "word": "hello" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, serde_json::json!({ "word": "hello" }));
}

#[tokio::test]
async fn echo_without_word_returns_null_word() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    for body in ["{}", "{\"word\":null}"] {
        let response = client
            .post(app.api_url("/service/echo"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::OK, "body {:?}", body);

        let echoed: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(echoed, serde_json::json!({ "word": null }));
    }
}

#[tokio::test]
async fn echo_without_payload_is_not_found() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    for body in ["", "null"] {
        let response = client
            .post(app.api_url("/service/echo"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "body {:?}", body);
    }
}

#[tokio::test]
async fn echo_with_malformed_json_is_bad_request() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(app.api_url("/service/echo"))
        .header("content-type", "application/json")
        .body("{\"word\":")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn home_describes_the_request_path() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(app.api_url("/service/home"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html")));

    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("<h1>Welcome to Health Service</h1>"));
    assert!(body.contains("Params Size = 6 : |api|v1|payment|service|home|"));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(app.api_url("/service/live"))
        .header("x-request-id", "req-42")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(
        response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("req-42")
    );
}
