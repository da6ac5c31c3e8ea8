#![allow(dead_code)]

use std::future::pending;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use payment_service::config::ServiceConfiguration;
use payment_service::routes::build_router;
use payment_service::startup::{restart_channel, Application, RestartSignal, RunOutcome};
use service_core::config::ConfigSource;
use service_core::error::AppError;
use tokio::task::JoinHandle;
use tower::ServiceExt;

pub const SERVICE_NAME: &str = "Payment";
pub const API_PATH: &str = "/api/v1/payment";

/// Configuration with no file, an env prefix nothing sets, and a free port.
pub fn test_config(restart: bool) -> ServiceConfiguration {
    let source = ConfigSource::new("payment-service-test-missing", "PAYMENT_IT")
        .with_override("service_name", SERVICE_NAME)
        .with_override("server_host", "127.0.0.1")
        .with_override("server_port", 0_i64)
        .with_override("server_restart", restart)
        .with_override("build_number", 7_i64)
        .with_override("build_date", "2024-05-01");

    ServiceConfiguration::from_source(&source).expect("Failed to load test configuration")
}

/// Router for in-process `oneshot` calls. Keep the signal alive for restart tests.
pub fn test_router(restart: bool) -> (Router, RestartSignal) {
    let (handle, signal) = restart_channel();
    (build_router(Arc::new(test_config(restart)), handle), signal)
}

pub async fn send(router: Router, request: Request<Body>) -> Response<Body> {
    router.oneshot(request).await.expect("Router call failed")
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).expect("Body is not JSON")
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub server: JoinHandle<Result<RunOutcome, AppError>>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config(false)).await
    }

    pub async fn spawn_with(config: ServiceConfiguration) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        let server = tokio::spawn(app.run_until(pending()));

        // Wait for the listener to answer
        let client = reqwest::Client::new();
        let live_url = format!("{}{}/service/live", address, API_PATH);
        for _ in 0..50 {
            if client.get(&live_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            server,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.address, API_PATH, path)
    }
}
