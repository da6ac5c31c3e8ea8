//! The route table.
//!
//! Every public endpoint is declared once here. The same table builds the axum
//! router and the OpenAPI document, so the two cannot drift apart.

use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    middleware::from_fn,
    routing::{self, MethodRouter},
    Router,
};
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::openapi::path::PathItemType;

use crate::config::ServiceConfiguration;
use crate::handlers;
use crate::openapi::ApiDocs;
use crate::startup::RestartHandle;
use crate::AppState;

pub const METRICS_PATH: &str = "/metrics";

pub const TAG_SERVICE: &str = "Service";
pub const TAG_HEALTH: &str = "Health";
pub const TAG_CONFIG: &str = "Config";
pub const TAG_PAYMENT: &str = "Payment";

/// One endpoint: where it lives, how it is documented, and what serves it.
pub struct Route {
    pub method: PathItemType,
    /// axum path syntax, e.g. `/api/v1/payment/status/:referenceNo`.
    pub path: String,
    pub summary: &'static str,
    pub tag: &'static str,
    pub request_body: Option<&'static str>,
    pub responses: Vec<(&'static str, &'static str)>,
    handler: MethodRouter<AppState>,
}

impl Route {
    fn new(
        method: PathItemType,
        path: impl Into<String>,
        summary: &'static str,
        tag: &'static str,
        handler: MethodRouter<AppState>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            summary,
            tag,
            request_body: None,
            responses: vec![("200", summary)],
            handler,
        }
    }

    pub fn get<H, T>(
        path: impl Into<String>,
        summary: &'static str,
        tag: &'static str,
        handler: H,
    ) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(PathItemType::Get, path, summary, tag, routing::get(handler))
    }

    pub fn post<H, T>(
        path: impl Into<String>,
        summary: &'static str,
        tag: &'static str,
        handler: H,
    ) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(PathItemType::Post, path, summary, tag, routing::post(handler))
    }

    pub fn put<H, T>(
        path: impl Into<String>,
        summary: &'static str,
        tag: &'static str,
        handler: H,
    ) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(PathItemType::Put, path, summary, tag, routing::put(handler))
    }

    pub fn delete<H, T>(
        path: impl Into<String>,
        summary: &'static str,
        tag: &'static str,
        handler: H,
    ) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(PathItemType::Delete, path, summary, tag, routing::delete(handler))
    }

    fn with_body(mut self, description: &'static str) -> Self {
        self.request_body = Some(description);
        self
    }

    fn with_response(mut self, code: &'static str, description: &'static str) -> Self {
        self.responses.push((code, description));
        self
    }

    /// Path parameter names, in order.
    pub fn path_params(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter_map(|segment| segment.strip_prefix(':'))
    }

    /// The path in OpenAPI template syntax: `:referenceNo` becomes `{referenceNo}`.
    pub fn openapi_path(&self) -> String {
        self.path
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => format!("{{{}}}", name),
                None => segment.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

pub fn route_table(config: &ServiceConfiguration) -> Vec<Route> {
    let base = config.service_api_path();
    let health = config.health_path();
    let cfg = config.config_path();

    vec![
        Route::get("/", "Service Banner", TAG_SERVICE, handlers::banner::banner),
        // Health
        Route::get(
            format!("{health}/live"),
            "Health Check of the Service",
            TAG_HEALTH,
            handlers::health::live,
        ),
        Route::get(
            format!("{health}/ready"),
            "Service Readiness Check",
            TAG_HEALTH,
            handlers::health::ready,
        ),
        Route::post(
            format!("{health}/restart"),
            "Service ReStart",
            TAG_HEALTH,
            handlers::health::restart,
        ),
        Route::post(
            format!("{health}/echo"),
            "Service Echo",
            TAG_HEALTH,
            handlers::health::echo,
        )
        .with_body("Word to echo back")
        .with_response("400", "Service unable to deserialize!")
        .with_response("404", "Service unable to do Echo!"),
        Route::get(
            format!("{health}/home"),
            "Service Home",
            TAG_HEALTH,
            handlers::health::home,
        ),
        // Config
        Route::get(
            format!("{cfg}/env"),
            "Show the Environment Settings",
            TAG_CONFIG,
            handlers::config::env,
        ),
        Route::get(
            format!("{cfg}/map"),
            "Show the ConfigMap Settings",
            TAG_CONFIG,
            handlers::config::config_map,
        ),
        Route::get(
            format!("{cfg}/log"),
            "Service Log Levels",
            TAG_CONFIG,
            handlers::config::log,
        ),
        // Payments
        Route::get(
            format!("{base}/status/:referenceNo"),
            "Check the Payment status",
            TAG_PAYMENT,
            handlers::payments::status,
        ),
        Route::post(
            format!("{base}/processPayments"),
            "Process Payments",
            TAG_PAYMENT,
            handlers::payments::process_payments,
        )
        .with_body("Payment details")
        .with_response("400", "Malformed payment details"),
        Route::delete(
            format!("{base}/cancel/:referenceNo"),
            "Cancel Payments",
            TAG_PAYMENT,
            handlers::payments::cancel,
        ),
        Route::put(
            format!("{base}/update/:referenceNo"),
            "Update Payments",
            TAG_PAYMENT,
            handlers::payments::update,
        ),
    ]
}

/// Every path the router serves besides the API documentation.
pub fn served_paths(config: &ServiceConfiguration) -> Vec<String> {
    route_table(config)
        .into_iter()
        .map(|route| route.path)
        .chain(std::iter::once(METRICS_PATH.to_string()))
        .collect()
}

/// True when some request path could match both `a` and `b`.
///
/// Segments starting with `:` match any single segment.
pub fn paths_overlap(a: &str, b: &str) -> bool {
    let a: Vec<&str> = a.split('/').collect();
    let b: Vec<&str> = b.split('/').collect();

    a.len() == b.len()
        && a.iter()
            .zip(&b)
            .all(|(x, y)| x == y || x.starts_with(':') || y.starts_with(':'))
}

/// Builds the full router for one server generation.
pub fn build_router(config: Arc<ServiceConfiguration>, restart: RestartHandle) -> Router {
    let routes = route_table(&config);
    let docs = ApiDocs::from_routes(&config, &routes);
    let state = AppState::new(config.clone(), restart, docs);

    let doc_path = config.api_doc_path();
    let router = routes
        .into_iter()
        .fold(Router::new(), |router, route| router.route(&route.path, route.handler))
        .route(doc_path, routing::get(handlers::docs::api_docs))
        .route(
            &format!("{}/:group", doc_path),
            routing::get(handlers::docs::group_docs),
        )
        .route(METRICS_PATH, routing::get(handlers::metrics::metrics))
        .route_layer(from_fn(metrics_middleware));

    router
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_body_size()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_paths_are_unique() {
        let routes = route_table(&ServiceConfiguration::default());
        let mut paths: Vec<_> = routes.iter().map(|r| r.path.as_str()).collect();
        paths.sort();
        paths.dedup();

        assert_eq!(paths.len(), routes.len());
    }

    #[test]
    fn overlapping_paths_are_detected() {
        assert!(paths_overlap("/a/:id", "/a/latest"));
        assert!(paths_overlap("/metrics", "/metrics"));
        assert!(!paths_overlap("/a/:id", "/a/b/c"));
        assert!(!paths_overlap("/api-docs", "/metrics"));
    }

    #[test]
    fn path_parameters_use_openapi_syntax() {
        let routes = route_table(&ServiceConfiguration::default());
        let status = routes.iter().find(|r| r.path.contains("/status/")).unwrap();

        assert_eq!(status.openapi_path(), "/api/v1/payment/status/{referenceNo}");
        assert_eq!(status.path_params().collect::<Vec<_>>(), vec!["referenceNo"]);
    }
}
