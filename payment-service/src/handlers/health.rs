//! Health controller: liveness, readiness, restart, echo and home.
//!
//! None of these check a dependency; the service has none.

use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, Uri},
    response::Html,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{EchoData, EchoResponseData, StatusResponse},
    AppState,
};

const TITLE: &str = "<h1>Welcome to Health Service</h1>\n<h3>Payment microservice</h3>\n";

pub async fn live(State(state): State<AppState>) -> Json<StatusResponse> {
    tracing::info!("{}|Request to Health of Service... ", state.name.get());
    Json(StatusResponse::ok("Service is OK!"))
}

pub async fn ready(State(state): State<AppState>) -> Json<StatusResponse> {
    tracing::info!("{}|Request to Ready Check.. ", state.name.get());
    Json(StatusResponse::ok("Service is Ready!"))
}

/// Asks the supervisor for a fresh generation when `server_restart` is on.
///
/// Always answers 200 with an empty body; the relaunch is not observable here.
pub async fn restart(State(state): State<AppState>) -> StatusCode {
    let name = state.name.get();
    tracing::info!("{}|Server Restart Request Received ....", name);

    if state.config.is_server_restart() {
        tracing::info!("{}|Restarting the service........", name);
        if !state.restart.request() {
            tracing::warn!("{}|Server generation already stopping", name);
        }
    }

    StatusCode::OK
}

/// Echoes `word` back. An empty body or a JSON `null` is a 404.
pub async fn echo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EchoResponseData>, AppError> {
    let payload: Option<EchoData> = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.into()))?
    };

    tracing::info!("{}|Request for Echo ... {:?}", state.name.get(), payload);

    let data = payload.ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Nothing to echo")))?;
    Ok(Json(data.into()))
}

pub async fn home(uri: Uri) -> Html<String> {
    tracing::info!("|Request to /home/ path... ");

    let request = describe_request_path(uri.path());
    tracing::info!("{}", request);

    Html(format!("{}<br>{}", TITLE, request))
}

/// `Params Size = 3 : |api|home|` style rendering of a request path.
///
/// Splits on `/`, keeps the leading empty segment and drops trailing ones.
pub(crate) fn describe_request_path(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }

    let mut out = format!("Params Size = {} : ", segments.len());
    for segment in &segments {
        out.push_str(segment);
        out.push('|');
    }
    out.push('\n');
    out
}
