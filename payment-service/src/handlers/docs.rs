use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;
use utoipa::openapi::OpenApi;

use crate::AppState;

/// Full OpenAPI document.
pub async fn api_docs(State(state): State<AppState>) -> Json<OpenApi> {
    Json(state.docs.full().clone())
}

/// OpenAPI document restricted to one path-prefix group.
pub async fn group_docs(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<OpenApi>, AppError> {
    state
        .docs
        .group(&group)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Unknown API group: {}", group)))
}
