use askama::Template;
use axum::{extract::State, response::Html};
use service_core::error::AppError;

use crate::AppState;

#[derive(Template)]
#[template(path = "banner.html")]
struct BannerTemplate<'a> {
    service_name: &'a str,
    build_number: i32,
    build_date: &'a str,
}

/// `GET /`: banner with service name and build stamp.
pub async fn banner(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    tracing::info!("Request to Home Page of Service... ");

    let page = BannerTemplate {
        service_name: state.config.service_name(),
        build_number: state.config.build_number(),
        build_date: state.config.build_date(),
    }
    .render()
    .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to render banner: {}", e)))?;

    Ok(Html(page))
}
