//! Config controller: environment dump, ConfigMap snapshot and a log probe.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::{config::ConfigMap, AppState};

/// Every environment variable and process property, unredacted.
pub async fn env(State(state): State<AppState>) -> Json<BTreeMap<String, String>> {
    tracing::info!("{}|Request to Get Environment Vars Check.. ", state.name.get());
    Json(state.config.system_properties())
}

pub async fn config_map(State(state): State<AppState>) -> Result<Json<ConfigMap>, AppError> {
    let json = state.config.to_json_string()?;
    tracing::info!(
        "{}|Request to Get ServiceConfiguration .1. {}",
        state.name.get(),
        json
    );

    Ok(Json(ConfigMap::from(state.config.as_ref())))
}

/// Emits one event per level so operators can see which levels are enabled.
pub async fn log(State(state): State<AppState>) -> String {
    let name = state.name.get();

    tracing::info!("{}|Request to Log Level.. ", name);
    tracing::trace!("{}|This is TRACE level message", name);
    tracing::debug!("{}|This is a DEBUG level message", name);
    tracing::info!("{}|This is an INFO level message", name);
    tracing::warn!("{}|This is a WARN level message", name);
    tracing::error!("{}|This is an ERROR level message", name);

    format!("{}|See the log for details", name)
}
