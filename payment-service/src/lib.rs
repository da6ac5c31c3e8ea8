pub mod cli;
pub mod config;
pub mod controller;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod startup;
pub mod supervisor;

use std::sync::Arc;

use config::ServiceConfiguration;
use controller::ControllerName;
use openapi::ApiDocs;
use startup::RestartHandle;

/// State shared by every handler of one server generation.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfiguration>,
    pub name: ControllerName,
    pub restart: RestartHandle,
    pub docs: Arc<ApiDocs>,
}

impl AppState {
    pub fn new(config: Arc<ServiceConfiguration>, restart: RestartHandle, docs: ApiDocs) -> Self {
        Self {
            name: ControllerName::new(config.clone()),
            config,
            restart,
            docs: Arc::new(docs),
        }
    }
}
