use crate::config::ServiceConfiguration;
use std::sync::{Arc, OnceLock};

/// Display name controllers prefix their log lines with, e.g. `|paymentService`.
///
/// Resolved on first use and cached for the lifetime of the server generation.
#[derive(Debug, Clone)]
pub struct ControllerName {
    config: Arc<ServiceConfiguration>,
    resolved: Arc<OnceLock<String>>,
}

impl ControllerName {
    pub fn new(config: Arc<ServiceConfiguration>) -> Self {
        Self {
            config,
            resolved: Arc::new(OnceLock::new()),
        }
    }

    pub fn get(&self) -> &str {
        self.resolved.get_or_init(|| {
            let name = format!("|{}Service", self.config.service_name());
            tracing::info!("{}|Version={}", name, self.config.server_version());
            name
        })
    }
}
