use super::ServiceConfiguration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Read-only export of [`ServiceConfiguration`] served by `GET /config/map`.
///
/// Two snapshots compare equal when their service names match, whatever the
/// other fields hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMap {
    api_doc_path: String,
    service_name: String,
    build_number: i32,
    build_date: String,
    server_version: String,
    server_host: String,
    server_port: u16,
    remote_host: String,
    remote_port: u16,
    service_api_path: String,
    server_restart: bool,
    max_body_size: usize,
    log_level: String,
    otlp_endpoint: Option<String>,
    app_property_list: Vec<String>,
    app_property_map: BTreeMap<String, String>,
}

impl From<&ServiceConfiguration> for ConfigMap {
    fn from(config: &ServiceConfiguration) -> Self {
        Self {
            api_doc_path: config.api_doc_path().to_string(),
            service_name: config.service_name().to_string(),
            build_number: config.build_number(),
            build_date: config.build_date().to_string(),
            server_version: config.server_version().to_string(),
            server_host: config.server_host().to_string(),
            server_port: config.server_port(),
            remote_host: config.remote_host().to_string(),
            remote_port: config.remote_port(),
            service_api_path: config.service_api_path().to_string(),
            server_restart: config.is_server_restart(),
            max_body_size: config.max_body_size(),
            log_level: config.log_level().to_string(),
            otlp_endpoint: config.otlp_endpoint().map(str::to_string),
            app_property_list: config.app_property_list().to_vec(),
            app_property_map: config.app_property_map().clone(),
        }
    }
}

impl ConfigMap {
    pub fn api_doc_path(&self) -> &str {
        &self.api_doc_path
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn build_number(&self) -> i32 {
        self.build_number
    }

    pub fn build_date(&self) -> &str {
        &self.build_date
    }

    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn remote_host(&self) -> &str {
        &self.remote_host
    }

    pub fn remote_port(&self) -> u16 {
        self.remote_port
    }

    pub fn service_api_path(&self) -> &str {
        &self.service_api_path
    }

    pub fn is_server_restart(&self) -> bool {
        self.server_restart
    }

    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn otlp_endpoint(&self) -> Option<&str> {
        self.otlp_endpoint.as_deref()
    }

    pub fn app_property_list(&self) -> &[String] {
        &self.app_property_list
    }

    pub fn app_property_map(&self) -> &BTreeMap<String, String> {
        &self.app_property_map
    }
}

impl PartialEq for ConfigMap {
    fn eq(&self, other: &Self) -> bool {
        self.service_name == other.service_name
    }
}

impl Eq for ConfigMap {}

impl Hash for ConfigMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.service_name.hash(state);
    }
}

impl fmt::Display for ConfigMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigMap{{serviceName='{}'}}", self.service_name)
    }
}
