//! Service configuration.
//!
//! Built once per boot from the layered sources in [`ConfigSource`] and shared
//! read-only with every handler through `AppState`.

mod config_map;

pub use config_map::ConfigMap;

use crate::cli::BootArgs;
use crate::routes::{paths_overlap, served_paths};
use serde::{Deserialize, Serialize};
use service_core::config::ConfigSource;
use service_core::error::AppError;
use std::collections::BTreeMap;

/// Environment prefix: `APP_SERVICE_NAME`, `APP_SERVER_PORT`, ...
pub const ENV_PREFIX: &str = "APP";

/// Path segment of the health controller below the service API path.
pub const HEALTH: &str = "/service";

/// Path segment of the config controller below the service API path.
pub const CONFIG: &str = "/config";

const UNNAMED_SERVICE: &str = "NameNotDefined";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfiguration {
    service_name: String,
    api_doc_path: String,
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

impl Default for ServiceConfiguration {
    fn default() -> Self {
        Self {
            service_name: UNNAMED_SERVICE.to_string(),
            api_doc_path: "/api-docs".to_string(),
            build_number: 0,
            build_date: String::new(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 9090,
            remote_host: "localhost".to_string(),
            remote_port: 8080,
            service_api_path: "/api/v1/payment".to_string(),
            server_restart: false,
            // Upload ceiling inherited from the multipart limit (500 MB).
            max_body_size: 500_000_000,
            log_level: "info".to_string(),
            otlp_endpoint: None,
            app_property_list: Vec::new(),
            app_property_map: BTreeMap::new(),
        }
    }
}

impl ServiceConfiguration {
    /// Loads configuration for a boot with the given command line.
    ///
    /// Command-line flags win over environment variables, which win over the
    /// config file. Anything unset keeps its default.
    pub fn load(args: &BootArgs) -> Result<Self, AppError> {
        let cli = args.parse()?;

        let mut source =
            ConfigSource::new(cli.config, ENV_PREFIX).with_list_key("app_property_list");
        if let Some(port) = cli.port {
            source = source.with_override("server_port", i64::from(port));
        }
        if let Some(restart) = cli.restart {
            source = source.with_override("server_restart", restart);
        }

        Self::from_source(&source)
    }

    pub fn from_source(source: &ConfigSource) -> Result<Self, AppError> {
        let config: Self = source.load()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if !self.service_api_path.starts_with('/') || self.service_api_path.ends_with('/') {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "service_api_path must start with '/' and must not end with '/': {}",
                self.service_api_path
            )));
        }

        let doc_path = self.api_doc_path.as_str();
        if !doc_path.starts_with('/')
            || doc_path.len() < 2
            || doc_path.ends_with('/')
            || doc_path.contains([':', '*'])
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "api_doc_path must be an absolute, non-root path without parameters: {}",
                doc_path
            )));
        }

        // The docs own `{api_doc_path}` and `{api_doc_path}/:group`.
        let group_prefix = format!("{}/", doc_path);
        let group_path = format!("{}:group", group_prefix);
        if let Some(taken) = served_paths(self).into_iter().find(|path| {
            path.starts_with(&group_prefix)
                || paths_overlap(path, doc_path)
                || paths_overlap(path, &group_path)
        }) {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "api_doc_path {} collides with route {}",
                doc_path,
                taken
            )));
        }

        Ok(())
    }

    pub fn service_name(&self) -> &str {
        if self.service_name.is_empty() {
            UNNAMED_SERVICE
        } else {
            &self.service_name
        }
    }

    pub fn api_doc_path(&self) -> &str {
        &self.api_doc_path
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

    /// `{service_api_path}/service`
    pub fn health_path(&self) -> String {
        format!("{}{}", self.service_api_path, HEALTH)
    }

    /// `{service_api_path}/config`
    pub fn config_path(&self) -> String {
        format!("{}{}", self.service_api_path, CONFIG)
    }

    pub fn to_json_string(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Environment variables plus a few process facts, for diagnostic display.
    ///
    /// Nothing is redacted.
    pub fn system_properties(&self) -> BTreeMap<String, String> {
        let mut props: BTreeMap<String, String> = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();

        props.insert("process.id".to_string(), std::process::id().to_string());
        props.insert("os.name".to_string(), std::env::consts::OS.to_string());
        props.insert("os.arch".to_string(), std::env::consts::ARCH.to_string());
        props.insert("os.family".to_string(), std::env::consts::FAMILY.to_string());
        props.insert(
            "service.version".to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );
        if let Ok(dir) = std::env::current_dir() {
            props.insert("user.dir".to_string(), dir.display().to_string());
        }
        if let Ok(exe) = std::env::current_exe() {
            props.insert("process.executable".to_string(), exe.display().to_string());
        }

        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn empty_source(prefix: &str) -> ConfigSource {
        ConfigSource::new("payment-service-missing-config", prefix)
    }

    #[test]
    fn unset_fields_use_defaults() {
        let config = ServiceConfiguration::from_source(&empty_source("PAYTEST_DEFAULTS")).unwrap();

        assert_eq!(config.service_name(), "NameNotDefined");
        assert_eq!(config.service_api_path(), "/api/v1/payment");
        assert_eq!(config.health_path(), "/api/v1/payment/service");
        assert_eq!(config.config_path(), "/api/v1/payment/config");
        assert!(!config.is_server_restart());
        assert_eq!(config.max_body_size(), 500_000_000);
    }

    #[test]
    fn empty_service_name_reads_as_sentinel() {
        let config = ServiceConfiguration::from_source(
            &empty_source("PAYTEST_EMPTY_NAME").with_override("service_name", ""),
        )
        .unwrap();

        assert_eq!(config.service_name(), "NameNotDefined");
    }

    #[test]
    fn file_values_are_loaded() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
service_name = "payment"
build_number = 42
build_date = "2024-05-01"
remote_port = 9443
app_property_list = ["alpha", "beta"]

[app_property_map]
region = "eu"
"#
        )
        .unwrap();

        let source = ConfigSource::new(file.path().to_string_lossy(), "PAYTEST_FILE");
        let config = ServiceConfiguration::from_source(&source).unwrap();

        assert_eq!(config.service_name(), "payment");
        assert_eq!(config.build_number(), 42);
        assert_eq!(config.build_date(), "2024-05-01");
        assert_eq!(config.remote_port(), 9443);
        assert_eq!(config.app_property_list(), ["alpha", "beta"]);
        assert_eq!(config.app_property_map().get("region").map(String::as_str), Some("eu"));
    }

    #[test]
    fn command_line_overrides_apply() {
        let args = BootArgs::new([
            "payment-service",
            "--config",
            "payment-service-missing-config",
            "--port",
            "9191",
            "--restart",
            "true",
        ]);
        let config = ServiceConfiguration::load(&args).unwrap();

        assert_eq!(config.server_port(), 9191);
        assert!(config.is_server_restart());
    }

    #[test]
    fn trailing_slash_in_api_path_is_rejected() {
        let result = ServiceConfiguration::from_source(
            &empty_source("PAYTEST_SLASH").with_override("service_api_path", "/api/v1/payment/"),
        );

        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn doc_path_colliding_with_a_route_is_rejected() {
        for doc_path in [
            "/metrics",
            "/api/v1/payment/status",
            "/api/v1/payment/status/latest",
            "/api/v1/payment",
            "/api-docs/",
        ] {
            let result = ServiceConfiguration::from_source(
                &empty_source("PAYTEST_DOC_PATH").with_override("api_doc_path", doc_path),
            );

            assert!(
                matches!(result, Err(AppError::ConfigError(_))),
                "api_doc_path {} was accepted",
                doc_path
            );
        }
    }

    #[test]
    fn doc_path_beside_the_api_is_accepted() {
        let config = ServiceConfiguration::from_source(
            &empty_source("PAYTEST_DOC_PATH_OK").with_override("api_doc_path", "/api/v1/docs"),
        )
        .unwrap();

        assert_eq!(config.api_doc_path(), "/api/v1/docs");
    }

    #[test]
    fn system_properties_include_process_facts() {
        let props = ServiceConfiguration::default().system_properties();

        assert_eq!(props.get("process.id"), Some(&std::process::id().to_string()));
        assert_eq!(props.get("os.name").map(String::as_str), Some(std::env::consts::OS));
    }

    #[test]
    fn json_string_contains_service_name() {
        let json = ServiceConfiguration::default().to_json_string().unwrap();
        assert!(json.contains("\"service_name\":\"NameNotDefined\""));
    }
}
