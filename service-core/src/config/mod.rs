use crate::error::AppError;
use config::{Config as Cfg, Environment, File, Value};
use serde::de::DeserializeOwned;

/// Layered configuration sources, lowest priority first:
/// config file, prefixed environment variables, explicit overrides.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Config file name; without an extension every format the `config` crate knows is tried.
    pub file: String,
    /// Environment prefix, e.g. `APP` reads `APP_SERVICE_NAME` into `service_name`.
    pub env_prefix: String,
    /// Keys whose environment value is a comma separated list.
    pub list_keys: Vec<String>,
    overrides: Vec<(String, Value)>,
}

impl ConfigSource {
    pub fn new(file: impl Into<String>, env_prefix: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            env_prefix: env_prefix.into(),
            list_keys: Vec::new(),
            overrides: Vec::new(),
        }
    }

    pub fn with_list_key(mut self, key: impl Into<String>) -> Self {
        self.list_keys.push(key.into());
        self
    }

    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// Builds and deserializes the layered configuration.
    pub fn load<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        dotenvy::dotenv().ok();

        let mut environment = Environment::with_prefix(&self.env_prefix)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",");
        for key in &self.list_keys {
            environment = environment.with_list_parse_key(key);
        }

        let mut builder = Cfg::builder()
            .add_source(File::with_name(&self.file).required(false))
            .add_source(environment);
        for (key, value) in &self.overrides {
            builder = builder.set_override(key.as_str(), value.clone())?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default = "default_name")]
        name: String,
        #[serde(default)]
        port: u16,
        #[serde(default)]
        tags: Vec<String>,
    }

    fn default_name() -> String {
        "unset".to_string()
    }

    #[test]
    fn missing_sources_fall_back_to_defaults() {
        let sample: Sample = ConfigSource::new("does-not-exist", "CORETEST_EMPTY")
            .load()
            .unwrap();

        assert_eq!(sample.name, "unset");
        assert_eq!(sample.port, 0);
        assert!(sample.tags.is_empty());
    }

    #[test]
    fn overrides_win_over_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "name = \"from-file\"\nport = 7000\ntags = [\"a\", \"b\"]").unwrap();

        let sample: Sample = ConfigSource::new(file.path().to_string_lossy(), "CORETEST_FILE")
            .with_override("port", 7100_i64)
            .load()
            .unwrap();

        assert_eq!(sample.name, "from-file");
        assert_eq!(sample.port, 7100);
        assert_eq!(sample.tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn unparsable_value_is_a_config_error() {
        let result: Result<Sample, AppError> = ConfigSource::new("does-not-exist", "CORETEST_BAD")
            .with_override("port", "not-a-port")
            .load();

        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
