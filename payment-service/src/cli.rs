use clap::Parser;
use service_core::error::AppError;

/// Command-line options understood by the service binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "payment-service")]
#[command(about = "Mock payment microservice")]
pub struct Cli {
    /// Configuration file; extension optional.
    #[arg(long, env = "PAYMENT_CONFIG_FILE", default_value = "configuration")]
    pub config: String,

    /// Overrides `server_port`.
    #[arg(long)]
    pub port: Option<u16>,

    /// Overrides `server_restart`.
    #[arg(long)]
    pub restart: Option<bool>,
}

/// The raw argument vector the process was started with.
///
/// Kept unparsed so every relaunch replays exactly what the first boot saw.
#[derive(Debug, Clone)]
pub struct BootArgs {
    raw: Vec<String>,
}

impl BootArgs {
    pub fn from_env() -> Self {
        Self {
            raw: std::env::args().collect(),
        }
    }

    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            raw: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    pub fn parse(&self) -> Result<Cli, AppError> {
        Cli::try_parse_from(&self.raw)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid arguments: {}", e)))
    }
}
