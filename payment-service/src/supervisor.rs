//! Process supervisor.
//!
//! Owns the running [`Application`] generation. When a generation stops with
//! [`RunOutcome::Restart`], configuration is reloaded from the original
//! command line and a new generation is started in its place.

use service_core::error::AppError;
use tokio::sync::watch;

use crate::cli::BootArgs;
use crate::config::ServiceConfiguration;
use crate::startup::{Application, RunOutcome};

/// Published each time a generation finishes booting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Booted {
    pub generation: u64,
    pub port: u16,
}

pub struct Supervisor {
    args: BootArgs,
    initial: Option<ServiceConfiguration>,
    booted: watch::Sender<Option<Booted>>,
}

impl Supervisor {
    /// `config` serves the first generation; later ones reload from `args`.
    pub fn new(args: BootArgs, config: ServiceConfiguration) -> Self {
        let (booted, _) = watch::channel(None);
        Self {
            args,
            initial: Some(config),
            booted,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Booted>> {
        self.booted.subscribe()
    }

    pub async fn run(mut self) -> Result<(), AppError> {
        let mut generation = 0;

        loop {
            let config = match self.initial.take() {
                Some(config) => config,
                None => ServiceConfiguration::load(&self.args).map_err(|e| {
                    tracing::error!("Failed to reload configuration for restart: {}", e);
                    e
                })?,
            };

            tracing::info!("Booting Service ..... ..");
            let app = Application::build(config).await.map_err(|e| {
                tracing::error!("Failed to boot service: {}", e);
                e
            })?;

            generation += 1;
            let port = app.port();
            tracing::info!(generation, port, "Booting Service ..... ...Startup completed!");
            self.booted.send_replace(Some(Booted { generation, port }));

            match app.run_until_stopped().await? {
                RunOutcome::Restart => {
                    tracing::info!(generation, "Restarting Service ..... ..");
                }
                RunOutcome::Shutdown => {
                    tracing::info!(generation, "Service stopped");
                    return Ok(());
                }
            }
        }
    }
}
