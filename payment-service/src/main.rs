use dotenvy::dotenv;
use payment_service::cli::BootArgs;
use payment_service::config::ServiceConfiguration;
use payment_service::services::init_metrics;
use payment_service::supervisor::Supervisor;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let args = BootArgs::from_env();
    let config = ServiceConfiguration::load(&args).map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        config.service_name(),
        config.log_level(),
        config.otlp_endpoint(),
    )?;
    init_metrics()?;

    Supervisor::new(args, config).run().await?;

    Ok(())
}
