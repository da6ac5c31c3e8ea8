use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use service_core::error::AppError;
use std::sync::OnceLock;

use crate::models::PaymentType;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the process-wide Prometheus recorder. Survives restarts; call once.
pub fn init_metrics() -> Result<(), AppError> {
    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))
    })?;

    METRICS_HANDLE.set(handle).map_err(|_| {
        AppError::InternalError(anyhow::anyhow!("Metrics handle already initialized"))
    })
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Counts a mock payment by the type reported back to the caller.
pub fn record_payment(payment_type: PaymentType) {
    let label = match payment_type {
        PaymentType::CreditCard => "CREDIT_CARD",
        PaymentType::DebitCard => "DEBIT_CARD",
        PaymentType::NetBanking => "NET_BANKING",
        PaymentType::Upi => "UPI",
        PaymentType::Wallet => "WALLET",
    };
    metrics::counter!("payments_processed_total", "type" => label).increment(1);
}
