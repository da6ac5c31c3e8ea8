//! HTTP handlers for payment-service.
pub mod banner;
pub mod config;
pub mod docs;
pub mod health;
pub mod metrics;
pub mod payments;
