//! Observability setup and request tracing middleware.

use thiserror::Error;

mod init;
mod metrics;
mod request;
mod settings;

pub(crate) use init::Observability;
pub(crate) use metrics::{metrics_handler, record_cart_operation};
pub(crate) use request::request_logging;

/// Errors raised while initialising observability.
#[derive(Debug, Error)]
pub(crate) enum ObservabilityError {
    /// Failed to initialise tracing subscriber.
    #[error("failed to initialise tracing subscriber: {0}")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),
}
