//! Tracing subscriber initialisation.

use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{ServerConfig, observability::LogFormat};

use super::{ObservabilityError, settings};

/// Marker for an initialised logging pipeline.
#[derive(Debug)]
pub(crate) struct Observability {
    format: LogFormat,
}

impl Observability {
    /// Install the global subscriber and apply runtime request settings.
    pub(crate) fn init(config: &ServerConfig) -> Result<Self, ObservabilityError> {
        settings::apply_runtime_config(config);

        let format = config.logging.log_format;

        match format {
            LogFormat::Compact => init_subscriber(
                config,
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )?,
            LogFormat::Json => init_subscriber(
                config,
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true),
            )?,
        }

        Ok(Self { format })
    }

    #[must_use]
    pub(crate) fn format(&self) -> LogFormat {
        self.format
    }
}

fn build_env_filter(config: &ServerConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},h2=warn,hyper=warn,sqlx=warn",
            config.logging.log_level
        ))
    })
}

fn init_subscriber<L>(config: &ServerConfig, fmt_layer: L) -> Result<(), ObservabilityError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter(config))
        .try_init()?;

    Ok(())
}
