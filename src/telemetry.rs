#![deny(clippy::all, clippy::pedantic)]

use std::io;

use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::client::CliError;
use crate::config::{LogFormat, LoggingSettings};

/// Install a global tracing subscriber writing to stderr so stdout stays
/// reserved for command results.
pub fn init(logging: &LoggingSettings) -> Result<(), CliError> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| CliError::Telemetry(format!("failed to install tracing subscriber: {err}")))
}
