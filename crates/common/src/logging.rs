//! Provides utilities to initialize logging.
use std::env;

use tracing::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Environment variable name for the service label, which is appended to the
/// whoami string.
pub const SVC_LABEL_ENVVAR: &str = "SOFT_SIGNER_SVC_LABEL";

/// Configuration for the logger.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// The whoami string, recorded on the [`root_span`] that tags the signer's logs.
    whoami: String,

    /// Whether to annotate events with the source file.
    with_file: bool,

    /// Whether to annotate events with the source line number.
    with_line_number: bool,
}

impl LoggerConfig {
    /// Creates a new instance with whoami set and annotations taken from the environment.
    pub fn new(whoami: String) -> Self {
        Self {
            whoami,
            with_file: env::var("LOG_FILE").is_ok_and(|v| v == "1"),
            with_line_number: env::var("LOG_LINE_NUM").is_ok_and(|v| v == "1"),
        }
    }

    /// Creates a new instance with the whoami string set to the provided
    /// string.
    pub fn with_base_name(s: &str) -> Self {
        Self::new(get_whoami_string(s))
    }

    /// Returns the whoami string.
    pub fn whoami(&self) -> &str {
        &self.whoami
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::with_base_name("(soft-signer)")
    }
}

/// Initializes the logging subsystem with the provided config.
///
/// Filtering follows `RUST_LOG`.
pub fn init(config: LoggerConfig) {
    let filt = tracing_subscriber::EnvFilter::from_default_env();

    let stdout_sub = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .event_format(
            tracing_subscriber::fmt::format()
                .with_file(config.with_file)
                .with_line_number(config.with_line_number),
        )
        .with_filter(filt);

    tracing_subscriber::registry().with(stdout_sub).init();

    info!(whoami = %config.whoami, "logging started");
}

/// Span carrying the whoami string. Events logged while it is entered are tagged with it.
pub fn root_span(config: &LoggerConfig) -> Span {
    info_span!("soft_signer", whoami = %config.whoami)
}

/// Gets the service label from the standard envvar, which should be included
/// in the whoami string.
pub fn get_service_label_from_env() -> Option<String> {
    env::var(SVC_LABEL_ENVVAR).ok()
}

/// Computes a standard whoami string.
pub fn get_whoami_string(base: &str) -> String {
    match get_service_label_from_env() {
        Some(label) => format!("{base}%{label}"),
        None => base.to_owned(),
    }
}
