//! Logger Module
//!
//! A logging system based on `tracing-subscriber` with:
//! - JSON line output tagged with the deployment scope
//! - Console sink on stdout
//! - Optional append-only file sink with fallback to stderr

pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub(crate) mod writer;


// Re-export main types
pub use config::*;
pub use error::LoggerError;
pub use filter::SinkFilter;
pub use format::{FATAL_FIELD, JsonLineFormat};
pub use writer::FileSink;

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, MakeWriter, format::JsonFields},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer,
};

use crate::config::LoggerSettings;

/// Build the subscriber for `settings` without installing it
pub fn build_subscriber(
    settings: &LoggerSettings,
    env: &str,
) -> Result<impl Subscriber + Send + Sync + 'static, LoggerError> {
    build_subscriber_with_console(settings, env, std::io::stdout)
}

/// Same as [`build_subscriber`] with a custom console writer
pub fn build_subscriber_with_console<W>(
    settings: &LoggerSettings,
    env: &str,
    console: W,
) -> Result<impl Subscriber + Send + Sync + 'static, LoggerError>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let format = JsonLineFormat::new(env, settings.level_label());

    let file_settings = settings.file();
    let file_layer = if file_settings.is_enabled() {
        let sink = FileSink::open(&file_sink_path(file_settings.name()))?;
        Some(
            fmt::layer()
                .fmt_fields(JsonFields::new())
                .event_format(format.clone())
                .with_ansi(false)
                .with_writer(sink)
                .with_filter(SinkFilter::new(file_settings.level())),
        )
    } else {
        None
    };

    let console_layer = fmt::layer()
        .fmt_fields(JsonFields::new())
        .event_format(format)
        .with_ansi(false)
        .with_writer(console)
        .with_filter(SinkFilter::new(settings.level()));

    Ok(tracing_subscriber::registry()
        .with(settings.max_level().as_filter())
        .with(file_layer)
        .with(console_layer))
}

/// Install the global logger
///
/// Fails if a global subscriber is already installed.
pub fn init_logger(settings: &LoggerSettings, env: &str) -> Result<(), LoggerError> {
    build_subscriber(settings, env)?
        .try_init()
        .map_err(|e| LoggerError::init(e.to_string()))
}
