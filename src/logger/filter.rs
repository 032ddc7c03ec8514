//! Per-sink event filter
//!
//! A level filter, except that a `fatal` sink only lets through ERROR
//! events carrying `fatal = true`.

use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Metadata};
use tracing_subscriber::layer::{Context, Filter};
use tracing_subscriber::filter::LevelFilter;

use crate::logger::config::LogLevel;
use crate::logger::format::FATAL_FIELD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkFilter {
    level: LevelFilter,
    fatal_only: bool,
}

impl SinkFilter {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level: level.as_filter(),
            fatal_only: level == LogLevel::Fatal,
        }
    }
}

impl<S> Filter<S> for SinkFilter {
    fn enabled(&self, meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        meta.level() <= &self.level
    }

    fn event_enabled(&self, event: &Event<'_>, _cx: &Context<'_, S>) -> bool {
        !self.fatal_only || is_fatal(event)
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        Some(self.level)
    }
}

/// Whether `event` carries `fatal = true`
pub(crate) fn is_fatal(event: &Event<'_>) -> bool {
    let mut visitor = FatalVisitor(false);
    event.record(&mut visitor);
    visitor.0
}

struct FatalVisitor(bool);

impl Visit for FatalVisitor {
    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == FATAL_FIELD {
            self.0 = value;
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_filter_is_error_level_and_marker_only() {
        let filter = SinkFilter::new(LogLevel::Fatal);
        assert_eq!(filter.level, LevelFilter::ERROR);
        assert!(filter.fatal_only);

        let filter = SinkFilter::new(LogLevel::Error);
        assert_eq!(filter.level, LevelFilter::ERROR);
        assert!(!filter.fatal_only);
    }
}
