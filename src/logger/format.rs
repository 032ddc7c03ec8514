//! JSON line event format
//!
//! Each event becomes one line:
//! `{"level":..,"time":..,"env":..,"target":..,"msg":..,<event fields>,<span fields>}`.
//!
//! tracing has no fatal level. An ERROR event carrying `fatal = true` is
//! rendered as fatal instead.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

use crate::logger::config::{LevelLabel, LogLevel};

/// Event field marking an ERROR event as fatal
pub const FATAL_FIELD: &str = "fatal";

const MESSAGE_FIELD: &str = "message";

/// Event formatter producing one JSON object per line
#[derive(Debug, Clone)]
pub struct JsonLineFormat {
    env: String,
    label: LevelLabel,
}

impl JsonLineFormat {
    pub fn new<E: Into<String>>(env: E, label: LevelLabel) -> Self {
        Self {
            env: env.into(),
            label,
        }
    }

    fn level_value(&self, level: LogLevel) -> Value {
        match self.label {
            LevelLabel::Uppercase => Value::String(level.as_str().to_ascii_uppercase()),
            LevelLabel::Numeric => Value::from(level.severity()),
        }
    }
}

fn log_level(level: &Level, fatal: bool) -> LogLevel {
    match *level {
        Level::ERROR if fatal => LogLevel::Fatal,
        Level::ERROR => LogLevel::Error,
        Level::WARN => LogLevel::Warn,
        Level::INFO => LogLevel::Info,
        Level::DEBUG => LogLevel::Debug,
        Level::TRACE => LogLevel::Trace,
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

impl<S, N> FormatEvent<S, N> for JsonLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);
        let fatal = matches!(visitor.fields.remove(FATAL_FIELD), Some(Value::Bool(true)));
        let msg = visitor.message.take().unwrap_or_default();

        let mut line = String::with_capacity(256);
        line.push('{');
        push_entry(&mut line, "level", &self.level_value(log_level(meta.level(), fatal)), true);
        push_entry(&mut line, "time", &Value::from(now_millis()), false);
        push_entry(&mut line, "env", &Value::String(self.env.clone()), false);
        push_entry(&mut line, "target", &Value::String(meta.target().to_string()), false);
        push_entry(&mut line, "msg", &Value::String(msg), false);

        for (key, value) in &visitor.fields {
            push_entry(&mut line, key, value, false);
        }

        // Outermost span first so inner spans win on duplicate keys
        if let Some(scope) = ctx.event_scope() {
            let mut span_fields = Map::new();
            for span in scope.from_root() {
                let extensions = span.extensions();
                let Some(formatted) = extensions.get::<FormattedFields<N>>() else {
                    continue;
                };
                if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(formatted.as_str()) {
                    span_fields.extend(fields);
                }
            }
            for (key, value) in &span_fields {
                if !visitor.fields.contains_key(key) {
                    push_entry(&mut line, key, value, false);
                }
            }
        }

        line.push('}');
        writeln!(writer, "{}", line)
    }
}

fn push_entry(line: &mut String, key: &str, value: &Value, first: bool) {
    if !first {
        line.push(',');
    }
    line.push_str(&Value::String(key.to_string()).to_string());
    line.push(':');
    line.push_str(&value.to_string());
}

/// Collects event fields as JSON values
#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl JsonVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(match value {
                Value::String(s) => s,
                other => other.to_string(),
            });
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for JsonVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::String(format!("{:?}", value)));
    }
}
