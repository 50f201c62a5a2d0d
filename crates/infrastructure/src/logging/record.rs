//! Log record model and rendering

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder stored for field values that cannot be serialized
pub const UNSERIALIZABLE_PLACEHOLDER: &str = "<unserializable>";

/// Severity of a log record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Upper-case name used in text output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!(
                "Invalid log level: {s}. Use 'debug', 'info', 'warn' or 'error'"
            )),
        }
    }
}

/// Output mode, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Text,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            _ => Err(format!("Invalid log format: {s}. Use 'json' or 'text'")),
        }
    }
}

/// One structured log event. Append-only; never mutated after emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub service: String,
    pub version: String,
    pub environment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub fields: serde_json::Map<String, Value>,
}

impl LogRecord {
    /// Render as a single output line in the given format.
    ///
    /// Rendering never fails: if JSON serialization of the record itself
    /// errors, the text form is used instead.
    #[must_use]
    pub fn render(&self, format: LogFormat) -> String {
        match format {
            LogFormat::Json => {
                serde_json::to_string(self).unwrap_or_else(|_| self.render_text())
            },
            LogFormat::Text => self.render_text(),
        }
    }

    fn render_text(&self) -> String {
        let mut line = format!(
            "{} {:5} {} {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.level,
            self.service,
            self.message,
        );
        if let Some(id) = &self.correlation_id {
            line.push_str(&format!(" correlation_id={id}"));
        }
        for (key, value) in &self.fields {
            line.push_str(&format!(" {key}={value}"));
        }
        line
    }
}

/// Convert a field value for inclusion in a record, substituting a
/// placeholder when the value cannot be serialized.
pub fn field_value(value: impl Serialize) -> Value {
    serde_json::to_value(value)
        .unwrap_or_else(|_| Value::String(UNSERIALIZABLE_PLACEHOLDER.to_string()))
}
