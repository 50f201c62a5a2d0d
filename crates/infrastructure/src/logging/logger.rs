//! The process-wide structured logger

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::context::current_correlation;
use crate::logging::record::{LogFormat, LogLevel, LogRecord};
use crate::logging::sink::LogSink;

/// Immutable service identity stamped on every record
#[derive(Debug, Clone)]
pub struct ServiceMetadata {
    pub service: String,
    pub version: String,
    pub environment: String,
}

/// Appends structured records to an injected sink.
///
/// Constructed once at startup and passed to the components that log;
/// never reached through a global. Records below the configured minimum
/// level are dropped. Emission never panics and never returns an error.
#[derive(Clone)]
pub struct Logger {
    metadata: ServiceMetadata,
    min_level: LogLevel,
    format: LogFormat,
    sink: Arc<dyn LogSink>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("metadata", &self.metadata)
            .field("min_level", &self.min_level)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Create a logger writing to the given sink
    pub fn new(
        metadata: ServiceMetadata,
        min_level: LogLevel,
        format: LogFormat,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            metadata,
            min_level,
            format,
            sink,
        }
    }

    /// Append one record. The active request's correlation id, if any, is
    /// merged in automatically.
    pub fn log(&self, level: LogLevel, message: &str, fields: &[(&str, Value)]) {
        if level < self.min_level {
            return;
        }

        let mut map = serde_json::Map::with_capacity(fields.len());
        for (key, value) in fields {
            map.insert((*key).to_string(), value.clone());
        }

        let record = LogRecord {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
            service: self.metadata.service.clone(),
            version: self.metadata.version.clone(),
            environment: self.metadata.environment.clone(),
            correlation_id: current_correlation().map(String::from),
            fields: map,
        };

        self.sink.write_line(&record.render(self.format));
    }

    pub fn debug(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Debug, message, fields);
    }

    pub fn info(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Info, message, fields);
    }

    pub fn warn(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Warn, message, fields);
    }

    pub fn error(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(LogLevel::Error, message, fields);
    }

    /// Flush the underlying sink, e.g. during shutdown
    pub fn flush(&self) {
        self.sink.flush();
    }
}
