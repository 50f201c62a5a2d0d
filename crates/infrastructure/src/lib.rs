//! Infrastructure layer - process-wide plumbing
//!
//! Configuration loading, structured logging, and request-scoped context
//! propagation. Everything here is initialized once at startup and injected
//! into the layers above.

pub mod config;
pub mod context;
pub mod logging;

pub use config::{AppConfig, Environment, LoggingConfig, ServerConfig};
pub use context::{RequestContext, current_correlation, with_correlation};
pub use logging::{
    BufferSink, LogFormat, LogLevel, LogRecord, LogSink, Logger, LoggingError, ServiceMetadata,
    StdoutSink, field_value, init_tracing,
};
