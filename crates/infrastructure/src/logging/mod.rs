//! Structured logging
//!
//! A process-wide logger that appends one structured record per event to an
//! injected sink, merging in service metadata and the active request's
//! correlation id. Framework-level diagnostics (axum, tower, hyper) go
//! through a separately initialized `tracing` subscriber honoring the same
//! format choice.

mod init;
mod logger;
mod record;
mod sink;

pub use init::{LoggingError, init_tracing};
pub use logger::{Logger, ServiceMetadata};
pub use record::{LogFormat, LogLevel, LogRecord, field_value};
pub use sink::{BufferSink, LogSink, StdoutSink};
