//! Log sinks
//!
//! The sink is the single shared resource of the logging subsystem.
//! Implementations serialize concurrent writers so that one record is
//! always one intact line; partial records are never observable.

use std::io::Write;

use parking_lot::Mutex;

/// Destination for rendered log lines.
///
/// `write_line` must never panic and must not block indefinitely.
pub trait LogSink: Send + Sync {
    /// Append one rendered record
    fn write_line(&self, line: &str);

    /// Flush buffered output, e.g. at shutdown
    fn flush(&self);
}

/// Sink writing one line per record to stdout.
#[derive(Debug)]
pub struct StdoutSink {
    // Lock held only for the duration of a single line write
    writer: Mutex<std::io::Stdout>,
}

impl StdoutSink {
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: Mutex::new(std::io::stdout()),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) {
        let mut writer = self.writer.lock();
        // Write failures (closed pipe etc.) are ignored; logging must not fail
        let _ = writeln!(writer, "{line}");
    }

    fn flush(&self) {
        let _ = self.writer.lock().flush();
    }
}

/// In-memory sink for tests and capture
#[derive(Debug, Default)]
pub struct BufferSink {
    lines: Mutex<Vec<String>>,
}

impl BufferSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines written so far, in order
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Whether any line contains the given fragment
    #[must_use]
    pub fn contains(&self, fragment: &str) -> bool {
        self.lines.lock().iter().any(|l| l.contains(fragment))
    }
}

impl LogSink for BufferSink {
    fn write_line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn buffer_sink_records_lines_in_order() {
        let sink = BufferSink::new();
        sink.write_line("first");
        sink.write_line("second");
        assert_eq!(sink.lines(), vec!["first", "second"]);
    }

    #[test]
    fn buffer_sink_contains() {
        let sink = BufferSink::new();
        sink.write_line(r#"{"message":"request completed"}"#);
        assert!(sink.contains("request completed"));
        assert!(!sink.contains("request started"));
    }

    #[test]
    fn concurrent_writers_never_interleave_within_a_record() {
        let sink = Arc::new(BufferSink::new());
        let mut handles = Vec::new();
        for writer in 0..8 {
            let sink = Arc::clone(&sink);
            handles.push(std::thread::spawn(move || {
                for i in 0..50 {
                    sink.write_line(&format!(r#"{{"writer":{writer},"seq":{i}}}"#));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let lines = sink.lines();
        assert_eq!(lines.len(), 8 * 50);
        for line in lines {
            // Every line is one intact JSON object
            let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
            assert!(parsed["writer"].is_number());
        }
    }

    #[test]
    fn stdout_sink_write_does_not_panic() {
        let sink = StdoutSink::new();
        sink.write_line("sink smoke test");
        sink.flush();
    }
}
