//! Logging collaborators.
//!
//! `TracingLogger` forwards instrumentation records into the `tracing`
//! ecosystem; subscriber installation stays with the embedding binary.
//! `MemoryLogger` captures records for assertions in tests.

use std::sync::Mutex;

use serde_json::Value;

use reqtap_core::{LogFields, Logger};

use crate::config::LogLevel;

/// Default logger: structured `tracing` events carrying the logger name
/// and the open field map rendered as a JSON object.
pub struct TracingLogger {
    name: String,
    level: LogLevel,
}

impl TracingLogger {
    /// Build a logger named `"<service> [<env>]"` with `level` as floor.
    pub fn new(service: &str, env: &str, level: LogLevel) -> Self {
        Self {
            name: format!("{service} [{env}]"),
            level,
        }
    }

    fn enabled(&self, at: LogLevel) -> bool {
        at >= self.level
    }

    fn render(fields: &LogFields) -> Value {
        Value::Object(fields.clone())
    }
}

impl Logger for TracingLogger {
    fn info(&self, message: &str, fields: &LogFields) {
        if self.enabled(LogLevel::Info) {
            tracing::info!(logger = %self.name, fields = %Self::render(fields), "{message}");
        }
    }

    fn warning(&self, message: &str, fields: &LogFields) {
        if self.enabled(LogLevel::Warn) {
            tracing::warn!(logger = %self.name, fields = %Self::render(fields), "{message}");
        }
    }

    fn error(&self, message: &str, fields: &LogFields) {
        if self.enabled(LogLevel::Error) {
            tracing::error!(logger = %self.name, fields = %Self::render(fields), "{message}");
        }
    }
}

/// One captured log record.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub fields: LogFields,
}

/// Captures records in memory for assertions.
#[derive(Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Records at `level` whose message starts with `prefix`.
    pub fn matching(&self, level: LogLevel, prefix: &str) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.level == level && r.message.starts_with(prefix))
            .collect()
    }

    fn push(&self, level: LogLevel, message: &str, fields: &LogFields) {
        if let Ok(mut records) = self.records.lock() {
            records.push(LogRecord {
                level,
                message: message.to_owned(),
                fields: fields.clone(),
            });
        }
    }
}

impl Logger for MemoryLogger {
    fn info(&self, message: &str, fields: &LogFields) {
        self.push(LogLevel::Info, message, fields);
    }

    fn warning(&self, message: &str, fields: &LogFields) {
        self.push(LogLevel::Warn, message, fields);
    }

    fn error(&self, message: &str, fields: &LogFields) {
        self.push(LogLevel::Error, message, fields);
    }
}
