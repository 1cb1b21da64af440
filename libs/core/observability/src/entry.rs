//! Log documents written to the search index.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use tracing::Event;
use tracing::field::{Field, Visit};

use crate::severity::{SEVERITY_FIELD, Severity};

/// One indexed log line.
///
/// ```json
/// {
///   "Host": "localhost",
///   "@timestamp": "2025-01-01T12:00:00.123456789Z",
///   "File": "libs/domains/products/src/service.rs:57",
///   "Func": "domain_products::service",
///   "Message": "record not found",
///   "Data": { "method_name": "GetProductById" },
///   "Level": "ERROR"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    #[serde(rename = "Host", skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
    #[serde(rename = "File", skip_serializing_if = "String::is_empty")]
    pub file: String,
    #[serde(rename = "Func", skip_serializing_if = "String::is_empty")]
    pub function: String,
    #[serde(rename = "Message", skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(rename = "Data", skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
    #[serde(rename = "Level")]
    pub level: Severity,
}

impl LogEntry {
    /// Captures a `tracing` event. The `message` field becomes `Message`, a
    /// `severity` field overrides the level, every other field lands in `Data`.
    pub fn from_event(event: &Event<'_>, host: &str) -> Self {
        let metadata = event.metadata();

        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);

        let file = match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => format!("{file}:{line}"),
            (Some(file), None) => file.to_string(),
            _ => String::new(),
        };

        Self {
            host: host.to_string(),
            timestamp: format_timestamp(Utc::now()),
            file,
            function: metadata.module_path().unwrap_or_default().to_string(),
            message: visitor.message,
            data: visitor.data,
            level: visitor
                .severity
                .unwrap_or_else(|| Severity::from(metadata.level())),
        }
    }
}

/// RFC 3339 in UTC with nanosecond precision.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[derive(Default)]
struct EntryVisitor {
    message: String,
    severity: Option<Severity>,
    data: Map<String, Value>,
}

impl EntryVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.data.insert(field.name().to_string(), value);
    }
}

impl Visit for EntryVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            SEVERITY_FIELD => match value.parse() {
                Ok(severity) => self.severity = Some(severity),
                Err(_) => self.insert(field, Value::from(value)),
            },
            _ => self.insert(field, Value::from(value)),
        }
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

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = rendered;
        } else {
            self.insert(field, Value::from(rendered));
        }
    }
}
