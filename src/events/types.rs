use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    #[serde(rename = "INFO")]
    Info,
    #[serde(rename = "ERROR")]
    Error,
}

impl LogLevel {
    pub fn is_error(&self) -> bool {
        matches!(self, LogLevel::Error)
    }
}

/// One line of the system/health log (`tracker.log`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, JsonValue>>,
}

/// One line of the audit trail (`tracker.events`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp: String,
    #[serde(rename = "event_type", alias = "eventType")]
    pub event_type: String,
    #[serde(rename = "kafka_topic", alias = "topic")]
    pub topic: String,
    #[serde(rename = "kafka_partition", alias = "partition")]
    pub partition: i32,
    #[serde(rename = "kafka_offset", alias = "offset")]
    pub offset: i64,
    #[serde(rename = "raw_message", alias = "rawMessage")]
    pub raw_message: String,
    #[serde(rename = "message_size", alias = "messageSize")]
    pub message_size: i64,
    pub deserialized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(
        rename = "order_full",
        alias = "payload",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub payload: Option<JsonValue>,
}

/// Anything a tailer can parse out of a JSON line.
pub trait TailRecord: serde::de::DeserializeOwned + Send + 'static {
    /// Short name of the stream, used in log fields.
    const STREAM: &'static str;
}

impl TailRecord for LogRecord {
    const STREAM: &'static str = "system_log";
}

impl TailRecord for EventRecord {
    const STREAM: &'static str = "audit_trail";
}
