use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::utils::constants::{
    META_MESSAGES_FAILED, META_MESSAGES_PER_SECOND, META_MESSAGES_PROCESSED,
    META_MESSAGES_RECEIVED, META_SUCCESS_RATE_PERCENT,
};

/// Fields pulled out of the consumer's periodic metrics log line. Every field
/// is optional: a missing or malformed one only skips that field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodicReport {
    pub messages_received: Option<u64>,
    pub messages_processed: Option<u64>,
    pub messages_failed: Option<u64>,
    pub messages_per_second: Option<f64>,
    pub success_rate_percent: Option<f64>,
}

impl PeriodicReport {
    pub fn from_metadata(metadata: &HashMap<String, JsonValue>) -> Self {
        Self {
            messages_received: metadata.get(META_MESSAGES_RECEIVED).and_then(as_count),
            messages_processed: metadata.get(META_MESSAGES_PROCESSED).and_then(as_count),
            messages_failed: metadata.get(META_MESSAGES_FAILED).and_then(as_count),
            messages_per_second: metadata.get(META_MESSAGES_PER_SECOND).and_then(as_decimal),
            success_rate_percent: metadata.get(META_SUCCESS_RATE_PERCENT).and_then(as_decimal),
        }
    }
}

/// Counters arrive as JSON numbers (possibly written as floats).
fn as_count(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        _ => None,
    }
}

/// Rates arrive as string-encoded decimals ("12.50"); plain numbers are accepted too.
fn as_decimal(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        JsonValue::Number(n) => n.as_f64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(value: JsonValue) -> HashMap<String, JsonValue> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn extracts_full_report() {
        let report = PeriodicReport::from_metadata(&metadata(json!({
            "messages_received": 10,
            "messages_processed": 9,
            "messages_failed": 1,
            "messages_per_second": "0.50",
            "success_rate_percent": "90.00"
        })));
        assert_eq!(report.messages_received, Some(10));
        assert_eq!(report.messages_processed, Some(9));
        assert_eq!(report.messages_failed, Some(1));
        assert_eq!(report.messages_per_second, Some(0.5));
        assert_eq!(report.success_rate_percent, Some(90.0));
    }

    #[test]
    fn bad_fields_are_skipped_individually() {
        let report = PeriodicReport::from_metadata(&metadata(json!({
            "messages_received": "ten",
            "messages_processed": 4.0,
            "messages_per_second": "fast",
            "success_rate_percent": 75.5
        })));
        assert_eq!(report.messages_received, None);
        assert_eq!(report.messages_processed, Some(4));
        assert_eq!(report.messages_failed, None);
        assert_eq!(report.messages_per_second, None);
        assert_eq!(report.success_rate_percent, Some(75.5));
    }
}
