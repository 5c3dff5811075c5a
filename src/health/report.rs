use std::time::Duration;

use chrono::{DateTime, Utc};

use super::{
    HealthStatus, HealthThresholds, StatusReading, error_status, format_uptime, global_status,
    quality_label, quality_score, success_rate_status, throughput_status,
};
use crate::store::MetricsSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub global: StatusReading,
    pub success_rate: StatusReading,
    pub throughput: StatusReading,
    pub errors: StatusReading,
    pub uptime: Duration,
    pub uptime_text: String,
    pub quality_score: f64,
    pub quality_text: String,
    pub quality_status: HealthStatus,
}

impl HealthReport {
    pub fn evaluate(
        snapshot: &MetricsSnapshot,
        now: DateTime<Utc>,
        thresholds: &HealthThresholds,
    ) -> Self {
        let success_rate = success_rate_status(snapshot.current_success_rate, thresholds);
        let throughput = throughput_status(snapshot.current_messages_per_second, thresholds);
        let errors = error_status(
            snapshot.error_count,
            snapshot.last_error_time,
            now,
            &thresholds.error_recency,
        );
        let global = global_status(&[success_rate, throughput, errors]);

        let score = quality_score(
            snapshot.current_success_rate,
            snapshot.current_messages_per_second,
            snapshot.error_count,
            &thresholds.quality,
        );
        let (quality_text, quality_status) = quality_label(score, &thresholds.quality);

        let uptime = snapshot.uptime(now);

        Self {
            global,
            success_rate,
            throughput,
            errors,
            uptime,
            uptime_text: format_uptime(uptime),
            quality_score: score,
            quality_text,
            quality_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        events::types::EventRecord,
        store::{MetricsSnapshot, StoreSettings},
    };
    use chrono::TimeDelta;

    fn event(deserialized: bool) -> EventRecord {
        EventRecord {
            timestamp: "2026-01-03T17:19:46Z".to_string(),
            event_type: "message.received".to_string(),
            topic: "orders".to_string(),
            partition: 0,
            offset: 0,
            raw_message: String::new(),
            message_size: 0,
            deserialized,
            error: None,
            payload: None,
        }
    }

    #[test]
    fn fresh_snapshot_is_critical_on_throughput() {
        let start = Utc::now();
        let snapshot = MetricsSnapshot::new(&StoreSettings::default(), start);
        let report = HealthReport::evaluate(&snapshot, start, &HealthThresholds::default());

        assert_eq!(report.errors.label, "AUCUNE");
        assert_eq!(report.throughput.label, "ARRÊTÉ");
        assert_eq!(report.global.status, HealthStatus::Critical);
        assert_eq!(report.uptime_text, "0s");
        assert_eq!(report.quality_score, 20.0);
    }

    #[test]
    fn healthy_stream_is_excellent_once_errors_age_out() {
        let start = Utc::now();
        let mut snapshot = MetricsSnapshot::new(&StoreSettings::default(), start);
        for i in 1..=10 {
            snapshot.record_event(event(true), start + TimeDelta::seconds(i));
        }
        let now = start + TimeDelta::seconds(20);
        let report = HealthReport::evaluate(&snapshot, now, &HealthThresholds::default());

        assert_eq!(report.success_rate.status, HealthStatus::Good);
        assert_eq!(report.throughput.status, HealthStatus::Good);
        assert_eq!(report.global.label, "EXCELLENT");
        assert_eq!(report.uptime_text, "20s");
    }

    #[test]
    fn evaluation_is_idempotent() {
        let start = Utc::now();
        let mut snapshot = MetricsSnapshot::new(&StoreSettings::default(), start);
        snapshot.record_event(event(true), start + TimeDelta::seconds(1));
        snapshot.record_event(event(false), start + TimeDelta::seconds(2));

        let now = start + TimeDelta::seconds(90);
        let thresholds = HealthThresholds::default();
        let first = HealthReport::evaluate(&snapshot, now, &thresholds);
        let second = HealthReport::evaluate(&snapshot, now, &thresholds);

        assert_eq!(first, second);
        assert_eq!(first.errors.label, "RÉCENTES");
        assert_eq!(first.global.status, HealthStatus::Critical);
    }
}
