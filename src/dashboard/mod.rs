//! Turns a metrics snapshot into the rows and series a dashboard draws.
//!
//! Nothing here knows about widgets or colors; each row carries a
//! [`HealthStatus`] the frontend can map to whatever styling it uses.

use chrono::{DateTime, Local, Utc};

use crate::{
    events::types::{EventRecord, LogRecord},
    health::{HealthReport, HealthStatus, HealthThresholds},
    store::{BoundedBuffer, MetricsSnapshot, ReportedCounters},
    utils::{config::MonitorConfig, constants::TRUNCATE_SUFFIX},
};

pub mod tui;

pub const LOGS_PLACEHOLDER: &str = "En attente de logs...";
pub const EVENTS_PLACEHOLDER: &str = "En attente d'événements...";

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub label: &'static str,
    pub value: String,
    pub status: Option<HealthStatus>,
}

impl TableRow {
    fn plain(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            status: None,
        }
    }

    fn with_status(label: &'static str, value: String, status: HealthStatus) -> Self {
        Self {
            label,
            value,
            status: Some(status),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub text: String,
    pub status: HealthStatus,
}

#[derive(Debug, Clone, Copy)]
pub struct RowLimits {
    pub max_log_row_length: usize,
    pub max_event_row_length: usize,
}

impl RowLimits {
    pub fn from_config(cfg: &MonitorConfig) -> Self {
        Self {
            max_log_row_length: cfg.max_log_row_length,
            max_event_row_length: cfg.max_event_row_length,
        }
    }
}

impl Default for RowLimits {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default())
    }
}

/// Everything one render tick needs.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub metrics: Vec<TableRow>,
    pub health: Vec<TableRow>,
    pub report: HealthReport,
    /// Oldest to newest
    pub throughput_series: Vec<f64>,
    /// Oldest to newest
    pub success_rate_series: Vec<f64>,
    /// Newest first
    pub log_rows: Vec<ListRow>,
    /// Newest first
    pub event_rows: Vec<ListRow>,
}

impl DashboardView {
    pub fn build(
        snapshot: &MetricsSnapshot,
        now: DateTime<Utc>,
        thresholds: &HealthThresholds,
        limits: RowLimits,
    ) -> Self {
        let report = HealthReport::evaluate(snapshot, now, thresholds);

        Self {
            metrics: metrics_table(snapshot),
            health: health_table(&report),
            report,
            throughput_series: chart_series(&snapshot.messages_per_second_history),
            success_rate_series: chart_series(&snapshot.success_rate_history),
            log_rows: log_rows(&snapshot.recent_logs, limits.max_log_row_length),
            event_rows: event_rows(&snapshot.recent_events, limits.max_event_row_length),
        }
    }
}

pub fn metrics_table(snapshot: &MetricsSnapshot) -> Vec<TableRow> {
    let last_update = snapshot
        .last_update_time
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    vec![
        TableRow::plain("Messages reçus", snapshot.messages_received.to_string()),
        TableRow::plain("Messages traités", snapshot.messages_processed.to_string()),
        TableRow::plain("Messages échoués", snapshot.messages_failed.to_string()),
        TableRow::plain(
            "Débit (msg/s)",
            format!("{:.2}", snapshot.current_messages_per_second),
        ),
        TableRow::plain(
            "Taux de succès",
            format!("{:.2}%", snapshot.current_success_rate),
        ),
        TableRow::plain("Erreurs", snapshot.error_count.to_string()),
        TableRow::plain("Dernière mise à jour", last_update),
        TableRow::plain(
            "Rapport consommateur",
            reported_counters_text(snapshot.reported_counters.as_ref()),
        ),
    ]
}

/// `received / processed / failed` as last reported by the consumer, `-` for
/// a field it left out.
pub fn reported_counters_text(reported: Option<&ReportedCounters>) -> String {
    let Some(reported) = reported else {
        return "-".to_string();
    };
    let field = |v: Option<u64>| v.map_or_else(|| "-".to_string(), |n| n.to_string());
    format!(
        "{} / {} / {}",
        field(reported.messages_received),
        field(reported.messages_processed),
        field(reported.messages_failed)
    )
}

pub fn health_table(report: &HealthReport) -> Vec<TableRow> {
    vec![
        TableRow::with_status(
            "Santé globale",
            format!("● {}", report.global.label),
            report.global.status,
        ),
        TableRow::with_status(
            "Taux de succès",
            format!("● {}", report.success_rate.label),
            report.success_rate.status,
        ),
        TableRow::with_status(
            "Débit",
            format!("● {}", report.throughput.label),
            report.throughput.status,
        ),
        TableRow::with_status(
            "Erreurs",
            format!("● {}", report.errors.label),
            report.errors.status,
        ),
        TableRow::plain("Uptime", report.uptime_text.clone()),
        TableRow::with_status(
            "Qualité",
            report.quality_text.clone(),
            report.quality_status,
        ),
    ]
}

/// A chart needs at least one point.
pub fn chart_series(history: &BoundedBuffer<f64>) -> Vec<f64> {
    if history.is_empty() {
        vec![0.0]
    } else {
        history.to_vec()
    }
}

pub fn log_rows(logs: &BoundedBuffer<LogRecord>, max_len: usize) -> Vec<ListRow> {
    if logs.is_empty() {
        return vec![ListRow {
            text: LOGS_PLACEHOLDER.to_string(),
            status: HealthStatus::Good,
        }];
    }
    logs.iter()
        .rev()
        .map(|log| ListRow {
            text: format_log_row(log, max_len),
            status: if log.level.is_error() {
                HealthStatus::Critical
            } else {
                HealthStatus::Good
            },
        })
        .collect()
}

pub fn event_rows(events: &BoundedBuffer<EventRecord>, max_len: usize) -> Vec<ListRow> {
    if events.is_empty() {
        return vec![ListRow {
            text: EVENTS_PLACEHOLDER.to_string(),
            status: HealthStatus::Good,
        }];
    }
    events
        .iter()
        .rev()
        .map(|event| ListRow {
            text: format_event_row(event, max_len),
            status: if event.deserialized {
                HealthStatus::Good
            } else {
                HealthStatus::Critical
            },
        })
        .collect()
}

pub fn format_log_row(log: &LogRecord, max_len: usize) -> String {
    let glyph = if log.level.is_error() { "🔴" } else { "🟢" };
    let row = format!("{} [{}] {}", glyph, display_time(&log.timestamp), log.message);
    truncate_row(row, max_len)
}

pub fn format_event_row(event: &EventRecord, max_len: usize) -> String {
    let glyph = if event.deserialized { "✅" } else { "❌" };
    let row = format!(
        "{} [{}] Offset: {} | {}",
        glyph,
        display_time(&event.timestamp),
        event.offset,
        event.event_type
    );
    truncate_row(row, max_len)
}

/// `HH:MM:SS` out of an RFC3339 timestamp; anything too short to hold one
/// is shown as-is.
pub fn display_time(timestamp: &str) -> &str {
    if timestamp.len() > 19 {
        timestamp.get(11..19).unwrap_or(timestamp)
    } else {
        timestamp
    }
}

/// Caps a row at `max_len` characters, ending with the truncation suffix
/// when it had to cut.
pub fn truncate_row(row: String, max_len: usize) -> String {
    if row.chars().count() <= max_len {
        return row;
    }
    let keep = max_len.saturating_sub(TRUNCATE_SUFFIX.chars().count());
    let mut truncated: String = row.chars().take(keep).collect();
    truncated.push_str(TRUNCATE_SUFFIX);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{events::types::LogLevel, store::StoreSettings};
    use chrono::TimeDelta;

    fn log(level: LogLevel, message: &str) -> LogRecord {
        LogRecord {
            timestamp: "2024-01-15T10:30:00Z".to_string(),
            level,
            message: message.to_string(),
            service: "order-tracker".to_string(),
            error: None,
            metadata: None,
        }
    }

    fn event(offset: i64, deserialized: bool) -> EventRecord {
        EventRecord {
            timestamp: "2024-01-15T10:30:05.123Z".to_string(),
            event_type: "message.received".to_string(),
            topic: "orders".to_string(),
            partition: 0,
            offset,
            raw_message: String::new(),
            message_size: 0,
            deserialized,
            error: None,
            payload: None,
        }
    }

    #[test]
    fn log_row_layout() {
        assert_eq!(
            format_log_row(&log(LogLevel::Info, "Commande traitée"), 100),
            "🟢 [10:30:00] Commande traitée"
        );
        assert!(format_log_row(&log(LogLevel::Error, "boom"), 100).starts_with("🔴"));
    }

    #[test]
    fn event_row_layout() {
        assert_eq!(
            format_event_row(&event(42, true), 100),
            "✅ [10:30:05] Offset: 42 | message.received"
        );
        assert!(format_event_row(&event(7, false), 100).starts_with("❌"));
    }

    #[test]
    fn long_rows_are_truncated_with_suffix() {
        let message = "x".repeat(200);
        let row = format_log_row(&log(LogLevel::Info, &message), 40);
        assert_eq!(row.chars().count(), 40);
        assert!(row.ends_with(TRUNCATE_SUFFIX));
    }

    #[test]
    fn short_timestamps_are_shown_whole() {
        assert_eq!(display_time("10:30"), "10:30");
        assert_eq!(display_time("2024-01-15T10:30:00Z"), "10:30:00");
    }

    #[test]
    fn lists_are_newest_first_with_placeholder() {
        let mut logs = BoundedBuffer::new(5);
        assert_eq!(log_rows(&logs, 100)[0].text, LOGS_PLACEHOLDER);

        logs.push(log(LogLevel::Info, "first"));
        logs.push(log(LogLevel::Error, "second"));
        let rows = log_rows(&logs, 100);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].text.ends_with("second"));
        assert_eq!(rows[0].status, HealthStatus::Critical);
        assert!(rows[1].text.ends_with("first"));

        let events = BoundedBuffer::new(5);
        assert_eq!(event_rows(&events, 100)[0].text, EVENTS_PLACEHOLDER);
    }

    #[test]
    fn reported_counters_row() {
        let reported = ReportedCounters {
            messages_received: Some(40),
            messages_processed: Some(38),
            messages_failed: None,
            reported_at: Utc::now(),
        };
        assert_eq!(reported_counters_text(Some(&reported)), "40 / 38 / -");
        assert_eq!(reported_counters_text(None), "-");
    }

    #[test]
    fn empty_series_gets_a_zero_point() {
        let mut history = BoundedBuffer::new(3);
        assert_eq!(chart_series(&history), vec![0.0]);
        history.push(1.5);
        history.push(2.5);
        assert_eq!(chart_series(&history), vec![1.5, 2.5]);
    }

    #[test]
    fn view_has_expected_table_shapes() {
        let start = Utc::now();
        let mut snapshot = MetricsSnapshot::new(&StoreSettings::default(), start);
        snapshot.record_event(event(1, true), start + TimeDelta::seconds(1));
        snapshot.record_event(event(2, false), start + TimeDelta::seconds(2));

        let view = DashboardView::build(
            &snapshot,
            start + TimeDelta::seconds(3),
            &HealthThresholds::default(),
            RowLimits::default(),
        );

        assert_eq!(view.metrics.len(), 8);
        assert_eq!(view.metrics[7].value, "-");
        assert_eq!(view.metrics[0].value, "2");
        assert_eq!(view.metrics[4].value, "50.00%");
        assert_eq!(view.health.len(), 6);
        assert_eq!(view.health[0].value, "● CRITIQUE");
        assert_eq!(view.health[4].value, "3s");
        assert_eq!(view.throughput_series, vec![0.0]);
        assert_eq!(view.event_rows.len(), 2);
        assert!(view.event_rows[0].text.starts_with("❌"));
    }
}
