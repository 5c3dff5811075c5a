//! Shared aggregate of everything the tailers have seen.
//!
//! One writer (the ingestion worker) and any number of readers. Writers take
//! the exclusive lock only for the duration of a single record update; readers
//! clone a consistent [`MetricsSnapshot`] under the shared lock.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::{
    events::{
        handlers::PeriodicReport,
        types::{EventRecord, LogRecord},
    },
    utils::config::MonitorConfig,
};

pub mod ring;

pub use ring::BoundedBuffer;

/// Buffer sizes and the rules for the periodic report.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub max_recent_logs: usize,
    pub max_recent_events: usize,
    pub max_history_size: usize,
    pub periodic_metrics_message: String,
    pub report_counters_authoritative: bool,
}

impl StoreSettings {
    pub fn from_config(cfg: &MonitorConfig) -> Self {
        Self {
            max_recent_logs: cfg.max_recent_logs,
            max_recent_events: cfg.max_recent_events,
            max_history_size: cfg.max_history_size,
            periodic_metrics_message: cfg.periodic_metrics_message.clone(),
            report_counters_authoritative: cfg.report_counters_authoritative,
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default())
    }
}

/// Counters as last reported by the consumer itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportedCounters {
    pub messages_received: Option<u64>,
    pub messages_processed: Option<u64>,
    pub messages_failed: Option<u64>,
    pub reported_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub start_time: DateTime<Utc>,
    pub messages_received: u64,
    pub messages_processed: u64,
    pub messages_failed: u64,
    pub error_count: u64,
    pub last_error_time: Option<DateTime<Utc>>,
    pub last_update_time: Option<DateTime<Utc>>,
    pub messages_per_second_history: BoundedBuffer<f64>,
    pub success_rate_history: BoundedBuffer<f64>,
    pub recent_logs: BoundedBuffer<LogRecord>,
    pub recent_events: BoundedBuffer<EventRecord>,
    pub current_messages_per_second: f64,
    pub current_success_rate: f64,
    pub reported_counters: Option<ReportedCounters>,
}

impl MetricsSnapshot {
    pub fn new(settings: &StoreSettings, start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            messages_received: 0,
            messages_processed: 0,
            messages_failed: 0,
            error_count: 0,
            last_error_time: None,
            last_update_time: None,
            messages_per_second_history: BoundedBuffer::new(settings.max_history_size),
            success_rate_history: BoundedBuffer::new(settings.max_history_size),
            recent_logs: BoundedBuffer::new(settings.max_recent_logs),
            recent_events: BoundedBuffer::new(settings.max_recent_events),
            current_messages_per_second: 0.0,
            current_success_rate: 0.0,
            reported_counters: None,
        }
    }

    pub fn uptime(&self, now: DateTime<Utc>) -> Duration {
        (now - self.start_time).to_std().unwrap_or(Duration::ZERO)
    }

    pub fn record_log(&mut self, record: LogRecord, settings: &StoreSettings, now: DateTime<Utc>) {
        if record.level.is_error() {
            self.error_count += 1;
            self.last_error_time = Some(now);
        }

        if record.message == settings.periodic_metrics_message {
            if let Some(metadata) = &record.metadata {
                self.apply_report(
                    PeriodicReport::from_metadata(metadata),
                    settings.report_counters_authoritative,
                    now,
                );
            }
        }

        self.recent_logs.push(record);
        self.last_update_time = Some(now);
    }

    fn apply_report(&mut self, report: PeriodicReport, authoritative: bool, now: DateTime<Utc>) {
        if authoritative {
            if let Some(received) = report.messages_received {
                self.messages_received = received;
            }
            if let Some(processed) = report.messages_processed {
                self.messages_processed = processed;
            }
            if let Some(failed) = report.messages_failed {
                self.messages_failed = failed;
            }
        }

        if let Some(mps) = report.messages_per_second {
            self.messages_per_second_history.push(mps);
            self.current_messages_per_second = mps;
        }
        if let Some(rate) = report.success_rate_percent {
            self.success_rate_history.push(rate);
            self.current_success_rate = rate;
        }

        self.reported_counters = Some(ReportedCounters {
            messages_received: report.messages_received,
            messages_processed: report.messages_processed,
            messages_failed: report.messages_failed,
            reported_at: now,
        });
    }

    pub fn record_event(&mut self, record: EventRecord, now: DateTime<Utc>) {
        if record.deserialized {
            self.messages_processed += 1;
        } else {
            self.messages_failed += 1;
            self.error_count += 1;
            self.last_error_time = Some(now);
        }
        self.messages_received += 1;

        let uptime_secs = self.uptime(now).as_secs_f64();
        if uptime_secs > 0.0 {
            self.current_messages_per_second = self.messages_received as f64 / uptime_secs;
        }
        if self.messages_received > 0 {
            self.current_success_rate =
                self.messages_processed as f64 / self.messages_received as f64 * 100.0;
        }

        self.recent_events.push(record);
        self.last_update_time = Some(now);
    }
}

/// Cloneable handle on the shared metrics.
#[derive(Debug, Clone)]
pub struct MetricsStore {
    inner: Arc<RwLock<MetricsSnapshot>>,
    settings: Arc<StoreSettings>,
}

impl MetricsStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self::starting_at(settings, Utc::now())
    }

    pub fn starting_at(settings: StoreSettings, start_time: DateTime<Utc>) -> Self {
        let snapshot = MetricsSnapshot::new(&settings, start_time);
        Self {
            inner: Arc::new(RwLock::new(snapshot)),
            settings: Arc::new(settings),
        }
    }

    pub async fn apply_log(&self, record: LogRecord) {
        let now = Utc::now();
        self.inner.write().await.record_log(record, &self.settings, now);
    }

    pub async fn apply_event(&self, record: EventRecord) {
        let now = Utc::now();
        self.inner.write().await.record_event(record, now);
    }

    /// Consistent copy of the current state, for one render tick.
    pub async fn snapshot(&self) -> MetricsSnapshot {
        self.inner.read().await.clone()
    }

    /// Locked read-only view, for callers that want to avoid the clone.
    pub async fn read(&self) -> RwLockReadGuard<'_, MetricsSnapshot> {
        self.inner.read().await
    }
}
