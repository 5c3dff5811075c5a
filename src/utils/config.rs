use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

use crate::{
    health::{
        ErrorRecencyWindows, HealthStatus, HealthThresholds, QualityTiers, StatusThreshold,
    },
    utils::{constants::*, error::MonitorError},
};

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Structured system/health log written by the consumer
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Audit trail of every message the consumer received
    #[serde(default = "default_events_file")]
    pub events_file: PathBuf,

    /// How often a missing file is checked again (milliseconds)
    #[serde(default = "default_file_check_interval_ms")]
    pub file_check_interval_ms: u64,

    /// Sleep between stat calls when no new data is available (milliseconds)
    #[serde(default = "default_file_poll_interval_ms")]
    pub file_poll_interval_ms: u64,

    #[serde(default = "default_log_queue_capacity")]
    pub log_queue_capacity: usize,

    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,

    #[serde(default = "default_max_recent_logs")]
    pub max_recent_logs: usize,

    #[serde(default = "default_max_recent_events")]
    pub max_recent_events: usize,

    /// Capacity of both chart series
    #[serde(default = "default_max_history_size")]
    pub max_history_size: usize,

    #[serde(default = "default_render_tick_ms")]
    pub render_tick_ms: u64,

    #[serde(default = "default_success_rate_excellent")]
    pub success_rate_excellent: f64,

    #[serde(default = "default_success_rate_good")]
    pub success_rate_good: f64,

    #[serde(default = "default_throughput_normal")]
    pub throughput_normal: f64,

    #[serde(default = "default_throughput_low")]
    pub throughput_low: f64,

    /// Errors younger than this are "active"
    #[serde(default = "default_error_window_critical_secs")]
    pub error_window_critical_secs: u64,

    /// Errors older than this no longer count against health
    #[serde(default = "default_error_window_warning_secs")]
    pub error_window_warning_secs: u64,

    #[serde(default = "default_quality_throughput_high")]
    pub quality_throughput_high: f64,

    #[serde(default = "default_quality_throughput_medium")]
    pub quality_throughput_medium: f64,

    #[serde(default = "default_quality_throughput_low")]
    pub quality_throughput_low: f64,

    #[serde(default = "default_quality_score_excellent")]
    pub quality_score_excellent: f64,

    #[serde(default = "default_quality_score_good")]
    pub quality_score_good: f64,

    #[serde(default = "default_quality_score_medium")]
    pub quality_score_medium: f64,

    #[serde(default = "default_max_log_row_length")]
    pub max_log_row_length: usize,

    #[serde(default = "default_max_event_row_length")]
    pub max_event_row_length: usize,

    /// Log message that carries the consumer's periodic counter report
    #[serde(default = "default_periodic_metrics_message")]
    pub periodic_metrics_message: String,

    /// If true, the periodic report overwrites the live counters
    /// (received/processed/failed). If false, counters only move with
    /// audit events and the report is kept for display.
    #[serde(default)]
    pub report_counters_authoritative: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            events_file: default_events_file(),
            file_check_interval_ms: default_file_check_interval_ms(),
            file_poll_interval_ms: default_file_poll_interval_ms(),
            log_queue_capacity: default_log_queue_capacity(),
            event_queue_capacity: default_event_queue_capacity(),
            max_recent_logs: default_max_recent_logs(),
            max_recent_events: default_max_recent_events(),
            max_history_size: default_max_history_size(),
            render_tick_ms: default_render_tick_ms(),
            success_rate_excellent: default_success_rate_excellent(),
            success_rate_good: default_success_rate_good(),
            throughput_normal: default_throughput_normal(),
            throughput_low: default_throughput_low(),
            error_window_critical_secs: default_error_window_critical_secs(),
            error_window_warning_secs: default_error_window_warning_secs(),
            quality_throughput_high: default_quality_throughput_high(),
            quality_throughput_medium: default_quality_throughput_medium(),
            quality_throughput_low: default_quality_throughput_low(),
            quality_score_excellent: default_quality_score_excellent(),
            quality_score_good: default_quality_score_good(),
            quality_score_medium: default_quality_score_medium(),
            max_log_row_length: default_max_log_row_length(),
            max_event_row_length: default_max_event_row_length(),
            periodic_metrics_message: default_periodic_metrics_message(),
            report_counters_authoritative: false,
        }
    }
}

impl MonitorConfig {
    /// Load from `MONITOR_*` environment variables (and `.env`), falling back
    /// to defaults for anything unset.
    pub fn load() -> Result<Self, MonitorError> {
        dotenvy::dotenv().ok();

        let cfg: MonitorConfig = config::Config::builder()
            .add_source(config::Environment::with_prefix("MONITOR").try_parsing(true))
            .build()?
            .try_deserialize()?;

        cfg.validate()?;

        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        let non_zero = [
            ("log_queue_capacity", self.log_queue_capacity),
            ("event_queue_capacity", self.event_queue_capacity),
            ("max_recent_logs", self.max_recent_logs),
            ("max_recent_events", self.max_recent_events),
            ("max_history_size", self.max_history_size),
        ];
        for (name, value) in non_zero {
            if value == 0 {
                return Err(MonitorError::InvalidConfig(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }

        if self.file_check_interval_ms == 0
            || self.file_poll_interval_ms == 0
            || self.render_tick_ms == 0
        {
            return Err(MonitorError::InvalidConfig(
                "intervals must be greater than zero".to_string(),
            ));
        }

        if self.success_rate_excellent < self.success_rate_good {
            return Err(MonitorError::InvalidConfig(
                "success_rate_excellent must be >= success_rate_good".to_string(),
            ));
        }

        if self.throughput_normal < self.throughput_low {
            return Err(MonitorError::InvalidConfig(
                "throughput_normal must be >= throughput_low".to_string(),
            ));
        }

        if self.error_window_warning_secs < self.error_window_critical_secs {
            return Err(MonitorError::InvalidConfig(
                "error_window_warning_secs must be >= error_window_critical_secs".to_string(),
            ));
        }

        if !(self.quality_throughput_high >= self.quality_throughput_medium
            && self.quality_throughput_medium >= self.quality_throughput_low)
        {
            return Err(MonitorError::InvalidConfig(
                "quality throughput tiers must be descending".to_string(),
            ));
        }

        if !(self.quality_score_excellent >= self.quality_score_good
            && self.quality_score_good >= self.quality_score_medium)
        {
            return Err(MonitorError::InvalidConfig(
                "quality score tiers must be descending".to_string(),
            ));
        }

        let suffix_len = TRUNCATE_SUFFIX.chars().count();
        if self.max_log_row_length <= suffix_len || self.max_event_row_length <= suffix_len {
            return Err(MonitorError::InvalidConfig(format!(
                "row lengths must be longer than the truncation suffix ({} chars)",
                suffix_len
            )));
        }

        Ok(())
    }

    pub fn file_check_interval(&self) -> Duration {
        Duration::from_millis(self.file_check_interval_ms)
    }

    pub fn file_poll_interval(&self) -> Duration {
        Duration::from_millis(self.file_poll_interval_ms)
    }

    pub fn render_tick(&self) -> Duration {
        Duration::from_millis(self.render_tick_ms)
    }

    pub fn health_thresholds(&self) -> HealthThresholds {
        HealthThresholds {
            success_rate: vec![
                StatusThreshold::new(self.success_rate_excellent, HealthStatus::Good, "EXCELLENT"),
                StatusThreshold::new(self.success_rate_good, HealthStatus::Warning, "BON"),
                StatusThreshold::new(0.0, HealthStatus::Critical, "CRITIQUE"),
            ],
            throughput: vec![
                StatusThreshold::new(self.throughput_normal, HealthStatus::Good, "NORMAL"),
                StatusThreshold::new(self.throughput_low, HealthStatus::Warning, "FAIBLE"),
                StatusThreshold::new(0.0, HealthStatus::Critical, "ARRÊTÉ"),
            ],
            error_recency: ErrorRecencyWindows {
                critical: Duration::from_secs(self.error_window_critical_secs),
                warning: Duration::from_secs(self.error_window_warning_secs),
            },
            quality: self.quality_tiers(),
        }
    }

    pub fn quality_tiers(&self) -> QualityTiers {
        QualityTiers {
            throughput_high: self.quality_throughput_high,
            throughput_medium: self.quality_throughput_medium,
            throughput_low: self.quality_throughput_low,
            score_excellent: self.quality_score_excellent,
            score_good: self.quality_score_good,
            score_medium: self.quality_score_medium,
        }
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from(TRACKER_LOG_FILE)
}
fn default_events_file() -> PathBuf {
    PathBuf::from(TRACKER_EVENTS_FILE)
}
fn default_file_check_interval_ms() -> u64 {
    FILE_CHECK_INTERVAL_MS
}
fn default_file_poll_interval_ms() -> u64 {
    FILE_POLL_INTERVAL_MS
}
fn default_log_queue_capacity() -> usize {
    LOG_QUEUE_CAPACITY
}
fn default_event_queue_capacity() -> usize {
    EVENT_QUEUE_CAPACITY
}
fn default_max_recent_logs() -> usize {
    MAX_RECENT_LOGS
}
fn default_max_recent_events() -> usize {
    MAX_RECENT_EVENTS
}
fn default_max_history_size() -> usize {
    MAX_HISTORY_SIZE
}
fn default_render_tick_ms() -> u64 {
    RENDER_TICK_MS
}
fn default_success_rate_excellent() -> f64 {
    SUCCESS_RATE_EXCELLENT
}
fn default_success_rate_good() -> f64 {
    SUCCESS_RATE_GOOD
}
fn default_throughput_normal() -> f64 {
    THROUGHPUT_NORMAL
}
fn default_throughput_low() -> f64 {
    THROUGHPUT_LOW
}
fn default_error_window_critical_secs() -> u64 {
    ERROR_WINDOW_CRITICAL_SECS
}
fn default_error_window_warning_secs() -> u64 {
    ERROR_WINDOW_WARNING_SECS
}
fn default_quality_throughput_high() -> f64 {
    QUALITY_THROUGHPUT_HIGH
}
fn default_quality_throughput_medium() -> f64 {
    QUALITY_THROUGHPUT_MEDIUM
}
fn default_quality_throughput_low() -> f64 {
    QUALITY_THROUGHPUT_LOW
}
fn default_quality_score_excellent() -> f64 {
    QUALITY_SCORE_EXCELLENT
}
fn default_quality_score_good() -> f64 {
    QUALITY_SCORE_GOOD
}
fn default_quality_score_medium() -> f64 {
    QUALITY_SCORE_MEDIUM
}
fn default_max_log_row_length() -> usize {
    MAX_LOG_ROW_LENGTH
}
fn default_max_event_row_length() -> usize {
    MAX_EVENT_ROW_LENGTH
}
fn default_periodic_metrics_message() -> String {
    PERIODIC_METRICS_MESSAGE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = MonitorConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.file_poll_interval(), Duration::from_millis(100));
        assert!(!cfg.report_counters_authoritative);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let cfg = MonitorConfig {
            event_queue_capacity: 0,
            ..MonitorConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(MonitorError::InvalidConfig(_))));
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let cfg = MonitorConfig {
            success_rate_excellent: 50.0,
            success_rate_good: 80.0,
            ..MonitorConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn threshold_tables_are_descending() {
        let thresholds = MonitorConfig::default().health_thresholds();
        for table in [&thresholds.success_rate, &thresholds.throughput] {
            assert!(table.windows(2).all(|w| w[0].min_value >= w[1].min_value));
        }
    }
}
