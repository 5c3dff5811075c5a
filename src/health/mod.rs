//! Health classification.
//!
//! Everything here is a pure function of a [`MetricsSnapshot`](crate::store::MetricsSnapshot)
//! and an explicit `now`, so the same inputs always classify the same way.

use std::time::Duration;

use chrono::{DateTime, Utc};

pub mod quality;
pub mod report;

pub use quality::{QualityTiers, format_uptime, quality_label, quality_score};
pub use report::HealthReport;

/// Ordered by severity: `Good < Warning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HealthStatus {
    Good,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReading {
    pub status: HealthStatus,
    pub label: &'static str,
}

impl StatusReading {
    pub const fn new(status: HealthStatus, label: &'static str) -> Self {
        Self { status, label }
    }
}

pub const UNKNOWN_READING: StatusReading = StatusReading::new(HealthStatus::Critical, "INCONNU");

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusThreshold {
    pub min_value: f64,
    pub status: HealthStatus,
    pub label: &'static str,
}

impl StatusThreshold {
    pub const fn new(min_value: f64, status: HealthStatus, label: &'static str) -> Self {
        Self {
            min_value,
            status,
            label,
        }
    }

    fn reading(&self) -> StatusReading {
        StatusReading::new(self.status, self.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorRecencyWindows {
    /// Errors younger than this are active
    pub critical: Duration,
    /// Errors older than this are forgotten
    pub warning: Duration,
}

/// All the tables the evaluator needs; built from config.
#[derive(Debug, Clone)]
pub struct HealthThresholds {
    pub success_rate: Vec<StatusThreshold>,
    pub throughput: Vec<StatusThreshold>,
    pub error_recency: ErrorRecencyWindows,
    pub quality: QualityTiers,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        crate::utils::config::MonitorConfig::default().health_thresholds()
    }
}

/// `thresholds` must be sorted by descending `min_value`. Returns the first
/// entry the value reaches, else the lowest entry.
pub fn evaluate_status(value: f64, thresholds: &[StatusThreshold]) -> StatusReading {
    thresholds
        .iter()
        .find(|t| value >= t.min_value)
        .or_else(|| thresholds.last())
        .map(StatusThreshold::reading)
        .unwrap_or(UNKNOWN_READING)
}

pub fn success_rate_status(rate: f64, thresholds: &HealthThresholds) -> StatusReading {
    evaluate_status(rate, &thresholds.success_rate)
}

pub fn throughput_status(mps: f64, thresholds: &HealthThresholds) -> StatusReading {
    evaluate_status(mps, &thresholds.throughput)
}

/// Depends on both the count and the age of the last error, so it does not
/// fit the single-value threshold tables.
pub fn error_status(
    error_count: u64,
    last_error_time: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    windows: &ErrorRecencyWindows,
) -> StatusReading {
    let quiet = StatusReading::new(HealthStatus::Good, "AUCUNE");
    if error_count == 0 {
        return quiet;
    }
    let Some(last_error) = last_error_time else {
        return quiet;
    };

    let since = (now - last_error).to_std().unwrap_or(Duration::ZERO);
    if since > windows.warning {
        quiet
    } else if since > windows.critical {
        StatusReading::new(HealthStatus::Warning, "RÉCENTES")
    } else {
        StatusReading::new(HealthStatus::Critical, "ACTIVES")
    }
}

pub fn global_status(readings: &[StatusReading]) -> StatusReading {
    let worst = readings
        .iter()
        .map(|r| r.status)
        .max()
        .unwrap_or(HealthStatus::Good);
    match worst {
        HealthStatus::Good => StatusReading::new(HealthStatus::Good, "EXCELLENT"),
        HealthStatus::Warning => StatusReading::new(HealthStatus::Warning, "ATTENTION"),
        HealthStatus::Critical => StatusReading::new(HealthStatus::Critical, "CRITIQUE"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn thresholds() -> HealthThresholds {
        HealthThresholds::default()
    }

    #[test]
    fn success_rate_boundaries() {
        let t = thresholds();
        let cases = [
            (100.0, HealthStatus::Good, "EXCELLENT"),
            (95.0, HealthStatus::Good, "EXCELLENT"),
            (94.9, HealthStatus::Warning, "BON"),
            (80.0, HealthStatus::Warning, "BON"),
            (79.9, HealthStatus::Critical, "CRITIQUE"),
            (0.0, HealthStatus::Critical, "CRITIQUE"),
        ];
        for (rate, status, label) in cases {
            let reading = success_rate_status(rate, &t);
            assert_eq!(reading.status, status, "rate {}", rate);
            assert_eq!(reading.label, label, "rate {}", rate);
        }
    }

    #[test]
    fn throughput_boundaries() {
        let t = thresholds();
        let cases = [
            (1.0, HealthStatus::Good, "NORMAL"),
            (0.3, HealthStatus::Good, "NORMAL"),
            (0.2, HealthStatus::Warning, "FAIBLE"),
            (0.1, HealthStatus::Warning, "FAIBLE"),
            (0.05, HealthStatus::Critical, "ARRÊTÉ"),
            (0.0, HealthStatus::Critical, "ARRÊTÉ"),
        ];
        for (mps, status, label) in cases {
            let reading = throughput_status(mps, &t);
            assert_eq!(reading.status, status, "mps {}", mps);
            assert_eq!(reading.label, label, "mps {}", mps);
        }
    }

    #[test]
    fn below_every_threshold_falls_back_to_last() {
        let table = [
            StatusThreshold::new(10.0, HealthStatus::Good, "HIGH"),
            StatusThreshold::new(5.0, HealthStatus::Warning, "LOW"),
        ];
        assert_eq!(evaluate_status(-1.0, &table).label, "LOW");
    }

    #[test]
    fn empty_table_is_unknown() {
        assert_eq!(evaluate_status(50.0, &[]), UNKNOWN_READING);
    }

    #[test]
    fn error_recency_windows() {
        let windows = thresholds().error_recency;
        let now = Utc::now();

        assert_eq!(error_status(0, None, now, &windows).status, HealthStatus::Good);

        let old = error_status(5, Some(now - TimeDelta::minutes(6)), now, &windows);
        assert_eq!((old.status, old.label), (HealthStatus::Good, "AUCUNE"));

        let recent = error_status(3, Some(now - TimeDelta::minutes(2)), now, &windows);
        assert_eq!((recent.status, recent.label), (HealthStatus::Warning, "RÉCENTES"));

        let active = error_status(2, Some(now - TimeDelta::seconds(30)), now, &windows);
        assert_eq!((active.status, active.label), (HealthStatus::Critical, "ACTIVES"));
    }

    #[test]
    fn error_recency_window_edges_are_inclusive() {
        let windows = thresholds().error_recency;
        let now = Utc::now();

        let at_critical = error_status(1, Some(now - TimeDelta::seconds(60)), now, &windows);
        assert_eq!((at_critical.status, at_critical.label), (HealthStatus::Critical, "ACTIVES"));

        let past_critical = error_status(1, Some(now - TimeDelta::seconds(61)), now, &windows);
        assert_eq!(past_critical.status, HealthStatus::Warning);

        let at_warning = error_status(1, Some(now - TimeDelta::seconds(300)), now, &windows);
        assert_eq!((at_warning.status, at_warning.label), (HealthStatus::Warning, "RÉCENTES"));

        let past_warning = error_status(1, Some(now - TimeDelta::seconds(301)), now, &windows);
        assert_eq!((past_warning.status, past_warning.label), (HealthStatus::Good, "AUCUNE"));
    }

    #[test]
    fn errors_without_timestamp_are_quiet() {
        let windows = thresholds().error_recency;
        assert_eq!(error_status(4, None, Utc::now(), &windows).status, HealthStatus::Good);
    }

    #[test]
    fn global_is_the_worst_reading() {
        let good = StatusReading::new(HealthStatus::Good, "");
        let warn = StatusReading::new(HealthStatus::Warning, "");
        let crit = StatusReading::new(HealthStatus::Critical, "");

        assert_eq!(global_status(&[good, good, good]).label, "EXCELLENT");
        assert_eq!(global_status(&[good, warn, good]).label, "ATTENTION");
        assert_eq!(global_status(&[good, good, crit]).status, HealthStatus::Critical);
        assert_eq!(global_status(&[warn, crit, good]).label, "CRITIQUE");
    }
}
