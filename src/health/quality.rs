use std::time::Duration;

use super::HealthStatus;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityTiers {
    pub throughput_high: f64,
    pub throughput_medium: f64,
    pub throughput_low: f64,
    pub score_excellent: f64,
    pub score_good: f64,
    pub score_medium: f64,
}

/// Composite 0-100 score: up to 50 points for success rate, 30 for
/// throughput, 20 minus two per error.
pub fn quality_score(success_rate: f64, mps: f64, error_count: u64, tiers: &QualityTiers) -> f64 {
    let success_component = (success_rate / 100.0) * 50.0;

    let throughput_component = if mps >= tiers.throughput_high {
        30.0
    } else if mps >= tiers.throughput_medium {
        25.0
    } else if mps >= tiers.throughput_low {
        15.0
    } else if mps > 0.0 {
        10.0
    } else {
        0.0
    };

    let error_component = (20.0 - 2.0 * error_count as f64).max(0.0);

    success_component + throughput_component + error_component
}

/// Label and display status for a score, e.g. `("BON (74)", Warning)`.
pub fn quality_label(score: f64, tiers: &QualityTiers) -> (String, HealthStatus) {
    let (label, status) = if score >= tiers.score_excellent {
        ("EXCELLENT", HealthStatus::Good)
    } else if score >= tiers.score_good {
        ("BON", HealthStatus::Warning)
    } else if score >= tiers.score_medium {
        ("MOYEN", HealthStatus::Warning)
    } else {
        ("FAIBLE", HealthStatus::Critical)
    };
    (format!("{} ({:.0})", label, score), status)
}

pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs_f64();
    let hours = secs / 3600.0;
    let minutes = secs / 60.0;
    if hours >= 1.0 {
        format!("{:.1}h", hours)
    } else if minutes >= 1.0 {
        format!("{:.0}m", minutes)
    } else {
        format!("{:.0}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HealthThresholds;

    fn tiers() -> QualityTiers {
        HealthThresholds::default().quality
    }

    #[test]
    fn score_ranges() {
        let t = tiers();

        let perfect = quality_score(100.0, 0.5, 0, &t);
        assert!((90.0..=100.0).contains(&perfect), "perfect = {}", perfect);

        let medium = quality_score(80.0, 0.3, 5, &t);
        assert!((50.0..=80.0).contains(&medium), "medium = {}", medium);

        let low = quality_score(50.0, 0.05, 20, &t);
        assert!((0.0..=50.0).contains(&low), "low = {}", low);
    }

    #[test]
    fn score_components() {
        let t = tiers();
        assert_eq!(quality_score(100.0, 2.0, 0, &t), 100.0);
        assert_eq!(quality_score(0.0, 0.0, 0, &t), 20.0);
        assert_eq!(quality_score(0.0, 0.01, 3, &t), 24.0);
        assert_eq!(quality_score(0.0, 0.0, 50, &t), 0.0);
    }

    #[test]
    fn labels_follow_tiers() {
        let t = tiers();
        assert_eq!(quality_label(95.0, &t), ("EXCELLENT (95)".to_string(), HealthStatus::Good));
        assert_eq!(quality_label(74.0, &t).0, "BON (74)");
        assert_eq!(quality_label(50.0, &t).0, "MOYEN (50)");
        assert_eq!(quality_label(12.0, &t), ("FAIBLE (12)".to_string(), HealthStatus::Critical));
    }

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(Duration::from_secs(2 * 3600 + 30 * 60)), "2.5h");
        assert_eq!(format_uptime(Duration::from_secs(45 * 60)), "45m");
        assert_eq!(format_uptime(Duration::from_secs(30)), "30s");
        assert_eq!(format_uptime(Duration::ZERO), "0s");
    }
}
