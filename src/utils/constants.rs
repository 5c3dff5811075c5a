pub const TRACKER_LOG_FILE: &str = "tracker.log";
pub const TRACKER_EVENTS_FILE: &str = "tracker.events";

/// Message the consumer writes alongside its periodic counter report.
pub const PERIODIC_METRICS_MESSAGE: &str = "Métriques système périodiques";

// Metadata keys of the periodic report
pub const META_MESSAGES_RECEIVED: &str = "messages_received";
pub const META_MESSAGES_PROCESSED: &str = "messages_processed";
pub const META_MESSAGES_FAILED: &str = "messages_failed";
pub const META_MESSAGES_PER_SECOND: &str = "messages_per_second";
pub const META_SUCCESS_RATE_PERCENT: &str = "success_rate_percent";

// Buffers and queues
pub const MAX_RECENT_LOGS: usize = 20;
pub const MAX_RECENT_EVENTS: usize = 20;
pub const MAX_HISTORY_SIZE: usize = 60;
pub const LOG_QUEUE_CAPACITY: usize = 100;
pub const EVENT_QUEUE_CAPACITY: usize = 100;

// Timing (milliseconds)
pub const FILE_CHECK_INTERVAL_MS: u64 = 1_000;
pub const FILE_POLL_INTERVAL_MS: u64 = 100;
pub const RENDER_TICK_MS: u64 = 1_000;

// Health thresholds
pub const SUCCESS_RATE_EXCELLENT: f64 = 95.0;
pub const SUCCESS_RATE_GOOD: f64 = 80.0;
pub const THROUGHPUT_NORMAL: f64 = 0.3;
pub const THROUGHPUT_LOW: f64 = 0.1;
pub const ERROR_WINDOW_CRITICAL_SECS: u64 = 60;
pub const ERROR_WINDOW_WARNING_SECS: u64 = 300;

// Quality score tiers
pub const QUALITY_THROUGHPUT_HIGH: f64 = 1.0;
pub const QUALITY_THROUGHPUT_MEDIUM: f64 = 0.5;
pub const QUALITY_THROUGHPUT_LOW: f64 = 0.1;
pub const QUALITY_SCORE_EXCELLENT: f64 = 90.0;
pub const QUALITY_SCORE_GOOD: f64 = 70.0;
pub const QUALITY_SCORE_MEDIUM: f64 = 50.0;

// Dashboard rows
pub const MAX_LOG_ROW_LENGTH: usize = 100;
pub const MAX_EVENT_ROW_LENGTH: usize = 100;
pub const TRUNCATE_SUFFIX: &str = "...";
