use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::{signal, time};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracker_monitor::{
    dashboard::{DashboardView, RowLimits, tui},
    pipeline::Pipeline,
    store::{MetricsStore, StoreSettings},
    utils::{config::MonitorConfig, error::MonitorError, logs_fmt::UptimeSeconds},
};

#[derive(Parser, Debug)]
#[command(name = "tracker-monitor", about = "Live dashboard over the tracker log and audit trail")]
struct Cli {
    /// System/health log to tail (overrides MONITOR_LOG_FILE)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Audit trail to tail (overrides MONITOR_EVENTS_FILE)
    #[arg(long)]
    events_file: Option<PathBuf>,

    /// Directory for the monitor's own log file
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,

    /// Rows shown per recent-entries list
    #[arg(long, default_value_t = 10)]
    rows: usize,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    std::fs::create_dir_all(&cli.log_dir).map_err(|source| MonitorError::Io {
        path: cli.log_dir.clone(),
        source,
    })?;
    let file_appender = tracing_appender::rolling::never(&cli.log_dir, "tracker-monitor.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);

    let default_filter = if cli.verbose {
        "info,tracker_monitor=debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(UptimeSeconds)
                .with_target(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let mut cfg = MonitorConfig::load()?;
    if let Some(path) = cli.log_file {
        cfg.log_file = path;
    }
    if let Some(path) = cli.events_file {
        cfg.events_file = path;
    }

    info!(
        log_file = %cfg.log_file.display(),
        events_file = %cfg.events_file.display(),
        "Tracker monitor starting"
    );

    let cancel = CancellationToken::new();
    let store = MetricsStore::new(StoreSettings::from_config(&cfg));
    let pipeline = Pipeline::spawn(&cfg, store.clone(), cancel.clone());

    let thresholds = cfg.health_thresholds();
    let limits = RowLimits::from_config(&cfg);
    let list_rows = cli.rows;
    let mut tick = time::interval(cfg.render_tick());
    let mut reported_drops = 0u64;

    let mut terminal = tui::init()?;

    let app_result = async {
        let mut key_events = EventStream::new();

        loop {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
                maybe_event = key_events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if tui::is_quit_key(&key) => {
                        info!("Quit requested from the dashboard");
                        break;
                    }
                    Some(Err(e)) => warn!(error = %e, "Terminal event error"),
                    None => break,
                    _ => {}
                },
                _ = tick.tick() => {
                    let snapshot = store.snapshot().await;
                    let view = DashboardView::build(&snapshot, Utc::now(), &thresholds, limits);
                    terminal.draw(|f| tui::draw(f, &view, list_rows))?;

                    let dropped = pipeline.log_tailer.read().await.records_dropped
                        + pipeline.event_tailer.read().await.records_dropped;
                    if dropped > reported_drops {
                        warn!(target: "health", dropped, "Records dropped on full queues so far");
                        reported_drops = dropped;
                    }
                }
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;

    info!("Shutting down gracefully...");
    pipeline.shutdown().await?;

    app_result
}
