use std::sync::Arc;

use tokio::{
    sync::{RwLock, mpsc},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    events::{
        listener::FileTailer,
        metrics::TailerMetrics,
        types::{EventRecord, LogRecord},
        worker::IngestionWorker,
    },
    store::MetricsStore,
    utils::{config::MonitorConfig, error::MonitorError},
};

/// Running tailers and worker, torn down through the shared token.
pub struct Pipeline {
    pub store: MetricsStore,
    pub log_tailer: Arc<RwLock<TailerMetrics>>,
    pub event_tailer: Arc<RwLock<TailerMetrics>>,
    cancel: CancellationToken,
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl Pipeline {
    /// Spawns both tailers and the ingestion worker on the current runtime.
    pub fn spawn(cfg: &MonitorConfig, store: MetricsStore, cancel: CancellationToken) -> Self {
        let (log_tx, log_rx) = mpsc::channel::<LogRecord>(cfg.log_queue_capacity);
        let (event_tx, event_rx) = mpsc::channel::<EventRecord>(cfg.event_queue_capacity);

        let log_tailer = FileTailer::new(&cfg.log_file, log_tx, cfg, cancel.clone());
        let event_tailer = FileTailer::new(&cfg.events_file, event_tx, cfg, cancel.clone());
        let log_metrics = log_tailer.metrics();
        let event_metrics = event_tailer.metrics();

        let worker = IngestionWorker::new(store.clone(), log_rx, event_rx, cancel.clone());

        let handles = vec![
            ("log tailer", tokio::spawn(log_tailer.run())),
            ("event tailer", tokio::spawn(event_tailer.run())),
            ("ingestion worker", tokio::spawn(worker.run())),
        ];

        Self {
            store,
            log_tailer: log_metrics,
            event_tailer: event_metrics,
            cancel,
            handles,
        }
    }

    /// Cancels every task and waits for them to return.
    pub async fn shutdown(self) -> Result<(), MonitorError> {
        self.cancel.cancel();

        let mut first_error = None;
        for (name, handle) in self.handles {
            if let Err(e) = handle.await {
                error!(task = name, error = %e, "Task panicked");
                if first_error.is_none() {
                    first_error = Some(MonitorError::from(e));
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
