use tokio::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    events::types::{EventRecord, LogRecord},
    store::MetricsStore,
};

/// Single writer of the [`MetricsStore`]: drains both tailer queues and
/// applies each record in arrival order for its stream.
pub struct IngestionWorker {
    store: MetricsStore,
    log_rx: Receiver<LogRecord>,
    event_rx: Receiver<EventRecord>,
    cancel: CancellationToken,
}

impl IngestionWorker {
    pub fn new(
        store: MetricsStore,
        log_rx: Receiver<LogRecord>,
        event_rx: Receiver<EventRecord>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            store,
            log_rx,
            event_rx,
            cancel,
        }
    }

    /// Returns once cancelled, or once both queues are closed and drained.
    pub async fn run(mut self) {
        info!("Ingestion worker started");

        let mut logs_open = true;
        let mut events_open = true;
        let mut applied_logs = 0u64;
        let mut applied_events = 0u64;

        while logs_open || events_open {
            tokio::select! {
                _ = self.cancel.cancelled() => break,

                log = self.log_rx.recv(), if logs_open => match log {
                    Some(record) => {
                        self.store.apply_log(record).await;
                        applied_logs += 1;
                    }
                    None => {
                        debug!("System log queue closed");
                        logs_open = false;
                    }
                },

                event = self.event_rx.recv(), if events_open => match event {
                    Some(record) => {
                        self.store.apply_event(record).await;
                        applied_events += 1;
                    }
                    None => {
                        debug!("Audit queue closed");
                        events_open = false;
                    }
                },
            }
        }

        info!(
            logs = applied_logs,
            events = applied_events,
            "Ingestion worker stopped"
        );
    }
}
