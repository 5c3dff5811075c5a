use std::{
    io::SeekFrom,
    marker::PhantomData,
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use tokio::{
    fs::File,
    io::{AsyncBufReadExt, AsyncSeekExt, BufReader},
    sync::{
        RwLock,
        mpsc::{self, error::TrySendError},
    },
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    events::{
        metrics::{TailerMetrics, TailerState},
        types::TailRecord,
    },
    utils::{config::MonitorConfig, logs_fmt::abbrev_path},
};

enum ReadOutcome {
    Advanced(u64),
    ReceiverClosed,
}

/// Follows one append-only JSON-lines file, like `tail -F`, and pushes every
/// parsed line onto a bounded queue without ever blocking on it.
pub struct FileTailer<R: TailRecord> {
    path: PathBuf,
    /// Parsed records go here; a full queue drops the record
    tx: mpsc::Sender<R>,
    check_interval: Duration,
    poll_interval: Duration,
    cancel: CancellationToken,
    metrics: Arc<RwLock<TailerMetrics>>,
    _record: PhantomData<fn() -> R>,
}

impl<R: TailRecord> FileTailer<R> {
    pub fn new(
        path: impl Into<PathBuf>,
        tx: mpsc::Sender<R>,
        cfg: &MonitorConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self::with_intervals(
            path,
            tx,
            cfg.file_check_interval(),
            cfg.file_poll_interval(),
            cancel,
        )
    }

    pub fn with_intervals(
        path: impl Into<PathBuf>,
        tx: mpsc::Sender<R>,
        check_interval: Duration,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            path: path.into(),
            tx,
            check_interval,
            poll_interval,
            cancel,
            metrics: Arc::new(RwLock::new(TailerMetrics::default())),
            _record: PhantomData,
        }
    }

    /// Shared handle on this tailer's diagnostics.
    pub fn metrics(&self) -> Arc<RwLock<TailerMetrics>> {
        self.metrics.clone()
    }

    /// Runs until the cancellation token fires or the receiving side of the
    /// queue is dropped.
    pub async fn run(self) {
        let file_label = abbrev_path(&self.path);
        info!(stream = R::STREAM, file = %file_label, "Starting file tailer");

        let Some(mut file) = self.wait_for_file().await else {
            self.finish().await;
            return;
        };
        let mut position: u64 = 0;

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            let size = match tokio::fs::metadata(&self.path).await {
                Ok(meta) => meta.len(),
                Err(_) => {
                    drop(file);
                    warn!(stream = R::STREAM, file = %file_label, "File removed, waiting for recreation");
                    position = 0;
                    {
                        let mut metrics = self.metrics.write().await;
                        metrics.state = TailerState::WaitingForRecreation;
                        metrics.position = 0;
                    }
                    file = match self.wait_for_recreation().await {
                        Some(f) => f,
                        None => break,
                    };
                    {
                        let mut metrics = self.metrics.write().await;
                        metrics.state = TailerState::Tailing;
                        metrics.recreations += 1;
                    }
                    info!(stream = R::STREAM, file = %file_label, "File recreated, tailing from start");
                    continue;
                }
            };

            if size < position {
                drop(file);
                info!(
                    stream = R::STREAM,
                    file = %file_label,
                    size,
                    position,
                    "File truncated, restarting from the beginning"
                );
                file = match self.wait_for_file().await {
                    Some(f) => f,
                    None => break,
                };
                position = 0;
                let mut metrics = self.metrics.write().await;
                metrics.truncations += 1;
                metrics.position = 0;
            }

            if size > position {
                let stalled = match self.read_new_lines(&mut file, position).await {
                    ReadOutcome::Advanced(new_position) => {
                        let stalled = new_position == position;
                        position = new_position;
                        stalled
                    }
                    ReadOutcome::ReceiverClosed => {
                        warn!(stream = R::STREAM, "Record receiver dropped, shutting down");
                        break;
                    }
                };
                // Only a partial line (or a read error) so far.
                if stalled && !self.sleep(self.poll_interval).await {
                    break;
                }
                // Reopen every cycle so a rotated file is picked up by name.
                drop(file);
                file = match self.wait_for_file().await {
                    Some(f) => f,
                    None => break,
                };
            } else if !self.sleep(self.poll_interval).await {
                break;
            }
        }

        self.finish().await;
    }

    /// Blocks (politely) until the file can be opened.
    async fn wait_for_file(&self) -> Option<File> {
        let mut waited = false;
        loop {
            if self.cancel.is_cancelled() {
                return None;
            }
            match File::open(&self.path).await {
                Ok(file) => {
                    self.metrics.write().await.state = TailerState::Tailing;
                    return Some(file);
                }
                Err(_) => {
                    if !waited {
                        debug!(stream = R::STREAM, file = %abbrev_path(&self.path), "Waiting for file");
                        self.metrics.write().await.state = TailerState::WaitingForFile;
                        waited = true;
                    }
                    if !self.sleep(self.check_interval).await {
                        return None;
                    }
                }
            }
        }
    }

    async fn wait_for_recreation(&self) -> Option<File> {
        loop {
            if !self.sleep(self.check_interval).await {
                return None;
            }
            if let Ok(file) = File::open(&self.path).await {
                return Some(file);
            }
        }
    }

    /// Reads complete lines from `position` to the end of the file. Returns
    /// the offset just past the last complete line consumed.
    ///
    /// A final line without a trailing `\n` is never consumed: it is re-read
    /// every cycle and stays pending, indefinitely if need be, until the
    /// writer terminates it with a newline.
    async fn read_new_lines(&self, file: &mut File, position: u64) -> ReadOutcome {
        if let Err(e) = file.seek(SeekFrom::Start(position)).await {
            debug!(stream = R::STREAM, error = %e, "Seek failed, retrying next cycle");
            return ReadOutcome::Advanced(position);
        }

        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut consumed = position;
        let mut lines = 0u64;
        let mut forwarded = 0u64;
        let mut dropped = 0u64;
        let mut receiver_closed = false;

        loop {
            buf.clear();
            let n = match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    debug!(stream = R::STREAM, error = %e, "Read failed, retrying next cycle");
                    break;
                }
            };
            if buf.last() != Some(&b'\n') {
                break;
            }
            consumed += n as u64;
            lines += 1;

            let Ok(text) = std::str::from_utf8(&buf) else {
                continue;
            };
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            let Ok(record) = serde_json::from_str::<R>(text) else {
                continue;
            };

            match self.tx.try_send(record) {
                Ok(()) => forwarded += 1,
                Err(TrySendError::Full(_)) => dropped += 1,
                Err(TrySendError::Closed(_)) => {
                    receiver_closed = true;
                    break;
                }
            }
        }

        if dropped > 0 {
            debug!(stream = R::STREAM, dropped, "Queue full, records dropped");
        }

        {
            let mut metrics = self.metrics.write().await;
            metrics.position = consumed;
            metrics.lines_read += lines;
            metrics.records_forwarded += forwarded;
            metrics.records_dropped += dropped;
        }

        if receiver_closed {
            ReadOutcome::ReceiverClosed
        } else {
            ReadOutcome::Advanced(consumed)
        }
    }

    /// Sleeps for `duration`; false if cancelled first.
    async fn sleep(&self, duration: Duration) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }

    async fn finish(&self) {
        self.metrics.write().await.state = TailerState::Stopped;
        info!(stream = R::STREAM, file = %abbrev_path(&self.path), "File tailer stopped");
    }
}
