#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailerState {
    WaitingForFile,
    Tailing,
    WaitingForRecreation,
    Stopped,
}

/// Diagnostics for one tailer. Parse failures are deliberately not counted.
#[derive(Debug, Clone)]
pub struct TailerMetrics {
    pub state: TailerState,
    pub position: u64,
    pub lines_read: u64,
    pub records_forwarded: u64,
    /// Records parsed but dropped because the queue was full
    pub records_dropped: u64,
    pub truncations: u64,
    pub recreations: u64,
}

impl Default for TailerMetrics {
    fn default() -> Self {
        Self {
            state: TailerState::WaitingForFile,
            position: 0,
            lines_read: 0,
            records_forwarded: 0,
            records_dropped: 0,
            truncations: 0,
            recreations: 0,
        }
    }
}
