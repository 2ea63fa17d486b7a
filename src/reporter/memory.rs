// In-memory reporter used by tests and embedders that inspect outcomes

use std::sync::Mutex;

use super::{Reporter, Status};

/// Records every notification, log line and progress change
#[derive(Debug, Default)]
pub struct RecordingReporter {
    notifications: Mutex<Vec<(Status, String)>>,
    lines: Mutex<Vec<String>>,
    progress: Mutex<Vec<Option<String>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<(Status, String)> {
        self.notifications
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Progress history: `Some(msg)` when shown, `None` when cleared
    pub fn progress_events(&self) -> Vec<Option<String>> {
        self.progress.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The most recent notification, if any
    pub fn last(&self) -> Option<(Status, String)> {
        self.notifications().last().cloned()
    }
}

impl Reporter for RecordingReporter {
    fn notify(&self, status: Status, message: &str) {
        self.notifications
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((status, message.to_string()));
    }

    fn log(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(line.to_string());
    }

    fn progress(&self, message: &str) {
        self.progress
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Some(message.to_string()));
    }

    fn clear_progress(&self) {
        self.progress
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(None);
    }
}
