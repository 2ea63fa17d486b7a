// Reporter - sink for user-facing status and diagnostic log lines
//
// The host supplies an implementation: the CLI renders to the terminal and
// an append-only log file, tests record into memory.

pub mod memory;
mod terminal;

pub use memory::RecordingReporter;
pub use terminal::TerminalReporter;

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Warning,
    Error,
}

/// Receives the outcome of an invocation and its diagnostics
pub trait Reporter: Send + Sync {
    /// Show a notification to the user
    fn notify(&self, status: Status, message: &str);

    /// Append a line to the diagnostic log
    fn log(&self, line: &str);

    /// Show a transient "in progress" item (status bar)
    fn progress(&self, _message: &str) {}

    /// Hide the transient item
    fn clear_progress(&self) {}
}
