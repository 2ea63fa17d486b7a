// Terminal reporter
//
// Notifications go to the terminal with ANSI colors, the in-flight status
// item is an indicatif spinner on stderr, and diagnostic lines are appended
// to a log file (the "output channel").

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

use super::{Reporter, Status};

pub struct TerminalReporter {
    spinner: Mutex<Option<ProgressBar>>,
    log_file: Option<Mutex<File>>,
    log_path: Option<PathBuf>,
}

impl TerminalReporter {
    /// Reporter without an output log
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            log_file: None,
            log_path: None,
        }
    }

    /// Reporter appending diagnostic lines to `path`
    pub fn with_log_file(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open output log: {}", path.display()))?;

        Ok(Self {
            spinner: Mutex::new(None),
            log_file: Some(Mutex::new(file)),
            log_path: Some(path.to_path_buf()),
        })
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TerminalReporter {
    fn notify(&self, status: Status, message: &str) {
        self.clear_progress();
        match status {
            Status::Success => println!("\x1b[1;32m✓\x1b[0m {}", message),
            Status::Warning => eprintln!("\x1b[1;33m⚠\x1b[0m {}", message),
            Status::Error => eprintln!("\x1b[1;31m✗\x1b[0m {}", message),
        }
    }

    fn log(&self, line: &str) {
        debug!(target: "local_tts::output", "{}", line);

        let Some(file) = &self.log_file else {
            return;
        };
        let mut file = file.lock().unwrap_or_else(|e| e.into_inner());
        let stamp = chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, false);
        if let Err(e) = writeln!(file, "[{}] {}", stamp, line) {
            warn!(error = %e, "Failed to write to output log");
        }
    }

    fn progress(&self, message: &str) {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        let mut spinner = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = spinner.replace(bar) {
            previous.finish_and_clear();
        }
    }

    fn clear_progress(&self) {
        let mut spinner = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(bar) = spinner.take() {
            bar.finish_and_clear();
        }
    }
}
