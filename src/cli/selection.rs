// Text selection
//
// The CLI stands in for the editor: the "selection" is the text argument,
// or piped stdin when no argument is given.

use std::io::{self, IsTerminal, Read};
use thiserror::Error;
use tracing::warn;

/// Why there is nothing to send
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("No active text editor found")]
    NoEditor,

    #[error("No text selected")]
    NoSelection,

    #[error("Failed to read selection: {0}")]
    Read(String),
}

/// Provides the text the user selected
pub trait TextSource {
    fn selected_text(&self) -> Result<String, SelectionError>;
}

/// Selection from argv, falling back to piped stdin
#[derive(Debug, Clone)]
pub struct CliTextSource {
    text: Option<String>,
}

impl CliTextSource {
    pub fn new(text: Option<String>) -> Self {
        Self { text }
    }
}

impl TextSource for CliTextSource {
    fn selected_text(&self) -> Result<String, SelectionError> {
        if self.text.is_some() || io::stdin().is_terminal() {
            return resolve_selection(self.text.as_deref(), None);
        }
        let mut stdin = io::stdin().lock();
        resolve_selection(None, Some(&mut stdin))
    }
}

/// Fixed selection, for embedding and tests
impl TextSource for Option<String> {
    fn selected_text(&self) -> Result<String, SelectionError> {
        resolve_selection(self.as_deref(), None)
    }
}

/// Pick the selection from an explicit argument or a piped reader
///
/// With neither there is nowhere to read a selection from.
pub fn resolve_selection(
    arg: Option<&str>,
    piped: Option<&mut dyn Read>,
) -> Result<String, SelectionError> {
    let text = match (arg, piped) {
        (Some(text), _) => text.to_string(),
        (None, Some(reader)) => {
            let mut input = Vec::new();
            if let Err(e) = reader.read_to_end(&mut input) {
                warn!(error = %e, "Failed to read selection from stdin");
                return Err(SelectionError::Read(e.to_string()));
            }
            // Invalid UTF-8 is replaced rather than rejected
            String::from_utf8_lossy(&input).trim().to_string()
        }
        (None, None) => return Err(SelectionError::NoEditor),
    };

    if text.trim().is_empty() {
        return Err(SelectionError::NoSelection);
    }
    Ok(text)
}
