// User-friendly error messages
//
// Provides helpers to convert technical errors into actionable messages
// that guide users toward solutions.

use std::fmt;

/// Format a config parse error with helpful suggestions
pub fn config_parse_error(path: &str, error: &str) -> String {
    format!(
        "Failed to parse config file {}\n\n\
        Error: {}\n\n\
        Try:\n\
        1. Check config file syntax:\n\
           cat {}\n\n\
        2. The only recognised keys are:\n\
           apiPort = \"7891\"\n\
           logFile = \"/path/to/output.log\"",
        path, error, path
    )
}

/// Format an invalid port error with helpful suggestions
pub fn invalid_port_error(raw: &str) -> String {
    wrap_error_with_suggestion(
        format!("Invalid apiPort '{}'", raw.trim()),
        "Use a port number between 1 and 65535, e.g. apiPort = \"7891\"",
    )
}

/// Wrap a generic error with suggestions
pub fn wrap_error_with_suggestion(error: impl fmt::Display, suggestion: &str) -> String {
    format!("{}\n\nSuggestion: {}", error, suggestion)
}
