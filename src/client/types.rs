// Client types
//
// Endpoint addressing, the two commands the TTS server understands,
// and the error taxonomy for probing and sending.

use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// The TTS server always listens on loopback
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Reachability probe timeout
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Command request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Address and timeouts for a single invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Server host (always loopback in practice)
    pub host: String,
    /// Server port, taken from `apiPort`
    pub port: u16,
    /// Timeout for `HEAD /`
    pub probe_timeout: Duration,
    /// Timeout for `POST /tts` and `POST /stop`
    pub request_timeout: Duration,
}

impl Endpoint {
    /// Loopback endpoint with the default timeouts
    pub fn local(port: u16) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, probe_timeout: Duration, request_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self.request_timeout = request_timeout;
        self
    }

    /// Base URL, e.g. `http://127.0.0.1:7891`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}

/// A command for the TTS server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Speak the given text
    SendText { text: String },
    /// Stop current playback
    Stop,
}

impl Request {
    pub fn send_text(text: impl Into<String>) -> Self {
        Request::SendText { text: text.into() }
    }

    /// Path the command is posted to
    pub fn path(&self) -> &'static str {
        match self {
            Request::SendText { .. } => "/tts",
            Request::Stop => "/stop",
        }
    }

    /// Short name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Request::SendText { .. } => "send-text",
            Request::Stop => "stop",
        }
    }

    /// JSON body: `{"text": ...}` for send, `{}` for stop
    pub fn body(&self) -> String {
        match self {
            Request::SendText { text } => json!({ "text": text }).to_string(),
            Request::Stop => json!({}).to_string(),
        }
    }

    /// Checks the request can be sent as-is
    pub fn validate(&self) -> Result<(), RequestError> {
        match self {
            Request::SendText { text } if text.is_empty() => {
                Err(RequestError::InvalidRequest("text must not be empty"))
            }
            _ => Ok(()),
        }
    }

    /// Status-bar text while the command is in flight
    pub fn progress_message(&self) -> &'static str {
        match self {
            Request::SendText { .. } => "Sending text to TTS...",
            Request::Stop => "Stopping TTS playback...",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Request::SendText { .. } => "Text sent to TTS successfully",
            Request::Stop => "TTS playback stopped",
        }
    }

    /// User-facing message for a failed invocation
    pub fn failure_message(&self, error: &RequestError) -> String {
        // The unreachable message already names the port and what to do
        if let RequestError::Unreachable { .. } = error {
            return error.to_string();
        }
        match self {
            Request::SendText { .. } => format!("Failed to send to TTS: {}", error),
            Request::Stop => format!("Failed to stop TTS: {}", error),
        }
    }
}

/// Why the reachability probe failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("no response within {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// Why a command did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The probe failed, so the command was never posted
    #[error("TTS server is not reachable at port {port}. Please make sure the server is running.")]
    Unreachable { port: u16 },

    #[error("HTTP Error: {}{}", .0, body_suffix(.1))]
    HttpStatus(u16, String),

    /// Deadline and the underlying error text
    #[error("request timed out after {}ms: {}", .0.as_millis(), .1)]
    Timeout(Duration, String),

    #[error("{0}")]
    Transport(String),

    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),
}

fn body_suffix(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(" {}", body)
    }
}

/// Flatten an error and its sources into one line
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_defaults() {
        let endpoint = Endpoint::local(7891);
        assert_eq!(endpoint.host, "127.0.0.1");
        assert_eq!(endpoint.probe_timeout, Duration::from_secs(2));
        assert_eq!(endpoint.request_timeout, Duration::from_secs(5));
        assert_eq!(endpoint.url("/tts"), "http://127.0.0.1:7891/tts");
    }

    #[test]
    fn test_request_wire_format() {
        let send = Request::send_text("hello");
        assert_eq!(send.path(), "/tts");
        assert_eq!(send.body(), r#"{"text":"hello"}"#);

        assert_eq!(Request::Stop.path(), "/stop");
        assert_eq!(Request::Stop.body(), "{}");
    }

    #[test]
    fn test_body_escapes_text() {
        let send = Request::send_text("say \"hi\"\nthen stop");
        let parsed: serde_json::Value = serde_json::from_str(&send.body()).unwrap();
        assert_eq!(parsed["text"], "say \"hi\"\nthen stop");
    }

    #[test]
    fn test_empty_text_is_rejected() {
        assert!(Request::send_text("").validate().is_err());
        assert!(Request::send_text(" ").validate().is_ok());
        assert!(Request::Stop.validate().is_ok());
    }

    #[test]
    fn test_unreachable_message_names_port() {
        let err = RequestError::Unreachable { port: 7891 };
        let msg = Request::send_text("x").failure_message(&err);
        assert!(msg.starts_with("TTS server is not reachable at port 7891"));
    }

    #[test]
    fn test_http_status_message_includes_body() {
        let err = RequestError::HttpStatus(500, r#"{"error":"not playing"}"#.to_string());
        let msg = Request::Stop.failure_message(&err);
        assert_eq!(msg, r#"Failed to stop TTS: HTTP Error: 500 {"error":"not playing"}"#);

        let empty = RequestError::HttpStatus(404, String::new());
        assert_eq!(empty.to_string(), "HTTP Error: 404");
    }

    #[test]
    fn test_timeout_message_keeps_cause() {
        let err = RequestError::Timeout(
            Duration::from_millis(5000),
            "operation timed out".to_string(),
        );
        assert_eq!(
            Request::send_text("x").failure_message(&err),
            "Failed to send to TTS: request timed out after 5000ms: operation timed out"
        );
    }
}
