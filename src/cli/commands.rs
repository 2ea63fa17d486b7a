// Command handling
//
// Host-side plumbing around ServiceClient: check the selection, re-read the
// configured port, build the endpoint and hand over to the composite flow.

use std::time::Duration;
use tracing::{debug, warn};

use super::selection::{SelectionError, TextSource};
use crate::client::{
    Endpoint, Request, ServiceClient, DEFAULT_PROBE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT,
};
use crate::config::{parse_port, ConfigSource};
use crate::reporter::{Reporter, Status};

/// How an invocation ended, as seen by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    /// Precondition not met; nothing was sent
    Warning,
    Failed,
}

impl CommandOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            CommandOutcome::Success => 0,
            CommandOutcome::Failed => 1,
            CommandOutcome::Warning => 2,
        }
    }
}

/// Per-operation network timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub probe: Duration,
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            probe: DEFAULT_PROBE_TIMEOUT,
            request: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Shared collaborators for every command
pub struct CommandContext<'a> {
    pub client: &'a ServiceClient,
    pub config: &'a dyn ConfigSource,
    pub reporter: &'a dyn Reporter,
    pub timeouts: Timeouts,
}

impl<'a> CommandContext<'a> {
    /// Build the endpoint from a fresh read of the configuration
    fn endpoint(&self) -> Option<Endpoint> {
        let settings = match self.config.load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Failed to load configuration");
                self.reporter.log(&format!("Configuration error: {:#}", e));
                self.reporter
                    .notify(Status::Error, &format!("Failed to read configuration: {:#}", e));
                return None;
            }
        };

        match parse_port(settings.api_port()) {
            Ok(port) => {
                debug!(port, "Using configured TTS port");
                Some(Endpoint::local(port).with_timeouts(self.timeouts.probe, self.timeouts.request))
            }
            Err(e) => {
                self.reporter.log(&format!("Configuration error: {}", e));
                self.reporter.notify(Status::Error, &e.to_string());
                None
            }
        }
    }

    async fn run(&self, request: Request) -> CommandOutcome {
        let Some(endpoint) = self.endpoint() else {
            return CommandOutcome::Failed;
        };

        match self.client.execute(&request, &endpoint, self.reporter).await {
            Ok(()) => CommandOutcome::Success,
            Err(_) => CommandOutcome::Failed,
        }
    }
}

/// Send the current selection to the TTS server
pub async fn send_to_local_tts(ctx: &CommandContext<'_>, source: &dyn TextSource) -> CommandOutcome {
    let text = match source.selected_text() {
        Ok(text) => text,
        Err(e @ SelectionError::Read(_)) => {
            ctx.reporter.log(&format!("Error: {}", e));
            ctx.reporter.notify(Status::Error, &e.to_string());
            return CommandOutcome::Failed;
        }
        Err(e) => {
            ctx.reporter.notify(Status::Warning, &e.to_string());
            return CommandOutcome::Warning;
        }
    };

    ctx.run(Request::send_text(text)).await
}

/// Ask the TTS server to stop playback
pub async fn stop_local_tts(ctx: &CommandContext<'_>) -> CommandOutcome {
    ctx.run(Request::Stop).await
}

/// Report whether anything answers on the configured port
pub async fn check_server(ctx: &CommandContext<'_>) -> CommandOutcome {
    let Some(endpoint) = ctx.endpoint() else {
        return CommandOutcome::Failed;
    };

    ctx.reporter
        .log(&format!("Checking TTS server at {}", endpoint.base_url()));
    match ctx.client.probe(&endpoint).await {
        Ok(()) => {
            ctx.reporter.notify(
                Status::Success,
                &format!("TTS server is reachable at port {}", endpoint.port),
            );
            CommandOutcome::Success
        }
        Err(e) => {
            ctx.reporter.log(&format!("Server check failed: {}", e));
            let unreachable = crate::client::RequestError::Unreachable {
                port: endpoint.port,
            };
            ctx.reporter.notify(Status::Error, &unreachable.to_string());
            CommandOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, StaticConfigSource};
    use crate::reporter::RecordingReporter;

    #[tokio::test]
    async fn test_invalid_port_is_reported_without_network() {
        let client = ServiceClient::new().unwrap();
        let config = StaticConfigSource::new(Settings::with_port("not-a-port"));
        let reporter = RecordingReporter::new();
        let ctx = CommandContext {
            client: &client,
            config: &config,
            reporter: &reporter,
            timeouts: Timeouts::default(),
        };

        assert_eq!(stop_local_tts(&ctx).await, CommandOutcome::Failed);

        let (status, message) = reporter.last().unwrap();
        assert_eq!(status, Status::Error);
        assert!(message.starts_with("Invalid apiPort 'not-a-port'"));
        assert!(reporter.progress_events().is_empty());
    }

    #[tokio::test]
    async fn test_missing_selection_warns() {
        let client = ServiceClient::new().unwrap();
        let config = StaticConfigSource::default();
        let reporter = RecordingReporter::new();
        let ctx = CommandContext {
            client: &client,
            config: &config,
            reporter: &reporter,
            timeouts: Timeouts::default(),
        };

        let outcome = send_to_local_tts(&ctx, &Some(String::new())).await;
        assert_eq!(outcome, CommandOutcome::Warning);
        assert_eq!(
            reporter.notifications(),
            vec![(Status::Warning, "No text selected".to_string())]
        );
        assert!(reporter.lines().is_empty());
    }

    struct UnreadableSelection;

    impl TextSource for UnreadableSelection {
        fn selected_text(&self) -> Result<String, SelectionError> {
            Err(SelectionError::Read("stream did not contain valid data".to_string()))
        }
    }

    #[tokio::test]
    async fn test_unreadable_selection_is_an_error() {
        let client = ServiceClient::new().unwrap();
        let config = StaticConfigSource::default();
        let reporter = RecordingReporter::new();
        let ctx = CommandContext {
            client: &client,
            config: &config,
            reporter: &reporter,
            timeouts: Timeouts::default(),
        };

        let outcome = send_to_local_tts(&ctx, &UnreadableSelection).await;
        assert_eq!(outcome, CommandOutcome::Failed);
        assert_eq!(
            reporter.notifications(),
            vec![(
                Status::Error,
                "Failed to read selection: stream did not contain valid data".to_string()
            )]
        );
        assert_eq!(reporter.lines().len(), 1);
        assert!(reporter.progress_events().is_empty());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CommandOutcome::Success.exit_code(), 0);
        assert_eq!(CommandOutcome::Failed.exit_code(), 1);
        assert_eq!(CommandOutcome::Warning.exit_code(), 2);
    }
}
