// TTS service client
//
// Probes the local TTS server for reachability, then posts a command to it.
// One connection per probe and one per command; nothing is pooled.

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{redirect, Client};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::types::{error_chain, Endpoint, ProbeError, Request, RequestError};
use crate::reporter::{Reporter, Status};

/// Status and body of a command response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP client for the local TTS server
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
}

impl ServiceClient {
    pub fn new() -> Result<Self, RequestError> {
        let client = Client::builder()
            .pool_max_idle_per_host(0) // Disable connection pooling
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| RequestError::Transport(error_chain(&e)))?;

        Ok(Self { client })
    }

    /// Check that something answers on the endpoint
    ///
    /// Any response counts, whatever its status: this tests reachability,
    /// not health.
    pub async fn probe(&self, endpoint: &Endpoint) -> Result<(), ProbeError> {
        let url = endpoint.url("/");
        debug!(url = %url, "Probing TTS server");

        match self
            .client
            .head(&url)
            .timeout(endpoint.probe_timeout)
            .send()
            .await
        {
            Ok(response) => {
                debug!(url = %url, status = %response.status(), "Probe answered");
                Ok(())
            }
            Err(e) if e.is_timeout() => {
                debug!(url = %url, "Probe timed out");
                Err(ProbeError::Timeout(endpoint.probe_timeout))
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Probe failed");
                Err(ProbeError::ConnectionFailed(error_chain(&e)))
            }
        }
    }

    /// Post a command and require a 2xx status
    pub async fn send(&self, request: &Request, endpoint: &Endpoint) -> Result<(), RequestError> {
        self.post(request, endpoint).await.map(|_| ())
    }

    /// Post a command, returning the response when its status is 2xx
    pub async fn post(
        &self,
        request: &Request,
        endpoint: &Endpoint,
    ) -> Result<ServiceResponse, RequestError> {
        request.validate()?;

        let url = endpoint.url(request.path());
        let body = request.body();
        debug!(url = %url, command = request.name(), "Sending command");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, body.len())
            .body(body)
            .timeout(endpoint.request_timeout)
            .send()
            .await
            .map_err(|e| classify(e, endpoint.request_timeout))?;

        let status = response.status().as_u16();
        // The deadline covers the body too; a stalled body is a timeout
        let body = response
            .text()
            .await
            .map_err(|e| classify(e, endpoint.request_timeout))?;

        if !(200..300).contains(&status) {
            warn!(url = %url, status, "TTS server rejected command");
            return Err(RequestError::HttpStatus(status, body));
        }

        debug!(url = %url, status, "Command accepted");
        Ok(ServiceResponse { status, body })
    }

    /// Run one invocation: probe, then post, reporting the outcome
    ///
    /// Exactly one notification is emitted. Diagnostic lines are logged
    /// for each protocol step.
    pub async fn execute(
        &self,
        request: &Request,
        endpoint: &Endpoint,
        reporter: &dyn Reporter,
    ) -> Result<(), RequestError> {
        // A request that can't be sent never reaches the network
        let outcome = match request.validate() {
            Ok(()) => {
                reporter.progress(request.progress_message());
                let outcome = self.probe_then_post(request, endpoint, reporter).await;
                reporter.clear_progress();
                outcome
            }
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(()) => {
                info!(command = request.name(), port = endpoint.port, "Command succeeded");
                reporter.notify(Status::Success, request.success_message());
            }
            Err(e) => {
                warn!(command = request.name(), port = endpoint.port, error = %e, "Command failed");
                reporter.log(&format!("Error: {}", e));
                reporter.notify(Status::Error, &request.failure_message(e));
            }
        }

        outcome
    }

    async fn probe_then_post(
        &self,
        request: &Request,
        endpoint: &Endpoint,
        reporter: &dyn Reporter,
    ) -> Result<(), RequestError> {
        reporter.log(&format!(
            "Checking TTS server at {} (timeout {}ms)",
            endpoint.base_url(),
            endpoint.probe_timeout.as_millis()
        ));
        if let Err(e) = self.probe(endpoint).await {
            reporter.log(&format!("Server check failed: {}", e));
            // Don't spend the request timeout on a server already known to be down
            return Err(RequestError::Unreachable {
                port: endpoint.port,
            });
        }
        reporter.log("Server is reachable");

        reporter.log(&format!(
            "Sending {} request to {}",
            request.name(),
            endpoint.url(request.path())
        ));
        match self.post(request, endpoint).await {
            Ok(response) => {
                reporter.log(&format!("Response status: {}", response.status));
                if !response.body.is_empty() {
                    reporter.log(&format!("Response body: {}", response.body));
                }
                Ok(())
            }
            Err(RequestError::HttpStatus(status, body)) => {
                reporter.log(&format!("Response status: {}", status));
                if !body.is_empty() {
                    reporter.log(&format!("Response body: {}", body));
                }
                Err(RequestError::HttpStatus(status, body))
            }
            Err(e) => Err(e),
        }
    }
}

fn classify(e: reqwest::Error, timeout: Duration) -> RequestError {
    if e.is_timeout() {
        debug!("  → Error type: TIMEOUT");
        RequestError::Timeout(timeout, error_chain(&e))
    } else {
        if e.is_connect() {
            debug!("  → Error type: CONNECTION");
        } else if e.is_body() {
            debug!("  → Error type: BODY");
        } else {
            debug!("  → Error type: OTHER");
        }
        RequestError::Transport(error_chain(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::RecordingReporter;

    fn closed_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn test_probe_refused_is_connection_failed() {
        let client = ServiceClient::new().unwrap();
        let endpoint = Endpoint::local(closed_port());

        let result = client.probe(&endpoint).await;
        assert!(matches!(result, Err(ProbeError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn test_empty_text_never_hits_network() {
        let client = ServiceClient::new().unwrap();
        let endpoint = Endpoint::local(closed_port());

        let result = client.send(&Request::send_text(""), &endpoint).await;
        assert!(matches!(result, Err(RequestError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_execute_rejects_empty_text_before_connecting() {
        let client = ServiceClient::new().unwrap();
        let endpoint = Endpoint::local(closed_port());
        let reporter = RecordingReporter::new();

        let result = client
            .execute(&Request::send_text(""), &endpoint, &reporter)
            .await;
        assert!(matches!(result, Err(RequestError::InvalidRequest(_))));

        // No server check was attempted
        assert_eq!(
            reporter.lines(),
            vec!["Error: invalid request: text must not be empty".to_string()]
        );
        assert!(reporter.progress_events().is_empty());
        let notifications = reporter.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].0, Status::Error);
    }

    #[tokio::test]
    async fn test_execute_reports_unreachable_once() {
        let client = ServiceClient::new().unwrap();
        let port = closed_port();
        let endpoint = Endpoint::local(port);
        let reporter = RecordingReporter::new();

        let result = client.execute(&Request::Stop, &endpoint, &reporter).await;
        assert_eq!(result, Err(RequestError::Unreachable { port }));

        let notifications = reporter.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].0, Status::Error);
        assert!(notifications[0]
            .1
            .starts_with(&format!("TTS server is not reachable at port {}", port)));
        assert_eq!(
            reporter.progress_events(),
            vec![Some("Stopping TTS playback...".to_string()), None]
        );
    }
}
