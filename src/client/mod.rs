// HTTP client for the local TTS server
//
// Provides ServiceClient: reachability probe, then one command per invocation.

mod service_client;
mod types;

pub use service_client::{ServiceClient, ServiceResponse};
pub use types::{
    Endpoint, ProbeError, Request, RequestError, DEFAULT_HOST, DEFAULT_PROBE_TIMEOUT,
    DEFAULT_REQUEST_TIMEOUT,
};
