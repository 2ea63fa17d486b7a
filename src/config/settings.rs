// Configuration structs

use serde::Deserialize;
use std::path::PathBuf;

/// Port used when `apiPort` is unset or empty
pub const DEFAULT_API_PORT: &str = "7891";

/// Contents of `~/.local-tts/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Port of the local TTS server, kept as a string like the editor setting
    #[serde(default)]
    pub api_port: Option<String>,

    /// Where diagnostic lines are appended
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn with_port(port: impl Into<String>) -> Self {
        Self {
            api_port: Some(port.into()),
            log_file: None,
        }
    }

    /// Effective port string, falling back to the default when unset or blank
    pub fn api_port(&self) -> &str {
        self.api_port
            .as_deref()
            .map(str::trim)
            .filter(|port| !port.is_empty())
            .unwrap_or(DEFAULT_API_PORT)
    }
}
