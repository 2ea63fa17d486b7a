// Configuration loader
//
// Reads `apiPort` from ~/.local-tts/config.toml, overridden by the
// LOCAL_TTS_API_PORT environment variable and the --port flag.
// Every load goes back to the file so edits apply to the next command.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::Settings;
use crate::errors;

/// Environment variable overriding the configured port
pub const PORT_ENV_VAR: &str = "LOCAL_TTS_API_PORT";

/// Read-only source of settings, consulted once per invocation
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> Result<Settings>;
}

/// Directory holding config.toml and the output log
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".local-tts"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn default_log_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("output.log"))
}

/// Settings layered from file, environment and command line
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
    env_var: Option<String>,
    port_override: Option<String>,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_var: Some(PORT_ENV_VAR.to_string()),
            port_override: None,
        }
    }

    /// Source reading ~/.local-tts/config.toml
    pub fn from_default_path() -> Result<Self> {
        Ok(Self::new(default_config_path()?))
    }

    /// Port from the command line, taking precedence over everything else
    pub fn with_port_override(mut self, port: Option<String>) -> Self {
        self.port_override = port;
        self
    }

    /// Environment variable consulted for the port (None disables it)
    pub fn with_env_var(mut self, name: Option<&str>) -> Self {
        self.env_var = name.map(str::to_string);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!(errors::config_parse_error(
                &self.path.display().to_string(),
                &e.to_string()
            ))
        })
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> Result<Settings> {
        let mut settings = self.read_file()?;

        if let Some(name) = &self.env_var {
            if let Ok(port) = std::env::var(name) {
                if !port.trim().is_empty() {
                    settings.api_port = Some(port);
                }
            }
        }

        if let Some(port) = &self.port_override {
            settings.api_port = Some(port.clone());
        }

        Ok(settings)
    }
}

/// Fixed settings, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct StaticConfigSource {
    settings: Settings,
}

impl StaticConfigSource {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl ConfigSource for StaticConfigSource {
    fn load(&self) -> Result<Settings> {
        Ok(self.settings.clone())
    }
}

/// Parse the configured port string
pub fn parse_port(raw: &str) -> Result<u16> {
    match raw.trim().parse::<u16>() {
        Ok(0) | Err(_) => anyhow::bail!(errors::invalid_port_error(raw)),
        Ok(port) => Ok(port),
    }
}
