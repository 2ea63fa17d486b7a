// Configuration module
// Public interface for configuration loading

mod loader;
mod settings;

pub use loader::{
    config_dir, default_config_path, default_log_path, parse_port, ConfigSource,
    FileConfigSource, StaticConfigSource, PORT_ENV_VAR,
};
pub use settings::{Settings, DEFAULT_API_PORT};
