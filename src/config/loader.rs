//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides the listen port.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    InvalidPort(String),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::InvalidPort(raw) => write!(f, "Invalid port: '{}'", raw),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse TOML configuration text without touching the filesystem.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Read the port override from the environment, if set.
pub fn env_port() -> Result<Option<u16>, ConfigError> {
    match std::env::var(PORT_ENV) {
        Ok(raw) => parse_port(&raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))
}

/// Resolve the final configuration.
///
/// Precedence for the listen port: `cli_port`, then `env_port`, then the file
/// (or built-in default). The result is validated before it is returned.
pub fn resolve_config(
    path: Option<&Path>,
    cli_port: Option<u16>,
    env_port: Option<u16>,
) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    if let Some(port) = cli_port.or(env_port) {
        config
            .listener
            .set_port(port)
            .map_err(|_| ConfigError::InvalidPort(config.listener.bind_address.clone()))?;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
