use std::fs;
use tracing::{debug, error, info};

use crate::types::client_config::{AppConfig, ConfigError};

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    info!("Loading client configuration from: {}", path);

    let contents = fs::read_to_string(path)?;

    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: AppConfig = toml::from_str(&contents)?;
    debug!("Config: {:?}", config);

    validate_config(&config)?;

    info!("Config loaded and validated");

    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.base_url.is_empty() {
        return Err(ConfigError::InvalidConfig(
            "base_url cannot be empty".into(),
        ));
    }

    if !config.server.base_url.starts_with("http://")
        && !config.server.base_url.starts_with("https://")
    {
        return Err(ConfigError::InvalidConfig(
            "base_url must start with http:// or https://".into(),
        ));
    }

    if !config.server.stream_path.starts_with('/') {
        return Err(ConfigError::InvalidConfig(
            "stream_path must start with '/'".into(),
        ));
    }

    if config.auth.token_path.is_empty() {
        return Err(ConfigError::InvalidConfig(
            "token_path cannot be empty".into(),
        ));
    }

    if config.stream.max_reconnect_attempts == 0 {
        return Err(ConfigError::InvalidConfig(
            "max_reconnect_attempts must be greater than 0".into(),
        ));
    }

    if config.stream.reconnect_base_delay_ms == 0 {
        return Err(ConfigError::InvalidConfig(
            "reconnect_base_delay_ms must be greater than 0".into(),
        ));
    }

    Ok(())
}
