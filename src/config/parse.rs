use super::types::Config;
use crate::config::expand_env_vars;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation failed: {0}")]
    Validation(String),
}

/// Load, expand, and validate a config file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let yaml_string = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open config file '{}': {}", path.display(), e),
        ))
    })?;

    // Expand environment variables in the YAML string before parsing
    let yaml_string = expand_env_vars(&yaml_string);

    let config: Config = serde_yaml::from_str(&yaml_string)?;

    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let endpoint = config.index.endpoint.trim();
    if endpoint.is_empty() {
        return Err(ConfigError::Validation(
            "index.endpoint must not be empty".to_string(),
        ));
    }
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "index.endpoint '{}' must start with http:// or https://",
            endpoint
        )));
    }
    if config.index.prefix.is_empty() {
        return Err(ConfigError::Validation(
            "index.prefix must not be empty".to_string(),
        ));
    }
    Ok(())
}
