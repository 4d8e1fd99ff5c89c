use super::{ConfigError, WidgetConfig};

/// Validate the widget config, returning an error if any rule is violated.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] when any configuration invariant is violated.
pub fn validate_config(config: &WidgetConfig) -> Result<(), ConfigError> {
    validate_agent_id(config)?;
    validate_base_url(config)?;
    validate_element_id(config)?;
    validate_client(config)?;
    validate_log_level(config)?;
    Ok(())
}

fn validation_err(msg: impl Into<String>) -> ConfigError {
    ConfigError::Validation(msg.into())
}

fn validate_agent_id(config: &WidgetConfig) -> Result<(), ConfigError> {
    if config.agent_id.trim().is_empty() {
        return Err(validation_err("agent_id cannot be empty"));
    }
    Ok(())
}

fn validate_base_url(config: &WidgetConfig) -> Result<(), ConfigError> {
    let Some(base_url) = config.api_base_url.as_deref() else {
        return Ok(());
    };
    if base_url.trim().is_empty() {
        return Ok(());
    }
    let parsed = url::Url::parse(base_url)
        .map_err(|err| validation_err(format!("api_base_url '{base_url}' is invalid: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(validation_err(format!(
            "api_base_url '{base_url}' must use http or https"
        )));
    }
    if parsed.cannot_be_a_base() {
        return Err(validation_err(format!(
            "api_base_url '{base_url}' cannot be used as a base URL"
        )));
    }
    Ok(())
}

fn validate_element_id(config: &WidgetConfig) -> Result<(), ConfigError> {
    if let Some(element_id) = config.element_id.as_deref() {
        if element_id.trim().is_empty() {
            return Err(validation_err("element_id cannot be empty when set"));
        }
    }
    Ok(())
}

fn validate_client(config: &WidgetConfig) -> Result<(), ConfigError> {
    if config.client.connect_timeout_secs == 0 {
        return Err(validation_err(
            "client.connect_timeout_secs must be greater than 0",
        ));
    }
    if config.client.pool_max_idle_per_host == 0 {
        return Err(validation_err(
            "client.pool_max_idle_per_host must be greater than 0",
        ));
    }
    Ok(())
}

const VALID_LOG_LEVELS: &[&str] = &[
    "TRACE", "DEBUG", "INFO", "WARN", "WARNING", "ERROR", "CRITICAL", "DISABLED",
];

fn validate_log_level(config: &WidgetConfig) -> Result<(), ConfigError> {
    let level = config.features.log_level.to_uppercase();
    if !VALID_LOG_LEVELS.contains(&level.as_str()) {
        return Err(validation_err(format!(
            "features.log_level '{}' is not one of {}",
            config.features.log_level,
            VALID_LOG_LEVELS.join(", ")
        )));
    }
    Ok(())
}
