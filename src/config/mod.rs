pub mod validation;

use serde::{Deserialize, Serialize};
use std::fmt;

use self::validation::validate_config;

/// Base URL used when neither the config nor the environment provides one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";

/// Environment variables consulted for the API base URL, in priority order.
pub const API_URL_ENV_VARS: &[&str] = &[
    "NEXT_PUBLIC_VANTA_API_URL",
    "VANTA_API_URL",
    "VITE_VANTA_API_URL",
];

/// Environment variables consulted for the API key, in priority order.
pub const API_KEY_ENV_VARS: &[&str] = &[
    "NEXT_PUBLIC_VANTA_API_KEY",
    "VANTA_API_KEY",
    "VITE_VANTA_API_KEY",
];

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// How the widget sits on the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    #[default]
    Floating,
    Embedded,
    #[serde(alias = "full-page")]
    FullPage,
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetKind::Floating => write!(f, "floating"),
            WidgetKind::Embedded => write!(f, "embedded"),
            WidgetKind::FullPage => write!(f, "fullpage"),
        }
    }
}

/// Screen corner a floating widget is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

/// Colour overrides supplied by the embedding page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeOverrides {
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
}

/// Display options for a mounted widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    #[serde(default)]
    pub kind: WidgetKind,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub default_open: bool,
    #[serde(default)]
    pub theme: ThemeOverrides,
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
}

fn default_connect_timeout_secs() -> u64 {
    10
}
fn default_pool_max_idle_per_host() -> usize {
    4
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
        }
    }
}

/// Feature flags and settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturesConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Top-level widget configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub agent_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Host element to mount into; `None` uses the shared default container.
    #[serde(default)]
    pub element_id: Option<String>,
    #[serde(default)]
    pub display: DisplayOptions,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
}

impl WidgetConfig {
    /// Minimal configuration for `agent_id` with every other field defaulted.
    #[must_use]
    pub fn for_agent(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            api_key: None,
            api_base_url: None,
            element_id: None,
            display: DisplayOptions::default(),
            client: ClientConfig::default(),
            features: FeaturesConfig::default(),
        }
    }

    /// Resolve the API base URL from the process environment.
    #[must_use]
    pub fn resolved_base_url(&self) -> String {
        resolve_base_url(self.api_base_url.as_deref(), env_lookup)
    }

    /// Resolve the API key from the process environment.
    #[must_use]
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref(), env_lookup)
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn first_from_env(names: &[&str], lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    names
        .iter()
        .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()))
}

/// Base URL precedence: explicit value > environment > [`DEFAULT_API_BASE_URL`].
///
/// Empty strings count as absent at every level.
#[must_use]
pub fn resolve_base_url(explicit: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> String {
    if let Some(url) = non_empty(explicit) {
        return url.to_string();
    }
    first_from_env(API_URL_ENV_VARS, lookup).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

/// API key precedence: explicit value > environment > none.
#[must_use]
pub fn resolve_api_key(
    explicit: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    if let Some(key) = non_empty(explicit) {
        return Some(key.to_string());
    }
    first_from_env(API_KEY_ENV_VARS, lookup)
}

/// Parse configuration from YAML text and validate it.
///
/// # Errors
///
/// Returns [`ConfigError::Yaml`] when parsing fails, or
/// [`ConfigError::Validation`] when semantic validation fails.
pub fn parse_config(contents: &str) -> Result<WidgetConfig, ConfigError> {
    let config: WidgetConfig = serde_yaml::from_str(contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a YAML file and validate it.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when reading the file fails, [`ConfigError::Yaml`]
/// when parsing fails, or [`ConfigError::Validation`] when semantic validation fails.
pub fn load_config(path: &str) -> Result<WidgetConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}
