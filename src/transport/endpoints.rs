use http::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use url::Url;

use crate::error::WidgetError;

/// Precomputed request URLs for one agent.
#[derive(Debug, Clone)]
pub struct PreparedEndpoints {
    base_url: Url,
    agent_config_url: Url,
    chat_url: Url,
}

impl PreparedEndpoints {
    /// Build `{base}/agents/{agent_id}/config` and `{base}/chat`.
    ///
    /// The agent id is percent-encoded as a single path segment.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidRequest`] when `base_url` does not parse
    /// or cannot carry a path.
    pub fn new(base_url: &str, agent_id: &str) -> Result<Self, WidgetError> {
        let base = Url::parse(base_url.trim()).map_err(|err| {
            WidgetError::InvalidRequest(format!("invalid API base URL '{base_url}': {err}"))
        })?;
        let agent_config_url = join_segments(&base, &["agents", agent_id, "config"])?;
        let chat_url = join_segments(&base, &["chat"])?;
        Ok(Self {
            base_url: base,
            agent_config_url,
            chat_url,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn agent_config_url(&self) -> &Url {
        &self.agent_config_url
    }

    #[must_use]
    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }
}

fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, WidgetError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| {
            WidgetError::InvalidRequest(format!("API base URL '{base}' cannot be a base"))
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Headers sent with every API request.
///
/// `Authorization: Bearer <key>` is added only when a non-empty key is given.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidRequest`] when the key contains characters
/// that cannot appear in a header value.
pub fn build_request_headers(api_key: Option<&str>) -> Result<http::HeaderMap, WidgetError> {
    let mut headers = http::HeaderMap::with_capacity(2);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(key) = api_key.filter(|key| !key.is_empty()) {
        let mut value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|err| {
            WidgetError::InvalidRequest(format!("API key is not a valid header value: {err}"))
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        let endpoints = PreparedEndpoints::new("http://localhost:3001/api", "agent-7").unwrap();
        assert_eq!(
            endpoints.agent_config_url().as_str(),
            "http://localhost:3001/api/agents/agent-7/config"
        );
        assert_eq!(endpoints.chat_url().as_str(), "http://localhost:3001/api/chat");
    }

    #[test]
    fn test_trailing_slash_base_and_encoded_agent_id() {
        let endpoints = PreparedEndpoints::new("https://api.example.com/v1/", "my agent/1").unwrap();
        assert_eq!(
            endpoints.agent_config_url().as_str(),
            "https://api.example.com/v1/agents/my%20agent%2F1/config"
        );
        assert_eq!(endpoints.chat_url().as_str(), "https://api.example.com/v1/chat");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            PreparedEndpoints::new("localhost:3001", "a"),
            Err(WidgetError::InvalidRequest(_))
        ));
        assert!(matches!(
            PreparedEndpoints::new("no scheme here", "a"),
            Err(WidgetError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_headers_with_and_without_key() {
        let headers = build_request_headers(None).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(headers.get(AUTHORIZATION).is_none());

        let headers = build_request_headers(Some("")).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());

        let headers = build_request_headers(Some("sk-123")).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer sk-123");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn test_header_rejects_control_chars() {
        assert!(build_request_headers(Some("bad\nkey")).is_err());
    }
}
