use std::time::Duration;

use crate::config::{ClientConfig, WidgetConfig};
use crate::error::WidgetError;
use crate::protocol::{AgentConfig, ChatRequest};
use crate::session::SessionId;
use crate::stream::{read_content_stream, StreamSummary};

use super::endpoints::{build_request_headers, PreparedEndpoints};

fn build_reqwest_client(config: &ClientConfig) -> Result<reqwest::Client, WidgetError> {
    // No overall request timeout: a chat stream runs until the server closes it.
    reqwest::Client::builder()
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .tcp_nodelay(true)
        .build()
        .map_err(|err| WidgetError::Transport(format!("Failed to build HTTP client: {err}")))
}

/// HTTP client for one agent's config and chat endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    agent_id: String,
    endpoints: PreparedEndpoints,
    headers: http::HeaderMap,
}

impl ApiClient {
    /// Create a client from widget config, resolving the base URL and API key
    /// against the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidRequest`] for an unusable base URL or key,
    /// or [`WidgetError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: &WidgetConfig) -> Result<Self, WidgetError> {
        Self::with_settings(
            &config.agent_id,
            &config.resolved_base_url(),
            config.resolved_api_key().as_deref(),
            &config.client,
        )
    }

    /// Create a client from already-resolved settings.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::new`].
    pub fn with_settings(
        agent_id: &str,
        base_url: &str,
        api_key: Option<&str>,
        client: &ClientConfig,
    ) -> Result<Self, WidgetError> {
        Ok(Self {
            client: build_reqwest_client(client)?,
            agent_id: agent_id.to_string(),
            endpoints: PreparedEndpoints::new(base_url, agent_id)?,
            headers: build_request_headers(api_key)?,
        })
    }

    #[must_use]
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    #[must_use]
    pub fn endpoints(&self) -> &PreparedEndpoints {
        &self.endpoints
    }

    /// A fresh session id; the server treats any unseen id as a new session.
    #[must_use]
    pub fn create_session(&self) -> SessionId {
        SessionId::generate()
    }

    /// Fetch the agent's display configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Transport`] on network failure,
    /// [`WidgetError::Upstream`] on a non-success status, and
    /// [`WidgetError::Decode`] when the body is not an agent config object.
    pub async fn fetch_agent_config(&self) -> Result<AgentConfig, WidgetError> {
        let response = self
            .client
            .get(self.endpoints.agent_config_url().clone())
            .headers(self.headers.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::from_status(status));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|err| WidgetError::Decode(format!("agent config body: {err}")))
    }

    /// Fetch the agent config, treating every failure as "no config".
    pub async fn get_agent_config(&self) -> Option<AgentConfig> {
        match self.fetch_agent_config().await {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(
                    agent_id = %self.agent_id,
                    "Failed to fetch agent config, using defaults: {err}"
                );
                None
            }
        }
    }

    /// Post `message` and stream the assistant reply, calling `on_delta` for
    /// each content fragment in arrival order.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Upstream`] for a non-success status and
    /// [`WidgetError::Transport`] when the connection fails before or during
    /// the stream. Malformed stream lines are skipped, not reported.
    pub async fn send_message<F>(
        &self,
        session_id: &SessionId,
        message: &str,
        on_delta: F,
    ) -> Result<StreamSummary, WidgetError>
    where
        F: FnMut(&str),
    {
        let body = serde_json::to_vec(&ChatRequest {
            agent_id: &self.agent_id,
            session_id: session_id.as_str(),
            message,
        })
        .map_err(|err| WidgetError::InvalidRequest(format!("chat request body: {err}")))?;

        let response = self
            .client
            .post(self.endpoints.chat_url().clone())
            .headers(self.headers.clone())
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::from_status(status));
        }

        let summary = read_content_stream(response.bytes_stream(), on_delta).await?;
        tracing::debug!(
            session_id = %session_id,
            content_chunks = summary.content_chunks,
            malformed_lines = summary.malformed_lines,
            saw_done = summary.saw_done,
            "chat stream finished"
        );
        Ok(summary)
    }
}
