use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tokio::sync::watch;

use super::log::{ConversationLog, LogEvent};
use crate::protocol::{AgentConfig, Message};
use crate::session::SessionId;
use crate::transport::ApiClient;

/// Assistant message shown when an exchange fails.
pub const ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Result of [`ChatController::send_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or another exchange was still in flight. Nothing changed.
    Ignored,
    /// The reply streamed to completion.
    Completed,
    /// The request failed; the error message was appended.
    Failed,
}

#[derive(Debug, Clone)]
enum ConfigState {
    NotRequested,
    Loading,
    Ready(Option<AgentConfig>),
}

#[derive(Debug)]
struct ChatState {
    log: ConversationLog,
    loading: bool,
    config: ConfigState,
}

struct Inner {
    client: ApiClient,
    session_id: SessionId,
    state: Mutex<ChatState>,
    revision: watch::Sender<u64>,
}

/// Owns the conversation and loading flags for one widget.
///
/// Cloning is cheap and every clone drives the same conversation. The state
/// lock is never held across an await.
#[derive(Clone)]
pub struct ChatController {
    inner: Arc<Inner>,
}

impl ChatController {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let session_id = client.create_session();
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                client,
                session_id,
                state: Mutex::new(ChatState {
                    log: ConversationLog::new(),
                    loading: false,
                    config: ConfigState::NotRequested,
                }),
                revision,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ChatState> {
        self.inner.state.lock()
    }

    fn notify(&self) {
        self.inner.revision.send_modify(|revision| *revision += 1);
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.inner.session_id
    }

    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.state().log.messages()
    }

    /// Every change recorded so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<LogEvent> {
        self.state().log.events().to_vec()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// `None` both while loading and when no config is available; use
    /// [`ChatController::is_config_loading`] to tell them apart.
    #[must_use]
    pub fn agent_config(&self) -> Option<AgentConfig> {
        match &self.state().config {
            ConfigState::Ready(config) => config.clone(),
            ConfigState::NotRequested | ConfigState::Loading => None,
        }
    }

    #[must_use]
    pub fn is_config_loading(&self) -> bool {
        !matches!(self.state().config, ConfigState::Ready(_))
    }

    /// Revision counter bumped on every observable change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Wait until the agent config has been resolved either way, starting
    /// the fetch if nothing has requested it yet.
    pub async fn wait_for_config(&self) {
        self.load_agent_config().await;
    }

    async fn wait_while_config_loading(&self) {
        let mut changes = self.subscribe();
        loop {
            let loading = matches!(self.state().config, ConfigState::Loading);
            if !loading || changes.changed().await.is_err() {
                return;
            }
        }
    }

    /// Fetch the agent config once and cache it for the controller's lifetime.
    ///
    /// A configured welcome message is seeded as the first assistant message
    /// if the conversation is still empty. Fetch failures leave the config
    /// absent and never fail the widget. Callers arriving while a fetch is in
    /// flight wait for it instead of issuing their own.
    pub async fn load_agent_config(&self) -> Option<AgentConfig> {
        let already_loading = {
            let mut state = self.state();
            if let ConfigState::Ready(config) = &state.config {
                return config.clone();
            }
            let loading = matches!(state.config, ConfigState::Loading);
            state.config = ConfigState::Loading;
            loading
        };
        if already_loading {
            self.wait_while_config_loading().await;
            return self.agent_config();
        }

        let config = self.inner.client.get_agent_config().await;

        {
            let mut state = self.state();
            if let Some(welcome) = config.as_ref().and_then(AgentConfig::welcome) {
                if state.log.is_empty() {
                    state.log.append(Message::assistant(welcome));
                } else {
                    tracing::debug!("conversation already started; skipping welcome message");
                }
            }
            state.config = ConfigState::Ready(config.clone());
        }
        self.notify();
        config
    }

    /// Send `content` and stream the reply into the conversation.
    ///
    /// Blank input and calls made while an exchange is in flight are ignored
    /// without touching the conversation or the network. The loading flag is
    /// cleared on every exit path, including when this future is dropped.
    pub async fn send_message(&self, content: &str) -> SendOutcome {
        if content.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        let placeholder = {
            let mut state = self.state();
            if state.loading {
                tracing::debug!("exchange already in flight; ignoring send");
                return SendOutcome::Ignored;
            }
            state.log.append(Message::user(content));
            state.loading = true;
            state.log.append(Message::assistant(""))
        };
        let _loading = LoadingGuard { controller: self };
        self.notify();

        let result = self
            .inner
            .client
            .send_message(&self.inner.session_id, content, |delta| {
                self.state().log.append_delta(placeholder, delta);
                self.notify();
            })
            .await;

        match result {
            Ok(_) => SendOutcome::Completed,
            Err(err) => {
                tracing::error!(
                    session_id = %self.inner.session_id,
                    "Failed to send message: {err}"
                );
                {
                    let mut state = self.state();
                    state.log.retract_if_empty(placeholder);
                    state.log.append(Message::assistant(ERROR_MESSAGE));
                }
                self.notify();
                SendOutcome::Failed
            }
        }
    }
}

struct LoadingGuard<'a> {
    controller: &'a ChatController,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.controller.state().loading = false;
        self.controller.notify();
    }
}
