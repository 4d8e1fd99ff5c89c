use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::chat::ChatController;
use crate::config::WidgetConfig;
use crate::error::WidgetError;
use crate::transport::ApiClient;

use super::Widget;

/// Container created for widgets that do not name a host element.
pub const DEFAULT_CONTAINER_ID: &str = "vanta-agent-root";

/// Tracks host elements and the widget mounted in each.
#[derive(Default)]
pub struct MountRegistry {
    elements: HashSet<String>,
    mounts: HashMap<String, Arc<Widget>>,
}

impl MountRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an element of the host page that widgets may mount into.
    pub fn register_element(&mut self, element_id: impl Into<String>) {
        self.elements.insert(element_id.into());
    }

    #[must_use]
    pub fn has_element(&self, element_id: &str) -> bool {
        self.elements.contains(element_id)
    }

    #[must_use]
    pub fn mounted(&self, element_id: &str) -> Option<Arc<Widget>> {
        self.mounts.get(element_id).cloned()
    }

    /// Create a widget for `config` and mount it.
    ///
    /// With `config.element_id` set, that element must already be registered.
    /// Without it, the [`DEFAULT_CONTAINER_ID`] container is created on first
    /// use and reused afterwards. Mounting into an occupied element replaces
    /// the previous widget.
    ///
    /// The agent config is fetched by [`Widget::start`], or lazily by the
    /// first [`ChatController::wait_for_config`] call.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::MountTargetMissing`] for an unknown element, or
    /// the [`ApiClient`] construction error.
    pub fn init(&mut self, config: &WidgetConfig) -> Result<Arc<Widget>, WidgetError> {
        let container = match config.element_id.as_deref() {
            Some(element_id) => {
                if !self.has_element(element_id) {
                    tracing::error!(element_id, "mount target not found");
                    return Err(WidgetError::MountTargetMissing(element_id.to_string()));
                }
                element_id.to_string()
            }
            None => {
                if self.elements.insert(DEFAULT_CONTAINER_ID.to_string()) {
                    tracing::debug!(container = DEFAULT_CONTAINER_ID, "created default container");
                }
                DEFAULT_CONTAINER_ID.to_string()
            }
        };

        let client = ApiClient::new(config)?;
        let widget = Arc::new(Widget::new(
            ChatController::new(client),
            config.display.clone(),
        ));

        tracing::info!(
            agent_id = %config.agent_id,
            container = %container,
            kind = %config.display.kind,
            "widget mounted"
        );
        if self.mounts.insert(container, Arc::clone(&widget)).is_some() {
            tracing::debug!("replaced previously mounted widget");
        }
        Ok(widget)
    }
}
