pub mod mount;
pub mod theme;
pub mod transcript;

pub use mount::{MountRegistry, DEFAULT_CONTAINER_ID};
pub use theme::{resolve_theme, ResolvedTheme};
pub use transcript::TranscriptPrinter;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::chat::{ChatController, SendOutcome};
use crate::config::{DisplayOptions, Position, WidgetKind};
use crate::protocol::AgentConfig;

pub const DEFAULT_TITLE: &str = "AI Assistant";
pub const DEFAULT_INPUT_PLACEHOLDER: &str = "Type a message...";

/// Headless model of one mounted chat window.
///
/// Holds the display state a renderer needs and forwards input to the
/// [`ChatController`].
pub struct Widget {
    controller: ChatController,
    options: DisplayOptions,
    open: AtomicBool,
}

impl Widget {
    #[must_use]
    pub fn new(controller: ChatController, options: DisplayOptions) -> Self {
        let open = AtomicBool::new(options.default_open);
        Self {
            controller,
            options,
            open,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &ChatController {
        &self.controller
    }

    #[must_use]
    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Corner the launcher docks to. Only floating widgets have one.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        (self.options.kind == WidgetKind::Floating).then_some(self.options.position)
    }

    /// Start fetching the agent config on the current tokio runtime.
    pub fn start(&self) -> tokio::task::JoinHandle<Option<AgentConfig>> {
        let controller = self.controller.clone();
        tokio::spawn(async move { controller.load_agent_config().await })
    }

    /// Whether the chat window is visible. Only floating widgets can close.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.options.kind != WidgetKind::Floating || self.open.load(Ordering::Relaxed)
    }

    /// Flip a floating widget between open and closed; returns the new state.
    pub fn toggle(&self) -> bool {
        if self.options.kind != WidgetKind::Floating {
            return true;
        }
        !self.open.fetch_xor(true, Ordering::Relaxed)
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.controller
            .agent_config()
            .and_then(|config| config.name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    #[must_use]
    pub fn input_placeholder(&self) -> String {
        self.controller
            .agent_config()
            .and_then(|config| config.user_placeholder)
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_INPUT_PLACEHOLDER.to_string())
    }

    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        self.controller
            .agent_config()
            .map(|config| config.suggestions)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn theme(&self) -> ResolvedTheme {
        resolve_theme(
            &self.options.theme,
            self.controller.agent_config().as_ref(),
        )
    }

    /// Skeleton placeholders while the agent config is still unknown.
    #[must_use]
    pub fn show_skeleton(&self) -> bool {
        self.controller.is_config_loading()
    }

    #[must_use]
    pub fn show_typing_indicator(&self) -> bool {
        self.controller.is_loading()
    }

    /// Mirrors the send button's enabled state.
    #[must_use]
    pub fn can_submit(&self, draft: &str) -> bool {
        !self.controller.is_loading() && !draft.trim().is_empty()
    }

    /// Submit the input box contents.
    pub async fn submit(&self, draft: &str) -> SendOutcome {
        if !self.can_submit(draft) {
            return SendOutcome::Ignored;
        }
        self.controller.send_message(draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, ThemeOverrides};
    use crate::transport::ApiClient;

    fn widget(kind: WidgetKind, default_open: bool) -> Widget {
        let client = ApiClient::with_settings(
            "agent",
            "http://127.0.0.1:9/api",
            None,
            &ClientConfig::default(),
        )
        .unwrap();
        Widget::new(
            ChatController::new(client),
            DisplayOptions {
                kind,
                default_open,
                ..DisplayOptions::default()
            },
        )
    }

    #[test]
    fn test_floating_widget_toggles() {
        let widget = widget(WidgetKind::Floating, false);
        assert!(!widget.is_open());
        assert!(widget.toggle());
        assert!(widget.is_open());
        assert!(!widget.toggle());
        assert!(!widget.is_open());
    }

    #[test]
    fn test_position_applies_to_floating_only() {
        let floating = Widget::new(
            widget(WidgetKind::Floating, false).controller().clone(),
            DisplayOptions {
                position: Position::TopLeft,
                ..DisplayOptions::default()
            },
        );
        assert_eq!(floating.position(), Some(Position::TopLeft));
        assert_eq!(widget(WidgetKind::Embedded, false).position(), None);
    }

    #[test]
    fn test_embedded_and_fullpage_are_always_open() {
        for kind in [WidgetKind::Embedded, WidgetKind::FullPage] {
            let widget = widget(kind, false);
            assert!(widget.is_open());
            assert!(widget.toggle());
            assert!(widget.is_open());
        }
    }

    #[test]
    fn test_defaults_before_config_arrives() {
        let widget = widget(WidgetKind::Floating, true);
        assert!(widget.is_open());
        assert!(widget.show_skeleton());
        assert_eq!(widget.title(), DEFAULT_TITLE);
        assert_eq!(widget.input_placeholder(), DEFAULT_INPUT_PLACEHOLDER);
        assert!(widget.suggestions().is_empty());
        assert_eq!(
            widget.theme(),
            resolve_theme(&ThemeOverrides::default(), None)
        );
    }

    #[tokio::test]
    async fn test_blank_submit_is_ignored_without_network() {
        let widget = widget(WidgetKind::Embedded, false);
        assert!(!widget.can_submit("   "));
        assert_eq!(widget.submit("  \n").await, SendOutcome::Ignored);
        assert!(widget.controller().messages().is_empty());
        assert!(!widget.show_typing_indicator());
    }
}
