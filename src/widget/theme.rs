use crate::config::ThemeOverrides;
use crate::protocol::AgentConfig;

pub const DEFAULT_PRIMARY_COLOR: &str = "#10b981";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";
pub const DEFAULT_TEXT_COLOR: &str = "#1f2937";
pub const DEFAULT_FONT_FAMILY: &str = "system-ui, -apple-system, sans-serif";

/// Colours and font the widget renders with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTheme {
    pub primary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
}

/// Page overrides win over the agent's served config, which wins over the
/// built-in defaults. Blank values are skipped.
#[must_use]
pub fn resolve_theme(overrides: &ThemeOverrides, agent: Option<&AgentConfig>) -> ResolvedTheme {
    let pick = |page: &Option<String>, served: Option<&Option<String>>, default: &str| {
        [page.as_deref(), served.and_then(Option::as_deref)]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
            .unwrap_or(default)
            .to_string()
    };

    ResolvedTheme {
        primary_color: pick(
            &overrides.primary_color,
            agent.map(|a| &a.primary_color),
            DEFAULT_PRIMARY_COLOR,
        ),
        background_color: pick(
            &overrides.background_color,
            agent.map(|a| &a.background_color),
            DEFAULT_BACKGROUND_COLOR,
        ),
        text_color: pick(
            &overrides.text_color,
            agent.map(|a| &a.text_color),
            DEFAULT_TEXT_COLOR,
        ),
        font_family: pick(&None, agent.map(|a| &a.font_family), DEFAULT_FONT_FAMILY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_overrides_or_config() {
        let theme = resolve_theme(&ThemeOverrides::default(), None);
        assert_eq!(theme.primary_color, DEFAULT_PRIMARY_COLOR);
        assert_eq!(theme.background_color, DEFAULT_BACKGROUND_COLOR);
        assert_eq!(theme.text_color, DEFAULT_TEXT_COLOR);
        assert_eq!(theme.font_family, DEFAULT_FONT_FAMILY);
    }

    #[test]
    fn test_override_beats_agent_config_beats_default() {
        let overrides = ThemeOverrides {
            primary_color: Some("#111111".to_string()),
            background_color: Some(String::new()),
            text_color: None,
        };
        let agent = AgentConfig {
            primary_color: Some("#222222".to_string()),
            background_color: Some("#333333".to_string()),
            font_family: Some("Inter".to_string()),
            ..AgentConfig::default()
        };
        let theme = resolve_theme(&overrides, Some(&agent));
        assert_eq!(theme.primary_color, "#111111");
        assert_eq!(theme.background_color, "#333333");
        assert_eq!(theme.text_color, DEFAULT_TEXT_COLOR);
        assert_eq!(theme.font_family, "Inter");
    }
}
