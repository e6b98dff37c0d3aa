//! Notification click handling.

use tracing::debug;

/// A notification interaction delivered by the host.
#[derive(Debug, Clone)]
pub struct NotificationClick {
    /// Action button tag; empty when the notification body was clicked.
    pub action: String,
    /// Tag of the notification that was clicked.
    pub tag: String,
}

impl NotificationClick {
    /// Create a click event.
    pub fn new(action: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            tag: tag.into(),
        }
    }
}

/// Action tags forwarded to clients unchanged.
const KNOWN_ACTIONS: &[&str] = &["show-book", "contact-me"];

/// Resolve a click to the action broadcast to clients.
///
/// Unknown tags, and the empty tag left by a main-body click, resolve to
/// `"default"`.
pub fn resolve_action(click: &NotificationClick) -> String {
    if KNOWN_ACTIONS.contains(&click.action.as_str()) {
        return click.action.clone();
    }
    if !click.action.is_empty() {
        debug!(action = %click.action, "unhandled notification action");
    }
    "default".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_actions_pass_through() {
        let click = NotificationClick::new("show-book", "new-post");
        assert_eq!(resolve_action(&click), "show-book");

        let click = NotificationClick::new("contact-me", "new-post");
        assert_eq!(resolve_action(&click), "contact-me");
    }

    #[test]
    fn test_body_click_resolves_to_default() {
        let click = NotificationClick::new("", "new-post");
        assert_eq!(resolve_action(&click), "default");
    }

    #[test]
    fn test_unknown_action_resolves_to_default() {
        let click = NotificationClick::new("dismiss-forever", "new-post");
        assert_eq!(resolve_action(&click), "default");
    }
}
