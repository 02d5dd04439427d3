//! Notification payload options
//!
//! Field names follow the platform notification options (`requireInteraction`,
//! `data.url`, ...) so a payload can be handed to a real notification API
//! without translation.

use serde::{Deserialize, Serialize};

/// Action id that opens the notification target
pub const ACTION_VIEW: &str = "view";
/// Action id that only closes the notification
pub const ACTION_DISMISS: &str = "dismiss";

/// A button on a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

impl NotificationAction {
    pub fn new(action: impl Into<String>, title: impl Into<String>) -> Self {
        Self { action: action.into(), title: title.into() }
    }
}

/// Data carried with a notification to its click handler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Grouping tag; notifications sharing a tag replace each other
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Alert again when replacing a notification with the same tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renotify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<NotificationAction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_interaction: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<NotificationData>,
}

impl NotificationOptions {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self { body: Some(body.into()), ..Default::default() }
    }

    /// Fill every unset field from `defaults`; fields already set win.
    pub fn or_defaults(self, defaults: &NotificationOptions) -> NotificationOptions {
        NotificationOptions {
            body: self.body.or_else(|| defaults.body.clone()),
            icon: self.icon.or_else(|| defaults.icon.clone()),
            badge: self.badge.or_else(|| defaults.badge.clone()),
            tag: self.tag.or_else(|| defaults.tag.clone()),
            renotify: self.renotify.or(defaults.renotify),
            actions: self.actions.or_else(|| defaults.actions.clone()),
            require_interaction: self.require_interaction.or(defaults.require_interaction),
            data: self.data.or_else(|| defaults.data.clone()),
        }
    }

    /// Target url for a click, `/` when none (or an empty one) was attached
    pub fn target_url(&self) -> &str {
        self.data
            .as_ref()
            .and_then(|d| d.url.as_deref())
            .filter(|url| !url.is_empty())
            .unwrap_or("/")
    }
}
