//! Platform notification capabilities
//!
//! The manager never talks to a browser or OS directly. A host implements
//! `NotificationPlatform` (and its `BackgroundRegistration`) over whatever it
//! has: a browser binding, a desktop notifier, or a test double.

#![allow(async_fn_in_trait)]

use serde::{Deserialize, Serialize};

use crate::options::NotificationOptions;

/// Platform-owned notification permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// Not asked yet (or the prompt was dismissed)
    #[default]
    Default,
    Granted,
    /// No programmatic re-prompt for the rest of the session
    Denied,
}

/// Coarse notification lifecycle as seen by the user interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// Platform lacks notifications or background registration. Permanent.
    Unsupported,
    Default,
    Granted,
    Denied,
}

impl From<PermissionState> for PermissionStatus {
    fn from(state: PermissionState) -> Self {
        match state {
            PermissionState::Default => PermissionStatus::Default,
            PermissionState::Granted => PermissionStatus::Granted,
            PermissionState::Denied => PermissionStatus::Denied,
        }
    }
}

impl PermissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionStatus::Unsupported => "unsupported",
            PermissionStatus::Default => "default",
            PermissionStatus::Granted => "granted",
            PermissionStatus::Denied => "denied",
        }
    }
}

/// Error reported by a platform call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Capability missing on this platform
    Unsupported,
    /// No background registration available
    NotRegistered,
    /// Permission denied by the user or platform
    PermissionDenied,
    /// Invalid application server key
    InvalidKey(String),
    /// Any other platform failure
    Failed(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformError::Unsupported => write!(f, "Not supported on this platform"),
            PlatformError::NotRegistered => write!(f, "Background registration missing"),
            PlatformError::PermissionDenied => write!(f, "Notification permission denied"),
            PlatformError::InvalidKey(msg) => write!(f, "Invalid application server key: {}", msg),
            PlatformError::Failed(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PlatformError {}

/// Options for a push subscription request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushSubscriptionOptions {
    /// Every push must surface a user-visible notification
    pub user_visible_only: bool,
    /// Decoded application server key
    pub application_server_key: Vec<u8>,
}

/// Platform-issued push subscription handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub endpoint: String,
}

/// A long-lived background registration (service worker or equivalent)
pub trait BackgroundRegistration {
    async fn subscribe_push(
        &self,
        options: &PushSubscriptionOptions,
    ) -> Result<PushSubscription, PlatformError>;

    /// Display through the registration, so it shows even when no page has focus
    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), PlatformError>;
}

pub trait NotificationPlatform {
    type Registration: BackgroundRegistration;

    /// Notification capability probe
    fn has_notifications(&self) -> bool;

    /// Background registration capability probe
    fn has_background_registration(&self) -> bool;

    /// Current permission, read fresh on every call
    fn permission(&self) -> PermissionState;

    /// Show the permission prompt once and report the outcome
    async fn request_permission(&self) -> PermissionState;

    /// Register the background script at `script_url`
    async fn register(&self, script_url: &str) -> Result<Self::Registration, PlatformError>;

    /// Show a notification directly from the page
    fn show_direct(&self, title: &str, options: &NotificationOptions) -> Result<(), PlatformError>;
}
