//! Notification preferences and dispatch.
//!
//! `NotificationManager` owns the user's notification preferences and talks
//! to the platform through the `NotificationPlatform` capability trait:
//! permission prompt, background registration, push subscription, display.
//!
//! No delivery backend. Push messages arrive through the background
//! registration (see the `kirzach-worker` crate).

mod config;
mod manager;
mod options;
mod platform;
mod preferences;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{
    decode_url_base64, NotificationConfig, DEFAULT_APPLICATION_KEY, DEFAULT_ICON,
    DEFAULT_SCRIPT_URL, DEFAULT_TAG,
};
pub use manager::NotificationManager;
pub use options::{
    NotificationAction, NotificationData, NotificationOptions, ACTION_DISMISS, ACTION_VIEW,
};
pub use platform::{
    BackgroundRegistration, NotificationPlatform, PermissionState, PermissionStatus,
    PlatformError, PushSubscription, PushSubscriptionOptions,
};
pub use preferences::{
    NotificationPreferences, PreferencesPatch, ALL_CATEGORIES, FEED_CATEGORIES, PREFERENCES_KEY,
};
