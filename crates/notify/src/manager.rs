//! Notification manager
//!
//! Holds the user's notification preferences and drives the platform:
//! permission prompt, background registration, push subscription, and
//! dispatch. None of these operations return errors to the caller; failures
//! are logged and reported as `false`.

use kirzach_config::{PreferenceStore, Storage};

use crate::config::NotificationConfig;
use crate::options::{NotificationAction, NotificationOptions, ACTION_DISMISS, ACTION_VIEW};
use crate::platform::{
    BackgroundRegistration, NotificationPlatform, PermissionState, PermissionStatus,
    PushSubscription, PushSubscriptionOptions,
};
use crate::preferences::{NotificationPreferences, PreferencesPatch};

const BREAKING_TITLE: &str = "🚨 Срочная новость!";
const BREAKING_BODY: &str =
    "В центре Киржача открывается новый торговый центр. Подробности в приложении.";

pub struct NotificationManager<P: NotificationPlatform, S> {
    platform: P,
    store: PreferenceStore<NotificationPreferences, S>,
    config: NotificationConfig,
    registration: Option<P::Registration>,
    subscription: Option<PushSubscription>,
}

impl<P, S> NotificationManager<P, S>
where
    P: NotificationPlatform,
    S: Storage,
{
    /// Load preferences (merged over defaults). Call `init` afterwards to
    /// set up the background registration.
    pub fn new(platform: P, storage: S) -> Self {
        Self::with_config(platform, storage, NotificationConfig::default())
    }

    pub fn with_config(platform: P, storage: S, config: NotificationConfig) -> Self {
        Self {
            platform,
            store: PreferenceStore::load(storage),
            config,
            registration: None,
            subscription: None,
        }
    }

    /// Register the background script. Returns false if the platform has no
    /// background registration or registering failed.
    pub async fn init(&mut self) -> bool {
        if !self.platform.has_background_registration() {
            log::info!("background registration not available");
            return false;
        }

        match self.platform.register(&self.config.script_url).await {
            Ok(registration) => {
                log::info!("background script registered at {}", self.config.script_url);
                self.registration = Some(registration);
                true
            }
            Err(e) => {
                log::error!("background registration failed: {}", e);
                false
            }
        }
    }

    /// Both notifications and background registration exist on this platform
    pub fn is_supported(&self) -> bool {
        self.platform.has_notifications() && self.platform.has_background_registration()
    }

    pub fn permission_status(&self) -> PermissionStatus {
        if !self.is_supported() {
            return PermissionStatus::Unsupported;
        }
        self.platform.permission().into()
    }

    /// Ask for notification permission.
    ///
    /// Already granted: returns true without prompting. Denied: never
    /// re-prompts. Otherwise prompts once. Preferences are marked enabled
    /// whenever the result is granted.
    pub async fn request_permission(&mut self) -> bool {
        if !self.platform.has_notifications() {
            log::info!("notifications not supported on this platform");
            return false;
        }

        let granted = match self.platform.permission() {
            PermissionState::Granted => true,
            PermissionState::Denied => false,
            PermissionState::Default => {
                self.platform.request_permission().await == PermissionState::Granted
            }
        };

        if granted {
            self.update_preferences(PreferencesPatch { enabled: Some(true), ..Default::default() });
        }
        granted
    }

    /// Create a push subscription through the background registration.
    pub async fn subscribe_to_notifications(&mut self) -> bool {
        let Some(registration) = self.registration.as_ref() else {
            log::error!("cannot subscribe: background script not registered");
            return false;
        };

        let key = match self.config.application_key_bytes() {
            Ok(key) => key,
            Err(e) => {
                log::error!("push subscription failed: invalid application key: {}", e);
                return false;
            }
        };
        let options = PushSubscriptionOptions { user_visible_only: true, application_server_key: key };

        match registration.subscribe_push(&options).await {
            Ok(subscription) => {
                log::info!("push subscription created: {}", subscription.endpoint);
                self.subscription = Some(subscription);
                true
            }
            Err(e) => {
                log::error!("push subscription failed: {}", e);
                false
            }
        }
    }

    /// Show a notification if the user enabled notifications and the
    /// platform permission is granted right now.
    ///
    /// Caller options override the configured icon/badge/tag defaults.
    /// Returns true if the notification was handed to the platform.
    pub async fn show_notification(&self, title: &str, options: NotificationOptions) -> bool {
        if !self.store.current().enabled || self.platform.permission() != PermissionState::Granted {
            return false;
        }

        let options = options.or_defaults(&self.config.default_options());
        let result = match self.registration.as_ref() {
            Some(registration) => registration.show_notification(title, &options).await,
            None => self.platform.show_direct(title, &options),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                log::error!("failed to show notification '{}': {}", title, e);
                false
            }
        }
    }

    pub fn update_preferences(&mut self, patch: PreferencesPatch) {
        if let Err(e) = self.store.update(patch) {
            log::warn!("notification preferences not persisted: {}", e);
        }
    }

    /// Copy of the current preferences
    pub fn get_preferences(&self) -> NotificationPreferences {
        self.store.get()
    }

    /// Add `category` to the followed list, or remove it if already present
    pub fn toggle_category(&mut self, category: &str) {
        let categories = self.store.current().toggled_categories(category);
        self.update_preferences(PreferencesPatch { categories: Some(categories), ..Default::default() });
    }

    /// Fixed breaking-news notification. Not subject to category filtering.
    pub async fn simulate_breaking_news(&self) -> bool {
        let options = NotificationOptions {
            body: Some(BREAKING_BODY.to_string()),
            actions: Some(vec![
                NotificationAction::new(ACTION_VIEW, "Посмотреть"),
                NotificationAction::new(ACTION_DISMISS, "Закрыть"),
            ]),
            require_interaction: Some(true),
            ..Default::default()
        };
        self.show_notification(BREAKING_TITLE, options).await
    }

    /// News notification for `category`; dropped unless the user follows it.
    pub async fn simulate_news_notification(&self, category: &str, title: &str) -> bool {
        if !self.store.current().accepts(category) {
            log::debug!("dropping notification for unfollowed category {}", category);
            return false;
        }

        let options = NotificationOptions {
            body: Some(title.to_string()),
            actions: Some(vec![
                NotificationAction::new(ACTION_VIEW, "Читать"),
                NotificationAction::new(ACTION_DISMISS, "Позже"),
            ]),
            ..Default::default()
        };
        self.show_notification(&format!("📰 {}", category), options).await
    }

    pub fn has_registration(&self) -> bool {
        self.registration.is_some()
    }

    pub fn push_subscription(&self) -> Option<&PushSubscription> {
        self.subscription.as_ref()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }
}
