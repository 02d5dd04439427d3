//! Terminal notification platform.
//!
//! Notifications are printed to stdout. The permission answer and the push
//! subscription are kept in storage next to the preferences, so they
//! survive between invocations the way a browser remembers them per site.

use std::io::{self, BufRead, Write};

use kirzach_config::{FileStorage, Storage};
use kirzach_notify::{
    BackgroundRegistration, NotificationOptions, NotificationPlatform, PermissionState,
    PlatformError, PushSubscription, PushSubscriptionOptions,
};
use kirzach_worker::{NotificationSurface, WindowClient, WorkerError};

const PERMISSION_KEY: &str = "notification-permission";
const SUBSCRIPTION_KEY: &str = "push-subscription";

#[derive(Debug, Clone)]
pub struct TerminalPlatform {
    storage: FileStorage,
}

impl TerminalPlatform {
    pub fn new(storage: FileStorage) -> Self {
        Self { storage }
    }

    fn store_permission(&self, state: PermissionState) {
        let mut storage = self.storage.clone();
        let value = serde_json::to_string(&state).unwrap_or_default();
        if let Err(e) = storage.set_item(PERMISSION_KEY, &value) {
            log::warn!("permission not persisted: {}", e);
        }
    }
}

impl NotificationPlatform for TerminalPlatform {
    type Registration = TerminalRegistration;

    fn has_notifications(&self) -> bool {
        true
    }

    fn has_background_registration(&self) -> bool {
        true
    }

    fn permission(&self) -> PermissionState {
        self.storage
            .get_item(PERMISSION_KEY)
            .ok()
            .flatten()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    async fn request_permission(&self) -> PermissionState {
        let answer = smol::unblock(|| {
            eprint!("Allow KirzachLive to show notifications? [y/n] ");
            let _ = io::stderr().flush();
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).map(|_| line)
        })
        .await;

        let state = match answer.as_deref().map(|s| s.trim().to_lowercase()) {
            Ok(a) if a == "y" || a == "yes" => PermissionState::Granted,
            Ok(a) if a == "n" || a == "no" => PermissionState::Denied,
            // Dismissed prompt: still undecided
            Ok(_) => PermissionState::Default,
            Err(e) => {
                log::warn!("could not read permission answer: {}", e);
                PermissionState::Default
            }
        };

        if state != PermissionState::Default {
            self.store_permission(state);
        }
        state
    }

    async fn register(&self, script_url: &str) -> Result<TerminalRegistration, PlatformError> {
        log::debug!("terminal registration for {}", script_url);
        Ok(TerminalRegistration { storage: self.storage.clone() })
    }

    fn show_direct(&self, title: &str, options: &NotificationOptions) -> Result<(), PlatformError> {
        print_notification(title, options).map_err(|e| PlatformError::Failed(e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct TerminalRegistration {
    storage: FileStorage,
}

impl BackgroundRegistration for TerminalRegistration {
    async fn subscribe_push(
        &self,
        options: &PushSubscriptionOptions,
    ) -> Result<PushSubscription, PlatformError> {
        let key_id: String = options
            .application_server_key
            .iter()
            .take(8)
            .map(|b| format!("{:02x}", b))
            .collect();
        let subscription = PushSubscription { endpoint: format!("local://kirzach-live/push/{}", key_id) };

        let json = serde_json::to_string(&subscription)
            .map_err(|e| PlatformError::Failed(e.to_string()))?;
        let mut storage = self.storage.clone();
        storage
            .set_item(SUBSCRIPTION_KEY, &json)
            .map_err(|e| PlatformError::Failed(e.to_string()))?;

        Ok(subscription)
    }

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), PlatformError> {
        print_notification(title, options).map_err(|e| PlatformError::Failed(e.to_string()))
    }
}

/// Stored push subscription, if `notify subscribe` has succeeded before
pub fn stored_subscription(storage: &FileStorage) -> Option<PushSubscription> {
    storage
        .get_item(SUBSCRIPTION_KEY)
        .ok()
        .flatten()
        .and_then(|s| serde_json::from_str(&s).ok())
}

fn print_notification(title: &str, options: &NotificationOptions) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "[{}] {}", options.tag.as_deref().unwrap_or("notification"), title)?;
    if let Some(body) = &options.body {
        writeln!(out, "    {}", body)?;
    }
    if let Some(actions) = &options.actions {
        let buttons: Vec<String> = actions
            .iter()
            .map(|a| format!("[{}: {}]", a.action, a.title))
            .collect();
        writeln!(out, "    {}", buttons.join(" "))?;
    }
    if options.require_interaction == Some(true) {
        writeln!(out, "    (stays until dismissed)")?;
    }
    Ok(())
}

/// Worker-side display surface
pub struct TerminalSurface;

impl NotificationSurface for TerminalSurface {
    fn show_notification(&mut self, title: &str, options: &NotificationOptions) -> Result<(), WorkerError> {
        print_notification(title, options).map_err(|e| WorkerError::Display(e.to_string()))
    }
}

/// Reports opened windows instead of launching a browser
pub struct TerminalClients;

impl WindowClient for TerminalClients {
    fn open_window(&mut self, url: &str) {
        println!("open {}", url);
    }
}
