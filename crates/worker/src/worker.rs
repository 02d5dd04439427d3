//! The background worker's three reactions: install, fetch, push.
//! Notification clicks are handled by `notification_click`.

use kirzach_notify::{
    NotificationData, NotificationOptions, ACTION_DISMISS, DEFAULT_ICON, DEFAULT_TAG,
};

use crate::cache::{AssetCache, Response};
use crate::error::WorkerError;
use crate::network::Network;

pub const CACHE_NAME: &str = "kirzach-live-v1";

/// Assets pre-cached on install
pub const PRECACHE_URLS: [&str; 3] = ["/", "/src/main.tsx", "/src/index.css"];

pub const PUSH_TITLE: &str = "КиржачLive.ru";
pub const PUSH_DEFAULT_BODY: &str = "Новая новость в КиржачLive!";
pub const DEFAULT_TARGET_URL: &str = "/";

/// Where the worker shows notifications
pub trait NotificationSurface {
    fn show_notification(&mut self, title: &str, options: &NotificationOptions) -> Result<(), WorkerError>;
}

/// A notification the user clicked
pub trait ShownNotification {
    fn close(&mut self);

    fn data(&self) -> Option<&NotificationData>;
}

/// Opens pages on behalf of the worker
pub trait WindowClient {
    fn open_window(&mut self, url: &str);
}

/// What a click led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Closed and opened the target url
    Opened(String),
    /// Closed only
    Dismissed,
}

pub struct BackgroundWorker<C, N> {
    cache: C,
    network: N,
}

impl<C: AssetCache, N: Network> BackgroundWorker<C, N> {
    pub fn new(cache: C, network: N) -> Self {
        Self { cache, network }
    }

    /// Pre-cache `PRECACHE_URLS`. All-or-nothing: if any asset fails to
    /// fetch (or returns a non-2xx status) nothing is stored.
    pub fn install(&mut self) -> Result<usize, WorkerError> {
        let mut fetched = Vec::with_capacity(PRECACHE_URLS.len());
        for path in PRECACHE_URLS {
            let response = self.network.fetch(path)?;
            if !response.is_ok() {
                return Err(WorkerError::Http(response.status, path.to_string()));
            }
            fetched.push((path, response));
        }

        for (path, response) in &fetched {
            self.cache.put(path, response)?;
        }
        log::info!("pre-cached {} assets into {}", fetched.len(), CACHE_NAME);
        Ok(fetched.len())
    }

    /// Serve from cache when present, otherwise from the network.
    pub fn fetch(&self, path: &str) -> Result<Response, WorkerError> {
        match self.cache.lookup(path) {
            Ok(Some(response)) => return Ok(response),
            Ok(None) => {}
            Err(e) => log::warn!("cache lookup failed for {}: {}", path, e),
        }
        self.network.fetch(path)
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

/// Notification for an incoming push message
pub fn push_notification(payload: Option<&str>) -> (String, NotificationOptions) {
    let options = NotificationOptions {
        body: Some(payload.unwrap_or(PUSH_DEFAULT_BODY).to_string()),
        icon: Some(DEFAULT_ICON.to_string()),
        badge: Some(DEFAULT_ICON.to_string()),
        tag: Some(DEFAULT_TAG.to_string()),
        data: Some(NotificationData { url: Some(DEFAULT_TARGET_URL.to_string()) }),
        ..Default::default()
    };
    (PUSH_TITLE.to_string(), options)
}

/// Surface an incoming push message as a notification
pub fn handle_push(
    surface: &mut impl NotificationSurface,
    payload: Option<&str>,
) -> Result<(), WorkerError> {
    let (title, options) = push_notification(payload);
    surface.show_notification(&title, &options)
}

/// Route a click on a notification.
///
/// The notification is always closed first. `dismiss` stops there; `view`,
/// a bare click, or any other action opens the target url (`/` when the url
/// is missing or empty).
pub fn notification_click(
    notification: &mut impl ShownNotification,
    action: Option<&str>,
    clients: &mut impl WindowClient,
) -> ClickOutcome {
    notification.close();

    if action == Some(ACTION_DISMISS) {
        return ClickOutcome::Dismissed;
    }

    let url = notification
        .data()
        .and_then(|d| d.url.clone())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_TARGET_URL.to_string());
    clients.open_window(&url);
    ClickOutcome::Opened(url)
}
