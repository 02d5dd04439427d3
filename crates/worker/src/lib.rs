//! Background worker for the reader.
//!
//! Runs independently of any open page: pre-caches the app shell for offline
//! use, answers fetches cache-first, turns push messages into notifications,
//! and routes notification clicks.

mod cache;
mod error;
mod network;
mod worker;

pub use cache::{AssetCache, DiskCache, MemoryCache, Response};
pub use error::WorkerError;
pub use network::{HttpNetwork, Network};
pub use worker::{
    handle_push, notification_click, push_notification, BackgroundWorker, ClickOutcome,
    NotificationSurface, ShownNotification, WindowClient, CACHE_NAME, DEFAULT_TARGET_URL,
    PRECACHE_URLS, PUSH_DEFAULT_BODY, PUSH_TITLE,
};
