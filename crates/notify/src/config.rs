// Fixed notification parameters
// Hosts override these through NotificationConfig; the defaults match the web app

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::options::NotificationOptions;

pub const DEFAULT_SCRIPT_URL: &str = "/sw.js";
pub const DEFAULT_ICON: &str = "/favicon.svg";
pub const DEFAULT_TAG: &str = "kirzach-news";
/// Demo key; deployments supply their own VAPID public key
pub const DEFAULT_APPLICATION_KEY: &str = "BDd3_hVL9fZlJz-demo-key0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Background script registered at startup
    pub script_url: String,
    pub icon: String,
    pub badge: String,
    /// Grouping tag applied to every notification
    pub tag: String,
    /// URL-safe base64 application server key
    pub application_server_key: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            icon: DEFAULT_ICON.to_string(),
            badge: DEFAULT_ICON.to_string(),
            tag: DEFAULT_TAG.to_string(),
            application_server_key: DEFAULT_APPLICATION_KEY.to_string(),
        }
    }
}

impl NotificationConfig {
    /// Defaults applied under every notification
    pub fn default_options(&self) -> NotificationOptions {
        NotificationOptions {
            icon: Some(self.icon.clone()),
            badge: Some(self.badge.clone()),
            tag: Some(self.tag.clone()),
            renotify: Some(true),
            ..Default::default()
        }
    }

    pub fn application_key_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        decode_url_base64(&self.application_server_key)
    }
}

/// Decode URL-safe base64, tolerating missing `=` padding
pub fn decode_url_base64(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let padding = (4 - input.len() % 4) % 4;
    let mut padded = String::with_capacity(input.len() + padding);
    padded.push_str(input);
    padded.extend(std::iter::repeat('=').take(padding));
    URL_SAFE.decode(padded)
}
