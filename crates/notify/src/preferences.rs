// Notification preferences
// Persisted under the "notification-preferences" storage key

use kirzach_config::Preference;
use serde::{Deserialize, Serialize};

/// Storage key for `NotificationPreferences`
pub const PREFERENCES_KEY: &str = "notification-preferences";

/// Category value that matches every category
pub const ALL_CATEGORIES: &str = "Все";

/// Categories the news feed publishes under
pub const FEED_CATEGORIES: [&str; 5] =
    ["Образование", "Благоустройство", "События", "Спорт", "Экономика"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    /// Breaking-news alerts
    pub breaking: bool,

    /// Categories to notify about, or `ALL_CATEGORIES`
    pub categories: Vec<String>,

    /// Notifications switched on by the user
    pub enabled: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            breaking: true,
            categories: vec![ALL_CATEGORIES.to_string()],
            enabled: false,
        }
    }
}

impl NotificationPreferences {
    /// True if news in `category` should be surfaced
    pub fn accepts(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == ALL_CATEGORIES || c == category)
    }

    /// Category list with `category` removed if present, appended otherwise
    pub fn toggled_categories(&self, category: &str) -> Vec<String> {
        if self.categories.iter().any(|c| c == category) {
            self.categories.iter().filter(|c| *c != category).cloned().collect()
        } else {
            let mut categories = self.categories.clone();
            categories.push(category.to_string());
            categories
        }
    }
}

/// Partial update for `NotificationPreferences`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breaking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl Preference for NotificationPreferences {
    const STORAGE_KEY: &'static str = PREFERENCES_KEY;
    type Patch = PreferencesPatch;

    fn merge(&mut self, patch: PreferencesPatch) {
        if let Some(breaking) = patch.breaking {
            self.breaking = breaking;
        }
        if let Some(categories) = patch.categories {
            self.categories = categories;
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
    }
}
