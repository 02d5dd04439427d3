// Display settings
// Persisted under the "app-settings" storage key

use serde::{Deserialize, Serialize};

use crate::store::Preference;
use crate::theme::Theme;

/// Storage key for `AppSettings`
pub const SETTINGS_KEY: &str = "app-settings";

/// Slider range for brightness and contrast
pub const VISUAL_FACTOR_RANGE: (f64, f64) = (0.5, 1.5);
pub const VISUAL_FACTOR_STEP: f64 = 0.1;

/// Slider range for the refresh interval, in minutes
pub const REFRESH_INTERVAL_RANGE: (u32, u32) = (1, 60);

/// Root font size preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
}

impl FontSize {
    /// Root font size in px
    pub fn root_px(&self) -> u32 {
        match self {
            FontSize::Small => 14,
            FontSize::Medium => 16,
            FontSize::Large => 18,
            FontSize::ExtraLarge => 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: Theme,

    pub font_size: FontSize,

    /// Brightness factor (UI range 0.5 - 1.5)
    pub brightness: f64,

    /// Contrast factor (UI range 0.5 - 1.5)
    pub contrast: f64,

    pub compact_mode: bool,

    pub animations: bool,

    pub auto_refresh: bool,

    /// Feed refresh interval in minutes (UI range 1 - 60)
    pub refresh_interval: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Auto,
            font_size: FontSize::Medium,
            brightness: 1.0,
            contrast: 1.0,
            compact_mode: false,
            animations: true,
            auto_refresh: true,
            refresh_interval: 15,
        }
    }
}

/// Partial update for `AppSettings`.
///
/// Deserializes from a partial JSON object; absent fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compact_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_refresh: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<u32>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }
}

impl Preference for AppSettings {
    const STORAGE_KEY: &'static str = SETTINGS_KEY;
    type Patch = SettingsPatch;

    fn merge(&mut self, patch: SettingsPatch) {
        let SettingsPatch {
            theme,
            font_size,
            brightness,
            contrast,
            compact_mode,
            animations,
            auto_refresh,
            refresh_interval,
        } = patch;

        if let Some(v) = theme { self.theme = v; }
        if let Some(v) = font_size { self.font_size = v; }
        if let Some(v) = brightness.filter(|v| finite_factor("brightness", *v)) { self.brightness = v; }
        if let Some(v) = contrast.filter(|v| finite_factor("contrast", *v)) { self.contrast = v; }
        if let Some(v) = compact_mode { self.compact_mode = v; }
        if let Some(v) = animations { self.animations = v; }
        if let Some(v) = auto_refresh { self.auto_refresh = v; }
        if let Some(v) = refresh_interval { self.refresh_interval = v; }
    }
}

// JSON has no NaN or infinity; such a value would not survive a save
fn finite_factor(name: &str, value: f64) -> bool {
    if !value.is_finite() {
        log::warn!("ignoring non-finite {}: {}", name, value);
    }
    value.is_finite()
}

/// Clamp a slider value for brightness/contrast.
/// The settings manager itself stores whatever it is given.
pub fn clamp_visual_factor(value: f64) -> f64 {
    value.clamp(VISUAL_FACTOR_RANGE.0, VISUAL_FACTOR_RANGE.1)
}

/// Clamp a slider value for the refresh interval
pub fn clamp_refresh_interval(minutes: u32) -> u32 {
    minutes.clamp(REFRESH_INTERVAL_RANGE.0, REFRESH_INTERVAL_RANGE.1)
}
