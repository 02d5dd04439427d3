//! Document root styling
//!
//! The settings manager never touches a real DOM. It drives a `DocumentRoot`,
//! which a host maps onto whatever it renders with. `RootStyle` is the
//! in-memory implementation used headless and in tests.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// CSS variable zeroed when animations are off
pub const ANIMATION_DURATION_VAR: &str = "--animation-duration";
/// CSS variable zeroed when animations are off
pub const TRANSITION_DURATION_VAR: &str = "--transition-duration";

/// Root-level style surface the settings manager writes to.
pub trait DocumentRoot {
    /// Add or remove the root `dark` class
    fn set_dark(&mut self, dark: bool);

    /// Root font size, e.g. `16px`
    fn set_font_size(&mut self, value: &str);

    /// Root visual filter, e.g. `brightness(1) contrast(1)`
    fn set_filter(&mut self, value: &str);

    /// Set a custom property on the root
    fn set_property(&mut self, name: &str, value: &str);

    /// Remove a custom property so the stylesheet default applies again
    fn remove_property(&mut self, name: &str);
}

/// In-memory root style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootStyle {
    pub dark: bool,
    pub font_size: Option<String>,
    pub filter: Option<String>,
    pub properties: BTreeMap<String, String>,
}

impl RootStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Render as a `:root` rule
    pub fn to_css(&self) -> String {
        let selector = if self.dark { ":root.dark" } else { ":root" };
        let mut css = format!("{} {{\n", selector);

        if let Some(size) = &self.font_size {
            let _ = writeln!(css, "  font-size: {};", size);
        }
        if let Some(filter) = &self.filter {
            let _ = writeln!(css, "  filter: {};", filter);
        }
        for (name, value) in &self.properties {
            let _ = writeln!(css, "  {}: {};", name, value);
        }

        css.push('}');
        css
    }
}

impl DocumentRoot for RootStyle {
    fn set_dark(&mut self, dark: bool) {
        self.dark = dark;
    }

    fn set_font_size(&mut self, value: &str) {
        self.font_size = Some(value.to_string());
    }

    fn set_filter(&mut self, value: &str) {
        self.filter = Some(value.to_string());
    }

    fn set_property(&mut self, name: &str, value: &str) {
        self.properties.insert(name.to_string(), value.to_string());
    }

    fn remove_property(&mut self, name: &str) {
        self.properties.remove(name);
    }
}

/// Root filter combining brightness and contrast
pub fn filter_value(brightness: f64, contrast: f64) -> String {
    format!("brightness({}) contrast({})", brightness, contrast)
}
