// Theme selection and resolution
// `Auto` follows the platform color-scheme preference

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

/// Theme the user picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the platform preference (default)
    #[default]
    Auto,
}

/// Concrete light/dark after resolving `Theme::Auto`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedTheme {
    #[default]
    Light,
    Dark,
}

impl ResolvedTheme {
    pub fn is_dark(&self) -> bool {
        matches!(self, ResolvedTheme::Dark)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedTheme::Light => "light",
            ResolvedTheme::Dark => "dark",
        }
    }
}

impl Theme {
    /// Resolve against the platform preference
    pub fn resolve(&self, probe: &impl ColorSchemeProbe) -> ResolvedTheme {
        match self {
            Theme::Light => ResolvedTheme::Light,
            Theme::Dark => ResolvedTheme::Dark,
            Theme::Auto => probe.system_theme(),
        }
    }
}

/// Platform color-scheme query (`prefers-color-scheme: dark`)
pub trait ColorSchemeProbe {
    fn prefers_dark(&self) -> bool;

    fn system_theme(&self) -> ResolvedTheme {
        if self.prefers_dark() {
            ResolvedTheme::Dark
        } else {
            ResolvedTheme::Light
        }
    }
}

impl<F: Fn() -> bool> ColorSchemeProbe for F {
    fn prefers_dark(&self) -> bool {
        self()
    }
}

/// Probe with a host-controlled answer.
///
/// Clones share the flag, so a host can keep one handle, flip it when the
/// platform reports a change, and then call `color_scheme_changed` on the
/// settings manager. Hosts with no color-scheme information use the default
/// (light).
#[derive(Debug, Clone, Default)]
pub struct FixedColorScheme {
    dark: Rc<Cell<bool>>,
}

impl FixedColorScheme {
    pub fn new(theme: ResolvedTheme) -> Self {
        Self { dark: Rc::new(Cell::new(theme.is_dark())) }
    }

    pub fn set(&self, theme: ResolvedTheme) {
        self.dark.set(theme.is_dark());
    }
}

impl ColorSchemeProbe for FixedColorScheme {
    fn prefers_dark(&self) -> bool {
        self.dark.get()
    }
}
